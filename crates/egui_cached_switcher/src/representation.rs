use egui::{Rect, Vec2};

/// Identifies one cached view for as long as it lives.
///
/// Ids are handed out in creation order and never reused,
/// so a content value that comes back after being evicted gets a new id.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct RepresentationId(u64);

impl RepresentationId {
    #[inline]
    pub(crate) fn new(serial: u64) -> Self {
        Self(serial)
    }

    /// Position in creation order, starting at zero.
    #[inline]
    pub fn serial(self) -> u64 {
        self.0
    }
}

/// Is the view shown?
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum Visibility {
    Visible,

    /// Still laid out, but not painted and not interactive.
    #[default]
    Collapsed,
}

impl Visibility {
    #[inline]
    pub fn is_visible(self) -> bool {
        self == Self::Visible
    }
}

/// Does the view still take part in layout?
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum Attachment {
    /// Member of the cache: measured, arranged and enumerated as a child.
    Attached,

    /// Evicted. Never attached again.
    Detached,
}

/// A cached view together with the content value it was built for.
#[derive(Debug)]
pub struct Representation<K, V> {
    pub(crate) id: RepresentationId,
    pub(crate) content: K,
    pub(crate) view: V,
    pub(crate) visibility: Visibility,
    pub(crate) attachment: Attachment,

    /// Filled in by [`crate::ViewCache::measure`].
    pub(crate) desired_size: Vec2,

    /// Filled in by [`crate::ViewCache::arrange`].
    pub(crate) rect: Rect,
}

impl<K, V> Representation<K, V> {
    pub(crate) fn new(id: RepresentationId, content: K, view: V) -> Self {
        Self {
            id,
            content,
            view,
            visibility: Visibility::Visible,
            attachment: Attachment::Attached,
            desired_size: Vec2::ZERO,
            rect: Rect::NAN,
        }
    }

    #[inline]
    pub fn id(&self) -> RepresentationId {
        self.id
    }

    /// The content value this view was built for.
    #[inline]
    pub fn content(&self) -> &K {
        &self.content
    }

    #[inline]
    pub fn view(&self) -> &V {
        &self.view
    }

    #[inline]
    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    #[inline]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    #[inline]
    pub fn attachment(&self) -> Attachment {
        self.attachment
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.attachment == Attachment::Attached
    }

    /// The size the view asked for the last time it was measured.
    #[inline]
    pub fn desired_size(&self) -> Vec2 {
        self.desired_size
    }

    /// Where the view was last arranged. [`Rect::NAN`] before the first arrange.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Take back the view and content of an evicted representation.
    pub fn into_parts(self) -> (K, V) {
        (self.content, self.view)
    }

    pub(crate) fn detach(&mut self) {
        self.visibility = Visibility::Collapsed;
        self.attachment = Attachment::Detached;
        self.rect = Rect::NAN;
    }
}
