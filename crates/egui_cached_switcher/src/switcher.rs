use std::num::NonZeroUsize;

use egui::{Context, Id, Rect, Response, Sense, Ui, UiBuilder, Widget};

use crate::{Options, Representation, RepresentationId, Template, Transition, ViewCache};

/// Something that can be shown by a [`CachedSwitcher`].
///
/// Unlike a normal egui closure, a view lives across frames,
/// so it can keep its own state (scroll offsets, edited text, …).
///
/// Implemented for all `FnMut(&mut Ui)`.
pub trait View {
    fn ui(&mut self, ui: &mut Ui);
}

impl<F: FnMut(&mut Ui)> View for F {
    fn ui(&mut self, ui: &mut Ui) {
        self(ui);
    }
}

/// A boxed [`View`], as stored by [`CachedSwitcher`].
pub type BoxedView = Box<dyn View>;

/// Shows one view at a time, and keeps the views it has shown before around.
///
/// Like swapping content in and out of a panel, except that switching back to something
/// you have shown recently brings back the *same* view, instead of building a new one.
/// This works as a simple tab control where the selected tab is managed somewhere else.
///
/// At most [`Options::capacity`] views are kept (default: 8).
/// When a new one is needed and the cache is full, the oldest-*created* view is dropped.
///
/// The switcher is as large as the largest cached view, hidden or not,
/// so it doesn't jump around when switching.
/// Hidden views are laid out every frame, but they are neither painted nor interactive.
/// Since the size is remembered from the previous frame, the first frame after a change
/// is discarded and run again (see [`egui::Context::request_discard`]).
///
/// ```
/// # egui::__run_test_ui(|ui| {
/// use egui_cached_switcher::CachedSwitcher;
///
/// // Usually stored in your app state:
/// let mut pages = CachedSwitcher::new("pages", |page: &u32| {
///     let page = *page;
///     let mut clicks = 0;
///     move |ui: &mut egui::Ui| {
///         ui.label(format!("Page {page}"));
///         if ui.button(format!("Clicked {clicks} times")).clicked() {
///             clicks += 1;
///         }
///     }
/// });
///
/// pages.set_content(Some(1));
/// pages.show(ui);
/// # });
/// ```
pub struct CachedSwitcher<K> {
    id_salt: Id,
    cache: ViewCache<K, BoxedView>,
    clip: bool,
    repaint: Option<Context>,
}

impl<K> CachedSwitcher<K> {
    /// `id_salt` must be unique within the parent [`Ui`].
    ///
    /// `template` is called with a content value each time a new view is needed.
    pub fn new<V: View + 'static>(
        id_salt: impl std::hash::Hash,
        template: impl Fn(&K) -> V + Send + Sync + 'static,
    ) -> Self {
        Self {
            id_salt: Id::new(id_salt),
            cache: ViewCache::new(boxed_template(template)),
            clip: false,
            repaint: None,
        }
    }

    /// How many views to keep. See [`Self::set_capacity`].
    #[inline]
    pub fn capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.set_capacity(capacity);
        self
    }

    /// Clip the views to the rect of the switcher. Default: `false`.
    #[inline]
    pub fn clip(mut self, clip: bool) -> Self {
        self.clip = clip;
        self
    }

    #[inline]
    pub fn options(mut self, options: Options) -> Self {
        self.set_options(options);
        self
    }

    /// Request a repaint of `ctx` every time the content changes.
    ///
    /// Useful when the content is switched from outside of the ui code.
    #[inline]
    pub fn repaint_on_change(mut self, ctx: Context) -> Self {
        self.repaint = Some(ctx);
        self
    }

    pub fn current_options(&self) -> Options {
        Options {
            capacity: self.cache.capacity(),
            clip: self.clip,
        }
    }

    pub fn set_options(&mut self, options: Options) {
        let Options { capacity, clip } = options;
        self.set_capacity(capacity);
        self.clip = clip;
    }

    /// Change how many views to keep.
    ///
    /// Lowering the capacity does not drop anything right away;
    /// the cache is trimmed the next time a new view is created.
    #[inline]
    pub fn set_capacity(&mut self, capacity: NonZeroUsize) {
        self.cache.set_capacity(capacity);
    }

    /// Use a new template for views created from now on.
    ///
    /// Views that are already cached are kept as they are.
    pub fn set_template<V: View + 'static>(
        &mut self,
        template: impl Fn(&K) -> V + Send + Sync + 'static,
    ) {
        self.cache.set_template(boxed_template(template));
    }

    /// The cached views, in the order they were created.
    #[inline]
    pub fn cache(&self) -> &ViewCache<K, BoxedView> {
        &self.cache
    }

    /// The content that is currently shown.
    #[inline]
    pub fn content(&self) -> Option<&K> {
        self.cache.content()
    }

    #[inline]
    pub fn current_id(&self) -> Option<RepresentationId> {
        self.cache.current_id()
    }

    #[inline]
    pub fn child_count(&self) -> usize {
        self.cache.child_count()
    }

    #[inline]
    pub fn child(&self, index: usize) -> Option<&Representation<K, BoxedView>> {
        self.cache.child(index)
    }

    /// Show a different content. `None` hides everything.
    ///
    /// See [`ViewCache::set_content`] for details.
    pub fn set_content(&mut self, content: Option<K>) -> Transition<K, BoxedView>
    where
        K: PartialEq,
    {
        let transition = self.cache.set_content(content);
        if let Some(ctx) = &self.repaint {
            ctx.request_repaint();
        }
        transition
    }

    /// Lay out every cached view and paint the visible one.
    ///
    /// Each view runs exactly once per frame, in a child [`Ui`] with an [`Id`] that stays
    /// the same for as long as the view is cached. Collapsed views run invisible.
    ///
    /// The switcher allocates the largest size any cached view used last frame.
    /// If that changes, the frame is discarded and run again.
    pub fn show(&mut self, ui: &mut Ui) -> Response {
        profiling::function_scope!();

        let id = ui.id().with(self.id_salt);
        let layout = *ui.layout();
        let available_size = ui.available_rect_before_wrap().size();

        let desired_size = self.cache.desired_size();
        let (rect, response) = ui.allocate_exact_size(desired_size, Sense::hover());

        // Views may grow into the available space; whatever they use is next frame's size.
        let max_rect = Rect::from_min_size(rect.min, rect.size().max(available_size));

        let clip = self.clip;
        let used_size = self.cache.arrange_and_measure(rect, |rep| {
            let mut builder = UiBuilder::new()
                .id_salt(id.with(rep.id()))
                .max_rect(max_rect)
                .layout(layout);
            if !rep.is_visible() {
                builder = builder.invisible();
            }

            let mut child_ui = ui.new_child(builder);
            if clip {
                child_ui.set_clip_rect(rect.intersect(child_ui.clip_rect()));
            }
            rep.view_mut().ui(&mut child_ui);
            child_ui.min_rect().size()
        });

        if used_size != desired_size {
            log::trace!("CachedSwitcher {id:?} resized from {desired_size:?} to {used_size:?}");
            ui.ctx().request_discard("CachedSwitcher resized");
            ui.ctx().request_repaint();
        }

        response
    }
}

impl<K> Widget for &mut CachedSwitcher<K> {
    fn ui(self, ui: &mut Ui) -> Response {
        self.show(ui)
    }
}

impl<K: std::fmt::Debug> std::fmt::Debug for CachedSwitcher<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedSwitcher")
            .field("id_salt", &self.id_salt)
            .field("content", &self.cache.content())
            .field("cached", &self.cache.len())
            .field("capacity", &self.cache.capacity())
            .field("clip", &self.clip)
            .finish_non_exhaustive()
    }
}

fn boxed_template<K, V: View + 'static>(
    template: impl Fn(&K) -> V + Send + Sync + 'static,
) -> Template<K, BoxedView> {
    Template::new(move |content: &K| Box::new(template(content)) as BoxedView)
}
