use std::collections::VecDeque;
use std::num::NonZeroUsize;

use crate::{Options, Representation, RepresentationId, Template, Visibility};

/// What a call to [`ViewCache::set_content`] did.
#[derive(Debug)]
pub enum Transition<K, V> {
    /// The content was cleared. Nothing is visible now.
    Hidden {
        /// The view that was visible before, if any. It is still cached.
        hidden: Option<RepresentationId>,
    },

    /// A cached view was shown again. Nothing was created.
    Shown {
        shown: RepresentationId,

        /// The previously visible view, if it was a different one.
        hidden: Option<RepresentationId>,
    },

    /// The content was not cached, so a new view was created from the template.
    Created {
        created: RepresentationId,

        /// The previously visible view, if it survived eviction.
        hidden: Option<RepresentationId>,

        /// Views dropped from the cache to make room, oldest first.
        ///
        /// They are detached and collapsed; do with them what you want.
        evicted: Vec<Representation<K, V>>,
    },
}

impl<K, V> Transition<K, V> {
    /// The view that is visible after the transition.
    pub fn visible(&self) -> Option<RepresentationId> {
        match self {
            Self::Hidden { .. } => None,
            Self::Shown { shown, .. } => Some(*shown),
            Self::Created { created, .. } => Some(*created),
        }
    }
}

/// Keeps one view per distinct content value, and shows at most one of them.
///
/// Switching back to a content value that is still cached shows the old view again,
/// with all its state intact, instead of building a new one.
///
/// The cache is a queue ordered by creation time.
/// When it is full, the oldest-created view is evicted,
/// no matter how recently it was shown.
///
/// Content values are compared with [`PartialEq`].
/// Use [`crate::ByAddress`] to compare by reference instead.
///
/// This is the policy behind [`crate::CachedSwitcher`]. It knows nothing about `egui`
/// except for the geometry types used by [`Self::measure`] and [`Self::arrange`].
#[derive(Debug)]
pub struct ViewCache<K, V> {
    template: Template<K, V>,
    capacity: NonZeroUsize,
    queue: VecDeque<Representation<K, V>>,
    current: Option<RepresentationId>,
    next_serial: u64,
    generation: u64,
}

impl<K, V> ViewCache<K, V> {
    /// An empty cache with the default capacity of [`Options::DEFAULT_CAPACITY`].
    pub fn new(template: impl Into<Template<K, V>>) -> Self {
        Self {
            template: template.into(),
            capacity: Options::DEFAULT_CAPACITY,
            queue: VecDeque::new(),
            current: None,
            next_serial: 0,
            generation: 0,
        }
    }

    #[inline]
    pub fn with_capacity(mut self, capacity: NonZeroUsize) -> Self {
        self.set_capacity(capacity);
        self
    }

    /// How many views are kept at most.
    #[inline]
    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    /// Change how many views are kept.
    ///
    /// Nothing is evicted here, even if the cache is now over capacity.
    /// The next [`Self::set_content`] that has to create a view trims the cache first.
    pub fn set_capacity(&mut self, capacity: NonZeroUsize) {
        if capacity.get() < self.queue.len() {
            log::trace!(
                "Capacity lowered to {capacity} with {} views cached; trimming on next miss",
                self.queue.len()
            );
        }
        self.capacity = capacity;
    }

    #[inline]
    pub fn template(&self) -> &Template<K, V> {
        &self.template
    }

    /// Replace the template used for views created from now on.
    ///
    /// Views that are already cached are left as they are.
    pub fn set_template(&mut self, template: impl Into<Template<K, V>>) {
        self.template = template.into();
    }

    /// Bumped by every call to [`Self::set_content`].
    ///
    /// Poll this if you need to know when to redraw.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// The content value that is currently shown, if any.
    pub fn content(&self) -> Option<&K> {
        self.current().map(Representation::content)
    }

    #[inline]
    pub fn current_id(&self) -> Option<RepresentationId> {
        self.current
    }

    /// The visible view, if any.
    pub fn current(&self) -> Option<&Representation<K, V>> {
        self.current.and_then(|id| self.get(id))
    }

    pub fn current_mut(&mut self) -> Option<&mut Representation<K, V>> {
        let id = self.current?;
        self.get_mut(id)
    }

    pub fn get(&self, id: RepresentationId) -> Option<&Representation<K, V>> {
        self.queue.iter().find(|rep| rep.id == id)
    }

    pub fn get_mut(&mut self, id: RepresentationId) -> Option<&mut Representation<K, V>> {
        self.queue.iter_mut().find(|rep| rep.id == id)
    }

    /// Number of cached views.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of attached child views. The same as [`Self::len`].
    #[inline]
    pub fn child_count(&self) -> usize {
        self.queue.len()
    }

    /// The child view at `index`, oldest first.
    #[inline]
    pub fn child(&self, index: usize) -> Option<&Representation<K, V>> {
        self.queue.get(index)
    }

    #[inline]
    pub fn child_mut(&mut self, index: usize) -> Option<&mut Representation<K, V>> {
        self.queue.get_mut(index)
    }

    /// All cached views, oldest first.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Representation<K, V>> + '_ {
        self.queue.iter()
    }

    pub fn iter_mut(&mut self) -> impl ExactSizeIterator<Item = &mut Representation<K, V>> + '_ {
        self.queue.iter_mut()
    }

    pub(crate) fn queue_mut(&mut self) -> &mut VecDeque<Representation<K, V>> {
        &mut self.queue
    }

    fn hide_current(&mut self) -> Option<RepresentationId> {
        let id = self.current.take()?;
        if let Some(rep) = self.get_mut(id) {
            rep.visibility = Visibility::Collapsed;
        }
        log::trace!("Hid view {id:?}");
        Some(id)
    }
}

impl<K: PartialEq, V> ViewCache<K, V> {
    /// Index of the cached view for `content`, oldest first.
    pub fn position(&self, content: &K) -> Option<usize> {
        self.queue.iter().position(|rep| rep.content == *content)
    }

    pub fn contains(&self, content: &K) -> bool {
        self.position(content).is_some()
    }

    /// Switch to `content`. `None` hides whatever is visible.
    ///
    /// * `None`: the visible view, if any, is collapsed but stays cached.
    /// * Cached content: its view is shown and the previous one collapsed.
    ///   The cache order does not change.
    /// * New content: if the cache is full, the oldest views are evicted until there is room.
    ///   Then a view is created with the current template, appended and shown.
    ///   Note that this evicts more than one view if the capacity was lowered since the
    ///   last miss, so the cache is always within capacity afterwards.
    pub fn set_content(&mut self, content: Option<K>) -> Transition<K, V> {
        self.generation = self.generation.wrapping_add(1);

        let transition = match content {
            None => Transition::Hidden {
                hidden: self.hide_current(),
            },
            Some(content) => match self.position(&content) {
                Some(index) => self.show_cached(index),
                None => self.create(content),
            },
        };

        self.check_invariants();
        transition
    }

    fn show_cached(&mut self, index: usize) -> Transition<K, V> {
        let shown = self.queue[index].id;
        let hidden = if self.current == Some(shown) {
            None
        } else {
            self.hide_current()
        };

        self.queue[index].visibility = Visibility::Visible;
        self.current = Some(shown);
        log::trace!("Showing cached view {shown:?}");

        Transition::Shown { shown, hidden }
    }

    fn create(&mut self, content: K) -> Transition<K, V> {
        let mut evicted = Vec::new();
        while self.queue.len() >= self.capacity.get() {
            let Some(mut oldest) = self.queue.pop_front() else {
                break;
            };
            if self.current == Some(oldest.id) {
                self.current = None;
            }
            oldest.detach();
            log::debug!("Evicted view {:?}", oldest.id);
            evicted.push(oldest);
        }

        let hidden = self.hide_current();

        let created = RepresentationId::new(self.next_serial);
        self.next_serial += 1;
        let view = self.template.instantiate(&content);
        self.queue.push_back(Representation::new(created, content, view));
        self.current = Some(created);
        log::debug!("Created view {created:?} ({} cached)", self.queue.len());

        assert!(
            self.queue.len() <= self.capacity.get(),
            "View cache holds {} views, capacity is {}",
            self.queue.len(),
            self.capacity
        );

        Transition::Created {
            created,
            hidden,
            evicted,
        }
    }

    fn check_invariants(&self) {
        let mut visible = self.queue.iter().filter(|rep| rep.is_visible());
        let first_visible = visible.next().map(|rep| rep.id);
        assert!(visible.next().is_none(), "More than one cached view is visible");
        assert_eq!(
            first_visible, self.current,
            "The visible view and the current view disagree"
        );

        for (index, rep) in self.queue.iter().enumerate() {
            assert!(rep.is_attached(), "Cached view {:?} is detached", rep.id);
            assert!(
                !self.queue.range(index + 1..).any(|other| other.content == rep.content),
                "Two cached views share the same content"
            );
            if let Some(next) = self.queue.get(index + 1) {
                assert!(rep.id < next.id, "Cached views are out of creation order");
            }
        }
    }
}

impl<'a, K, V> IntoIterator for &'a ViewCache<K, V> {
    type Item = &'a Representation<K, V>;
    type IntoIter = std::collections::vec_deque::Iter<'a, Representation<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.queue.iter()
    }
}

impl<'a, K, V> IntoIterator for &'a mut ViewCache<K, V> {
    type Item = &'a mut Representation<K, V>;
    type IntoIter = std::collections::vec_deque::IterMut<'a, Representation<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.queue.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Attachment, ByAddress};

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn cache(capacity: usize) -> ViewCache<&'static str, String> {
        ViewCache::new(|content: &&'static str| format!("view of {content}"))
            .with_capacity(cap(capacity))
    }

    /// The cache contents oldest first, with the visible one marked by `*`.
    fn contents(cache: &ViewCache<&'static str, String>) -> String {
        cache
            .iter()
            .map(|rep| {
                if rep.is_visible() {
                    format!("{}*", rep.content())
                } else {
                    (*rep.content()).to_owned()
                }
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    #[test]
    fn creation_order_decides_eviction() {
        let mut cache = cache(2);

        cache.set_content(Some("A"));
        assert_eq!(contents(&cache), "A*");
        cache.set_content(Some("B"));
        assert_eq!(contents(&cache), "A,B*");
        cache.set_content(Some("C"));
        assert_eq!(contents(&cache), "B,C*");

        // Showing B again does not move it to the back of the queue:
        cache.set_content(Some("B"));
        assert_eq!(contents(&cache), "B*,C");
        cache.set_content(None);
        assert_eq!(contents(&cache), "B,C");
        assert_eq!(cache.current_id(), None);

        cache.set_content(Some("D"));
        assert_eq!(contents(&cache), "C,D*");
    }

    #[test]
    fn cache_hit_reuses_the_view() {
        let mut cache = cache(8);
        let Transition::Created { created: a, .. } = cache.set_content(Some("A")) else {
            panic!("expected a new view");
        };
        cache.set_content(Some("B"));

        let transition = cache.set_content(Some("A"));
        assert!(matches!(
            transition,
            Transition::Shown { shown, hidden: Some(_) } if shown == a
        ));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.current_id(), Some(a));
        assert_eq!(cache.content(), Some(&"A"));
    }

    #[test]
    fn showing_the_current_content_again_hides_nothing() {
        let mut cache = cache(8);
        cache.set_content(Some("A"));
        let transition = cache.set_content(Some("A"));
        assert!(matches!(transition, Transition::Shown { hidden: None, .. }));
        assert_eq!(contents(&cache), "A*");
    }

    #[test]
    fn clearing_content_keeps_the_view() {
        let mut cache = cache(8);
        let Transition::Created { created, .. } = cache.set_content(Some("A")) else {
            panic!("expected a new view");
        };

        let transition = cache.set_content(None);
        assert!(matches!(transition, Transition::Hidden { hidden: Some(id) } if id == created));
        assert_eq!(cache.len(), 1);
        assert!(cache.current().is_none());
        assert!(cache.content().is_none());
        assert_eq!(cache.child(0).map(Representation::id), Some(created));

        // Clearing twice is fine:
        assert!(matches!(
            cache.set_content(None),
            Transition::Hidden { hidden: None }
        ));
    }

    #[test]
    fn evicting_the_visible_view() {
        let mut cache = cache(2);
        cache.set_content(Some("A"));
        cache.set_content(Some("B"));
        cache.set_content(Some("A"));
        assert_eq!(contents(&cache), "A*,B");

        let Transition::Created {
            hidden, evicted, ..
        } = cache.set_content(Some("C"))
        else {
            panic!("expected a new view");
        };

        // A was both visible and oldest, so there was nothing left to hide:
        assert_eq!(hidden, None);
        assert_eq!(evicted.len(), 1);
        let a = &evicted[0];
        assert_eq!(*a.content(), "A");
        assert_eq!(a.attachment(), Attachment::Detached);
        assert_eq!(a.visibility(), Visibility::Collapsed);
        assert_eq!(contents(&cache), "B,C*");
    }

    #[test]
    fn evicted_view_is_handed_back() {
        let mut cache = cache(1);
        cache.set_content(Some("A"));
        let Transition::Created { evicted, .. } = cache.set_content(Some("B")) else {
            panic!("expected a new view");
        };
        let (content, view) = evicted.into_iter().next().unwrap().into_parts();
        assert_eq!(content, "A");
        assert_eq!(view, "view of A");
    }

    #[test]
    fn lowering_capacity_is_lazy() {
        let mut cache = cache(4);
        for content in ["A", "B", "C", "D"] {
            cache.set_content(Some(content));
        }

        cache.set_capacity(cap(2));
        assert_eq!(cache.len(), 4);

        // Hits and clears don't trim:
        cache.set_content(Some("C"));
        cache.set_content(None);
        assert_eq!(contents(&cache), "A,B,C,D");

        let Transition::Created { evicted, .. } = cache.set_content(Some("E")) else {
            panic!("expected a new view");
        };
        let evicted: Vec<_> = evicted.iter().map(|rep| *rep.content()).collect();
        assert_eq!(evicted, ["A", "B", "C"]);
        assert_eq!(contents(&cache), "D,E*");
    }

    #[test]
    fn raising_capacity_keeps_more() {
        let mut cache = cache(1);
        cache.set_content(Some("A"));
        cache.set_capacity(cap(3));
        cache.set_content(Some("B"));
        cache.set_content(Some("C"));
        assert_eq!(contents(&cache), "A,B,C*");
    }

    #[test]
    fn template_is_not_retroactive() {
        let mut cache = cache(8);
        cache.set_content(Some("A"));

        cache.set_template(|content: &&'static str| format!("new view of {content}"));
        cache.set_content(Some("B"));
        cache.set_content(Some("A"));

        let views: Vec<_> = cache.iter().map(|rep| rep.view().as_str()).collect();
        assert_eq!(views, ["view of A", "new view of B"]);
    }

    #[test]
    fn shared_template() {
        let template = Template::new(|content: &u32| content * 10);
        let mut a: ViewCache<u32, u32> = ViewCache::new(template.clone());
        let b: ViewCache<u32, u32> = ViewCache::new(template.clone());
        assert!(a.template().ptr_eq(b.template()));

        a.set_content(Some(4));
        assert_eq!(a.current().map(|rep| *rep.view()), Some(40));
    }

    #[test]
    fn content_coming_back_after_eviction_gets_a_new_view() {
        let mut cache = cache(1);
        let first = cache.set_content(Some("A")).visible();
        cache.set_content(Some("B"));
        let second = cache.set_content(Some("A")).visible();

        assert!(first.is_some());
        assert!(second.is_some());
        assert_ne!(first, second);
        assert!(first < second);
    }

    #[test]
    fn equal_content_by_address_is_cached_separately() {
        let mut cache: ViewCache<ByAddress<String>, usize> =
            ViewCache::new(|doc: &ByAddress<String>| doc.len());
        let first = ByAddress::new(String::from("untitled"));
        let second = ByAddress::new(String::from("untitled"));

        cache.set_content(Some(first.clone()));
        cache.set_content(Some(second.clone()));
        assert_eq!(cache.len(), 2);

        cache.set_content(Some(first.clone()));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.position(&first), Some(0));
        assert!(cache.contains(&second));
    }

    #[test]
    fn generation_is_bumped_on_every_change() {
        let mut cache = cache(2);
        assert_eq!(cache.generation(), 0);
        cache.set_content(Some("A"));
        cache.set_content(Some("A"));
        cache.set_content(None);
        cache.set_content(None);
        assert_eq!(cache.generation(), 4);
    }

    #[test]
    fn children_are_enumerated_oldest_first() {
        let mut cache = cache(3);
        for content in ["A", "B", "C", "D"] {
            cache.set_content(Some(content));
        }
        assert_eq!(cache.child_count(), 3);
        let children: Vec<_> = (0..cache.child_count())
            .filter_map(|index| cache.child(index))
            .map(|rep| *rep.content())
            .collect();
        assert_eq!(children, ["B", "C", "D"]);
        assert!(cache.child(3).is_none());

        let serials: Vec<_> = (&cache).into_iter().map(|rep| rep.id().serial()).collect();
        assert_eq!(serials, [1, 2, 3]);
    }

    #[test]
    fn at_most_one_visible_over_a_long_run() {
        let mut cache = cache(3);
        let sequence = [
            Some("A"),
            Some("B"),
            None,
            Some("C"),
            Some("A"),
            Some("D"),
            Some("E"),
            None,
            Some("B"),
            Some("E"),
            Some("F"),
        ];
        for content in sequence {
            cache.set_content(content);
            assert!(cache.len() <= 3);
            assert!(cache.iter().filter(|rep| rep.is_visible()).count() <= 1);
            assert_eq!(cache.content().copied(), content);
        }
    }
}
