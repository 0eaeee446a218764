use std::sync::Arc;

/// Compares and hashes an [`Arc`] by the address it points to, not by its contents.
///
/// [`crate::CachedSwitcher`] looks up cached views with [`PartialEq`].
/// Wrap your content in [`ByAddress`] when two values that happen to be equal
/// should still get separate views, e.g. two documents with the same text:
///
/// ```
/// use egui_cached_switcher::ByAddress;
///
/// let a = ByAddress::new(String::from("untitled"));
/// let b = ByAddress::new(String::from("untitled"));
///
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// assert_eq!(*a, *b);
/// ```
#[derive(Debug, Default)]
pub struct ByAddress<T: ?Sized>(pub Arc<T>);

impl<T> ByAddress<T> {
    #[inline]
    pub fn new(value: T) -> Self {
        Self(Arc::new(value))
    }
}

impl<T: ?Sized> ByAddress<T> {
    /// The shared value.
    #[inline]
    pub fn arc(&self) -> &Arc<T> {
        &self.0
    }

    #[inline]
    fn addr(&self) -> *const () {
        Arc::as_ptr(&self.0).cast::<()>()
    }
}

impl<T: ?Sized> Clone for ByAddress<T> {
    #[inline]
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> PartialEq for ByAddress<T> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        // Compare the data pointer only: vtable pointers of the same object may differ.
        std::ptr::eq(self.addr(), other.addr())
    }
}

impl<T: ?Sized> Eq for ByAddress<T> {}

impl<T: ?Sized> std::hash::Hash for ByAddress<T> {
    #[inline]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl<T: ?Sized> std::ops::Deref for ByAddress<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: ?Sized> From<Arc<T>> for ByAddress<T> {
    #[inline]
    fn from(arc: Arc<T>) -> Self {
        Self(arc)
    }
}
