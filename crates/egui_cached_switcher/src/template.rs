use std::sync::Arc;

/// The recipe used to turn a content value into a view.
///
/// Cheap to clone; clones share the same closure.
///
/// A [`crate::ViewCache`] applies its template only when it creates a new view.
/// Views that are already cached keep what the template produced at the time,
/// even if the template is replaced later.
pub struct Template<K, V> {
    build: Arc<dyn Fn(&K) -> V + Send + Sync>,
}

impl<K, V> Template<K, V> {
    pub fn new(build: impl Fn(&K) -> V + Send + Sync + 'static) -> Self {
        Self {
            build: Arc::new(build),
        }
    }

    /// Render `content` into a fresh view.
    #[inline]
    pub fn instantiate(&self, content: &K) -> V {
        (self.build)(content)
    }

    /// Do both templates share the same closure?
    #[inline]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.build, &other.build)
    }
}

impl<K, V> Clone for Template<K, V> {
    fn clone(&self) -> Self {
        Self {
            build: Arc::clone(&self.build),
        }
    }
}

impl<K, V> std::fmt::Debug for Template<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template").finish_non_exhaustive()
    }
}

impl<K, V, F> From<F> for Template<K, V>
where
    F: Fn(&K) -> V + Send + Sync + 'static,
{
    fn from(build: F) -> Self {
        Self::new(build)
    }
}
