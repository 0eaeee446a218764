use std::num::NonZeroUsize;

/// Configuration of a [`crate::CachedSwitcher`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Options {
    /// How many views to keep around at most.
    ///
    /// Lowering this does not evict anything right away:
    /// the cache shrinks the next time a new view has to be created.
    pub capacity: NonZeroUsize,

    /// Clip the views to the rect allocated by the switcher.
    pub clip: bool,
}

impl Options {
    pub const DEFAULT_CAPACITY: NonZeroUsize = match NonZeroUsize::new(8) {
        Some(capacity) => capacity,
        None => unreachable!(),
    };
}

impl Default for Options {
    fn default() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
            clip: false,
        }
    }
}
