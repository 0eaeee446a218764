//! A content switcher for [`egui`](https://github.com/emilk/egui) that keeps the views it has shown.
//!
//! A plain `match` on the selected page rebuilds the page every time the selection changes.
//! [`CachedSwitcher`] instead keeps one [`View`] per content value (up to a capacity),
//! and only toggles which one is visible.
//!
//! The caching policy lives in [`ViewCache`], which is independent of any [`egui::Ui`]:
//! * at most one view is visible,
//! * at most [`Options::capacity`] views are cached,
//! * the oldest-*created* view is evicted first (this is not an LRU cache),
//! * lowering the capacity takes effect the next time a view is created.
//!
//! ## Feature flags
#![cfg_attr(feature = "document-features", doc = document_features::document_features!())]
//!

#![forbid(unsafe_code)]

mod cache;
mod identity;
mod layout;
mod options;
mod representation;
mod switcher;
mod template;

pub use crate::cache::{Transition, ViewCache};
pub use crate::identity::ByAddress;
pub use crate::layout::max_size;
pub use crate::options::Options;
pub use crate::representation::{Attachment, Representation, RepresentationId, Visibility};
pub use crate::switcher::{BoxedView, CachedSwitcher, View};
pub use crate::template::Template;
