//! View-side types: items, their storage and recycling, viewport resolution,
//! scrolling and the table view itself.
//!
//! # Item Lifecycle
//!
//! ```text
//!   insert ──> hidden ──> placed and shown ──> retired (hidden, pooled)
//!                              ^                       │
//!                              └────── dequeued <──────┘
//! ```
//!
//! Items are owned by the [`ItemStore`]. Retiring never destroys an item;
//! only a full reload does.

mod item;
mod item_store;
mod renderer;
mod reuse_pool;
mod scroll;
mod table_view;

pub use item::{ItemBase, SelectionStyle, ViewItem};
pub use item_store::{ItemKey, ItemRole, ItemStore};
pub use renderer::{Frame, ViewportRenderer};
pub use reuse_pool::ReusePool;
pub use scroll::ScrollController;
pub use table_view::{HitTarget, TableView};
