//! Prelude module for Strata.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```ignore
//! use strata::prelude::*;
//! ```

// ============================================================================
// Signal/Slot System
// ============================================================================

pub use crate::signal::{ConnectionId, Signal};

// ============================================================================
// Geometry
// ============================================================================

pub use crate::types::{Point, Rect, Size};

// ============================================================================
// Data Side
// ============================================================================

pub use crate::model::{IndexPath, SelectionModel, TableDataSource, TableMetrics};

// ============================================================================
// Items and the View
// ============================================================================

pub use crate::widget::{
    HitTarget, ItemBase, ItemKey, ItemStore, SelectionStyle, TableView, ViewItem,
};

// ============================================================================
// Configuration and Errors
// ============================================================================

pub use crate::config::{TableStyle, TableViewConfig};
pub use crate::error::TableError;
