//! Error types for the table engine.
//!
//! Only contract failures are errors. A data source declining to provide an
//! item, or a mutation whose computed delta is zero, is not.

use crate::model::IndexPath;

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors returned by table operations.
///
/// Every operation that can fail checks its preconditions before mutating
/// anything, so an `Err` means the table is unchanged.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// The operation needs a data source and none is set.
    #[error("table view has no data source")]
    NoDataSource,

    /// A section index is outside the valid range.
    #[error("section {section} is out of range (section count {count})")]
    SectionOutOfRange { section: usize, count: usize },

    /// A row index is outside its section's valid range.
    #[error("row {index_path} is out of range (row count {count})")]
    RowOutOfRange { index_path: IndexPath, count: usize },

    /// The data source reported a negative height.
    #[error("negative {what} height {height}")]
    NegativeHeight { what: &'static str, height: i32 },

    /// Adding a height would push an offset past `i32::MAX`.
    #[error("content too tall to add {what} of height {height}")]
    ContentTooTall { what: &'static str, height: i32 },

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A TOML configuration string could not be parsed.
    #[cfg(feature = "serde")]
    #[error("failed to parse configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl TableError {
    /// Create a section range error.
    pub fn section_out_of_range(section: usize, count: usize) -> Self {
        Self::SectionOutOfRange { section, count }
    }

    /// Create a row range error.
    pub fn row_out_of_range(index_path: IndexPath, count: usize) -> Self {
        Self::RowOutOfRange { index_path, count }
    }

    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Whether this error came from an out-of-range index.
    pub fn is_out_of_range(&self) -> bool {
        matches!(
            self,
            Self::SectionOutOfRange { .. } | Self::RowOutOfRange { .. }
        )
    }
}
