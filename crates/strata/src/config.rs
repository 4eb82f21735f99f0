//! Table view configuration and builder.
//!
//! `TableViewConfig` collects the options a [`TableView`](crate::TableView)
//! is constructed with. With the `serde` feature enabled it can also be read
//! from TOML.

use strata_core::Size;

use crate::error::{Result, TableError};

/// Header presentation style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TableStyle {
    /// Section headers stick to the viewport top until pushed off by the
    /// next section.
    #[default]
    Plain,
    /// Headers scroll with their rows.
    Group,
}

/// Configuration for a table view.
///
/// # Example
///
/// ```
/// use strata::{TableStyle, TableViewConfig};
///
/// let config = TableViewConfig::new()
///     .with_style(TableStyle::Group)
///     .with_viewport(320, 480)
///     .with_allows_multiple_selection(true);
///
/// assert!(config.allows_selection());
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TableViewConfig {
    style: TableStyle,
    allows_selection: bool,
    allows_multiple_selection: bool,
    viewport_width: i32,
    viewport_height: i32,
    /// Multiplier applied to wheel deltas before scrolling.
    wheel_scroll_factor: f32,
    single_step: i32,
    /// Defaults to the viewport height when unset.
    page_step: Option<i32>,
}

impl Default for TableViewConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TableViewConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self {
            style: TableStyle::Plain,
            allows_selection: true,
            allows_multiple_selection: false,
            viewport_width: 0,
            viewport_height: 0,
            wheel_scroll_factor: 0.5,
            single_step: 20,
            page_step: None,
        }
    }

    /// Parse a configuration from a TOML document.
    ///
    /// Missing keys take their default values. The result is validated.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the header style.
    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    /// Enable or disable selection.
    pub fn with_allows_selection(mut self, allow: bool) -> Self {
        self.allows_selection = allow;
        if !allow {
            self.allows_multiple_selection = false;
        }
        self
    }

    /// Enable or disable multiple selection.
    ///
    /// Enabling multiple selection also enables selection.
    pub fn with_allows_multiple_selection(mut self, allow: bool) -> Self {
        if allow {
            self.allows_selection = true;
        }
        self.allows_multiple_selection = allow;
        self
    }

    /// Set the viewport size in logical pixels.
    pub fn with_viewport(mut self, width: i32, height: i32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set the wheel delta multiplier.
    pub fn with_wheel_scroll_factor(mut self, factor: f32) -> Self {
        self.wheel_scroll_factor = factor;
        self
    }

    /// Set the scroll controller's single step.
    pub fn with_single_step(mut self, step: i32) -> Self {
        self.single_step = step;
        self
    }

    /// Set the scroll controller's page step.
    pub fn with_page_step(mut self, step: i32) -> Self {
        self.page_step = Some(step);
        self
    }

    pub fn style(&self) -> TableStyle {
        self.style
    }

    pub fn allows_selection(&self) -> bool {
        self.allows_selection || self.allows_multiple_selection
    }

    pub fn allows_multiple_selection(&self) -> bool {
        self.allows_multiple_selection
    }

    pub fn viewport(&self) -> Size {
        Size::new(self.viewport_width, self.viewport_height)
    }

    pub fn wheel_scroll_factor(&self) -> f32 {
        self.wheel_scroll_factor
    }

    pub fn single_step(&self) -> i32 {
        self.single_step
    }

    /// The page step, falling back to the viewport height.
    pub fn page_step(&self) -> i32 {
        self.page_step.unwrap_or(self.viewport_height)
    }

    pub(crate) fn has_explicit_page_step(&self) -> bool {
        self.page_step.is_some()
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if self.viewport_width < 0 || self.viewport_height < 0 {
            return Err(TableError::invalid_config(format!(
                "viewport size {}x{} is negative",
                self.viewport_width, self.viewport_height
            )));
        }
        if !self.wheel_scroll_factor.is_finite() || self.wheel_scroll_factor <= 0.0 {
            return Err(TableError::invalid_config(format!(
                "wheel scroll factor {} must be positive",
                self.wheel_scroll_factor
            )));
        }
        if self.single_step <= 0 {
            return Err(TableError::invalid_config(format!(
                "single step {} must be positive",
                self.single_step
            )));
        }
        if let Some(page_step) = self.page_step
            && page_step < 0
        {
            return Err(TableError::invalid_config(format!(
                "page step {page_step} is negative"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TableViewConfig::default();
        assert_eq!(config.style(), TableStyle::Plain);
        assert!(config.allows_selection());
        assert!(!config.allows_multiple_selection());
        assert_eq!(config.wheel_scroll_factor(), 0.5);
        assert_eq!(config.viewport(), Size::ZERO);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_multiple_selection_forces_selection() {
        let config = TableViewConfig::new()
            .with_allows_selection(false)
            .with_allows_multiple_selection(true);
        assert!(config.allows_selection());
        assert!(config.allows_multiple_selection());

        let config = config.with_allows_selection(false);
        assert!(!config.allows_selection());
        assert!(!config.allows_multiple_selection());
    }

    #[test]
    fn test_page_step_follows_viewport() {
        let config = TableViewConfig::new().with_viewport(100, 300);
        assert_eq!(config.page_step(), 300);
        assert_eq!(config.with_page_step(50).page_step(), 50);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(
            TableViewConfig::new()
                .with_viewport(-1, 10)
                .validate()
                .is_err()
        );
        assert!(
            TableViewConfig::new()
                .with_wheel_scroll_factor(0.0)
                .validate()
                .is_err()
        );
        assert!(
            TableViewConfig::new()
                .with_wheel_scroll_factor(f32::NAN)
                .validate()
                .is_err()
        );
        assert!(TableViewConfig::new().with_single_step(0).validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_toml() {
        let config = TableViewConfig::from_toml_str(
            r#"
            style = "group"
            allows_multiple_selection = true
            viewport_height = 400
            "#,
        )
        .unwrap();
        assert_eq!(config.style(), TableStyle::Group);
        assert!(config.allows_multiple_selection());
        assert_eq!(config.viewport(), Size::new(0, 400));
        assert_eq!(config.wheel_scroll_factor(), 0.5);

        assert!(TableViewConfig::from_toml_str("viewport_width = -5").is_err());
    }
}
