//! Vertical scroll state.
//!
//! [`ScrollController`] keeps the scroll value inside `[0, maximum]`, where
//! the maximum follows content and viewport heights, and tracks whether the
//! scroll bar should be shown.
//!
//! # Signals
//!
//! - `value_changed(i32)`: Emitted when the value changes
//! - `range_changed((i32, i32))`: Emitted when the range (minimum, maximum) changes
//! - `bar_visibility_changed(bool)`: Emitted when the bar is shown or hidden

use strata_core::Signal;
use strata_core::logging::targets;

/// Scroll value, range and bar visibility for one axis.
pub struct ScrollController {
    value: i32,
    maximum: i32,
    single_step: i32,
    page_step: i32,
    bar_visible: bool,
    /// The slider is being dragged.
    sliding: bool,

    pub value_changed: Signal<i32>,
    pub range_changed: Signal<(i32, i32)>,
    pub bar_visibility_changed: Signal<bool>,
}

impl Default for ScrollController {
    fn default() -> Self {
        Self::new(20, 0)
    }
}

impl std::fmt::Debug for ScrollController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollController")
            .field("value", &self.value)
            .field("maximum", &self.maximum)
            .field("single_step", &self.single_step)
            .field("page_step", &self.page_step)
            .field("bar_visible", &self.bar_visible)
            .field("sliding", &self.sliding)
            .finish()
    }
}

impl ScrollController {
    pub fn new(single_step: i32, page_step: i32) -> Self {
        Self {
            value: 0,
            maximum: 0,
            single_step: single_step.max(1),
            page_step: page_step.max(0),
            bar_visible: false,
            sliding: false,
            value_changed: Signal::new(),
            range_changed: Signal::new(),
            bar_visibility_changed: Signal::new(),
        }
    }

    // =========================================================================
    // Value and Range
    // =========================================================================

    #[inline]
    pub fn value(&self) -> i32 {
        self.value
    }

    #[inline]
    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    pub fn single_step(&self) -> i32 {
        self.single_step
    }

    pub fn page_step(&self) -> i32 {
        self.page_step
    }

    pub fn set_page_step(&mut self, step: i32) {
        self.page_step = step.max(0);
    }

    pub fn is_at_top(&self) -> bool {
        self.value == 0
    }

    pub fn is_at_bottom(&self) -> bool {
        self.value == self.maximum
    }

    /// Set the value, clamped to the range. Returns `true` if it changed.
    pub fn set_value(&mut self, value: i32) -> bool {
        let value = value.clamp(0, self.maximum);
        if self.value == value {
            return false;
        }
        self.value = value;
        tracing::trace!(target: targets::SCROLL, value, "scroll value changed");
        self.value_changed.emit(value);
        true
    }

    /// Recompute the range from content and viewport heights.
    ///
    /// The value is clamped into the new range. Returns `true` if that moved
    /// it.
    pub fn sync_range(&mut self, content_height: i32, viewport_height: i32) -> bool {
        let maximum = (content_height - viewport_height).max(0);
        if maximum != self.maximum {
            self.maximum = maximum;
            tracing::debug!(target: targets::SCROLL, maximum, "scroll range changed");
            self.range_changed.emit((0, maximum));
        }
        if maximum == 0 {
            self.set_bar_visible(false);
        }

        let value = self.value.clamp(0, maximum);
        if value == self.value {
            return false;
        }
        self.value = value;
        self.value_changed.emit(value);
        true
    }

    /// The value a wheel event would scroll to.
    ///
    /// Positive deltas scroll up, matching the usual wheel convention.
    pub fn wheel_target(&self, delta: i32, factor: f32) -> i32 {
        (self.value as f32 - delta as f32 * factor) as i32
    }

    // =========================================================================
    // Bar Visibility
    // =========================================================================

    #[inline]
    pub fn is_bar_visible(&self) -> bool {
        self.bar_visible
    }

    #[inline]
    pub fn is_sliding(&self) -> bool {
        self.sliding
    }

    fn set_bar_visible(&mut self, visible: bool) {
        if self.bar_visible != visible {
            self.bar_visible = visible;
            self.bar_visibility_changed.emit(visible);
        }
    }

    /// The pointer entered the view. The bar shows if there is anything to
    /// scroll.
    pub fn pointer_entered(&mut self) {
        if self.maximum > 0 {
            self.set_bar_visible(true);
        }
    }

    /// The pointer left the view. The bar stays while the slider is held.
    pub fn pointer_left(&mut self) {
        if !self.sliding {
            self.set_bar_visible(false);
        }
    }

    pub fn slider_pressed(&mut self) {
        self.sliding = true;
    }

    /// Release the slider; the bar hides unless the pointer is still inside.
    pub fn slider_released(&mut self, pointer_inside: bool) {
        self.sliding = false;
        if !pointer_inside {
            self.set_bar_visible(false);
        }
    }
}

static_assertions::assert_impl_all!(ScrollController: Send, Sync);
