//! Scroll targets
//!
//! The decelerator only needs a narrow view of the thing it scrolls: read and
//! write the content offset, know the vertical extents, and know whether the
//! user has their hands on it.

use glide_core::{Point, Size};

/// A scrollable surface that receives decelerated offsets
pub trait ScrollTarget {
    /// Current content offset
    fn position(&self) -> Point;

    /// Replace the content offset
    fn set_position(&mut self, position: Point);

    /// Total vertical extent of the content
    fn content_extent(&self) -> f64;

    /// Vertical extent of the visible viewport
    fn viewport_extent(&self) -> f64;

    /// Whether a touch, drag, or another deceleration currently owns the surface
    fn is_user_interacting(&self) -> bool;
}

/// Minimal scroll view state
///
/// Tracks the offset, the content and viewport sizes, and the three
/// interaction flags a gesture layer would set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScrollView {
    /// Current content offset (positive y = scrolled down)
    pub content_offset: Point,
    /// Size of the scrollable content
    pub content_size: Size,
    /// Size of the visible viewport
    pub viewport_size: Size,
    /// A finger is down on the view
    pub is_tracking: bool,
    /// The finger has moved far enough to scroll
    pub is_dragging: bool,
    /// The view is gliding under its own momentum
    pub is_decelerating: bool,
}

impl ScrollView {
    pub fn new(content_size: Size, viewport_size: Size) -> Self {
        Self {
            content_size,
            viewport_size,
            ..Default::default()
        }
    }

    /// Builder: set the initial content offset
    pub fn with_offset(mut self, offset: Point) -> Self {
        self.content_offset = offset;
        self
    }

    /// Largest vertical offset that keeps the viewport filled
    pub fn max_offset_y(&self) -> f64 {
        (self.content_size.height - self.viewport_size.height).max(0.0)
    }

    /// Finger down
    pub fn begin_tracking(&mut self) {
        self.is_tracking = true;
    }

    /// Finger up; ends any drag as well
    pub fn end_tracking(&mut self) {
        self.is_tracking = false;
        self.is_dragging = false;
    }
}

impl ScrollTarget for ScrollView {
    fn position(&self) -> Point {
        self.content_offset
    }

    fn set_position(&mut self, position: Point) {
        self.content_offset = position;
    }

    fn content_extent(&self) -> f64 {
        self.content_size.height
    }

    fn viewport_extent(&self) -> f64 {
        self.viewport_size.height
    }

    fn is_user_interacting(&self) -> bool {
        self.is_tracking || self.is_dragging || self.is_decelerating
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> ScrollView {
        ScrollView::new(Size::new(320.0, 1000.0), Size::new(320.0, 400.0))
    }

    #[test]
    fn test_extents_are_vertical() {
        let view = view();
        assert_eq!(view.content_extent(), 1000.0);
        assert_eq!(view.viewport_extent(), 400.0);
        assert_eq!(view.max_offset_y(), 600.0);
    }

    #[test]
    fn test_short_content_has_no_scroll_range() {
        let view = ScrollView::new(Size::new(320.0, 200.0), Size::new(320.0, 400.0));
        assert_eq!(view.max_offset_y(), 0.0);
    }

    #[test]
    fn test_any_flag_means_interacting() {
        let mut view = view();
        assert!(!view.is_user_interacting());

        view.begin_tracking();
        assert!(view.is_user_interacting());
        view.end_tracking();
        assert!(!view.is_user_interacting());

        view.is_dragging = true;
        assert!(view.is_user_interacting());
        view.is_dragging = false;

        view.is_decelerating = true;
        assert!(view.is_user_interacting());
    }

    #[test]
    fn test_set_position_round_trips() {
        let mut view = view().with_offset(Point::new(0.0, 20.0));
        assert_eq!(view.position(), Point::new(0.0, 20.0));

        view.set_position(Point::new(5.0, 300.0));
        assert_eq!(view.content_offset, Point::new(5.0, 300.0));
    }
}
