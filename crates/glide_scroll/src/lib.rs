//! Glide Scroll Deceleration
//!
//! Turns a release velocity into a momentum glide on a scroll target: a
//! [`DecayCurve`](glide_animation::DecayCurve) describes the motion, a
//! [`FrameDriver`](glide_animation::FrameDriver) plays it back once per frame,
//! and the [`Decelerator`] clamps each sampled offset into the target's
//! scrollable range.
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use std::time::Duration;
//!
//! use glide_animation::{FrameClock, ManualFrameClock};
//! use glide_core::{Point, Size, Vec2};
//! use glide_scroll::{DecelerationRate, Decelerator, ScrollView};
//!
//! let view = Rc::new(RefCell::new(ScrollView::new(
//!     Size::new(320.0, 5000.0),
//!     Size::new(320.0, 800.0),
//! )));
//! view.borrow_mut().content_offset = Point::new(0.0, 1000.0);
//!
//! let clock = Rc::new(ManualFrameClock::new());
//! let dyn_clock: Rc<dyn FrameClock> = clock.clone();
//! let decelerator = Decelerator::new(&view, dyn_clock);
//!
//! decelerator.decelerate_with(Vec2::new(0.0, 2.0), DecelerationRate::Normal);
//! clock.run_until_idle(Duration::from_millis(16), 10_000);
//!
//! assert!(view.borrow().content_offset.y > 1000.0);
//! assert!(!decelerator.is_decelerating());
//! ```

pub mod config;
pub mod decelerator;
pub mod rate;
pub mod target;

pub use config::{ConfigError, DecelerationConfig};
pub use decelerator::Decelerator;
pub use rate::{DecelerationRate, DecelerationRequest};
pub use target::{ScrollTarget, ScrollView};
