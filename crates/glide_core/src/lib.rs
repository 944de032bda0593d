//! Glide Core
//!
//! Foundational types for the Glide momentum-scrolling crates.
//!
//! Positions and velocities are kept in `f64`: the deceleration curve raises
//! the decay rate to powers in the thousands, and single precision shows up as
//! visible jitter near the start and the end of a glide.
//!
//! # Example
//!
//! ```rust
//! use glide_core::{Point, Vec2};
//!
//! let start = Point::new(0.0, 50.0);
//! let moved = start + 0.5 * Vec2::new(0.0, -20.0);
//! assert_eq!(moved, Point::new(0.0, 40.0));
//! ```

pub mod geometry;

pub use geometry::{Point, Size, Vec2};
