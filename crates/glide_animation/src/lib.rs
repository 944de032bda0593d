//! Glide Animation System
//!
//! Closed-form momentum curves and the frame-driven runs that play them back.
//!
//! # Features
//!
//! - **Decay Curves**: Analytic position/duration for exponential velocity decay
//! - **Frame Clocks**: Abstract per-refresh tick source with cancellable registrations
//! - **Frame Drivers**: Progress sampling once per frame with exactly one completion
//! - **Deterministic Time**: `ManualFrameClock` for tests and offline simulation

pub mod decay;
pub mod frame_clock;
pub mod frame_driver;

pub use decay::DecayCurve;
pub use frame_clock::{FrameCallback, FrameCallbackId, FrameClock, ManualFrameClock};
pub use frame_driver::{FrameDriver, FrameDriverHandle};
