//! Momentum decelerator
//!
//! Bridges a release event to a running [`FrameDriver`]. On `decelerate`, the
//! target's current offset and the (scaled) release velocity define a
//! [`DecayCurve`]; every frame the curve is sampled at `progress * duration`,
//! the vertical offset is clamped into the scrollable range, and the result
//! is written back to the target.
//!
//! Only the vertical axis is driven. The horizontal release velocity feeds the
//! curve unscaled but the target's horizontal offset is never written.
//!
//! Nothing here reports errors: a released target, a finished run, or a
//! degenerate velocity all quietly result in no motion.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use glide_animation::{DecayCurve, FrameClock, FrameDriver, FrameDriverHandle};
use glide_core::Vec2;

use crate::config::DecelerationConfig;
use crate::rate::{DecelerationRate, DecelerationRequest};
use crate::target::ScrollTarget;

/// The run currently owned by a decelerator
struct ActiveRun {
    /// Generation, so a late completion never clears a newer run
    id: u64,
    handle: FrameDriverHandle,
}

/// Drives momentum glides onto a scroll target
///
/// Holds the target weakly; the target's owner decides its lifetime. At most
/// one glide runs per decelerator: starting a new one cancels the previous.
pub struct Decelerator<T: ScrollTarget + 'static> {
    target: Weak<RefCell<T>>,
    clock: Rc<dyn FrameClock>,
    config: DecelerationConfig,
    active: Rc<RefCell<Option<ActiveRun>>>,
    next_run_id: Cell<u64>,
}

impl<T: ScrollTarget + 'static> Decelerator<T> {
    /// Create a decelerator with the default configuration
    pub fn new(target: &Rc<RefCell<T>>, clock: Rc<dyn FrameClock>) -> Self {
        Self::with_config(target, clock, DecelerationConfig::default())
    }

    /// Create a decelerator with explicit tuning
    pub fn with_config(
        target: &Rc<RefCell<T>>,
        clock: Rc<dyn FrameClock>,
        config: DecelerationConfig,
    ) -> Self {
        Self {
            target: Rc::downgrade(target),
            clock,
            config,
            active: Rc::new(RefCell::new(None)),
            next_run_id: Cell::new(0),
        }
    }

    pub fn config(&self) -> &DecelerationConfig {
        &self.config
    }

    /// Whether a glide is currently running
    pub fn is_decelerating(&self) -> bool {
        self.active
            .borrow()
            .as_ref()
            .is_some_and(|run| run.handle.is_running())
    }

    /// Handle to the running glide, if any
    pub fn current_run(&self) -> Option<FrameDriverHandle> {
        self.active.borrow().as_ref().map(|run| run.handle.clone())
    }

    /// Convenience for [`Decelerator::decelerate`]
    pub fn decelerate_with(&self, velocity: Vec2, rate: DecelerationRate) {
        self.decelerate(DecelerationRequest::new(velocity, rate));
    }

    /// Start a glide from the target's current offset
    ///
    /// Any glide still running is cancelled first.
    pub fn decelerate(&self, request: DecelerationRequest) {
        let Some(target) = self.target.upgrade() else {
            tracing::debug!("Ignoring deceleration: scroll target released");
            return;
        };
        let Ok(initial_position) = target.try_borrow().map(|target| target.position()) else {
            tracing::debug!("Ignoring deceleration: scroll target busy");
            return;
        };

        self.cancel_active();

        let velocity = Vec2::new(
            request.velocity.x,
            request.velocity.y * self.config.velocity_scale(),
        );
        let curve = DecayCurve::new(
            initial_position,
            velocity,
            self.config.rate(request.rate),
            self.config.threshold,
        );
        let duration = curve.duration();
        let duration_secs = duration.as_secs_f64();

        tracing::debug!(
            "Decelerating from y={:.1} velocity_y={:.1} rate={} duration={:.3}s stop_y={:.1}",
            initial_position.y,
            request.velocity.y,
            request.rate,
            duration_secs,
            curve.stop_position().y
        );

        let toward_start = request.velocity.y < 0.0;
        let sample_target = self.target.clone();
        let on_sample = move |progress: f64| {
            let Some(target) = sample_target.upgrade() else {
                return;
            };
            let Ok(mut target) = target.try_borrow_mut() else {
                tracing::debug!("Skipping deceleration frame: scroll target busy");
                return;
            };

            let point = curve.position_at(progress * duration_secs);
            let y = clamp_offset(
                point.y,
                toward_start,
                target.content_extent(),
                target.viewport_extent(),
            );
            let position = target.position().with_y(y);
            target.set_position(position);

            tracing::trace!(
                "Deceleration progress={:.3} curve_y={:.1} offset_y={:.1}",
                progress,
                point.y,
                y
            );
        };

        let run_id = self.next_run_id.get();
        self.next_run_id.set(run_id + 1);
        let active = Rc::downgrade(&self.active);
        let on_complete = move |finished: bool| {
            tracing::debug!("Deceleration run {} ended, finished={}", run_id, finished);
            let Some(active) = active.upgrade() else {
                return;
            };
            let Ok(mut active) = active.try_borrow_mut() else {
                return;
            };
            if active.as_ref().is_some_and(|run| run.id == run_id) {
                *active = None;
            }
        };

        let handle = FrameDriver::start(&self.clock, duration, on_sample, on_complete);
        *self.active.borrow_mut() = Some(ActiveRun { id: run_id, handle });
    }

    /// Cancel the running glide if the user has re-engaged the target
    ///
    /// A released target counts as re-engaged: the glide has nothing left to
    /// drive, so its frame registration is released too. So does a target
    /// that is mutably borrowed elsewhere, typically by the gesture handler
    /// making this call.
    pub fn invalidate_if_needed(&self) {
        let Some(target) = self.target.upgrade() else {
            self.cancel_active();
            return;
        };

        let interacting = match target.try_borrow() {
            Ok(target) => target.is_user_interacting(),
            Err(_) => {
                tracing::debug!("Scroll target busy, treating as user interaction");
                true
            }
        };

        if interacting {
            self.cancel_active();
        }
    }

    fn cancel_active(&self) {
        // Take the run out first: its completion callback borrows `active`
        let previous = self.active.borrow_mut().take();
        if let Some(run) = previous {
            if run.handle.is_running() {
                tracing::debug!("Cancelling deceleration run {}", run.id);
            }
            run.handle.invalidate();
        }
    }
}

impl<T: ScrollTarget + 'static> Drop for Decelerator<T> {
    fn drop(&mut self) {
        self.cancel_active();
    }
}

impl<T: ScrollTarget + 'static> std::fmt::Debug for Decelerator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decelerator")
            .field("config", &self.config)
            .field("decelerating", &self.is_decelerating())
            .finish()
    }
}

/// Clamp a sampled vertical offset into the scrollable range
///
/// Gliding toward the start only guards the leading edge; gliding toward the
/// end guards both.
fn clamp_offset(y: f64, toward_start: bool, content_extent: f64, viewport_extent: f64) -> f64 {
    if toward_start {
        y.max(0.0)
    } else {
        y.min(content_extent - viewport_extent).max(0.0)
    }
}
