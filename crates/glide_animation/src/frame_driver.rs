//! Frame-driven animation runs
//!
//! A run samples a unit-interval progress value once per frame tick and
//! completes exactly once: `on_complete(true)` after the tick that reaches the
//! full duration, or `on_complete(false)` when invalidated first. No sample is
//! ever delivered after completion, even if the clock still has a tick in
//! flight for the run.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use std::time::Duration;
//! use glide_animation::{FrameClock, FrameDriver, ManualFrameClock};
//!
//! let clock = Rc::new(ManualFrameClock::new());
//! let dyn_clock: Rc<dyn FrameClock> = clock.clone();
//!
//! let run = FrameDriver::start(
//!     &dyn_clock,
//!     Duration::from_millis(100),
//!     |progress| println!("progress {progress:.2}"),
//!     |finished| println!("finished: {finished}"),
//! );
//!
//! clock.run_until_idle(Duration::from_millis(16), 100);
//! assert!(!run.is_running());
//! ```

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crate::frame_clock::{FrameCallbackId, FrameClock};

type SampleFn = Box<dyn FnMut(f64)>;
type CompleteFn = Box<dyn FnOnce(bool)>;

/// State of a single run, shared between its clock callback and its handles
struct Run {
    running: Cell<bool>,
    started_at: Instant,
    duration: Duration,
    /// Elapsed time of the last sampled tick
    last_elapsed: Cell<Duration>,
    /// Weak: the clock owns our tick callback, which owns this run
    clock: Weak<dyn FrameClock>,
    registration: Cell<Option<FrameCallbackId>>,
    on_sample: RefCell<SampleFn>,
    on_complete: Cell<Option<CompleteFn>>,
}

impl Run {
    fn step(&self, now: Instant) {
        if !self.running.get() {
            tracing::debug!("Dropping stale frame tick for finished run");
            return;
        }

        let elapsed = now.saturating_duration_since(self.started_at);
        if elapsed >= self.duration {
            self.sample(1.0);
            self.finish(true);
        } else if elapsed <= self.last_elapsed.get() {
            // Progress only moves forward; a repeated timestamp has nothing new to show
            tracing::trace!("Dropping frame tick with no elapsed time");
        } else {
            self.last_elapsed.set(elapsed);
            self.sample(elapsed.as_secs_f64() / self.duration.as_secs_f64());
        }
    }

    fn sample(&self, progress: f64) {
        // A sampler that re-enters itself through the clock is skipped, not a panic
        if let Ok(mut on_sample) = self.on_sample.try_borrow_mut() {
            on_sample(progress);
        }
    }

    /// Transition to not-running; only the first call has any effect
    fn finish(&self, finished: bool) {
        if !self.running.replace(false) {
            return;
        }

        if let Some(id) = self.registration.take() {
            if let Some(clock) = self.clock.upgrade() {
                clock.unregister(id);
            }
        }

        tracing::debug!(
            "Frame driver run {} after {:.3}s",
            if finished { "finished" } else { "cancelled" },
            self.duration.as_secs_f64()
        );

        if let Some(on_complete) = self.on_complete.take() {
            on_complete(finished);
        }
    }
}

/// Starts frame-driven runs against a [`FrameClock`]
#[derive(Debug)]
pub struct FrameDriver;

impl FrameDriver {
    /// Start a run of `duration`, sampled once per tick of `clock`
    ///
    /// Nothing is invoked synchronously: the first sample arrives with the
    /// clock's next tick. A zero duration completes on that first tick with a
    /// single `on_sample(1.0)` followed by `on_complete(true)`.
    pub fn start<S, C>(
        clock: &Rc<dyn FrameClock>,
        duration: Duration,
        on_sample: S,
        on_complete: C,
    ) -> FrameDriverHandle
    where
        S: FnMut(f64) + 'static,
        C: FnOnce(bool) + 'static,
    {
        let run = Rc::new(Run {
            running: Cell::new(true),
            started_at: clock.now(),
            duration,
            last_elapsed: Cell::new(Duration::ZERO),
            clock: Rc::downgrade(clock),
            registration: Cell::new(None),
            on_sample: RefCell::new(Box::new(on_sample)),
            on_complete: Cell::new(Some(Box::new(on_complete))),
        });

        let ticked = Rc::clone(&run);
        let id = clock.register(Box::new(move |now| ticked.step(now)));
        run.registration.set(Some(id));

        tracing::debug!("Frame driver run started, duration={:.3}s", duration.as_secs_f64());

        FrameDriverHandle { run }
    }
}

/// Handle to a run started by [`FrameDriver::start`]
///
/// Clones share the same run. Dropping a handle does not cancel the run; only
/// [`FrameDriverHandle::invalidate`] does.
#[derive(Clone)]
pub struct FrameDriverHandle {
    run: Rc<Run>,
}

impl FrameDriverHandle {
    /// Cancel the run
    ///
    /// Fires `on_complete(false)` and releases the clock registration if the
    /// run is still going; otherwise does nothing. Safe to call from inside
    /// the run's own sample callback.
    pub fn invalidate(&self) {
        self.run.finish(false);
    }

    pub fn is_running(&self) -> bool {
        self.run.running.get()
    }

    pub fn duration(&self) -> Duration {
        self.run.duration
    }

    /// Whether both handles refer to the same run
    pub fn ptr_eq(&self, other: &FrameDriverHandle) -> bool {
        Rc::ptr_eq(&self.run, &other.run)
    }
}

impl std::fmt::Debug for FrameDriverHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDriverHandle")
            .field("running", &self.is_running())
            .field("duration", &self.run.duration)
            .finish()
    }
}
