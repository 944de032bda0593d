//! Frame clocks
//!
//! A frame clock delivers one tick per display refresh to every registered
//! callback, passing the monotonic timestamp of that refresh. Registrations
//! are explicit: whoever registers a callback owns the returned id and must
//! unregister it.

use std::cell::{Cell, RefCell};
use std::time::{Duration, Instant};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Registration handle for a per-frame callback
    pub struct FrameCallbackId;
}

/// Callback invoked once per refresh with the frame timestamp
pub type FrameCallback = Box<dyn FnMut(Instant)>;

/// Per-refresh tick source
///
/// Implementations deliver ticks on a single scheduling context, in strictly
/// increasing timestamp order, at most once per refresh per registration.
pub trait FrameClock {
    /// Current monotonic time on this clock
    fn now(&self) -> Instant;

    /// Start delivering ticks to `callback`
    fn register(&self, callback: FrameCallback) -> FrameCallbackId;

    /// Stop delivering ticks; returns false if `id` was not registered
    fn unregister(&self, id: FrameCallbackId) -> bool;
}

/// A frame clock whose time only moves when told to
///
/// Used for tests and offline simulation. Callbacks may register or
/// unregister callbacks (including themselves) while being ticked.
pub struct ManualFrameClock {
    now: Cell<Instant>,
    frame: Cell<u64>,
    /// `None` while the callback is checked out for invocation
    callbacks: RefCell<SlotMap<FrameCallbackId, Option<FrameCallback>>>,
}

impl ManualFrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            now: Cell::new(now),
            frame: Cell::new(0),
            callbacks: RefCell::new(SlotMap::with_key()),
        }
    }

    /// Move time forward by `dt` and deliver one tick
    ///
    /// `dt` should be non-zero; a zero step repeats the previous timestamp.
    pub fn advance(&self, dt: Duration) {
        self.now.set(self.now.get() + dt);
        self.tick();
    }

    /// Deliver one tick at the current time without advancing it
    pub(crate) fn tick(&self) {
        let now = self.now.get();
        self.frame.set(self.frame.get() + 1);

        // Snapshot: callbacks registered during this tick first run on the next one
        let ids: SmallVec<[FrameCallbackId; 4]> = self.callbacks.borrow().keys().collect();

        for id in ids {
            let callback = self.callbacks.borrow_mut().get_mut(id).and_then(Option::take);
            let Some(mut callback) = callback else {
                continue;
            };

            callback(now);

            // Unregistered while running: the slot is gone and the callback drops here
            if let Some(slot) = self.callbacks.borrow_mut().get_mut(id) {
                *slot = Some(callback);
            }
        }
    }

    /// Tick every `frame_interval` until nothing is registered or `max_frames` is hit
    ///
    /// Returns the number of frames delivered.
    pub fn run_until_idle(&self, frame_interval: Duration, max_frames: u64) -> u64 {
        let mut frames = 0;
        while self.has_callbacks() && frames < max_frames {
            self.advance(frame_interval);
            frames += 1;
        }
        frames
    }

    /// Number of ticks delivered so far
    pub fn frame_count(&self) -> u64 {
        self.frame.get()
    }

    pub fn callback_count(&self) -> usize {
        self.callbacks.borrow().len()
    }

    pub fn has_callbacks(&self) -> bool {
        !self.callbacks.borrow().is_empty()
    }
}

impl Default for ManualFrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ManualFrameClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualFrameClock")
            .field("frame", &self.frame.get())
            .field("callbacks", &self.callback_count())
            .finish()
    }
}

impl FrameClock for ManualFrameClock {
    fn now(&self) -> Instant {
        self.now.get()
    }

    fn register(&self, callback: FrameCallback) -> FrameCallbackId {
        self.callbacks.borrow_mut().insert(Some(callback))
    }

    fn unregister(&self, id: FrameCallbackId) -> bool {
        self.callbacks.borrow_mut().remove(id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_advance_delivers_timestamps() {
        let start = Instant::now();
        let clock = ManualFrameClock::starting_at(start);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        clock.register(Box::new(move |now| seen_clone.borrow_mut().push(now)));

        clock.advance(Duration::from_millis(16));
        clock.advance(Duration::from_millis(16));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0], start + Duration::from_millis(16));
        assert_eq!(seen[1], start + Duration::from_millis(32));
        assert_eq!(clock.frame_count(), 2);
    }

    #[test]
    fn test_unregister_stops_ticks() {
        let clock = ManualFrameClock::new();
        let count = Rc::new(Cell::new(0));

        let count_clone = count.clone();
        let id = clock.register(Box::new(move |_| count_clone.set(count_clone.get() + 1)));

        clock.tick();
        assert!(clock.unregister(id));
        assert!(!clock.unregister(id));
        clock.tick();

        assert_eq!(count.get(), 1);
        assert!(!clock.has_callbacks());
    }

    #[test]
    fn test_callback_can_unregister_itself() {
        let clock = Rc::new(ManualFrameClock::new());
        let own_id = Rc::new(Cell::new(None));
        let count = Rc::new(Cell::new(0));

        let weak_clock = Rc::downgrade(&clock);
        let own_id_clone = own_id.clone();
        let count_clone = count.clone();
        let id = clock.register(Box::new(move |_| {
            count_clone.set(count_clone.get() + 1);
            if let (Some(clock), Some(id)) = (weak_clock.upgrade(), own_id_clone.get()) {
                clock.unregister(id);
            }
        }));
        own_id.set(Some(id));

        clock.tick();
        clock.tick();

        assert_eq!(count.get(), 1);
        assert_eq!(clock.callback_count(), 0);
    }

    #[test]
    fn test_registration_during_tick_waits_for_next_frame() {
        let clock = Rc::new(ManualFrameClock::new());
        let inner_count = Rc::new(Cell::new(0));

        let weak_clock = Rc::downgrade(&clock);
        let inner_count_clone = inner_count.clone();
        let registered = Rc::new(Cell::new(false));
        clock.register(Box::new(move |_| {
            if registered.replace(true) {
                return;
            }
            if let Some(clock) = weak_clock.upgrade() {
                let inner = inner_count_clone.clone();
                clock.register(Box::new(move |_| inner.set(inner.get() + 1)));
            }
        }));

        clock.tick();
        assert_eq!(inner_count.get(), 0);
        assert_eq!(clock.callback_count(), 2);

        clock.tick();
        assert_eq!(inner_count.get(), 1);
    }

    #[test]
    fn test_run_until_idle_respects_frame_cap() {
        let clock = ManualFrameClock::new();
        clock.register(Box::new(|_| {}));

        let frames = clock.run_until_idle(Duration::from_millis(16), 5);
        assert_eq!(frames, 5);
        assert!(clock.has_callbacks());

        let idle = ManualFrameClock::new();
        assert_eq!(idle.run_until_idle(Duration::from_millis(16), 5), 0);
    }
}
