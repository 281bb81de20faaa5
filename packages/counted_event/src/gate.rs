//! The counted gate itself.
//!
//! This module pairs a saturating counter with a manual-reset event. The event is the
//! thing threads block on; the counter is the source of truth that decides whether the
//! event is set. All mutation of the counter happens inside one critical section that
//! also updates the event, so no observer can see the two disagree.

use std::sync::Mutex;
use std::time::Duration;

use rsevents::{Awaitable, EventState, ManualResetEvent};

use crate::ERR_POISONED_LOCK;

/// A thread-safe gate whose signaled state is derived from a non-negative counter.
///
/// Unlike a plain binary event, a `CountedEvent` does not forget signals that arrive
/// while nobody is waiting: each [`set()`][Self::set] adds one to the counter and each
/// [`clear()`][Self::clear] removes one, and the gate is open exactly while the counter
/// is above zero. Producers and consumers therefore do not need to pair up one-for-one,
/// and a consumer that was busy during a burst of signals still sees the full burst.
///
/// An optional ceiling makes the counter saturating: once the counter reaches the
/// ceiling, further `set()` calls are discarded rather than accumulated.
///
/// The gate is a plain instantiable type with no global state; create one per
/// producer/consumer relationship and share it via `&CountedEvent` or
/// [`Arc`][std::sync::Arc].
///
/// # Waiting
///
/// [`wait()`][Self::wait] blocks until the gate is signaled; [`wait_for()`][Self::wait_for]
/// additionally gives up after a timeout. Release is broadcast-style: one `set()` releases
/// every thread currently blocked, with no ordering between them and no single-consumer
/// hand-off.
///
/// # Example
///
/// ```rust
/// use counted_event::CountedEvent;
///
/// let event = CountedEvent::new();
///
/// // Two signals arrive before anyone waits; neither is lost.
/// event.set();
/// event.set();
///
/// // The gate is already open, so this returns immediately.
/// event.wait();
///
/// // Consume the signals one at a time.
/// event.clear();
/// assert!(!event.blocked());
/// event.clear();
/// assert!(event.blocked());
/// ```
///
/// # Cross-thread example
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
///
/// use counted_event::CountedEvent;
///
/// let event = Arc::new(CountedEvent::new());
///
/// let consumer = thread::spawn({
///     let event = Arc::clone(&event);
///     move || {
///         event.wait();
///         event.clear();
///     }
/// });
///
/// event.set();
/// consumer.join().unwrap();
/// ```
#[derive(derive_more::Debug)]
pub struct CountedEvent {
    /// Number of outstanding signals. The exclusive lock serializing all mutation.
    count: Mutex<usize>,

    /// Saturation ceiling, fixed at construction. `None` means unbounded.
    ceiling: Option<usize>,

    /// The primitive threads actually block on. Set exactly while `count > 0`;
    /// only ever toggled while holding the `count` lock.
    #[debug(ignore)]
    signal: ManualResetEvent,
}

impl CountedEvent {
    /// Creates a new unsignaled gate with an unbounded counter.
    ///
    /// # Example
    ///
    /// ```rust
    /// use counted_event::CountedEvent;
    ///
    /// let event = CountedEvent::new();
    /// assert!(event.blocked());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::build(0, None)
    }

    /// Creates a gate that starts with `count` signals already accumulated.
    ///
    /// With a nonzero `count` the gate starts signaled, so the first waiter
    /// returns immediately.
    ///
    /// # Example
    ///
    /// ```rust
    /// use counted_event::CountedEvent;
    ///
    /// let event = CountedEvent::with_count(2);
    /// assert!(!event.blocked());
    /// assert_eq!(event.count(), 2);
    /// ```
    #[must_use]
    pub fn with_count(count: usize) -> Self {
        Self::build(count, None)
    }

    /// Creates a new unsignaled gate whose counter saturates at `ceiling`.
    ///
    /// Once the counter reaches the ceiling, further [`set()`][Self::set] calls are
    /// discarded - they are not queued or remembered beyond the cap.
    ///
    /// # Example
    ///
    /// ```rust
    /// use counted_event::CountedEvent;
    ///
    /// let event = CountedEvent::with_ceiling(3);
    ///
    /// for _ in 0..10 {
    ///     event.set();
    /// }
    ///
    /// assert_eq!(event.count(), 3);
    /// ```
    #[must_use]
    pub fn with_ceiling(ceiling: usize) -> Self {
        Self::build(0, Some(ceiling))
    }

    /// Creates a gate with both an initial count and a saturation ceiling.
    ///
    /// The initial count is clamped to the ceiling like any other transition.
    ///
    /// # Example
    ///
    /// ```rust
    /// use counted_event::CountedEvent;
    ///
    /// let event = CountedEvent::with_count_and_ceiling(5, 3);
    /// assert_eq!(event.count(), 3);
    /// ```
    #[must_use]
    pub fn with_count_and_ceiling(count: usize, ceiling: usize) -> Self {
        Self::build(count, Some(ceiling))
    }

    #[expect(
        clippy::mutex_integer,
        reason = "the lock also guards the paired manual-reset event, not just the integer"
    )]
    fn build(count: usize, ceiling: Option<usize>) -> Self {
        let count = ceiling.map_or(count, |ceiling| count.min(ceiling));

        Self {
            count: Mutex::new(count),
            ceiling,
            signal: ManualResetEvent::new(if count > 0 {
                EventState::Set
            } else {
                EventState::Unset
            }),
        }
    }

    /// Registers one signal: increments the counter (saturating at the ceiling, if any)
    /// and opens the gate.
    ///
    /// If this transitions the counter from zero, every thread currently blocked in
    /// [`wait()`][Self::wait] or [`wait_for()`][Self::wait_for] is released. If the gate
    /// was already signaled, the signal simply accumulates. Always succeeds.
    ///
    /// # Example
    ///
    /// ```rust
    /// use counted_event::CountedEvent;
    ///
    /// let event = CountedEvent::new();
    /// event.set();
    /// assert!(!event.blocked());
    /// ```
    pub fn set(&self) {
        let mut count = self.count.lock().expect(ERR_POISONED_LOCK);
        let target = count.saturating_add(1);
        self.transition(&mut count, target);
    }

    /// Consumes one signal: decrements the counter, clamped at zero.
    ///
    /// When the counter reaches zero the gate closes and subsequent waiters block.
    /// Calling this on an already-zero counter is a no-op.
    ///
    /// # Example
    ///
    /// ```rust
    /// use counted_event::CountedEvent;
    ///
    /// let event = CountedEvent::with_count(1);
    ///
    /// event.clear();
    /// assert!(event.blocked());
    ///
    /// // No underflow - the counter stays at zero.
    /// event.clear();
    /// assert_eq!(event.count(), 0);
    /// ```
    pub fn clear(&self) {
        let mut count = self.count.lock().expect(ERR_POISONED_LOCK);
        let target = count.saturating_sub(1);
        self.transition(&mut count, target);
    }

    /// Discards all accumulated signals at once, forcing the counter to zero and
    /// closing the gate.
    ///
    /// Intended for recovery paths that must drop every pending signal in one step
    /// rather than consuming them one [`clear()`][Self::clear] at a time.
    ///
    /// # Example
    ///
    /// ```rust
    /// use counted_event::CountedEvent;
    ///
    /// let event = CountedEvent::with_count(2);
    ///
    /// event.clear_completely();
    /// assert!(event.blocked());
    /// ```
    pub fn clear_completely(&self) {
        let mut count = self.count.lock().expect(ERR_POISONED_LOCK);
        self.transition(&mut count, 0);
    }

    /// Blocks the calling thread until the gate is signaled.
    ///
    /// Returns immediately if signals are already accumulated. The counter lock is
    /// never held while blocked, so other threads remain free to call
    /// [`set()`][Self::set] and [`clear()`][Self::clear] concurrently.
    ///
    /// # Example
    ///
    /// ```rust
    /// use counted_event::CountedEvent;
    ///
    /// let event = CountedEvent::with_count(1);
    ///
    /// // Already signaled, so this does not block.
    /// event.wait();
    /// ```
    pub fn wait(&self) {
        self.signal.wait();
    }

    /// Blocks the calling thread until the gate is signaled or `timeout` elapses,
    /// whichever comes first.
    ///
    /// Deliberately reports nothing about which of the two happened: callers that need
    /// to distinguish a real signal from a timeout re-check [`blocked()`][Self::blocked]
    /// after waking. This minimal contract is intentional, not an oversight - the
    /// polling loops this gate serves re-check their own state on every wake anyway.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::time::Duration;
    ///
    /// use counted_event::CountedEvent;
    ///
    /// let event = CountedEvent::new();
    ///
    /// event.wait_for(Duration::from_millis(10));
    ///
    /// if event.blocked() {
    ///     // Woke up because the timeout elapsed, not because of a signal.
    /// }
    /// ```
    pub fn wait_for(&self, timeout: Duration) {
        // The result (signaled vs. timed out) is dropped on purpose, per the contract.
        self.signal.wait_for(timeout);
    }

    /// Returns `true` if the counter is zero at the instant of the call, i.e. a call
    /// to [`wait()`][Self::wait] right now would block.
    ///
    /// # Example
    ///
    /// ```rust
    /// use counted_event::CountedEvent;
    ///
    /// let event = CountedEvent::new();
    /// assert!(event.blocked());
    ///
    /// event.set();
    /// assert!(!event.blocked());
    /// ```
    #[must_use]
    pub fn blocked(&self) -> bool {
        *self.count.lock().expect(ERR_POISONED_LOCK) == 0
    }

    /// Returns the number of signals currently accumulated.
    ///
    /// The value is a snapshot - by the time the caller looks at it, other threads may
    /// already have changed it. Use [`blocked()`][Self::blocked] when all that matters
    /// is whether the gate is open.
    ///
    /// # Example
    ///
    /// ```rust
    /// use counted_event::CountedEvent;
    ///
    /// let event = CountedEvent::new();
    ///
    /// event.set();
    /// event.set();
    ///
    /// assert_eq!(event.count(), 2);
    /// ```
    #[must_use]
    pub fn count(&self) -> usize {
        *self.count.lock().expect(ERR_POISONED_LOCK)
    }

    /// Moves the counter to `target` (clamped to the ceiling) and brings the blocking
    /// primitive in line with it, all under the caller's lock.
    ///
    /// Every counter mutation funnels through here so that `signaled == (count > 0)`
    /// holds whenever the lock is released.
    fn transition(&self, count: &mut usize, target: usize) {
        let clamped = self.ceiling.map_or(target, |ceiling| target.min(ceiling));

        *count = clamped;

        if clamped == 0 {
            self.signal.reset();
        } else {
            self.signal.set();
        }
    }
}

impl Default for CountedEvent {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(
    clippy::arithmetic_side_effects,
    clippy::items_after_statements,
    reason = "tests focus on succinct code and do not need to tick all the boxes"
)]
mod tests {
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::Instant;

    use static_assertions::assert_impl_all;

    use super::*;
    use crate::test_utils::with_watchdog;

    #[test]
    fn new_event_starts_blocked() {
        let event = CountedEvent::new();

        assert!(event.blocked());
        assert_eq!(event.count(), 0);
    }

    #[test]
    fn default_matches_new() {
        let event = CountedEvent::default();

        assert!(event.blocked());
        assert_eq!(event.count(), 0);
    }

    #[test]
    fn set_accumulates_without_a_waiter() {
        let event = CountedEvent::new();

        event.set();
        event.set();
        event.set();

        assert_eq!(event.count(), 3);
        assert!(!event.blocked());
    }

    #[test]
    fn clear_consumes_one_signal_at_a_time() {
        let event = CountedEvent::with_count(2);

        event.clear();
        assert_eq!(event.count(), 1);
        assert!(!event.blocked());

        event.clear();
        assert_eq!(event.count(), 0);
        assert!(event.blocked());
    }

    #[test]
    fn clear_on_zero_counter_is_a_no_op() {
        let event = CountedEvent::new();

        event.clear();

        assert_eq!(event.count(), 0);
        assert!(event.blocked());
    }

    #[test]
    fn ceiling_saturates_then_drains_to_zero() {
        let event = CountedEvent::with_ceiling(3);

        event.set();
        event.set();
        event.set();
        event.set();

        assert_eq!(event.count(), 3);
        assert!(!event.blocked());

        event.clear();
        event.clear();
        event.clear();

        assert_eq!(event.count(), 0);
        assert!(event.blocked());

        event.clear();

        assert_eq!(event.count(), 0);
        assert!(event.blocked());
    }

    #[test]
    fn clear_completely_discards_all_signals() {
        let event = CountedEvent::with_count(2);

        event.clear_completely();

        assert_eq!(event.count(), 0);
        assert!(event.blocked());
    }

    #[test]
    fn clear_completely_on_blocked_event_stays_blocked() {
        let event = CountedEvent::new();

        event.clear_completely();

        assert_eq!(event.count(), 0);
        assert!(event.blocked());
    }

    #[test]
    fn initial_count_is_clamped_to_ceiling() {
        let event = CountedEvent::with_count_and_ceiling(5, 3);

        assert_eq!(event.count(), 3);
    }

    #[test]
    fn zero_ceiling_never_signals() {
        let event = CountedEvent::with_ceiling(0);

        event.set();
        event.set();

        assert_eq!(event.count(), 0);
        assert!(event.blocked());
    }

    #[test]
    fn counter_follows_net_of_sets_and_clears() {
        let event = CountedEvent::with_ceiling(2);

        // Each step is (operation, expected counter afterwards), with the expectation
        // computed by hand from the clamp-at-zero/clamp-at-ceiling rules.
        let script: [(&dyn Fn(&CountedEvent), usize); 8] = [
            (&CountedEvent::set, 1),
            (&CountedEvent::set, 2),
            (&CountedEvent::set, 2),
            (&CountedEvent::clear, 1),
            (&CountedEvent::clear_completely, 0),
            (&CountedEvent::clear, 0),
            (&CountedEvent::set, 1),
            (&CountedEvent::clear, 0),
        ];

        for (index, (operation, expected)) in script.iter().enumerate() {
            operation(&event);

            assert_eq!(event.count(), *expected, "mismatch after step {index}");
            assert_eq!(event.blocked(), *expected == 0, "mismatch after step {index}");
        }
    }

    #[test]
    fn wait_returns_immediately_when_already_signaled() {
        with_watchdog(|| {
            let event = CountedEvent::with_count(1);

            // Would hang (and trip the watchdog) if accumulated signals were lost.
            event.wait();
        });
    }

    #[test]
    fn set_releases_blocked_waiter() {
        with_watchdog(|| {
            let event = Arc::new(CountedEvent::new());
            let start = Arc::new(Barrier::new(2));

            let waiter = thread::spawn({
                let event = Arc::clone(&event);
                let start = Arc::clone(&start);
                move || {
                    start.wait();
                    event.wait();
                }
            });

            start.wait();
            event.set();

            waiter.join().unwrap();
        });
    }

    #[test]
    fn set_releases_all_waiters_at_once() {
        with_watchdog(|| {
            const WAITERS: usize = 4;

            let event = Arc::new(CountedEvent::new());
            let start = Arc::new(Barrier::new(WAITERS + 1));

            let waiters: Vec<_> = (0..WAITERS)
                .map(|_| {
                    thread::spawn({
                        let event = Arc::clone(&event);
                        let start = Arc::clone(&start);
                        move || {
                            start.wait();
                            event.wait();
                        }
                    })
                })
                .collect();

            start.wait();

            // One signal opens the gate for every waiter - release is broadcast-style,
            // not a single-consumer hand-off.
            event.set();

            for waiter in waiters {
                waiter.join().unwrap();
            }
        });
    }

    #[test]
    fn wait_for_on_never_signaled_event_times_out() {
        with_watchdog(|| {
            const TIMEOUT: Duration = Duration::from_millis(100);

            let event = CountedEvent::new();
            let started = Instant::now();

            event.wait_for(TIMEOUT);

            assert!(started.elapsed() >= TIMEOUT);
            assert!(event.blocked());
        });
    }

    #[test]
    fn wait_for_returns_promptly_when_signaled() {
        with_watchdog(|| {
            let event = CountedEvent::with_count(1);

            // A generous timeout that the watchdog would catch us sleeping through.
            event.wait_for(Duration::from_secs(60));

            assert!(!event.blocked());
        });
    }

    #[test]
    fn signals_survive_concurrent_producers() {
        with_watchdog(|| {
            const PRODUCERS: usize = 4;
            const SIGNALS_PER_PRODUCER: usize = 100;

            let event = Arc::new(CountedEvent::new());

            let producers: Vec<_> = (0..PRODUCERS)
                .map(|_| {
                    thread::spawn({
                        let event = Arc::clone(&event);
                        move || {
                            for _ in 0..SIGNALS_PER_PRODUCER {
                                event.set();
                            }
                        }
                    })
                })
                .collect();

            for producer in producers {
                producer.join().unwrap();
            }

            assert_eq!(event.count(), PRODUCERS * SIGNALS_PER_PRODUCER);
        });
    }

    #[test]
    fn thread_safe_type() {
        assert_impl_all!(CountedEvent: Send, Sync);
    }
}
