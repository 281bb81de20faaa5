//! A counted, resettable gate for coordinating producer/consumer signaling across threads.
//!
//! The crate provides a single primitive, [`CountedEvent`]: a thread-safe gate holding a
//! non-negative counter and a derived binary signaled state. The gate is open exactly
//! while the counter is above zero, so signals that arrive while no thread is waiting
//! accumulate instead of being lost, and consumers do not have to consume one-for-one
//! with producers.
//!
//! This sits between a plain binary event (which collapses any number of signals into
//! one) and a full semaphore (which hands exactly one permit to exactly one waiter):
//! release here is broadcast-style, and the counter exists purely so the gate knows
//! when to close again.
//!
//! An optional ceiling turns the counter into a saturating one - once the counter
//! reaches the ceiling, further signals are silently discarded.
//!
//! # Usage pattern
//!
//! The intended consumers are polling loops that want to sleep until work appears:
//!
//! * a producer calls [`CountedEvent::set`] whenever an event of interest occurs;
//! * the consumer calls [`CountedEvent::wait_for`] in a loop to sleep until work
//!   appears or a deadline passes;
//! * the consumer calls [`CountedEvent::clear`] once a unit of signaled work has
//!   been consumed;
//! * the consumer checks [`CountedEvent::blocked`] to decide whether a wake was a
//!   real signal or just the timeout elapsing.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//!
//! use counted_event::CountedEvent;
//!
//! let new_work = Arc::new(CountedEvent::new());
//!
//! let worker = thread::spawn({
//!     let new_work = Arc::clone(&new_work);
//!     move || {
//!         let mut processed = 0;
//!
//!         while processed < 3 {
//!             new_work.wait();
//!
//!             while !new_work.blocked() {
//!                 new_work.clear();
//!                 processed += 1;
//!             }
//!         }
//!
//!         processed
//!     }
//! });
//!
//! for _ in 0..3 {
//!     new_work.set();
//! }
//!
//! assert_eq!(worker.join().unwrap(), 3);
//! ```

mod constants;
mod gate;

#[cfg(test)]
mod test_utils;

pub(crate) use constants::*;
pub use gate::CountedEvent;
