//! Testing utilities for the `counted_event` crate.
//!
//! A gate primitive mostly gets tested by blocking threads on it, so every test that
//! waits on another thread runs under a watchdog that turns a lost wakeup into a
//! test failure instead of a hung test run.

#[cfg(test)]
use std::sync::mpsc;
#[cfg(test)]
use std::thread;
#[cfg(test)]
use std::time::Duration;

/// Runs a test with a 10-second timeout to prevent infinite hangs.
/// If the test does not complete within 10 seconds, the function will panic.
#[cfg(test)]
pub(crate) fn with_watchdog<F, R>(test_fn: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    // Run the test in a separate thread so the watchdog can keep observing it.
    let test_handle = thread::spawn(move || {
        let result = test_fn();
        // Send the result back - if this fails, the receiver has timed out.
        drop(tx.send(result));
    });

    match rx.recv_timeout(Duration::from_secs(10)) {
        Ok(result) => {
            // Test completed in time, join the thread to clean up.
            test_handle.join().expect("test thread should not panic");
            result
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            panic!("test exceeded 10-second watchdog - likely stuck in wait()");
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            // Thread panicked, join it to propagate the panic.
            match test_handle.join() {
                Ok(()) => panic!("test thread disconnected unexpectedly"),
                Err(e) => std::panic::resume_unwind(e),
            }
        }
    }
}
