//! Producer/consumer threads coordinating through the counted gate.
//!
//! A consumer sleeps in `wait_for()` until work appears or a deadline passes, then
//! drains whatever accumulated, clearing one signal per unit of work consumed. The
//! consumer never loses signals that arrive while it is busy draining.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use counted_event::CountedEvent;

const BATCHES: usize = 5;
const WORK_ITEMS: usize = BATCHES * 2;

fn main() {
    println!("=== CountedEvent across threads ===");

    let new_work = Arc::new(CountedEvent::new());

    let consumer = thread::spawn({
        let new_work = Arc::clone(&new_work);
        move || {
            let mut processed = 0;

            while processed < WORK_ITEMS {
                // Sleep until work appears or the poll deadline passes. The wake does
                // not say which happened, so we check blocked() ourselves.
                new_work.wait_for(Duration::from_millis(100));

                if new_work.blocked() {
                    println!("[consumer] poll deadline passed, nothing to do yet");
                    continue;
                }

                while !new_work.blocked() {
                    new_work.clear();
                    processed += 1;
                    println!("[consumer] processed item {processed}");
                }
            }

            processed
        }
    });

    // Produce in uneven bursts so some signals accumulate while the consumer is busy.
    for batch in 0..BATCHES {
        new_work.set();
        new_work.set();
        println!("[producer] published batch {batch} of 2 items");
        thread::sleep(Duration::from_millis(30));
    }

    let processed = consumer.join().unwrap();
    println!("\nConsumer processed {processed} of {WORK_ITEMS} items - none were lost");
}
