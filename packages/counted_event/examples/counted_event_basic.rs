//! Single-threaded walkthrough of the counted gate.
//!
//! Shows how signals accumulate while nobody is waiting, how the optional ceiling
//! caps that accumulation, and how the gate closes again once every signal has
//! been consumed.

use counted_event::CountedEvent;

fn main() {
    println!("=== CountedEvent basics ===");

    // Signals accumulate instead of collapsing into a single flag.
    println!("\n1. Accumulation:");
    let event = CountedEvent::new();
    event.set();
    event.set();
    event.set();
    println!("After three set() calls the count is {}", event.count());

    // The gate is open, so waiting does not block.
    event.wait();
    println!("wait() returned immediately - the gate was already open");

    // Each clear() consumes exactly one signal.
    println!("\n2. Draining:");
    while !event.blocked() {
        event.clear();
        println!("Consumed one signal, {} remaining", event.count());
    }
    println!("blocked() is now {}", event.blocked());

    // A ceiling makes the counter saturating.
    println!("\n3. Saturation ceiling:");
    let capped = CountedEvent::with_ceiling(3);
    for attempt in 1..=5 {
        capped.set();
        println!("set() call {attempt}: count is {}", capped.count());
    }

    // A hard reset discards every pending signal in one step.
    println!("\n4. Hard reset:");
    capped.clear_completely();
    println!(
        "After clear_completely() the count is {} and blocked() is {}",
        capped.count(),
        capped.blocked()
    );

    println!("\nExample completed successfully!");
}
