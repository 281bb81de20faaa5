//! Measures the cost of the non-blocking operations of `CountedEvent`.
//!
//! * `set` / `clear` - a lock acquisition plus a possible event transition.
//! * `set` / `clear` on a saturated or empty gate - the clamped no-op paths.
//! * `blocked` - a lock acquisition and a comparison.
//! * `wait` on an already-signaled gate - the uncontended fast path a consumer
//!   hits when signals accumulated while it was busy.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;

use counted_event::CountedEvent;
use criterion::{Criterion, criterion_group, criterion_main};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("counted_event");

    group.bench_function("set_clear_pair", |b| {
        let event = CountedEvent::new();

        b.iter(|| {
            event.set();
            event.clear();
        });
    });

    group.bench_function("set_saturated", |b| {
        let event = CountedEvent::with_count_and_ceiling(1, 1);

        b.iter(|| {
            event.set();
        });
    });

    group.bench_function("clear_empty", |b| {
        let event = CountedEvent::new();

        b.iter(|| {
            event.clear();
        });
    });

    group.bench_function("blocked", |b| {
        let event = CountedEvent::new();

        b.iter(|| black_box(event.blocked()));
    });

    group.bench_function("wait_already_signaled", |b| {
        let event = CountedEvent::with_count(1);

        b.iter(|| {
            event.wait();
        });
    });

    group.finish();
}
