use std::cell::Cell;
use std::rc::Rc;

use counter_kit::prelude::*;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_increment(c: &mut Criterion) {
    c.bench_function("BoundedCounter::increment x1000 (unbounded)", |b| {
        b.iter(|| {
            let counter = BoundedCounter::default();
            for _ in 0..1000 {
                counter.increment();
            }
            black_box(counter.value())
        })
    });

    c.bench_function("BoundedCounter::increment x1000 (saturating)", |b| {
        let config = CounterConfig::default().with_bounds(0, 10);
        b.iter(|| {
            let counter = BoundedCounter::new(config.clone()).unwrap();
            for _ in 0..1000 {
                counter.increment();
            }
            black_box(counter.value())
        })
    });
}

fn bench_dispatch(c: &mut Criterion) {
    let actions = [
        Action::Increment,
        Action::IncrementBy(7),
        Action::Decrement,
        Action::Set(-40),
        Action::Reset,
    ];

    c.bench_function("BoundedCounter::dispatch x1000", |b| {
        let config = CounterConfig::default().with_bounds(-50, 50);
        b.iter(|| {
            let counter = BoundedCounter::new(config.clone()).unwrap();
            for action in actions.iter().cycle().take(1000) {
                counter.dispatch(*action);
            }
            black_box(counter.value())
        })
    });
}

fn bench_notify(c: &mut Criterion) {
    let counter = BoundedCounter::new(CounterConfig::default().with_history_limit(0)).unwrap();
    let seen = Rc::new(Cell::new(0u64));
    for _ in 0..16 {
        let seen = Rc::clone(&seen);
        counter.subscribe(move |_| seen.set(seen.get() + 1));
    }

    c.bench_function("BoundedCounter::increment with 16 listeners", |b| {
        b.iter(|| black_box(counter.increment()))
    });
}

criterion_group!(benches, bench_increment, bench_dispatch, bench_notify);
criterion_main!(benches);
