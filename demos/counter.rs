//! Example: a bounded counter driven like a UI would drive it.
//!
//! Run with `RUST_LOG=counter_kit=trace` to see every change.

use std::time::Duration;

use counter_kit::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Bounded Counter ===\n");

    let counter = BoundedCounter::new(
        CounterConfig::default()
            .with_initial(5)
            .with_bounds(0, 10)
            .with_latency(Duration::from_millis(300)),
    )
    .expect("valid config");

    counter.subscribe(|event| match event {
        CounterEvent::ValueChanged { previous, current } => {
            println!("  value {previous} -> {current}");
        }
        CounterEvent::LoadingChanged { loading } => {
            println!("  loading: {loading}");
        }
    });

    // A user mashing "-" past the lower bound
    for _ in 0..6 {
        counter.decrement();
    }
    println!("After six decrements: {}", counter.value());

    counter.set(42);
    println!("After set(42): {} (clamped)", counter.value());

    counter.reset();
    println!("After reset: {}", counter.value());

    println!("\n--- Async increment ---");
    let pending = counter.increment_async().expect("idle counter");
    if let Err(err) = counter.increment_async() {
        println!("Second click ignored: {err}");
    }
    println!("Resolved to {}", pending.await);

    let state = counter.state();
    println!(
        "\nFinal: value={} doubled={} at_max={} history={:?}",
        state.value,
        state.doubled(),
        state.at_max(),
        counter.history()
    );
}
