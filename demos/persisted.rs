//! Example: a counter that survives restarts.
//!
//! Each run loads the previous value from a JSON snapshot in the system
//! temp directory, bumps it, and saves it back on every change.

use std::cell::RefCell;
use std::rc::Rc;

use counter_kit::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = CounterConfig::from_toml_str("initial = 0\nmin = 0\nmax = 1000")?;
    let store = FileStore::open(std::env::temp_dir().join("counter-kit-demo"))?;
    println!("Snapshots live in {}", store.dir().display());

    let counter = BoundedCounter::rehydrate(config, &store, "visits")?;
    println!("Restored visits: {}", counter.value());

    let store = Rc::new(RefCell::new(store));
    counter.persist_on_change(Rc::clone(&store), "visits");

    counter.increment();
    println!("Visits now: {} (run again to see it grow)", counter.value());
    Ok(())
}
