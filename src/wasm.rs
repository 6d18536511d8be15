//! WebAssembly bindings for counter-kit.
//!
//! Enable with the `wasm` feature:
//!
//! ```toml
//! [dependencies]
//! counter-kit = { version = "0.1", features = ["wasm"] }
//! ```
//!
//! Only the synchronous surface is exposed. A JavaScript host drives the
//! latency-bound mutation itself and calls `incrementBy` when it resolves.

use tracing::warn;
use wasm_bindgen::prelude::*;

use crate::{CounterConfig, CounterEvent};

// ── BoundedCounter ──────────────────────────────────────────────────

/// A bounded counter for use from JavaScript.
#[wasm_bindgen(js_name = BoundedCounter)]
pub struct WasmBoundedCounter {
    inner: crate::BoundedCounter,
}

#[wasm_bindgen(js_class = BoundedCounter)]
impl WasmBoundedCounter {
    /// Create a counter. Throws if the configuration is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(
        initial: i64,
        step: i64,
        min: Option<i64>,
        max: Option<i64>,
    ) -> Result<WasmBoundedCounter, JsError> {
        let config = CounterConfig {
            initial,
            step,
            min,
            max,
            ..CounterConfig::default()
        };
        let inner = crate::BoundedCounter::new(config)?;
        Ok(Self { inner })
    }

    /// Add one step.
    pub fn increment(&self) -> i64 {
        self.inner.increment()
    }

    /// Subtract one step.
    pub fn decrement(&self) -> i64 {
        self.inner.decrement()
    }

    /// Add a signed amount.
    #[wasm_bindgen(js_name = incrementBy)]
    pub fn increment_by(&self, amount: i64) -> i64 {
        self.inner.increment_by(amount)
    }

    /// Return to the initial value.
    pub fn reset(&self) -> i64 {
        self.inner.reset()
    }

    /// Jump to a target, clamped into bounds.
    pub fn set(&self, target: i64) -> i64 {
        self.inner.set(target)
    }

    /// Current value.
    #[wasm_bindgen(getter)]
    pub fn value(&self) -> i64 {
        self.inner.value()
    }

    /// Whether an asynchronous mutation is in flight.
    #[wasm_bindgen(getter, js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.inner.is_loading()
    }

    /// Call `callback(current, previous)` after every value change.
    pub fn subscribe(&self, callback: js_sys::Function) {
        self.inner.subscribe(move |event| {
            if let CounterEvent::ValueChanged { previous, current } = *event {
                if let Err(err) = callback.call2(
                    &JsValue::NULL,
                    &JsValue::from(current),
                    &JsValue::from(previous),
                ) {
                    warn!(error = ?err, previous, current, "counter subscriber threw");
                }
            }
        });
    }
}
