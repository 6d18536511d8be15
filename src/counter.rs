use core::convert::Infallible;
use core::future::Future;
use core::time::Duration;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::action::{Action, Limits};
use crate::history::History;
use crate::observer::{CounterEvent, Observers, SubscriptionId};
use crate::{AlreadyInProgress, AsyncStatus, Bounds, ConfigurationError, CounterConfig, CounterState};

/// An observable integer clamped into static bounds.
///
/// All mutators take `&self`: the counter is a single-threaded store with
/// interior mutability, shared by reference between the code that drives it
/// and any asynchronous mutation in flight. It is `!Sync`.
///
/// # Example
///
/// ```
/// use counter_kit::{BoundedCounter, CounterConfig};
///
/// let counter = BoundedCounter::new(
///     CounterConfig::default().with_initial(5).with_bounds(0, 10),
/// )
/// .unwrap();
///
/// for _ in 0..6 {
///     counter.decrement();
/// }
/// assert_eq!(counter.value(), 0);
///
/// counter.set(99);
/// assert_eq!(counter.value(), 10);
///
/// counter.reset();
/// assert_eq!(counter.value(), 5);
/// ```
///
/// # Asynchronous increments
///
/// [`increment_async`](Self::increment_async) flips the loading flag before
/// it returns, so a second call is rejected even if the first future has
/// not been polled yet:
///
/// ```
/// use counter_kit::{AlreadyInProgress, BoundedCounter};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let counter = BoundedCounter::default();
/// let pending = counter.increment_async().unwrap();
/// assert!(counter.is_loading());
/// assert_eq!(counter.increment_async().err(), Some(AlreadyInProgress));
///
/// assert_eq!(pending.await, 1);
/// assert!(!counter.is_loading());
/// # }
/// ```
#[derive(Debug)]
pub struct BoundedCounter {
    limits: Limits,
    latency: Duration,
    value: Cell<i64>,
    status: Cell<AsyncStatus>,
    history: RefCell<History>,
    observers: Observers,
}

impl BoundedCounter {
    /// Build a counter from `config`.
    ///
    /// Fails if `step <= 0`, `min > max`, or `initial` lies outside
    /// `[min, max]`. The initial value is never clamped into range.
    pub fn new(config: CounterConfig) -> Result<Self, ConfigurationError> {
        let bounds = config.validate()?;
        Ok(Self::from_parts(&config, bounds, config.initial))
    }

    /// Build a counter whose current value differs from `initial`.
    ///
    /// `value` must already lie inside `bounds`.
    pub(crate) fn from_parts(config: &CounterConfig, bounds: Bounds, value: i64) -> Self {
        debug_assert!(bounds.contains(value));
        let mut history = History::new(config.history_limit, config.initial);
        if value != config.initial {
            history.record(value);
        }
        Self {
            limits: Limits {
                initial: config.initial,
                step: config.step,
                bounds,
            },
            latency: config.latency(),
            value: Cell::new(value),
            status: Cell::new(AsyncStatus::Idle),
            history: RefCell::new(history),
            observers: Observers::default(),
        }
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.value.get()
    }

    /// Whether an asynchronous mutation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.status.get().is_loading()
    }

    /// Status of the asynchronous mutator.
    #[must_use]
    pub fn status(&self) -> AsyncStatus {
        self.status.get()
    }

    /// Value restored by [`reset`](Self::reset).
    #[must_use]
    pub fn initial(&self) -> i64 {
        self.limits.initial
    }

    /// Magnitude of each step.
    #[must_use]
    pub fn step(&self) -> i64 {
        self.limits.step
    }

    /// Clamping interval.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.limits.bounds
    }

    /// Simulated latency of the asynchronous mutator.
    #[must_use]
    pub fn latency(&self) -> Duration {
        self.latency
    }

    /// Snapshot of the whole counter.
    #[must_use]
    pub fn state(&self) -> CounterState {
        CounterState {
            value: self.value(),
            initial: self.limits.initial,
            step: self.limits.step,
            bounds: self.limits.bounds,
            status: self.status(),
        }
    }

    /// Values the counter has held, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<i64> {
        self.history.borrow().to_vec()
    }

    /// Add one step. A no-op at the upper bound.
    pub fn increment(&self) -> i64 {
        self.dispatch(Action::Increment)
    }

    /// Subtract one step. A no-op at the lower bound.
    pub fn decrement(&self) -> i64 {
        self.dispatch(Action::Decrement)
    }

    /// Add a signed `amount`, clamped into bounds.
    pub fn increment_by(&self, amount: i64) -> i64 {
        self.dispatch(Action::IncrementBy(amount))
    }

    /// Return to the initial value. Always notifies listeners.
    pub fn reset(&self) -> i64 {
        self.dispatch(Action::Reset)
    }

    /// Jump to `target`, clamped into bounds.
    pub fn set(&self, target: i64) -> i64 {
        self.dispatch(Action::Set(target))
    }

    /// Apply an [`Action`] and return the new value.
    pub fn dispatch(&self, action: Action) -> i64 {
        let previous = self.value.get();
        let current = action.apply(previous, &self.limits);
        if action == Action::Reset {
            self.value.set(current);
            self.history.borrow_mut().restart(current);
            trace!(previous, current, "counter reset");
            self.observers
                .notify(CounterEvent::ValueChanged { previous, current });
        } else {
            self.commit(previous, current);
        }
        current
    }

    /// Start an asynchronous increment by one step.
    ///
    /// See [`increment_async_by`](Self::increment_async_by).
    pub fn increment_async(
        &self,
    ) -> Result<impl Future<Output = i64> + '_, AlreadyInProgress> {
        self.increment_async_by(self.limits.step)
    }

    /// Start an asynchronous increment by `amount`.
    ///
    /// The loading flag is raised before this returns. The returned future
    /// waits for the configured latency, applies `clamp(value + amount)`,
    /// lowers the flag, and resolves to the new value. The value is not
    /// touched while the future is pending.
    ///
    /// On success listeners see [`CounterEvent::ValueChanged`] first, while
    /// [`is_loading`](Self::is_loading) still reports `true`, and then
    /// [`CounterEvent::LoadingChanged`] with `loading: false`. A listener that
    /// needs the settled status should wait for the latter.
    ///
    /// Fails with [`AlreadyInProgress`] if another asynchronous mutation has
    /// not settled yet.
    pub fn increment_async_by(
        &self,
        amount: i64,
    ) -> Result<impl Future<Output = i64> + '_, AlreadyInProgress> {
        let latency = self.latency;
        let pending = self.try_increment_async(async move {
            tokio::time::sleep(latency).await;
            Ok::<_, Infallible>(amount)
        })?;
        Ok(async move {
            match pending.await {
                Ok(value) => value,
                Err(never) => match never {},
            }
        })
    }

    /// Start an asynchronous increment whose amount comes from `operation`.
    ///
    /// Same guard and loading transition as
    /// [`increment_async_by`](Self::increment_async_by). When `operation`
    /// yields `Ok(amount)` the amount is applied and the status becomes
    /// [`AsyncStatus::Succeeded`]. When it yields `Err(e)` the value is left
    /// alone, the status becomes [`AsyncStatus::Failed`], and `e` is returned.
    /// No retry is attempted.
    ///
    /// Dropping the returned future before it completes lowers the loading
    /// flag without applying anything.
    pub fn try_increment_async<'a, F, E>(
        &'a self,
        operation: F,
    ) -> Result<impl Future<Output = Result<i64, E>> + 'a, AlreadyInProgress>
    where
        F: Future<Output = Result<i64, E>> + 'a,
        E: 'a,
    {
        let in_flight = self.begin_loading()?;
        Ok(async move {
            match operation.await {
                Ok(amount) => Ok(in_flight.settle(Some(amount))),
                Err(err) => {
                    in_flight.settle(None);
                    Err(err)
                }
            }
        })
    }

    /// Register a listener for value and loading changes.
    ///
    /// Listeners run synchronously, in registration order, after each
    /// mutation is applied.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&CounterEvent) + 'static,
    {
        self.observers.subscribe(Rc::new(listener))
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.observers.len()
    }

    fn commit(&self, previous: i64, current: i64) {
        if previous == current {
            return;
        }
        self.value.set(current);
        self.history.borrow_mut().record(current);
        trace!(previous, current, "counter value changed");
        self.observers
            .notify(CounterEvent::ValueChanged { previous, current });
    }

    fn begin_loading(&self) -> Result<InFlight<'_>, AlreadyInProgress> {
        if self.is_loading() {
            debug!("rejected asynchronous increment: one is already in flight");
            return Err(AlreadyInProgress);
        }
        self.status.set(AsyncStatus::Loading);
        debug!(value = self.value(), "asynchronous increment started");
        self.observers
            .notify(CounterEvent::LoadingChanged { loading: true });
        Ok(InFlight {
            counter: self,
            settled: false,
        })
    }

    fn finish_loading(&self, amount: Option<i64>) -> i64 {
        let status = match amount {
            Some(amount) => {
                let previous = self.value.get();
                self.commit(previous, self.limits.bounds.offset(previous, amount));
                AsyncStatus::Succeeded
            }
            None => AsyncStatus::Failed,
        };
        self.status.set(status);
        debug!(value = self.value(), ?status, "asynchronous increment settled");
        self.observers
            .notify(CounterEvent::LoadingChanged { loading: false });
        self.value.get()
    }
}

impl Default for BoundedCounter {
    fn default() -> Self {
        let config = CounterConfig::default();
        Self::from_parts(&config, Bounds::UNBOUNDED, config.initial)
    }
}

/// Lowers the loading flag exactly once, even if the owning future is
/// dropped before it settles.
struct InFlight<'a> {
    counter: &'a BoundedCounter,
    settled: bool,
}

impl InFlight<'_> {
    fn settle(mut self, amount: Option<i64>) -> i64 {
        self.settled = true;
        self.counter.finish_loading(amount)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(
            value = self.counter.value(),
            "asynchronous increment dropped before completion; nothing applied"
        );
        self.counter.status.set(AsyncStatus::Idle);
        self.counter
            .observers
            .notify(CounterEvent::LoadingChanged { loading: false });
    }
}
