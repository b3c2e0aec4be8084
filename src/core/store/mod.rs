pub mod error;
pub mod state;
pub mod store_config;

pub use error::StoreError;
pub use state::{AppState, Slice};
pub use store_config::{get_store_config, StoreConfig};

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, Instrument};

use crate::core::counter::selector::selector_by_name;
use crate::core::counter::thunk::INCREMENT_ASYNC;
use crate::core::counter::{counter_reducer, increment_async, CounterAction, CounterState};

/// Holds the application state and applies counter transitions one at a
/// time. Clones share the same state.
#[derive(Debug, Clone)]
pub struct Store {
    state: Arc<Mutex<AppState>>,
    config: StoreConfig,
}

/// Result of a dispatch by name.
#[derive(Debug)]
pub enum Dispatched {
    Applied(CounterState),
    Scheduled(DelayedDispatch),
}

impl Store {
    pub fn new(config: StoreConfig) -> Self {
        let state = AppState::with_counter(CounterState::new(config.initial_value));
        Self::with_state(config, state)
    }

    pub fn with_state(config: StoreConfig, state: AppState) -> Self {
        info!("Creating store with config: {:?}", config);
        Store {
            state: Arc::new(Mutex::new(state)),
            config,
        }
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Applies `action` against the current state. Waiting dispatches are
    /// served in the order they arrived.
    #[instrument(name = "dispatch", level = "debug", skip(self))]
    pub async fn dispatch(&self, action: CounterAction) -> Result<CounterState, StoreError> {
        let mut state = self.state.lock().await;
        apply(&mut state, &action)
    }

    #[instrument(name = "dispatch_named", level = "debug", skip(self))]
    pub async fn dispatch_named(
        &self,
        name: &str,
        payload: Option<i64>,
    ) -> Result<Dispatched, StoreError> {
        if name == INCREMENT_ASYNC {
            let amount = payload.ok_or_else(|| StoreError::MissingPayload(name.to_string()))?;
            return Ok(Dispatched::Scheduled(increment_async(self, amount)));
        }
        let action = CounterAction::from_named(name, payload)?;
        Ok(Dispatched::Applied(self.dispatch(action).await?))
    }

    /// Dispatches `action` after `delay` on a spawned task. Must be called
    /// from within a tokio runtime.
    ///
    /// The task holds only a weak reference to the state, so it does nothing
    /// if every `Store` handle has been dropped by the time it fires.
    pub fn schedule(&self, action: CounterAction, delay: Duration) -> DelayedDispatch {
        let state = Arc::downgrade(&self.state);
        let deadline = Instant::now() + delay;
        debug!("Scheduling {} in {:?}", action.name(), delay);

        let task = async move {
            tokio::time::sleep_until(deadline).await;

            let Some(state) = state.upgrade() else {
                debug!("Store dropped before {} fired, skipping", action.name());
                return Ok(None);
            };
            let mut state = state.lock().await;
            match apply(&mut state, &action) {
                Ok(next) => Ok(Some(next)),
                Err(e) => {
                    error!("Delayed {} failed: {}", action.name(), e);
                    Err(e)
                }
            }
        };
        let handle = tokio::spawn(task.in_current_span());

        DelayedDispatch { handle }
    }

    /// Snapshot of the whole application state.
    pub async fn state(&self) -> AppState {
        self.state.lock().await.clone()
    }

    pub async fn select<T>(&self, selector: impl FnOnce(&AppState) -> T) -> T {
        let state = self.state.lock().await;
        selector(&*state)
    }

    pub async fn select_named(&self, name: &str) -> Result<i64, StoreError> {
        let selector =
            selector_by_name(name).ok_or_else(|| StoreError::UnknownSelector(name.to_string()))?;
        self.select(selector).await
    }
}

fn apply(state: &mut AppState, action: &CounterAction) -> Result<CounterState, StoreError> {
    let next = counter_reducer(state.counter()?, action);
    state.insert(CounterState::SLICE_NAME, Slice::Counter(next));
    Ok(next)
}

/// Handle to a scheduled dispatch.
#[derive(Debug)]
pub struct DelayedDispatch {
    handle: JoinHandle<Result<Option<CounterState>, StoreError>>,
}

impl DelayedDispatch {
    /// Cancels the dispatch if it has not fired yet.
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the dispatch to fire. Returns the new counter state, or
    /// `None` when it was aborted or the store was gone. Must not be called
    /// again once it has returned.
    pub async fn wait(&mut self) -> Result<Option<CounterState>, StoreError> {
        match (&mut self.handle).await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Ok(None),
            Err(e) => Err(StoreError::Join(e)),
        }
    }
}
