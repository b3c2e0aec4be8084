pub mod action;
pub mod selector;
pub mod thunk;

use serde::{Deserialize, Serialize};
use tracing::instrument;

pub use action::CounterAction;
pub use thunk::increment_async;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterState {
    pub value: i64,
}

impl CounterState {
    /// Key the counter slice is stored under in the application state.
    pub const SLICE_NAME: &'static str = "counter";

    pub fn new(initial_value: i64) -> Self {
        tracing::info!("Creating a new counter with initial value: {}", initial_value);
        Self { value: initial_value }
    }

    #[instrument(name = "increment_counter", level = "debug")]
    pub fn increment(&self) -> Self {
        Self { value: self.value.wrapping_add(1) }
    }

    #[instrument(name = "decrement_counter", level = "debug")]
    pub fn decrement(&self) -> Self {
        Self { value: self.value.wrapping_sub(1) }
    }

    // amount is not validated, overflow wraps
    #[instrument(name = "increment_counter_by_amount", level = "debug")]
    pub fn increment_by_amount(&self, amount: i64) -> Self {
        Self { value: self.value.wrapping_add(amount) }
    }
}

/// Applies `action` to `state`, returning the next state. The old state is
/// left untouched.
pub fn counter_reducer(state: &CounterState, action: &CounterAction) -> CounterState {
    let next = match action {
        CounterAction::Increment => state.increment(),
        CounterAction::Decrement => state.decrement(),
        CounterAction::IncrementByAmount(amount) => state.increment_by_amount(*amount),
    };
    tracing::info!("Counter {} -> {} via {}", state.value, next.value, action.name());
    next
}
