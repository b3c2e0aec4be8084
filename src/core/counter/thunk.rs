use tracing::instrument;

use crate::core::counter::CounterAction;
use crate::core::store::{DelayedDispatch, Store};

pub const INCREMENT_ASYNC: &str = "counter/incrementAsync";

/// Dispatches `IncrementByAmount(amount)` once the store's async delay has
/// elapsed. Dropping the returned handle leaves the dispatch scheduled.
#[instrument(name = "increment_async", level = "debug", skip(store))]
pub fn increment_async(store: &Store, amount: i64) -> DelayedDispatch {
    store.schedule(CounterAction::IncrementByAmount(amount), store.config().async_delay)
}
