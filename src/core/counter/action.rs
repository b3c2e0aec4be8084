use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::store::StoreError;

pub const INCREMENT: &str = "counter/increment";
pub const DECREMENT: &str = "counter/decrement";
pub const INCREMENT_BY_AMOUNT: &str = "counter/incrementByAmount";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum CounterAction {
    #[serde(rename = "counter/increment")]
    Increment,
    #[serde(rename = "counter/decrement")]
    Decrement,
    #[serde(rename = "counter/incrementByAmount")]
    IncrementByAmount(i64),
}

impl CounterAction {
    pub fn name(&self) -> &'static str {
        match self {
            CounterAction::Increment => INCREMENT,
            CounterAction::Decrement => DECREMENT,
            CounterAction::IncrementByAmount(_) => INCREMENT_BY_AMOUNT,
        }
    }

    /// Resolves a synchronous action from its registered name.
    pub fn from_named(name: &str, payload: Option<i64>) -> Result<Self, StoreError> {
        match name {
            INCREMENT => Ok(CounterAction::Increment),
            DECREMENT => Ok(CounterAction::Decrement),
            INCREMENT_BY_AMOUNT => payload
                .map(CounterAction::IncrementByAmount)
                .ok_or_else(|| StoreError::MissingPayload(name.to_string())),
            _ => Err(StoreError::UnknownAction(name.to_string())),
        }
    }

    /// The integer payload, for actions that carry one.
    pub fn payload(&self) -> Option<i64> {
        match self {
            CounterAction::IncrementByAmount(amount) => Some(*amount),
            _ => None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let action = serde_json::from_str(json)?;
        debug!("Deserialized action: {:?}", action);
        Ok(action)
    }
}

/// Adds the `counter/` prefix to bare action names.
pub fn qualify(name: &str) -> String {
    if name.contains('/') {
        name.to_string()
    } else {
        format!("{}/{}", super::CounterState::SLICE_NAME, name)
    }
}
