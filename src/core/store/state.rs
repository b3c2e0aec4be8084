use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::StoreError;
use crate::core::counter::CounterState;

/// One named entry of the application state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Slice {
    Counter(CounterState),
    /// State owned by some other part of the application.
    Opaque(serde_json::Value),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppState {
    slices: BTreeMap<String, Slice>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counter(counter: CounterState) -> Self {
        let mut state = Self::new();
        state.insert(CounterState::SLICE_NAME, Slice::Counter(counter));
        info!("App state initialized: {:?}", state);
        state
    }

    pub fn insert(&mut self, key: impl Into<String>, slice: Slice) -> Option<Slice> {
        self.slices.insert(key.into(), slice)
    }

    pub fn get(&self, key: &str) -> Option<&Slice> {
        self.slices.get(key)
    }

    pub fn counter(&self) -> Result<&CounterState, StoreError> {
        match self.get(CounterState::SLICE_NAME) {
            Some(Slice::Counter(counter)) => Ok(counter),
            Some(Slice::Opaque(_)) => Err(StoreError::SliceType {
                key: CounterState::SLICE_NAME.to_string(),
            }),
            None => Err(StoreError::MissingKey(CounterState::SLICE_NAME.to_string())),
        }
    }
}
