use crate::core::store::{AppState, StoreError};

pub const SELECT_COUNT: &str = "counter/selectCount";

pub type Selector = fn(&AppState) -> Result<i64, StoreError>;

pub fn select_count(state: &AppState) -> Result<i64, StoreError> {
    state.counter().map(|counter| counter.value)
}

pub fn selector_by_name(name: &str) -> Option<Selector> {
    match name {
        SELECT_COUNT => Some(select_count),
        _ => None,
    }
}
