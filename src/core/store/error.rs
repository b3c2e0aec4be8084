use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state has no `{0}` entry")]
    MissingKey(String),

    #[error("state entry `{key}` is not a counter slice")]
    SliceType { key: String },

    #[error("unknown action: {0}")]
    UnknownAction(String),

    #[error("unknown selector: {0}")]
    UnknownSelector(String),

    #[error("action `{0}` requires an integer payload")]
    MissingPayload(String),

    #[error("invalid payload `{value}` for action `{name}`")]
    InvalidPayload { name: String, value: String },

    #[error("malformed action: {0}")]
    Json(#[from] serde_json::Error),

    #[error("delayed dispatch task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
