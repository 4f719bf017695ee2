use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("resource id is empty")]
    EmptyId,

    #[error("resource {id} has invalid cost per token {cost}")]
    InvalidCost { id: String, cost: f64 },

    #[error("failed to parse catalog: {0}")]
    Catalog(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RouteError>;
