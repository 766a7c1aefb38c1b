use serde::{Deserialize, Serialize};

/// Body returned by the store for update and delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultResponse {
    pub result: String,
}

/// Body returned by the store alongside a 4xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
