//! # Response Formatting
//!
//! Small response bodies shared by the route handlers.

use serde::{Deserialize, Serialize};

/// Confirmation carrying the deleted id
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub id: u64,
}

/// Plain confirmation message
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BeerCreatedResponse {
    pub message: String,
    pub beer_id: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserCreatedResponse {
    pub message: String,
    pub user_id: u64,
}
