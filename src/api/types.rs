//! API request and response types

use crate::conversation::Role;
use crate::db::{Turn, TurnRole};
use serde::Serialize;

pub use crate::client::types::{ErrorResponse, GenerateRequest, GenerateResponse, HistoryEntry};

/// Response of `GET /`
#[derive(Debug, Serialize)]
pub struct WelcomeResponse {
    pub message: &'static str,
}

/// Response of `GET /api/test`
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub data: &'static str,
}

impl From<Turn> for HistoryEntry {
    fn from(turn: Turn) -> Self {
        let role = match turn.role {
            TurnRole::User => Role::User,
            TurnRole::Ai => Role::Assistant,
        };
        Self {
            id: turn.id,
            role,
            text: turn.prompt_text,
            image_url: turn.generated_image_url,
        }
    }
}
