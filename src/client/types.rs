//! Wire types shared by the HTTP client and the backend API

use crate::conversation::{Reply, Role, Turn};
use serde::{Deserialize, Serialize};

/// One row of `GET /api/history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub role: Role,
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl HistoryEntry {
    pub fn into_turn(self) -> Turn {
        Turn {
            role: self.role,
            text: self.text,
            image_url: normalize_image_url(self.image_url),
        }
    }
}

/// Body of `POST /api/generate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
}

/// Successful answer of `POST /api/generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub text: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl GenerateResponse {
    pub fn into_reply(self) -> Reply {
        Reply {
            text: self.text,
            image_url: normalize_image_url(self.image_url),
        }
    }
}

/// Error body returned with non-2xx statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

fn normalize_image_url(url: Option<String>) -> Option<String> {
    url.filter(|u| !u.trim().is_empty())
}
