//! Message types for the conversation thread

use serde::{Deserialize, Serialize};
use std::fmt;

/// Greeting shown when the remote history is empty
pub const WELCOME_TEXT: &str = "Welcome to the AI Tattoo Studio! Describe the tattoo you have in mind \
(subject, style, placement, colours) and I'll design a concept for you.";

/// Shown as the only message when history could not be loaded
pub const CONNECTION_FAILED_TEXT: &str =
    "I couldn't connect to the tattoo studio. Please check that the backend is running and reload.";

/// Shown in place of a reply when the generation request fails
pub const GENERATION_FAILED_TEXT: &str =
    "Sorry, something went wrong while designing your tattoo. Please try again.";

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    /// Older backends label assistant turns `ai`
    #[serde(alias = "ai")]
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

/// Identifier of a message within a session.
///
/// Ids are handed out by [`IdAllocator`] in creation order, so comparing two
/// ids compares the order in which the messages were created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(u64);

impl MessageId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "msg-{}", self.0)
    }
}

/// Monotonic id counter owned by the conversation state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> MessageId {
        let id = MessageId(self.next);
        self.next += 1;
        id
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// One finalized turn in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Message {
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            role: Role::User,
            text: text.into(),
            image_url: None,
        }
    }

    pub fn assistant(id: MessageId, text: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            id,
            role: Role::Assistant,
            text: text.into(),
            image_url,
        }
    }
}

/// A prior turn as returned by the history store, before it gets a local id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
    pub image_url: Option<String>,
}

impl Turn {
    pub fn into_message(self, id: MessageId) -> Message {
        Message {
            id,
            role: self.role,
            text: self.text,
            image_url: self.image_url,
        }
    }
}

/// Assistant reply produced by the generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub image_url: Option<String>,
}

impl Reply {
    pub fn new(text: impl Into<String>, image_url: Option<String>) -> Self {
        Self {
            text: text.into(),
            image_url,
        }
    }
}
