use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CareError, CareResult};

/// Upper bound on a direct message, counted in characters.
pub const MAX_DIRECT_MESSAGE_LEN: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectMessage {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl DirectMessage {
    /// Whether the message travels between `a` and `b`, in either direction.
    pub fn is_between(&self, a: Uuid, b: Uuid) -> bool {
        (self.from_user_id == a && self.to_user_id == b)
            || (self.from_user_id == b && self.to_user_id == a)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewDirectMessage {
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub content: String,
}

impl NewDirectMessage {
    pub fn new(from_user_id: Uuid, to_user_id: Uuid, content: &str) -> CareResult<Self> {
        let content = validate_content(content, Some(MAX_DIRECT_MESSAGE_LEN))?;
        Ok(Self {
            from_user_id,
            to_user_id,
            content,
        })
    }
}

/// A message inside a volunteer chat room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub chat_id: Uuid,
    pub from_user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewChatMessage {
    pub chat_id: Uuid,
    pub from_user_id: Uuid,
    pub content: String,
}

impl NewChatMessage {
    pub fn new(chat_id: Uuid, from_user_id: Uuid, content: &str) -> CareResult<Self> {
        let content = validate_content(content, None)?;
        Ok(Self {
            chat_id,
            from_user_id,
            content,
        })
    }
}

/// Trims message content and checks it against an optional length bound.
pub fn validate_content(content: &str, max_len: Option<usize>) -> CareResult<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(CareError::Validation("Message cannot be empty".to_string()));
    }

    if let Some(max) = max_len {
        let len = trimmed.chars().count();
        if len > max {
            return Err(CareError::Validation(format!(
                "Message is {} characters long, the limit is {}",
                len, max
            )));
        }
    }

    Ok(trimmed.to_string())
}
