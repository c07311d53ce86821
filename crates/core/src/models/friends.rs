use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CareError, CareResult};

/// Whether an account belongs to an elder or to a volunteer helping them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Idoso,
    Voluntario,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Idoso => "idoso",
            UserType::Voluntario => "voluntario",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub nome: Option<String>,
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub user_type: Option<UserType>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl Profile {
    /// Name shown to other users, falling back to the handle.
    pub fn display_name(&self) -> &str {
        self.nome
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.username)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAction {
    Accept,
    Reject,
}

impl RequestStatus {
    /// Applies an answer to a request. Only pending requests can be answered.
    pub fn apply(self, action: RequestAction) -> CareResult<RequestStatus> {
        match (self, action) {
            (RequestStatus::Pending, RequestAction::Accept) => Ok(RequestStatus::Accepted),
            (RequestStatus::Pending, RequestAction::Reject) => Ok(RequestStatus::Rejected),
            (status, _) => Err(CareError::Validation(format!(
                "Friend request was already {}",
                status.as_str()
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Accepted => "accepted",
            RequestStatus::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequest {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFriendRequest {
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub status: RequestStatus,
}

impl NewFriendRequest {
    pub fn new(from_user_id: Uuid, to_user_id: Uuid) -> CareResult<Self> {
        if from_user_id == to_user_id {
            return Err(CareError::Validation(
                "You cannot send a friend request to yourself".to_string(),
            ));
        }
        Ok(Self {
            from_user_id,
            to_user_id,
            status: RequestStatus::Pending,
        })
    }
}

/// One direction of a friendship. Acceptance creates one row per direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friendship {
    pub id: Uuid,
    pub user_id: Uuid,
    pub friend_user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewFriendship {
    pub user_id: Uuid,
    pub friend_user_id: Uuid,
}
