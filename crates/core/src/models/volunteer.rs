use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CareError, CareResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatStatus {
    Active,
    Closed,
}

impl ChatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatStatus::Active => "active",
            ChatStatus::Closed => "closed",
        }
    }
}

/// A support chat pairing an elder with a volunteer.
///
/// An elder holds at most one active chat at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolunteerChat {
    pub id: Uuid,
    pub volunteer_id: Uuid,
    pub elder_id: Uuid,
    pub status: ChatStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VolunteerChat {
    pub fn is_active(&self) -> bool {
        self.status == ChatStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewVolunteerChat {
    pub volunteer_id: Uuid,
    pub elder_id: Uuid,
    pub status: ChatStatus,
}

impl NewVolunteerChat {
    pub fn new(volunteer_id: Uuid, elder_id: Uuid) -> CareResult<Self> {
        if volunteer_id == elder_id {
            return Err(CareError::Validation(
                "A volunteer cannot open a support chat with themselves".to_string(),
            ));
        }
        Ok(Self {
            volunteer_id,
            elder_id,
            status: ChatStatus::Active,
        })
    }
}
