use std::sync::Arc;

use seniorcare_core::{
    errors::{CareError, CareResult},
    models::friends::{FriendRequest, NewFriendRequest, NewFriendship, Profile, RequestAction},
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::Backend;
use crate::notice::report;

/// Result of a sent friend request, with the recipient for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SentRequest {
    pub request: FriendRequest,
    pub to: Profile,
}

pub struct FriendService {
    backend: Arc<dyn Backend>,
}

impl FriendService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Looks a user up by handle. Leading `@` and surrounding whitespace are
    /// ignored. An unknown handle is `Ok(None)`.
    pub async fn find_user(&self, handle: &str) -> CareResult<Option<Profile>> {
        let username = normalize_handle(handle)?;
        match self.backend.find_profile_by_username(username).await {
            Ok(found) => Ok(found),
            Err(CareError::NotFound(_)) => Ok(None),
            Err(e) => Err(report("Failed to look up user", e)),
        }
    }

    pub async fn send_request(&self, me: Uuid, handle: &str) -> CareResult<SentRequest> {
        let to = self
            .find_user(handle)
            .await?
            .ok_or_else(|| CareError::NotFound(format!("No user named {}", handle.trim())))?;

        let new_request = NewFriendRequest::new(me, to.id)?;
        let request = self
            .backend
            .insert_friend_request(new_request)
            .await
            .map_err(|e| report("Failed to send friend request", e))?;

        info!("Friend request {} sent to {}", request.id, to.username);
        Ok(SentRequest { request, to })
    }

    /// Accepts or rejects a request addressed to `me`.
    ///
    /// Accepting writes the status first, then one friendship row per
    /// direction. A failure part way leaves the earlier writes in place.
    pub async fn respond(
        &self,
        me: Uuid,
        request: &FriendRequest,
        action: RequestAction,
    ) -> CareResult<FriendRequest> {
        if request.to_user_id != me {
            return Err(CareError::Validation(
                "Friend request is not addressed to you".to_string(),
            ));
        }
        let status = request.status.apply(action)?;

        let updated = self
            .backend
            .update_request_status(request.id, status)
            .await
            .map_err(|e| report("Failed to update friend request", e))?;

        if action == RequestAction::Accept {
            self.backend
                .insert_friendship(NewFriendship {
                    user_id: me,
                    friend_user_id: request.from_user_id,
                })
                .await
                .map_err(|e| report("Failed to add friend", e))?;
            self.backend
                .insert_friendship(NewFriendship {
                    user_id: request.from_user_id,
                    friend_user_id: me,
                })
                .await
                .map_err(|e| report("Failed to add reverse friendship", e))?;
        }

        debug!("Friend request {} is now {}", updated.id, updated.status.as_str());
        Ok(updated)
    }
}

/// Trims a handle and strips a leading `@`.
pub fn normalize_handle(handle: &str) -> CareResult<&str> {
    let trimmed = handle.trim();
    let username = trimmed.strip_prefix('@').unwrap_or(trimmed).trim();
    if username.is_empty() {
        return Err(CareError::Validation("Username cannot be empty".to_string()));
    }
    Ok(username)
}
