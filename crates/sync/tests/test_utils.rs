#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use seniorcare_core::models::{
    friends::{FriendRequest, Profile, RequestStatus},
    message::DirectMessage,
};
use seniorcare_sync::{Backend, MemoryBackend};
use uuid::Uuid;

/// An in-memory backend with two registered users.
pub struct World {
    pub backend: Arc<MemoryBackend>,
    pub alice: Profile,
    pub bob: Profile,
}

impl World {
    pub fn new() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let alice = backend
            .add_profile("alice", Some("Alice Souza"))
            .expect("add alice");
        let bob = backend.add_profile("bob", None).expect("add bob");
        Self { backend, alice, bob }
    }

    pub fn backend(&self) -> Arc<dyn Backend> {
        self.backend.clone()
    }
}

pub fn pending_request(from: Uuid, to: Uuid) -> FriendRequest {
    let created = Utc.with_ymd_and_hms(2025, 8, 12, 9, 0, 0).unwrap();
    FriendRequest {
        id: Uuid::new_v4(),
        from_user_id: from,
        to_user_id: to,
        status: RequestStatus::Pending,
        created_at: created,
        updated_at: created,
    }
}

pub fn direct_message(from: Uuid, to: Uuid, content: &str, minute: u32) -> DirectMessage {
    DirectMessage {
        id: Uuid::new_v4(),
        from_user_id: from,
        to_user_id: to,
        content: content.to_string(),
        created_at: Utc.with_ymd_and_hms(2025, 8, 12, 10, minute, 0).unwrap(),
        read: false,
    }
}
