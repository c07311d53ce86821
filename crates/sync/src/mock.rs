use async_trait::async_trait;
use mockall::mock;
use seniorcare_core::{
    errors::CareResult,
    models::{
        friends::{FriendRequest, Friendship, NewFriendRequest, NewFriendship, Profile, RequestStatus},
        message::{ChatMessage, DirectMessage, NewChatMessage, NewDirectMessage},
        volunteer::{NewVolunteerChat, VolunteerChat},
    },
};
use uuid::Uuid;

use crate::backend::Backend;

// Mock backend for checking which requests a service issues
mock! {
    pub Backend {}

    #[async_trait]
    impl Backend for Backend {
        async fn find_profile_by_username(&self, username: &str) -> CareResult<Option<Profile>>;

        async fn insert_friend_request(&self, request: NewFriendRequest) -> CareResult<FriendRequest>;

        async fn pending_requests_for(&self, user_id: Uuid) -> CareResult<Vec<FriendRequest>>;

        async fn update_request_status(
            &self,
            request_id: Uuid,
            status: RequestStatus,
        ) -> CareResult<FriendRequest>;

        async fn insert_friendship(&self, friendship: NewFriendship) -> CareResult<Friendship>;

        async fn friends_of(&self, user_id: Uuid) -> CareResult<Vec<Friendship>>;

        async fn insert_direct_message(&self, message: NewDirectMessage) -> CareResult<DirectMessage>;

        async fn conversation(&self, a: Uuid, b: Uuid) -> CareResult<Vec<DirectMessage>>;

        async fn mark_conversation_read(&self, reader: Uuid, sender: Uuid) -> CareResult<usize>;

        async fn available_volunteers(&self, limit: usize) -> CareResult<Vec<Profile>>;

        async fn active_chat_for_elder(&self, elder_id: Uuid) -> CareResult<Option<VolunteerChat>>;

        async fn insert_volunteer_chat(&self, chat: NewVolunteerChat) -> CareResult<VolunteerChat>;

        async fn active_chats_for_volunteer(&self, volunteer_id: Uuid) -> CareResult<Vec<VolunteerChat>>;

        async fn insert_chat_message(&self, message: NewChatMessage) -> CareResult<ChatMessage>;

        async fn chat_messages(&self, chat_id: Uuid) -> CareResult<Vec<ChatMessage>>;
    }
}
