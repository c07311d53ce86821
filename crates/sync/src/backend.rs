use async_trait::async_trait;
use seniorcare_core::{
    errors::CareResult,
    models::{
        friends::{FriendRequest, Friendship, NewFriendRequest, NewFriendship, Profile, RequestStatus},
        message::{ChatMessage, DirectMessage, NewChatMessage, NewDirectMessage},
        volunteer::{NewVolunteerChat, VolunteerChat},
    },
};
use uuid::Uuid;

/// Row-level operations the client issues against the hosted backend.
///
/// Implementations report a duplicate pending friend request as
/// [`CareError::Conflict`](seniorcare_core::errors::CareError::Conflict)
/// and transport or service failures as `Backend`.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn find_profile_by_username(&self, username: &str) -> CareResult<Option<Profile>>;

    async fn insert_friend_request(&self, request: NewFriendRequest) -> CareResult<FriendRequest>;

    /// Pending requests addressed to `user_id`, newest first.
    async fn pending_requests_for(&self, user_id: Uuid) -> CareResult<Vec<FriendRequest>>;

    async fn update_request_status(
        &self,
        request_id: Uuid,
        status: RequestStatus,
    ) -> CareResult<FriendRequest>;

    async fn insert_friendship(&self, friendship: NewFriendship) -> CareResult<Friendship>;

    async fn friends_of(&self, user_id: Uuid) -> CareResult<Vec<Friendship>>;

    async fn insert_direct_message(&self, message: NewDirectMessage) -> CareResult<DirectMessage>;

    /// Messages between two users in either direction, oldest first.
    async fn conversation(&self, a: Uuid, b: Uuid) -> CareResult<Vec<DirectMessage>>;

    /// Marks unread messages from `sender` to `reader` as read. Returns how
    /// many changed.
    async fn mark_conversation_read(&self, reader: Uuid, sender: Uuid) -> CareResult<usize>;

    /// Up to `limit` profiles registered as volunteers.
    async fn available_volunteers(&self, limit: usize) -> CareResult<Vec<Profile>>;

    /// The elder's active support chat, if one is open.
    async fn active_chat_for_elder(&self, elder_id: Uuid) -> CareResult<Option<VolunteerChat>>;

    async fn insert_volunteer_chat(&self, chat: NewVolunteerChat) -> CareResult<VolunteerChat>;

    /// Active chats assigned to a volunteer, most recently updated first.
    async fn active_chats_for_volunteer(&self, volunteer_id: Uuid) -> CareResult<Vec<VolunteerChat>>;

    async fn insert_chat_message(&self, message: NewChatMessage) -> CareResult<ChatMessage>;

    /// Messages in a volunteer chat room, oldest first.
    async fn chat_messages(&self, chat_id: Uuid) -> CareResult<Vec<ChatMessage>>;
}
