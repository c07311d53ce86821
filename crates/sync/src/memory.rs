use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use seniorcare_core::{
    errors::{CareError, CareResult},
    models::{
        friends::{
            FriendRequest, Friendship, NewFriendRequest, NewFriendship, Profile, RequestStatus,
            UserType,
        },
        message::{ChatMessage, DirectMessage, NewChatMessage, NewDirectMessage},
        volunteer::{ChatStatus, NewVolunteerChat, VolunteerChat},
    },
};
use uuid::Uuid;

use crate::backend::Backend;
use crate::feed::{Change, ChangeFeed, LocalFeed, Record, Scope, Subscription};

#[derive(Default)]
struct Tables {
    profiles: Vec<Profile>,
    requests: Vec<FriendRequest>,
    friends: Vec<Friendship>,
    messages: Vec<DirectMessage>,
    volunteer_chats: Vec<VolunteerChat>,
    chat_messages: Vec<ChatMessage>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl Tables {
    /// Strictly increasing timestamps, so ordering by creation is stable.
    fn next_timestamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let ts = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(ts);
        ts
    }
}

/// Backend kept entirely in memory that echoes every write through its own
/// change feed, the way the hosted service does.
pub struct MemoryBackend {
    tables: Mutex<Tables>,
    feed: LocalFeed,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            feed: LocalFeed::default(),
        }
    }

    pub fn feed(&self) -> &LocalFeed {
        &self.feed
    }

    /// Registers an elder's profile.
    pub fn add_profile(&self, username: &str, nome: Option<&str>) -> CareResult<Profile> {
        self.register(username, nome, UserType::Idoso)
    }

    pub fn add_volunteer(&self, username: &str, nome: Option<&str>) -> CareResult<Profile> {
        self.register(username, nome, UserType::Voluntario)
    }

    /// Changes a chat's status, as the volunteer closing a chat would.
    pub fn set_chat_status(&self, chat_id: Uuid, status: ChatStatus) -> CareResult<VolunteerChat> {
        let updated = {
            let mut tables = self.tables()?;
            let now = tables.next_timestamp();
            let chat = tables
                .volunteer_chats
                .iter_mut()
                .find(|c| c.id == chat_id)
                .ok_or_else(|| CareError::NotFound(format!("Volunteer chat {} not found", chat_id)))?;
            chat.status = status;
            chat.updated_at = now;
            chat.clone()
        };

        self.feed.publish(Change::update(Record::VolunteerChat(updated.clone())));
        Ok(updated)
    }

    fn register(&self, username: &str, nome: Option<&str>, user_type: UserType) -> CareResult<Profile> {
        let profile = Profile {
            id: Uuid::new_v4(),
            username: username.to_string(),
            nome: nome.map(str::to_string),
            avatar_url: None,
            user_type: Some(user_type),
            bio: None,
        };
        self.tables()?.profiles.push(profile.clone());
        Ok(profile)
    }

    fn tables(&self) -> CareResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| CareError::Backend("in-memory backend lock poisoned".to_string()))
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn find_profile_by_username(&self, username: &str) -> CareResult<Option<Profile>> {
        Ok(self
            .tables()?
            .profiles
            .iter()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn insert_friend_request(&self, request: NewFriendRequest) -> CareResult<FriendRequest> {
        let inserted = {
            let mut tables = self.tables()?;
            let duplicate = tables.requests.iter().any(|r| {
                r.status == RequestStatus::Pending
                    && r.from_user_id == request.from_user_id
                    && r.to_user_id == request.to_user_id
            });
            if request.status == RequestStatus::Pending && duplicate {
                return Err(CareError::Conflict(
                    "duplicate key value violates unique constraint on pending friendship_requests"
                        .to_string(),
                ));
            }

            let now = tables.next_timestamp();
            let inserted = FriendRequest {
                id: Uuid::new_v4(),
                from_user_id: request.from_user_id,
                to_user_id: request.to_user_id,
                status: request.status,
                created_at: now,
                updated_at: now,
            };
            tables.requests.push(inserted.clone());
            inserted
        };

        self.feed.publish(Change::insert(Record::FriendRequest(inserted.clone())));
        Ok(inserted)
    }

    async fn pending_requests_for(&self, user_id: Uuid) -> CareResult<Vec<FriendRequest>> {
        let mut pending: Vec<FriendRequest> = self
            .tables()?
            .requests
            .iter()
            .filter(|r| r.to_user_id == user_id && r.status == RequestStatus::Pending)
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(pending)
    }

    async fn update_request_status(
        &self,
        request_id: Uuid,
        status: RequestStatus,
    ) -> CareResult<FriendRequest> {
        let updated = {
            let mut tables = self.tables()?;
            let now = tables.next_timestamp();
            let request = tables
                .requests
                .iter_mut()
                .find(|r| r.id == request_id)
                .ok_or_else(|| CareError::NotFound(format!("Friend request {} not found", request_id)))?;
            request.status = status;
            request.updated_at = now;
            request.clone()
        };

        self.feed.publish(Change::update(Record::FriendRequest(updated.clone())));
        Ok(updated)
    }

    async fn insert_friendship(&self, friendship: NewFriendship) -> CareResult<Friendship> {
        let inserted = {
            let mut tables = self.tables()?;
            let inserted = Friendship {
                id: Uuid::new_v4(),
                user_id: friendship.user_id,
                friend_user_id: friendship.friend_user_id,
                created_at: tables.next_timestamp(),
            };
            tables.friends.push(inserted.clone());
            inserted
        };

        self.feed.publish(Change::insert(Record::Friendship(inserted.clone())));
        Ok(inserted)
    }

    async fn friends_of(&self, user_id: Uuid) -> CareResult<Vec<Friendship>> {
        Ok(self
            .tables()?
            .friends
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn insert_direct_message(&self, message: NewDirectMessage) -> CareResult<DirectMessage> {
        let inserted = {
            let mut tables = self.tables()?;
            let inserted = DirectMessage {
                id: Uuid::new_v4(),
                from_user_id: message.from_user_id,
                to_user_id: message.to_user_id,
                content: message.content,
                created_at: tables.next_timestamp(),
                read: false,
            };
            tables.messages.push(inserted.clone());
            inserted
        };

        self.feed.publish(Change::insert(Record::DirectMessage(inserted.clone())));
        Ok(inserted)
    }

    async fn conversation(&self, a: Uuid, b: Uuid) -> CareResult<Vec<DirectMessage>> {
        let mut messages: Vec<DirectMessage> = self
            .tables()?
            .messages
            .iter()
            .filter(|m| m.is_between(a, b))
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }

    async fn mark_conversation_read(&self, reader: Uuid, sender: Uuid) -> CareResult<usize> {
        let updated: Vec<DirectMessage> = {
            let mut tables = self.tables()?;
            let updated = tables
                .messages
                .iter_mut()
                .filter(|m| m.to_user_id == reader && m.from_user_id == sender && !m.read)
                .map(|m| {
                    m.read = true;
                    m.clone()
                })
                .collect();
            updated
        };

        for message in &updated {
            self.feed.publish(Change::update(Record::DirectMessage(message.clone())));
        }
        Ok(updated.len())
    }

    async fn available_volunteers(&self, limit: usize) -> CareResult<Vec<Profile>> {
        Ok(self
            .tables()?
            .profiles
            .iter()
            .filter(|p| p.user_type == Some(UserType::Voluntario))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn active_chat_for_elder(&self, elder_id: Uuid) -> CareResult<Option<VolunteerChat>> {
        Ok(self
            .tables()?
            .volunteer_chats
            .iter()
            .find(|c| c.elder_id == elder_id && c.is_active())
            .cloned())
    }

    async fn insert_volunteer_chat(&self, chat: NewVolunteerChat) -> CareResult<VolunteerChat> {
        let inserted = {
            let mut tables = self.tables()?;
            let now = tables.next_timestamp();
            let inserted = VolunteerChat {
                id: Uuid::new_v4(),
                volunteer_id: chat.volunteer_id,
                elder_id: chat.elder_id,
                status: chat.status,
                created_at: now,
                updated_at: now,
            };
            tables.volunteer_chats.push(inserted.clone());
            inserted
        };

        self.feed.publish(Change::insert(Record::VolunteerChat(inserted.clone())));
        Ok(inserted)
    }

    async fn active_chats_for_volunteer(&self, volunteer_id: Uuid) -> CareResult<Vec<VolunteerChat>> {
        let mut chats: Vec<VolunteerChat> = self
            .tables()?
            .volunteer_chats
            .iter()
            .filter(|c| c.volunteer_id == volunteer_id && c.is_active())
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(chats)
    }

    async fn insert_chat_message(&self, message: NewChatMessage) -> CareResult<ChatMessage> {
        let inserted = {
            let mut tables = self.tables()?;
            let inserted = ChatMessage {
                id: Uuid::new_v4(),
                chat_id: message.chat_id,
                from_user_id: message.from_user_id,
                content: message.content,
                created_at: tables.next_timestamp(),
                read: false,
            };
            tables.chat_messages.push(inserted.clone());
            inserted
        };

        self.feed.publish(Change::insert(Record::ChatMessage(inserted.clone())));
        Ok(inserted)
    }

    async fn chat_messages(&self, chat_id: Uuid) -> CareResult<Vec<ChatMessage>> {
        let mut messages: Vec<ChatMessage> = self
            .tables()?
            .chat_messages
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);
        Ok(messages)
    }
}

impl ChangeFeed for MemoryBackend {
    fn subscribe(&self, scope: Scope) -> Subscription {
        self.feed.subscribe(scope)
    }
}
