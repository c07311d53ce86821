use std::sync::Arc;

use seniorcare_core::{
    errors::CareResult,
    models::{
        friends::Profile,
        message::{ChatMessage, DirectMessage, NewChatMessage, NewDirectMessage},
        volunteer::{NewVolunteerChat, VolunteerChat},
    },
};
use tracing::{debug, info};
use uuid::Uuid;

use crate::backend::Backend;
use crate::feed::ChangeFeed;
use crate::notice::report;
use crate::views::{ChatRoomView, ConversationView, LiveView, VolunteerChatsView};

/// How many volunteers an elder is offered at once.
pub const VOLUNTEER_LIST_LIMIT: usize = 10;

/// What an elder looking for help is shown.
#[derive(Debug, Clone, PartialEq)]
pub enum VolunteerMatch {
    /// The elder already has an open chat and goes straight back to it.
    Existing(VolunteerChat),
    Available(Vec<Profile>),
}

/// Direct messages, volunteer chat rooms and the elder/volunteer matching
/// that opens them. Content is validated before anything reaches the backend.
///
/// Nothing is added to an open view here; the sender sees a message once
/// the feed echoes the insert.
pub struct MessageService {
    backend: Arc<dyn Backend>,
}

impl MessageService {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    pub async fn send_direct(&self, from: Uuid, to: Uuid, content: &str) -> CareResult<DirectMessage> {
        let message = NewDirectMessage::new(from, to, content)?;
        self.backend
            .insert_direct_message(message)
            .await
            .map_err(|e| report("Failed to send message", e))
    }

    pub async fn send_chat(&self, chat_id: Uuid, from: Uuid, content: &str) -> CareResult<ChatMessage> {
        let message = NewChatMessage::new(chat_id, from, content)?;
        self.backend
            .insert_chat_message(message)
            .await
            .map_err(|e| report("Failed to send chat message", e))
    }

    /// Opens the conversation between `me` and `other` and marks what
    /// `other` sent as read.
    pub async fn open_conversation(
        &self,
        me: Uuid,
        other: Uuid,
        feed: &dyn ChangeFeed,
    ) -> CareResult<LiveView<ConversationView>> {
        let view = LiveView::open(ConversationView { me, other }, self.backend.clone(), feed).await?;
        let marked = self
            .backend
            .mark_conversation_read(me, other)
            .await
            .map_err(|e| report("Failed to mark conversation read", e))?;
        debug!("Marked {} messages read", marked);
        Ok(view)
    }

    pub async fn open_chat_room(
        &self,
        chat_id: Uuid,
        feed: &dyn ChangeFeed,
    ) -> CareResult<LiveView<ChatRoomView>> {
        LiveView::open(ChatRoomView { chat_id }, self.backend.clone(), feed).await
    }

    /// Finds the elder's open support chat, or lists volunteers to pick from.
    pub async fn find_volunteers(&self, elder: Uuid) -> CareResult<VolunteerMatch> {
        if let Some(chat) = self
            .backend
            .active_chat_for_elder(elder)
            .await
            .map_err(|e| report("Failed to look up support chat", e))?
        {
            return Ok(VolunteerMatch::Existing(chat));
        }

        let volunteers = self
            .backend
            .available_volunteers(VOLUNTEER_LIST_LIMIT)
            .await
            .map_err(|e| report("Failed to list volunteers", e))?;
        Ok(VolunteerMatch::Available(volunteers))
    }

    /// Opens a support chat between an elder and a volunteer.
    ///
    /// An elder with an active chat gets that chat back instead of a second one.
    pub async fn start_volunteer_chat(&self, elder: Uuid, volunteer: Uuid) -> CareResult<VolunteerChat> {
        let new_chat = NewVolunteerChat::new(volunteer, elder)?;

        if let Some(existing) = self
            .backend
            .active_chat_for_elder(elder)
            .await
            .map_err(|e| report("Failed to look up support chat", e))?
        {
            debug!("Elder {} already has active chat {}", elder, existing.id);
            return Ok(existing);
        }

        let chat = self
            .backend
            .insert_volunteer_chat(new_chat)
            .await
            .map_err(|e| report("Failed to start support chat", e))?;
        info!("Support chat {} opened with volunteer {}", chat.id, volunteer);
        Ok(chat)
    }

    /// The volunteer's active chats, rebuilt on every chat change.
    pub async fn open_volunteer_chats(
        &self,
        volunteer: Uuid,
        feed: &dyn ChangeFeed,
    ) -> CareResult<LiveView<VolunteerChatsView>> {
        LiveView::open(VolunteerChatsView { volunteer_id: volunteer }, self.backend.clone(), feed).await
    }
}
