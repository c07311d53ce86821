//! Locally held lists kept consistent with the backend.
//!
//! A [`LiveView`] subscribes first, then does a full fetch, so no change
//! made between the two is missed; rows seen both ways are merged by id.
//! Inserts in scope are merged into the list, broader changes trigger a
//! full refetch. The sender of a message sees it only once the feed echoes
//! it back.

use std::sync::Arc;

use async_trait::async_trait;
use seniorcare_core::{
    errors::CareResult,
    models::{
        friends::{FriendRequest, Friendship, RequestStatus},
        message::{ChatMessage, DirectMessage},
        volunteer::VolunteerChat,
    },
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::backend::Backend;
use crate::feed::{Change, ChangeFeed, ChangeKind, FeedEvent, Record, Scope, Subscription, Table};

/// Rows identified by a primary key.
pub trait Keyed {
    fn key(&self) -> Uuid;
}

impl Keyed for Friendship {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for FriendRequest {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for DirectMessage {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for ChatMessage {
    fn key(&self) -> Uuid {
        self.id
    }
}

impl Keyed for VolunteerChat {
    fn key(&self) -> Uuid {
        self.id
    }
}

/// What a view does with one incoming change.
#[derive(Debug, Clone, PartialEq)]
pub enum Reconcile<T> {
    /// Insert the row, or replace the row with the same id.
    Merge(T),
    Refetch,
    Ignore,
}

/// Describes one kind of live list.
#[async_trait]
pub trait ViewScope: Send + Sync {
    type Item: Keyed + Clone + Send + Sync;

    fn scope(&self) -> Scope;

    async fn fetch(&self, backend: &dyn Backend) -> CareResult<Vec<Self::Item>>;

    fn reconcile(&self, change: &Change) -> Reconcile<Self::Item>;

    /// Restores the view's ordering after a merge. Default keeps arrival order.
    fn order(&self, _items: &mut Vec<Self::Item>) {}
}

pub struct LiveView<V: ViewScope> {
    view: V,
    backend: Arc<dyn Backend>,
    subscription: Subscription,
    items: Vec<V::Item>,
}

impl<V: ViewScope> LiveView<V> {
    pub async fn open(view: V, backend: Arc<dyn Backend>, feed: &dyn ChangeFeed) -> CareResult<Self> {
        let subscription = feed.subscribe(view.scope());
        let mut items = view.fetch(backend.as_ref()).await?;
        view.order(&mut items);

        debug!("Opened {} view with {} rows", view.scope().table.name(), items.len());
        Ok(Self {
            view,
            backend,
            subscription,
            items,
        })
    }

    pub fn items(&self) -> &[V::Item] {
        &self.items
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub async fn refetch(&mut self) -> CareResult<()> {
        let mut items = self.view.fetch(self.backend.as_ref()).await?;
        self.view.order(&mut items);
        self.items = items;
        Ok(())
    }

    /// Waits for the next change in scope and applies it.
    ///
    /// Returns `false` once the feed has closed.
    pub async fn next(&mut self) -> CareResult<bool> {
        let event = self.subscription.recv().await;
        self.handle(event).await
    }

    /// Applies every change that has already arrived, without waiting.
    ///
    /// Returns the number of feed events handled.
    pub async fn sync(&mut self) -> CareResult<usize> {
        let mut handled = 0;
        while let Some(event) = self.subscription.try_recv() {
            handled += 1;
            if !self.handle(event).await? {
                break;
            }
        }
        Ok(handled)
    }

    /// Tears the subscription down; later changes are not seen or replayed.
    pub fn close(self) -> Vec<V::Item> {
        debug!("Closed {} view", self.subscription.scope().table.name());
        self.items
    }

    async fn handle(&mut self, event: FeedEvent) -> CareResult<bool> {
        match event {
            FeedEvent::Change(change) => match self.view.reconcile(&change) {
                Reconcile::Merge(item) => self.merge(item),
                Reconcile::Refetch => self.refetch().await?,
                Reconcile::Ignore => {}
            },
            FeedEvent::Lagged(missed) => {
                warn!("View fell behind by {} changes, refetching", missed);
                self.refetch().await?;
            }
            FeedEvent::Closed => return Ok(false),
        }
        Ok(true)
    }

    fn merge(&mut self, item: V::Item) {
        match self.items.iter_mut().find(|existing| existing.key() == item.key()) {
            Some(existing) => *existing = item,
            None => self.items.push(item),
        }
        self.view.order(&mut self.items);
    }
}

/// Everyone `user_id` is friends with.
pub struct FriendsView {
    pub user_id: Uuid,
}

#[async_trait]
impl ViewScope for FriendsView {
    type Item = Friendship;

    fn scope(&self) -> Scope {
        Scope::table(Table::Friends).eq("user_id", self.user_id)
    }

    async fn fetch(&self, backend: &dyn Backend) -> CareResult<Vec<Friendship>> {
        backend.friends_of(self.user_id).await
    }

    fn reconcile(&self, change: &Change) -> Reconcile<Friendship> {
        match (&change.kind, &change.record) {
            (ChangeKind::Insert, Record::Friendship(f)) if f.user_id == self.user_id => {
                Reconcile::Merge(f.clone())
            }
            (ChangeKind::Insert, _) => Reconcile::Ignore,
            _ => Reconcile::Refetch,
        }
    }
}

/// Requests waiting for `user_id` to answer, newest first.
pub struct PendingRequestsView {
    pub user_id: Uuid,
}

#[async_trait]
impl ViewScope for PendingRequestsView {
    type Item = FriendRequest;

    fn scope(&self) -> Scope {
        Scope::table(Table::FriendshipRequests).eq("to_user_id", self.user_id)
    }

    async fn fetch(&self, backend: &dyn Backend) -> CareResult<Vec<FriendRequest>> {
        backend.pending_requests_for(self.user_id).await
    }

    fn reconcile(&self, change: &Change) -> Reconcile<FriendRequest> {
        match (&change.kind, &change.record) {
            (ChangeKind::Insert, Record::FriendRequest(r))
                if r.to_user_id == self.user_id && r.status == RequestStatus::Pending =>
            {
                Reconcile::Merge(r.clone())
            }
            (ChangeKind::Insert, _) => Reconcile::Ignore,
            // A status change can also create friendship rows elsewhere
            _ => Reconcile::Refetch,
        }
    }

    fn order(&self, items: &mut Vec<FriendRequest>) {
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
}

/// Direct messages between `me` and `other`, oldest first.
pub struct ConversationView {
    pub me: Uuid,
    pub other: Uuid,
}

#[async_trait]
impl ViewScope for ConversationView {
    type Item = DirectMessage;

    // The feed filter cannot express "either direction of a pair", so the
    // whole table is subscribed and filtered in `reconcile`.
    fn scope(&self) -> Scope {
        Scope::table(Table::Messages)
    }

    async fn fetch(&self, backend: &dyn Backend) -> CareResult<Vec<DirectMessage>> {
        backend.conversation(self.me, self.other).await
    }

    fn reconcile(&self, change: &Change) -> Reconcile<DirectMessage> {
        match (&change.kind, &change.record) {
            (ChangeKind::Insert | ChangeKind::Update, Record::DirectMessage(m))
                if m.is_between(self.me, self.other) =>
            {
                Reconcile::Merge(m.clone())
            }
            (ChangeKind::Delete, Record::DirectMessage(m)) if m.is_between(self.me, self.other) => {
                Reconcile::Refetch
            }
            _ => Reconcile::Ignore,
        }
    }

    fn order(&self, items: &mut Vec<DirectMessage>) {
        items.sort_by_key(|m| m.created_at);
    }
}

/// Messages in one volunteer chat room, oldest first.
pub struct ChatRoomView {
    pub chat_id: Uuid,
}

#[async_trait]
impl ViewScope for ChatRoomView {
    type Item = ChatMessage;

    fn scope(&self) -> Scope {
        Scope::table(Table::VolunteerChatMessages).eq("chat_id", self.chat_id)
    }

    async fn fetch(&self, backend: &dyn Backend) -> CareResult<Vec<ChatMessage>> {
        backend.chat_messages(self.chat_id).await
    }

    fn reconcile(&self, change: &Change) -> Reconcile<ChatMessage> {
        match (&change.kind, &change.record) {
            (ChangeKind::Insert, Record::ChatMessage(m)) if m.chat_id == self.chat_id => {
                Reconcile::Merge(m.clone())
            }
            _ => Reconcile::Ignore,
        }
    }

    fn order(&self, items: &mut Vec<ChatMessage>) {
        items.sort_by_key(|m| m.created_at);
    }
}

/// Active support chats assigned to a volunteer, most recently updated first.
pub struct VolunteerChatsView {
    pub volunteer_id: Uuid,
}

#[async_trait]
impl ViewScope for VolunteerChatsView {
    type Item = VolunteerChat;

    fn scope(&self) -> Scope {
        Scope::table(Table::VolunteerChats)
    }

    async fn fetch(&self, backend: &dyn Backend) -> CareResult<Vec<VolunteerChat>> {
        backend.active_chats_for_volunteer(self.volunteer_id).await
    }

    // Any chat event can reorder or close entries, so the list is rebuilt
    fn reconcile(&self, _change: &Change) -> Reconcile<VolunteerChat> {
        Reconcile::Refetch
    }

    fn order(&self, items: &mut Vec<VolunteerChat>) {
        items.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    }
}
