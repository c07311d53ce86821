//! Realtime change feed.
//!
//! The backend pushes row-level changes per table; a [`Subscription`] sees
//! the changes matching its [`Scope`] from the moment it was opened.
//! Dropping the subscription unsubscribes. Nothing is replayed.

use seniorcare_core::models::{
    friends::{FriendRequest, Friendship},
    message::{ChatMessage, DirectMessage},
    volunteer::VolunteerChat,
};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};

const DEFAULT_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Friends,
    FriendshipRequests,
    Messages,
    VolunteerChats,
    VolunteerChatMessages,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Friends => "friends",
            Table::FriendshipRequests => "friendship_requests",
            Table::Messages => "messages",
            Table::VolunteerChats => "volunteer_chats",
            Table::VolunteerChatMessages => "volunteer_chat_messages",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// The row a change carries, in its new state.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    FriendRequest(FriendRequest),
    Friendship(Friendship),
    DirectMessage(DirectMessage),
    VolunteerChat(VolunteerChat),
    ChatMessage(ChatMessage),
}

impl Record {
    pub fn table(&self) -> Table {
        match self {
            Record::FriendRequest(_) => Table::FriendshipRequests,
            Record::Friendship(_) => Table::Friends,
            Record::DirectMessage(_) => Table::Messages,
            Record::VolunteerChat(_) => Table::VolunteerChats,
            Record::ChatMessage(_) => Table::VolunteerChatMessages,
        }
    }

    /// Value of a column as the feed filter compares it.
    pub fn column(&self, name: &str) -> Option<String> {
        match (self, name) {
            (Record::FriendRequest(r), "id") => Some(r.id.to_string()),
            (Record::FriendRequest(r), "from_user_id") => Some(r.from_user_id.to_string()),
            (Record::FriendRequest(r), "to_user_id") => Some(r.to_user_id.to_string()),
            (Record::FriendRequest(r), "status") => Some(r.status.as_str().to_string()),
            (Record::Friendship(f), "id") => Some(f.id.to_string()),
            (Record::Friendship(f), "user_id") => Some(f.user_id.to_string()),
            (Record::Friendship(f), "friend_user_id") => Some(f.friend_user_id.to_string()),
            (Record::DirectMessage(m), "id") => Some(m.id.to_string()),
            (Record::DirectMessage(m), "from_user_id") => Some(m.from_user_id.to_string()),
            (Record::DirectMessage(m), "to_user_id") => Some(m.to_user_id.to_string()),
            (Record::VolunteerChat(c), "id") => Some(c.id.to_string()),
            (Record::VolunteerChat(c), "volunteer_id") => Some(c.volunteer_id.to_string()),
            (Record::VolunteerChat(c), "elder_id") => Some(c.elder_id.to_string()),
            (Record::VolunteerChat(c), "status") => Some(c.status.as_str().to_string()),
            (Record::ChatMessage(m), "id") => Some(m.id.to_string()),
            (Record::ChatMessage(m), "chat_id") => Some(m.chat_id.to_string()),
            (Record::ChatMessage(m), "from_user_id") => Some(m.from_user_id.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub kind: ChangeKind,
    pub record: Record,
}

impl Change {
    pub fn insert(record: Record) -> Self {
        Self {
            kind: ChangeKind::Insert,
            record,
        }
    }

    pub fn update(record: Record) -> Self {
        Self {
            kind: ChangeKind::Update,
            record,
        }
    }

    /// A removed row, carrying its last known state.
    pub fn delete(record: Record) -> Self {
        Self {
            kind: ChangeKind::Delete,
            record,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub column: String,
    pub value: String,
}

/// Which changes a subscription receives: one table, optionally narrowed
/// by a single `column = value` filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub table: Table,
    pub filter: Option<ColumnFilter>,
}

impl Scope {
    pub fn table(table: Table) -> Self {
        Self {
            table,
            filter: None,
        }
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filter = Some(ColumnFilter {
            column: column.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn matches(&self, change: &Change) -> bool {
        if change.record.table() != self.table {
            return false;
        }
        match &self.filter {
            Some(filter) => change.record.column(&filter.column).as_deref() == Some(filter.value.as_str()),
            None => true,
        }
    }
}

/// Something that hands out realtime subscriptions.
pub trait ChangeFeed: Send + Sync {
    fn subscribe(&self, scope: Scope) -> Subscription;
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    Change(Change),
    /// The subscriber fell behind and this many changes were dropped.
    Lagged(u64),
    Closed,
}

pub struct Subscription {
    scope: Scope,
    receiver: broadcast::Receiver<Change>,
}

impl Subscription {
    pub fn new(scope: Scope, receiver: broadcast::Receiver<Change>) -> Self {
        Self { scope, receiver }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// Waits for the next change in scope.
    pub async fn recv(&mut self) -> FeedEvent {
        loop {
            match self.receiver.recv().await {
                Ok(change) if self.scope.matches(&change) => return FeedEvent::Change(change),
                Ok(_) => continue,
                Err(RecvError::Lagged(missed)) => return FeedEvent::Lagged(missed),
                Err(RecvError::Closed) => return FeedEvent::Closed,
            }
        }
    }

    /// Returns the next change in scope that has already arrived, if any.
    pub fn try_recv(&mut self) -> Option<FeedEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(change) if self.scope.matches(&change) => return Some(FeedEvent::Change(change)),
                Ok(_) => continue,
                Err(TryRecvError::Lagged(missed)) => return Some(FeedEvent::Lagged(missed)),
                Err(TryRecvError::Closed) => return Some(FeedEvent::Closed),
                Err(TryRecvError::Empty) => return None,
            }
        }
    }
}

/// In-process fan-out of changes to every open subscription.
pub struct LocalFeed {
    sender: broadcast::Sender<Change>,
}

impl Default for LocalFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl LocalFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Delivers a change to current subscribers. Returns how many there were.
    pub fn publish(&self, change: Change) -> usize {
        let table = change.record.table();
        let delivered = self.sender.send(change).unwrap_or(0);
        tracing::trace!("Published {} change to {} subscribers", table.name(), delivered);
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl ChangeFeed for LocalFeed {
    fn subscribe(&self, scope: Scope) -> Subscription {
        tracing::debug!("Subscribing to {} changes", scope.table.name());
        Subscription::new(scope, self.sender.subscribe())
    }
}
