//! # SeniorCare Sync
//!
//! Client side of the friend and messaging features. The hosted backend
//! owns the data; this crate issues row-level reads and writes against it
//! and keeps local views current from its realtime change feed.
//!
//! ## Architecture
//!
//! - **Backend**: the [`Backend`](backend::Backend) trait, with a REST
//!   client and an in-memory implementation
//! - **Feed**: realtime subscriptions scoped to one table
//! - **Views**: live lists built from a fetch plus the feed
//! - **Services**: friend requests, messaging and volunteer matching
//! - **Notice**: user-facing rendering of every outcome

pub mod backend;
pub mod config;
pub mod feed;
pub mod friends;
pub mod memory;
pub mod messages;
pub mod notice;
pub mod rest;
pub mod views;

pub mod mock;

pub use backend::Backend;
pub use feed::{ChangeFeed, LocalFeed};
pub use friends::FriendService;
pub use memory::MemoryBackend;
pub use messages::{MessageService, VolunteerMatch};
pub use notice::Notice;
pub use rest::RestBackend;
pub use views::LiveView;
