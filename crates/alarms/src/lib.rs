//! # SeniorCare Alarms
//!
//! Device-local daily reminders. The [`engine::AlarmEngine`] keeps the alarm
//! list in memory, mirrors it to the key-value store on every change and
//! checks it against the clock once per interval, surfacing due alarms
//! through a [`notify::NotificationSink`].

pub mod clock;
pub mod config;
pub mod engine;
pub mod notify;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::AlarmEngine;
pub use notify::{LogSink, NotificationSink, Permission, Toast};
