#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use seniorcare_alarms::{Clock, NotificationSink, Permission, Toast};

/// Local time on a fixed day.
pub fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 8, 12)
        .and_then(|d| d.and_hms_opt(hour, minute, second))
        .expect("valid test time")
}

/// Sink that records everything it is asked to show.
pub struct RecordingSink {
    permission: Mutex<Permission>,
    answer: Permission,
    permission_requests: AtomicUsize,
    notifications: Mutex<Vec<(String, String)>>,
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingSink {
    pub fn new(permission: Permission) -> Self {
        Self::answering(permission, Permission::Granted)
    }

    /// A sink whose permission prompt returns `answer`.
    pub fn answering(permission: Permission, answer: Permission) -> Self {
        Self {
            permission: Mutex::new(permission),
            answer,
            permission_requests: AtomicUsize::new(0),
            notifications: Mutex::new(Vec::new()),
            toasts: Mutex::new(Vec::new()),
        }
    }

    pub fn granted() -> Self {
        Self::new(Permission::Granted)
    }

    pub fn notifications(&self) -> Vec<(String, String)> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().unwrap().clone()
    }

    pub fn permission_requests(&self) -> usize {
        self.permission_requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn permission(&self) -> Permission {
        *self.permission.lock().unwrap()
    }

    async fn request_permission(&self) -> Permission {
        self.permission_requests.fetch_add(1, Ordering::SeqCst);
        let mut permission = self.permission.lock().unwrap();
        *permission = self.answer;
        *permission
    }

    async fn notify(&self, title: &str, body: &str) -> eyre::Result<()> {
        self.notifications
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        Ok(())
    }

    async fn toast(&self, toast: Toast) {
        self.toasts.lock().unwrap().push(toast);
    }
}

/// Local time that follows tokio's (pausable) clock from a fixed start.
pub struct TokioClock {
    base: NaiveDateTime,
    start: tokio::time::Instant,
}

impl TokioClock {
    pub fn new(base: NaiveDateTime) -> Self {
        Self {
            base,
            start: tokio::time::Instant::now(),
        }
    }
}

impl Clock for TokioClock {
    fn now(&self) -> NaiveDateTime {
        let elapsed = chrono::Duration::from_std(self.start.elapsed())
            .unwrap_or_else(|_| chrono::Duration::zero());
        self.base + elapsed
    }
}
