use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use eyre::{Result, eyre};
use tracing::info;

/// Whether native notifications may be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    /// Not asked yet.
    Default,
    Granted,
    Denied,
}

impl FromStr for Permission {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "default" | "" => Ok(Permission::Default),
            "granted" => Ok(Permission::Granted),
            "denied" => Ok(Permission::Denied),
            other => Err(eyre!("unknown notification permission {:?}", other)),
        }
    }
}

/// Short-lived in-app message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub duration: Duration,
}

/// Where firing alarms are surfaced: the platform's notification centre
/// plus the in-app toast area.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn permission(&self) -> Permission;

    /// Asks the user for permission and returns the answer.
    async fn request_permission(&self) -> Permission;

    async fn notify(&self, title: &str, body: &str) -> Result<()>;

    async fn toast(&self, toast: Toast);
}

/// Sink for headless runs: everything goes to the log.
#[derive(Debug)]
pub struct LogSink {
    permission: Mutex<Permission>,
}

impl LogSink {
    pub fn new(permission: Permission) -> Self {
        Self {
            permission: Mutex::new(permission),
        }
    }
}

#[async_trait]
impl NotificationSink for LogSink {
    async fn permission(&self) -> Permission {
        self.permission
            .lock()
            .map(|p| *p)
            .unwrap_or(Permission::Denied)
    }

    async fn request_permission(&self) -> Permission {
        let mut permission = match self.permission.lock() {
            Ok(permission) => permission,
            Err(_) => return Permission::Denied,
        };
        if *permission == Permission::Default {
            *permission = Permission::Granted;
        }
        *permission
    }

    async fn notify(&self, title: &str, body: &str) -> Result<()> {
        info!(target: "notification", "{}: {}", title, body);
        Ok(())
    }

    async fn toast(&self, toast: Toast) {
        info!(
            target: "toast",
            "{} {} ({}s)",
            toast.title,
            toast.description,
            toast.duration.as_secs()
        );
    }
}
