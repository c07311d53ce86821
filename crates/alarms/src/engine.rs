use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, Timelike};
use seniorcare_core::{
    errors::{CareError, CareResult},
    models::alarm::{Alarm, AlarmTime},
};
use seniorcare_store::{KeyValueStore, keys};
use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::notify::{NotificationSink, Permission, Toast};

pub const NOTIFICATION_TITLE: &str = "SeniorCare - Alarme";
pub const TOAST_TITLE: &str = "🔔 Alarme!";
pub const TOAST_DURATION: Duration = Duration::from_secs(10);

#[derive(Default)]
struct EngineState {
    alarms: Vec<Alarm>,
    /// Set once the stored list has been read. Until then nothing is written
    /// back, so an empty start-up list cannot clobber stored alarms.
    loaded: bool,
    /// Minute each alarm last fired in, so two ticks landing in the same
    /// minute fire it once.
    last_fired: HashMap<String, NaiveDateTime>,
}

/// Owns the user's alarms and raises notifications when they come due.
///
/// Every mutation is written through to the key-value store while the
/// state lock is held, so stored snapshots follow mutation order. Storage
/// failures are logged and never undo the in-memory change.
pub struct AlarmEngine {
    state: Mutex<EngineState>,
    store: Arc<dyn KeyValueStore>,
    sink: Arc<dyn NotificationSink>,
    clock: Arc<dyn Clock>,
}

impl AlarmEngine {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        sink: Arc<dyn NotificationSink>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: Mutex::new(EngineState::default()),
            store,
            sink,
            clock,
        }
    }

    /// Reads the stored alarm list and enables write-through.
    ///
    /// Alarms added before the load are kept after the stored ones. Returns
    /// the number of alarms held afterwards.
    pub async fn load(&self) -> usize {
        let mut state = self.state.lock().await;

        let stored = match self.store.get(keys::ALARMS).await {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<Alarm>>(&raw) {
                Ok(alarms) => alarms,
                Err(e) => {
                    warn!("Stored alarms are unreadable, starting empty: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                error!("Failed to load alarms: {}", e);
                Vec::new()
            }
        };

        let pending = std::mem::replace(&mut state.alarms, stored);
        let merged_pending = !pending.is_empty();
        for alarm in pending {
            if !state.alarms.iter().any(|a| a.id == alarm.id) {
                state.alarms.push(alarm);
            }
        }
        state.loaded = true;

        if merged_pending {
            self.persist(&state).await;
        }

        debug!("Loaded {} alarms", state.alarms.len());
        state.alarms.len()
    }

    pub async fn is_loaded(&self) -> bool {
        self.state.lock().await.loaded
    }

    /// Current alarms in creation order.
    pub async fn alarms(&self) -> Vec<Alarm> {
        self.state.lock().await.alarms.clone()
    }

    pub async fn add(&self, title: &str, time: &str) -> CareResult<Alarm> {
        let title = title.trim();
        if title.is_empty() || time.trim().is_empty() {
            return Err(CareError::Validation(
                "An alarm needs a title and a time".to_string(),
            ));
        }
        let time: AlarmTime = time.parse()?;

        let alarm = Alarm::new(title, time);
        let mut state = self.state.lock().await;
        state.alarms.push(alarm.clone());
        self.persist(&state).await;

        info!("Added alarm {} at {}", alarm.id, alarm.time);
        Ok(alarm)
    }

    /// Removes an alarm. Returns whether anything was removed.
    pub async fn remove(&self, id: &str) -> bool {
        let mut state = self.state.lock().await;
        let before = state.alarms.len();
        state.alarms.retain(|a| a.id != id);
        state.last_fired.remove(id);
        self.persist(&state).await;

        state.alarms.len() != before
    }

    /// Flips an alarm's active flag. Returns the new flag, or `None` when
    /// no alarm has that id.
    pub async fn toggle(&self, id: &str) -> Option<bool> {
        let mut state = self.state.lock().await;
        let flag = state.alarms.iter_mut().find(|a| a.id == id).map(|alarm| {
            alarm.is_active = !alarm.is_active;
            alarm.is_active
        });
        self.persist(&state).await;

        flag
    }

    /// Asks for notification permission if the user has not decided yet.
    pub async fn prepare_notifications(&self) -> Permission {
        match self.sink.permission().await {
            Permission::Default => {
                let answer = self.sink.request_permission().await;
                info!("Notification permission: {:?}", answer);
                answer
            }
            decided => decided,
        }
    }

    /// Runs one check against the clock and fires every due alarm.
    ///
    /// Returns the alarms that fired.
    pub async fn check(&self) -> Vec<Alarm> {
        let now = self.clock.now();
        let minute = now
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(now);
        let current = AlarmTime::of(&now);

        let due: Vec<Alarm> = {
            let mut guard = self.state.lock().await;
            let state = &mut *guard;
            let due: Vec<Alarm> = state
                .alarms
                .iter()
                .filter(|a| a.is_due(current))
                .filter(|a| state.last_fired.get(&a.id) != Some(&minute))
                .cloned()
                .collect();
            for alarm in &due {
                state.last_fired.insert(alarm.id.clone(), minute);
            }
            due
        };

        for alarm in &due {
            self.fire(alarm).await;
        }
        due
    }

    /// Checks every `period` until `shutdown` resolves.
    ///
    /// The first check happens one period after start; ticks are not aligned
    /// to minute boundaries.
    pub async fn run<F>(&self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        self.prepare_notifications().await;

        let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!("Alarm engine running, checking every {}s", period.as_secs());
        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Alarm engine stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let fired = self.check().await;
                    if !fired.is_empty() {
                        debug!("{} alarms fired", fired.len());
                    }
                }
            }
        }
    }

    async fn fire(&self, alarm: &Alarm) {
        info!("Alarm {} fired: {}", alarm.id, alarm.title);

        if self.sink.permission().await == Permission::Granted {
            if let Err(e) = self.sink.notify(NOTIFICATION_TITLE, &alarm.title).await {
                warn!("Failed to show notification for alarm {}: {}", alarm.id, e);
            }
        }

        self.sink
            .toast(Toast {
                title: TOAST_TITLE.to_string(),
                description: alarm.title.clone(),
                duration: TOAST_DURATION,
            })
            .await;
    }

    /// Writes the current list to the store and reports whether it landed.
    ///
    /// Mutations write through on their own but only log failures; callers
    /// that must know the list reached storage call this afterwards.
    pub async fn save(&self) -> CareResult<()> {
        let state = self.state.lock().await;
        if !state.loaded {
            return Err(CareError::Validation(
                "Alarms must be loaded before they can be saved".to_string(),
            ));
        }
        self.write(&state).await
    }

    async fn persist(&self, state: &EngineState) {
        if !state.loaded {
            debug!("Skipping alarm write before initial load");
            return;
        }

        if let Err(e) = self.write(state).await {
            error!("Failed to save alarms: {}", e);
        }
    }

    async fn write(&self, state: &EngineState) -> CareResult<()> {
        let raw = serde_json::to_string(&state.alarms).map_err(|e| CareError::Internal(Box::new(e)))?;
        self.store.set(keys::ALARMS, &raw).await?;
        Ok(())
    }
}
