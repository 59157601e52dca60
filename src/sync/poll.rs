//! Periodic refresh of remote list data.
//!
//! A [`RefreshScheduler`] invokes a [`SnapshotSource`] on a timer and
//! broadcasts every fetched snapshot to its subscribers. `refresh()` forces
//! an out-of-band fetch through the same path. The timer pauses while the
//! hosting view is hidden (standby) and the interval grows after failed or
//! unchanged fetches, capped at `max` (back-off).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::constants::{DEFAULT_BACKOFF_GROWTH, DEFAULT_REFRESH_INTERVAL, DEFAULT_REFRESH_MAX};

const CHANNEL_CAPACITY: usize = 16;

/// When scheduled refreshes are suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Standby {
    Never,
    WhenHidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max: Duration,
    pub backoff: bool,
    pub standby: Standby,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
            max: DEFAULT_REFRESH_MAX,
            backoff: true,
            standby: Standby::WhenHidden,
        }
    }
}

/// Observable cadence of a scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollState {
    /// Delay before the next scheduled fetch
    pub interval: Duration,
    /// Whether `interval` is currently stretched beyond the base interval
    pub backoff_active: bool,
    pub last_tick: Option<Instant>,
    pub standby: Standby,
}

/// The fetch collaborator of a scheduler.
#[async_trait]
pub trait SnapshotSource: Send + Sync + 'static {
    type Snapshot: Clone + PartialEq + Send + Sync + 'static;

    async fn fetch(&self) -> Result<Self::Snapshot>;
}

struct Cadence<T> {
    interval: Duration,
    last_tick: Option<Instant>,
    /// Sequence number of the last issued fetch
    issued: u64,
    /// Sequence number of the newest fetch that was broadcast
    landed: u64,
    latest: Option<Arc<T>>,
}

struct Inner<S: SnapshotSource> {
    source: S,
    config: PollConfig,
    cadence: Mutex<Cadence<S::Snapshot>>,
    sender: Mutex<Option<broadcast::Sender<Arc<S::Snapshot>>>>,
    visible: watch::Sender<bool>,
    reschedule: Notify,
    disposed: AtomicBool,
}

impl<S: SnapshotSource> Inner<S> {
    fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn current_interval(&self) -> Duration {
        self.cadence
            .lock()
            .map(|cadence| cadence.interval)
            .unwrap_or(self.config.interval)
    }

    /// Interval after a fetch; `repeated` marks a failure or an unchanged result.
    fn next_interval(&self, current: Duration, repeated: bool) -> Duration {
        if self.config.backoff && repeated {
            (current * DEFAULT_BACKOFF_GROWTH).min(self.config.max).max(self.config.interval)
        } else {
            self.config.interval
        }
    }

    async fn run_fetch(&self) -> Result<()> {
        let seq = match self.cadence.lock() {
            Ok(mut cadence) => {
                cadence.issued += 1;
                cadence.issued
            }
            Err(_) => anyhow::bail!("refresh scheduler state poisoned"),
        };

        let result = self.source.fetch().await;
        if self.is_disposed() {
            return Ok(());
        }

        let snapshot = {
            let mut cadence = self
                .cadence
                .lock()
                .map_err(|_| anyhow::anyhow!("refresh scheduler state poisoned"))?;
            cadence.last_tick = Some(Instant::now());

            if seq < cadence.landed {
                debug!("Dropping refresh #{} superseded by #{}", seq, cadence.landed);
                return Ok(());
            }

            match result {
                Ok(snapshot) => {
                    let unchanged = cadence.latest.as_deref() == Some(&snapshot);
                    cadence.interval = self.next_interval(cadence.interval, unchanged);
                    cadence.landed = seq;
                    let snapshot = Arc::new(snapshot);
                    cadence.latest = Some(Arc::clone(&snapshot));
                    snapshot
                }
                Err(e) => {
                    cadence.interval = self.next_interval(cadence.interval, true);
                    warn!("Refresh #{} failed: {:#}", seq, e);
                    return Err(e);
                }
            }
        };

        if let Ok(sender) = self.sender.lock() {
            if let Some(sender) = sender.as_ref() {
                // No receivers is fine; the snapshot stays available via `latest`
                let _ = sender.send(snapshot);
            }
        }
        Ok(())
    }
}

async fn run_timer<S: SnapshotSource>(inner: Arc<Inner<S>>) {
    loop {
        let delay = inner.current_interval();
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = inner.reschedule.notified() => continue,
        }

        if inner.is_disposed() {
            break;
        }
        if inner.config.standby == Standby::WhenHidden && !*inner.visible.borrow() {
            debug!("View hidden, skipping scheduled refresh");
            continue;
        }
        // Failures are logged by run_fetch and feed the back-off
        let _ = inner.run_fetch().await;
    }
}

/// Recurring fetch of a snapshot with broadcast to subscribers.
pub struct RefreshScheduler<S: SnapshotSource> {
    inner: Arc<Inner<S>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl<S: SnapshotSource> RefreshScheduler<S> {
    /// Create an idle scheduler; the timer starts with [`start`](Self::start)
    /// or the first [`refresh`](Self::refresh).
    pub fn new(source: S, config: PollConfig) -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        let (visible, _) = watch::channel(true);
        Self {
            inner: Arc::new(Inner {
                source,
                config,
                cadence: Mutex::new(Cadence {
                    interval: config.interval,
                    last_tick: None,
                    issued: 0,
                    landed: 0,
                    latest: None,
                }),
                sender: Mutex::new(Some(sender)),
                visible,
                reschedule: Notify::new(),
                disposed: AtomicBool::new(false),
            }),
            timer: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &PollConfig {
        &self.inner.config
    }

    pub fn source(&self) -> &S {
        &self.inner.source
    }

    /// Start the timer if it is not running yet.
    pub fn start(&self) {
        if self.is_disposed() {
            return;
        }
        if let Ok(mut timer) = self.timer.lock() {
            if timer.is_none() {
                info!(
                    "Starting refresh every {:?} (max {:?}, backoff {})",
                    self.inner.config.interval, self.inner.config.max, self.inner.config.backoff
                );
                *timer = Some(tokio::spawn(run_timer(Arc::clone(&self.inner))));
            }
        }
    }

    /// Fetch now and return once the result has been broadcast.
    ///
    /// The timer is restarted so the next scheduled fetch is a full interval
    /// away. Does nothing once disposed.
    pub async fn refresh(&self) -> Result<()> {
        if self.is_disposed() {
            return Ok(());
        }
        self.start();
        self.inner.reschedule.notify_one();
        self.inner.run_fetch().await
    }

    /// Receive every snapshot broadcast from now on.
    ///
    /// After disposal the returned receiver is already closed.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<S::Snapshot>> {
        if let Ok(sender) = self.inner.sender.lock() {
            if let Some(sender) = sender.as_ref() {
                return sender.subscribe();
            }
        }
        broadcast::channel(1).1
    }

    /// Most recent snapshot, if any fetch has landed.
    pub fn latest(&self) -> Option<Arc<S::Snapshot>> {
        self.inner.cadence.lock().ok().and_then(|cadence| cadence.latest.clone())
    }

    /// Report whether the hosting view is visible.
    pub fn set_visible(&self, visible: bool) {
        if self.is_disposed() {
            return;
        }
        let changed = self.inner.visible.send_replace(visible) != visible;
        if changed {
            debug!("Refresh view visibility changed: {}", visible);
        }
    }

    pub fn is_visible(&self) -> bool {
        *self.inner.visible.borrow()
    }

    pub fn state(&self) -> PollState {
        let (interval, last_tick) = self
            .inner
            .cadence
            .lock()
            .map(|cadence| (cadence.interval, cadence.last_tick))
            .unwrap_or((self.inner.config.interval, None));
        PollState {
            interval,
            backoff_active: interval > self.inner.config.interval,
            last_tick,
            standby: self.inner.config.standby,
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.is_disposed()
    }

    /// Stop the timer and release all subscribers. Idempotent.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Ok(mut timer) = self.timer.lock() {
            if let Some(handle) = timer.take() {
                handle.abort();
            }
        }
        if let Ok(mut sender) = self.inner.sender.lock() {
            sender.take();
        }
        info!("Refresh scheduler disposed");
    }
}

impl<S: SnapshotSource> Drop for RefreshScheduler<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}
