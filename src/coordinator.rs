use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::InnovaClient;
use crate::config::{Options, MAX_SCAN_INTERVAL_SECS, MIN_SCAN_INTERVAL_SECS};
use crate::error::UpdateFailed;
use crate::status::DeviceStatus;
use crate::Result;

/// Something the coordinator can poll: a refresh that reports success and a
/// snapshot of whatever was last fetched.
pub trait StatusSource: Send + Sync + 'static {
    fn refresh(&self) -> impl Future<Output = bool> + Send;
    fn status(&self) -> DeviceStatus;
}

impl StatusSource for InnovaClient {
    fn refresh(&self) -> impl Future<Output = bool> + Send {
        InnovaClient::refresh(self)
    }

    fn status(&self) -> DeviceStatus {
        InnovaClient::status(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// The last refresh succeeded.
    Fresh,
    /// The last refresh failed; the cached status is stale.
    Failed,
}

pub type UpdateResult = std::result::Result<DeviceStatus, UpdateFailed>;

type Listener = Arc<dyn Fn(&UpdateResult) + Send + Sync>;

struct Shared<S> {
    source: Arc<S>,
    listeners: RwLock<Vec<Listener>>,
    state: RwLock<Option<SyncState>>,
    last_refreshed: RwLock<Option<DateTime<Utc>>>,
    interval: watch::Sender<Duration>,
    cycle: tokio::sync::Mutex<()>,
}

struct Running {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Drives a [`StatusSource`] on a timer and fans each outcome out to
/// listeners.
///
/// Every cycle (scheduled or forced) runs one refresh and then calls every
/// listener with either the fresh status or [`UpdateFailed`]. Cycles never
/// overlap.
pub struct Coordinator<S: StatusSource = InnovaClient> {
    shared: Arc<Shared<S>>,
    running: Mutex<Option<Running>>,
}

impl Coordinator<InnovaClient> {
    /// Builds a client for `options.host` and a coordinator polling it every
    /// `options.scan_interval` seconds. Call [`Coordinator::start`] to begin.
    pub fn from_options(options: &Options) -> Result<Self> {
        options.validate()?;
        let client = InnovaClient::builder(&options.host).build()?;
        Ok(Self::new(Arc::new(client), options.scan_interval()))
    }
}

impl<S: StatusSource> Coordinator<S> {
    /// `interval` is clamped to the scan interval bounds.
    pub fn new(source: Arc<S>, interval: Duration) -> Self {
        let (interval, _) = watch::channel(bounded(interval));
        Self {
            shared: Arc::new(Shared {
                source,
                listeners: RwLock::new(Vec::new()),
                state: RwLock::new(None),
                last_refreshed: RwLock::new(None),
                interval,
                cycle: tokio::sync::Mutex::new(()),
            }),
            running: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &Arc<S> {
        &self.shared.source
    }

    /// Last known status, fresh or not.
    pub fn status(&self) -> DeviceStatus {
        self.shared.source.status()
    }

    /// `None` until the first refresh completes.
    pub fn state(&self) -> Option<SyncState> {
        *self.shared.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn last_update_success(&self) -> bool {
        self.state() == Some(SyncState::Fresh)
    }

    pub fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        *self
            .shared
            .last_refreshed
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn interval(&self) -> Duration {
        *self.shared.interval.borrow()
    }

    pub fn subscribe(&self, f: impl Fn(&UpdateResult) + Send + Sync + 'static) {
        self.shared
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(f));
    }

    /// Starts polling. The first refresh runs immediately, later ones every
    /// [`Coordinator::interval`]. Must be called from within a tokio runtime.
    pub fn start(&self) {
        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if running.as_ref().is_some_and(|r| !r.task.is_finished()) {
            debug!("coordinator already running");
            return;
        }

        let cancel = CancellationToken::new();
        let task = tokio::spawn(poll_loop(self.shared.clone(), cancel.clone()));
        info!(interval = ?self.interval(), "coordinator started");
        *running = Some(Running { cancel, task });
    }

    /// Stops scheduling refreshes. A refresh already in flight is allowed to
    /// finish but its result is not delivered to listeners.
    pub async fn stop(&self) {
        let running = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(Running { cancel, task }) = running else {
            return;
        };

        cancel.cancel();
        if let Err(e) = task.await {
            warn!(error = %e, "poll task ended abnormally");
        }
        info!("coordinator stopped");
    }

    /// Applies to ticks not yet scheduled; a refresh in progress is not
    /// interrupted. Clamped to the scan interval bounds.
    pub fn set_interval(&self, interval: Duration) {
        let interval = bounded(interval);
        let previous = self.shared.interval.send_replace(interval);
        if previous != interval {
            info!(?previous, ?interval, "polling interval changed");
        }
    }

    /// Runs a refresh now, outside the schedule, and notifies listeners.
    pub async fn force_refresh(&self) -> bool {
        self.shared.run_cycle(None).await
    }

    /// Pushes the cached status to every listener without fetching. Call it
    /// after a command on [`Coordinator::source`] so listeners see the
    /// optimistic value before the next refresh.
    pub fn update_listeners(&self) {
        self.shared.notify(&Ok(self.status()));
    }

    /// Setup-time refresh: the caller learns whether the unit is reachable.
    pub async fn first_refresh(&self) -> UpdateResult {
        if self.force_refresh().await {
            Ok(self.status())
        } else {
            Err(UpdateFailed)
        }
    }

    /// Picks up changed options: new cadence, then an immediate refresh.
    pub async fn reconfigure(&self, options: &Options) -> Result<bool> {
        options.validate()?;
        self.set_interval(options.scan_interval());
        Ok(self.force_refresh().await)
    }
}

impl<S: StatusSource> Drop for Coordinator<S> {
    fn drop(&mut self) {
        let running = self
            .running
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(running) = running {
            running.cancel.cancel();
        }
    }
}

impl<S: StatusSource> Shared<S> {
    async fn run_cycle(&self, cancel: Option<&CancellationToken>) -> bool {
        let _cycle = self.cycle.lock().await;
        let ok = self.source.refresh().await;

        if cancel.is_some_and(CancellationToken::is_cancelled) {
            debug!("coordinator stopped during refresh, discarding result");
            return ok;
        }

        let update = if ok {
            self.set_state(SyncState::Fresh);
            *self
                .last_refreshed
                .write()
                .unwrap_or_else(PoisonError::into_inner) = Some(Utc::now());
            Ok(self.source.status())
        } else {
            self.set_state(SyncState::Failed);
            warn!(error = %UpdateFailed, "refresh failed, serving last known status");
            Err(UpdateFailed)
        };

        self.notify(&update);
        ok
    }

    fn set_state(&self, state: SyncState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = Some(state);
    }

    fn notify(&self, update: &UpdateResult) {
        // Snapshot so a listener may subscribe without deadlocking.
        let listeners = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        for listener in &listeners {
            listener(update);
        }
        debug!(listeners = listeners.len(), ok = update.is_ok(), "notified listeners");
    }
}

fn bounded(interval: Duration) -> Duration {
    let min = Duration::from_secs(MIN_SCAN_INTERVAL_SECS);
    let max = Duration::from_secs(MAX_SCAN_INTERVAL_SECS);
    let clamped = interval.clamp(min, max);
    if clamped != interval {
        warn!(requested = ?interval, used = ?clamped, "polling interval out of range, clamped");
    }
    clamped
}

async fn poll_loop<S: StatusSource>(shared: Arc<Shared<S>>, cancel: CancellationToken) {
    let mut interval_rx = shared.interval.subscribe();

    'poll: loop {
        let tick_started = Instant::now();
        shared.run_cycle(Some(&cancel)).await;
        if cancel.is_cancelled() {
            break;
        }

        loop {
            let deadline = tick_started + *interval_rx.borrow_and_update();
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break 'poll,
                _ = sleep_until(deadline) => break,
                changed = interval_rx.changed() => {
                    if changed.is_err() {
                        break 'poll;
                    }
                    debug!("rescheduling next refresh");
                }
            }
        }
    }

    debug!("poll loop exited");
}
