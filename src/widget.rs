use crate::collectors::{CollectError, StatsProvider};
use crate::models::{raw_to_display, DisplayState, RawStatsSample};
use crate::options::ValidatedOptions;
use crate::renderer::{self, Element};
use log::{debug, info, warn};
use serde::Deserialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WidgetError {
    #[error("widget is already mounted")]
    AlreadyMounted,

    #[error("polling interval must be greater than zero")]
    ZeroInterval,

    #[error("no tokio runtime available to drive the widget")]
    NoRuntime,
}

/// Which sample wins when fetches overlap and complete out of order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateOrdering {
    /// Whatever resolves last is shown, even if it was issued earlier.
    #[default]
    Received,
    /// Samples older than the one on display are dropped.
    Issued,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchStats {
    pub completed: u64,
    pub failed: u64,
    pub discarded: u64,
}

struct Gate {
    mounted: bool,
    next_seq: u64,
    last_applied: u64,
    stats: FetchStats,
}

/// State sink shared between the controller and its fetch tasks. Every write
/// goes through `gate`, so nothing lands once the widget is unmounted.
struct Shared {
    gate: Mutex<Gate>,
    state: watch::Sender<DisplayState>,
    ordering: UpdateOrdering,
}

impl Shared {
    fn new(ordering: UpdateOrdering) -> Self {
        let (state, _) = watch::channel(DisplayState::default());
        Self {
            gate: Mutex::new(Gate {
                mounted: false,
                next_seq: 1,
                last_applied: 0,
                stats: FetchStats::default(),
            }),
            state,
            ordering,
        }
    }

    fn gate(&self) -> MutexGuard<'_, Gate> {
        self.gate.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn set_mounted(&self, mounted: bool) {
        self.gate().mounted = mounted;
    }

    /// Hands out the next fetch sequence number, or `None` once unmounted.
    fn issue(&self) -> Option<u64> {
        let mut gate = self.gate();
        if !gate.mounted {
            return None;
        }
        let seq = gate.next_seq;
        gate.next_seq += 1;
        Some(seq)
    }

    fn apply(&self, seq: u64, result: Result<RawStatsSample, CollectError>) {
        let mut gate = self.gate();
        if !gate.mounted {
            debug!("Dropping result of fetch #{} after unmount", seq);
            return;
        }

        match result {
            Ok(sample) => {
                if self.ordering == UpdateOrdering::Issued && seq < gate.last_applied {
                    debug!("Discarding stale fetch #{} (showing #{})", seq, gate.last_applied);
                    gate.stats.discarded += 1;
                    return;
                }
                gate.last_applied = seq;
                gate.stats.completed += 1;
                self.state.send_replace(raw_to_display(sample));
            }
            Err(e) => {
                gate.stats.failed += 1;
                warn!("Network speed fetch #{} failed, keeping last value: {}", seq, e);
            }
        }
    }
}

type PendingFetches = Arc<Mutex<Vec<JoinHandle<()>>>>;

fn lock_pending(pending: &PendingFetches) -> MutexGuard<'_, Vec<JoinHandle<()>>> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Polls a [`StatsProvider`] on a fixed interval and keeps the latest
/// [`DisplayState`] for rendering.
///
/// Each tick starts a new fetch whether or not earlier ones have finished.
/// Outstanding fetches are tracked so [`stop`](Self::stop) can abort them.
pub struct NetworkSpeedWidget<P: StatsProvider> {
    provider: Arc<P>,
    options: ValidatedOptions,
    interval: Duration,
    shared: Arc<Shared>,
    ticker: Option<JoinHandle<()>>,
    pending: PendingFetches,
}

impl<P: StatsProvider> NetworkSpeedWidget<P> {
    pub fn new(provider: P, options: ValidatedOptions) -> Self {
        Self::with_ordering(provider, options, UpdateOrdering::default())
    }

    pub fn with_ordering(provider: P, options: ValidatedOptions, ordering: UpdateOrdering) -> Self {
        Self {
            provider: Arc::new(provider),
            options,
            interval: DEFAULT_INTERVAL,
            shared: Arc::new(Shared::new(ordering)),
            ticker: None,
            pending: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn options(&self) -> &ValidatedOptions {
        &self.options
    }

    pub fn is_mounted(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn state(&self) -> DisplayState {
        self.shared.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DisplayState> {
        self.shared.state.subscribe()
    }

    pub fn stats(&self) -> FetchStats {
        self.shared.gate().stats
    }

    pub fn pending_fetches(&self) -> usize {
        lock_pending(&self.pending)
            .iter()
            .filter(|handle| !handle.is_finished())
            .count()
    }

    pub fn render(&self) -> Element {
        renderer::render(&self.state(), Some(self.options.fill()))
    }

    /// Polls once right away, then on every interval tick.
    pub fn start(&mut self) -> Result<(), WidgetError> {
        if self.ticker.is_some() {
            return Err(WidgetError::AlreadyMounted);
        }
        if self.interval.is_zero() {
            return Err(WidgetError::ZeroInterval);
        }
        let runtime = Handle::try_current().map_err(|_| WidgetError::NoRuntime)?;

        self.shared.set_mounted(true);
        self.ticker = Some(runtime.spawn(poll_loop(
            Arc::clone(&self.provider),
            Arc::clone(&self.shared),
            Arc::clone(&self.pending),
            self.interval,
        )));

        info!(
            "Network speed widget mounted, polling every {} ms",
            self.interval.as_millis()
        );
        Ok(())
    }

    /// Stops the timer and aborts every fetch still in flight. Nothing that
    /// completes afterwards reaches the display state.
    pub fn stop(&mut self) {
        let Some(ticker) = self.ticker.take() else {
            return;
        };

        self.shared.set_mounted(false);
        ticker.abort();

        let pending: Vec<JoinHandle<()>> = lock_pending(&self.pending).drain(..).collect();
        let mut cancelled = 0;
        for handle in pending {
            if !handle.is_finished() {
                handle.abort();
                cancelled += 1;
            }
        }

        info!(
            "Network speed widget unmounted, cancelled {} pending fetches",
            cancelled
        );
    }
}

impl<P: StatsProvider> Drop for NetworkSpeedWidget<P> {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn poll_loop<P: StatsProvider>(
    provider: Arc<P>,
    shared: Arc<Shared>,
    pending: PendingFetches,
    period: Duration,
) {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(seq) = shared.issue() else {
            break;
        };

        let provider = Arc::clone(&provider);
        let sink = Arc::clone(&shared);
        let fetch = tokio::spawn(async move {
            let result = provider.sample().await;
            sink.apply(seq, result);
        });

        let mut in_flight = lock_pending(&pending);
        in_flight.retain(|handle| !handle.is_finished());
        in_flight.push(fetch);
    }
}
