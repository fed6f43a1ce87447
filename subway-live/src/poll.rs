//! Polling subscriptions over live snapshots.
//!
//! Each subscribed subject (a trip, a station) gets one background task
//! that refetches on a fixed interval and publishes the latest view on
//! a watch channel. By construction there is at most one fetch in
//! flight per subject; a manual refresh only nudges the task, it never
//! races it.
//!
//! Staleness is explicit: a view keeps the last good snapshot through
//! transient failures and reports `Degraded` instead of going blank.
//! Only a definitive `NotFound`, or exhausting the retry budget before
//! any snapshot ever arrived, ends the subscription.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::Timestamp;
use crate::transiter::TransiterError;

/// How current a subject view is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The snapshot reflects the most recent successful fetch.
    Fresh,

    /// Refreshing is failing; the snapshot is the last good one.
    Degraded,

    /// The subscription has ended and will not recover.
    Failed,
}

/// The published state of one subject.
#[derive(Debug)]
pub struct SubjectView<T> {
    /// Last successfully fetched snapshot, if any yet.
    pub snapshot: Option<Arc<T>>,

    /// How current the snapshot is.
    pub freshness: Freshness,

    /// When the snapshot was last refreshed.
    pub last_refreshed: Option<Timestamp>,
}

impl<T> SubjectView<T> {
    fn initial() -> Self {
        Self {
            snapshot: None,
            freshness: Freshness::Fresh,
            last_refreshed: None,
        }
    }

    /// True before the first fetch has completed.
    pub fn is_loading(&self) -> bool {
        self.snapshot.is_none() && self.freshness == Freshness::Fresh
    }
}

impl<T> Clone for SubjectView<T> {
    fn clone(&self) -> Self {
        Self {
            snapshot: self.snapshot.clone(),
            freshness: self.freshness,
            last_refreshed: self.last_refreshed,
        }
    }
}

/// Error from one fetch attempt.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PollError {
    /// The subject does not exist upstream; never retried.
    #[error("subject not found upstream")]
    NotFound,

    /// A failure worth retrying (network, server error, bad payload).
    #[error("transient fetch failure: {0}")]
    Transient(String),
}

impl From<TransiterError> for PollError {
    fn from(err: TransiterError) -> Self {
        if err.is_not_found() {
            PollError::NotFound
        } else {
            PollError::Transient(err.to_string())
        }
    }
}

/// Configuration for one subscription.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Interval between successful refreshes.
    pub interval: Duration,

    /// First retry delay after a transient failure; doubles per retry.
    pub backoff_base: Duration,

    /// Retries per cycle before giving up until the next interval.
    pub max_retries: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            backoff_base: Duration::from_secs(1),
            max_retries: 3,
        }
    }
}

impl PollConfig {
    /// Interval preset for slow-moving route metadata.
    pub fn routes() -> Self {
        Self::default().with_interval(Duration::from_secs(30))
    }

    /// Set the refresh interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Set the base retry delay.
    pub fn with_backoff_base(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    /// Set the per-cycle retry budget.
    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }
}

/// Handle to one polled subject.
///
/// Dropping the handle aborts the background task; a response from an
/// already-abandoned fetch can never be published.
pub struct Subscription<T> {
    rx: watch::Receiver<SubjectView<T>>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl<T> Subscription<T> {
    /// The current view of the subject.
    pub fn view(&self) -> SubjectView<T> {
        self.rx.borrow().clone()
    }

    /// Wait for the next published view.
    ///
    /// Returns `false` once the subscription has ended; the last view
    /// (freshness `Failed`) remains readable through [`Self::view`].
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Request an immediate refresh.
    ///
    /// Nudges the poll task out of its interval sleep. Requests made
    /// while a fetch is already in flight coalesce into at most one
    /// extra fetch.
    pub fn refresh_now(&self) {
        self.refresh.notify_one();
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Start polling a subject.
///
/// `fetch` is invoked once per cycle (plus retries); the subscription
/// publishes a new [`SubjectView`] after every cycle that changes the
/// state.
pub fn subscribe<T, F, Fut>(fetch: F, config: PollConfig) -> Subscription<T>
where
    T: Send + Sync + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, PollError>> + Send + 'static,
{
    let (tx, rx) = watch::channel(SubjectView::initial());
    let refresh = Arc::new(Notify::new());
    let task = tokio::spawn(run(fetch, config, tx, refresh.clone()));

    Subscription { rx, refresh, task }
}

enum CycleOutcome<T> {
    Snapshot(T),
    NotFound,
    Exhausted(String),
}

async fn run<T, F, Fut>(
    mut fetch: F,
    config: PollConfig,
    tx: watch::Sender<SubjectView<T>>,
    refresh: Arc<Notify>,
) where
    T: Send + Sync + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, PollError>> + Send + 'static,
{
    loop {
        let outcome = run_cycle(&mut fetch, &config, &tx).await;

        match outcome {
            CycleOutcome::Snapshot(value) => {
                debug!("refresh succeeded");
                tx.send_modify(|view| {
                    view.snapshot = Some(Arc::new(value));
                    view.freshness = Freshness::Fresh;
                    view.last_refreshed = Some(Timestamp::now());
                });
            }
            CycleOutcome::NotFound => {
                warn!("subject not found upstream, ending subscription");
                tx.send_modify(|view| view.freshness = Freshness::Failed);
                return;
            }
            CycleOutcome::Exhausted(message) => {
                let has_snapshot = tx.borrow().snapshot.is_some();
                if has_snapshot {
                    // Stale beats blank; the next cycle tries again.
                    warn!(error = %message, "retry budget exhausted, serving stale snapshot");
                    tx.send_modify(|view| view.freshness = Freshness::Degraded);
                } else {
                    warn!(error = %message, "retry budget exhausted with no snapshot, ending subscription");
                    tx.send_modify(|view| view.freshness = Freshness::Failed);
                    return;
                }
            }
        }

        if tx.is_closed() {
            return;
        }

        tokio::select! {
            _ = tokio::time::sleep(config.interval) => {}
            _ = refresh.notified() => {
                debug!("manual refresh requested");
            }
        }
    }
}

/// One poll cycle: an initial attempt plus up to `max_retries` retries
/// with doubling backoff.
async fn run_cycle<T, F, Fut>(
    fetch: &mut F,
    config: &PollConfig,
    tx: &watch::Sender<SubjectView<T>>,
) -> CycleOutcome<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, PollError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match fetch().await {
            Ok(value) => return CycleOutcome::Snapshot(value),
            Err(PollError::NotFound) => return CycleOutcome::NotFound,
            Err(PollError::Transient(message)) => {
                if attempt >= config.max_retries {
                    return CycleOutcome::Exhausted(message);
                }

                // Flag the staleness as soon as the first attempt
                // fails; retries happen behind a degraded view.
                tx.send_if_modified(|view| {
                    if view.snapshot.is_some() && view.freshness == Freshness::Fresh {
                        view.freshness = Freshness::Degraded;
                        return true;
                    }
                    false
                });

                let delay = config.backoff_base * 2u32.pow(attempt);
                warn!(error = %message, attempt = attempt + 1, ?delay, "fetch failed, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
