//! Background refresh scheduling
//!
//! Drives a repeating refresh callback on a fixed interval and de-duplicates
//! overlapping refresh requests: while one refresh is in flight, both the
//! timer tick and manual triggers are no-ops. A failing callback is logged
//! and the schedule stays armed.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, warn};

type RefreshFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;
type RefreshFn = Arc<dyn Fn() -> RefreshFuture + Send + Sync>;

struct Schedule {
    refresh_fn: RefreshFn,
    shutdown_tx: watch::Sender<bool>,
}

#[derive(Default)]
pub struct RefreshScheduler {
    in_flight: Arc<AtomicBool>,
    schedule: Mutex<Option<Schedule>>,
}

impl RefreshScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a repeating timer that invokes `refresh_fn` every `interval`.
    ///
    /// Replaces any previously armed schedule. The first invocation happens
    /// one full interval after arming, not immediately.
    pub fn start<F>(&self, interval: Duration, refresh_fn: F)
    where
        F: Fn() -> RefreshFuture + Send + Sync + 'static,
    {
        let refresh_fn: RefreshFn = Arc::new(refresh_fn);
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task_fn = Arc::clone(&refresh_fn);
        let guard = Arc::clone(&self.in_flight);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // Skip the first tick which fires immediately
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        run_guarded(&guard, &task_fn, "scheduled").await;
                    }
                    changed = shutdown_rx.changed() => {
                        // A closed channel means the scheduler was dropped.
                        if changed.is_err() || *shutdown_rx.borrow() {
                            debug!("Refresh scheduler stopped");
                            break;
                        }
                    }
                }
            }
        });

        let mut slot = lock(&self.schedule);
        if let Some(previous) = slot.replace(Schedule {
            refresh_fn,
            shutdown_tx,
        }) {
            let _ = previous.shutdown_tx.send(true);
        }
    }

    /// Cancel the timer. An in-flight refresh completes, but nothing new is
    /// scheduled and manual triggers become no-ops.
    pub fn stop(&self) {
        if let Some(schedule) = lock(&self.schedule).take() {
            let _ = schedule.shutdown_tx.send(true);
        }
    }

    /// Trigger a refresh immediately.
    ///
    /// Returns `Ok(true)` if a refresh ran, `Ok(false)` if it was skipped
    /// because one was already in flight (or the scheduler is not armed), and
    /// the callback's error if the refresh itself failed.
    pub async fn refresh_now(&self) -> anyhow::Result<bool> {
        let refresh_fn = match lock(&self.schedule).as_ref() {
            Some(schedule) => Arc::clone(&schedule.refresh_fn),
            None => {
                debug!("Manual refresh ignored, scheduler is not armed");
                return Ok(false);
            }
        };

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Manual refresh ignored, another refresh is in flight");
            return Ok(false);
        }

        let result = refresh_fn().await;
        self.in_flight.store(false, Ordering::SeqCst);
        result.map(|_| true)
    }

    /// True while a refresh is being awaited
    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}

async fn run_guarded(guard: &Arc<AtomicBool>, refresh_fn: &RefreshFn, origin: &str) {
    if guard
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        debug!("Skipping {origin} refresh, another refresh is in flight");
        return;
    }

    let result = refresh_fn().await;
    guard.store(false, Ordering::SeqCst);

    if let Err(e) = result {
        // Keep the previous dataset and stay armed for the next tick.
        warn!("{origin} refresh failed: {e:#}");
    }
}

fn lock(slot: &Mutex<Option<Schedule>>) -> MutexGuard<'_, Option<Schedule>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
