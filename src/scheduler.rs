//! Fixed-interval polling with skip-on-overlap.
//!
//! Each scheduled task runs once immediately and then on every tick of its
//! interval. A tick that fires while the previous run has not settled is a
//! no-op: runs are never queued and never overlap. Failures are logged and
//! the schedule carries on.
//!
//! Cancelling a task aborts it, dropping any run still in flight, so no
//! state update from that task lands after [`PollingScheduler::cancel`]
//! returns.

use std::collections::HashMap;
use std::fmt::Display;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::Poll;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

/// Smallest interval accepted; shorter ones are clamped.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

type RunFuture = Pin<Box<dyn Future<Output = Result<(), String>> + Send>>;
type RunFn = Arc<dyn Fn() -> RunFuture + Send + Sync>;

#[derive(Debug)]
struct TaskHandle {
    handle: JoinHandle<()>,
    cancelled: Arc<AtomicBool>,
    in_flight: Arc<AtomicBool>,
    interval: Duration,
}

impl TaskHandle {
    fn stop(&self) {
        self.cancelled.store(true, Ordering::Release);
        self.handle.abort();
    }
}

/// Runs named tasks on fixed intervals.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use pondwatch::PollingScheduler;
///
/// # tokio_test::block_on(async {
/// let scheduler = PollingScheduler::new();
/// scheduler.schedule(
///     "heartbeat",
///     || async { Ok::<_, String>(()) },
///     Duration::from_secs(30),
/// );
/// assert!(scheduler.is_scheduled("heartbeat"));
///
/// scheduler.cancel("heartbeat");
/// assert!(!scheduler.is_scheduled("heartbeat"));
/// # });
/// ```
#[derive(Debug, Default)]
pub struct PollingScheduler {
    tasks: Mutex<HashMap<String, TaskHandle>>,
}

impl PollingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `run` now and then every `interval` until cancelled.
    ///
    /// Scheduling an id that is already active replaces the previous task.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut, E>(&self, id: impl Into<String>, run: F, interval: Duration)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let id = id.into();
        let interval = if interval < MIN_INTERVAL {
            warn!(task = %id, "Interval {:?} too short, using {:?}", interval, MIN_INTERVAL);
            MIN_INTERVAL
        } else {
            interval
        };

        let run: RunFn = Arc::new(move || {
            let fut = run();
            Box::pin(async move { fut.await.map_err(|e| e.to_string()) }) as RunFuture
        });

        let cancelled = Arc::new(AtomicBool::new(false));
        let in_flight = Arc::new(AtomicBool::new(false));
        let handle = tokio::spawn(drive(
            id.clone(),
            interval,
            run,
            cancelled.clone(),
            in_flight.clone(),
        ));

        debug!(task = %id, "Scheduled every {:?}", interval);

        let previous = self.tasks.lock().insert(
            id,
            TaskHandle {
                handle,
                cancelled,
                in_flight,
                interval,
            },
        );
        if let Some(previous) = previous {
            previous.stop();
        }
    }

    /// Stop a task. Returns whether it was scheduled.
    pub fn cancel(&self, id: &str) -> bool {
        match self.tasks.lock().remove(id) {
            Some(task) => {
                task.stop();
                debug!(task = %id, "Cancelled");
                true
            }
            None => false,
        }
    }

    /// Stop every task.
    pub fn cancel_all(&self) {
        let tasks: Vec<(String, TaskHandle)> = self.tasks.lock().drain().collect();
        for (id, task) in tasks {
            task.stop();
            debug!(task = %id, "Cancelled");
        }
    }

    pub fn is_scheduled(&self, id: &str) -> bool {
        self.tasks.lock().contains_key(id)
    }

    /// Whether a run of `id` has started and not yet settled.
    pub fn is_in_flight(&self, id: &str) -> bool {
        self.tasks
            .lock()
            .get(id)
            .is_some_and(|task| task.in_flight.load(Ordering::Acquire))
    }

    pub fn interval(&self, id: &str) -> Option<Duration> {
        self.tasks.lock().get(id).map(|task| task.interval)
    }

    /// Ids of all active tasks, sorted.
    pub fn task_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.tasks.lock().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Drop for PollingScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

async fn drive(
    id: String,
    interval: Duration,
    run: RunFn,
    cancelled: Arc<AtomicBool>,
    in_flight: Arc<AtomicBool>,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut current: Option<RunFuture> = None;

    loop {
        tokio::select! {
            biased;

            result = settle(&mut current, &cancelled) => {
                current = None;
                in_flight.store(false, Ordering::Release);
                match result {
                    Some(Ok(())) => {}
                    Some(Err(e)) => warn!(task = %id, "Run failed: {}", e),
                    None => break,
                }
            }

            _ = ticker.tick() => {
                if cancelled.load(Ordering::Acquire) {
                    break;
                }
                if in_flight.swap(true, Ordering::AcqRel) {
                    debug!(task = %id, "Previous run still in flight, skipping tick");
                    continue;
                }
                current = Some(run());
            }
        }
    }
}

/// Resolve with the outcome of the current run, or never if idle.
///
/// `cancelled` is checked before every poll of the run, so a run that has
/// not started yet never starts once its task is cancelled. Resolves to
/// `None` in that case.
async fn settle(
    current: &mut Option<RunFuture>,
    cancelled: &AtomicBool,
) -> Option<Result<(), String>> {
    let Some(fut) = current.as_mut() else {
        return std::future::pending().await;
    };
    std::future::poll_fn(|cx| {
        if cancelled.load(Ordering::Acquire) {
            return Poll::Ready(None);
        }
        fut.as_mut().poll(cx).map(Some)
    })
    .await
}
