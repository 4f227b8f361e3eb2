// Shift status poller
//
// Re-issues the status lookup on a fixed interval until the shift reaches a
// terminal status or the handle is cancelled/dropped.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::error::AppResult;
use crate::models::ShiftStatus;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);
/// Shorter intervals (including zero) are raised to this
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Anything that can report a shift's current status
#[async_trait]
pub trait StatusSource: Send + Sync + 'static {
    async fn fetch_status(&self, shift_id: &str) -> AppResult<ShiftStatus>;
}

/// Handle to a running poll. Dropping it stops the poll like [`PollHandle::cancel`].
pub struct PollHandle {
    cancel_tx: Option<oneshot::Sender<()>>,
    status_rx: watch::Receiver<Option<ShiftStatus>>,
    task: JoinHandle<Option<ShiftStatus>>,
}

impl PollHandle {
    /// Latest observed status, `None` before the first successful lookup
    pub fn latest(&self) -> Option<ShiftStatus> {
        self.status_rx.borrow().clone()
    }

    /// Receiver notified on every observed status
    pub fn subscribe(&self) -> watch::Receiver<Option<ShiftStatus>> {
        self.status_rx.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop rescheduling. An in-flight lookup is not aborted but its result is the last one.
    pub async fn cancel(mut self) -> Option<ShiftStatus> {
        if let Some(tx) = self.cancel_tx.take() {
            let _ = tx.send(());
        }
        self.join_task().await
    }

    /// Wait for the poll to end on its own; returns the terminal status
    pub async fn wait(mut self) -> Option<ShiftStatus> {
        self.join_task().await
    }

    async fn join_task(&mut self) -> Option<ShiftStatus> {
        match (&mut self.task).await {
            Ok(status) => status,
            Err(e) => {
                warn!("Status poll task failed: {}", e);
                None
            }
        }
    }
}

pub struct ShiftPoller;

impl ShiftPoller {
    /// Spawn a poll for `shift_id`; the first lookup happens immediately
    pub fn spawn<S: StatusSource>(
        source: Arc<S>,
        shift_id: impl Into<String>,
        interval: Duration,
    ) -> PollHandle {
        let shift_id = shift_id.into();
        let interval = interval.max(MIN_POLL_INTERVAL);
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        let (status_tx, status_rx) = watch::channel(None);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut last: Option<ShiftStatus> = None;

            loop {
                tokio::select! {
                    biased;
                    // Fires on explicit cancel and on handle drop
                    _ = &mut cancel_rx => {
                        debug!("Status poll for {} cancelled", shift_id);
                        return last;
                    }
                    _ = ticker.tick() => {
                        match source.fetch_status(&shift_id).await {
                            Ok(status) => {
                                let terminal = status.is_terminal();
                                last = Some(status.clone());
                                status_tx.send_replace(Some(status.clone()));
                                if terminal {
                                    info!("Shift {} reached terminal status {}", shift_id, status);
                                    return last;
                                }
                            }
                            Err(e) => {
                                warn!("Status lookup for {} failed, retrying next tick: {}", shift_id, e);
                            }
                        }
                    }
                }
            }
        });

        PollHandle {
            cancel_tx: Some(cancel_tx),
            status_rx,
            task,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays a script of statuses, then repeats the last one
    struct Scripted {
        script: Mutex<Vec<AppResult<ShiftStatus>>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(mut script: Vec<AppResult<ShiftStatus>>) -> Arc<Self> {
            script.reverse();
            Arc::new(Self {
                script: Mutex::new(script),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StatusSource for Scripted {
        async fn fetch_status(&self, _shift_id: &str) -> AppResult<ShiftStatus> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop().unwrap()
            } else {
                match script.last() {
                    Some(Ok(status)) => Ok(status.clone()),
                    _ => Err(AppError::NotFound("Shift not found".to_string())),
                }
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_on_terminal_status() {
        let source = Scripted::new(vec![
            Ok(ShiftStatus::Waiting),
            Ok(ShiftStatus::Processing),
            Ok(ShiftStatus::Settled),
        ]);
        let handle = ShiftPoller::spawn(source.clone(), "s-1", DEFAULT_POLL_INTERVAL);

        assert_eq!(handle.wait().await, Some(ShiftStatus::Settled));
        assert_eq!(source.calls(), 3);

        // No further lookups once settled
        tokio::time::sleep(DEFAULT_POLL_INTERVAL * 5).await;
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_do_not_stop_polling() {
        let source = Scripted::new(vec![
            Err(AppError::NotFound("Shift not found".to_string())),
            Ok(ShiftStatus::Waiting),
            Ok(ShiftStatus::Expired),
        ]);
        let handle = ShiftPoller::spawn(source.clone(), "s-2", Duration::from_secs(1));
        assert_eq!(handle.wait().await, Some(ShiftStatus::Expired));
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_clamped() {
        let source = Scripted::new(vec![Ok(ShiftStatus::Waiting), Ok(ShiftStatus::Refunded)]);
        let start = tokio::time::Instant::now();
        let handle = ShiftPoller::spawn(source.clone(), "s-5", Duration::ZERO);

        assert_eq!(handle.wait().await, Some(ShiftStatus::Refunded));
        assert_eq!(source.calls(), 2);
        assert!(start.elapsed() >= MIN_POLL_INTERVAL);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_rescheduling() {
        let source = Scripted::new(vec![Ok(ShiftStatus::Waiting)]);
        let handle = ShiftPoller::spawn(source.clone(), "s-3", DEFAULT_POLL_INTERVAL);
        let mut updates = handle.subscribe();

        updates.changed().await.unwrap();
        assert_eq!(handle.latest(), Some(ShiftStatus::Waiting));
        assert!(!handle.is_finished());

        assert_eq!(handle.cancel().await, Some(ShiftStatus::Waiting));
        let calls = source.calls();

        tokio::time::sleep(DEFAULT_POLL_INTERVAL * 5).await;
        assert_eq!(source.calls(), calls);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels() {
        let source = Scripted::new(vec![Ok(ShiftStatus::Pending)]);
        let handle = ShiftPoller::spawn(source.clone(), "s-4", DEFAULT_POLL_INTERVAL);
        let mut updates = handle.subscribe();
        updates.changed().await.unwrap();

        drop(handle);
        // Let the task observe the closed channel
        tokio::time::sleep(Duration::from_millis(1)).await;
        let calls = source.calls();

        tokio::time::sleep(DEFAULT_POLL_INTERVAL * 5).await;
        assert_eq!(source.calls(), calls);
    }
}
