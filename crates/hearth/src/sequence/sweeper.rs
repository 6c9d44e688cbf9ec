//! Background removal of idle sequences.

use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
use std::time::Duration;
use tokio::{sync::Notify, task::JoinHandle, time::{self, Instant, MissedTickBehavior}};
use tracing::{debug, info};
use crate::config::StatefulConfig;
use crate::error::ConfigError;
use super::manager::SequenceManager;

/// A handle to the task that periodically sweeps timed out sequences out of
/// a [`SequenceManager`].
///
/// The task sweeps once when it starts, then once per interval. It stops
/// when [`shutdown`](Self::shutdown) or [`stop`](Self::stop) is called, or
/// when the handle is dropped.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use hearth::sequence::{SequenceManager, SequenceSweeper};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let manager = Arc::new(SequenceManager::new(60, 24));
/// let sweeper = SequenceSweeper::spawn(manager.clone(), Duration::from_secs(300)).unwrap();
///
/// // sweep right away instead of waiting for the next tick
/// sweeper.notify();
/// sweeper.stop().await;
/// # }
/// ```
pub struct SequenceSweeper {
    /// Cleared to ask the task to exit
    running: Arc<AtomicBool>,

    /// `None` once shutdown has begun
    handle: Option<JoinHandle<()>>,

    /// Wakes the task for an immediate sweep or to observe shutdown
    notifier: Arc<Notify>,
}

impl SequenceSweeper {
    /// Start sweeping `manager` every `interval`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] when `interval` is zero
    pub fn spawn(manager: Arc<SequenceManager>, interval: Duration) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::Invalid {
                field: "sequence_cleaner_interval_seconds",
                reason: "must be at least one second".to_string(),
            });
        }
        let running = Arc::new(AtomicBool::new(true));
        let notifier = Arc::new(Notify::new());
        let handle = tokio::spawn(sweep(manager, interval, running.clone(), notifier.clone()));

        Ok(Self {
            running,
            handle: Some(handle),
            notifier,
        })
    }

    /// Start sweeping at the configured cleaner interval
    pub fn from_config(manager: Arc<SequenceManager>, config: &StatefulConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::spawn(manager, config.cleaner_interval())
    }

    /// Sweep now rather than at the next tick
    pub fn notify(&self) {
        self.notifier.notify_one();
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Ask the task to exit without waiting for it.
    ///
    /// Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.notifier.notify_one();
        // dropping the handle detaches the task, which exits on its next wake
        self.handle.take();
    }

    /// Ask the task to exit and wait until it has
    pub async fn stop(mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.notifier.notify_one();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for SequenceSweeper {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn sweep(
    manager: Arc<SequenceManager>,
    interval: Duration,
    running: Arc<AtomicBool>,
    notifier: Arc<Notify>,
) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    debug!(?interval, "sequence sweeper started");

    while running.load(Ordering::SeqCst) {
        tokio::select! {
            _ = ticker.tick() => {},
            _ = notifier.notified() => {},
        }
        if !running.load(Ordering::SeqCst) {
            break;
        }
        let removed = manager.remove_timed_out_sequences(Instant::now());
        if removed > 0 {
            info!(removed, remaining = manager.sequences_count(), "removed timed out sequences");
        }
    }
    debug!("sequence sweeper stopped");
}
