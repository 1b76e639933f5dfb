use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    thread::{self, JoinHandle},
    time::Duration,
};

use crate::error::EngineError;

use super::{lock, Transport};

/// Owned handle to the look-ahead timer thread.
///
/// The thread wakes every `interval`, runs one scheduler pass and goes back
/// to sleep. Stopping sets the flag (checked before every pass), wakes the
/// thread and joins it. Voices already handed to the renderer keep playing.
pub struct SchedulerTask {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SchedulerTask {
    pub(crate) fn spawn(
        transport: Arc<Mutex<Transport>>,
        interval: Duration,
    ) -> Result<Self, EngineError> {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);

        let handle = thread::Builder::new()
            .name("tactical-scheduler".into())
            .spawn(move || {
                tracing::debug!(?interval, "scheduler started");
                while !flag.load(Ordering::Acquire) {
                    lock(&transport).tick();
                    thread::park_timeout(interval);
                }
                tracing::debug!("scheduler stopped");
            })
            .map_err(EngineError::SchedulerSpawn)?;

        Ok(Self {
            stop,
            handle: Some(handle),
        })
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Invalidate the handle and wait for the thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                tracing::warn!("scheduler thread panicked");
            }
        }
    }
}

impl Drop for SchedulerTask {
    fn drop(&mut self) {
        self.shutdown();
    }
}
