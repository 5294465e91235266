//! Per-check repeating timers

use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::utils::error::{HealthError, Result};

/// Work run on every tick of a check's timer
pub type TickFn = Arc<dyn Fn(String) -> BoxFuture<'static, Result<()>> + Send + Sync>;

/// Owns at most one timer task per check id
///
/// Every tick runs in its own task, so a slow or failing execution never
/// delays the timer or any other check. Cancelling a timer leaves executions
/// already started by earlier ticks running to completion.
#[derive(Default)]
pub struct Scheduler {
    timers: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a timer for `id`, replacing any existing one.
    ///
    /// The first tick fires one `period` from now. Requires a Tokio runtime.
    pub fn schedule(&self, id: &str, period: Duration, tick: TickFn) -> Result<()> {
        if period.is_zero() {
            return Err(HealthError::validation(format!(
                "Check {} cannot be scheduled with a zero interval",
                id
            )));
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| HealthError::internal(format!("No runtime to schedule {}: {}", id, e)))?;
        let start = Instant::now().checked_add(period).ok_or_else(|| {
            HealthError::validation(format!(
                "Check {} interval of {}ms is out of range",
                id,
                period.as_millis()
            ))
        })?;

        let timer_id = id.to_string();
        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval_at(start, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                interval.tick().await;

                let id = timer_id.clone();
                let run = tick(id.clone());
                tokio::spawn(async move {
                    match AssertUnwindSafe(run).catch_unwind().await {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => error!("Scheduled execution of {} failed: {}", id, e),
                        Err(_) => error!("Scheduled execution of {} panicked", id),
                    }
                });
            }
        });

        if let Some(previous) = self.timers.lock().insert(id.to_string(), handle) {
            previous.abort();
            debug!("Replaced timer for check {}", id);
        }
        info!("Scheduled check {} every {}ms", id, period.as_millis());
        Ok(())
    }

    /// Stop the timer for `id`, returning whether one was running
    pub fn cancel(&self, id: &str) -> bool {
        match self.timers.lock().remove(id) {
            Some(handle) => {
                handle.abort();
                info!("Unscheduled check {}", id);
                true
            }
            None => false,
        }
    }

    pub fn is_scheduled(&self, id: &str) -> bool {
        self.timers.lock().contains_key(id)
    }

    /// Ids with an active timer, sorted
    pub fn scheduled_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.timers.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Cancel every timer, returning how many were running
    pub fn shutdown(&self) -> usize {
        let timers: Vec<_> = self.timers.lock().drain().collect();
        for (_, handle) in &timers {
            handle.abort();
        }
        if !timers.is_empty() {
            info!("Cancelled {} check timers", timers.len());
        }
        timers.len()
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        for (_, handle) in self.timers.get_mut().drain() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("scheduled", &self.scheduled_ids())
            .finish()
    }
}
