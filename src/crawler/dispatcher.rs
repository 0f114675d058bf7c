//! Memory-adaptive session dispatcher
//!
//! This module handles:
//! - Global concurrency limiting via a semaphore (the session ceiling)
//! - Holding back new sessions while system memory usage is high
//! - Returning task outputs in input order

use crate::config::DispatcherConfig;
use futures::future::join_all;
use std::future::Future;
use std::sync::{Arc, Mutex};
use sysinfo::{MemoryRefreshKind, RefreshKind, System};
use tokio::sync::{Semaphore, SemaphorePermit};

/// Source of system memory usage readings
pub trait MemoryProbe: Send + Sync {
    /// Current memory usage as a percentage of total memory
    fn used_percent(&self) -> f64;
}

/// [`MemoryProbe`] backed by `sysinfo`
pub struct SystemMemory {
    system: Mutex<System>,
}

impl SystemMemory {
    pub fn new() -> Self {
        let system = System::new_with_specifics(
            RefreshKind::nothing().with_memory(MemoryRefreshKind::everything()),
        );
        Self {
            system: Mutex::new(system),
        }
    }
}

impl Default for SystemMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryProbe for SystemMemory {
    fn used_percent(&self) -> f64 {
        let mut system = match self.system.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        system.refresh_memory();

        let total = system.total_memory();
        if total == 0 {
            return 0.0;
        }
        (system.used_memory() as f64 / total as f64) * 100.0
    }
}

/// Dispatcher that caps concurrent sessions and backs off under memory pressure
///
/// At most `max_session_permit` tasks run at once. Before a task starts, the
/// dispatcher samples memory usage; at or above the threshold the task waits
/// `check_interval` and tries again. A task always starts when no other task
/// is running, so a busy machine slows the batch down without stalling it.
pub struct MemoryAdaptiveDispatcher {
    config: DispatcherConfig,
    probe: Arc<dyn MemoryProbe>,
}

impl MemoryAdaptiveDispatcher {
    /// Creates a dispatcher that samples real system memory
    pub fn new(config: DispatcherConfig) -> Self {
        Self::with_probe(config, Arc::new(SystemMemory::new()))
    }

    /// Creates a dispatcher with a custom memory probe
    pub fn with_probe(config: DispatcherConfig, probe: Arc<dyn MemoryProbe>) -> Self {
        Self { config, probe }
    }

    /// Returns the session ceiling
    pub fn max_session_permit(&self) -> usize {
        self.config.max_session_permit
    }

    /// Runs `task` once per item and returns the outputs in item order
    ///
    /// # Arguments
    ///
    /// * `items` - Inputs, one task each
    /// * `task` - Builds the future for one input
    ///
    /// # Returns
    ///
    /// One output per input, at the input's position, regardless of the
    /// order in which tasks complete.
    pub async fn dispatch<I, T, F, Fut>(&self, items: Vec<I>, task: F) -> Vec<T>
    where
        F: Fn(I) -> Fut,
        Fut: Future<Output = T>,
    {
        let semaphore = Semaphore::new(self.config.max_session_permit);
        let semaphore = &semaphore;
        let task = &task;

        let sessions = items.into_iter().map(|item| async move {
            let _permit = self.acquire_session(semaphore).await;
            task(item).await
        });

        join_all(sessions).await
    }

    /// Waits for a session slot that memory pressure allows us to use
    async fn acquire_session<'s>(&self, semaphore: &'s Semaphore) -> Option<SemaphorePermit<'s>> {
        loop {
            let permit = semaphore.acquire().await.ok()?;

            let others_active = self
                .config
                .max_session_permit
                .saturating_sub(semaphore.available_permits() + 1);
            if others_active == 0 {
                return Some(permit);
            }

            let used = self.probe.used_percent();
            if used < self.config.memory_threshold_percent {
                return Some(permit);
            }

            tracing::debug!(
                "Memory usage {:.1}% >= {:.1}%, holding session back ({} active)",
                used,
                self.config.memory_threshold_percent,
                others_active
            );
            drop(permit);
            tokio::time::sleep(self.config.check_interval).await;
        }
    }
}
