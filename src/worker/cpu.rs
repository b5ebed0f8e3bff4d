//! CPU-based worker for random key generation.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{SendTimeoutError, Sender};

use crate::crypto::{KeyError, PrivateKey};

use super::GeneratedKey;

/// How long a blocked send waits before re-checking the stop flag.
const SEND_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Statistics shared by all CPU workers.
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Keys generated and delivered
    pub keys_generated: AtomicU64,
    /// Generation or derivation failures
    pub failures: AtomicU64,
}

impl WorkerStats {
    /// Creates new worker stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total keys generated.
    pub fn total_keys(&self) -> u64 {
        self.keys_generated.load(Ordering::Relaxed)
    }

    /// Returns the total failures.
    pub fn total_failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

/// A CPU worker that generates keys and derives their addresses.
pub struct CpuWorker {
    /// Worker ID
    id: usize,
    /// Channel to send results
    result_tx: Sender<GeneratedKey>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Worker statistics
    stats: Arc<WorkerStats>,
}

impl CpuWorker {
    /// Creates a new CPU worker.
    pub fn new(
        id: usize,
        result_tx: Sender<GeneratedKey>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Self {
        Self {
            id,
            result_tx,
            stop_flag,
            stats,
        }
    }

    /// Runs the worker loop.
    ///
    /// Generates keys and sends them through the channel until:
    /// - Stop flag is set
    /// - Channel is closed
    pub fn run(&self) {
        while !self.stop_flag.load(Ordering::Relaxed) {
            let result = match self.next_key() {
                Ok(result) => result,
                Err(e) => {
                    log::warn!("worker {}: key generation failed: {}", self.id, e);
                    self.stats.failures.fetch_add(1, Ordering::Relaxed);
                    continue;
                }
            };

            if !self.deliver(result) {
                break;
            }
            self.stats.keys_generated.fetch_add(1, Ordering::Relaxed);
        }
        log::debug!("worker {} stopped", self.id);
    }

    fn next_key(&self) -> Result<GeneratedKey, KeyError> {
        let key = PrivateKey::generate()?;
        Ok(GeneratedKey {
            address: key.address()?.to_string(),
            public_key: key.public_key_string()?,
            private_key: key.to_key_string().to_owned(),
            worker_id: self.id,
        })
    }

    /// Sends a result, returning false once the worker should exit.
    fn deliver(&self, mut result: GeneratedKey) -> bool {
        loop {
            match self.result_tx.send_timeout(result, SEND_POLL_INTERVAL) {
                Ok(()) => return true,
                Err(SendTimeoutError::Timeout(pending)) => {
                    if self.stop_flag.load(Ordering::Relaxed) {
                        return false;
                    }
                    result = pending;
                }
                Err(SendTimeoutError::Disconnected(_)) => return false,
            }
        }
    }

    /// Returns the worker ID.
    pub fn id(&self) -> usize {
        self.id
    }
}
