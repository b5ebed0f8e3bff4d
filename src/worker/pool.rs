//! Worker pool management.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, Sender};

use super::cpu::{CpuWorker, WorkerStats};

/// Capacity of the result channel shared by all workers.
const RESULT_CHANNEL_CAPACITY: usize = 100;

/// A freshly generated key in its text forms.
#[derive(Debug, Clone)]
pub struct GeneratedKey {
    /// The Base58Check private key string
    pub private_key: String,
    /// The public key string (ACT prefixed)
    pub public_key: String,
    /// The account address (ACT prefixed)
    pub address: String,
    /// The ID of the worker that generated this key
    pub worker_id: usize,
}

/// Manages a pool of workers for parallel key generation.
pub struct WorkerPool {
    /// Number of workers
    num_workers: usize,
    /// Worker thread handles (Option to allow taking during join)
    handles: Option<Vec<JoinHandle<()>>>,
    /// Channel receiver for results
    result_rx: Receiver<GeneratedKey>,
    /// Shared stop flag
    stop_flag: Arc<AtomicBool>,
    /// Shared statistics
    stats: Arc<WorkerStats>,
    /// Start time
    start_time: Instant,
}

impl WorkerPool {
    /// Creates a new worker pool with the specified number of workers.
    pub fn new(num_workers: usize) -> Self {
        let (result_tx, result_rx) = bounded(RESULT_CHANNEL_CAPACITY);
        let stop_flag = Arc::new(AtomicBool::new(false));
        let stats = Arc::new(WorkerStats::new());

        let handles = Self::spawn_workers(num_workers, result_tx, stop_flag.clone(), stats.clone());
        log::info!("started {} key generation workers", handles.len());

        Self {
            num_workers: handles.len(),
            handles: Some(handles),
            result_rx,
            stop_flag,
            stats,
            start_time: Instant::now(),
        }
    }

    /// Spawns worker threads.
    fn spawn_workers(
        num_workers: usize,
        result_tx: Sender<GeneratedKey>,
        stop_flag: Arc<AtomicBool>,
        stats: Arc<WorkerStats>,
    ) -> Vec<JoinHandle<()>> {
        (0..num_workers)
            .filter_map(|id| {
                let result_tx = result_tx.clone();
                let stop_flag = stop_flag.clone();
                let stats = stats.clone();

                let spawned = thread::Builder::new()
                    .name(format!("act-key-worker-{}", id))
                    .spawn(move || {
                        let worker = CpuWorker::new(id, result_tx, stop_flag, stats);
                        worker.run();
                    });

                match spawned {
                    Ok(handle) => Some(handle),
                    Err(e) => {
                        log::warn!("failed to spawn worker {}: {}", id, e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Waits for a result with optional timeout.
    ///
    /// Returns `Some(result)` if a key arrives, `None` if timeout expires.
    pub fn wait_for_result(&self, timeout: Duration) -> Option<GeneratedKey> {
        self.result_rx.recv_timeout(timeout).ok()
    }

    /// Attempts to receive a result without blocking.
    pub fn try_recv(&self) -> Option<GeneratedKey> {
        self.result_rx.try_recv().ok()
    }

    /// Signals all workers to stop.
    pub fn stop(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    /// Waits for all workers to complete.
    pub fn join(mut self) {
        self.join_workers();
    }

    fn join_workers(&mut self) {
        self.stop();
        if let Some(handles) = self.handles.take() {
            for handle in handles {
                let _ = handle.join();
            }
        }
    }

    /// Returns the number of workers.
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Returns the total keys generated across all workers.
    pub fn total_keys(&self) -> u64 {
        self.stats.total_keys()
    }

    /// Returns the total generation failures.
    pub fn total_failures(&self) -> u64 {
        self.stats.total_failures()
    }

    /// Returns the elapsed time since the pool was created.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Returns the current generation rate (keys per second).
    pub fn keys_per_second(&self) -> f64 {
        let elapsed = self.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            self.total_keys() as f64 / elapsed
        } else {
            0.0
        }
    }

    /// Returns a clone of the stop flag for external use (e.g., signal handlers).
    pub fn stop_flag_clone(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }

    /// Returns true if the pool has been signaled to stop.
    pub fn is_stopped(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Wait for workers to finish if they haven't been joined
        self.join_workers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::PrivateKey;

    #[test]
    fn test_pool_delivers_valid_keys() {
        let pool = WorkerPool::new(2);
        assert_eq!(pool.num_workers(), 2);

        let mut received = Vec::new();
        while received.len() < 10 {
            let result = pool
                .wait_for_result(Duration::from_secs(10))
                .expect("worker produced no key");
            received.push(result);
        }
        pool.join();

        for generated in &received {
            let key = PrivateKey::from_encoded_text(&generated.private_key).unwrap();
            assert_eq!(key.address().unwrap().to_string(), generated.address);
            assert_eq!(key.public_key_string().unwrap(), generated.public_key);
            assert!(generated.worker_id < 2);
        }
    }

    #[test]
    fn test_join_with_full_channel() {
        let pool = WorkerPool::new(1);
        // Let the channel fill up before stopping
        while pool.total_keys() < RESULT_CHANNEL_CAPACITY as u64 {
            thread::sleep(Duration::from_millis(10));
        }
        pool.join();
    }

    #[test]
    fn test_stop_flag() {
        let pool = WorkerPool::new(1);
        assert!(!pool.is_stopped());
        pool.stop_flag_clone().store(true, Ordering::Relaxed);
        assert!(pool.is_stopped());
        assert_eq!(pool.total_failures(), 0);
    }
}
