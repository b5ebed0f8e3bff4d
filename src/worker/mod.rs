//! Worker pool for parallel key generation.
//!
//! This module provides:
//! - Multi-threaded CPU workers
//! - Bounded result delivery with cooperative shutdown
//! - Progress tracking and reporting

mod cpu;
mod pool;

pub use cpu::{CpuWorker, WorkerStats};
pub use pool::{GeneratedKey, WorkerPool};
