//! Performance measurement for solbench.
//!
//! Provides the multi-channel [`PerformanceCounter`] and the process-wide
//! allocation instrumentation it reads from.
//!
//! # Example
//!
//! ```ignore
//! use solbench_perf::{Channel, NoopTracker, PerformanceCounter};
//!
//! let mut counter = PerformanceCounter::new(&NoopTracker);
//! counter.enable_all(&[Channel::ExecTime, Channel::AllocCalls]);
//! // ... measured work ...
//! counter.print_to(&mut std::io::stdout(), true)?;
//! ```

pub mod alloc;
pub mod clock;
pub mod counter;
pub mod format;

pub use alloc::{AllocInfo, AllocationTracker, CountingAllocator, NoopTracker};
pub use counter::{Baseline, Channel, PerformanceCounter};
pub use format::{format_time, write_time};
