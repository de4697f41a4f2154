//! Process-wide allocation instrumentation.
//!
//! [`CountingAllocator`] wraps the system allocator and accumulates call
//! counts, requested bytes and time spent for every allocation and
//! deallocation in the process. Nothing is ever reset: callers take a
//! snapshot before and after the measured block and subtract.

use std::alloc::{GlobalAlloc, Layout, System};
use std::ops::{Add, Sub};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;

/// Point-in-time snapshot of one side (alloc or dealloc) of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AllocInfo {
    /// Number of calls
    pub calls: u64,
    /// Requested bytes (always zero on the dealloc side)
    pub total_bytes: u64,
    /// Cumulative time spent inside the system allocator
    pub time_spent_ns: u64,
}

impl Sub for AllocInfo {
    type Output = AllocInfo;

    fn sub(self, rhs: AllocInfo) -> AllocInfo {
        AllocInfo {
            calls: self.calls.wrapping_sub(rhs.calls),
            total_bytes: self.total_bytes.wrapping_sub(rhs.total_bytes),
            time_spent_ns: self.time_spent_ns.wrapping_sub(rhs.time_spent_ns),
        }
    }
}

impl Add for AllocInfo {
    type Output = AllocInfo;

    fn add(self, rhs: AllocInfo) -> AllocInfo {
        AllocInfo {
            calls: self.calls.wrapping_add(rhs.calls),
            total_bytes: self.total_bytes.wrapping_add(rhs.total_bytes),
            time_spent_ns: self.time_spent_ns.wrapping_add(rhs.time_spent_ns),
        }
    }
}

/// Source of allocation snapshots.
///
/// Targets that can hook the allocator use [`CountingAllocator`]; everything
/// else uses [`NoopTracker`], which always reports zero.
#[cfg_attr(test, mockall::automock)]
pub trait AllocationTracker {
    /// Cumulative allocation side
    fn new_info(&self) -> AllocInfo;

    /// Cumulative deallocation side
    fn delete_info(&self) -> AllocInfo;
}

struct Counters {
    calls: AtomicU64,
    total_bytes: AtomicU64,
    time_spent_ns: AtomicU64,
}

impl Counters {
    const fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            total_bytes: AtomicU64::new(0),
            time_spent_ns: AtomicU64::new(0),
        }
    }

    fn record(&self, bytes: u64, started: Instant) {
        let elapsed = started.elapsed().as_nanos() as u64;
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.total_bytes.fetch_add(bytes, Ordering::Relaxed);
        self.time_spent_ns.fetch_add(elapsed, Ordering::Relaxed);
    }

    fn snapshot(&self) -> AllocInfo {
        AllocInfo {
            calls: self.calls.load(Ordering::Relaxed),
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
            time_spent_ns: self.time_spent_ns.load(Ordering::Relaxed),
        }
    }
}

static NEW_INFO: Counters = Counters::new();
static DELETE_INFO: Counters = Counters::new();

/// Counting wrapper around [`System`].
///
/// Install it with `#[global_allocator]` to trace the whole process. The
/// counters are only updated through this type, so without the attribute
/// every snapshot stays at zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct CountingAllocator;

// SAFETY: every call is forwarded unchanged to `System`; the bookkeeping
// itself never allocates.
unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let started = Instant::now();
        let ptr = unsafe { System.alloc(layout) };
        NEW_INFO.record(layout.size() as u64, started);
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        let started = Instant::now();
        unsafe { System.dealloc(ptr, layout) };
        DELETE_INFO.record(0, started);
    }
}

impl AllocationTracker for CountingAllocator {
    fn new_info(&self) -> AllocInfo {
        NEW_INFO.snapshot()
    }

    fn delete_info(&self) -> AllocInfo {
        DELETE_INFO.snapshot()
    }
}

/// Tracker for builds without the allocator hook.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTracker;

impl AllocationTracker for NoopTracker {
    fn new_info(&self) -> AllocInfo {
        AllocInfo::default()
    }

    fn delete_info(&self) -> AllocInfo {
        AllocInfo::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_difference() {
        let before = AllocInfo {
            calls: 3,
            total_bytes: 100,
            time_spent_ns: 40,
        };
        let after = AllocInfo {
            calls: 7,
            total_bytes: 356,
            time_spent_ns: 90,
        };

        assert_eq!(
            after - before,
            AllocInfo {
                calls: 4,
                total_bytes: 256,
                time_spent_ns: 50,
            }
        );
        assert_eq!(after - after, AllocInfo::default());
    }

    #[test]
    fn test_noop_tracker_is_zero() {
        assert_eq!(NoopTracker.new_info(), AllocInfo::default());
        assert_eq!(NoopTracker.delete_info(), AllocInfo::default());
    }

    #[test]
    fn test_direct_calls_are_counted() {
        // The unit test binary runs on the system allocator, so only the
        // calls below touch the counters.
        let tracker = CountingAllocator;
        let new_before = tracker.new_info();
        let delete_before = tracker.delete_info();

        let small = Layout::from_size_align(24, 8).unwrap();
        let large = Layout::from_size_align(1000, 16).unwrap();
        unsafe {
            let a = CountingAllocator.alloc(small);
            let b = CountingAllocator.alloc(large);
            assert!(!a.is_null() && !b.is_null());
            CountingAllocator.dealloc(a, small);
            CountingAllocator.dealloc(b, large);
        }

        let allocated = tracker.new_info() - new_before;
        let freed = tracker.delete_info() - delete_before;
        assert_eq!(allocated.calls, 2);
        assert_eq!(allocated.total_bytes, 1024);
        assert_eq!(freed.calls, 2);
        assert_eq!(freed.total_bytes, 0);
    }
}
