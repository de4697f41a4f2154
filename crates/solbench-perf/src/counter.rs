//! Multi-channel sampling performance counter.
//!
//! A counter records a baseline for each channel the first time the channel
//! is enabled, and reports `current - baseline` when printed. Counters are
//! cheap, stack-only values meant to live for exactly one measured scope
//! (a whole run, one solution, or one test case).

use std::io::{self, Write};

use crate::alloc::{AllocInfo, AllocationTracker};
use crate::clock;
use crate::format::write_time;

/// Measurement channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Channel {
    /// Wall clock time
    ExecTime,
    /// Process user CPU time
    CpuClock,
    /// Peak resident memory (no baseline)
    PeakHeap,
    /// Allocation calls and bytes
    AllocCalls,
    /// Deallocation calls
    DeallocCalls,
    /// Share of wall time spent inside alloc and dealloc
    TimeSpentAlloc,
}

impl Channel {
    /// Number of channels
    pub const COUNT: usize = 6;

    /// Every channel in report order
    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::ExecTime,
        Channel::CpuClock,
        Channel::PeakHeap,
        Channel::AllocCalls,
        Channel::DeallocCalls,
        Channel::TimeSpentAlloc,
    ];

    /// Channels enabled by allocation tracing
    pub const ALLOC_TRACE: [Channel; 3] = [
        Channel::AllocCalls,
        Channel::DeallocCalls,
        Channel::TimeSpentAlloc,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

/// Starting value recorded for one channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Baseline {
    /// Clock reading in microseconds
    Micros(i64),
    /// Channel is read as an instantaneous value
    Instantaneous,
    /// Allocation side snapshot
    Alloc(AllocInfo),
    /// Deallocation side snapshot
    Dealloc(AllocInfo),
    /// Time spent in both allocator sides
    AllocTime { new_ns: u64, delete_ns: u64 },
}

/// Sampling counter over a selectable set of channels
pub struct PerformanceCounter<'t> {
    tracker: &'t dyn AllocationTracker,
    created_us: i64,
    baselines: [Option<Baseline>; Channel::COUNT],
    /// End readings frozen by `stop`
    ends: [Option<Baseline>; Channel::COUNT],
    stopped_us: Option<i64>,
    /// Allocator activity of excluded blocks, subtracted from every read
    excluded_new: AllocInfo,
    excluded_delete: AllocInfo,
}

impl<'t> PerformanceCounter<'t> {
    /// Create a counter with no channels enabled
    pub fn new(tracker: &'t dyn AllocationTracker) -> Self {
        Self {
            tracker,
            created_us: clock::now_micros(),
            baselines: [None; Channel::COUNT],
            ends: [None; Channel::COUNT],
            stopped_us: None,
            excluded_new: AllocInfo::default(),
            excluded_delete: AllocInfo::default(),
        }
    }

    /// Create a counter and enable the given channels
    pub fn with_channels(tracker: &'t dyn AllocationTracker, channels: &[Channel]) -> Self {
        let mut counter = Self::new(tracker);
        counter.enable_all(channels);
        counter
    }

    /// Enable a channel, recording its baseline.
    ///
    /// Enabling an already enabled channel is a no-op.
    pub fn enable(&mut self, channel: Channel) {
        let slot = &self.baselines[channel.index()];
        if slot.is_some() {
            return;
        }
        let baseline = self.sample(channel);
        self.baselines[channel.index()] = Some(baseline);
    }

    pub fn enable_all(&mut self, channels: &[Channel]) {
        for &channel in channels {
            self.enable(channel);
        }
    }

    pub fn is_enabled(&self, channel: Channel) -> bool {
        self.baselines[channel.index()].is_some()
    }

    pub fn baseline(&self, channel: Channel) -> Option<Baseline> {
        self.baselines[channel.index()]
    }

    fn sample(&self, channel: Channel) -> Baseline {
        match channel {
            Channel::ExecTime => Baseline::Micros(clock::now_micros()),
            Channel::CpuClock => Baseline::Micros(clock::cpu_user_micros()),
            Channel::PeakHeap => Baseline::Instantaneous,
            Channel::AllocCalls => Baseline::Alloc(self.tracker.new_info()),
            Channel::DeallocCalls => Baseline::Dealloc(self.tracker.delete_info()),
            Channel::TimeSpentAlloc => Baseline::AllocTime {
                new_ns: self.tracker.new_info().time_spent_ns,
                delete_ns: self.tracker.delete_info().time_spent_ns,
            },
        }
    }

    /// Frozen end reading of a channel, or a fresh sample
    fn end_reading(&self, channel: Channel) -> Baseline {
        self.ends[channel.index()].unwrap_or_else(|| self.sample(channel))
    }

    /// Freeze the end readings of every enabled channel.
    ///
    /// Reads and prints after this report the frozen values, so the work of
    /// rendering them is not measured. Stopping twice keeps the first readings.
    pub fn stop(&mut self) {
        if self.stopped_us.is_some() {
            return;
        }
        self.stopped_us = Some(clock::now_micros());
        for channel in Channel::ALL {
            if self.is_enabled(channel) {
                self.ends[channel.index()] = Some(self.sample(channel));
            }
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped_us.is_some()
    }

    fn traces_alloc(&self) -> bool {
        Channel::ALLOC_TRACE.iter().any(|&channel| self.is_enabled(channel))
    }

    /// Run `f` and leave its allocator activity out of this counter
    pub fn exclude<R>(&mut self, f: impl FnOnce() -> R) -> R {
        if !self.traces_alloc() || self.is_stopped() {
            return f();
        }
        let new_before = self.tracker.new_info();
        let delete_before = self.tracker.delete_info();
        let result = f();
        self.excluded_new = self.excluded_new + (self.tracker.new_info() - new_before);
        self.excluded_delete = self.excluded_delete + (self.tracker.delete_info() - delete_before);
        result
    }

    /// Exec time baseline, or the construction instant when not enabled
    fn exec_start_us(&self) -> i64 {
        match self.baseline(Channel::ExecTime) {
            Some(Baseline::Micros(start)) => start,
            _ => self.created_us,
        }
    }

    /// Wall time since the exec time baseline, up to `stop` if stopped
    pub fn elapsed_us(&self) -> i64 {
        self.stopped_us.unwrap_or_else(clock::now_micros) - self.exec_start_us()
    }

    /// True when more than `limit_us` microseconds have passed
    pub fn is_timed_out(&self, limit_us: i64) -> bool {
        self.elapsed_us() > limit_us
    }

    /// Allocations since the channel was enabled
    pub fn alloc_delta(&self) -> Option<AllocInfo> {
        match (self.baseline(Channel::AllocCalls), self.ends[Channel::AllocCalls.index()]) {
            (Some(Baseline::Alloc(start)), Some(Baseline::Alloc(end))) => {
                Some(end - start - self.excluded_new)
            }
            (Some(Baseline::Alloc(start)), _) => {
                Some(self.tracker.new_info() - start - self.excluded_new)
            }
            _ => None,
        }
    }

    /// Deallocations since the channel was enabled
    pub fn dealloc_delta(&self) -> Option<AllocInfo> {
        match (self.baseline(Channel::DeallocCalls), self.ends[Channel::DeallocCalls.index()]) {
            (Some(Baseline::Dealloc(start)), Some(Baseline::Dealloc(end))) => {
                Some(end - start - self.excluded_delete)
            }
            (Some(Baseline::Dealloc(start)), _) => {
                Some(self.tracker.delete_info() - start - self.excluded_delete)
            }
            _ => None,
        }
    }

    /// Nanoseconds spent in alloc and dealloc since the channel was enabled
    pub fn alloc_time_ns(&self) -> Option<u64> {
        let Some(Baseline::AllocTime { new_ns: start_new, delete_ns: start_delete }) =
            self.baseline(Channel::TimeSpentAlloc)
        else {
            return None;
        };
        let Baseline::AllocTime { new_ns, delete_ns } = self.end_reading(Channel::TimeSpentAlloc)
        else {
            return None;
        };
        let excluded = self
            .excluded_new
            .time_spent_ns
            .wrapping_add(self.excluded_delete.time_spent_ns);
        Some(
            new_ns
                .wrapping_sub(start_new)
                .wrapping_add(delete_ns.wrapping_sub(start_delete))
                .wrapping_sub(excluded),
        )
    }

    /// Render every enabled channel as `, label: value` fragments
    pub fn print_to<W: Write + ?Sized>(&self, out: &mut W, add_newline: bool) -> io::Result<()> {
        for channel in Channel::ALL {
            let Some(baseline) = self.baseline(channel) else {
                continue;
            };
            match (channel, baseline) {
                (Channel::ExecTime, Baseline::Micros(_)) => {
                    write!(out, ", exec time: ")?;
                    write_time(out, self.elapsed_us())?;
                }
                (Channel::CpuClock, Baseline::Micros(start)) => {
                    let end = match self.end_reading(channel) {
                        Baseline::Micros(end) => end,
                        _ => start,
                    };
                    write!(out, ", cpu user time: ")?;
                    write_time(out, end - start)?;
                }
                (Channel::PeakHeap, _) => {
                    write!(
                        out,
                        ", peak heap allocation: {} kB.",
                        clock::peak_heap_bytes() / 1024
                    )?;
                }
                (Channel::AllocCalls, _) => {
                    let info = self.alloc_delta().unwrap_or_default();
                    write!(
                        out,
                        ", alloc() calls: {}, total allocated: {} kB., time spent in alloc(): ",
                        info.calls,
                        info.total_bytes / 1024
                    )?;
                    write_time(out, (info.time_spent_ns / 1000) as i64)?;
                }
                (Channel::DeallocCalls, _) => {
                    let info = self.dealloc_delta().unwrap_or_default();
                    write!(
                        out,
                        ", dealloc() calls: {}, time spent in dealloc(): ",
                        info.calls
                    )?;
                    write_time(out, (info.time_spent_ns / 1000) as i64)?;
                }
                (Channel::TimeSpentAlloc, _) => {
                    let ns = self.alloc_time_ns().unwrap_or_default();
                    write!(
                        out,
                        ", percent of time in alloc+dealloc: {}%",
                        alloc_time_percent(ns, self.elapsed_us())
                    )?;
                }
                _ => {}
            }
        }
        if add_newline {
            writeln!(out)?;
            out.flush()?;
        }
        Ok(())
    }
}

/// Allocator time share as `(ns / 10) / elapsed_us`, truncated twice.
///
/// Zero elapsed time yields zero.
pub fn alloc_time_percent(ns: u64, elapsed_us: i64) -> u64 {
    if elapsed_us <= 0 {
        return 0;
    }
    (ns / 10) / elapsed_us as u64
}
