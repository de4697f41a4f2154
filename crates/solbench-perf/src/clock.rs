//! Clock and process resource readings

use std::sync::OnceLock;
use std::time::Instant;

fn anchor() -> Instant {
    static ANCHOR: OnceLock<Instant> = OnceLock::new();
    *ANCHOR.get_or_init(Instant::now)
}

/// Monotonic clock in microseconds
pub fn now_micros() -> i64 {
    anchor().elapsed().as_micros() as i64
}

/// User CPU time consumed by this process, in microseconds
#[cfg(unix)]
pub fn cpu_user_micros() -> i64 {
    use nix::sys::resource::{getrusage, UsageWho};

    getrusage(UsageWho::RUSAGE_SELF)
        .map(|usage| {
            let time = usage.user_time();
            time.tv_sec() as i64 * 1_000_000 + time.tv_usec() as i64
        })
        .unwrap_or(0)
}

#[cfg(not(unix))]
pub fn cpu_user_micros() -> i64 {
    0
}

/// Peak resident memory of this process, in bytes
#[cfg(unix)]
pub fn peak_heap_bytes() -> i64 {
    use nix::sys::resource::{getrusage, UsageWho};

    let max_rss = getrusage(UsageWho::RUSAGE_SELF)
        .map(|usage| usage.max_rss() as i64)
        .unwrap_or(0);

    // macOS reports bytes, everything else kilobytes
    if cfg!(target_os = "macos") {
        max_rss
    } else {
        max_rss * 1024
    }
}

#[cfg(not(unix))]
pub fn peak_heap_bytes() -> i64 {
    0
}
