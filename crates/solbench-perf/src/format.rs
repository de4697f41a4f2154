//! Human-readable time rendering

use std::fmt;
use std::io;

/// Below this many microseconds values print as microseconds
const MICROS_TIER: i64 = 100_000;

/// Below this many microseconds values print as milliseconds
const MILLIS_TIER: i64 = 100_000_000;

/// Wrapper rendering a microsecond value with three-tier truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Micros(pub i64);

impl fmt::Display for Micros {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let us = self.0;
        if us < MICROS_TIER {
            write!(f, "{} us.", us)
        } else if us < MILLIS_TIER {
            write!(f, "{} ms.", us / 1000)
        } else {
            write!(f, "{} s.", us / 1_000_000)
        }
    }
}

/// Format microseconds as `N us.`, `N ms.` or `N s.` (always truncating)
pub fn format_time(us: i64) -> String {
    Micros(us).to_string()
}

/// Write microseconds in the same format without an intermediate string
pub fn write_time<W: io::Write + ?Sized>(out: &mut W, us: i64) -> io::Result<()> {
    write!(out, "{}", Micros(us))
}
