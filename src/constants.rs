//! Application-wide constants
//!
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// BENCHMARK DEFAULTS
// =============================================================================

/// Default benchmark wall time limit per solution, in milliseconds
pub const DEFAULT_BENCHMARK_TIME_LIMIT_MS: i64 = 10_000;

/// Hard ceiling on full corpus passes per benchmarked solution
pub const MAX_BENCHMARK_ITERATIONS: u64 = 1_000_000;

// =============================================================================
// ORDERING
// =============================================================================

/// Implementation names ranked ahead of everything else by default
pub const DEFAULT_IMPL_ORDER: &[(&str, i32)] = &[("naive", 1)];

// =============================================================================
// STREAM NAMES
// =============================================================================

/// Special stream names resolved instead of file paths
pub mod streams {
    pub const STDIN: &str = "stdin";
    pub const STDOUT: &str = "stdout";
    pub const STDERR: &str = "stderr";
    pub const NULL: &str = "null";
}

// =============================================================================
// TEST CASE SOURCES
// =============================================================================

/// Source names for test cases
pub mod sources {
    /// Cases compiled into the binary
    pub const COMPILE_TIME: &str = "compile-time";
    /// Single custom case read from process stdin
    pub const CLI_STDIN: &str = "cli-stdin";
    /// Single custom case read from a file
    pub const CLI_FILE: &str = "cli-file";
}

// =============================================================================
// LOGGING
// =============================================================================

/// Tracing filter used when `RUST_LOG` is not set
pub const DEFAULT_LOG_FILTER: &str = "solbench=warn";
