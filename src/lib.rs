//! Solbench - Solution Checking and Benchmarking Harness
//!
//! This library registers small algorithmic problems together with several
//! competing solutions and test case sets, then checks, prints or benchmarks
//! every selected solution.
//!
//! # Features
//!
//! - Deterministic solution ordering with configurable priorities
//! - Custom test cases from stdin or a file
//! - Wall time, cpu time, peak heap and allocation counters
//! - JSON report of every solution run
//!
//! # Architecture
//!
//! - **Problems**: built-in problem definitions, registered at start-up
//! - **Registry**: type-erased index of problems, run in name order
//! - **Benchmark**: the engine running one problem's solutions
//! - **Models**: problem values, test cases, solutions and reports

pub mod app;
pub mod benchmark;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod ordering;
pub mod problems;
pub mod registry;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, AppResult};
pub use registry::Registry;
