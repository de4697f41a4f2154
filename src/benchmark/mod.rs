//! Benchmark execution engine
//!
//! A problem run either checks every solution against the expected outputs,
//! prints the produced outputs, or replays the whole test corpus against
//! each solution until the time limit and reports the pass count.

pub mod context;
pub mod runner;

pub use context::RunContext;
pub use runner::replay_corpus;
