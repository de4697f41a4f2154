//! Per-solution run results, written as the JSON report

use serde::Serialize;
use solbench_perf::AllocInfo;

use crate::config::Task;

/// How a solution run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Mismatch,
    Printed,
    Benchmarked,
}

/// Result of running one solution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SolutionReport {
    pub problem: String,
    pub student: String,
    pub implementation: String,
    pub task: Task,
    pub outcome: Outcome,
    /// Cases evaluated (test tasks)
    pub cases: usize,
    /// Tag of the first mismatching case
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_case: Option<String>,
    /// Full corpus passes (benchmark task)
    pub iterations: u64,
    pub elapsed_us: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alloc: Option<AllocInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dealloc: Option<AllocInfo>,
}

impl SolutionReport {
    pub fn new(problem: &str, student: &str, implementation: &str, task: Task) -> Self {
        Self {
            problem: problem.to_string(),
            student: student.to_string(),
            implementation: implementation.to_string(),
            task,
            outcome: match task {
                Task::CheckOutput => Outcome::Passed,
                Task::PrintOutput => Outcome::Printed,
                Task::Benchmark => Outcome::Benchmarked,
            },
            cases: 0,
            failed_case: None,
            iterations: 0,
            elapsed_us: 0,
            alloc: None,
            dealloc: None,
        }
    }
}
