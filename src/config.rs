//! Run configuration
//!
//! Configuration is layered: built-in defaults, then `SOLBENCH_*`
//! environment variables (a `.env` file is honored), then `--key value`
//! command-line pairs. The engine only ever sees the finished [`Config`].

use std::env;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::constants::{streams, DEFAULT_BENCHMARK_TIME_LIMIT_MS, DEFAULT_IMPL_ORDER};
use crate::ordering::{ordering_key, OrderingKey, OrderingTable};

/// What the engine does with every selected solution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    /// Compare outputs with expectations
    #[default]
    CheckOutput,
    /// Write outputs to the print stream
    PrintOutput,
    /// Replay the corpus until the time limit
    Benchmark,
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::CheckOutput => write!(f, "CheckOutput"),
            Task::PrintOutput => write!(f, "PrintOutput"),
            Task::Benchmark => write!(f, "Benchmark"),
        }
    }
}

impl FromStr for Task {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CheckOutput" | "check" => Ok(Task::CheckOutput),
            "PrintOutput" | "print" => Ok(Task::PrintOutput),
            "Benchmark" | "benchmark" => Ok(Task::Benchmark),
            _ => Err(ConfigError::InvalidValue {
                key: "task".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Stream names; resolved into readers and writers by `utils::streams`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamConfig {
    /// Custom test input, empty when absent
    pub test_input: String,
    /// Custom expected output, empty when absent
    pub test_output: String,
    /// Destination of printed outputs
    pub print: String,
    /// Destination of progress and result lines
    pub log: String,
    /// JSON report path, empty when disabled
    pub report: String,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            test_input: String::new(),
            test_output: String::new(),
            print: streams::STDOUT.to_string(),
            log: streams::STDOUT.to_string(),
            report: String::new(),
        }
    }
}

/// Main run configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Only run the problem with this exact name; empty runs all
    pub problem_filter: String,
    /// Only run implementations with this exact name; empty runs all
    pub impl_filter: String,
    /// Only run solutions from this exact student; empty runs all
    pub student_filter: String,
    pub task: Task,
    pub benchmark_time_limit_ms: i64,
    /// Report timing for every single case
    pub print_all_cases: bool,
    /// Report allocation counters
    pub enable_alloc_trace: bool,
    pub student_ordering: OrderingTable,
    pub impl_ordering: OrderingTable,
    pub streams: StreamConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            problem_filter: String::new(),
            impl_filter: String::new(),
            student_filter: String::new(),
            task: Task::default(),
            benchmark_time_limit_ms: DEFAULT_BENCHMARK_TIME_LIMIT_MS,
            print_all_cases: false,
            enable_alloc_trace: false,
            student_ordering: OrderingTable::new(),
            impl_ordering: DEFAULT_IMPL_ORDER.iter().copied().collect(),
            streams: StreamConfig::default(),
        }
    }
}

/// Environment variables and the option each one seeds
const ENV_OPTIONS: &[(&str, &str)] = &[
    ("SOLBENCH_TASK", "task"),
    ("SOLBENCH_BENCHMARK_LIMIT_MS", "benchmark-limit-ms"),
    ("SOLBENCH_PRINT_ALL_CASES", "print-all-cases"),
    ("SOLBENCH_ALLOC_TRACE", "alloc-trace"),
    ("SOLBENCH_PRINT", "print"),
    ("SOLBENCH_LOG", "log"),
];

impl Config {
    /// Load configuration from the environment and command-line arguments
    /// (without the program name).
    pub fn load(args: &[String]) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::from_lookup(|key| env::var(key).ok())?;
        config.apply_args(args)?;
        Ok(config)
    }

    /// Defaults overridden by whatever `lookup` returns for `SOLBENCH_*` keys
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        for (var, option) in ENV_OPTIONS {
            if let Some(value) = lookup(var) {
                config.set_option(option, &value)?;
            }
        }
        Ok(config)
    }

    /// Apply `--key value` pairs
    pub fn apply_args(&mut self, args: &[String]) -> Result<(), ConfigError> {
        if args.len() % 2 == 1 {
            let last = args.last().cloned().unwrap_or_default();
            return Err(ConfigError::OddArgumentCount(last));
        }
        for pair in args.chunks_exact(2) {
            let key = pair[0]
                .strip_prefix("--")
                .ok_or_else(|| ConfigError::MissingKey(pair[0].clone()))?;
            self.set_option(key, &pair[1])?;
        }
        Ok(())
    }

    /// Set one option by its command-line key
    pub fn set_option(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "problem" => self.problem_filter = value.to_string(),
            "impl" => self.impl_filter = value.to_string(),
            "student" => self.student_filter = value.to_string(),
            "task" => self.task = value.parse()?,
            "input" => self.streams.test_input = value.to_string(),
            "output" => self.streams.test_output = value.to_string(),
            "print" => self.streams.print = value.to_string(),
            "log" => self.streams.log = value.to_string(),
            "report" => self.streams.report = value.to_string(),
            "benchmark-limit-ms" => {
                self.benchmark_time_limit_ms = value
                    .parse::<i64>()
                    .ok()
                    .filter(|limit| *limit >= 0)
                    .ok_or_else(|| ConfigError::invalid(key, value))?;
            }
            "print-all-cases" => self.print_all_cases = parse_bool(key, value)?,
            "alloc-trace" => self.enable_alloc_trace = parse_bool(key, value)?,
            _ => return Err(ConfigError::UnknownOption(key.to_string())),
        }
        Ok(())
    }

    pub fn is_filtered_problem(&self, name: &str) -> bool {
        is_filtered(&self.problem_filter, name)
    }

    pub fn is_filtered_impl(&self, name: &str) -> bool {
        is_filtered(&self.impl_filter, name)
    }

    pub fn is_filtered_student(&self, name: &str) -> bool {
        is_filtered(&self.student_filter, name)
    }

    /// Composite sort key of one solution
    pub fn ordering_key<'a>(&self, student: &'a str, implementation: &'a str) -> OrderingKey<'a> {
        ordering_key(&self.student_ordering, &self.impl_ordering, student, implementation)
    }

    /// Whether the custom test input comes from process stdin
    pub fn use_stdin(&self) -> bool {
        self.streams.test_input == streams::STDIN
    }
}

fn is_filtered(filter: &str, name: &str) -> bool {
    !filter.is_empty() && filter != name
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        _ => Err(ConfigError::invalid(key, value)),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Arguments count should be even. Argument '{0}' provided without option key")]
    OddArgumentCount(String),

    #[error("Argument '{0}' provided without option key")]
    MissingKey(String),

    #[error("Unknown parameter '{0}'")]
    UnknownOption(String),

    #[error("Invalid value '{value}' for parameter '{key}'")]
    InvalidValue { key: String, value: String },
}

impl ConfigError {
    fn invalid(key: &str, value: &str) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}
