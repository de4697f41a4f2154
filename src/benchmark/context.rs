//! Streams and collected results shared by every problem of one run

use std::io::{BufRead, Write};

use solbench_perf::AllocationTracker;

use crate::models::SolutionReport;

/// Everything a problem run reads from and writes to
pub struct RunContext<'s> {
    /// Custom test input, read once per problem run
    pub test_input: Option<Box<dyn BufRead + 's>>,
    /// Custom expected output, read once per problem run
    pub test_output: Option<Box<dyn BufRead + 's>>,
    pub print: Box<dyn Write + 's>,
    pub log: Box<dyn Write + 's>,
    pub tracker: &'s dyn AllocationTracker,
    pub reports: Vec<SolutionReport>,
}

impl<'s> RunContext<'s> {
    pub fn new(
        log: Box<dyn Write + 's>,
        print: Box<dyn Write + 's>,
        tracker: &'s dyn AllocationTracker,
    ) -> Self {
        Self {
            test_input: None,
            test_output: None,
            print,
            log,
            tracker,
            reports: Vec::new(),
        }
    }

    pub fn with_test_input(mut self, input: Box<dyn BufRead + 's>) -> Self {
        self.test_input = Some(input);
        self
    }

    pub fn with_test_output(mut self, output: Box<dyn BufRead + 's>) -> Self {
        self.test_output = Some(output);
        self
    }

    /// Whether a custom test case is available
    pub fn has_custom_case(&self) -> bool {
        self.test_input.is_some() || self.test_output.is_some()
    }
}
