//! Problem model

use super::solution::{Solution, Transform};
use super::test_case::{TestCase, TestCaseSource};

/// A named problem: its solutions and its test case sources.
///
/// Running a problem lives in `benchmark::runner`.
#[derive(Debug)]
pub struct Problem<'a, I, O> {
    pub(crate) name: String,
    pub(crate) solutions: Vec<Solution<I, O>>,
    pub(crate) sources: Vec<TestCaseSource<'a, I, O>>,
}

impl<'a, I, O> Problem<'a, I, O> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            solutions: Vec::new(),
            sources: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn solutions(&self) -> &[Solution<I, O>] {
        &self.solutions
    }

    pub fn sources(&self) -> &[TestCaseSource<'a, I, O>] {
        &self.sources
    }

    /// Add one implementation
    pub fn register_solution(
        &mut self,
        transform: Transform<I, O>,
        impl_name: impl Into<String>,
        student_name: impl Into<String>,
    ) -> &mut Self {
        self.solutions
            .push(Solution::new(transform, impl_name, student_name));
        self
    }

    /// Add a named set of test cases
    pub fn register_test_set(&mut self, cases: &'a [TestCase<I, O>], source_name: &'a str) -> &mut Self {
        self.sources.push(TestCaseSource::new(cases, source_name));
        self
    }
}
