//! ArraySum: sum of a 32-bit integer array as a 64-bit integer

use std::sync::LazyLock;

use crate::constants::sources;
use crate::models::{ArrayValue, Problem, ScalarValue, TestCase};

pub const NAME: &str = "ArraySum";
const STUDENT: &str = "reference";

pub type Input = ArrayValue<i32>;
pub type Output = ScalarValue<i64>;

static TEST_CASES: LazyLock<Vec<TestCase<Input, Output>>> = LazyLock::new(|| {
    vec![
        TestCase::new(vec![1, 2, -4], -1),
        TestCase::new(vec![i32::MAX; 3], 3 * i64::from(i32::MAX)),
    ]
});

/// Cases compiled into the binary
pub fn test_cases() -> &'static [TestCase<Input, Output>] {
    &TEST_CASES
}

/// Sums into a 32-bit accumulator, so large inputs wrap around
pub fn naive(input: &Input) -> Output {
    let sum = input.0.iter().fold(0i32, |acc, &v| acc.wrapping_add(v));
    ScalarValue(i64::from(sum))
}

pub fn nooverflow(input: &Input) -> Output {
    ScalarValue(input.0.iter().map(|&v| i64::from(v)).sum())
}

/// The problem with its built-in cases and both solutions
pub fn problem() -> Problem<'static, Input, Output> {
    problem_with_cases(test_cases())
}

pub fn problem_with_cases(cases: &'static [TestCase<Input, Output>]) -> Problem<'static, Input, Output> {
    let mut problem = Problem::new(NAME);
    problem
        .register_test_set(cases, sources::COMPILE_TIME)
        .register_solution(naive, "naive", STUDENT)
        .register_solution(nooverflow, "nooverflow", STUDENT);
    problem
}
