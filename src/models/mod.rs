//! Domain models

pub mod problem;
pub mod report;
pub mod solution;
pub mod test_case;
pub mod value;

pub use problem::Problem;
pub use report::{Outcome, SolutionReport};
pub use solution::{Solution, Transform};
pub use test_case::{case_tag, TestCase, TestCaseSource};
pub use value::{ArrayValue, ProblemValue, ScalarValue};
