//! Built-in problems
//!
//! Every problem is registered here explicitly at start-up.

pub mod array_sum;

use crate::error::AppResult;
use crate::registry::Registry;

/// Register every built-in problem
pub fn register_all(registry: &mut Registry<'static>) -> AppResult<()> {
    registry.register_problem(array_sum::problem())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_all() {
        let mut registry = Registry::new();
        register_all(&mut registry).unwrap();
        let names: Vec<_> = registry.sorted_runners().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec![array_sum::NAME]);
    }
}
