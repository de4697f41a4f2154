//! Per-case and per-solution allocation counts through the counting
//! allocator. Harness output must not show up in a solution's numbers.
//!
//! Kept as a single test in its own binary so no other test thread
//! allocates while cases are measured.

use solbench::{benchmark::RunContext, problems::array_sum, Config};
use solbench_perf::CountingAllocator;

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

#[test]
fn allocation_free_solution_reports_zero_allocations() {
    let mut config = Config::default();
    let args: Vec<String> = ["--impl", "nooverflow", "--print-all-cases", "1", "--alloc-trace", "1"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    config.apply_args(&args).unwrap();

    let mut problem = array_sum::problem();
    let mut log = Vec::new();
    let reports = {
        let mut ctx = RunContext::new(Box::new(&mut log), Box::new(std::io::sink()), &GLOBAL);
        assert!(problem.run(&config, &mut ctx).unwrap());
        std::mem::take(&mut ctx.reports)
    };
    let log = String::from_utf8(log).unwrap();

    let case_lines: Vec<&str> = log.lines().filter(|l| l.starts_with("Case [")).collect();
    assert_eq!(case_lines.len(), array_sum::test_cases().len());
    for line in &case_lines {
        assert!(line.contains(", alloc() calls: 0, total allocated: 0 kB."), "{line}");
        assert!(line.contains(", dealloc() calls: 0,"), "{line}");
    }

    let summary = log
        .lines()
        .find(|l| l.starts_with("Solutions are correct"))
        .unwrap();
    assert!(summary.contains(", alloc() calls: 0,"), "{summary}");
    assert!(summary.contains(", dealloc() calls: 0,"), "{summary}");

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].alloc.map(|a| a.calls), Some(0));
    assert_eq!(reports[0].dealloc.map(|d| d.calls), Some(0));
}
