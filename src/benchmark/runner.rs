//! Problem runner - checks, prints or benchmarks every selected solution

use std::hint::black_box;
use std::io::{self, Write};

use solbench_perf::{format_time, Channel, PerformanceCounter};

use crate::{
    config::{Config, Task},
    constants::{sources, MAX_BENCHMARK_ITERATIONS},
    error::AppResult,
    models::{
        case_tag, Outcome, Problem, ProblemValue, Solution, SolutionReport, TestCase,
        TestCaseSource,
    },
};

use super::context::RunContext;

const EXEC_TIME_ONLY: &[Channel] = &[Channel::ExecTime];
const EXEC_TIME_AND_ALLOC: &[Channel] = &[
    Channel::ExecTime,
    Channel::AllocCalls,
    Channel::DeallocCalls,
    Channel::TimeSpentAlloc,
];

/// Channels measured around a solution run
fn measured_channels(config: &Config) -> &'static [Channel] {
    if config.enable_alloc_trace {
        EXEC_TIME_AND_ALLOC
    } else {
        EXEC_TIME_ONLY
    }
}

/// Line printed once a problem finished without failures
fn completion_message(task: Task) -> &'static str {
    match task {
        Task::CheckOutput => "all tests passed!",
        Task::PrintOutput => "finished!",
        Task::Benchmark => "end of benchmark",
    }
}

/// Source label of the custom case
fn custom_source_name(config: &Config) -> &'static str {
    if config.use_stdin() {
        sources::CLI_STDIN
    } else {
        sources::CLI_FILE
    }
}

impl<I, O> Problem<'_, I, O>
where
    I: ProblemValue,
    O: ProblemValue + PartialEq,
{
    /// Run the configured task for every selected solution.
    ///
    /// Returns `Ok(false)` on the first output mismatch; later solutions
    /// are not run. A filtered-out problem succeeds without output.
    pub fn run(&mut self, config: &Config, ctx: &mut RunContext<'_>) -> AppResult<bool> {
        if config.is_filtered_problem(&self.name) {
            tracing::debug!(problem = %self.name, "problem filtered out");
            return Ok(true);
        }

        self.solutions.sort_by(|l, r| {
            config
                .ordering_key(&l.student_name, &l.impl_name)
                .cmp(&config.ordering_key(&r.student_name, &r.impl_name))
        });
        self.sources.sort_by(|l, r| l.source_name.cmp(r.source_name));

        let custom_case = match config.task {
            Task::Benchmark => None,
            Task::CheckOutput | Task::PrintOutput => self.read_custom_case(ctx)?,
        };
        let sources: Vec<TestCaseSource<'_, I, O>> = match &custom_case {
            Some(case) => vec![TestCaseSource::new(
                std::slice::from_ref(case),
                custom_source_name(config),
            )],
            None => self.sources.clone(),
        };

        for solution in &self.solutions {
            if config.is_filtered_impl(&solution.impl_name)
                || config.is_filtered_student(&solution.student_name)
            {
                continue;
            }

            let passed = match config.task {
                Task::CheckOutput | Task::PrintOutput => {
                    self.run_tests(solution, &sources, config, ctx)?
                }
                Task::Benchmark => self.run_benchmark(solution, &sources, config, ctx)?,
            };
            if !passed {
                tracing::debug!(problem = %self.name, implementation = %solution.impl_name, "stopping after mismatch");
                return Ok(false);
            }
        }

        writeln!(ctx.log, "Problem '{}' - {}", self.name, completion_message(config.task))?;
        ctx.log.flush()?;
        Ok(true)
    }

    /// Read the custom case from the context streams, if any are open.
    ///
    /// A missing side keeps its default value.
    fn read_custom_case(&self, ctx: &mut RunContext<'_>) -> AppResult<Option<TestCase<I, O>>> {
        if !ctx.has_custom_case() {
            return Ok(None);
        }

        let mut case = TestCase::<I, O>::default();
        if let Some(input) = ctx.test_input.as_mut() {
            case.input = I::read_from(input.as_mut())?;
        }
        if let Some(output) = ctx.test_output.as_mut() {
            case.output = O::read_from(output.as_mut())?;
        }
        tracing::debug!(problem = %self.name, "custom test case loaded");
        Ok(Some(case))
    }

    fn run_tests(
        &self,
        solution: &Solution<I, O>,
        sources: &[TestCaseSource<'_, I, O>],
        config: &Config,
        ctx: &mut RunContext<'_>,
    ) -> AppResult<bool> {
        let check = config.task == Task::CheckOutput;
        let mut report = SolutionReport::new(
            &self.name,
            &solution.student_name,
            &solution.impl_name,
            config.task,
        );

        writeln!(
            ctx.log,
            "Starting problem '{}' student '{}' solution '{}' tests...",
            self.name, solution.student_name, solution.impl_name
        )?;
        ctx.log.flush()?;

        let tracker = ctx.tracker;
        let channels = measured_channels(config);
        let mut run_counter = PerformanceCounter::with_channels(tracker, channels);

        for source in sources {
            for (index, case) in source.cases.iter().enumerate() {
                let mut case_counter = config
                    .print_all_cases
                    .then(|| PerformanceCounter::with_channels(tracker, channels));

                let actual = solution.apply(&case.input);
                if let Some(case_counter) = case_counter.as_mut() {
                    case_counter.stop();
                }
                report.cases += 1;

                if let Some(case_counter) = &case_counter {
                    run_counter.exclude(|| -> io::Result<()> {
                        write!(ctx.log, "Case [{}/{}]", source.source_name, index)?;
                        case_counter.print_to(&mut *ctx.log, true)
                    })?;
                }

                if check && actual != case.output {
                    run_counter.stop();
                    tracing::info!(
                        problem = %self.name,
                        student = %solution.student_name,
                        implementation = %solution.impl_name,
                        source = %source.source_name,
                        index,
                        "output mismatch"
                    );
                    let tag = case_tag(source.source_name, index);
                    write_mismatch(&mut *ctx.log, &tag, case, &actual)?;
                    ctx.log.flush()?;

                    report.outcome = Outcome::Mismatch;
                    report.failed_case = Some(tag);
                    fill_counters(&mut report, &run_counter);
                    ctx.reports.push(report);
                    return Ok(false);
                }

                if !check {
                    run_counter.exclude(|| -> io::Result<()> {
                        actual.write_to(&mut *ctx.print)?;
                        writeln!(ctx.print)?;
                        ctx.print.flush()
                    })?;
                }
            }
        }

        run_counter.stop();
        if check {
            write!(ctx.log, "Solutions are correct, total cases: {}", report.cases)?;
            run_counter.print_to(&mut *ctx.log, true)?;
        }

        fill_counters(&mut report, &run_counter);
        ctx.reports.push(report);
        Ok(true)
    }

    fn run_benchmark(
        &self,
        solution: &Solution<I, O>,
        sources: &[TestCaseSource<'_, I, O>],
        config: &Config,
        ctx: &mut RunContext<'_>,
    ) -> AppResult<bool> {
        writeln!(
            ctx.log,
            "Starting problem '{}' student '{}' solution '{}' benchmark ({} ms limit)...",
            self.name, solution.student_name, solution.impl_name, config.benchmark_time_limit_ms
        )?;
        ctx.log.flush()?;

        let mut counter = PerformanceCounter::with_channels(ctx.tracker, measured_channels(config));
        let limit_us = config.benchmark_time_limit_ms.saturating_mul(1000);

        let iterations = replay_corpus(&counter, limit_us, MAX_BENCHMARK_ITERATIONS, || {
            for source in sources {
                for case in source.cases {
                    black_box(solution.apply(black_box(&case.input)));
                }
            }
        });
        counter.stop();

        write!(ctx.log, "Benchmark ended, iterations: {iterations}")?;
        counter.print_to(&mut *ctx.log, true)?;

        tracing::debug!(
            problem = %self.name,
            implementation = %solution.impl_name,
            iterations,
            elapsed = %format_time(counter.elapsed_us()),
            "benchmark finished"
        );

        let mut report = SolutionReport::new(
            &self.name,
            &solution.student_name,
            &solution.impl_name,
            config.task,
        );
        report.iterations = iterations;
        report.cases = sources.iter().map(TestCaseSource::len).sum();
        fill_counters(&mut report, &counter);
        ctx.reports.push(report);
        Ok(true)
    }
}

/// Run `pass` repeatedly until the counter exceeds `limit_us` or
/// `max_iterations` passes completed. The limit is checked after each
/// pass, so at least one pass runs and a zero limit runs exactly one.
/// Returns the number of passes.
pub fn replay_corpus(
    counter: &PerformanceCounter<'_>,
    limit_us: i64,
    max_iterations: u64,
    mut pass: impl FnMut(),
) -> u64 {
    let mut iterations = 0;
    while iterations < max_iterations {
        pass();
        iterations += 1;
        if limit_us <= 0 || counter.is_timed_out(limit_us) {
            break;
        }
    }
    iterations
}

/// Mismatch diagnostic; the labels are padded to line up under the tag
fn write_mismatch<I, O>(
    out: &mut dyn Write,
    tag: &str,
    case: &TestCase<I, O>,
    actual: &O,
) -> io::Result<()>
where
    I: ProblemValue,
    O: ProblemValue,
{
    let pad = " ".repeat(tag.len());
    write!(out, "For problem input {tag}: ")?;
    case.input.log(out)?;
    write!(out, "\nexpected output{pad} is: ")?;
    case.output.log(out)?;
    write!(out, "\n but calculated{pad} is: ")?;
    actual.log(out)?;
    writeln!(out)
}

fn fill_counters(report: &mut SolutionReport, counter: &PerformanceCounter<'_>) {
    report.elapsed_us = counter.elapsed_us();
    report.alloc = counter.alloc_delta();
    report.dealloc = counter.dealloc_delta();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArrayValue, ScalarValue};
    use crate::problems::array_sum;
    use solbench_perf::NoopTracker;

    type Sum = Problem<'static, ArrayValue<i32>, ScalarValue<i64>>;
    type SumCase = TestCase<ArrayValue<i32>, ScalarValue<i64>>;

    fn leak(cases: Vec<SumCase>) -> &'static [SumCase] {
        cases.leak()
    }

    struct Outputs {
        passed: bool,
        log: String,
        print: String,
        reports: Vec<SolutionReport>,
    }

    fn run(problem: &mut Sum, config: &Config, input: Option<&str>, output: Option<&str>) -> Outputs {
        let mut log = Vec::new();
        let mut print = Vec::new();
        let (passed, reports) = {
            let mut ctx = RunContext::new(Box::new(&mut log), Box::new(&mut print), &NoopTracker);
            if let Some(text) = input {
                ctx = ctx.with_test_input(Box::new(text.as_bytes()));
            }
            if let Some(text) = output {
                ctx = ctx.with_test_output(Box::new(text.as_bytes()));
            }
            let passed = problem.run(config, &mut ctx).unwrap();
            (passed, std::mem::take(&mut ctx.reports))
        };
        Outputs {
            passed,
            log: String::from_utf8(log).unwrap(),
            print: String::from_utf8(print).unwrap(),
            reports,
        }
    }

    fn config(args: &[&str]) -> Config {
        let mut config = Config::default();
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        config.apply_args(&args).unwrap();
        config
    }

    fn starts(log: &str) -> usize {
        log.matches("Starting problem").count()
    }

    #[test]
    fn test_all_solutions_pass_small_case() {
        let cases = leak(vec![TestCase::new(vec![1, 2, -4], -1i64)]);
        let mut problem = array_sum::problem_with_cases(cases);

        let out = run(&mut problem, &config(&[]), None, None);

        assert!(out.passed);
        assert_eq!(starts(&out.log), 2);
        assert_eq!(out.log.matches("Solutions are correct, total cases: 1").count(), 2);
        assert!(out.log.ends_with("Problem 'ArraySum' - all tests passed!\n"));
        assert!(out.print.is_empty());
    }

    #[test]
    fn test_overflowing_solution_fails_first() {
        let mut problem = array_sum::problem();

        let out = run(&mut problem, &config(&[]), None, None);

        assert!(!out.passed);
        // naive is ranked first and stops the problem
        assert_eq!(starts(&out.log), 1);
        assert!(out.log.contains("solution 'naive' tests..."));
        assert!(out.log.contains(
            "For problem input [compile-time/1]: {2147483647, 2147483647, 2147483647}\n\
             expected output                 is: 6442450941\n \
             but calculated                 is: 2147483645\n"
        ));
        assert!(!out.log.contains("all tests passed"));
        assert_eq!(out.reports.len(), 1);
        assert_eq!(out.reports[0].outcome, Outcome::Mismatch);
        assert_eq!(out.reports[0].failed_case.as_deref(), Some("[compile-time/1]"));
    }

    #[test]
    fn test_impl_filter_selects_one_solution() {
        let mut problem = array_sum::problem();

        let out = run(&mut problem, &config(&["--impl", "nooverflow"]), None, None);

        assert!(out.passed);
        assert_eq!(starts(&out.log), 1);
        assert!(out.log.contains("solution 'nooverflow' tests..."));
        assert!(out.log.contains("Solutions are correct, total cases: 2, exec time: "));
    }

    #[test]
    fn test_problem_filter_skips_silently() {
        let mut problem = array_sum::problem();

        let out = run(&mut problem, &config(&["--problem", "Other"]), None, None);

        assert!(out.passed);
        assert!(out.log.is_empty());
        assert!(out.reports.is_empty());
    }

    #[test]
    fn test_print_custom_input() {
        let mut problem = array_sum::problem();
        let config = config(&["--task", "PrintOutput", "--impl", "nooverflow", "--input", "case.txt"]);

        let out = run(&mut problem, &config, Some("3\n1\n2\n3\n"), None);

        assert!(out.passed);
        assert_eq!(out.print, "6\n");
        assert!(!out.log.contains("Solutions are correct"));
        assert!(out.log.ends_with("Problem 'ArraySum' - finished!\n"));
        assert_eq!(out.reports[0].outcome, Outcome::Printed);
    }

    #[test]
    fn test_custom_case_labels() {
        let mut problem = array_sum::problem();
        let from_file = config(&["--impl", "nooverflow", "--print-all-cases", "1"]);
        let out = run(&mut problem, &from_file, Some("2 5 6"), Some("11"));
        assert!(out.passed);
        assert!(out.log.contains("Case [cli-file/0], exec time: "));

        let from_stdin = config(&["--impl", "nooverflow", "--input", "stdin"]);
        let out = run(&mut problem, &from_stdin, Some("2 5 6"), Some("12"));
        assert!(!out.passed);
        assert!(out.log.contains("For problem input [cli-stdin/0]: {5, 6}\n"));
        assert!(out.log.contains("but calculated              is: 11\n"));
    }

    #[test]
    fn test_print_all_cases_reports_each_case() {
        let mut problem = array_sum::problem();

        let out = run(
            &mut problem,
            &config(&["--impl", "nooverflow", "--print-all-cases", "true"]),
            None,
            None,
        );

        assert!(out.log.contains("Case [compile-time/0], exec time: "));
        assert!(out.log.contains("Case [compile-time/1], exec time: "));
    }

    #[test]
    fn test_benchmark_zero_limit_runs_one_pass() {
        let mut problem = array_sum::problem();

        let out = run(
            &mut problem,
            &config(&["--task", "Benchmark", "--benchmark-limit-ms", "0"]),
            None,
            None,
        );

        assert!(out.passed);
        assert!(out.log.contains("solution 'naive' benchmark (0 ms limit)..."));
        assert_eq!(out.log.matches("Benchmark ended, iterations: 1, exec time: ").count(), 2);
        assert!(out.log.ends_with("Problem 'ArraySum' - end of benchmark\n"));
        assert!(out.reports.iter().all(|r| r.iterations == 1 && r.cases == 2));
    }

    #[test]
    fn test_benchmark_ignores_custom_case() {
        let mut problem = array_sum::problem();
        let config = config(&["--task", "Benchmark", "--benchmark-limit-ms", "0", "--impl", "naive"]);

        let out = run(&mut problem, &config, Some("not a number"), None);

        assert!(out.passed);
        assert_eq!(out.reports[0].cases, 2);
    }

    #[test]
    fn test_alloc_trace_fragments() {
        let mut problem = array_sum::problem();

        let out = run(
            &mut problem,
            &config(&["--impl", "nooverflow", "--alloc-trace", "1"]),
            None,
            None,
        );

        assert!(out.log.contains(", alloc() calls: 0, total allocated: 0 kB., time spent in alloc(): 0 us."));
        assert!(out.log.contains(", percent of time in alloc+dealloc: 0%"));
        assert_eq!(out.reports[0].alloc.map(|a| a.calls), Some(0));
    }

    #[test]
    fn test_sources_run_in_name_order() {
        let zeta = leak(vec![TestCase::new(vec![1], 1i64)]);
        let alpha = leak(vec![TestCase::new(vec![2], 2i64)]);
        let mut problem: Sum = Problem::new("Order");
        problem
            .register_solution(array_sum::nooverflow, "nooverflow", "reference")
            .register_test_set(zeta, "zeta")
            .register_test_set(alpha, "alpha");

        let out = run(&mut problem, &config(&["--task", "print"]), None, None);

        assert_eq!(out.print, "2\n1\n");
    }

    #[test]
    fn test_malformed_custom_input_is_an_error() {
        let mut problem = array_sum::problem();
        let mut log = Vec::new();
        let mut ctx = RunContext::new(Box::new(&mut log), Box::new(io::sink()), &NoopTracker)
            .with_test_input(Box::new("2 1 x".as_bytes()));

        assert!(problem.run(&config(&[]), &mut ctx).is_err());
    }

    #[test]
    fn test_replay_corpus_limits() {
        let counter = PerformanceCounter::with_channels(&NoopTracker, EXEC_TIME_ONLY);

        let mut passes = 0;
        assert_eq!(replay_corpus(&counter, i64::MAX, 5, || passes += 1), 5);
        assert_eq!(passes, 5);

        assert_eq!(replay_corpus(&counter, 0, 5, || {}), 1);
        assert_eq!(replay_corpus(&counter, 0, 0, || {}), 0);
    }

    #[test]
    fn test_replay_corpus_stops_after_positive_limit() {
        let counter = PerformanceCounter::with_channels(&NoopTracker, EXEC_TIME_ONLY);
        let limit_us = 10_000;

        let mut pass_starts = Vec::new();
        let iterations = replay_corpus(&counter, limit_us, MAX_BENCHMARK_ITERATIONS, || {
            pass_starts.push(counter.elapsed_us());
            std::thread::sleep(std::time::Duration::from_millis(2));
        });

        assert_eq!(iterations as usize, pass_starts.len());
        // Each pass takes at least 2 ms, so six passes always exceed the limit
        assert!((1..=6).contains(&iterations), "iterations: {iterations}");
        assert!(counter.elapsed_us() > limit_us);
        let (_, continued) = pass_starts.split_last().unwrap();
        assert!(continued.iter().all(|&start| start <= limit_us));
    }

    #[test]
    fn test_per_case_line_after_stop() {
        let mut problem = array_sum::problem();

        let out = run(
            &mut problem,
            &config(&["--impl", "nooverflow", "--print-all-cases", "1", "--alloc-trace", "1"]),
            None,
            None,
        );

        assert!(out.passed);
        let case_lines: Vec<&str> = out.log.lines().filter(|l| l.starts_with("Case [")).collect();
        assert_eq!(case_lines.len(), 2);
        assert!(case_lines.iter().all(|l| l.contains(", alloc() calls: 0,")));
    }
}
