//! Process-level run: problem registration, stream set-up, total counters,
//! report file and the exit status derived from the outcome.

use std::io::Write;

use anyhow::Context;
use solbench_perf::{AllocationTracker, Channel, PerformanceCounter};

use crate::{benchmark::RunContext, config::Config, problems, registry::Registry, utils};

/// Exit status of a run that finished with every problem passing
pub const EXIT_SUCCESS: u8 = 0;
/// Exit status of a failed, broken or panicked run
pub const EXIT_FAILURE: u8 = 1;

/// Run every registered problem with `config`.
///
/// Returns `Ok(false)` when a solution produced a wrong output.
pub fn run(config: &Config, tracker: &'static dyn AllocationTracker) -> anyhow::Result<bool> {
    tracing::info!(task = %config.task, problem = %config.problem_filter, "Starting solbench");

    let mut total = PerformanceCounter::with_channels(
        tracker,
        &[Channel::ExecTime, Channel::CpuClock, Channel::PeakHeap],
    );
    if config.enable_alloc_trace {
        total.enable_all(&Channel::ALLOC_TRACE);
    }

    let mut registry = Registry::new();
    problems::register_all(&mut registry)?;
    tracing::debug!(problems = registry.len(), "problems registered");

    let streams = &config.streams;
    let log = utils::open_output(&streams.log)
        .with_context(|| format!("Cannot open log stream '{}'", streams.log))?;
    let print = utils::open_output(&streams.print)
        .with_context(|| format!("Cannot open print stream '{}'", streams.print))?;
    let mut ctx = RunContext::new(log, print, tracker);
    if let Some(input) = utils::open_input(&streams.test_input)
        .with_context(|| format!("Cannot open test input '{}'", streams.test_input))?
    {
        ctx = ctx.with_test_input(input);
    }
    if let Some(output) = utils::open_input(&streams.test_output)
        .with_context(|| format!("Cannot open test output '{}'", streams.test_output))?
    {
        ctx = ctx.with_test_output(output);
    }

    let outcome = registry.run_all(config, &mut ctx);

    // The report is written even when a solution failed
    if !streams.report.is_empty() {
        let json = serde_json::to_vec_pretty(&ctx.reports)?;
        utils::write_file(&streams.report, &json)
            .with_context(|| format!("Cannot write report '{}'", streams.report))?;
        tracing::info!(path = %streams.report, solutions = ctx.reports.len(), "report written");
    }

    let passed = outcome?;
    if passed {
        total.stop();
        write!(ctx.log, "All problems finished")?;
        total.print_to(&mut *ctx.log, true)?;
    }
    ctx.log.flush()?;
    ctx.print.flush()?;
    Ok(passed)
}

/// Map the outcome of a run, panics included, to the process exit status.
///
/// Errors and panics are reported on stderr.
pub fn exit_status(outcome: std::thread::Result<anyhow::Result<bool>>) -> u8 {
    match outcome {
        Ok(Ok(true)) => EXIT_SUCCESS,
        Ok(Ok(false)) => EXIT_FAILURE,
        Ok(Err(err)) => {
            tracing::debug!(error = %err, "run aborted");
            eprintln!("Error: {err:#}");
            EXIT_FAILURE
        }
        Err(_) => {
            eprintln!("Unknown error");
            EXIT_FAILURE
        }
    }
}
