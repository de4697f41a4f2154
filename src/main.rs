//! Solbench - Application Entry Point

use std::panic::{self, AssertUnwindSafe};
use std::process::ExitCode;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use solbench::{app, constants::DEFAULT_LOG_FILTER, Config};
use solbench_perf::AllocationTracker;

#[cfg(feature = "alloc-trace")]
#[global_allocator]
static GLOBAL: solbench_perf::CountingAllocator = solbench_perf::CountingAllocator;

#[cfg(feature = "alloc-trace")]
fn tracker() -> &'static dyn AllocationTracker {
    &GLOBAL
}

#[cfg(not(feature = "alloc-trace"))]
fn tracker() -> &'static dyn AllocationTracker {
    &solbench_perf::NoopTracker
}

fn main() -> ExitCode {
    // Diagnostics go to stderr, results to the configured streams
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let config = Config::load(&args).context("Failed to load configuration")?;
        if config.enable_alloc_trace && cfg!(not(feature = "alloc-trace")) {
            tracing::warn!("alloc-trace requested but the counting allocator is not installed");
        }
        app::run(&config, tracker())
    }));
    ExitCode::from(app::exit_status(outcome))
}
