//! Problem registry
//!
//! Problems are registered once at start-up, then the registry is frozen and
//! run in name order. Each problem is type-erased behind a runner callback
//! so problems with different input/output types share one index.

use crate::{
    benchmark::RunContext,
    config::Config,
    error::{AppError, AppResult},
    models::{Problem, ProblemValue},
};

/// Type-erased problem entry point
pub type Runner<'a> = Box<dyn FnMut(&Config, &mut RunContext<'_>) -> AppResult<bool> + 'a>;

/// Registry lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Registration,
    Running,
}

/// One registered problem
pub struct ProblemRegistration<'a> {
    pub name: String,
    runner: Runner<'a>,
}

impl ProblemRegistration<'_> {
    pub fn run(&mut self, config: &Config, ctx: &mut RunContext<'_>) -> AppResult<bool> {
        (self.runner)(config, ctx)
    }
}

impl std::fmt::Debug for ProblemRegistration<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProblemRegistration")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Index of every problem of the process
#[derive(Debug)]
pub struct Registry<'a> {
    runners: Vec<ProblemRegistration<'a>>,
    phase: Phase,
}

impl Default for Registry<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Registry<'a> {
    pub fn new() -> Self {
        Self {
            runners: Vec::new(),
            phase: Phase::Registration,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn len(&self) -> usize {
        self.runners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    /// Register a runner callback under `name`.
    ///
    /// Fails once the registry has started running.
    pub fn register_runner<F>(&mut self, name: impl Into<String>, runner: F) -> AppResult<()>
    where
        F: FnMut(&Config, &mut RunContext<'_>) -> AppResult<bool> + 'a,
    {
        let name = name.into();
        if self.phase == Phase::Running {
            tracing::warn!(problem = %name, "registration after the registry was frozen");
            return Err(AppError::RegistryFrozen(name));
        }

        tracing::debug!(problem = %name, "problem registered");
        self.runners.push(ProblemRegistration {
            name,
            runner: Box::new(runner),
        });
        Ok(())
    }

    /// Register a fully built problem
    pub fn register_problem<I, O>(&mut self, mut problem: Problem<'a, I, O>) -> AppResult<()>
    where
        I: ProblemValue + 'a,
        O: ProblemValue + PartialEq + 'a,
    {
        let name = problem.name().to_string();
        self.register_runner(name, move |config, ctx| problem.run(config, ctx))
    }

    /// Freeze the registry and return the problems sorted by name
    pub fn sorted_runners(&mut self) -> &mut [ProblemRegistration<'a>] {
        self.phase = Phase::Running;
        self.runners.sort_by(|l, r| l.name.cmp(&r.name));
        &mut self.runners
    }

    /// Run every problem in name order; stops at the first failed one
    pub fn run_all(&mut self, config: &Config, ctx: &mut RunContext<'_>) -> AppResult<bool> {
        for registration in self.sorted_runners() {
            tracing::info!(problem = %registration.name, task = %config.task, "running problem");
            if !registration.run(config, ctx)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
