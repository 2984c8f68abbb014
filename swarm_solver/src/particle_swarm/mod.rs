use argmin::{
    core::{
        ArgminError, CostFunction, Error, Executor, IterState, KV, Problem, Solver, State,
        TerminationReason, TerminationStatus,
    },
    kv,
};
use nalgebra::{DefaultAllocator, Dim, allocator::Allocator};
use rand::Rng;
use tracing::{debug, info};

use crate::{
    error::SwarmError,
    particle_swarm::{
        bounds::{Bounds, Position},
        config::SwarmConfig,
        objective::FnObjective,
        run_log_data::SwarmRunResult,
        swarm::Swarm,
    },
};

pub mod bounds;
pub mod config;
pub mod global_best;
pub mod objective;
pub mod observer;
pub mod particle;
pub mod run_log_data;
pub mod swarm;

#[cfg(test)]
mod tests;

/// argmin state driven by [`ParticleSwarm`]. `param` and `best_param` hold the swarm's global
/// best position; `cost` and `best_cost` its cost.
pub type SwarmState<D> = IterState<Position<D>, (), (), (), (), f64>;

/// Particle swarm minimizer for a box-constrained objective, run through an argmin `Executor`.
///
/// Evaluation runs one pass ahead of the executor: `init` evaluates pass 0, and iteration `k`
/// records the global best of pass `k`, moves the particles and evaluates pass `k + 1`. A pass
/// that leaves the global best unchanged for more than `config.stagnation_limit()` consecutive
/// passes stops the run before it is recorded.
///
/// ```ignore
/// let solver = ParticleSwarm::new(lower, upper, SwarmConfig::new(200, 100))?;
/// let res = Executor::new(objective, solver)
///     .add_observer(history.clone(), ObserverMode::Always)
///     .run()?;
/// let res = SwarmRunResult::try_from(res)?;
/// ```
pub struct ParticleSwarm<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
{
    bounds: Bounds<D>,
    config: SwarmConfig,
    swarm: Option<Swarm<D>>,
    passes: u64,
    stalled: u64,
    cost_history: Vec<(u64, f64)>,
    non_finite_evaluations: usize,
}

impl<D> ParticleSwarm<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
{
    /// Validates the configuration and bounds. Nothing is evaluated yet.
    pub fn new(
        lower: Position<D>,
        upper: Position<D>,
        config: SwarmConfig,
    ) -> Result<Self, SwarmError> {
        config.validate()?;
        let bounds = Bounds::new(lower, upper)?;

        Ok(Self {
            bounds,
            config,
            swarm: None,
            passes: 0,
            stalled: 0,
            cost_history: Vec::new(),
            non_finite_evaluations: 0,
        })
    }

    pub fn config(&self) -> &SwarmConfig {
        &self.config
    }

    pub fn bounds(&self) -> &Bounds<D> {
        &self.bounds
    }

    /// The swarm of the current run; `None` before `Solver::init`.
    pub fn swarm(&self) -> Option<&Swarm<D>> {
        self.swarm.as_ref()
    }

    /// `(iteration, global best cost)` for every recorded pass.
    pub fn cost_history(&self) -> &[(u64, f64)] {
        &self.cost_history
    }

    /// Evaluation passes over the swarm, including one that was not recorded.
    pub fn evaluation_passes(&self) -> u64 {
        self.passes
    }

    pub fn non_finite_evaluations(&self) -> usize {
        self.non_finite_evaluations
    }

    /// Consecutive passes that left the global best unchanged.
    pub fn iters_without_improvement(&self) -> u64 {
        self.stalled
    }

    pub fn is_stagnated(&self) -> bool {
        self.stalled > self.config.stagnation_limit()
    }
}

fn not_initialized() -> Error {
    ArgminError::NotInitialized {
        text: "particle swarm has no particles; `init` was not called".to_string(),
    }
    .into()
}

impl<D> ParticleSwarm<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
    Position<D>: Send + Sync,
{
    /// Evaluates every particle once and updates the stagnation counter.
    fn evaluate_pass<O>(&mut self, problem: &mut Problem<O>, pass: u64) -> Result<(), Error>
    where
        O: CostFunction<Param = Position<D>, Output = f64> + Sync,
    {
        let policy = self.config.non_finite;
        let swarm = self.swarm.as_mut().ok_or_else(not_initialized)?;

        let prev_best = swarm.best_cost();
        let skipped = problem.bulk_problem("cost_count", self.config.n_particles, |objective| {
            Ok(swarm.evaluate(objective, pass, policy)?)
        })?;
        let best_cost = swarm.best_cost();

        if best_cost == prev_best {
            self.stalled += 1;
        } else {
            self.stalled = 0;
        }
        self.passes += 1;
        self.non_finite_evaluations += skipped;

        debug!(pass, best_cost, stalled = self.stalled, "evaluation pass complete");
        Ok(())
    }
}

impl<O, D> Solver<O, SwarmState<D>> for ParticleSwarm<D>
where
    O: CostFunction<Param = Position<D>, Output = f64> + Sync,
    D: Dim,
    DefaultAllocator: Allocator<D>,
    Position<D>: Send + Sync,
{
    fn name(&self) -> &str {
        "Particle Swarm"
    }

    /// Scatters a fresh swarm over the box and evaluates pass 0.
    fn init(
        &mut self,
        problem: &mut Problem<O>,
        state: SwarmState<D>,
    ) -> Result<(SwarmState<D>, Option<KV>), Error> {
        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());

        info!(
            objective = %tynm::type_name::<O>(),
            dim = self.bounds.len(),
            n_particles = self.config.n_particles,
            max_iters = self.config.max_iters,
            stagnation_limit = self.config.stagnation_limit(),
            seed,
            "starting particle swarm"
        );

        self.swarm = Some(Swarm::new(
            self.bounds.clone(),
            self.config.n_particles,
            seed,
        ));
        self.passes = 0;
        self.stalled = 0;
        self.cost_history.clear();
        self.non_finite_evaluations = 0;

        self.evaluate_pass(problem, 0)?;

        Ok((
            state.max_iters(self.config.max_iters),
            Some(kv!("seed" => seed;)),
        ))
    }

    fn next_iter(
        &mut self,
        problem: &mut Problem<O>,
        mut state: SwarmState<D>,
    ) -> Result<(SwarmState<D>, Option<KV>), Error> {
        let iter = state.get_iter();
        let best = self
            .swarm
            .as_ref()
            .ok_or_else(not_initialized)?
            .global_best();

        self.cost_history.push((iter, best.cost));
        if let Some(position) = best.position {
            state = state.param(position);
        }
        state = state.cost(best.cost);

        if iter + 1 < state.get_max_iters() {
            self.swarm
                .as_mut()
                .ok_or_else(not_initialized)?
                .update(&self.config);
            self.evaluate_pass(problem, iter + 1)?;
        }

        Ok((
            state,
            Some(kv!(
                "stalled" => self.stalled;
                "non_finite" => self.non_finite_evaluations as u64;
            )),
        ))
    }

    fn terminate(&mut self, _state: &SwarmState<D>) -> TerminationStatus {
        if self.is_stagnated() {
            TerminationStatus::Terminated(TerminationReason::SolverExit(format!(
                "global best unchanged for {} iterations",
                self.stalled
            )))
        } else {
            TerminationStatus::NotTerminated
        }
    }
}

/// Minimizes `objective` over the box `[lower, upper]` with the default coefficients and
/// returns the best position found.
pub fn optimize<F, D>(
    objective: F,
    lower: Position<D>,
    upper: Position<D>,
    n_particles: usize,
    max_iters: u64,
) -> Result<Position<D>, SwarmError>
where
    F: Fn(&Position<D>) -> f64 + Sync,
    D: Dim,
    DefaultAllocator: Allocator<D>,
    Position<D>: Send + Sync,
{
    optimize_with_config(
        objective,
        lower,
        upper,
        SwarmConfig::new(n_particles, max_iters),
    )
    .map(|res| res.best_position)
}

pub fn optimize_with_config<F, D>(
    objective: F,
    lower: Position<D>,
    upper: Position<D>,
    config: SwarmConfig,
) -> Result<SwarmRunResult<D>, SwarmError>
where
    F: Fn(&Position<D>) -> f64 + Sync,
    D: Dim,
    DefaultAllocator: Allocator<D>,
    Position<D>: Send + Sync,
{
    let solver = ParticleSwarm::new(lower, upper, config)?;
    let res = Executor::new(FnObjective::<F, D>::new(objective), solver).run()?;
    let res = SwarmRunResult::try_from(res)?;

    info!(
        iterations = res.iterations,
        best_cost = res.best_cost,
        termination = %res.termination,
        non_finite_evaluations = res.non_finite_evaluations,
        "particle swarm finished"
    );

    Ok(res)
}
