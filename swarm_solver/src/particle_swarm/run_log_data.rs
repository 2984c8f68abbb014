use argmin::core::{OptimizationResult, State, TerminationReason};
use derive_more::Display;
use nalgebra::{DefaultAllocator, Dim, allocator::Allocator};

use crate::{
    error::SwarmError,
    particle_swarm::{ParticleSwarm, SwarmState, bounds::Position},
};

/// Why a run stopped.
#[derive(Clone, Debug, Display, PartialEq, Eq)]
pub enum Termination {
    #[display("maximum number of iterations reached")]
    MaxItersReached,
    #[display("global best unchanged for {iters_without_improvement} iterations")]
    Stagnated { iters_without_improvement: u64 },
    /// Stopped by the executor for another reason (timeout, interrupt).
    #[display("{_0}")]
    Executor(String),
}

#[derive(Clone, Debug)]
pub struct SwarmRunResult<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
{
    pub best_position: Position<D>,
    pub best_cost: f64,
    /// Evaluation passes executed, including one that triggered early termination.
    pub iterations: u64,
    pub termination: Termination,
    /// `(iteration, global best cost)` for every recorded iteration.
    pub cost_history: Vec<(u64, f64)>,
    /// Evaluations skipped under `NonFinitePolicy::Ignore`.
    pub non_finite_evaluations: usize,
}

impl<O, D> TryFrom<OptimizationResult<O, ParticleSwarm<D>, SwarmState<D>>> for SwarmRunResult<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
{
    type Error = SwarmError;

    fn try_from(
        res: OptimizationResult<O, ParticleSwarm<D>, SwarmState<D>>,
    ) -> Result<Self, Self::Error> {
        let OptimizationResult {
            solver, mut state, ..
        } = res;
        let iterations = solver.evaluation_passes();

        let termination = match state.get_termination_reason() {
            Some(TerminationReason::SolverExit(_)) if solver.is_stagnated() => {
                Termination::Stagnated {
                    iters_without_improvement: solver.iters_without_improvement(),
                }
            }
            Some(TerminationReason::MaxItersReached) => Termination::MaxItersReached,
            Some(reason) => Termination::Executor(reason.to_string()),
            None => Termination::Executor(state.get_termination_status().to_string()),
        };

        let best_position = state
            .take_best_param()
            .ok_or(SwarmError::NoFiniteCost { iterations })?;

        Ok(Self {
            best_position,
            best_cost: state.get_best_cost(),
            iterations,
            termination,
            cost_history: solver.cost_history().to_vec(),
            non_finite_evaluations: solver.non_finite_evaluations(),
        })
    }
}
