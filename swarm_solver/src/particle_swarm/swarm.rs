use argmin::core::CostFunction;
use nalgebra::{DefaultAllocator, Dim, allocator::Allocator};
use rand::{SeedableRng, rngs::StdRng};
use rayon::prelude::*;
use tracing::warn;

use crate::{
    error::SwarmError,
    particle_swarm::{
        bounds::{Bounds, Position},
        config::{NonFinitePolicy, SwarmConfig},
        global_best::{GlobalBest, SharedGlobalBest},
        particle::Particle,
    },
};

/// The particle collection together with the best solution any of them has found.
///
/// One iteration is `evaluate` followed by `update`. Each phase runs across particles on the
/// rayon pool and returns only after every particle is done.
pub struct Swarm<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
{
    particles: Vec<Particle<D>>,
    global_best: SharedGlobalBest<D>,
    bounds: Bounds<D>,
}

impl<D> Swarm<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
    Position<D>: Send + Sync,
{
    /// Scatters `n_particles` uniformly over `bounds`. Particle `k` gets a generator seeded
    /// with `master_seed + k`.
    pub fn new(bounds: Bounds<D>, n_particles: usize, master_seed: u64) -> Self {
        let particles = (0..n_particles)
            .map(|k| {
                let rng = StdRng::seed_from_u64(master_seed.wrapping_add(k as u64));
                Particle::random(&bounds, rng)
            })
            .collect();

        Self {
            particles,
            global_best: SharedGlobalBest::new(GlobalBest::empty()),
            bounds,
        }
    }

    pub fn particles(&self) -> &[Particle<D>] {
        &self.particles
    }

    pub fn bounds(&self) -> &Bounds<D> {
        &self.bounds
    }

    pub fn global_best(&self) -> GlobalBest<D> {
        self.global_best.snapshot()
    }

    pub fn best_cost(&self) -> f64 {
        self.global_best.cost()
    }

    pub fn into_global_best(self) -> GlobalBest<D> {
        self.global_best.into_inner()
    }

    /// Evaluates every particle at its current position and updates personal and global bests.
    ///
    /// Returns the number of non-finite costs that were skipped.
    pub fn evaluate<O>(
        &mut self,
        objective: &O,
        iter: u64,
        policy: NonFinitePolicy,
    ) -> Result<usize, SwarmError>
    where
        O: CostFunction<Param = Position<D>, Output = f64> + Sync,
    {
        let global_best = &self.global_best;

        let skipped = self
            .particles
            .par_iter_mut()
            .enumerate()
            .map(|(idx, particle)| -> Result<usize, SwarmError> {
                let cost = objective.cost(&particle.position).map_err(|source| {
                    SwarmError::ObjectiveEvaluationFailure {
                        iter,
                        particle: idx,
                        source,
                    }
                })?;

                if !cost.is_finite() {
                    return match policy {
                        NonFinitePolicy::Ignore => {
                            particle.cost = cost;
                            Ok(1)
                        }
                        NonFinitePolicy::Reject => Err(SwarmError::NonFiniteCost {
                            iter,
                            particle: idx,
                            cost,
                        }),
                    };
                }

                if particle.record_cost(cost) {
                    global_best.offer(cost, &particle.position, iter, idx);
                }
                Ok(0)
            })
            .try_reduce(|| 0, |a, b| Ok(a + b))?;

        if skipped > 0 {
            warn!(iter, skipped, "ignored non-finite objective values");
        }
        Ok(skipped)
    }

    /// Moves every particle one step towards its own and the swarm's best position.
    pub fn update(&mut self, config: &SwarmConfig) {
        let guide = self.global_best.snapshot().position;
        let bounds = &self.bounds;

        self.particles
            .par_iter_mut()
            .for_each(|particle| particle.step(guide.as_ref(), config, bounds));
    }
}
