use nalgebra::{DefaultAllocator, Dim, allocator::Allocator};
use rand::{Rng, rngs::StdRng};

use crate::particle_swarm::{
    bounds::{Bounds, Position},
    config::SwarmConfig,
};

/// A single candidate solution.
///
/// Each particle owns its random number generator, so the velocity update can run on any
/// worker thread without sharing a generator, and a seeded run is reproducible regardless
/// of how the particles get scheduled.
#[derive(Clone, Debug)]
pub struct Particle<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
{
    pub position: Position<D>,
    pub velocity: Position<D>,
    pub best_position: Position<D>,
    /// Lowest finite cost seen at `best_position`; `+inf` until the first one.
    pub best_cost: f64,
    /// Cost from the most recent evaluation.
    pub cost: f64,
    rng: StdRng,
}

impl<D> Particle<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
{
    pub fn new(position: Position<D>, velocity: Position<D>, rng: StdRng) -> Self {
        Self {
            best_position: position.clone(),
            position,
            velocity,
            best_cost: f64::INFINITY,
            cost: f64::INFINITY,
            rng,
        }
    }

    /// Particle at a uniformly random point of `bounds`, at rest.
    pub fn random(bounds: &Bounds<D>, mut rng: StdRng) -> Self {
        let position = bounds.sample(&mut rng);
        Self::new(position, bounds.zeros(), rng)
    }

    /// Stores the cost of the current position. Returns `true` if it improved the personal best.
    pub fn record_cost(&mut self, cost: f64) -> bool {
        self.cost = cost;
        if cost < self.best_cost {
            self.best_cost = cost;
            self.best_position.clone_from(&self.position);
            true
        } else {
            false
        }
    }

    /// Moves the particle one step and pulls it back inside `bounds`.
    ///
    /// `global_best` is `None` while no particle has produced a finite cost; the social
    /// term is then dropped.
    pub fn step(
        &mut self,
        global_best: Option<&Position<D>>,
        config: &SwarmConfig,
        bounds: &Bounds<D>,
    ) {
        self.update_velocity(global_best, config);
        self.position += &self.velocity;
        self.apply_bounds(bounds);
    }

    fn update_velocity(&mut self, global_best: Option<&Position<D>>, config: &SwarmConfig) {
        self.velocity *= config.inertia;
        for i in 0..self.position.len() {
            let r1: f64 = self.rng.random();
            let r2: f64 = self.rng.random();
            let x = self.position[i];
            let social = global_best.map_or(0.0, |g| g[i] - x);
            self.velocity[i] +=
                config.cognitive * r1 * (self.best_position[i] - x) + config.social * r2 * social;
        }
    }

    /// Per dimension: a velocity wider than the box (or non-finite) is zeroed, a position
    /// outside the box reverses its velocity, and the position is clamped into the box either
    /// way. A NaN position, left behind by an overflowing velocity update, falls back to the
    /// personal best.
    pub fn apply_bounds(&mut self, bounds: &Bounds<D>) {
        for i in 0..self.position.len() {
            let (lo, hi) = (bounds.lower()[i], bounds.upper()[i]);
            let v = self.velocity[i];
            let x = self.position[i];

            if !v.is_finite() || v.abs() > bounds.span(i) {
                self.velocity[i] = 0.0;
            } else if x > hi || x < lo {
                self.velocity[i] = -v;
            }

            let x = if x.is_nan() { self.best_position[i] } else { x };
            self.position[i] = x.clamp(lo, hi);
        }
    }
}
