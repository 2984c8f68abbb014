use std::sync::{Mutex, PoisonError};

use nalgebra::{DefaultAllocator, Dim, allocator::Allocator};

use crate::particle_swarm::bounds::Position;

/// Best solution found by any particle so far.
#[derive(Clone, Debug)]
pub struct GlobalBest<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
{
    /// `None` until some particle reports a finite cost.
    pub position: Option<Position<D>>,
    pub cost: f64,
    /// `(iteration, particle index)` of the last replacement.
    pub found_at: Option<(u64, usize)>,
}

impl<D> GlobalBest<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
{
    pub fn empty() -> Self {
        Self {
            position: None,
            cost: f64::INFINITY,
            found_at: None,
        }
    }

    fn beats_incumbent(&self, cost: f64, iter: u64, particle: usize) -> bool {
        if cost < self.cost {
            return true;
        }
        // Ties within one iteration go to the lowest particle index, so the outcome does not
        // depend on which worker reached the lock first.
        cost == self.cost
            && matches!(self.found_at, Some((it, idx)) if it == iter && particle < idx)
    }
}

/// Global best shared between the workers of one evaluation phase.
///
/// Score and position are always replaced together under the lock.
#[derive(Debug)]
pub struct SharedGlobalBest<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
{
    inner: Mutex<GlobalBest<D>>,
}

impl<D> SharedGlobalBest<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
{
    pub fn new(best: GlobalBest<D>) -> Self {
        Self {
            inner: Mutex::new(best),
        }
    }

    /// Replaces the global best with `(cost, position)` if it is better.
    /// Returns `true` if the replacement happened.
    pub fn offer(&self, cost: f64, position: &Position<D>, iter: u64, particle: usize) -> bool {
        // The pair is only ever swapped wholesale; a poisoned lock still holds a consistent value.
        let mut best = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if !best.beats_incumbent(cost, iter, particle) {
            return false;
        }
        best.cost = cost;
        match best.position.as_mut() {
            Some(p) => p.clone_from(position),
            None => best.position = Some(position.clone()),
        }
        best.found_at = Some((iter, particle));
        true
    }

    pub fn cost(&self) -> f64 {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).cost
    }

    pub fn snapshot(&self) -> GlobalBest<D> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn into_inner(self) -> GlobalBest<D> {
        self.inner.into_inner().unwrap_or_else(PoisonError::into_inner)
    }
}
