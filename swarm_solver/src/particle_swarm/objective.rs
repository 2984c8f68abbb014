use std::marker::PhantomData;

use argmin::core::{CostFunction, Error as ArgminError};
use nalgebra::{DefaultAllocator, Dim, allocator::Allocator};

use crate::particle_swarm::bounds::Position;

/// Adapts a plain closure `Fn(&Position<D>) -> f64` into an argmin `CostFunction`.
///
/// The closure is shared between worker threads during evaluation, so it must be a pure
/// function of its input.
pub struct FnObjective<F, D> {
    f: F,
    _dim: PhantomData<fn() -> D>,
}

impl<F, D> FnObjective<F, D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
    F: Fn(&Position<D>) -> f64,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _dim: PhantomData,
        }
    }
}

impl<F, D> CostFunction for FnObjective<F, D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
    F: Fn(&Position<D>) -> f64,
{
    type Param = Position<D>;
    type Output = f64;

    fn cost(&self, p: &Self::Param) -> Result<Self::Output, ArgminError> {
        Ok((self.f)(p))
    }
}

/// Like [`FnObjective`], for closures that can fail. An `Err` aborts the run with
/// `SwarmError::ObjectiveEvaluationFailure`.
pub struct TryFnObjective<F, D> {
    f: F,
    _dim: PhantomData<fn() -> D>,
}

impl<F, D> TryFnObjective<F, D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
    F: Fn(&Position<D>) -> anyhow::Result<f64>,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _dim: PhantomData,
        }
    }
}

impl<F, D> CostFunction for TryFnObjective<F, D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
    F: Fn(&Position<D>) -> anyhow::Result<f64>,
{
    type Param = Position<D>;
    type Output = f64;

    fn cost(&self, p: &Self::Param) -> Result<Self::Output, ArgminError> {
        (self.f)(p)
    }
}
