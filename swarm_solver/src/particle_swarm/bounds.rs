use nalgebra::{DefaultAllocator, Dim, OVector, U1, allocator::Allocator};
use rand::{
    Rng,
    distr::{Distribution, Uniform},
};

use crate::error::ConfigError;

/// Position (and velocity) vector of a particle.
/// `D` is `Dyn` for `DVector`s or `Const<N>` for `SVector`s.
pub type Position<D> = OVector<f64, D>;

/// Box constraint `lower[i] <= x[i] <= upper[i]` on the search space.
#[derive(Clone, Debug)]
pub struct Bounds<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
{
    lower: Position<D>,
    upper: Position<D>,
    samplers: Vec<Uniform<f64>>,
}

impl<D> Bounds<D>
where
    D: Dim,
    DefaultAllocator: Allocator<D>,
{
    pub fn new(lower: Position<D>, upper: Position<D>) -> Result<Self, ConfigError> {
        if lower.len() != upper.len() {
            return Err(ConfigError::BoundsLengthMismatch {
                lower: lower.len(),
                upper: upper.len(),
            });
        }
        if lower.is_empty() {
            return Err(ConfigError::ZeroDimension);
        }

        let samplers = lower
            .iter()
            .zip(upper.iter())
            .enumerate()
            .map(|(idx, (&lo, &hi))| {
                if !lo.is_finite() || !hi.is_finite() {
                    return Err(ConfigError::NonFiniteBound {
                        idx,
                        lower: lo,
                        upper: hi,
                    });
                }
                if lo > hi {
                    return Err(ConfigError::InvertedBounds {
                        idx,
                        lower: lo,
                        upper: hi,
                    });
                }
                // Rejects ranges whose width overflows f64.
                Uniform::new_inclusive(lo, hi).map_err(|_| ConfigError::NonFiniteBound {
                    idx,
                    lower: lo,
                    upper: hi,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            lower,
            upper,
            samplers,
        })
    }

    pub fn dim(&self) -> D {
        self.lower.shape_generic().0
    }

    pub fn len(&self) -> usize {
        self.lower.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lower.is_empty()
    }

    pub fn lower(&self) -> &Position<D> {
        &self.lower
    }

    pub fn upper(&self) -> &Position<D> {
        &self.upper
    }

    pub fn span(&self, idx: usize) -> f64 {
        self.upper[idx] - self.lower[idx]
    }

    /// Draws a point uniformly from the box, one independent draw per dimension.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Position<D> {
        Position::<D>::from_fn_generic(self.dim(), U1, |i, _| self.samplers[i].sample(rng))
    }

    pub fn contains(&self, p: &Position<D>) -> bool {
        p.len() == self.len()
            && p.iter()
                .zip(self.lower.iter().zip(self.upper.iter()))
                .all(|(x, (lo, hi))| lo <= x && x <= hi)
    }

    pub fn zeros(&self) -> Position<D> {
        Position::<D>::zeros_generic(self.dim(), U1)
    }
}
