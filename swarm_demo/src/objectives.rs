//! Benchmark objectives for exercising the optimizer.

use std::f64::consts::PI;

use anyhow::bail;
use argmin::core::{CostFunction, Error as ArgminError};
use nalgebra::DVector;

/// Euclidean norm. Minimum 0 at the origin, not differentiable there.
pub fn magnitude(x: &DVector<f64>) -> f64 {
    x.norm()
}

pub fn sphere(x: &DVector<f64>) -> f64 {
    x.norm_squared()
}

/// Highly multimodal; global minimum 0 at the origin, usually searched on `[-5.12, 5.12]^n`.
pub fn rastrigin(x: &DVector<f64>) -> f64 {
    10.0 * x.len() as f64
        + x.iter()
            .map(|xi| xi * xi - 10.0 * (2.0 * PI * xi).cos())
            .sum::<f64>()
}

/// Narrow curved valley; global minimum 0 at `(1, ..., 1)`.
pub fn rosenbrock(x: &DVector<f64>) -> f64 {
    x.as_slice()
        .windows(2)
        .map(|w| 100.0 * (w[1] - w[0] * w[0]).powi(2) + (1.0 - w[0]).powi(2))
        .sum()
}

/// Rastrigin as a standalone cost function with a fixed dimension.
#[derive(Clone, Debug)]
pub struct Rastrigin {
    pub dim: usize,
}

impl Rastrigin {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl CostFunction for Rastrigin {
    type Param = DVector<f64>;
    type Output = f64;

    fn cost(&self, p: &Self::Param) -> Result<Self::Output, ArgminError> {
        if p.len() != self.dim {
            bail!(
                "Parameter vector length ({}) did not match Rastrigin dimension ({})",
                p.len(),
                self.dim
            );
        }
        Ok(rastrigin(p))
    }
}
