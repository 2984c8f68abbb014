use derive_more::Display;

use crate::error::ConfigError;

pub const DEFAULT_INERTIA: f64 = 0.9;
pub const DEFAULT_COGNITIVE: f64 = 1.0;
pub const DEFAULT_SOCIAL: f64 = 1.0;
pub const DEFAULT_STAGNATION_WINDOW: f64 = 0.3;

/// What to do with an objective value that is NaN or infinite.
#[derive(Clone, Copy, Debug, Default, Display, PartialEq, Eq)]
pub enum NonFinitePolicy {
    /// Skip the value: it never becomes a personal or global best.
    #[default]
    #[display("ignore")]
    Ignore,
    /// Abort the run with `SwarmError::NonFiniteCost`.
    #[display("reject")]
    Reject,
}

/// Configuration for a particle swarm run.
#[derive(Clone, Debug, PartialEq)]
pub struct SwarmConfig {
    /// Number of particles in the swarm.
    pub n_particles: usize,
    /// Upper limit on evaluation passes over the swarm.
    pub max_iters: u64,

    /// Fraction of the previous velocity kept each iteration (`w`).
    pub inertia: f64,
    /// Pull towards the particle's own best position (`c1`).
    pub cognitive: f64,
    /// Pull towards the swarm's best position (`c2`).
    pub social: f64,

    /// Fraction of `max_iters` the global best may stay unchanged before the run stops early.
    pub stagnation_window: f64,

    /// Master seed. Particle `k` draws from its own generator seeded with `seed + k`.
    /// `None` picks a fresh seed per run.
    pub seed: Option<u64>,

    pub non_finite: NonFinitePolicy,
}

impl SwarmConfig {
    pub fn new(n_particles: usize, max_iters: u64) -> Self {
        Self {
            n_particles,
            max_iters,
            inertia: DEFAULT_INERTIA,
            cognitive: DEFAULT_COGNITIVE,
            social: DEFAULT_SOCIAL,
            stagnation_window: DEFAULT_STAGNATION_WINDOW,
            seed: None,
            non_finite: NonFinitePolicy::default(),
        }
    }

    /// 100 particles per dimension and 1000 iterations.
    pub fn for_dimension(dim: usize) -> Self {
        Self::new(100 * dim, 1000)
    }

    pub fn with_inertia(mut self, inertia: f64) -> Self {
        self.inertia = inertia;
        self
    }

    pub fn with_cognitive(mut self, cognitive: f64) -> Self {
        self.cognitive = cognitive;
        self
    }

    pub fn with_social(mut self, social: f64) -> Self {
        self.social = social;
        self
    }

    pub fn with_stagnation_window(mut self, stagnation_window: f64) -> Self {
        self.stagnation_window = stagnation_window;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_non_finite_policy(mut self, policy: NonFinitePolicy) -> Self {
        self.non_finite = policy;
        self
    }

    /// Number of consecutive unchanged iterations tolerated before stopping.
    pub fn stagnation_limit(&self) -> u64 {
        (self.stagnation_window * self.max_iters as f64).floor() as u64
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_particles == 0 {
            return Err(ConfigError::ZeroParticles);
        }
        if self.max_iters == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        for (name, value) in [
            ("inertia", self.inertia),
            ("cognitive", self.cognitive),
            ("social", self.social),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::InvalidCoefficient { name, value });
            }
        }
        if !self.stagnation_window.is_finite() || self.stagnation_window < 0.0 {
            return Err(ConfigError::InvalidStagnationWindow(self.stagnation_window));
        }
        Ok(())
    }
}
