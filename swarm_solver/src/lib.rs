pub mod error;
pub mod particle_swarm;

pub mod prelude {
    pub use crate::{
        error::*,
        particle_swarm::{
            ParticleSwarm, SwarmState,
            bounds::*,
            config::*,
            global_best::*,
            objective::*,
            observer::*,
            optimize, optimize_with_config,
            particle::*,
            run_log_data::*,
            swarm::*,
        },
    };
}

/// Asserts two floats differ by less than `eps` (default `1e-6`).
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr) => {
        $crate::assert_approx_eq!($a, $b, 1.0e-6)
    };
    ($a:expr, $b:expr, $eps:expr) => {{
        let (a, b, eps): (f64, f64, f64) = ($a, $b, $eps);
        assert!(
            (a - b).abs() < eps,
            "{a} and {b} differ by {}, tolerance {eps}",
            (a - b).abs()
        );
    }};
}
