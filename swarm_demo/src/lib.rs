pub mod objectives;
pub mod report;

pub mod prelude {
    pub use crate::{
        objectives::{Rastrigin, magnitude, rastrigin, rosenbrock, sphere},
        report::checkpoints,
    };
}

pub use crate::prelude::*;
