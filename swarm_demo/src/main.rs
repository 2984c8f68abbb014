use anyhow::Result;
use argmin::core::{Executor, observers::ObserverMode};
use nalgebra::DVector;
use swarm_demo::prelude::*;
use swarm_solver::prelude::*;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2-D magnitude on the unit box
    let lb = DVector::from_element(2, -1.0);
    let ub = DVector::from_element(2, 1.0);
    let best = optimize(magnitude, lb, ub, 200, 100)?;
    println!("magnitude: best position {:?}", best.as_slice());

    // 5-D Rastrigin with a recorded convergence history
    let dim = 5;
    let lb = DVector::from_element(dim, -5.12);
    let ub = DVector::from_element(dim, 5.12);
    let history = CostHistory::new();

    let solver = ParticleSwarm::new(lb, ub, SwarmConfig::for_dimension(dim).with_seed(1))?;

    let res = Executor::new(Rastrigin::new(dim), solver)
        .add_observer(history.clone(), ObserverMode::Always)
        .add_observer(ProgressLogger, ObserverMode::Every(100))
        .run()?;
    let res = SwarmRunResult::try_from(res)?;

    println!(
        "rastrigin: best cost {:.6e} after {} iterations ({})",
        res.best_cost, res.iterations, res.termination
    );
    println!("rastrigin: best position {:?}", res.best_position.as_slice());
    println!("convergence:");
    for (iter, cost) in checkpoints(&history.history(), 10) {
        println!("   {:>5}: {:.6e}", iter, cost);
    }

    Ok(())
}
