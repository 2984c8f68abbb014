use std::time::Duration;

use argmin::core::{Executor, Problem, Solver, State, observers::ObserverMode};
use nalgebra::{DVector, Dyn, Vector2};
use pretty_assertions::assert_eq;
use test_case::test_case;

use super::{rastrigin, sphere, symmetric_box};
use crate::prelude::*;

#[test_case(1; "seed 1")]
#[test_case(7; "seed 7")]
#[test_case(42; "seed 42")]
fn test_sphere_converges_near_origin(seed: u64) {
    let (lb, ub) = symmetric_box(2, 1.0);
    let config = SwarmConfig::new(200, 100).with_seed(seed);

    let res = optimize_with_config(sphere, lb, ub, config).unwrap();

    assert!(
        res.best_position.norm() < 0.05,
        "best position {:?} too far from origin",
        res.best_position
    );
    assert!(res.iterations <= 100);
}

#[test]
fn test_optimize_returns_position_inside_box() {
    let (lb, ub) = symmetric_box(2, 1.0);
    let best = optimize(sphere, lb.clone(), ub.clone(), 200, 100).unwrap();

    assert_eq!(best.len(), 2);
    assert!(Bounds::new(lb, ub).unwrap().contains(&best));
    assert!(best.norm() < 0.05);
}

#[test]
fn test_fixed_size_vectors() {
    let res = optimize_with_config(
        |x: &Vector2<f64>| (x - Vector2::new(0.25, -0.5)).norm_squared(),
        Vector2::new(-1.0, -1.0),
        Vector2::new(1.0, 1.0),
        SwarmConfig::new(100, 100).with_seed(5),
    )
    .unwrap();

    assert!((res.best_position - Vector2::new(0.25, -0.5)).norm() < 0.05);
}

#[test]
fn test_constant_objective_stops_on_stagnation() {
    let (lb, ub) = symmetric_box(3, 2.0);
    let config = SwarmConfig::new(20, 1000).with_seed(3);

    let res = optimize_with_config(|_: &DVector<f64>| 5.0, lb, ub, config).unwrap();

    // pass 0 sets the best, passes 1..=301 leave it unchanged and 301 > floor(0.3 * 1000),
    // so pass 301 stops the run without being recorded
    assert_eq!(
        res.termination,
        Termination::Stagnated {
            iters_without_improvement: 301
        }
    );
    assert_eq!(res.cost_history.len(), 301);
    assert_eq!(res.cost_history.last(), Some(&(300, 5.0)));
    assert_eq!(res.iterations, 302);
    assert_eq!(res.best_cost, 5.0);
}

#[test]
fn test_constant_objective_tie_goes_to_first_particle() {
    let (lb, ub) = symmetric_box(2, 1.0);
    let config = SwarmConfig::new(32, 50).with_seed(9);

    let bounds = Bounds::new(lb.clone(), ub.clone()).unwrap();
    let first_particle = Swarm::new(bounds, 32, 9).particles()[0].position.clone();
    let res = optimize_with_config(|_: &DVector<f64>| 1.0, lb, ub, config).unwrap();

    assert_eq!(res.best_position, first_particle);
}

#[test]
fn test_history_is_monotonic() {
    let (lb, ub) = symmetric_box(4, 5.12);
    let config = SwarmConfig::new(40, 200).with_seed(11);

    let res = optimize_with_config(rastrigin, lb, ub, config).unwrap();

    assert!(!res.cost_history.is_empty());
    for (k, (iter, _)) in res.cost_history.iter().enumerate() {
        assert_eq!(*iter, k as u64);
    }
    for pair in res.cost_history.windows(2) {
        assert!(pair[1].1 <= pair[0].1, "best cost went up: {:?}", pair);
    }
    assert_eq!(res.cost_history.last().map(|&(_, c)| c), Some(res.best_cost));
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let (lb, ub) = symmetric_box(3, 5.12);
    let config = SwarmConfig::new(64, 150).with_seed(2024);

    let a = optimize_with_config(rastrigin, lb.clone(), ub.clone(), config.clone()).unwrap();
    let b = optimize_with_config(rastrigin, lb, ub, config).unwrap();

    assert_eq!(a.best_position, b.best_position);
    assert_eq!(a.cost_history, b.cost_history);
    assert_eq!(a.termination, b.termination);
}

#[test]
fn test_results_do_not_depend_on_thread_count() {
    let (lb, ub) = symmetric_box(3, 5.12);
    let config = SwarmConfig::new(64, 120).with_seed(31);

    let run_on = |threads: usize| {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();
        pool.install(|| {
            optimize_with_config(rastrigin, lb.clone(), ub.clone(), config.clone()).unwrap()
        })
    };

    let single = run_on(1);
    let many = run_on(8);

    assert_eq!(single.best_position, many.best_position);
    assert_eq!(single.cost_history, many.cost_history);
    assert_eq!(single.iterations, many.iterations);
}

#[test]
fn test_observers_see_recorded_history() {
    let (lb, ub) = symmetric_box(2, 1.0);
    let history = CostHistory::new();
    let solver = ParticleSwarm::new(lb, ub, SwarmConfig::new(50, 60).with_seed(8)).unwrap();

    let res = Executor::new(FnObjective::<_, Dyn>::new(sphere), solver)
        .add_observer(history.clone(), ObserverMode::Always)
        .add_observer(ProgressLogger, ObserverMode::Every(10))
        .run()
        .unwrap();
    let cost_count = res.problem.counts.get("cost_count").copied();
    let res = SwarmRunResult::try_from(res).unwrap();

    assert_eq!(history.history(), res.cost_history);
    assert_eq!(history.costs().len(), res.cost_history.len());
    assert_eq!(cost_count, Some(50 * res.iterations));
}

#[test]
fn test_executor_timeout_is_reported() {
    let (lb, ub) = symmetric_box(2, 1.0);
    let solver = ParticleSwarm::new(lb, ub, SwarmConfig::new(20, 1000).with_seed(6)).unwrap();

    let res = Executor::new(FnObjective::<_, Dyn>::new(sphere), solver)
        .timeout(Duration::from_nanos(1))
        .run()
        .unwrap();
    let res = SwarmRunResult::try_from(res).unwrap();

    // iteration 0 is recorded, pass 1 is already evaluated when the timer fires
    assert_eq!(res.cost_history.len(), 1);
    assert_eq!(res.iterations, 2);
    assert_eq!(res.termination, Termination::Executor("Timeout reached".to_string()));
}

#[test]
fn test_objective_error_aborts_run() {
    let (lb, ub) = symmetric_box(2, 1.0);
    let objective = TryFnObjective::<_, Dyn>::new(|_: &DVector<f64>| -> anyhow::Result<f64> {
        anyhow::bail!("simulation diverged")
    });
    let solver = ParticleSwarm::new(lb, ub, SwarmConfig::new(10, 10)).unwrap();

    let err = Executor::new(objective, solver)
        .run()
        .map_err(SwarmError::from)
        .err()
        .unwrap();

    assert!(matches!(
        err,
        SwarmError::ObjectiveEvaluationFailure { iter: 0, .. }
    ));
    assert!(err.to_string().contains("simulation diverged"));
}

/// NaN on the right half of the box.
fn nan_right_half(x: &DVector<f64>) -> f64 {
    if x[0] > 0.0 { f64::NAN } else { x.norm_squared() }
}

#[test]
fn test_non_finite_costs_are_ignored_by_default() {
    let (lb, ub) = symmetric_box(2, 1.0);
    let config = SwarmConfig::new(60, 80).with_seed(21);

    let res = optimize_with_config(nan_right_half, lb, ub, config).unwrap();

    assert!(res.best_cost.is_finite());
    assert!(res.best_position[0] <= 0.0);
    assert!(res.non_finite_evaluations > 0);
}

#[test]
fn test_non_finite_costs_rejected_on_request() {
    let (lb, ub) = symmetric_box(2, 1.0);
    let config = SwarmConfig::new(60, 80)
        .with_seed(21)
        .with_non_finite_policy(NonFinitePolicy::Reject);

    let err = optimize_with_config(nan_right_half, lb, ub, config).err().unwrap();

    assert!(matches!(err, SwarmError::NonFiniteCost { iter: 0, cost, .. } if cost.is_nan()));
}

#[test]
fn test_no_finite_cost_is_an_error() {
    let (lb, ub) = symmetric_box(2, 1.0);
    let config = SwarmConfig::new(10, 50).with_seed(4);

    let err = optimize_with_config(|_: &DVector<f64>| f64::NAN, lb, ub, config)
        .err()
        .unwrap();

    // +inf never changes, so stagnation (limit 15) ends the run after 16 passes
    assert!(matches!(err, SwarmError::NoFiniteCost { iterations: 16 }));
}

#[test]
fn test_stepwise_solver_matches_executor() {
    let (lb, ub) = symmetric_box(2, 3.0);
    let config = SwarmConfig::new(24, 30).with_seed(77).with_stagnation_window(1.0);

    let mut solver = ParticleSwarm::new(lb.clone(), ub.clone(), config.clone()).unwrap();
    type Objective = FnObjective<fn(&DVector<f64>) -> f64, Dyn>;
    let mut problem = Problem::new(Objective::new(rastrigin));
    let (mut state, _) = solver.init(&mut problem, SwarmState::new()).unwrap();
    assert_eq!(state.get_max_iters(), 30);
    while !<ParticleSwarm<Dyn> as Solver<Objective, SwarmState<Dyn>>>::terminate_internal(
        &mut solver,
        &state,
    )
    .terminated()
    {
        let (next, _) = solver.next_iter(&mut problem, state).unwrap();
        state = next;
        state.increment_iter();
    }
    let res = optimize_with_config(rastrigin, lb, ub, config).unwrap();

    assert_eq!(res.termination, Termination::MaxItersReached);
    assert_eq!(solver.evaluation_passes(), 30);
    assert_eq!(solver.cost_history(), res.cost_history.as_slice());
    let swarm_best = solver.swarm().and_then(|swarm| swarm.global_best().position);
    assert_eq!(swarm_best, Some(res.best_position));
}
