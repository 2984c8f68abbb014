use std::{cell::RefCell, rc::Rc};

use argmin::core::{Error, KV, State, observers::Observe};
use tracing::info;

/// Collects the convergence history `(iteration, best cost)`.
///
/// Clones share the same buffer, so keep one clone and hand the other to the `Executor`.
#[derive(Clone, Default)]
pub struct CostHistory {
    history: Rc<RefCell<Vec<(u64, f64)>>>,
}

impl CostHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<(u64, f64)> {
        self.history.borrow().clone()
    }

    pub fn costs(&self) -> Vec<f64> {
        self.history.borrow().iter().map(|&(_, c)| c).collect()
    }
}

impl<I> Observe<I> for CostHistory
where
    I: State<Float = f64>,
{
    fn observe_iter(&mut self, state: &I, _kv: &KV) -> Result<(), Error> {
        self.history
            .borrow_mut()
            .push((state.get_iter(), state.get_best_cost()));
        Ok(())
    }
}

/// Logs the run at info level. Pair with `ObserverMode::Every(n)` to thin the output.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProgressLogger;

impl<I> Observe<I> for ProgressLogger
where
    I: State<Float = f64>,
{
    fn observe_init(&mut self, name: &str, state: &I, _kv: &KV) -> Result<(), Error> {
        info!(solver = name, max_iters = state.get_max_iters(), "starting run");
        Ok(())
    }

    fn observe_iter(&mut self, state: &I, kv: &KV) -> Result<(), Error> {
        info!(
            iter = state.get_iter(),
            best_cost = state.get_best_cost(),
            stats = %kv,
            "particle swarm progress"
        );
        Ok(())
    }

    fn observe_final(&mut self, state: &I) -> Result<(), Error> {
        info!(
            iterations = state.get_iter(),
            best_cost = state.get_best_cost(),
            status = %state.get_termination_status(),
            "final best cost"
        );
        Ok(())
    }
}
