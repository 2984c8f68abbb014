/// Picks `n` evenly spaced entries of a convergence history, first and last included.
/// Histories with at most `n` entries are returned whole.
pub fn checkpoints(history: &[(u64, f64)], n: usize) -> Vec<(u64, f64)> {
    if history.len() <= n {
        return history.to_vec();
    }
    match n {
        0 => Vec::new(),
        1 => history.last().copied().into_iter().collect(),
        _ => {
            let last = history.len() - 1;
            (0..n).map(|k| history[k * last / (n - 1)]).collect()
        }
    }
}
