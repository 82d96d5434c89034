/// Per-object result of `PostNewtonStep` (spec §4.7).
#[derive(Debug, Clone, Copy, Default)]
pub struct PostNewtonResult {
    /// `|stateDelta * characteristicStiffness|`; zero if the assumed
    /// state was already consistent.
    pub discontinuous_error: f64,
    pub update_jacobian: bool,
    /// `Some(dt)` to recommend a reduced step size landing on the
    /// transition.
    pub recommended_step_size: Option<f64>,
}

impl PostNewtonResult {
    pub fn consistent() -> Self {
        Self::default()
    }

    pub fn flipped(discontinuous_error: f64, recommended_step_size: Option<f64>) -> Self {
        Self { discontinuous_error, update_jacobian: true, recommended_step_size }
    }
}

/// Drives the outer discontinuous-iteration loop: calls `post_newton`
/// on every participating connector until the summed error is below
/// tolerance or the iteration budget is spent (spec §4.7).
pub fn run_discontinuous_iteration<F>(
    max_iterations: usize,
    tolerance: f64,
    mut post_newton_round: F,
) -> (bool, f64)
where
    F: FnMut() -> f64,
{
    let mut total_error = f64::INFINITY;
    for _ in 0..max_iterations {
        total_error = post_newton_round();
        if total_error < tolerance {
            return (true, total_error);
        }
    }
    (total_error < tolerance, total_error)
}
