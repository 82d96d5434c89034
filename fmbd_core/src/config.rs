use serde::{Deserialize, Serialize};

/// Step policy for numerical (finite-difference) Jacobian fallback
/// (spec §4.6): `h_k = relative_epsilon * max(|q_k|, 1) * factor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiffSettings {
    pub relative_epsilon: f64,
    pub stencil: linalg::DiffStencil,
    pub use_sparse_matrices: bool,
}

impl Default for DiffSettings {
    fn default() -> Self {
        Self { relative_epsilon: 1e-7, stencil: linalg::DiffStencil::Central, use_sparse_matrices: false }
    }
}

/// Newton and discontinuous-iteration tolerances plus the dispatch
/// capability flag (spec §5's optional parallel-for abstraction).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    pub newton_tolerance: f64,
    pub max_newton_iterations: usize,
    pub discontinuous_tolerance: f64,
    pub max_post_newton_iterations: usize,
    pub diff_settings: DiffSettings,
    pub parallel: bool,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            newton_tolerance: 1e-10,
            max_newton_iterations: 25,
            discontinuous_tolerance: 1e-8,
            max_post_newton_iterations: 10,
            diff_settings: DiffSettings::default(),
            parallel: false,
        }
    }
}
