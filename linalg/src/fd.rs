/// One- or two-sided stencil used by the numerical-Jacobian fallback
/// (spec §4.6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DiffStencil {
    /// `(f(q + h) - f(q)) / h`
    Forward,
    /// `(f(q + h) - f(q - h)) / (2h)`
    Central,
}

/// Per-coordinate finite-difference step `h_k = relativeEpsilon *
/// max(|q_k|, 1) * factor`, as specified in spec §4.6.
pub fn fd_step(q_k: f64, relative_epsilon: f64, factor: f64) -> f64 {
    relative_epsilon * q_k.abs().max(1.0) * factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn fd_step_scales_with_magnitude() {
        assert_abs_diff_eq!(fd_step(0.0, 1e-6, 1.0), 1e-6, epsilon = 1e-18);
        assert_abs_diff_eq!(fd_step(100.0, 1e-6, 1.0), 1e-4, epsilon = 1e-12);
    }
}
