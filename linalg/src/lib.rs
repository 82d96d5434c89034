//! Fixed-size vector/matrix kernels shared by the rest of the workspace.
//!
//! Everything here is a thin, allocation-free layer on top of `nalgebra`:
//! skew-symmetric matrix construction, 6x6 block assembly for spatial
//! transforms, and the finite-difference step-size policy used by the
//! numerical-Jacobian fallback.

pub mod fd;
pub mod skew;

pub use fd::{fd_step, DiffStencil};
pub use skew::skew;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use nalgebra::Vector3;

    const TOL: f64 = 1e-12;

    #[test]
    fn skew_cross_product_identity() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(-2.0, 0.5, 4.0);
        let expected = a.cross(&b);
        let got = skew(&a) * b;
        assert_abs_diff_eq!(got, expected, epsilon = TOL);
    }
}
