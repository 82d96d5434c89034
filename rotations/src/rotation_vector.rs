use crate::rotation_matrix::RotationMatrix;
use crate::RotationTrait;
use linalg::skew;
use nalgebra::{DMatrix, Matrix3, Matrix3xX, Vector3};
use serde::{Deserialize, Serialize};

/// A Lie-group rotation vector `theta` with `R = exp(skew(theta))`
/// (`RigidBodyRotVec`, spec §3/§4.2). Backs the Data-coordinate
/// Lie-group node: time integration updates `theta` via left-translation
/// composition, not by integrating `theta` itself.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RotationVector {
    pub theta: Vector3<f64>,
}

impl RotationVector {
    pub const IDENTITY: Self = Self { theta: Vector3::new(0.0, 0.0, 0.0) };

    pub fn new(theta: Vector3<f64>) -> Self {
        Self { theta }
    }

    pub fn exp(&self) -> RotationMatrix {
        RotationMatrix::from(self)
    }

    /// `log_SO(3)`: recovers a rotation vector from a rotation matrix,
    /// valid on the `(-pi, pi)` branch (spec §8 property 3).
    pub fn log(r: &RotationMatrix) -> Self {
        let m = r.0;
        let cos_phi = ((m.trace() - 1.0) / 2.0).clamp(-1.0, 1.0);
        let phi = cos_phi.acos();
        if phi < 1e-9 {
            let v = skew::unskew(&(m - m.transpose())) * 0.5;
            return Self::new(v);
        }
        let v = skew::unskew(&(m - m.transpose())) * (phi / (2.0 * phi.sin()));
        Self::new(v)
    }

    /// Composition on SO(3): `log(exp(theta0) * exp(dtheta))`, the
    /// left-translated position-level update used by the Lie-group node
    /// (spec §4.2).
    pub fn compose(&self, dtheta: &Vector3<f64>) -> Self {
        let r0 = self.exp();
        let dr = RotationVector::new(*dtheta).exp();
        Self::log(&r0.mul(&dr))
    }

    fn left_jacobian_coeffs(phi: f64) -> (f64, f64) {
        if phi < 1e-8 {
            (0.5 - phi * phi / 24.0, 1.0 / 6.0 - phi * phi / 120.0)
        } else {
            (
                (1.0 - phi.cos()) / (phi * phi),
                (phi - phi.sin()) / (phi * phi * phi),
            )
        }
    }

    /// Left Jacobian of the `SO(3)` exponential map, `TexpSO3` (spec
    /// GLOSSARY): maps `theta_dot` to world-frame angular velocity.
    pub fn left_jacobian(&self) -> Matrix3<f64> {
        let phi = self.theta.norm();
        let (a, b) = Self::left_jacobian_coeffs(phi);
        let sk = skew(&self.theta);
        Matrix3::identity() + a * sk + b * (sk * sk)
    }

    /// Right Jacobian `Jr(theta) = Jl(-theta)`: maps `theta_dot` to
    /// body-frame angular velocity.
    pub fn right_jacobian(&self) -> Matrix3<f64> {
        RotationVector::new(-self.theta).left_jacobian()
    }
}

impl From<&RotationVector> for RotationMatrix {
    fn from(rv: &RotationVector) -> Self {
        let phi = rv.theta.norm();
        if phi < 1e-12 {
            return RotationMatrix::new(Matrix3::identity() + skew(&rv.theta));
        }
        let sk = skew(&rv.theta);
        let r = Matrix3::identity() + (phi.sin() / phi) * sk + ((1.0 - phi.cos()) / (phi * phi)) * (sk * sk);
        RotationMatrix::new(r)
    }
}

impl RotationTrait for RotationVector {
    fn n_rot_coord(&self) -> usize {
        3
    }

    fn rotation_matrix(&self) -> Matrix3<f64> {
        RotationMatrix::from(self).0
    }

    fn g(&self) -> Matrix3xX<f64> {
        Matrix3xX::from_columns(
            &self
                .left_jacobian()
                .column_iter()
                .map(|c| c.into_owned())
                .collect::<Vec<_>>(),
        )
    }

    fn g_local(&self) -> Matrix3xX<f64> {
        Matrix3xX::from_columns(
            &self
                .right_jacobian()
                .column_iter()
                .map(|c| c.into_owned())
                .collect::<Vec<_>>(),
        )
    }

    // Exudyn computes these via automatic differentiation for the
    // rotation-vector node (spec §4.2); central differences stand in for
    // that here since no AD crate is in play for this workspace.
    fn gt_v_q(&self, v: &Vector3<f64>) -> DMatrix<f64> {
        numerical_gt_v_q(self, v, true)
    }

    fn g_local_t_v_q(&self, v: &Vector3<f64>) -> DMatrix<f64> {
        numerical_gt_v_q(self, v, false)
    }
}

fn numerical_gt_v_q(rv: &RotationVector, v: &Vector3<f64>, world: bool) -> DMatrix<f64> {
    let h = 1e-6;
    let f = |theta: Vector3<f64>| -> Vector3<f64> {
        let node = RotationVector::new(theta);
        let g = if world { node.g() } else { node.g_local() };
        g.transpose() * v
    };
    let mut jac = DMatrix::zeros(3, 3);
    for k in 0..3 {
        let mut tp = rv.theta;
        let mut tm = rv.theta;
        tp[k] += h;
        tm[k] -= h;
        let d = (f(tp) - f(tm)) / (2.0 * h);
        jac.fixed_view_mut::<3, 1>(0, k).copy_from(&d);
    }
    jac
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TOL: f64 = 1e-9;

    #[test]
    fn exp_log_round_trip() {
        let theta = Vector3::new(0.3, -0.6, 0.9);
        let rv = RotationVector::new(theta);
        let r = rv.exp();
        let back = RotationVector::log(&r);
        assert_abs_diff_eq!(back.theta, theta, epsilon = 1e-10);
    }

    #[test]
    fn identity_exp_is_identity() {
        let rv = RotationVector::IDENTITY;
        assert_abs_diff_eq!(rv.rotation_matrix(), Matrix3::identity(), epsilon = TOL);
    }

    #[test]
    fn rotation_matrix_is_orthonormal_for_large_angle() {
        let theta = Vector3::new(0.1, 2.5, -1.2);
        let r = RotationVector::new(theta).rotation_matrix();
        assert_abs_diff_eq!(r * r.transpose(), Matrix3::identity(), epsilon = 1e-9);
        assert_abs_diff_eq!(r.determinant(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn composition_matches_matrix_product() {
        let theta0 = Vector3::new(0.2, 0.1, -0.3);
        let dtheta = Vector3::new(-0.05, 0.4, 0.1);
        let rv0 = RotationVector::new(theta0);
        let composed = rv0.compose(&dtheta);
        let expected = rv0.exp().mul(&RotationVector::new(dtheta).exp());
        assert_abs_diff_eq!(composed.rotation_matrix(), expected.0, epsilon = 1e-9);
    }
}
