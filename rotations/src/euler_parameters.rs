use crate::rotation_matrix::RotationMatrix;
use crate::{RotationError, RotationTrait};
use linalg::skew;
use nalgebra::{DMatrix, Matrix3xX, Vector3, Vector4};
use serde::{Deserialize, Serialize};

/// Euler parameters: a unit quaternion `(e0, e1, e2, e3)` with `e0` the
/// scalar part. Every `RigidBodyEP` node owns one of these plus the
/// algebraic normalization equation `e^T e - 1 = 0` (spec §4.2).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EulerParameters {
    pub e0: f64,
    pub e1: f64,
    pub e2: f64,
    pub e3: f64,
}

impl Default for EulerParameters {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl EulerParameters {
    pub const IDENTITY: Self = Self {
        e0: 1.0,
        e1: 0.0,
        e2: 0.0,
        e3: 0.0,
    };

    pub fn new(e0: f64, e1: f64, e2: f64, e3: f64) -> Result<Self, RotationError> {
        let mag = (e0 * e0 + e1 * e1 + e2 * e2 + e3 * e3).sqrt();
        if mag <= f64::EPSILON {
            return Err(RotationError::ZeroMagnitudeQuaternion);
        }
        Ok(Self {
            e0: e0 / mag,
            e1: e1 / mag,
            e2: e2 / mag,
            e3: e3 / mag,
        })
    }

    pub fn vector_part(&self) -> Vector3<f64> {
        Vector3::new(self.e1, self.e2, self.e3)
    }

    pub fn coords(&self) -> Vector4<f64> {
        Vector4::new(self.e0, self.e1, self.e2, self.e3)
    }

    /// `e^T e - 1`, the algebraic normalization residual (spec §4.2).
    pub fn normalization_residual(&self) -> f64 {
        self.coords().dot(&self.coords()) - 1.0
    }

    /// `d(e^T e - 1)/de = [2e0, 2e1, 2e2, 2e3]`, the AE Jacobian row.
    pub fn normalization_jacobian(&self) -> Vector4<f64> {
        2.0 * self.coords()
    }

    pub fn conjugate(&self) -> Self {
        Self {
            e0: self.e0,
            e1: -self.e1,
            e2: -self.e2,
            e3: -self.e3,
        }
    }

    /// Quaternion composition `self * rhs` (apply `rhs` first).
    pub fn compose(&self, rhs: &Self) -> Self {
        let (a0, av) = (self.e0, self.vector_part());
        let (b0, bv) = (rhs.e0, rhs.vector_part());
        let w = a0 * b0 - av.dot(&bv);
        let v = a0 * bv + b0 * av + av.cross(&bv);
        EulerParameters::new(w, v.x, v.y, v.z).unwrap_or(EulerParameters::IDENTITY)
    }

    pub fn rotate(&self, v: Vector3<f64>) -> Vector3<f64> {
        self.rotation_matrix() * v
    }
}

impl std::ops::Mul for EulerParameters {
    type Output = EulerParameters;
    fn mul(self, rhs: EulerParameters) -> EulerParameters {
        self.compose(&rhs)
    }
}

impl From<&EulerParameters> for RotationMatrix {
    fn from(e: &EulerParameters) -> Self {
        let ev = e.vector_part();
        let e0 = e.e0;
        let r = (2.0 * e0 * e0 - 1.0) * nalgebra::Matrix3::identity()
            + 2.0 * ev * ev.transpose()
            + 2.0 * e0 * skew(&ev);
        RotationMatrix::new(r)
    }
}

impl RotationTrait for EulerParameters {
    fn n_rot_coord(&self) -> usize {
        4
    }

    fn rotation_matrix(&self) -> nalgebra::Matrix3<f64> {
        RotationMatrix::from(self).0
    }

    fn g(&self) -> Matrix3xX<f64> {
        let (e0, e1, e2, e3) = (self.e0, self.e1, self.e2, self.e3);
        #[rustfmt::skip]
        let g = Matrix3xX::from_row_slice(4, &[
            -e1,  e0, -e3,  e2,
            -e2,  e3,  e0, -e1,
            -e3, -e2,  e1,  e0,
        ]);
        2.0 * g
    }

    fn g_local(&self) -> Matrix3xX<f64> {
        let (e0, e1, e2, e3) = (self.e0, self.e1, self.e2, self.e3);
        #[rustfmt::skip]
        let g = Matrix3xX::from_row_slice(4, &[
            -e1,  e0,  e3, -e2,
            -e2, -e3,  e0,  e1,
            -e3,  e2, -e1,  e0,
        ]);
        2.0 * g
    }

    // Per spec §4.2: for EP this derivative is treated as zero beyond the
    // inertia-quadratic-velocity terms, which RigidBody computes directly
    // via G*Gdot rather than through this hook.
    fn gt_v_q(&self, _v: &Vector3<f64>) -> DMatrix<f64> {
        DMatrix::zeros(4, 4)
    }

    fn g_local_t_v_q(&self, _v: &Vector3<f64>) -> DMatrix<f64> {
        DMatrix::zeros(4, 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TOL: f64 = 1e-10;

    #[test]
    fn identity_rotation_matrix_is_identity() {
        let e = EulerParameters::IDENTITY;
        assert_abs_diff_eq!(e.rotation_matrix(), nalgebra::Matrix3::identity(), epsilon = TOL);
    }

    #[test]
    fn normalization_residual_is_zero_for_unit_quaternion() {
        let e = EulerParameters::new(0.7010573846499779, 0.0922959556412572, 0.560985526796931, 0.43045933457687946).unwrap();
        assert_abs_diff_eq!(e.normalization_residual(), 0.0, epsilon = TOL);
        assert_abs_diff_eq!(e.normalization_jacobian(), 2.0 * e.coords(), epsilon = TOL);
    }

    #[test]
    fn rotation_matrix_is_orthonormal() {
        let e = EulerParameters::new(0.5, 0.5, 0.5, 0.5).unwrap();
        let r = e.rotation_matrix();
        assert_abs_diff_eq!(r * r.transpose(), nalgebra::Matrix3::identity(), epsilon = TOL);
        assert_abs_diff_eq!(r.determinant(), 1.0, epsilon = TOL);
    }

    #[test]
    fn g_matrix_reproduces_angular_velocity_by_finite_difference() {
        // d/dt R(e(t)) R(e)^T == skew(omega); check consistency at e = identity
        // with a small rotation rate about z.
        let e = EulerParameters::IDENTITY;
        let edot = [0.0, 0.0, 0.0, 0.1];
        let omega = e.angular_velocity(&edot);
        assert_abs_diff_eq!(omega, Vector3::new(0.0, 0.0, 0.2), epsilon = TOL);
    }
}
