use crate::rotation_matrix::RotationMatrix;
use crate::RotationTrait;
use nalgebra::{DMatrix, Matrix3, Matrix3xX, Vector3};
use serde::{Deserialize, Serialize};

/// Intrinsic Tait-Bryan angles about local x, y, z in that order
/// (`RigidBodyRxyz`, spec §3). `R = Rx(x) * Ry(y) * Rz(z)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TaitBryan {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl TaitBryan {
    pub const IDENTITY: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn angles(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl From<&TaitBryan> for RotationMatrix {
    fn from(a: &TaitBryan) -> Self {
        let (s1, c1) = a.x.sin_cos();
        let (s2, c2) = a.y.sin_cos();
        let (s3, c3) = a.z.sin_cos();
        let rx = Matrix3::new(1.0, 0.0, 0.0, 0.0, c1, -s1, 0.0, s1, c1);
        let ry = Matrix3::new(c2, 0.0, s2, 0.0, 1.0, 0.0, -s2, 0.0, c2);
        let rz = Matrix3::new(c3, -s3, 0.0, s3, c3, 0.0, 0.0, 0.0, 1.0);
        RotationMatrix::new(rx * ry * rz)
    }
}

impl RotationTrait for TaitBryan {
    fn n_rot_coord(&self) -> usize {
        3
    }

    fn rotation_matrix(&self) -> Matrix3<f64> {
        RotationMatrix::from(self).0
    }

    fn g(&self) -> Matrix3xX<f64> {
        let (s1, c1) = self.x.sin_cos();
        let (s2, c2) = self.y.sin_cos();
        #[rustfmt::skip]
        let g = Matrix3xX::from_row_slice(3, &[
            1.0, 0.0,    s2,
            0.0, c1, -s1 * c2,
            0.0, s1,  c1 * c2,
        ]);
        g
    }

    fn g_local(&self) -> Matrix3xX<f64> {
        let (s2, c2) = self.y.sin_cos();
        let (s3, c3) = self.z.sin_cos();
        #[rustfmt::skip]
        let g = Matrix3xX::from_row_slice(3, &[
            c2 * c3,  s3, 0.0,
            -c2 * s3, c3, 0.0,
            s2,       0.0, 1.0,
        ]);
        g
    }

    fn gt_v_q(&self, v: &Vector3<f64>) -> DMatrix<f64> {
        let (s1, c1) = self.x.sin_cos();
        let (s2, c2) = self.y.sin_cos();
        let (v0, v1, v2) = (v.x, v.y, v.z);
        let mut m = DMatrix::zeros(3, 3);
        m[(1, 0)] = -v1 * s1 + v2 * c1;
        m[(2, 0)] = -v1 * c1 * c2 - v2 * s1 * c2;
        m[(2, 1)] = v0 * c2 + v1 * s1 * s2 - v2 * c1 * s2;
        m
    }

    fn g_local_t_v_q(&self, v: &Vector3<f64>) -> DMatrix<f64> {
        let (s2, c2) = self.y.sin_cos();
        let (s3, c3) = self.z.sin_cos();
        let (v0, v1, v2) = (v.x, v.y, v.z);
        let mut m = DMatrix::zeros(3, 3);
        m[(0, 1)] = -v0 * s2 * c3 + v1 * s2 * s3 + v2 * c2;
        m[(0, 2)] = -v0 * c2 * s3 - v1 * c2 * c3;
        m[(1, 2)] = v0 * c3 - v1 * s3;
        m
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TOL: f64 = 1e-9;

    #[test]
    fn identity_is_identity_matrix() {
        let a = TaitBryan::IDENTITY;
        assert_abs_diff_eq!(a.rotation_matrix(), Matrix3::identity(), epsilon = TOL);
    }

    #[test]
    fn rotation_matrix_is_orthonormal() {
        let a = TaitBryan::new(0.3, -0.4, 1.1);
        let r = a.rotation_matrix();
        assert_abs_diff_eq!(r * r.transpose(), Matrix3::identity(), epsilon = TOL);
        assert_abs_diff_eq!(r.determinant(), 1.0, epsilon = TOL);
    }

    #[test]
    fn g_matches_finite_difference_of_rotation_matrix() {
        let a = TaitBryan::new(0.2, 0.35, -0.5);
        let h = 1e-6;
        for (k, axis) in [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
        ]
        .iter()
        .enumerate()
        {
            let mut qdot = [0.0; 3];
            qdot[k] = 1.0;
            let omega = a.angular_velocity(&qdot);

            let perturbed = TaitBryan::new(a.x + h * axis.x, a.y + h * axis.y, a.z + h * axis.z);
            let r0 = a.rotation_matrix();
            let r1 = perturbed.rotation_matrix();
            let rdot = (r1 - r0) / h;
            let omega_skew = rdot * r0.transpose();
            let omega_fd = linalg::skew::unskew(&omega_skew);
            assert_abs_diff_eq!(omega, omega_fd, epsilon = 1e-5);
        }
    }
}
