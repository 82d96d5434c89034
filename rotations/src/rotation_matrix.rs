use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// A bare `SO(3)` rotation matrix — the common currency every
/// parameterization can be converted to and from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotationMatrix(pub Matrix3<f64>);

impl Default for RotationMatrix {
    fn default() -> Self {
        Self(Matrix3::identity())
    }
}

impl RotationMatrix {
    pub const IDENTITY: Self = Self(Matrix3::new(
        1.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, //
        0.0, 0.0, 1.0,
    ));

    pub fn new(m: Matrix3<f64>) -> Self {
        Self(m)
    }

    pub fn transform(&self, v: Vector3<f64>) -> Vector3<f64> {
        self.0 * v
    }

    pub fn inv(&self) -> Self {
        // SO(3): inverse is transpose.
        Self(self.0.transpose())
    }

    pub fn mul(&self, rhs: &Self) -> Self {
        Self(self.0 * rhs.0)
    }
}

impl std::ops::Mul for RotationMatrix {
    type Output = RotationMatrix;
    fn mul(self, rhs: RotationMatrix) -> RotationMatrix {
        self.mul(&rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const TOL: f64 = 1e-12;

    #[test]
    fn inverse_is_transpose_and_orthonormal() {
        let r = RotationMatrix::IDENTITY;
        let rt = r.inv();
        assert_abs_diff_eq!((r.mul(&rt)).0, Matrix3::identity(), epsilon = TOL);
    }
}
