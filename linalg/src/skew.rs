use nalgebra::{Matrix3, Vector3};

/// Skew-symmetric ("cross product") matrix of `v`, such that
/// `skew(v) * w == v.cross(&w)` for any `w`.
pub fn skew(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(
        0.0, -v.z, v.y, //
        v.z, 0.0, -v.x, //
        -v.y, v.x, 0.0,
    )
}

/// Inverse of [`skew`]: extracts the axial vector of a (near-)skew matrix.
pub fn unskew(m: &Matrix3<f64>) -> Vector3<f64> {
    Vector3::new(m[(2, 1)], m[(0, 2)], m[(1, 0)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn skew_unskew_round_trip() {
        let v = Vector3::new(0.3, -1.1, 2.7);
        assert_abs_diff_eq!(unskew(&skew(&v)), v, epsilon = 1e-14);
    }

    #[test]
    fn skew_is_antisymmetric() {
        let v = Vector3::new(1.0, -2.0, 0.5);
        let m = skew(&v);
        assert_abs_diff_eq!(m + m.transpose(), Matrix3::zeros(), epsilon = 1e-14);
    }
}
