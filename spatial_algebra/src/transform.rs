use crate::spatial_vector::{Acceleration, Force, Momentum, Velocity};
use linalg::skew;
use nalgebra::{Matrix6, Vector3, Vector6};
use rotations::RotationMatrix;
use serde::{Deserialize, Serialize};

/// A Plücker spatial transform from a "from" frame to a "to" frame:
/// `rotation` maps ordinary vectors from "from" into "to" coordinates,
/// `translation` is the position of the "to" frame's origin relative to
/// the "from" frame's origin, expressed in the "from" frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialTransform {
    rotation: RotationMatrix,
    translation: Vector3<f64>,
}

impl Default for SpatialTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl SpatialTransform {
    pub const IDENTITY: Self = Self {
        rotation: RotationMatrix::IDENTITY,
        translation: Vector3::new(0.0, 0.0, 0.0),
    };

    pub fn new(rotation: RotationMatrix, translation: Vector3<f64>) -> Self {
        Self { rotation, translation }
    }

    pub fn rotation(&self) -> &RotationMatrix {
        &self.rotation
    }

    pub fn translation(&self) -> &Vector3<f64> {
        &self.translation
    }

    fn motion_matrix(&self) -> Matrix6<f64> {
        let e = self.rotation.0;
        let sk = skew(&self.translation);
        let mut x = Matrix6::zeros();
        x.fixed_view_mut::<3, 3>(0, 0).copy_from(&e);
        x.fixed_view_mut::<3, 3>(3, 0).copy_from(&(-e * sk));
        x.fixed_view_mut::<3, 3>(3, 3).copy_from(&e);
        x
    }

    fn force_matrix(&self) -> Matrix6<f64> {
        let e = self.rotation.0;
        let sk = skew(&self.translation);
        let mut x = Matrix6::zeros();
        x.fixed_view_mut::<3, 3>(0, 0).copy_from(&e);
        x.fixed_view_mut::<3, 3>(0, 3).copy_from(&(-e * sk));
        x.fixed_view_mut::<3, 3>(3, 3).copy_from(&e);
        x
    }

    pub fn transform_velocity(&self, v: Velocity) -> Velocity {
        Velocity(self.motion_matrix() * v.0)
    }

    pub fn transform_acceleration(&self, a: Acceleration) -> Acceleration {
        Acceleration(self.motion_matrix() * a.0)
    }

    pub fn transform_force(&self, f: Force) -> Force {
        Force(self.force_matrix() * f.0)
    }

    pub fn transform_momentum(&self, h: Momentum) -> Momentum {
        Momentum(self.force_matrix() * h.0)
    }

    /// Congruence transform of a spatial inertia expressed in the "to"
    /// frame back into the "from" frame: `I_from = X^T I_to X`, the
    /// composite-rigid-body backward-pass step (spec §4.4 `KinematicTree`).
    pub fn congruence_transform_inertia(&self, inertia_in_to_frame: &crate::inertia::SpatialInertia) -> crate::inertia::SpatialInertia {
        let x = self.motion_matrix();
        crate::inertia::SpatialInertia(x.transpose() * inertia_in_to_frame.0 * x)
    }

    /// Inverse transform, swapping "from" and "to" frames.
    pub fn inv(&self) -> Self {
        let rotation = self.rotation.inv();
        let translation = -(self.rotation.0 * self.translation);
        Self { rotation, translation }
    }

    /// Composes `self` (B->C) after `rhs` (A->B), yielding A->C.
    pub fn mul(&self, rhs: &Self) -> Self {
        let rotation = self.rotation.mul(&rhs.rotation);
        let translation = rhs.translation + rhs.rotation.inv().transform(self.translation);
        Self { rotation, translation }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn inverse_composed_with_self_is_identity() {
        let t = SpatialTransform::new(RotationMatrix::new(nalgebra::Matrix3::new(
            0.0, -1.0, 0.0, //
            1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0,
        )), Vector3::new(1.0, 2.0, 3.0));
        let round_trip = t.inv().mul(&t);
        assert_abs_diff_eq!(round_trip.rotation.0, nalgebra::Matrix3::identity(), epsilon = 1e-10);
        assert_abs_diff_eq!(round_trip.translation, Vector3::zeros(), epsilon = 1e-10);
    }

    #[test]
    fn identity_transform_preserves_velocity() {
        let v = Velocity::from_parts(Vector3::new(0.1, 0.2, 0.3), Vector3::new(1.0, 2.0, 3.0));
        let out = SpatialTransform::IDENTITY.transform_velocity(v);
        assert_abs_diff_eq!(out.0, v.0, epsilon = 1e-12);
    }

    #[test]
    fn pure_translation_shifts_linear_part_by_transport_term() {
        let t = SpatialTransform::new(RotationMatrix::IDENTITY, Vector3::new(1.0, 0.0, 0.0));
        let omega = Vector3::new(0.0, 0.0, 1.0);
        let v = Velocity::from_parts(omega, Vector3::zeros());
        let out = t.transform_velocity(v);
        // A point fixed at the "to" origin, offset (1,0,0) from "from",
        // sees linear velocity omega x r = (0,0,1) x (1,0,0) = (0,1,0).
        assert_abs_diff_eq!(out.translation(), Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }
}
