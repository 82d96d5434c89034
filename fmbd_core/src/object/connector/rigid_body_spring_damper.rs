use crate::marker::MarkerData;
use crate::object::ConnectorObject;
use nalgebra::{DVector, Vector3};
use rotations::{RotationMatrix, RotationVector};

/// 6-DOF rigid-body spring-damper penalty connector (spec §4.5): like
/// `CartesianSpringDamper`, but also couples the relative orientation
/// between two rigid markers through a rotational stiffness/damping
/// term. Both markers must be `requires_rigid()` (`NodeRigid`/
/// `BodyRigid`/`KinematicTreeLink`) so `orientation`/`angular_velocity_local`/
/// `rotation_jacobian` are populated.
#[derive(Debug, Clone)]
pub struct RigidBodySpringDamper {
    pub marker0: usize,
    pub marker1: usize,
    pub stiffness: Vector3<f64>,
    pub damping: Vector3<f64>,
    pub rotation_stiffness: Vector3<f64>,
    pub rotation_damping: Vector3<f64>,
    pub reference_length: Vector3<f64>,
}

impl RigidBodySpringDamper {
    pub fn new(
        marker0: usize,
        marker1: usize,
        stiffness: Vector3<f64>,
        damping: Vector3<f64>,
        rotation_stiffness: Vector3<f64>,
        rotation_damping: Vector3<f64>,
    ) -> Self {
        Self { marker0, marker1, stiffness, damping, rotation_stiffness, rotation_damping, reference_length: Vector3::zeros() }
    }
}

impl ConnectorObject for RigidBodySpringDamper {
    fn marker_numbers(&self) -> (usize, usize) {
        (self.marker0, self.marker1)
    }

    fn compute_ode2_lhs(&self, m0: &MarkerData, m1: &MarkerData, _t: f64) -> DVector<f64> {
        let delta = m1.position - m0.position - self.reference_length;
        let delta_dot = m1.velocity - m0.velocity;
        let f = self.stiffness.component_mul(&delta) + self.damping.component_mul(&delta_dot);

        // Relative orientation expressed in marker0's frame, reduced to a
        // rotation vector (spec §4.5 worked example). omega error likewise
        // transported into marker0's local frame before combining.
        let relative_rotation = m0.orientation.transpose() * m1.orientation;
        let theta_error = RotationVector::log(&RotationMatrix::new(relative_rotation)).theta;

        let omega0_world = m0.orientation * m0.angular_velocity_local;
        let omega1_world = m1.orientation * m1.angular_velocity_local;
        let omega_error_local0 = m0.orientation.transpose() * (omega1_world - omega0_world);

        let torque_local0 = self.rotation_stiffness.component_mul(&theta_error) + self.rotation_damping.component_mul(&omega_error_local0);
        let torque_world = m0.orientation * torque_local0;

        let q0 = m0.position_jacobian.transpose() * f + m0.rotation_jacobian.transpose() * torque_world;
        let q1 = -(m1.position_jacobian.transpose() * f + m1.rotation_jacobian.transpose() * torque_world);
        let mut out = DVector::zeros(q0.len() + q1.len());
        out.rows_mut(0, q0.len()).copy_from(&q0);
        out.rows_mut(q0.len(), q1.len()).copy_from(&q1);
        out
    }
}
