//! Rotation parameterizations shared by every rigid-body node.
//!
//! Bodies and markers never hard-code a parameterization; they call
//! through the five primitives on [`RotationTrait`]. Adding a new
//! parameterization means filling those five methods plus the
//! initial-condition composition rule on the owning node.

pub mod euler_parameters;
pub mod rotation_matrix;
pub mod rotation_vector;
pub mod tait_bryan;

pub use euler_parameters::EulerParameters;
pub use rotation_matrix::RotationMatrix;
pub use rotation_vector::RotationVector;
pub use tait_bryan::TaitBryan;

use nalgebra::{DMatrix, Matrix3xX, Vector3};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error)]
pub enum RotationError {
    #[error("got zero-magnitude quaternion")]
    ZeroMagnitudeQuaternion,
    #[error("rotation vector exceeds the +/- pi branch cut used for log(SO(3))")]
    RotationVectorOutOfBranch,
}

/// The five primitives a rigid-body node supplies so generic connector and
/// body code never needs to know which rotation coordinates it is driving.
pub trait RotationTrait {
    /// Number of rotation coordinates this parameterization owns (4 for
    /// Euler parameters, 3 otherwise).
    fn n_rot_coord(&self) -> usize;

    fn rotation_matrix(&self) -> nalgebra::Matrix3<f64>;

    /// World-frame angular velocity `omega = G * qdot_rot`.
    fn angular_velocity(&self, qdot_rot: &[f64]) -> Vector3<f64> {
        &self.g() * nalgebra::DVector::from_row_slice(qdot_rot)
    }

    /// Body-frame angular velocity `omega_local = G_local * qdot_rot`.
    fn angular_velocity_local(&self, qdot_rot: &[f64]) -> Vector3<f64> {
        &self.g_local() * nalgebra::DVector::from_row_slice(qdot_rot)
    }

    /// `3 x nRotCoord` map from rotation-parameter velocities to world
    /// angular velocity.
    fn g(&self) -> Matrix3xX<f64>;

    /// `3 x nRotCoord` map from rotation-parameter velocities to
    /// body-frame angular velocity.
    fn g_local(&self) -> Matrix3xX<f64>;

    /// Derivative of `G^T v` with respect to the rotation coordinates,
    /// `nRotCoord x nRotCoord`. Required by connector Jacobians (spec
    /// §4.2); zero for parameterizations where `G` is coordinate-
    /// independent of the relevant order.
    fn gt_v_q(&self, v: &Vector3<f64>) -> DMatrix<f64>;

    /// Derivative of `G_local^T v` with respect to the rotation
    /// coordinates.
    fn g_local_t_v_q(&self, v: &Vector3<f64>) -> DMatrix<f64>;
}
