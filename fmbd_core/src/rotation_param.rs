use nalgebra::{DMatrix, Matrix3, Matrix3xX, Vector3};
use rotations::{EulerParameters, RotationTrait, RotationVector, TaitBryan};
use serde::{Deserialize, Serialize};

/// Tagged dispatch over the three rigid-body rotation parameterizations
/// (spec §9: "bodies and markers never hard-code EP or rotation-vector;
/// they call through a small set of five primitives").
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RotationParam {
    Ep(EulerParameters),
    Rxyz(TaitBryan),
    RotVec(RotationVector),
}

impl RotationParam {
    pub fn identity_ep() -> Self {
        RotationParam::Ep(EulerParameters::IDENTITY)
    }

    pub fn identity_rxyz() -> Self {
        RotationParam::Rxyz(TaitBryan::IDENTITY)
    }

    pub fn identity_rot_vec() -> Self {
        RotationParam::RotVec(RotationVector::IDENTITY)
    }

    /// Number of ODE2 rotation coordinates this parameterization
    /// contributes. `RotVec`'s persistent orientation lives in Data (see
    /// `is_lie_group_data`), but it still owns 3 ODE2 rotation slots
    /// whose velocity half carries the body-frame rate `omega_bar` used
    /// by the generic `G_local` marker/mass-matrix machinery — the
    /// position half is never read (original source's
    /// `CNodeRigidBodyRotVecDataLG::GetAngularVelocityLocal` reads
    /// `omegaBar` straight off this ODE2-velocity range).
    pub fn n_ode2_rot_coord(&self) -> usize {
        match self {
            RotationParam::Ep(_) => 4,
            RotationParam::Rxyz(_) => 3,
            RotationParam::RotVec(_) => 3,
        }
    }

    /// `RotVec` stores its persistent rotation-vector value as Data
    /// (spec §3) and advances it by Lie-group composition
    /// (`System::advance_lie_group_data`) rather than through the
    /// generic ODE2 Newton path.
    pub fn is_lie_group_data(&self) -> bool {
        matches!(self, RotationParam::RotVec(_))
    }

    pub fn n_ae(&self) -> usize {
        match self {
            RotationParam::Ep(_) => 1,
            _ => 0,
        }
    }

    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        match self {
            RotationParam::Ep(e) => e.rotation_matrix(),
            RotationParam::Rxyz(a) => a.rotation_matrix(),
            RotationParam::RotVec(r) => r.rotation_matrix(),
        }
    }

    pub fn g(&self) -> Matrix3xX<f64> {
        match self {
            RotationParam::Ep(e) => e.g(),
            RotationParam::Rxyz(a) => a.g(),
            RotationParam::RotVec(r) => r.g(),
        }
    }

    pub fn g_local(&self) -> Matrix3xX<f64> {
        match self {
            RotationParam::Ep(e) => e.g_local(),
            RotationParam::Rxyz(a) => a.g_local(),
            RotationParam::RotVec(r) => r.g_local(),
        }
    }

    pub fn gt_v_q(&self, v: &Vector3<f64>) -> DMatrix<f64> {
        match self {
            RotationParam::Ep(e) => e.gt_v_q(v),
            RotationParam::Rxyz(a) => a.gt_v_q(v),
            RotationParam::RotVec(r) => r.gt_v_q(v),
        }
    }

    pub fn g_local_t_v_q(&self, v: &Vector3<f64>) -> DMatrix<f64> {
        match self {
            RotationParam::Ep(e) => e.g_local_t_v_q(v),
            RotationParam::Rxyz(a) => a.g_local_t_v_q(v),
            RotationParam::RotVec(r) => r.g_local_t_v_q(v),
        }
    }

    pub fn angular_velocity(&self, qdot_rot: &[f64]) -> Vector3<f64> {
        match self {
            RotationParam::Ep(e) => e.angular_velocity(qdot_rot),
            RotationParam::Rxyz(a) => a.angular_velocity(qdot_rot),
            RotationParam::RotVec(r) => r.angular_velocity(qdot_rot),
        }
    }

    pub fn angular_velocity_local(&self, qdot_rot: &[f64]) -> Vector3<f64> {
        match self {
            RotationParam::Ep(e) => e.angular_velocity_local(qdot_rot),
            RotationParam::Rxyz(a) => a.angular_velocity_local(qdot_rot),
            RotationParam::RotVec(r) => r.angular_velocity_local(qdot_rot),
        }
    }

    /// Time derivative of `G(q)` along `qdot_rot`, by central difference
    /// on the rotation coordinates — the last quadratic-velocity term
    /// in the `RigidBody` mass-matrix residual vanishes identically for
    /// EP (spec §4.4) and is not exercised for the Lie-group `RotVec`
    /// node (its rotation isn't a differentiated ODE2 coordinate).
    pub fn g_dot(&self, qdot_rot: &[f64]) -> Matrix3xX<f64> {
        match self {
            RotationParam::Ep(_) => Matrix3xX::zeros(4),
            RotationParam::Rxyz(a) => {
                let h = 1e-6;
                let plus = TaitBryan::new(a.x + h * qdot_rot[0], a.y + h * qdot_rot[1], a.z + h * qdot_rot[2]);
                let minus = TaitBryan::new(a.x - h * qdot_rot[0], a.y - h * qdot_rot[1], a.z - h * qdot_rot[2]);
                (plus.g() - minus.g()) / (2.0 * h)
            }
            RotationParam::RotVec(_) => Matrix3xX::zeros(3),
        }
    }

    /// Euler-parameter normalization residual `e^T e - 1` (spec §4.2);
    /// zero (no AE row) for the other parameterizations.
    pub fn ae_residual(&self) -> Option<f64> {
        match self {
            RotationParam::Ep(e) => Some(e.normalization_residual()),
            _ => None,
        }
    }

    /// AE Jacobian row `d(e^T e - 1)/de = [2e0, 2e1, 2e2, 2e3]`.
    pub fn ae_jacobian_row(&self) -> Option<nalgebra::Vector4<f64>> {
        match self {
            RotationParam::Ep(e) => Some(e.normalization_jacobian()),
            _ => None,
        }
    }
}
