use nalgebra::{DVector, Vector3};

use crate::marker::MarkerData;
use crate::user_function::UserFunctionSlot;

/// Applied loads (spec §3 "Loads"): scattered into the ODE2 residual at
/// a marker's `ltg_ode2` indices via its jacobians. `loadType` is the
/// item schema's discriminator key (spec §6). Every variant optionally
/// wraps its scalar/per-component base value in a user function `(t,
/// loadIndex, loadValue) -> value` (spec §3/§6); `#[serde(skip)]`
/// because a callback isn't part of the item schema's wire format.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "loadType")]
pub enum Load {
    /// Adds directly to one ODE2 coordinate's generalized force.
    Coordinate {
        marker: usize,
        value: f64,
        #[serde(skip)]
        user_function: UserFunctionSlot,
    },
    /// World-frame force at a marker, scattered via `position_jacobian^T`.
    ForceVector {
        marker: usize,
        force: Vector3<f64>,
        #[serde(skip)]
        user_function: UserFunctionSlot,
    },
    /// World-frame torque at a marker, scattered via `rotation_jacobian^T`.
    TorqueVector {
        marker: usize,
        torque: Vector3<f64>,
        #[serde(skip)]
        user_function: UserFunctionSlot,
    },
    /// Body-mass-weighted force (e.g. gravity) on a whole body, applied
    /// at its marker's position with `total_mass` scaling.
    MassProportional {
        marker: usize,
        body_total_mass: f64,
        acceleration: Vector3<f64>,
        #[serde(skip)]
        user_function: UserFunctionSlot,
    },
}

impl Load {
    pub fn marker(&self) -> usize {
        match self {
            Load::Coordinate { marker, .. }
            | Load::ForceVector { marker, .. }
            | Load::TorqueVector { marker, .. }
            | Load::MassProportional { marker, .. } => *marker,
        }
    }

    /// Generalized force contribution in the marker's own ODE2 order
    /// (same length and order as `marker_data.ltg_ode2`). `t` and
    /// `load_index` are forwarded to the attached user function, if
    /// any; each vector load resolves its user function once per
    /// component, with that component's own base value as `loadValue`.
    pub fn generalized_force(&self, marker_data: &MarkerData, t: f64, load_index: usize) -> DVector<f64> {
        match self {
            Load::Coordinate { value, user_function, .. } => {
                let value = user_function.resolve(t, load_index, *value);
                if marker_data.jacobian.nrows() == 0 {
                    DVector::zeros(marker_data.ltg_ode2.len())
                } else {
                    marker_data.jacobian.transpose() * DVector::from_element(marker_data.jacobian.nrows(), value)
                }
            }
            Load::ForceVector { force, user_function, .. } => {
                let force = resolve_vector(user_function, t, load_index, force);
                marker_data.position_jacobian.transpose() * force
            }
            Load::TorqueVector { torque, user_function, .. } => {
                let torque = resolve_vector(user_function, t, load_index, torque);
                marker_data.rotation_jacobian.transpose() * torque
            }
            Load::MassProportional { body_total_mass, acceleration, user_function, .. } => {
                let acceleration = resolve_vector(user_function, t, load_index, acceleration);
                marker_data.position_jacobian.transpose() * (*body_total_mass * acceleration)
            }
        }
    }
}

fn resolve_vector(user_function: &UserFunctionSlot, t: f64, load_index: usize, base: &Vector3<f64>) -> Vector3<f64> {
    Vector3::new(
        user_function.resolve(t, load_index, base.x),
        user_function.resolve(t, load_index, base.y),
        user_function.resolve(t, load_index, base.z),
    )
}
