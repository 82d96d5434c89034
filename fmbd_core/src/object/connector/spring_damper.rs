use crate::marker::MarkerData;
use crate::object::ConnectorObject;
use nalgebra::{DVector, Vector3};

/// Cartesian spring-damper penalty connector (spec §4.5): `f = K·Δ +
/// D·Δ̇ + offset`, scattered into both markers via `jacobian^T`.
#[derive(Debug, Clone)]
pub struct CartesianSpringDamper {
    pub marker0: usize,
    pub marker1: usize,
    pub stiffness: Vector3<f64>,
    pub damping: Vector3<f64>,
    pub reference_length: Vector3<f64>,
}

impl CartesianSpringDamper {
    pub fn new(marker0: usize, marker1: usize, stiffness: Vector3<f64>, damping: Vector3<f64>) -> Self {
        Self { marker0, marker1, stiffness, damping, reference_length: Vector3::zeros() }
    }
}

impl ConnectorObject for CartesianSpringDamper {
    fn marker_numbers(&self) -> (usize, usize) {
        (self.marker0, self.marker1)
    }

    fn compute_ode2_lhs(&self, m0: &MarkerData, m1: &MarkerData, _t: f64) -> DVector<f64> {
        let delta = m1.position - m0.position - self.reference_length;
        let delta_dot = m1.velocity - m0.velocity;
        let f = self.stiffness.component_mul(&delta) + self.damping.component_mul(&delta_dot);

        let q0 = m0.position_jacobian.transpose() * f;
        let q1 = -(m1.position_jacobian.transpose() * f);
        let mut out = DVector::zeros(q0.len() + q1.len());
        out.rows_mut(0, q0.len()).copy_from(&q0);
        out.rows_mut(q0.len(), q1.len()).copy_from(&q1);
        out
    }
}
