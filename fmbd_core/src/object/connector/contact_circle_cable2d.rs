use crate::discontinuous::PostNewtonResult;
use crate::marker::MarkerData;
use crate::object::ConnectorObject;
use nalgebra::DVector;

/// Penalty contact between a fixed circular obstacle and a point on an
/// ANCF cable centerline (spec §4.5 "Contact connectors"). `marker0`
/// is a `BodyCable2DShape` point, `marker1` the circle center. Data
/// layout: `[0] = active (0/1), [1] = gap sign at start of step`.
#[derive(Debug, Clone)]
pub struct ContactCircleCable2D {
    pub marker0: usize,
    pub marker1: usize,
    pub circle_radius: f64,
    pub cable_radius: f64,
    pub contact_stiffness: f64,
    pub contact_damping: f64,
}

impl ContactCircleCable2D {
    pub fn new(marker0: usize, marker1: usize, circle_radius: f64, cable_radius: f64, contact_stiffness: f64, contact_damping: f64) -> Self {
        Self { marker0, marker1, circle_radius, cable_radius, contact_stiffness, contact_damping }
    }

    fn gap_and_normal(&self, m0: &MarkerData, m1: &MarkerData) -> (f64, nalgebra::Vector3<f64>) {
        let delta = m0.position - m1.position;
        let dist = delta.norm().max(1e-12);
        let normal = delta / dist;
        (dist - self.circle_radius - self.cable_radius, normal)
    }
}

impl ConnectorObject for ContactCircleCable2D {
    fn marker_numbers(&self) -> (usize, usize) {
        (self.marker0, self.marker1)
    }

    fn n_data(&self) -> usize {
        2
    }

    fn compute_ode2_lhs(&self, m0: &MarkerData, m1: &MarkerData, _t: f64) -> DVector<f64> {
        let n0 = m0.position_jacobian.ncols();
        let n1 = m1.position_jacobian.ncols();
        let mut out = DVector::zeros(n0 + n1);
        let (gap, normal) = self.gap_and_normal(m0, m1);
        if gap >= 0.0 {
            return out;
        }
        let gap_rate = (m0.velocity - m1.velocity).dot(&normal);
        let force_mag = -self.contact_stiffness * gap - self.contact_damping * gap_rate;
        let force = normal * force_mag;
        let q0 = m0.position_jacobian.transpose() * force;
        let q1 = -(m1.position_jacobian.transpose() * force);
        out.rows_mut(0, n0).copy_from(&q0);
        out.rows_mut(n0, n1).copy_from(&q1);
        out
    }

    fn post_newton_step(&mut self, m0: &MarkerData, m1: &MarkerData, data: &mut [f64]) -> PostNewtonResult {
        let (gap, _) = self.gap_and_normal(m0, m1);
        let was_active = data[0] > 0.5;
        let is_active = gap < 0.0;
        let previous_sign = data[1];
        let current_sign = if gap >= 0.0 { 1.0 } else { -1.0 };

        if was_active != is_active {
            data[0] = if is_active { 1.0 } else { 0.0 };
        }
        if previous_sign != 0.0 && current_sign != previous_sign {
            data[1] = current_sign;
            let error = (self.contact_stiffness * gap).abs();
            return PostNewtonResult::flipped(error, None);
        }
        data[1] = current_sign;
        PostNewtonResult::consistent()
    }
}
