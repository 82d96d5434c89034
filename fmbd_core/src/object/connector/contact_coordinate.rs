use crate::discontinuous::PostNewtonResult;
use crate::marker::MarkerData;
use crate::object::ConnectorObject;
use nalgebra::DVector;

/// Penalty contact along a coordinate gap (spec §4.5 "Contact
/// connectors"). Data layout: `[0] = active (0/1), [1] = gap sign at
/// start of step, [2] = friction tangent reference`.
#[derive(Debug, Clone)]
pub struct ContactCoordinate {
    pub marker0: usize,
    pub marker1: usize,
    pub contact_stiffness: f64,
    pub contact_damping: f64,
    pub friction_coefficient: f64,
}

impl ContactCoordinate {
    pub fn new(marker0: usize, marker1: usize, contact_stiffness: f64, contact_damping: f64, friction_coefficient: f64) -> Self {
        Self { marker0, marker1, contact_stiffness, contact_damping, friction_coefficient }
    }

    fn gap(&self, m0: &MarkerData, m1: &MarkerData) -> f64 {
        m1.vector_value[0] - m0.vector_value[0]
    }

    fn gap_rate(&self, m0: &MarkerData, m1: &MarkerData) -> f64 {
        m1.vector_value_t[0] - m0.vector_value_t[0]
    }
}

impl ConnectorObject for ContactCoordinate {
    fn marker_numbers(&self) -> (usize, usize) {
        (self.marker0, self.marker1)
    }

    fn n_data(&self) -> usize {
        3
    }

    fn compute_ode2_lhs(&self, m0: &MarkerData, m1: &MarkerData, _t: f64) -> DVector<f64> {
        let gap = self.gap(m0, m1);
        let mut out = DVector::zeros(2);
        if gap >= 0.0 {
            return out;
        }
        let gap_rate = self.gap_rate(m0, m1);
        let normal_force = -self.contact_stiffness * gap - self.contact_damping * gap_rate;
        out[0] = normal_force;
        out[1] = -normal_force;
        out
    }

    /// Resets the friction tangent reference only on a gap-sign flip
    /// within this same contact's own data coordinate — a jump from an
    /// adjacent segment's contact is a distinct connector and always
    /// starts with a fresh reference, since each connector owns its own
    /// `data` slice.
    fn post_newton_step(&mut self, m0: &MarkerData, m1: &MarkerData, data: &mut [f64]) -> PostNewtonResult {
        let gap = self.gap(m0, m1);
        let was_active = data[0] > 0.5;
        let is_active = gap < 0.0;
        let previous_sign = data[1];
        let current_sign = if gap >= 0.0 { 1.0 } else { -1.0 };

        if was_active != is_active {
            data[0] = if is_active { 1.0 } else { 0.0 };
        }

        if previous_sign != 0.0 && current_sign != previous_sign {
            data[2] = 0.0;
            data[1] = current_sign;
            let error = (self.contact_stiffness * gap).abs();
            return PostNewtonResult::flipped(error, None);
        }
        data[1] = current_sign;
        PostNewtonResult::consistent()
    }
}
