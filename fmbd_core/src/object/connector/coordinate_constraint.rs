use crate::marker::MarkerData;
use crate::object::ConnectorObject;
use nalgebra::DVector;

/// Enforces `marker0.coordinate - marker1.coordinate == offset` via a
/// single Lagrange multiplier (spec §4.5).
#[derive(Debug, Clone)]
pub struct CoordinateConstraint {
    pub marker0: usize,
    pub marker1: usize,
    pub offset: f64,
    pub active: bool,
}

impl CoordinateConstraint {
    pub fn new(marker0: usize, marker1: usize, offset: f64) -> Self {
        Self { marker0, marker1, offset, active: true }
    }
}

impl ConnectorObject for CoordinateConstraint {
    fn marker_numbers(&self) -> (usize, usize) {
        (self.marker0, self.marker1)
    }

    fn is_constraint(&self) -> bool {
        true
    }

    fn n_ae(&self) -> usize {
        1
    }

    fn compute_algebraic_equations(&self, m0: &MarkerData, m1: &MarkerData, _t: f64, velocity_level: bool, lambda: &[f64]) -> DVector<f64> {
        let mut g = DVector::zeros(1);
        if !self.active {
            g[0] = lambda[0];
            return g;
        }
        g[0] = if velocity_level {
            m0.vector_value_t[0] - m1.vector_value_t[0]
        } else {
            m0.vector_value[0] - m1.vector_value[0] - self.offset
        };
        g
    }
}
