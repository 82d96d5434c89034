use nalgebra::{DMatrix, DVector};

use crate::assembly::System;
use crate::rotation_param::RotationParam;
use crate::system::CData;

/// Euler-parameter velocity-level normalization residual `2·e·ė = 0`
/// (spec §4.2); zero for the other parameterizations.
fn ep_velocity_residual(rotation: &RotationParam, qdot_rot: &[f64]) -> f64 {
    match rotation {
        RotationParam::Ep(e) => 2.0 * (e.e0 * qdot_rot[0] + e.e1 * qdot_rot[1] + e.e2 * qdot_rot[2] + e.e3 * qdot_rot[3]),
        _ => 0.0,
    }
}

impl System {
    /// `ComputeMassMatrix` (spec §4.1/§4.4): scatters each body's local
    /// mass block into the global `nOde2 x nOde2` matrix at its LTG
    /// indices.
    pub fn compute_mass_matrix(&self, cdata: &CData) -> DMatrix<f64> {
        let mut m = DMatrix::zeros(self.n_ode2(), self.n_ode2());
        for (index, body) in self.bodies.iter().enumerate() {
            let ltg = self.body_ltg(index);
            let block = body.mass_matrix_block(&self.nodes, cdata);
            for (bi, &gi) in ltg.iter().enumerate() {
                for (bj, &gj) in ltg.iter().enumerate() {
                    m[(gi, gj)] += block[(bi, bj)];
                }
            }
        }
        m
    }

    /// `ComputeSystemODE2RHS` (spec §2/§4.4/§4.5): `f_app − f_int`
    /// assembled from body quadratic-velocity forces, penalty-connector
    /// forces and applied loads, all scattered via their markers' own
    /// `ltg_ode2`.
    pub fn compute_ode2_rhs(&self, cdata: &CData, t: f64) -> DVector<f64> {
        let mut f = DVector::zeros(self.n_ode2());

        for (index, body) in self.bodies.iter().enumerate() {
            let ltg = self.body_ltg(index);
            let block = body.quadratic_force_block(&self.nodes, cdata);
            for (bi, &gi) in ltg.iter().enumerate() {
                f[gi] -= block[bi];
            }
        }

        for connector in &self.connectors {
            let (m0_index, m1_index) = connector.marker_numbers();
            let m0 = self.compute_marker_data(m0_index, cdata);
            let m1 = self.compute_marker_data(m1_index, cdata);
            let local = connector.compute_ode2_lhs(&m0, &m1, t);
            if local.len() == 0 {
                continue;
            }
            for (k, &gi) in m0.ltg_ode2.iter().chain(m1.ltg_ode2.iter()).enumerate() {
                f[gi] += local[k];
            }
        }

        for (load_index, load) in self.loads.iter().enumerate() {
            let marker_data = self.compute_marker_data(load.marker(), cdata);
            let contribution = load.generalized_force(&marker_data, t, load_index);
            for (k, &gi) in marker_data.ltg_ode2.iter().enumerate() {
                f[gi] += contribution[k];
            }
        }

        f
    }

    /// `ComputeAlgebraicEquations` (spec §4.2/§4.5): Euler-parameter
    /// normalization rows (one per EP node, at the node's own AE offset)
    /// followed by each constraint connector's `g(q, t)` rows, at the
    /// connector's AE offset.
    pub fn compute_algebraic_equations(&self, cdata: &CData, t: f64, velocity_level: bool) -> DVector<f64> {
        let mut g = DVector::zeros(self.n_ae());

        for node in &self.nodes {
            let offsets = match node.offsets() {
                Some(o) if o.ae.len() == 1 => o,
                _ => continue,
            };
            let rotation = match node.rotation(cdata) {
                Some(r) => r,
                None => continue,
            };
            g[offsets.ae.start] = if velocity_level {
                ep_velocity_residual(&rotation, &node.rotation_velocity(cdata))
            } else {
                rotation.ae_residual().unwrap_or(0.0)
            };
        }

        for (index, connector) in self.connectors.iter().enumerate() {
            if !connector.is_constraint() {
                continue;
            }
            let (m0_index, m1_index) = connector.marker_numbers();
            let m0 = self.compute_marker_data(m0_index, cdata);
            let m1 = self.compute_marker_data(m1_index, cdata);
            let ae_range = self.connector_ae_range(index);
            let lambda: Vec<f64> = cdata.ae.rows(ae_range.start, ae_range.len()).iter().copied().collect();
            let local = connector.compute_algebraic_equations(&m0, &m1, t, velocity_level, &lambda);
            for (k, idx) in ae_range.enumerate() {
                g[idx] = local[k];
            }
        }

        g
    }
}
