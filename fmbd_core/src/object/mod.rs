pub mod body;
pub mod connector;

use crate::marker::MarkerData;
use crate::node::Node;
use crate::system::CData;
use nalgebra::{DMatrix, DVector, Vector3};

/// The three object supertypes (spec §3 "Objects").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Body,
    Connector,
    Constraint,
}

/// "Has mass and internal force" (spec §9): provides mass-matrix
/// contribution, internal forces, and position/velocity queries at a
/// local point.
pub trait BodyObject: std::fmt::Debug + Send + Sync {
    fn node_indices(&self) -> Vec<usize>;

    fn n_ode2(&self, nodes: &[Node]) -> usize {
        self.node_indices().iter().map(|&i| nodes[i].n_coord(crate::coords::CoordinateKind::Ode2)).sum()
    }

    /// Local mass-matrix block in this body's own coordinate order.
    fn mass_matrix_block(&self, nodes: &[Node], cdata: &CData) -> DMatrix<f64>;

    /// Internal / quadratic-velocity force block `f_int`, same order as
    /// `mass_matrix_block`; the residual contributes `-f_int`.
    fn quadratic_force_block(&self, nodes: &[Node], cdata: &CData) -> DVector<f64>;

    /// Materializes `MarkerData` for a local point on this body (spec
    /// §4.3). `link` selects a sub-body for multi-link bodies
    /// (`KinematicTree`); ignored otherwise.
    fn marker_data(&self, local_position: Vector3<f64>, link: Option<usize>, nodes: &[Node], cdata: &CData) -> MarkerData;

    /// Mass-weighted body-force contribution for `MassProportional`
    /// loads (`integral of rho * position dV`, approximated here by the
    /// lumped total mass at the body's reference point).
    fn total_mass(&self) -> f64 {
        0.0
    }
}

/// "Takes markers and writes ODE2 forces or AE rows" (spec §9).
pub trait ConnectorObject: std::fmt::Debug + Send + Sync {
    fn marker_numbers(&self) -> (usize, usize);

    fn is_constraint(&self) -> bool {
        false
    }

    fn n_ae(&self) -> usize {
        0
    }

    /// Penalty connectors: returns the force to scatter into marker 0
    /// and marker 1's coordinates via `jacobian^T`.
    fn compute_ode2_lhs(&self, _m0: &MarkerData, _m1: &MarkerData, _t: f64) -> DVector<f64> {
        DVector::zeros(0)
    }

    /// Constraint connectors: the AE residual `g(q, t)`.
    fn compute_algebraic_equations(
        &self,
        _m0: &MarkerData,
        _m1: &MarkerData,
        _t: f64,
        _velocity_level: bool,
        _lambda: &[f64],
    ) -> DVector<f64> {
        DVector::zeros(0)
    }

    /// Post-Newton discontinuous check (spec §4.7); default: no
    /// discontinuous state, always consistent.
    fn post_newton_step(&mut self, _m0: &MarkerData, _m1: &MarkerData, _data: &mut [f64]) -> crate::discontinuous::PostNewtonResult {
        crate::discontinuous::PostNewtonResult::default()
    }

    fn n_data(&self) -> usize {
        0
    }
}
