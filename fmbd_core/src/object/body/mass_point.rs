use crate::marker::MarkerData;
use crate::node::Node;
use crate::object::BodyObject;
use crate::system::CData;
use nalgebra::{DMatrix, DVector, Vector3};

/// Diagonal `m*I` mass, zero internal force (spec §4.4).
#[derive(Debug, Clone, Copy)]
pub struct MassPoint {
    pub node: usize,
    pub mass: f64,
}

impl MassPoint {
    pub fn new(node: usize, mass: f64) -> Self {
        Self { node, mass }
    }
}

impl BodyObject for MassPoint {
    fn node_indices(&self) -> Vec<usize> {
        vec![self.node]
    }

    fn mass_matrix_block(&self, _nodes: &[Node], _cdata: &CData) -> DMatrix<f64> {
        DMatrix::identity(3, 3) * self.mass
    }

    fn quadratic_force_block(&self, _nodes: &[Node], _cdata: &CData) -> DVector<f64> {
        DVector::zeros(3)
    }

    fn marker_data(&self, local_position: Vector3<f64>, _link: Option<usize>, nodes: &[Node], cdata: &CData) -> MarkerData {
        let node = &nodes[self.node];
        let offsets = node.offsets().cloned().unwrap_or_default();
        MarkerData {
            position: node.position(cdata) + local_position,
            velocity: node.velocity(cdata),
            velocity_available: true,
            orientation: nalgebra::Matrix3::identity(),
            angular_velocity_local: Vector3::zeros(),
            position_jacobian: DMatrix::identity(3, 3),
            rotation_jacobian: DMatrix::zeros(3, 3),
            jacobian: DMatrix::zeros(0, 0),
            vector_value: DVector::zeros(0),
            vector_value_t: DVector::zeros(0),
            ltg_ode2: offsets.ode2.clone().collect(),
        }
    }

    fn total_mass(&self) -> f64 {
        self.mass
    }
}
