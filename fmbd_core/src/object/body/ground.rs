use crate::marker::MarkerData;
use crate::node::Node;
use crate::object::BodyObject;
use crate::system::CData;
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

/// No coordinates; mass matrix is empty. Provides a fixed reference
/// frame only (spec §4.4).
#[derive(Debug, Clone, Copy)]
pub struct Ground {
    pub reference_position: Vector3<f64>,
    pub reference_rotation: Matrix3<f64>,
}

impl Ground {
    pub fn new(reference_position: Vector3<f64>) -> Self {
        Self { reference_position, reference_rotation: Matrix3::identity() }
    }

    pub fn with_rotation(reference_position: Vector3<f64>, reference_rotation: Matrix3<f64>) -> Self {
        Self { reference_position, reference_rotation }
    }
}

impl BodyObject for Ground {
    fn node_indices(&self) -> Vec<usize> {
        Vec::new()
    }

    fn mass_matrix_block(&self, _nodes: &[Node], _cdata: &CData) -> DMatrix<f64> {
        DMatrix::zeros(0, 0)
    }

    fn quadratic_force_block(&self, _nodes: &[Node], _cdata: &CData) -> DVector<f64> {
        DVector::zeros(0)
    }

    fn marker_data(&self, local_position: Vector3<f64>, _link: Option<usize>, _nodes: &[Node], _cdata: &CData) -> MarkerData {
        MarkerData {
            position: self.reference_position + self.reference_rotation * local_position,
            velocity: Vector3::zeros(),
            velocity_available: true,
            orientation: self.reference_rotation,
            angular_velocity_local: Vector3::zeros(),
            position_jacobian: DMatrix::zeros(3, 0),
            rotation_jacobian: DMatrix::zeros(3, 0),
            jacobian: DMatrix::zeros(0, 0),
            vector_value: DVector::zeros(0),
            vector_value_t: DVector::zeros(0),
            ltg_ode2: Vec::new(),
        }
    }
}
