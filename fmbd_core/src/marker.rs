use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

/// Snapshot of kinematics at a marker, the single abstraction connectors
/// are written against (spec §4.3).
#[derive(Debug, Clone)]
pub struct MarkerData {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub velocity_available: bool,
    pub orientation: Matrix3<f64>,
    pub angular_velocity_local: Vector3<f64>,
    /// `3 x nCoords`: `d position / d qdot`, columns in `ltg_ode2` order.
    pub position_jacobian: DMatrix<f64>,
    /// `3 x nCoords`: `d omega / d qdot` (world frame), same column order.
    pub rotation_jacobian: DMatrix<f64>,
    /// Generic `k x nCoords` pick matrix for coordinate markers.
    pub jacobian: DMatrix<f64>,
    pub vector_value: DVector<f64>,
    pub vector_value_t: DVector<f64>,
    /// Global ODE2 indices the jacobian columns map onto.
    pub ltg_ode2: Vec<usize>,
}

impl MarkerData {
    pub fn empty() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            velocity_available: false,
            orientation: Matrix3::identity(),
            angular_velocity_local: Vector3::zeros(),
            position_jacobian: DMatrix::zeros(3, 0),
            rotation_jacobian: DMatrix::zeros(3, 0),
            jacobian: DMatrix::zeros(0, 0),
            vector_value: DVector::zeros(0),
            vector_value_t: DVector::zeros(0),
            ltg_ode2: Vec::new(),
        }
    }

    /// Composes a body-local point's kinematics with the body marker's
    /// local offset: `r = r_node + R p_loc`, `v = v_node + omega x (R
    /// p_loc)` (spec §4.3).
    pub fn at_local_offset(node_data: &MarkerData, local_position: Vector3<f64>) -> Self {
        let world_offset = node_data.orientation * local_position;
        let omega_world = node_data.orientation * node_data.angular_velocity_local;
        Self {
            position: node_data.position + world_offset,
            velocity: node_data.velocity + omega_world.cross(&world_offset),
            velocity_available: node_data.velocity_available,
            orientation: node_data.orientation,
            angular_velocity_local: node_data.angular_velocity_local,
            position_jacobian: node_data.position_jacobian.clone(),
            rotation_jacobian: node_data.rotation_jacobian.clone(),
            jacobian: node_data.jacobian.clone(),
            vector_value: node_data.vector_value.clone(),
            vector_value_t: node_data.vector_value_t.clone(),
            ltg_ode2: node_data.ltg_ode2.clone(),
        }
    }
}

/// Typed marker kinds (spec §3 "Markers"). `markerType` is the item
/// schema's discriminator key (spec §6).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(tag = "markerType")]
pub enum Marker {
    NodePosition { node: usize },
    NodeRigid { node: usize },
    NodeCoordinate { node: usize, coordinate: usize },
    BodyPosition { body: usize, local_position: Vector3<f64> },
    BodyRigid { body: usize, local_position: Vector3<f64> },
    BodyMass { body: usize },
    BodyCable2DShape { body: usize, axial_parameter: f64 },
    BodyCable2DCoordinates { body: usize },
    KinematicTreeLink { body: usize, link: usize, local_position: Vector3<f64> },
}

impl Marker {
    pub fn body_or_node_index(&self) -> usize {
        match self {
            Marker::NodePosition { node } | Marker::NodeRigid { node } | Marker::NodeCoordinate { node, .. } => *node,
            Marker::BodyPosition { body, .. }
            | Marker::BodyRigid { body, .. }
            | Marker::BodyMass { body }
            | Marker::BodyCable2DShape { body, .. }
            | Marker::BodyCable2DCoordinates { body }
            | Marker::KinematicTreeLink { body, .. } => *body,
        }
    }

    /// Whether this marker requires the rigid-orientation capability
    /// (used by `CheckSystemIntegrity`, spec §3 invariant 2).
    pub fn requires_rigid(&self) -> bool {
        matches!(self, Marker::NodeRigid { .. } | Marker::BodyRigid { .. } | Marker::KinematicTreeLink { .. })
    }
}
