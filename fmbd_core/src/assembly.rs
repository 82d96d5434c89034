use std::ops::Range;

use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

use crate::coords::{CoordinateKind, NodeOffsets};
use crate::error::{FmbdError, FmbdResult};
use crate::load::Load;
use crate::marker::{Marker, MarkerData};
use crate::node::{Node, RotationKind};
use crate::object::{BodyObject, ConnectorObject};
use crate::sensor::Sensor;
use crate::system::{CData, SystemData};
use rotations::RotationVector;

/// Owns the full typed graph plus the assembled coordinate layout (spec
/// §3 "Objects" / §4.1 "System Data & Assembly"). The four assembly
/// steps run once, at construction; every solver step thereafter only
/// reads `data` and the per-object LTG bookkeeping built here.
pub struct System {
    pub nodes: Vec<Node>,
    pub bodies: Vec<Box<dyn BodyObject>>,
    pub connectors: Vec<Box<dyn ConnectorObject>>,
    pub markers: Vec<Marker>,
    pub loads: Vec<Load>,
    pub sensors: Vec<Sensor>,
    pub data: SystemData,

    /// Per body: global ODE2 indices in the body's own local coordinate
    /// order (concatenation over `node_indices()`), spec §4.1 "AssembleLTGLists".
    body_node_ltg: Vec<Vec<usize>>,
    /// Per constraint connector: its slice of the global AE vector.
    connector_ae_offset: Vec<Range<usize>>,
    /// Per connector: its slice of the global Data vector (discontinuous
    /// state), continuing after node-owned Data ranges.
    connector_data_offset: Vec<Range<usize>>,

    n_ode2: usize,
    n_ode1: usize,
    n_ae: usize,
    n_data: usize,
}

impl System {
    /// Runs all four assembly steps in the order the solver calls them
    /// once at system construction (spec §2): `AssembleCoordinates`,
    /// `AssembleLTGLists`, `CheckSystemIntegrity`,
    /// `AssembleInitializeSystemCoordinates`.
    pub fn assemble(
        nodes: Vec<Node>,
        bodies: Vec<Box<dyn BodyObject>>,
        connectors: Vec<Box<dyn ConnectorObject>>,
        markers: Vec<Marker>,
        loads: Vec<Load>,
        sensors: Vec<Sensor>,
    ) -> FmbdResult<Self> {
        let mut system = Self {
            nodes,
            bodies,
            connectors,
            markers,
            loads,
            sensors,
            data: SystemData::default(),
            body_node_ltg: Vec::new(),
            connector_ae_offset: Vec::new(),
            connector_data_offset: Vec::new(),
            n_ode2: 0,
            n_ode1: 0,
            n_ae: 0,
            n_data: 0,
        };
        system.assemble_coordinates();
        system.assemble_ltg_lists();
        system.check_system_integrity()?;
        system.assemble_initialize_system_coordinates();
        Ok(system)
    }

    pub fn n_ode2(&self) -> usize {
        self.n_ode2
    }

    pub fn n_ode1(&self) -> usize {
        self.n_ode1
    }

    pub fn n_ae(&self) -> usize {
        self.n_ae
    }

    pub fn n_data(&self) -> usize {
        self.n_data
    }

    pub fn connector_ae_range(&self, connector_index: usize) -> Range<usize> {
        self.connector_ae_offset[connector_index].clone()
    }

    pub fn connector_data_range(&self, connector_index: usize) -> Range<usize> {
        self.connector_data_offset[connector_index].clone()
    }

    pub fn body_ltg(&self, body_index: usize) -> &[usize] {
        &self.body_node_ltg[body_index]
    }

    /// `AssembleCoordinates` (spec §4.1): walks nodes in insertion order
    /// assigning contiguous offsets, then appends AE/Data rows owned by
    /// constraint connectors (Euler-parameter-node AE rows are assigned
    /// above, as part of the node's own offsets).
    fn assemble_coordinates(&mut self) {
        let mut ode2 = 0;
        let mut ode1 = 0;
        let mut ae = 0;
        let mut data = 0;
        for node in &mut self.nodes {
            let n_ode2 = node.n_coord(CoordinateKind::Ode2);
            let n_ode1 = node.n_coord(CoordinateKind::Ode1);
            let n_ae = node.n_coord(CoordinateKind::Ae);
            let n_data = node.n_coord(CoordinateKind::Data);
            node.set_offsets(NodeOffsets {
                ode2: ode2..ode2 + n_ode2,
                ode1: ode1..ode1 + n_ode1,
                ae: ae..ae + n_ae,
                data: data..data + n_data,
            });
            ode2 += n_ode2;
            ode1 += n_ode1;
            ae += n_ae;
            data += n_data;
        }
        self.n_ode2 = ode2;
        self.n_ode1 = ode1;

        self.connector_ae_offset = Vec::with_capacity(self.connectors.len());
        self.connector_data_offset = Vec::with_capacity(self.connectors.len());
        for connector in &self.connectors {
            let n_ae = connector.n_ae();
            self.connector_ae_offset.push(ae..ae + n_ae);
            ae += n_ae;
            let n_data = connector.n_data();
            self.connector_data_offset.push(data..data + n_data);
            data += n_data;
        }
        self.n_ae = ae;
        self.n_data = data;
    }

    /// `AssembleLTGLists` (spec §4.1): for each body, the global ODE2
    /// indices in the body's own local coordinate order.
    fn assemble_ltg_lists(&mut self) {
        let nodes = &self.nodes;
        self.body_node_ltg = self
            .bodies
            .iter()
            .map(|body| {
                body.node_indices()
                    .iter()
                    .flat_map(|&i| nodes[i].offsets().map(|o| o.ode2.clone()).unwrap_or(0..0))
                    .collect()
            })
            .collect();
    }

    /// `CheckSystemIntegrity` (spec §4.1): every marker/node/body index
    /// is in range, and rigid-orientation markers attach to rigid nodes.
    fn check_system_integrity(&self) -> FmbdResult<()> {
        for (i, marker) in self.markers.iter().enumerate() {
            match marker {
                Marker::NodePosition { node } | Marker::NodeRigid { node } | Marker::NodeCoordinate { node, .. } => {
                    if *node >= self.nodes.len() {
                        return Err(FmbdError::consistency(i, format!("marker {i} references out-of-range node {node}")));
                    }
                    if marker.requires_rigid() && !matches!(self.nodes[*node], Node::RigidBody { .. }) {
                        return Err(FmbdError::consistency(i, "marker requires a rigid-body node but its node isn't one"));
                    }
                }
                _ => {
                    let body = marker.body_or_node_index();
                    if body >= self.bodies.len() {
                        return Err(FmbdError::consistency(i, format!("marker {i} references out-of-range body {body}")));
                    }
                }
            }
        }
        for (i, connector) in self.connectors.iter().enumerate() {
            let (m0, m1) = connector.marker_numbers();
            if m0 >= self.markers.len() || m1 >= self.markers.len() {
                return Err(FmbdError::consistency(i, "connector references an out-of-range marker"));
            }
        }
        for (i, body) in self.bodies.iter().enumerate() {
            for n in body.node_indices() {
                if n >= self.nodes.len() {
                    return Err(FmbdError::consistency(i, format!("body {i} references out-of-range node {n}")));
                }
            }
        }
        for (i, load) in self.loads.iter().enumerate() {
            if load.marker() >= self.markers.len() {
                return Err(FmbdError::consistency(i, "load references an out-of-range marker"));
            }
        }
        for (i, sensor) in self.sensors.iter().enumerate() {
            if sensor.marker >= self.markers.len() {
                return Err(FmbdError::consistency(i, "sensor references an out-of-range marker"));
            }
        }
        Ok(())
    }

    /// `AssembleInitializeSystemCoordinates` (spec §4.1): every
    /// configuration starts at zero displacement from each node's
    /// reference coordinates. Callers that need non-zero initial
    /// conditions write directly into `data.initial` and then call
    /// [`System::sync_initial_to_current`].
    fn assemble_initialize_system_coordinates(&mut self) {
        let zeros = CData::zeros(self.n_ode2, self.n_ode1, self.n_ae, self.n_data);
        self.data.reference = zeros.clone();
        self.data.initial = zeros;
        self.sync_initial_to_current();
    }

    /// Re-derives Current/StartOfStep/Visualization from Initial. Call
    /// this after writing non-zero initial displacements/velocities
    /// directly into `data.initial`.
    pub fn sync_initial_to_current(&mut self) {
        self.data.current = self.data.initial.clone();
        self.data.start_of_step = self.data.current.clone();
        self.data.visualization = self.data.current.clone();
    }

    /// Advances every Lie-group `RotVec` node's persistent Data
    /// rotation vector by left-translated SO(3) composition (spec
    /// §4.2): `theta <- log(exp(theta0) . exp(dtheta))`, with `dtheta`
    /// the trapezoidal-average body-frame increment `0.5*(omega0 +
    /// omega1)*dt`. Non-`RotVec` nodes, and the Data range owned by
    /// connectors, pass through unchanged. Called once per accepted
    /// step by the implicit trapezoidal stepper, which is the only
    /// stepper that produces a converged `ode2_t` at both ends of the
    /// step; `rk4.rs` does not call this (see its module doc).
    pub fn advance_lie_group_data(&self, data_old: &DVector<f64>, ode2_t_old: &DVector<f64>, ode2_t_new: &DVector<f64>, dt: f64) -> DVector<f64> {
        let mut data_new = data_old.clone();
        for node in &self.nodes {
            if let Node::RigidBody { kind: RotationKind::RotVec, offsets, .. } = node {
                let o_rot = offsets.ode2.start + 3;
                let o_data = offsets.data.start;
                let omega_old = Vector3::new(ode2_t_old[o_rot], ode2_t_old[o_rot + 1], ode2_t_old[o_rot + 2]);
                let omega_new = Vector3::new(ode2_t_new[o_rot], ode2_t_new[o_rot + 1], ode2_t_new[o_rot + 2]);
                let dtheta = 0.5 * (omega_old + omega_new) * dt;
                let theta_old = Vector3::new(data_old[o_data], data_old[o_data + 1], data_old[o_data + 2]);
                let theta_new = RotationVector::new(theta_old).compose(&dtheta).theta;
                data_new[o_data] = theta_new.x;
                data_new[o_data + 1] = theta_new.y;
                data_new[o_data + 2] = theta_new.z;
            }
        }
        data_new
    }

    /// Materializes `MarkerData` for one marker from a given
    /// configuration snapshot (spec §4.3). `Node*` marker kinds read
    /// straight off the node; `Body*`/`KinematicTreeLink` kinds
    /// delegate to the owning body's own `marker_data`.
    pub fn compute_marker_data(&self, marker_index: usize, cdata: &CData) -> MarkerData {
        match &self.markers[marker_index] {
            Marker::NodePosition { node } | Marker::NodeRigid { node } => self.node_marker_data(*node, Vector3::zeros(), cdata),
            Marker::NodeCoordinate { node, coordinate } => self.node_coordinate_marker_data(*node, *coordinate, cdata),
            Marker::BodyPosition { body, local_position } | Marker::BodyRigid { body, local_position } => {
                self.bodies[*body].marker_data(*local_position, None, &self.nodes, cdata)
            }
            Marker::BodyMass { body } => self.bodies[*body].marker_data(Vector3::zeros(), None, &self.nodes, cdata),
            Marker::BodyCable2DShape { body, axial_parameter } => {
                self.bodies[*body].marker_data(Vector3::new(*axial_parameter, 0.0, 0.0), None, &self.nodes, cdata)
            }
            Marker::BodyCable2DCoordinates { body } => self.body_coordinates_marker_data(*body, cdata),
            Marker::KinematicTreeLink { body, link, local_position } => {
                self.bodies[*body].marker_data(*local_position, Some(*link), &self.nodes, cdata)
            }
        }
    }

    /// Node-level marker kinematics (no body mass/inertia involved),
    /// the same composition `RigidBody`/`GeBeam`'s own `marker_data`
    /// use: `r = r_node + R·p_loc`, `v = v_node + ω × (R·p_loc)`.
    fn node_marker_data(&self, node_index: usize, local_position: Vector3<f64>, cdata: &CData) -> MarkerData {
        let node = &self.nodes[node_index];
        let offsets = node.offsets().cloned().unwrap_or_default();
        let rotation = node.rotation(cdata);
        let r = rotation.as_ref().map(|r| r.rotation_matrix()).unwrap_or_else(Matrix3::identity);
        let qdot_rot = node.rotation_velocity(cdata);
        let omega_local = rotation.as_ref().map(|r| r.angular_velocity_local(&qdot_rot)).unwrap_or_else(Vector3::zeros);
        let world_offset = r * local_position;
        let omega_world = r * omega_local;
        MarkerData {
            position: node.position(cdata) + world_offset,
            velocity: node.velocity(cdata) + omega_world.cross(&world_offset),
            velocity_available: true,
            orientation: r,
            angular_velocity_local: omega_local,
            position_jacobian: DMatrix::identity(3, offsets.ode2.len()),
            rotation_jacobian: crate::object::body::rigid_body::rotation_jacobian_block(rotation.as_ref(), offsets.ode2.len()),
            jacobian: DMatrix::zeros(0, 0),
            vector_value: DVector::zeros(0),
            vector_value_t: DVector::zeros(0),
            ltg_ode2: offsets.ode2.clone().collect(),
        }
    }

    /// One scalar ODE2 coordinate exposed as a coordinate marker (spec
    /// §4.3 "generic k x nCoords pick matrix"): used by
    /// `CoordinateConstraint`/`ContactCoordinate`-style connectors.
    fn node_coordinate_marker_data(&self, node_index: usize, coordinate: usize, cdata: &CData) -> MarkerData {
        let offsets = self.nodes[node_index].offsets().cloned().unwrap_or_default();
        let global = offsets.ode2.start + coordinate;
        let mut jacobian = DMatrix::zeros(1, offsets.ode2.len());
        jacobian[(0, coordinate)] = 1.0;
        MarkerData {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            velocity_available: false,
            orientation: Matrix3::identity(),
            angular_velocity_local: Vector3::zeros(),
            position_jacobian: DMatrix::zeros(3, offsets.ode2.len()),
            rotation_jacobian: DMatrix::zeros(3, offsets.ode2.len()),
            jacobian,
            vector_value: DVector::from_element(1, cdata.ode2[global]),
            vector_value_t: DVector::from_element(1, cdata.ode2_t[global]),
            ltg_ode2: offsets.ode2.clone().collect(),
        }
    }

    /// The whole body's ODE2 coordinate vector exposed as one coordinate
    /// marker (`BodyCable2DCoordinates`): pins or reads an ANCF cable's
    /// raw nodal DOFs directly.
    fn body_coordinates_marker_data(&self, body_index: usize, cdata: &CData) -> MarkerData {
        let ltg = self.body_node_ltg[body_index].clone();
        let n = ltg.len();
        let vector_value = DVector::from_iterator(n, ltg.iter().map(|&g| cdata.ode2[g]));
        let vector_value_t = DVector::from_iterator(n, ltg.iter().map(|&g| cdata.ode2_t[g]));
        MarkerData {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            velocity_available: false,
            orientation: Matrix3::identity(),
            angular_velocity_local: Vector3::zeros(),
            position_jacobian: DMatrix::zeros(3, n),
            rotation_jacobian: DMatrix::zeros(3, n),
            jacobian: DMatrix::identity(n, n),
            vector_value,
            vector_value_t,
            ltg_ode2: ltg,
        }
    }
}
