use crate::marker::MarkerData;
use crate::node::Node;
use crate::object::BodyObject;
use crate::rotation_param::RotationParam;
use crate::system::CData;
use linalg::skew;
use mass_properties::MassProperties;
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

/// Mass matrix block `diag(m I3, G^T J G)` plus the quadratic-velocity
/// force `G^T J G q''_rot + G^T(w~ J w) + G^T J Gdot q'_rot` (spec
/// §4.4). `J` is the body-local inertia tensor about the node origin;
/// non-zero `center_of_mass` shifts it via `mass_properties`'s
/// parallel-axis helper (marked `verify` for EP in DESIGN.md, per
/// spec §9's open question).
#[derive(Debug, Clone)]
pub struct RigidBody {
    pub node: usize,
    pub mass_properties: MassProperties,
}

impl RigidBody {
    pub fn new(node: usize, mass_properties: MassProperties) -> Self {
        Self { node, mass_properties }
    }

    fn inertia_local(&self) -> Matrix3<f64> {
        self.mass_properties.inertia_about(Vector3::zeros())
    }
}

/// `d(omega_world)/d(qdot)`, the rotational twin of `position_jacobian`:
/// zero over the 3 translational columns, `G(q)` over the rotation
/// columns (`omega_world = G(q) qdot_rot`, spec §9 primitive), used by
/// torque loads and rotational penalty connectors (`RigidBodySpringDamper`).
pub(crate) fn rotation_jacobian_block(rotation: Option<&RotationParam>, n_coord: usize) -> DMatrix<f64> {
    let mut jac = DMatrix::zeros(3, n_coord);
    if let Some(rotation) = rotation {
        let n_rot = rotation.n_ode2_rot_coord();
        if n_rot > 0 && n_coord >= 3 + n_rot {
            let g = rotation.g();
            jac.view_mut((0, 3), (3, n_rot)).copy_from(&g);
        }
    }
    jac
}

impl BodyObject for RigidBody {
    fn node_indices(&self) -> Vec<usize> {
        vec![self.node]
    }

    fn mass_matrix_block(&self, nodes: &[Node], cdata: &CData) -> DMatrix<f64> {
        let node = &nodes[self.node];
        let rotation = node.rotation(cdata);
        let n_rot = rotation.as_ref().map(|r| r.n_ode2_rot_coord()).unwrap_or(0);
        let n = 3 + n_rot;
        let mut m = DMatrix::zeros(n, n);
        let mass = self.mass_properties.mass;
        for i in 0..3 {
            m[(i, i)] = mass;
        }
        if let Some(rotation) = rotation {
            if n_rot > 0 {
                let g = rotation.g();
                let j = self.inertia_local();
                let gt_j_g = g.transpose() * j * g;
                for r in 0..n_rot {
                    for c in 0..n_rot {
                        m[(3 + r, 3 + c)] = gt_j_g[(r, c)];
                    }
                }
            }
        }
        m
    }

    fn quadratic_force_block(&self, nodes: &[Node], cdata: &CData) -> DVector<f64> {
        let node = &nodes[self.node];
        let rotation = match node.rotation(cdata) {
            Some(r) => r,
            None => return DVector::zeros(3),
        };
        let n_rot = rotation.n_ode2_rot_coord();
        let mut out = DVector::zeros(3 + n_rot);
        if n_rot == 0 {
            return out;
        }
        let qdot_rot = node.rotation_velocity(cdata);
        let omega_local = rotation.angular_velocity_local(&qdot_rot);
        let j = self.inertia_local();
        let g = rotation.g();
        let g_local = rotation.g_local();

        // Gyroscopic term G^T (omega~ J omega), expressed via the local
        // angular velocity and G (world-frame map), matching RigidBody's
        // quadratic-velocity convention (spec §4.4).
        let gyroscopic = skew(&omega_local) * j * omega_local;
        let g_t_gyro = g_local.transpose() * gyroscopic;

        // G^T J Gdot qdot_rot (vanishes for EP per spec §4.4).
        let g_dot = rotation.g_dot(&qdot_rot);
        let qdot_vec = DVector::from_row_slice(&qdot_rot);
        let g_dot_term = if g_dot.ncols() == n_rot {
            g.transpose() * j * (&g_dot * &qdot_vec)
        } else {
            nalgebra::DVector::zeros(n_rot)
        };

        for k in 0..n_rot {
            out[3 + k] = g_t_gyro[k] + g_dot_term[k];
        }
        out
    }

    fn marker_data(&self, local_position: Vector3<f64>, _link: Option<usize>, nodes: &[Node], cdata: &CData) -> MarkerData {
        let node = &nodes[self.node];
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
            rotation_jacobian: rotation_jacobian_block(rotation.as_ref(), offsets.ode2.len()),
            jacobian: DMatrix::zeros(0, 0),
            vector_value: DVector::zeros(0),
            vector_value_t: DVector::zeros(0),
            ltg_ode2: offsets.ode2.clone().collect(),
        }
    }

    fn total_mass(&self) -> f64 {
        self.mass_properties.mass
    }
}
