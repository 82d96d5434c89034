use crate::marker::MarkerData;
use crate::node::Node;
use crate::object::BodyObject;
use crate::system::CData;
use linalg::fd_step;
use nalgebra::{DMatrix, DVector, Matrix3, Vector3, Vector6};
use rotations::{RotationMatrix, RotationVector};

/// Geometrically exact 3D 2-node beam, SE(3)-relative formulation (spec
/// §4.4). Each node is a full rigid-body frame (position + rotation);
/// strain is the SE(3) log of the relative transform between them.
#[derive(Debug, Clone)]
pub struct GeBeam {
    pub nodes: [usize; 2],
    pub length: f64,
    /// `[kA, kSy, kSz, kTorsion, kBendY, kBendZ]`.
    pub stiffness: [f64; 6],
    pub mass_per_node: f64,
    pub inertia_per_node: Matrix3<f64>,
}

impl GeBeam {
    fn relative_strain(&self, nodes: &[Node], cdata: &CData) -> Vector6<f64> {
        let pos0 = nodes[self.nodes[0]].position(cdata);
        let pos1 = nodes[self.nodes[1]].position(cdata);
        let rot0 = nodes[self.nodes[0]].rotation(cdata).map(|r| r.rotation_matrix()).unwrap_or_else(Matrix3::identity);
        let rot1 = nodes[self.nodes[1]].rotation(cdata).map(|r| r.rotation_matrix()).unwrap_or_else(Matrix3::identity);

        let delta_u = rot0.transpose() * (pos1 - pos0);
        let relative_rotation = rot0.transpose() * rot1;
        let delta_theta = RotationVector::log(&RotationMatrix::new(relative_rotation)).theta;

        let h0 = Vector6::new(self.length, 0.0, 0.0, 0.0, 0.0, 0.0);
        let h = Vector6::new(delta_u.x, delta_u.y, delta_u.z, delta_theta.x, delta_theta.y, delta_theta.z);
        (h - h0) / self.length
    }

    fn strain_energy(&self, nodes: &[Node], cdata: &CData) -> f64 {
        let strain = self.relative_strain(nodes, cdata);
        let k = Vector6::from_row_slice(&self.stiffness);
        0.5 * self.length * strain.component_mul(&k).dot(&strain)
    }

    /// Internal generalized force via central-difference gradient of
    /// the strain energy with respect to each node's coordinates — no
    /// closed-form `T_SE(3)^{-T}` transport Jacobian is maintained
    /// here, mirroring the rotation-vector node's own FD fallback.
    fn elastic_force(&self, nodes: &[Node], cdata: &CData, offsets: &[std::ops::Range<usize>; 2]) -> DVector<f64> {
        let total_n: usize = offsets.iter().map(|r| r.len()).sum();
        let mut force = DVector::zeros(total_n);
        let relative_epsilon = 1e-7;
        let mut row = 0;
        for range in offsets {
            for k in range.clone() {
                let h = fd_step(cdata.ode2[k], relative_epsilon, 1.0);
                let mut plus = cdata.clone();
                let mut minus = cdata.clone();
                plus.ode2[k] += h;
                minus.ode2[k] -= h;
                force[row] = (self.strain_energy(nodes, &plus) - self.strain_energy(nodes, &minus)) / (2.0 * h);
                row += 1;
            }
        }
        force
    }
}

impl BodyObject for GeBeam {
    fn node_indices(&self) -> Vec<usize> {
        self.nodes.to_vec()
    }

    fn mass_matrix_block(&self, nodes: &[Node], cdata: &CData) -> DMatrix<f64> {
        let mut blocks = Vec::new();
        for &n in &self.nodes {
            let rotation = nodes[n].rotation(cdata);
            let n_rot = rotation.as_ref().map(|r| r.n_ode2_rot_coord()).unwrap_or(0);
            blocks.push((3 + n_rot, rotation, n_rot));
        }
        let total: usize = blocks.iter().map(|(n, _, _)| n).sum();
        let mut m = DMatrix::zeros(total, total);
        let mut offset = 0;
        for (n, rotation, n_rot) in blocks {
            for i in 0..3 {
                m[(offset + i, offset + i)] = self.mass_per_node;
            }
            if let Some(rotation) = rotation {
                if n_rot > 0 {
                    let g = rotation.g();
                    let gt_j_g = g.transpose() * self.inertia_per_node * g;
                    for r in 0..n_rot {
                        for c in 0..n_rot {
                            m[(offset + 3 + r, offset + 3 + c)] = gt_j_g[(r, c)];
                        }
                    }
                }
            }
            offset += n;
        }
        m
    }

    fn quadratic_force_block(&self, nodes: &[Node], cdata: &CData) -> DVector<f64> {
        let offsets: Vec<_> = self.nodes.iter().map(|&n| nodes[n].offsets().expect("GE beam node has coordinates").ode2.clone()).collect();
        let offsets: [std::ops::Range<usize>; 2] = [offsets[0].clone(), offsets[1].clone()];

        let mut out = self.elastic_force(nodes, cdata, &offsets);

        let mut row = 0;
        for &n in &self.nodes {
            let rotation = nodes[n].rotation(cdata);
            if let Some(rotation) = rotation {
                let n_rot = rotation.n_ode2_rot_coord();
                if n_rot > 0 {
                    let qdot_rot = nodes[n].rotation_velocity(cdata);
                    let omega_local = rotation.angular_velocity_local(&qdot_rot);
                    let gyroscopic = linalg::skew(&omega_local) * self.inertia_per_node * omega_local;
                    let g_local = rotation.g_local();
                    let g_t_gyro = g_local.transpose() * gyroscopic;
                    for k in 0..n_rot {
                        out[row + 3 + k] += g_t_gyro[k];
                    }
                }
                row += 3 + n_rot;
            } else {
                row += 3;
            }
        }
        out
    }

    fn marker_data(&self, local_position: Vector3<f64>, link: Option<usize>, nodes: &[Node], cdata: &CData) -> MarkerData {
        let which = link.unwrap_or(0).min(1);
        let node = &nodes[self.nodes[which]];
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

    fn total_mass(&self) -> f64 {
        2.0 * self.mass_per_node
    }
}
