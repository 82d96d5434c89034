use crate::marker::MarkerData;
use crate::node::Node;
use crate::object::BodyObject;
use crate::system::CData;
use linalg::skew;
use mass_properties::MassProperties;
use nalgebra::{DMatrix, DVector, Matrix3, Vector3, Vector6};
use rotations::RotationMatrix;
use spatial_algebra::{Acceleration, Force, SpatialInertia, SpatialTransform, Velocity};

/// One-DOF joint kinds a `KinematicTree` link can use (spec §6
/// `Joint::Type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointType {
    RevoluteX,
    RevoluteY,
    RevoluteZ,
    PrismaticX,
    PrismaticY,
    PrismaticZ,
}

impl JointType {
    pub fn is_revolute(&self) -> bool {
        matches!(self, JointType::RevoluteX | JointType::RevoluteY | JointType::RevoluteZ)
    }

    pub fn is_prismatic(&self) -> bool {
        !self.is_revolute()
    }

    pub fn axis_number(&self) -> usize {
        match self {
            JointType::RevoluteX | JointType::PrismaticX => 0,
            JointType::RevoluteY | JointType::PrismaticY => 1,
            JointType::RevoluteZ | JointType::PrismaticZ => 2,
        }
    }

    pub fn axis_vector(&self) -> Vector3<f64> {
        let mut v = Vector3::zeros();
        v[self.axis_number()] = 1.0;
        v
    }

    /// The joint motion subspace `S_i` as a spatial vector.
    pub fn motion_subspace(&self) -> Vector6<f64> {
        let axis = self.axis_vector();
        if self.is_revolute() {
            Vector6::new(axis.x, axis.y, axis.z, 0.0, 0.0, 0.0)
        } else {
            Vector6::new(0.0, 0.0, 0.0, axis.x, axis.y, axis.z)
        }
    }

    /// Joint transform `X_J(q)`: pure rotation about the axis for a
    /// revolute joint, pure translation along it for a prismatic one.
    pub fn joint_transform(&self, q: f64) -> SpatialTransform {
        if self.is_revolute() {
            let axis = self.axis_vector();
            let sk = skew(&axis);
            let r = Matrix3::identity() + q.sin() * sk + (1.0 - q.cos()) * (sk * sk);
            SpatialTransform::new(RotationMatrix::new(r), Vector3::zeros())
        } else {
            SpatialTransform::new(RotationMatrix::IDENTITY, self.axis_vector() * q)
        }
    }

    pub fn joint_velocity(&self, qdot: f64) -> Velocity {
        let axis = self.axis_vector();
        if self.is_revolute() {
            Velocity::from_parts(axis * qdot, Vector3::zeros())
        } else {
            Velocity::from_parts(Vector3::zeros(), axis * qdot)
        }
    }
}

/// Serial/tree-structured rigid multibody chain via CRBA (mass matrix)
/// and RNEA (bias forces), spec §4.4. Each link has exactly one DOF.
#[derive(Debug, Clone)]
pub struct KinematicTree {
    pub node: usize,
    pub link_masses: Vec<f64>,
    pub link_inertias_com: Vec<Matrix3<f64>>,
    pub link_coms: Vec<Vector3<f64>>,
    pub joint_types: Vec<JointType>,
    /// Fixed parent-to-joint transform `X_L[i]`.
    pub joint_transformations: Vec<SpatialTransform>,
    /// `-1` for the root link.
    pub link_parents: Vec<i64>,
    pub kp: Vec<f64>,
    pub kd: Vec<f64>,
    pub q_ref: Vec<f64>,
    pub qd_ref: Vec<f64>,
    pub gravity: Vector3<f64>,
}

impl KinematicTree {
    pub fn n(&self) -> usize {
        self.joint_types.len()
    }

    fn link_inertia(&self, i: usize) -> SpatialInertia {
        let mp = MassProperties::new(
            self.link_masses[i],
            self.link_coms[i].into(),
            self.link_inertias_com[i].into(),
        )
        .expect("valid link mass properties");
        SpatialInertia::from_mass_properties(&mp)
    }

    fn up_transforms(&self, q: &[f64]) -> Vec<SpatialTransform> {
        (0..self.n())
            .map(|i| self.joint_types[i].joint_transform(q[i]).mul(&self.joint_transformations[i]))
            .collect()
    }

    /// Composite-Rigid-Body Algorithm: the `n x n` generalized mass
    /// matrix (spec §4.4 step list, Featherstone's standard recursion).
    pub fn mass_matrix(&self, q: &[f64]) -> DMatrix<f64> {
        let n = self.n();
        let x_up = self.up_transforms(q);
        let mut ic: Vec<SpatialInertia> = (0..n).map(|i| self.link_inertia(i)).collect();
        let mut h = DMatrix::zeros(n, n);
        for i in (0..n).rev() {
            let parent = self.link_parents[i];
            if parent >= 0 {
                let contrib = x_up[i].congruence_transform_inertia(&ic[i]);
                let p = parent as usize;
                ic[p] = SpatialInertia(ic[p].0 + contrib.0);
            }
            let s_i = self.joint_types[i].motion_subspace();
            let mut f = ic[i].0 * s_i;
            h[(i, i)] = s_i.dot(&f);
            let mut j = i as i64;
            while self.link_parents[j as usize] >= 0 {
                let parent = self.link_parents[j as usize];
                f = x_up[j as usize].inv().transform_force(Force(f)).0;
                j = parent;
                let s_j = self.joint_types[j as usize].motion_subspace();
                let val = f.dot(&s_j);
                h[(i, j as usize)] = val;
                h[(j as usize, i)] = val;
            }
        }
        h
    }

    /// Recursive Newton-Euler bias forces at `q'' = 0` (spec §4.4):
    /// gravity, Coriolis and centrifugal generalized forces, plus
    /// optional per-joint PD control torques.
    pub fn bias_forces(&self, q: &[f64], qdot: &[f64]) -> DVector<f64> {
        let n = self.n();
        let x_up = self.up_transforms(q);
        let mut v = vec![Velocity::zeros(); n];
        let mut a_vp = vec![Acceleration::zeros(); n];
        let base_accel = Acceleration::from_parts(Vector3::zeros(), -self.gravity);

        for i in 0..n {
            let parent = self.link_parents[i];
            let v_parent = if parent >= 0 { v[parent as usize] } else { Velocity::zeros() };
            let a_parent = if parent >= 0 { a_vp[parent as usize] } else { base_accel };
            let v_j = self.joint_types[i].joint_velocity(qdot[i]);
            v[i] = x_up[i].transform_velocity(v_parent) + v_j;
            a_vp[i] = x_up[i].transform_acceleration(a_parent) + v[i].cross_motion(v_j);
        }

        let mut f_vp: Vec<Force> = (0..n)
            .map(|i| {
                let inertia = self.link_inertia(i);
                (inertia * a_vp[i]) + v[i].cross_force(inertia * v[i])
            })
            .collect();

        let mut tau = DVector::zeros(n);
        for i in (0..n).rev() {
            let s_i = self.joint_types[i].motion_subspace();
            tau[i] = f_vp[i].0.dot(&s_i);
            let parent = self.link_parents[i];
            if parent >= 0 {
                let transformed = x_up[i].inv().transform_force(f_vp[i]);
                f_vp[parent as usize] = f_vp[parent as usize] + transformed;
            }
        }

        if !self.kp.is_empty() {
            for i in 0..n {
                let control = -self.kp[i] * (self.q_ref[i] - q[i]) - self.kd[i] * (self.qd_ref[i] - qdot[i]);
                tau[i] -= control;
            }
        }
        tau
    }
}

impl BodyObject for KinematicTree {
    fn node_indices(&self) -> Vec<usize> {
        vec![self.node]
    }

    fn mass_matrix_block(&self, nodes: &[Node], cdata: &CData) -> DMatrix<f64> {
        let offsets = nodes[self.node].offsets().expect("kinematic tree node has coordinates");
        let q: Vec<f64> = cdata.ode2.rows(offsets.ode2.start, self.n()).iter().copied().collect();
        self.mass_matrix(&q)
    }

    fn quadratic_force_block(&self, nodes: &[Node], cdata: &CData) -> DVector<f64> {
        let offsets = nodes[self.node].offsets().expect("kinematic tree node has coordinates");
        let q: Vec<f64> = cdata.ode2.rows(offsets.ode2.start, self.n()).iter().copied().collect();
        let qdot: Vec<f64> = cdata.ode2_t.rows(offsets.ode2.start, self.n()).iter().copied().collect();
        self.bias_forces(&q, &qdot)
    }

    fn marker_data(&self, local_position: Vector3<f64>, link: Option<usize>, nodes: &[Node], cdata: &CData) -> MarkerData {
        let link = link.unwrap_or(0);
        let offsets = nodes[self.node].offsets().expect("kinematic tree node has coordinates");
        let q: Vec<f64> = cdata.ode2.rows(offsets.ode2.start, self.n()).iter().copied().collect();
        let qdot: Vec<f64> = cdata.ode2_t.rows(offsets.ode2.start, self.n()).iter().copied().collect();
        let x_up = self.up_transforms(&q);

        let mut world_from_link = SpatialTransform::IDENTITY;
        let mut velocity = Velocity::zeros();
        let chain: Vec<usize> = {
            let mut c = Vec::new();
            let mut cur = link as i64;
            while cur >= 0 {
                c.push(cur as usize);
                cur = self.link_parents[cur as usize];
            }
            c.into_iter().rev().collect()
        };
        for i in chain {
            world_from_link = x_up[i].mul(&world_from_link);
            let v_j = self.joint_types[i].joint_velocity(qdot[i]);
            velocity = x_up[i].transform_velocity(velocity) + v_j;
        }
        let world_from_link = world_from_link.inv();

        let position = *world_from_link.translation() + world_from_link.rotation().transform(local_position);
        MarkerData {
            position,
            velocity: velocity.translation(),
            velocity_available: true,
            orientation: world_from_link.rotation().0,
            angular_velocity_local: velocity.rotation(),
            position_jacobian: DMatrix::zeros(3, self.n()),
            rotation_jacobian: DMatrix::zeros(3, self.n()),
            jacobian: DMatrix::zeros(0, 0),
            vector_value: DVector::zeros(0),
            vector_value_t: DVector::zeros(0),
            ltg_ode2: offsets.ode2.clone().collect(),
        }
    }

    fn total_mass(&self) -> f64 {
        self.link_masses.iter().sum()
    }
}
