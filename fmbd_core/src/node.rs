use crate::coords::{node_type, CoordinateKind, NodeOffsets};
use crate::rotation_param::RotationParam;
use crate::system::CData;
use nalgebra::{Vector3, Vector4};
use rotations::{EulerParameters, RotationVector, TaitBryan};
use serde::{Deserialize, Serialize};

/// Which rotation parameterization a `RigidBody` node carries. Kept
/// separate from `RotationParam` so a node can be constructed before any
/// coordinate vector exists (the variant is structural, the values live
/// in the configuration vectors).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RotationKind {
    Ep,
    Rxyz,
    RotVec,
}

/// A degree-of-freedom carrier (spec §3 "Nodes"). The item schema's
/// mandatory discriminator key (spec §6) is this enum's serde tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "nodeType")]
pub enum Node {
    Point { reference_position: Vector3<f64>, offsets: NodeOffsets },
    PointGround { reference_position: Vector3<f64> },
    RigidBody { reference_position: Vector3<f64>, kind: RotationKind, offsets: NodeOffsets },
    GenericOde2 { n: usize, offsets: NodeOffsets },
    GenericOde1 { n: usize, offsets: NodeOffsets },
    GenericData { n: usize, offsets: NodeOffsets },
}

impl Node {
    pub fn n_coord(&self, kind: CoordinateKind) -> usize {
        match (self, kind) {
            (Node::Point { .. }, CoordinateKind::Ode2) => 3,
            (Node::PointGround { .. }, _) => 0,
            (Node::RigidBody { kind: rk, .. }, CoordinateKind::Ode2) => 3 + rotation_ode2_count(*rk),
            (Node::RigidBody { kind: RotationKind::Ep, .. }, CoordinateKind::Ae) => 1,
            (Node::RigidBody { kind: RotationKind::RotVec, .. }, CoordinateKind::Data) => 3,
            (Node::GenericOde2 { n, .. }, CoordinateKind::Ode2) => *n,
            (Node::GenericOde1 { n, .. }, CoordinateKind::Ode1) => *n,
            (Node::GenericData { n, .. }, CoordinateKind::Data) => *n,
            _ => 0,
        }
    }

    pub fn offsets(&self) -> Option<&NodeOffsets> {
        match self {
            Node::Point { offsets, .. }
            | Node::RigidBody { offsets, .. }
            | Node::GenericOde2 { offsets, .. }
            | Node::GenericOde1 { offsets, .. }
            | Node::GenericData { offsets, .. } => Some(offsets),
            Node::PointGround { .. } => None,
        }
    }

    pub fn set_offsets(&mut self, new_offsets: NodeOffsets) {
        match self {
            Node::Point { offsets, .. }
            | Node::RigidBody { offsets, .. }
            | Node::GenericOde2 { offsets, .. }
            | Node::GenericOde1 { offsets, .. }
            | Node::GenericData { offsets, .. } => *offsets = new_offsets,
            Node::PointGround { .. } => {}
        }
    }

    pub fn node_type_flags(&self) -> u32 {
        match self {
            Node::Point { .. } => node_type::POSITION,
            Node::PointGround { .. } => node_type::POSITION,
            Node::RigidBody { kind, .. } => {
                let rot_flag = match kind {
                    RotationKind::Ep => node_type::ROTATION_EULER_PARAMETERS,
                    RotationKind::Rxyz => node_type::ROTATION_RXYZ,
                    RotationKind::RotVec => node_type::ROTATION_ROTATION_VECTOR | node_type::ROTATION_LIE_GROUP,
                };
                node_type::POSITION | node_type::ORIENTATION | node_type::RIGID_BODY | rot_flag
            }
            Node::GenericOde2 { .. } => node_type::GENERIC_ODE2,
            Node::GenericOde1 { .. } => node_type::GENERIC_ODE1,
            Node::GenericData { .. } => node_type::GENERIC_DATA,
        }
    }

    pub fn position(&self, cdata: &CData) -> Vector3<f64> {
        match self {
            Node::Point { reference_position, offsets } => {
                reference_position + read_vec3(&cdata.ode2, &offsets.ode2, 0)
            }
            Node::PointGround { reference_position } => *reference_position,
            Node::RigidBody { reference_position, offsets, .. } => {
                reference_position + read_vec3(&cdata.ode2, &offsets.ode2, 0)
            }
            _ => Vector3::zeros(),
        }
    }

    pub fn velocity(&self, cdata: &CData) -> Vector3<f64> {
        match self {
            Node::Point { offsets, .. } | Node::RigidBody { offsets, .. } => read_vec3(&cdata.ode2_t, &offsets.ode2, 0),
            _ => Vector3::zeros(),
        }
    }

    pub fn acceleration(&self, cdata: &CData) -> Vector3<f64> {
        match self {
            Node::Point { offsets, .. } | Node::RigidBody { offsets, .. } => read_vec3(&cdata.ode2_tt, &offsets.ode2, 0),
            _ => Vector3::zeros(),
        }
    }

    /// Reconstructs the live rotation parameter value from its
    /// coordinate slot (ODE2 for EP/Rxyz, Data for the Lie-group
    /// rotation-vector node) in the given configuration.
    pub fn rotation(&self, cdata: &CData) -> Option<RotationParam> {
        match self {
            Node::RigidBody { kind: RotationKind::Ep, offsets, .. } => {
                let s = &cdata.ode2;
                let o = offsets.ode2.start + 3;
                EulerParameters::new(s[o], s[o + 1], s[o + 2], s[o + 3]).ok().map(RotationParam::Ep)
            }
            Node::RigidBody { kind: RotationKind::Rxyz, offsets, .. } => {
                let s = &cdata.ode2;
                let o = offsets.ode2.start + 3;
                Some(RotationParam::Rxyz(TaitBryan::new(s[o], s[o + 1], s[o + 2])))
            }
            Node::RigidBody { kind: RotationKind::RotVec, offsets, .. } => {
                let s = &cdata.data;
                let o = offsets.data.start;
                Some(RotationParam::RotVec(RotationVector::new(Vector3::new(s[o], s[o + 1], s[o + 2]))))
            }
            _ => None,
        }
    }

    /// Rotation-coordinate velocities `q_dot_rot` (ODE2 velocity slice):
    /// the 4 Euler-parameter rates for EP, the 3 Tait-Bryan rates for
    /// Rxyz, or the 3 body-frame `omega_bar` components for the
    /// Lie-group `RotVec` node's dedicated velocity-only ODE2 slots.
    pub fn rotation_velocity(&self, cdata: &CData) -> Vec<f64> {
        match self {
            Node::RigidBody { kind: RotationKind::Ep, offsets, .. } => {
                cdata.ode2_t.rows(offsets.ode2.start + 3, 4).iter().copied().collect()
            }
            Node::RigidBody { kind: RotationKind::Rxyz, offsets, .. }
            | Node::RigidBody { kind: RotationKind::RotVec, offsets, .. } => {
                cdata.ode2_t.rows(offsets.ode2.start + 3, 3).iter().copied().collect()
            }
            _ => Vec::new(),
        }
    }

    pub fn write_rotation(&self, cdata: &mut CData, rotation: &RotationParam) {
        match (self, rotation) {
            (Node::RigidBody { kind: RotationKind::Ep, offsets, .. }, RotationParam::Ep(e)) => {
                let o = offsets.ode2.start + 3;
                cdata.ode2[o] = e.e0;
                cdata.ode2[o + 1] = e.e1;
                cdata.ode2[o + 2] = e.e2;
                cdata.ode2[o + 3] = e.e3;
            }
            (Node::RigidBody { kind: RotationKind::Rxyz, offsets, .. }, RotationParam::Rxyz(a)) => {
                let o = offsets.ode2.start + 3;
                cdata.ode2[o] = a.x;
                cdata.ode2[o + 1] = a.y;
                cdata.ode2[o + 2] = a.z;
            }
            (Node::RigidBody { kind: RotationKind::RotVec, offsets, .. }, RotationParam::RotVec(r)) => {
                let o = offsets.data.start;
                cdata.data[o] = r.theta.x;
                cdata.data[o + 1] = r.theta.y;
                cdata.data[o + 2] = r.theta.z;
            }
            _ => {}
        }
    }

    /// Euler-parameter normalization Jacobian row `[0,0,0, 2e0, 2e1,
    /// 2e2, 2e3]`: the three leading translation zeros plus the
    /// rotation-coordinate derivative (spec §4.2/§4.6).
    pub fn ae_jacobian_row_full(&self, cdata: &CData) -> Option<[f64; 7]> {
        let rot = self.rotation(cdata)?;
        let row: Vector4<f64> = rot.ae_jacobian_row()?;
        Some([0.0, 0.0, 0.0, row[0], row[1], row[2], row[3]])
    }
}

fn rotation_ode2_count(kind: RotationKind) -> usize {
    match kind {
        RotationKind::Ep => 4,
        RotationKind::Rxyz => 3,
        // Velocity-only slots carrying `omega_bar`; the position half is
        // never read (persistent orientation lives in Data, see
        // `RotationParam::n_ode2_rot_coord`).
        RotationKind::RotVec => 3,
    }
}

fn read_vec3(v: &nalgebra::DVector<f64>, range: &std::ops::Range<usize>, local_offset: usize) -> Vector3<f64> {
    let o = range.start + local_offset;
    Vector3::new(v[o], v[o + 1], v[o + 2])
}
