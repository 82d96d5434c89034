use serde::{Deserialize, Serialize};
use std::ops::Range;

/// The five named configurations that coexist per system (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigurationType {
    Reference,
    Initial,
    Current,
    StartOfStep,
    Visualization,
}

/// The four coordinate classes a node can own (spec §3 GLOSSARY).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateKind {
    Ode2,
    Ode1,
    Ae,
    Data,
}

/// Bitmask capability flags a node declares (spec §6 `NodeType`).
pub mod node_type {
    pub const POSITION: u32 = 1 << 0;
    pub const ORIENTATION: u32 = 1 << 1;
    pub const POSITION2D: u32 = 1 << 2;
    pub const ORIENTATION2D: u32 = 1 << 3;
    pub const RIGID_BODY: u32 = 1 << 4;
    pub const ROTATION_EULER_PARAMETERS: u32 = 1 << 5;
    pub const ROTATION_RXYZ: u32 = 1 << 6;
    pub const ROTATION_ROTATION_VECTOR: u32 = 1 << 7;
    pub const ROTATION_LIE_GROUP: u32 = 1 << 8;
    pub const POINT_2D_SLOPE1: u32 = 1 << 9;
    pub const GENERIC_ODE2: u32 = 1 << 10;
    pub const GENERIC_ODE1: u32 = 1 << 11;
    pub const GENERIC_AE: u32 = 1 << 12;
    pub const GENERIC_DATA: u32 = 1 << 13;
}

/// Contiguous global-index ranges a node owns per coordinate class. The
/// node never reallocates these; `AssembleLTGLists` is a pure function
/// of insertion order (spec §9 "Coordinate ownership").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeOffsets {
    pub ode2: Range<usize>,
    pub ode1: Range<usize>,
    pub ae: Range<usize>,
    pub data: Range<usize>,
}

impl NodeOffsets {
    pub fn range(&self, kind: CoordinateKind) -> &Range<usize> {
        match kind {
            CoordinateKind::Ode2 => &self.ode2,
            CoordinateKind::Ode1 => &self.ode1,
            CoordinateKind::Ae => &self.ae,
            CoordinateKind::Data => &self.data,
        }
    }
}

/// Local-to-global index list for one object: the global coordinate
/// indices, in the object's own local order, for each coordinate class.
#[derive(Debug, Clone, Default)]
pub struct Ltg {
    pub ode2: Vec<usize>,
    pub ode1: Vec<usize>,
    pub ae: Vec<usize>,
    pub data: Vec<usize>,
}
