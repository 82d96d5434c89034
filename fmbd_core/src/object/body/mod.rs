pub mod ancf_cable2d;
pub mod ge_beam;
pub mod ground;
pub mod kinematic_tree;
pub mod mass_point;
pub mod rigid_body;

pub use ancf_cable2d::AncfCable2D;
pub use ge_beam::GeBeam;
pub use ground::Ground;
pub use kinematic_tree::{JointType, KinematicTree};
pub use mass_point::MassPoint;
pub use rigid_body::RigidBody;
