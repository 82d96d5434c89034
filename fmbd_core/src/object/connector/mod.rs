pub mod contact_circle_cable2d;
pub mod contact_coordinate;
pub mod contact_friction_circle_cable2d;
pub mod coordinate_constraint;
pub mod joint_generic;
pub mod rigid_body_spring_damper;
pub mod spring_damper;

pub use contact_circle_cable2d::ContactCircleCable2D;
pub use contact_coordinate::ContactCoordinate;
pub use contact_friction_circle_cable2d::ContactFrictionCircleCable2D;
pub use coordinate_constraint::CoordinateConstraint;
pub use joint_generic::{JointGeneric, JointPrismatic, JointRevoluteZ, JointSpherical};
pub use rigid_body_spring_damper::RigidBodySpringDamper;
pub use spring_damper::CartesianSpringDamper;
