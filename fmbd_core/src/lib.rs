pub mod assembly;
pub mod config;
pub mod coords;
pub mod discontinuous;
pub mod error;
pub mod jacobian;
pub mod load;
pub mod marker;
pub mod node;
pub mod object;
pub mod residual;
pub mod rotation_param;
pub mod sensor;
pub mod solver;
pub mod system;
pub mod user_function;

pub use assembly::System;
pub use config::{DiffSettings, SolverSettings};
pub use coords::{ConfigurationType, CoordinateKind, Ltg, NodeOffsets};
pub use error::{ErrorKind, FmbdError, FmbdResult};
pub use load::Load;
pub use marker::{Marker, MarkerData};
pub use node::{Node, RotationKind};
pub use object::{BodyObject, ConnectorObject, ObjectType};
pub use rotation_param::RotationParam;
pub use sensor::{OutputVariableType, Sensor, SensorStore};
pub use system::{CData, SystemData};
pub use user_function::{UserFunction, UserFunctionSlot};
