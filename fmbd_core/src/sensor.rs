use crate::marker::MarkerData;
use nalgebra::Vector3;

/// Spec §6 `OutputVariableType`: each sensor reads one of these from a
/// marker snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OutputVariableType {
    Position,
    Velocity,
    VelocityLocal,
    Rotation,
    AngularVelocity,
    AngularVelocityLocal,
    Coordinates,
    Distance,
}

/// A typed sensor reading one `OutputVariableType` off one marker (spec
/// §3 "Sensors"). Writing sensor traces to disk is an external
/// collaborator's job (spec §1); this only extracts the typed value.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Sensor {
    pub name: String,
    pub marker: usize,
    pub output_variable: OutputVariableType,
}

impl Sensor {
    pub fn new(name: impl Into<String>, marker: usize, output_variable: OutputVariableType) -> Self {
        Self { name: name.into(), marker, output_variable }
    }

    /// Extracts this sensor's value vector from a marker snapshot.
    pub fn extract(&self, marker_data: &MarkerData) -> Vec<f64> {
        match self.output_variable {
            OutputVariableType::Position => vec3_to_vec(marker_data.position),
            OutputVariableType::Velocity => vec3_to_vec(marker_data.velocity),
            OutputVariableType::VelocityLocal => {
                vec3_to_vec(marker_data.orientation.transpose() * marker_data.velocity)
            }
            OutputVariableType::Rotation => vec3_to_vec(rotation_matrix_to_rxyz(&marker_data.orientation)),
            OutputVariableType::AngularVelocity => {
                vec3_to_vec(marker_data.orientation * marker_data.angular_velocity_local)
            }
            OutputVariableType::AngularVelocityLocal => vec3_to_vec(marker_data.angular_velocity_local),
            OutputVariableType::Coordinates => marker_data.vector_value.iter().copied().collect(),
            OutputVariableType::Distance => {
                vec![if marker_data.vector_value.len() == 0 { 0.0 } else { marker_data.vector_value[0] }]
            }
        }
    }
}

fn vec3_to_vec(v: Vector3<f64>) -> Vec<f64> {
    vec![v.x, v.y, v.z]
}

/// Extracts intrinsic `Rxyz` angles from a rotation matrix (spec §6
/// `Rotation` output kind).
fn rotation_matrix_to_rxyz(r: &nalgebra::Matrix3<f64>) -> Vector3<f64> {
    let beta = (-r[(2, 0)]).asin();
    let alpha = r[(2, 1)].atan2(r[(2, 2)]);
    let gamma = r[(1, 0)].atan2(r[(0, 0)]);
    Vector3::new(alpha, beta, gamma)
}

/// In-memory `T x (1+k)` store: one row per recorded time step, column 0
/// is time.
#[derive(Debug, Clone, Default)]
pub struct SensorStore {
    pub rows: Vec<Vec<f64>>,
}

impl SensorStore {
    pub fn record(&mut self, time: f64, values: &[f64]) {
        let mut row = Vec::with_capacity(values.len() + 1);
        row.push(time);
        row.extend_from_slice(values);
        self.rows.push(row);
    }
}

/// Formats one persisted sensor line, `time value[0] value[1] …`
/// (spec §6 "Persisted sensor layout": ASCII, space-separated, single
/// newline). Writing it anywhere is an external collaborator's job
/// (spec §1).
pub fn format_sensor_record(row: &[f64]) -> String {
    row.iter().map(|v| format!("{:.12e}", v)).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn format_sensor_record_joins_with_spaces() {
        let row = [0.0, 1.5, -2.25];
        assert_eq!(format_sensor_record(&row), format!("{:.12e} {:.12e} {:.12e}", 0.0, 1.5, -2.25));
    }

    #[test]
    fn sensor_store_records_time_prefixed_rows() {
        let mut store = SensorStore::default();
        store.record(0.0, &[1.0, 2.0]);
        store.record(0.1, &[1.1, 2.1]);
        assert_eq!(store.rows.len(), 2);
        assert_abs_diff_eq!(store.rows[1][0], 0.1, epsilon = 1e-12);
    }
}
