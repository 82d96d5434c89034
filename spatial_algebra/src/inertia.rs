use crate::spatial_vector::{Force, Velocity};
use linalg::skew;
use mass_properties::MassProperties;
use nalgebra::{Matrix3, Matrix6, Vector3};
use serde::{Deserialize, Serialize};

/// A rigid body's 6x6 spatial inertia about its own reference frame
/// origin, in `[angular; linear]` block order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpatialInertia(pub Matrix6<f64>);

impl SpatialInertia {
    pub fn from_mass_properties(mp: &MassProperties) -> Self {
        let d = mp.center_of_mass.vector();
        let i_about_origin = mp.inertia_about(Vector3::zeros());
        let sk = skew(&d);
        let mut m = Matrix6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&i_about_origin);
        m.fixed_view_mut::<3, 3>(0, 3).copy_from(&(mp.mass * sk));
        m.fixed_view_mut::<3, 3>(3, 0).copy_from(&(mp.mass * -sk));
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&(mp.mass * Matrix3::identity()));
        Self(m)
    }

    pub fn mass(&self) -> f64 {
        self.0[(3, 3)]
    }
}

impl std::ops::Mul<Velocity> for SpatialInertia {
    type Output = Force;
    fn mul(self, rhs: Velocity) -> Force {
        Force(self.0 * rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use mass_properties::{CenterOfMass, Inertia};

    #[test]
    fn is_symmetric_for_central_inertia() {
        let mp = MassProperties::new(
            2.0,
            CenterOfMass::new(0.0, 0.0, 0.0),
            Inertia::new(1.0, 2.0, 3.0, 0.0, 0.0, 0.0).unwrap(),
        )
        .unwrap();
        let si = SpatialInertia::from_mass_properties(&mp);
        assert_abs_diff_eq!(si.0, si.0.transpose(), epsilon = 1e-12);
    }

    #[test]
    fn mass_block_is_mass_times_identity() {
        let mp = MassProperties::new(
            4.0,
            CenterOfMass::new(0.1, -0.2, 0.05),
            Inertia::new(1.0, 1.0, 1.0, 0.0, 0.0, 0.0).unwrap(),
        )
        .unwrap();
        let si = SpatialInertia::from_mass_properties(&mp);
        assert_abs_diff_eq!(si.0.fixed_view::<3, 3>(3, 3).into_owned(), 4.0 * Matrix3::identity(), epsilon = 1e-12);
    }
}
