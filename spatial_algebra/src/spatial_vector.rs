use nalgebra::{Vector3, Vector6};
use serde::{Deserialize, Serialize};

macro_rules! spatial_vector {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        pub struct $name(pub Vector6<f64>);

        impl $name {
            pub fn zeros() -> Self {
                Self(Vector6::zeros())
            }

            pub fn from_parts(angular: Vector3<f64>, linear: Vector3<f64>) -> Self {
                Self(Vector6::new(
                    angular.x, angular.y, angular.z, linear.x, linear.y, linear.z,
                ))
            }

            /// Angular (top) half of the spatial vector.
            pub fn rotation(&self) -> Vector3<f64> {
                self.0.fixed_rows::<3>(0).into_owned()
            }

            /// Linear (bottom) half of the spatial vector.
            pub fn translation(&self) -> Vector3<f64> {
                self.0.fixed_rows::<3>(3).into_owned()
            }
        }

        impl From<Vector6<f64>> for $name {
            fn from(v: Vector6<f64>) -> Self {
                Self(v)
            }
        }

        impl std::ops::Add for $name {
            type Output = $name;
            fn add(self, rhs: $name) -> $name {
                $name(self.0 + rhs.0)
            }
        }

        impl std::ops::Sub for $name {
            type Output = $name;
            fn sub(self, rhs: $name) -> $name {
                $name(self.0 - rhs.0)
            }
        }

        impl std::ops::Mul<f64> for $name {
            type Output = $name;
            fn mul(self, rhs: f64) -> $name {
                $name(self.0 * rhs)
            }
        }
    };
}

spatial_vector!(Velocity);
spatial_vector!(Acceleration);
spatial_vector!(Force);
spatial_vector!(Momentum);

impl Velocity {
    /// Spatial motion cross product `v x* m` (Featherstone): bias
    /// acceleration / relative-velocity composition term used by the
    /// articulated-body recursion.
    pub fn cross_motion(&self, other: Velocity) -> Acceleration {
        let (w1, v1) = (self.rotation(), self.translation());
        let (w2, v2) = (other.rotation(), other.translation());
        Acceleration::from_parts(w1.cross(&w2), w1.cross(&v2) + v1.cross(&w2))
    }

    /// Spatial force cross product `v x* f`, the dual of `cross_motion`
    /// used in the RNEA/ABA bias-force term.
    pub fn cross_force(&self, f: Force) -> Force {
        let (w, v) = (self.rotation(), self.translation());
        let (n, lin) = (f.rotation(), f.translation());
        Force::from_parts(w.cross(&n) + v.cross(&lin), w.cross(&lin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cross_motion_of_parallel_velocities_is_zero() {
        let v = Velocity::from_parts(Vector3::new(0.0, 0.0, 1.0), Vector3::new(1.0, 0.0, 0.0));
        let c = v.cross_motion(v);
        assert_abs_diff_eq!(c.0, Vector6::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn rotation_translation_round_trip() {
        let w = Vector3::new(1.0, 2.0, 3.0);
        let lin = Vector3::new(4.0, 5.0, 6.0);
        let v = Velocity::from_parts(w, lin);
        assert_abs_diff_eq!(v.rotation(), w, epsilon = 1e-12);
        assert_abs_diff_eq!(v.translation(), lin, epsilon = 1e-12);
    }
}
