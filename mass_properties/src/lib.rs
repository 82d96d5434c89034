//! Mass, center-of-mass offset, and inertia tensor for a single rigid
//! body or node, plus the parallel-axis shift used when a body's
//! reference frame doesn't sit at its center of mass.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MassPropertiesErrors {
    #[error("Ixx cant be less than or equal to zero")]
    IxxLessThanOrEqualToZero,
    #[error("Iyy cant be less than or equal to zero")]
    IyyLessThanOrEqualToZero,
    #[error("Izz cant be less than or equal to zero")]
    IzzLessThanOrEqualToZero,
    #[error("mass cannot be less than or equal to zero")]
    MassLessThanOrEqualToZero,
    #[error("inertia tensor is not positive definite")]
    InertiaNotPositiveDefinite,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CenterOfMass {
    x: f64,
    y: f64,
    z: f64,
}

impl CenterOfMass {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl From<Vector3<f64>> for CenterOfMass {
    fn from(v: Vector3<f64>) -> CenterOfMass {
        CenterOfMass::new(v[0], v[1], v[2])
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Inertia {
    pub ixx: f64,
    pub ixy: f64,
    pub ixz: f64,
    pub iyy: f64,
    pub iyz: f64,
    pub izz: f64,
}

impl Inertia {
    pub fn new(
        ixx: f64,
        iyy: f64,
        izz: f64,
        ixy: f64,
        ixz: f64,
        iyz: f64,
    ) -> Result<Self, MassPropertiesErrors> {
        if ixx <= f64::EPSILON {
            return Err(MassPropertiesErrors::IxxLessThanOrEqualToZero);
        }
        if iyy <= f64::EPSILON {
            return Err(MassPropertiesErrors::IyyLessThanOrEqualToZero);
        }
        if izz <= f64::EPSILON {
            return Err(MassPropertiesErrors::IzzLessThanOrEqualToZero);
        }
        let inertia = Self { ixx, iyy, izz, ixy, ixz, iyz };
        if inertia.matrix().symmetric_eigenvalues().iter().any(|&v| v <= 0.0) {
            return Err(MassPropertiesErrors::InertiaNotPositiveDefinite);
        }
        Ok(inertia)
    }

    pub fn matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.ixx, self.ixy, self.ixz, //
            self.ixy, self.iyy, self.iyz, //
            self.ixz, self.iyz, self.izz,
        )
    }
}

impl From<Matrix3<f64>> for Inertia {
    fn from(m: Matrix3<f64>) -> Inertia {
        Inertia::new(m[(0, 0)], m[(1, 1)], m[(2, 2)], m[(0, 1)], m[(0, 2)], m[(1, 2)]).unwrap()
    }
}

/// Mass, center of mass, and inertia tensor (about the center of mass)
/// of a single body or node.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MassProperties {
    pub mass: f64,
    pub center_of_mass: CenterOfMass,
    pub inertia: Inertia,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self {
            mass: 1.0,
            center_of_mass: CenterOfMass::new(0.0, 0.0, 0.0),
            inertia: Inertia::new(1.0, 1.0, 1.0, 0.0, 0.0, 0.0).unwrap(),
        }
    }
}

impl MassProperties {
    pub fn new(
        mass: f64,
        center_of_mass: CenterOfMass,
        inertia: Inertia,
    ) -> Result<Self, MassPropertiesErrors> {
        if mass <= f64::EPSILON {
            return Err(MassPropertiesErrors::MassLessThanOrEqualToZero);
        }
        Ok(MassProperties { mass, center_of_mass, inertia })
    }

    /// Inertia tensor about an arbitrary reference point, via the
    /// parallel-axis theorem: `I_p = I_com + m * (|d|^2 * Id - d d^T)`
    /// with `d = center_of_mass - p`.
    pub fn inertia_about(&self, reference_point: Vector3<f64>) -> Matrix3<f64> {
        let d = self.center_of_mass.vector() - reference_point;
        let shift = (d.dot(&d)) * Matrix3::identity() - d * d.transpose();
        self.inertia.matrix() + self.mass * shift
    }
}

pub struct MassPropertiesBuilder {
    mass: f64,
    cmx: f64,
    cmy: f64,
    cmz: f64,
    ixx: f64,
    iyy: f64,
    izz: f64,
    ixy: f64,
    ixz: f64,
    iyz: f64,
}

impl Default for MassPropertiesBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MassPropertiesBuilder {
    pub fn new() -> Self {
        Self {
            mass: 1.0,
            cmx: 0.0,
            cmy: 0.0,
            cmz: 0.0,
            ixx: 1.0,
            iyy: 1.0,
            izz: 1.0,
            ixy: 0.0,
            ixz: 0.0,
            iyz: 0.0,
        }
    }

    pub fn with_mass(mut self, mass: f64) -> Result<Self, MassPropertiesErrors> {
        if mass <= f64::EPSILON {
            Err(MassPropertiesErrors::MassLessThanOrEqualToZero)
        } else {
            self.mass = mass;
            Ok(self)
        }
    }

    pub fn with_center_of_mass(mut self, cmx: f64, cmy: f64, cmz: f64) -> Self {
        self.cmx = cmx;
        self.cmy = cmy;
        self.cmz = cmz;
        self
    }

    pub fn with_ixx(mut self, ixx: f64) -> Result<Self, MassPropertiesErrors> {
        if ixx <= f64::EPSILON {
            Err(MassPropertiesErrors::IxxLessThanOrEqualToZero)
        } else {
            self.ixx = ixx;
            Ok(self)
        }
    }

    pub fn with_iyy(mut self, iyy: f64) -> Result<Self, MassPropertiesErrors> {
        if iyy <= f64::EPSILON {
            Err(MassPropertiesErrors::IyyLessThanOrEqualToZero)
        } else {
            self.iyy = iyy;
            Ok(self)
        }
    }

    pub fn with_izz(mut self, izz: f64) -> Result<Self, MassPropertiesErrors> {
        if izz <= f64::EPSILON {
            Err(MassPropertiesErrors::IzzLessThanOrEqualToZero)
        } else {
            self.izz = izz;
            Ok(self)
        }
    }

    pub fn with_products(mut self, ixy: f64, ixz: f64, iyz: f64) -> Self {
        self.ixy = ixy;
        self.ixz = ixz;
        self.iyz = iyz;
        self
    }

    pub fn build(self) -> Result<MassProperties, MassPropertiesErrors> {
        let inertia = Inertia::new(self.ixx, self.iyy, self.izz, self.ixy, self.ixz, self.iyz)?;
        MassProperties::new(self.mass, CenterOfMass::new(self.cmx, self.cmy, self.cmz), inertia)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn rejects_nonpositive_mass() {
        let inertia = Inertia::new(1.0, 1.0, 1.0, 0.0, 0.0, 0.0).unwrap();
        let err = MassProperties::new(0.0, CenterOfMass::default(), inertia).unwrap_err();
        assert!(matches!(err, MassPropertiesErrors::MassLessThanOrEqualToZero));
    }

    #[test]
    fn rejects_non_positive_definite_inertia() {
        let err = Inertia::new(1.0, 1.0, 1.0, 2.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, MassPropertiesErrors::InertiaNotPositiveDefinite));
    }

    #[test]
    fn parallel_axis_shift_matches_point_mass_formula() {
        // A point mass 2 kg offset by (1, 0, 0) from the reference point
        // contributes m*d^2 = 2 to Iyy and Izz, and nothing to Ixx.
        let mp = MassProperties::new(
            2.0,
            CenterOfMass::new(1.0, 0.0, 0.0),
            Inertia::new(1.0, 1.0, 1.0, 0.0, 0.0, 0.0).unwrap(),
        )
        .unwrap();
        let shifted = mp.inertia_about(Vector3::zeros());
        assert_abs_diff_eq!(shifted[(0, 0)], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(shifted[(1, 1)], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(shifted[(2, 2)], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn builder_matches_direct_constructor() {
        let built = MassPropertiesBuilder::new()
            .with_mass(3.0)
            .unwrap()
            .with_center_of_mass(0.1, 0.2, 0.3)
            .with_ixx(2.0)
            .unwrap()
            .with_iyy(2.0)
            .unwrap()
            .with_izz(2.0)
            .unwrap()
            .build()
            .unwrap();
        assert_abs_diff_eq!(built.mass, 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(built.center_of_mass.vector(), Vector3::new(0.1, 0.2, 0.3), epsilon = 1e-12);
    }
}
