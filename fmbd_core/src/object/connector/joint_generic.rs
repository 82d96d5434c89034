use crate::marker::MarkerData;
use crate::object::ConnectorObject;
use nalgebra::{DVector, Matrix3, Vector3};

/// The unifying 6-axis joint: `constrained_axes` is `{x,y,z, X,Y,Z}` in
/// `{0,1}` (spec §4.5 `JointGeneric`).
#[derive(Debug, Clone)]
pub struct JointGeneric {
    pub marker0: usize,
    pub marker1: usize,
    pub constrained_axes: [bool; 6],
    pub offset_position: Vector3<f64>,
    pub offset_rotation0: Matrix3<f64>,
    pub offset_rotation1: Matrix3<f64>,
}

impl JointGeneric {
    pub fn new(marker0: usize, marker1: usize, constrained_axes: [bool; 6]) -> Self {
        Self {
            marker0,
            marker1,
            constrained_axes,
            offset_position: Vector3::zeros(),
            offset_rotation0: Matrix3::identity(),
            offset_rotation1: Matrix3::identity(),
        }
    }

    fn n_locked_translation(&self) -> usize {
        self.constrained_axes[0..3].iter().filter(|&&c| c).count()
    }

    fn n_locked_rotation(&self) -> usize {
        self.constrained_axes[3..6].iter().filter(|&&c| c).count()
    }
}

impl ConnectorObject for JointGeneric {
    fn marker_numbers(&self) -> (usize, usize) {
        (self.marker0, self.marker1)
    }

    fn is_constraint(&self) -> bool {
        true
    }

    /// Always 6: every axis carries an AE row, whether it evaluates a
    /// real constraint residual (locked) or pins its multiplier to zero
    /// (free), per spec §4.5's "inactive branch drives multiplier to
    /// zero" convention.
    fn n_ae(&self) -> usize {
        6
    }

    fn compute_algebraic_equations(&self, m0: &MarkerData, m1: &MarkerData, _t: f64, _velocity_level: bool, lambda: &[f64]) -> DVector<f64> {
        let n = self.n_ae();
        let mut g = DVector::zeros(n);
        let mut row = 0;

        let a_joint = m0.orientation * self.offset_rotation0;
        let all_translation_locked = self.n_locked_translation() == 3;
        let delta_global = m1.position - m0.position - a_joint * self.offset_position;
        let delta_local = a_joint.transpose() * delta_global;

        for axis in 0..3 {
            if self.constrained_axes[axis] {
                g[row] = if all_translation_locked { delta_global[axis] } else { delta_local[axis] };
                row += 1;
            } else {
                g[row] = lambda[row];
                row += 1;
            }
        }

        let a0 = m0.orientation * self.offset_rotation0;
        let a1 = m1.orientation * self.offset_rotation1;
        let n_rot_locked = self.n_locked_rotation();

        match n_rot_locked {
            3 => {
                let a_z0 = a0.column(2).into_owned();
                let a_x0 = a0.column(0).into_owned();
                let a_y1 = a1.column(1).into_owned();
                let a_x1 = a1.column(0).into_owned();
                g[row] = a_z0.dot(&a_y1);
                g[row + 1] = a_z0.dot(&a_x1);
                g[row + 2] = a_x0.dot(&a_y1);
                row += 3;
            }
            2 => {
                let free = (0..3).find(|&i| !self.constrained_axes[3 + i]).unwrap();
                let locked: Vec<usize> = (0..3).filter(|&i| i != free).collect();
                let e = a0.column(free).into_owned();
                for &j in &locked {
                    g[row] = e.dot(&a1.column(j));
                    row += 1;
                }
                g[row] = lambda[row];
                row += 1;
            }
            1 => {
                let free: Vec<usize> = (0..3).filter(|&i| !self.constrained_axes[3 + i]).collect();
                let a_free0 = a0.column(free[0]).into_owned();
                let a_free1 = a1.column(free[1]).into_owned();
                g[row] = a_free0.dot(&a_free1);
                row += 1;
                g[row] = lambda[row];
                row += 1;
                g[row] = lambda[row];
                row += 1;
            }
            _ => {
                // No rotation axis locked: all three multipliers pinned
                // to zero, no rotational reaction.
                g[row] = lambda[row];
                g[row + 1] = lambda[row + 1];
                g[row + 2] = lambda[row + 2];
                row += 3;
            }
        }

        g
    }
}

/// Thin revolute-about-Z wrapper: translation fully locked, only the
/// Z rotation axis free.
pub fn joint_revolute_z(marker0: usize, marker1: usize) -> JointGeneric {
    JointGeneric::new(marker0, marker1, [true, true, true, true, true, false])
}

/// Thin spherical wrapper: translation locked, all rotations free.
pub fn joint_spherical(marker0: usize, marker1: usize) -> JointGeneric {
    JointGeneric::new(marker0, marker1, [true, true, true, false, false, false])
}

/// Thin prismatic-along-Z wrapper: rotation fully locked, Z translation free.
pub fn joint_prismatic_z(marker0: usize, marker1: usize) -> JointGeneric {
    JointGeneric::new(marker0, marker1, [true, true, false, true, true, true])
}

pub struct JointRevoluteZ;
pub struct JointSpherical;
pub struct JointPrismatic;

impl JointRevoluteZ {
    pub fn new(marker0: usize, marker1: usize) -> JointGeneric {
        joint_revolute_z(marker0, marker1)
    }
}

impl JointSpherical {
    pub fn new(marker0: usize, marker1: usize) -> JointGeneric {
        joint_spherical(marker0, marker1)
    }
}

impl JointPrismatic {
    pub fn new(marker0: usize, marker1: usize) -> JointGeneric {
        joint_prismatic_z(marker0, marker1)
    }
}
