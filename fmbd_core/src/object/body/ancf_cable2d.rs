use crate::marker::MarkerData;
use crate::node::Node;
use crate::object::BodyObject;
use crate::system::CData;
use linalg::fd_step;
use nalgebra::{DMatrix, DVector, Matrix3, Vector3};

const GAUSS_5: [(f64, f64); 5] = [
    (0.0, 128.0 / 225.0),
    (-0.5384693101056831, (322.0 + 13.0 * 70.0_f64.sqrt()) / 900.0),
    (0.5384693101056831, (322.0 + 13.0 * 70.0_f64.sqrt()) / 900.0),
    (-0.9061798459386640, (322.0 - 13.0 * 70.0_f64.sqrt()) / 900.0),
    (0.9061798459386640, (322.0 - 13.0 * 70.0_f64.sqrt()) / 900.0),
];

/// 8-DOF planar slope-based (ANCF) cable element (spec §4.4); an
/// optional ninth coordinate adds axially-sliding (ALE) material flow.
#[derive(Debug, Clone)]
pub struct AncfCable2D {
    pub node: usize,
    pub length: f64,
    pub area: f64,
    pub density: f64,
    pub youngs_modulus: f64,
    pub area_moment: f64,
    pub ale: bool,
}

/// Hermite shape functions at `xi in [0,1]`, `x = xi * L`.
fn shape(xi: f64, l: f64) -> [f64; 4] {
    let xi2 = xi * xi;
    let xi3 = xi2 * xi;
    [1.0 - 3.0 * xi2 + 2.0 * xi3, l * (xi - 2.0 * xi2 + xi3), 3.0 * xi2 - 2.0 * xi3, l * (-xi2 + xi3)]
}

fn shape_dx(xi: f64, l: f64) -> [f64; 4] {
    let xi2 = xi * xi;
    [(-6.0 * xi + 6.0 * xi2) / l, 1.0 - 4.0 * xi + 3.0 * xi2, (6.0 * xi - 6.0 * xi2) / l, -2.0 * xi + 3.0 * xi2]
}

fn shape_dxx(xi: f64, l: f64) -> [f64; 4] {
    [(-6.0 + 12.0 * xi) / (l * l), (-4.0 + 6.0 * xi) / l, (6.0 - 12.0 * xi) / (l * l), (-2.0 + 6.0 * xi) / l]
}

/// `r = sum_k s[k] * (x_k, y_k)` for the 4-component shape vector `s`
/// against the packed `[x1,y1,x1x,y1x,x2,y2,x2x,y2x]` coordinate order.
fn interpolate(s: &[f64; 4], q: &[f64]) -> Vector3<f64> {
    let x = s[0] * q[0] + s[1] * q[2] + s[2] * q[4] + s[3] * q[6];
    let y = s[0] * q[1] + s[1] * q[3] + s[2] * q[5] + s[3] * q[7];
    Vector3::new(x, y, 0.0)
}

/// `d(position)/dq` for `interpolate`: `dx/dq[2k] = s[k]`, `dy/dq[2k+1]
/// = s[k]`, everything else (including the ALE material-flow column,
/// when present) zero — `position` doesn't depend on it directly.
fn position_jacobian_cols(s: &[f64; 4], n_coord: usize) -> DMatrix<f64> {
    let mut jac = DMatrix::zeros(3, n_coord);
    for k in 0..4 {
        jac[(0, 2 * k)] = s[k];
        jac[(1, 2 * k + 1)] = s[k];
    }
    jac
}

impl AncfCable2D {
    fn n_coord(&self) -> usize {
        if self.ale { 9 } else { 8 }
    }

    /// Classical consistent mass matrix for a 2-node Hermite beam
    /// (Shabana's ANCF formulation), block-Kronecker'd with `I2` since
    /// the shape functions act identically on x and y components.
    fn mass8(&self) -> DMatrix<f64> {
        let l = self.length;
        let c = self.density * self.area * l;
        let m4 = [
            [13.0 / 35.0, 11.0 * l / 210.0, 9.0 / 70.0, -13.0 * l / 420.0],
            [11.0 * l / 210.0, l * l / 105.0, 13.0 * l / 420.0, -l * l / 140.0],
            [9.0 / 70.0, 13.0 * l / 420.0, 13.0 / 35.0, -11.0 * l / 210.0],
            [-13.0 * l / 420.0, -l * l / 140.0, -11.0 * l / 210.0, l * l / 105.0],
        ];
        let mut m = DMatrix::zeros(8, 8);
        for i in 0..4 {
            for j in 0..4 {
                let v = c * m4[i][j];
                m[(2 * i, 2 * j)] = v;
                m[(2 * i + 1, 2 * j + 1)] = v;
            }
        }
        m
    }

    /// Axial + bending strain energy, Gauss-quadrature integrated
    /// (spec §4.4: "axial and bending energy with Gauss quadrature").
    fn strain_energy(&self, q: &[f64]) -> f64 {
        let l = self.length;
        let mut energy = 0.0;
        for &(xi_ref, w) in GAUSS_5.iter() {
            let xi = 0.5 * (xi_ref + 1.0);
            let jac = 0.5 * l;
            let sx = shape_dx(xi, l);
            let sxx = shape_dxx(xi, l);
            let r_x = interpolate(&sx, q);
            let r_xx = interpolate(&sxx, q);
            let axial_strain = 0.5 * (r_x.dot(&r_x) - 1.0);
            let curvature_num = r_x.x * r_xx.y - r_x.y * r_xx.x;
            let r_x_norm = (r_x.x * r_x.x + r_x.y * r_x.y).sqrt().max(1e-12);
            let curvature = curvature_num / r_x_norm.powi(3);
            energy += w * jac * (0.5 * self.youngs_modulus * self.area * axial_strain * axial_strain
                + 0.5 * self.youngs_modulus * self.area_moment * curvature * curvature);
        }
        energy
    }

    fn elastic_force(&self, q: &[f64]) -> DVector<f64> {
        let n = 8;
        let mut force = DVector::zeros(n);
        let relative_epsilon = 1e-7;
        for k in 0..n {
            let h = fd_step(q[k], relative_epsilon, 1.0);
            let mut qp = q.to_vec();
            let mut qm = q.to_vec();
            qp[k] += h;
            qm[k] -= h;
            force[k] = (self.strain_energy(&qp) - self.strain_energy(&qm)) / (2.0 * h);
        }
        force
    }
}

impl BodyObject for AncfCable2D {
    fn node_indices(&self) -> Vec<usize> {
        vec![self.node]
    }

    fn mass_matrix_block(&self, _nodes: &[Node], _cdata: &CData) -> DMatrix<f64> {
        let mut m = DMatrix::zeros(self.n_coord(), self.n_coord());
        let m8 = self.mass8();
        m.view_mut((0, 0), (8, 8)).copy_from(&m8);
        if self.ale {
            // Effective inertia of the material-flow coordinate; no
            // teacher/spec value given, 1.0 matches a unit-mass slider.
            m[(8, 8)] = 1.0;
        }
        m
    }

    fn quadratic_force_block(&self, nodes: &[Node], cdata: &CData) -> DVector<f64> {
        let offsets = nodes[self.node].offsets().expect("ANCF cable node has coordinates");
        let q: Vec<f64> = cdata.ode2.rows(offsets.ode2.start, 8).iter().copied().collect();
        let mut out = DVector::zeros(self.n_coord());
        let elastic = self.elastic_force(&q);
        out.rows_mut(0, 8).copy_from(&elastic);

        if self.ale {
            let qdot: Vec<f64> = cdata.ode2_t.rows(offsets.ode2.start, 8).iter().copied().collect();
            let v = cdata.ode2_t[offsets.ode2.start + 8];
            let l = self.length;
            let mut m_prime = DMatrix::zeros(8, 8);
            let mut m_double_prime = DMatrix::zeros(8, 8);
            for &(xi_ref, w) in GAUSS_5.iter() {
                let xi = 0.5 * (xi_ref + 1.0);
                let jac = 0.5 * l;
                let s = shape(xi, l);
                let sx = shape_dx(xi, l);
                for a in 0..4 {
                    for b in 0..4 {
                        let contrib_sp = w * jac * self.density * self.area * s[a] * sx[b];
                        let contrib_spp = w * jac * self.density * self.area * sx[a] * sx[b];
                        m_prime[(2 * a, 2 * b)] += contrib_sp;
                        m_prime[(2 * a + 1, 2 * b + 1)] += contrib_sp;
                        m_double_prime[(2 * a, 2 * b)] += contrib_spp;
                        m_double_prime[(2 * a + 1, 2 * b + 1)] += contrib_spp;
                    }
                }
            }
            let q_vec = DVector::from_row_slice(&q);
            let qdot_vec = DVector::from_row_slice(&qdot);
            let ode2_contribution = 2.0 * v * (&m_prime * &qdot_vec) - v * v * (&m_double_prime * &q_vec);
            let mut ode2_slice = out.rows_mut(0, 8);
            ode2_slice += &ode2_contribution;
            let q_vqt = 2.0 * v * qdot_vec.dot(&(&m_double_prime * &q_vec));
            out[8] = q_vqt;
        }
        out
    }

    fn marker_data(&self, local_position: Vector3<f64>, _link: Option<usize>, nodes: &[Node], cdata: &CData) -> MarkerData {
        let offsets = nodes[self.node].offsets().expect("ANCF cable node has coordinates");
        let q: Vec<f64> = cdata.ode2.rows(offsets.ode2.start, 8).iter().copied().collect();
        let qdot: Vec<f64> = cdata.ode2_t.rows(offsets.ode2.start, 8).iter().copied().collect();
        let xi = (local_position.x / self.length).clamp(0.0, 1.0);
        let s = shape(xi, self.length);
        let sx = shape_dx(xi, self.length);
        let position = interpolate(&s, &q);
        let velocity = interpolate(&s, &qdot);
        let r_x = interpolate(&sx, &q);
        let theta = r_x.y.atan2(r_x.x);
        let orientation = Matrix3::new(theta.cos(), -theta.sin(), 0.0, theta.sin(), theta.cos(), 0.0, 0.0, 0.0, 1.0);
        MarkerData {
            position,
            velocity,
            velocity_available: true,
            orientation,
            angular_velocity_local: Vector3::zeros(),
            position_jacobian: position_jacobian_cols(&s, self.n_coord()),
            // No rigid-frame capability at a cable marker (`Marker::requires_rigid`
            // excludes `BodyCable2DShape`): no connector reads this, but it would
            // need the slope angle's `atan2` derivative if one ever did.
            rotation_jacobian: DMatrix::zeros(3, self.n_coord()),
            jacobian: DMatrix::zeros(0, 0),
            vector_value: DVector::zeros(0),
            vector_value_t: DVector::zeros(0),
            ltg_ode2: offsets.ode2.clone().collect(),
        }
    }

    fn total_mass(&self) -> f64 {
        self.density * self.area * self.length
    }
}
