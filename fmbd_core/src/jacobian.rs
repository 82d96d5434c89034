use nalgebra::{DMatrix, DVector};

use crate::assembly::System;
use crate::config::DiffSettings;
use crate::system::CData;
use linalg::{fd_step, DiffStencil};

impl System {
    /// Finite-difference Jacobian of `eval` with respect to either the
    /// ODE2 positions or velocities (spec §4.6 `h_k = relativeEpsilon *
    /// max(|q_k|,1) * factor`), one- or two-sided per `diff.stencil`.
    fn fd_directional_jacobian<F>(&self, cdata: &CData, diff: &DiffSettings, base: &DVector<f64>, wrt_position: bool, eval: F) -> DMatrix<f64>
    where
        F: Fn(&CData) -> DVector<f64>,
    {
        let n = self.n_ode2();
        let rows = base.len();
        let mut j = DMatrix::zeros(rows, n);
        for k in 0..n {
            let q_k = if wrt_position { cdata.ode2[k] } else { cdata.ode2_t[k] };
            let h = fd_step(q_k, diff.relative_epsilon, 1.0);

            let mut plus_data = cdata.clone();
            if wrt_position {
                plus_data.ode2[k] += h;
            } else {
                plus_data.ode2_t[k] += h;
            }
            let plus = eval(&plus_data);

            let column = match diff.stencil {
                DiffStencil::Forward => (&plus - base) / h,
                DiffStencil::Central => {
                    let mut minus_data = cdata.clone();
                    if wrt_position {
                        minus_data.ode2[k] -= h;
                    } else {
                        minus_data.ode2_t[k] -= h;
                    }
                    (&plus - &eval(&minus_data)) / (2.0 * h)
                }
            };
            for row in 0..rows {
                j[(row, k)] = column[row];
            }
        }
        j
    }

    /// `JacobianODE2RHS` (spec §4.6): `factor_q * dR/dq + factor_qdot *
    /// dR/dq̇`, `R` being [`System::compute_ode2_rhs`]. No object in this
    /// kernel exposes an analytical `ODE2_ODE2` block, so every call goes
    /// through the numerical path — which reuses the same `MarkerData`
    /// computation the residual itself uses, per spec §4.6's re-entrancy
    /// note.
    pub fn jacobian_ode2_rhs(&self, cdata: &CData, t: f64, diff: &DiffSettings, factor_q: f64, factor_qdot: f64) -> DMatrix<f64> {
        let n = self.n_ode2();
        let mut j = DMatrix::zeros(n, n);
        let base = self.compute_ode2_rhs(cdata, t);
        let eval = |c: &CData| self.compute_ode2_rhs(c, t);
        if factor_q != 0.0 {
            j += self.fd_directional_jacobian(cdata, diff, &base, true, eval) * factor_q;
        }
        if factor_qdot != 0.0 {
            j += self.fd_directional_jacobian(cdata, diff, &base, false, eval) * factor_qdot;
        }
        j
    }

    /// `JacobianAE` (spec §4.6): returns `(dg/dq block, dg/dλ block)`.
    /// The first is `factor_ode2 * dg/dq + factor_ode2_t * dg/dq̇` at the
    /// requested `velocity_level` reduction of `g`; the second is the
    /// AE/λ coupling block — identity on axes whose `g = λ` (the
    /// "unconstrained axis" convention of spec §4.5/§4.6), zero on rows
    /// that evaluate a real constraint residual.
    pub fn jacobian_ae(
        &self,
        cdata: &CData,
        t: f64,
        diff: &DiffSettings,
        velocity_level: bool,
        factor_ode2: f64,
        factor_ode2_t: f64,
    ) -> (DMatrix<f64>, DMatrix<f64>) {
        let n = self.n_ode2();
        let m = self.n_ae();
        let base = self.compute_algebraic_equations(cdata, t, velocity_level);
        let eval = |c: &CData| self.compute_algebraic_equations(c, t, velocity_level);

        let mut j_ode2 = DMatrix::zeros(m, n);
        if factor_ode2 != 0.0 {
            j_ode2 += self.fd_directional_jacobian(cdata, diff, &base, true, eval) * factor_ode2;
        }
        if factor_ode2_t != 0.0 {
            j_ode2 += self.fd_directional_jacobian(cdata, diff, &base, false, eval) * factor_ode2_t;
        }

        let mut j_ae = DMatrix::zeros(m, m);
        for k in 0..m {
            let mut perturbed = cdata.clone();
            perturbed.ae[k] += 1.0;
            let plus = self.compute_algebraic_equations(&perturbed, t, velocity_level);
            for row in 0..m {
                j_ae[(row, k)] = plus[row] - base[row];
            }
        }

        (j_ode2, j_ae)
    }
}
