use std::ops::{AddAssign, MulAssign};

use nalgebra::DVector;

use crate::assembly::System;
use crate::error::{FmbdError, FmbdResult};
use crate::system::CData;

/// Flat `[q; q̇]` integration state for the explicit Runge-Kutta family
/// (spec §2). Mirrors the teacher's `JointStates`/`SimStateVector`
/// `MulAssign`/`AddAssign` pattern so the stage-combination arithmetic
/// below reads the same way.
#[derive(Debug, Clone)]
pub struct Ode2State {
    pub q: DVector<f64>,
    pub qdot: DVector<f64>,
}

impl MulAssign<f64> for Ode2State {
    fn mul_assign(&mut self, rhs: f64) {
        self.q *= rhs;
        self.qdot *= rhs;
    }
}

impl AddAssign<&Self> for Ode2State {
    fn add_assign(&mut self, rhs: &Self) {
        self.q += &rhs.q;
        self.qdot += &rhs.qdot;
    }
}

impl Ode2State {
    /// `f(x, t) = [q̇, M(q)⁻¹ R(q, q̇, t)]`.
    fn derivative(system: &System, cdata_template: &CData, state: &Ode2State, t: f64) -> FmbdResult<Ode2State> {
        let mut cdata = cdata_template.clone();
        cdata.ode2.copy_from(&state.q);
        cdata.ode2_t.copy_from(&state.qdot);

        let mass = system.compute_mass_matrix(&cdata);
        let rhs = system.compute_ode2_rhs(&cdata, t);
        let decomposition = mass
            .cholesky()
            .ok_or_else(|| FmbdError::runtime_numerical(None, "singular mass matrix in explicit RK4 stage"))?;
        let qddot = decomposition.solve(&rhs);

        Ok(Ode2State { q: state.qdot.clone(), qdot: qddot })
    }
}

/// Fixed-step explicit RK4 over the unconstrained ODE2 subsystem (spec
/// §2, §8 scenario C). Requires `system.n_ae() == 0` — constrained
/// systems go through the implicit trapezoidal stepper in
/// [`crate::solver::generalized_alpha`] instead, since RK4 has no
/// mechanism for the Lagrange-multiplier algebraic equations.
///
/// `Ode2State` carries only `q`/`qdot`: it does not advance Data
/// coordinates. A Lie-group `RotVec` body's persistent rotation vector
/// therefore stays frozen across an RK4-stepped simulation even though
/// its `omega_bar` ODE2 slots integrate normally — only
/// [`crate::solver::generalized_alpha::step_implicit_trapezoidal`]
/// calls `System::advance_lie_group_data` to update it. Don't stage a
/// `RotVec` body through this integrator.
pub fn solve_fixed_rk4(
    system: &System,
    cdata_template: &CData,
    q0: DVector<f64>,
    qdot0: DVector<f64>,
    t_start: f64,
    t_stop: f64,
    mut dt: f64,
) -> FmbdResult<(Vec<f64>, Vec<Ode2State>)> {
    if dt.abs() <= f64::EPSILON {
        return Err(FmbdError::parameter_domain(None, "dt", "time step cannot be zero"));
    }
    if system.n_ae() != 0 {
        return Err(FmbdError::consistency(None, "explicit RK4 requires an unconstrained system (n_ae == 0)"));
    }

    let mut half_dt = dt / 2.0;
    let mut dt_6 = dt / 6.0;
    let mut x = Ode2State { q: q0, qdot: qdot0 };
    let mut t = t_start;

    let steps = ((t_stop - t_start) / dt).floor() as usize + 1;
    let mut time = Vec::with_capacity(steps + 1);
    let mut trace = Vec::with_capacity(steps + 1);
    time.push(t);
    trace.push(x.clone());

    for _ in 0..steps {
        // Land exactly on t_stop instead of overshooting on the last step.
        if (t_stop - t) < dt && (t_stop - t) > f64::EPSILON {
            dt = t_stop - t;
            half_dt = dt / 2.0;
            dt_6 = dt / 6.0;
        }

        let k1 = Ode2State::derivative(system, cdata_template, &x, t)?;

        let mut tmp = k1.clone();
        tmp *= half_dt;
        tmp += &x;
        let k2 = Ode2State::derivative(system, cdata_template, &tmp, t + half_dt)?;

        let mut tmp = k2.clone();
        tmp *= half_dt;
        tmp += &x;
        let k3 = Ode2State::derivative(system, cdata_template, &tmp, t + half_dt)?;

        let mut tmp = k3.clone();
        tmp *= dt;
        tmp += &x;
        let k4 = Ode2State::derivative(system, cdata_template, &tmp, t + dt)?;

        let mut s1 = k1;
        s1 *= dt_6;
        x += &s1;
        let mut s2 = k2;
        s2 *= 2.0 * dt_6;
        x += &s2;
        let mut s3 = k3;
        s3 *= 2.0 * dt_6;
        x += &s3;
        let mut s4 = k4;
        s4 *= dt_6;
        x += &s4;

        t += dt;
        time.push(t);
        trace.push(x.clone());
    }

    Ok((time, trace))
}
