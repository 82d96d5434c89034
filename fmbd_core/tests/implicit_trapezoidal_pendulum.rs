use approx::assert_abs_diff_eq;
use nalgebra::{DVector, Vector3};

use fmbd_core::assembly::System;
use fmbd_core::config::SolverSettings;
use fmbd_core::load::Load;
use fmbd_core::marker::Marker;
use fmbd_core::node::{Node, RotationKind};
use fmbd_core::object::body::RigidBody;
use fmbd_core::object::connector::JointRevoluteZ;
use fmbd_core::rotation_param::RotationParam;
use fmbd_core::solver::generalized_alpha::{step_implicit_trapezoidal, TrapezoidalState};
use mass_properties::{CenterOfMass, Inertia, MassProperties};
use rotations::EulerParameters;

/// Planar pendulum (rigid body + revolute-Z joint to ground), stepped
/// with the implicit trapezoidal DAE integrator (spec §8 scenario A).
/// The joint is workless and gravity is conservative, so total
/// mechanical energy should stay flat over many steps.
#[test]
fn pendulum_conserves_energy_under_implicit_trapezoidal() {
    let half_length = 0.5;
    let mass = 1.2;
    let gravity = 9.81;

    let nodes = vec![
        Node::PointGround { reference_position: Vector3::zeros() },
        Node::RigidBody {
            reference_position: Vector3::new(half_length, 0.0, 0.0),
            kind: RotationKind::Ep,
            offsets: Default::default(),
        },
    ];
    let mass_properties = MassProperties::new(
        mass,
        CenterOfMass::new(0.0, 0.0, 0.0),
        Inertia::new(0.05, 0.05, 0.05, 0.0, 0.0, 0.0).unwrap(),
    )
    .unwrap();
    let bodies: Vec<Box<dyn fmbd_core::object::BodyObject>> = vec![Box::new(RigidBody::new(1, mass_properties))];

    let markers = vec![
        Marker::NodePosition { node: 0 },
        Marker::BodyPosition { body: 0, local_position: Vector3::new(-half_length, 0.0, 0.0) },
        Marker::BodyMass { body: 0 },
    ];
    let connectors: Vec<Box<dyn fmbd_core::object::ConnectorObject>> = vec![Box::new(JointRevoluteZ::new(0, 1))];
    let loads = vec![Load::MassProportional {
        marker: 2,
        body_total_mass: mass,
        acceleration: Vector3::new(0.0, -gravity, 0.0),
        user_function: Default::default(),
    }];

    let mut system = System::assemble(nodes, bodies, connectors, markers, loads, Vec::new()).unwrap();

    let identity = RotationParam::Ep(EulerParameters::IDENTITY);
    system.nodes[1].write_rotation(&mut system.data.initial, &identity);
    system.sync_initial_to_current();

    let n = system.n_ode2();
    let m = system.n_ae();
    let cdata_template = system.data.initial.clone();
    let settings = SolverSettings::default();

    let mut state = TrapezoidalState {
        q: system.data.initial.ode2.clone(),
        qdot: DVector::zeros(n),
        qddot: DVector::zeros(n),
        lambda: DVector::zeros(m),
        data: system.data.initial.data.clone(),
    };

    let dt = 0.01;
    let steps = 500;
    let mut t = 0.0;

    // CG position/velocity live directly in the rigid body's first three
    // ODE2 slots (node origin coincides with the center of mass). The
    // revolute joint holds the CG on a circle of radius `half_length`
    // about the pivot, so `|v_cg| = |omega| * half_length` always and
    // rotational kinetic energy is a fixed multiple of translational —
    // tracking translational KE + PE is equivalent to tracking total
    // mechanical energy for this configuration.
    // Height measured from the lowest point the CG can reach (directly
    // below the pivot) rather than from the pivot's own height, so the
    // potential energy baseline isn't degenerately zero at the
    // horizontal start configuration.
    let energy = |q: &DVector<f64>, qdot: &DVector<f64>| -> f64 {
        let v = Vector3::new(qdot[0], qdot[1], qdot[2]);
        let height = q[1] + half_length;
        let inertia_izz = 0.05;
        let translational_to_rotational = 1.0 + inertia_izz / (mass * half_length * half_length);
        translational_to_rotational * 0.5 * mass * v.norm_squared() + mass * gravity * height
    };

    let e0 = energy(&state.q, &state.qdot);

    for _ in 0..steps {
        state = step_implicit_trapezoidal(&system, &cdata_template, &state, t, dt, &settings).unwrap();
        t += dt;
    }

    let e_final = energy(&state.q, &state.qdot);
    assert_abs_diff_eq!(e0, e_final, epsilon = 0.05 * e0.abs());
}
