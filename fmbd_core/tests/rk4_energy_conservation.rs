use approx::assert_abs_diff_eq;
use nalgebra::Vector3;

use fmbd_core::assembly::System;
use fmbd_core::load::Load;
use fmbd_core::marker::Marker;
use fmbd_core::node::Node;
use fmbd_core::object::body::MassPoint;
use fmbd_core::object::connector::CartesianSpringDamper;
use fmbd_core::solver::rk4::solve_fixed_rk4;

/// Two unconnected masses joined by an x-axis spring, integrated with
/// explicit RK4 (spec §8 scenario C). No constraints, so total
/// mechanical energy should stay flat over many steps.
#[test]
fn two_mass_spring_conserves_energy() {
    let mass0 = 1.5;
    let mass1 = 2.0;
    let stiffness = 40.0;
    let rest_length = 1.0;
    let stretch = 0.2;

    let nodes = vec![
        Node::Point { reference_position: Vector3::zeros(), offsets: Default::default() },
        Node::Point { reference_position: Vector3::new(rest_length, 0.0, 0.0), offsets: Default::default() },
    ];
    let bodies: Vec<Box<dyn fmbd_core::object::BodyObject>> =
        vec![Box::new(MassPoint::new(0, mass0)), Box::new(MassPoint::new(1, mass1))];
    let markers = vec![
        Marker::BodyPosition { body: 0, local_position: Vector3::zeros() },
        Marker::BodyPosition { body: 1, local_position: Vector3::zeros() },
    ];
    let mut spring = CartesianSpringDamper::new(0, 1, Vector3::new(stiffness, 0.0, 0.0), Vector3::zeros());
    spring.reference_length = Vector3::new(rest_length, 0.0, 0.0);
    let connectors: Vec<Box<dyn fmbd_core::object::ConnectorObject>> = vec![Box::new(spring)];
    let loads: Vec<Load> = Vec::new();

    let mut system = System::assemble(nodes, bodies, connectors, markers, loads, Vec::new()).unwrap();
    system.data.initial.ode2[3] = stretch;
    system.sync_initial_to_current();

    let q0 = system.data.initial.ode2.clone();
    let qdot0 = system.data.initial.ode2_t.clone();
    let cdata_template = system.data.initial.clone();

    let (_time, trace) = solve_fixed_rk4(&system, &cdata_template, q0, qdot0, 0.0, 5.0, 1e-3).unwrap();

    let energy = |q: &nalgebra::DVector<f64>, qdot: &nalgebra::DVector<f64>| -> f64 {
        let kinetic = 0.5 * mass0 * (qdot[0].powi(2) + qdot[1].powi(2) + qdot[2].powi(2))
            + 0.5 * mass1 * (qdot[3].powi(2) + qdot[4].powi(2) + qdot[5].powi(2));
        let delta_x = (rest_length + q[3]) - q[0] - rest_length;
        let potential = 0.5 * stiffness * delta_x.powi(2);
        kinetic + potential
    };

    let e0 = energy(&trace[0].q, &trace[0].qdot);
    let e_final = energy(&trace.last().unwrap().q, &trace.last().unwrap().qdot);
    assert_abs_diff_eq!(e0, e_final, epsilon = 1e-2 * e0.abs().max(1.0));
}
