use approx::assert_abs_diff_eq;
use nalgebra::Vector3;

use fmbd_core::assembly::System;
use fmbd_core::marker::Marker;
use fmbd_core::node::Node;
use fmbd_core::object::body::MassPoint;
use fmbd_core::object::connector::CoordinateConstraint;

/// Two generic point nodes pinned together along x by a
/// `CoordinateConstraint` (spec §4.5). Exercises `AssembleCoordinates`,
/// `CheckSystemIntegrity`, and `ComputeAlgebraicEquations` end to end
/// without needing a solver step.
#[test]
fn coordinate_constraint_residual_matches_manual_computation() {
    let nodes = vec![
        Node::Point { reference_position: Vector3::zeros(), offsets: Default::default() },
        Node::Point { reference_position: Vector3::new(2.0, 0.0, 0.0), offsets: Default::default() },
    ];
    let bodies: Vec<Box<dyn fmbd_core::object::BodyObject>> = vec![Box::new(MassPoint::new(0, 1.0)), Box::new(MassPoint::new(1, 1.0))];
    let markers = vec![Marker::NodeCoordinate { node: 0, coordinate: 0 }, Marker::NodeCoordinate { node: 1, coordinate: 0 }];
    let offset = 1.5;
    let connectors: Vec<Box<dyn fmbd_core::object::ConnectorObject>> = vec![Box::new(CoordinateConstraint::new(0, 1, offset))];

    let mut system = System::assemble(nodes, bodies, connectors, markers, Vec::new(), Vec::new()).unwrap();
    assert_eq!(system.n_ode2(), 6);
    assert_eq!(system.n_ae(), 1);

    system.data.initial.ode2[0] = 0.3;
    system.data.initial.ode2[3] = -0.4;
    system.sync_initial_to_current();

    let g = system.compute_algebraic_equations(&system.data.current, 0.0, false);
    assert_abs_diff_eq!(g[0], 0.3 - (-0.4) - offset, epsilon = 1e-12);

    system.data.initial.ode2_t[0] = 1.1;
    system.data.initial.ode2_t[3] = 0.2;
    system.sync_initial_to_current();

    let g_vel = system.compute_algebraic_equations(&system.data.current, 0.0, true);
    assert_abs_diff_eq!(g_vel[0], 1.1 - 0.2, epsilon = 1e-12);
}
