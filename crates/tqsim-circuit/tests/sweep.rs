//! Cursor sweeps: round-trip fidelity, truncation, preconditions.

use std::sync::Arc;

use approx::assert_relative_eq;
use num_complex::Complex64;
use tqsim_circuit::gates::{OneQubitGate, TwoQubitGate};
use tqsim_circuit::{CircuitError, CircuitState, InvariantViolation};
use tqsim_core::{Tensor, TruncationParams};
use tqsim_topology::{binary_tree, chain, CircuitTopology};

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

fn all_zero(n: usize) -> Vec<(Complex64, Complex64)> {
    vec![(c(1.0, 0.0), c(0.0, 0.0)); n]
}

/// Contract the merged tensor with every site tensor outside the cursor.
fn full_state(state: &CircuitState) -> Tensor {
    let (first, second) = state.cursor();
    let mut full = state.merged_tensor().clone();
    for site in 0..state.size() {
        if site != first && site != second {
            full = &full * state.site_tensor(site).unwrap();
        }
    }
    full
}

/// The product state tensor for the given per-site amplitude pairs.
fn product_state(state: &CircuitState, qubits: &[(Complex64, Complex64)]) -> Tensor {
    let mut expected = Tensor::zeros(state.site_indices().to_vec());
    let n = qubits.len();
    for basis in 0..(1usize << n) {
        let mut coords = vec![0usize; n];
        let mut amp = c(1.0, 0.0);
        for (site, coord) in coords.iter_mut().enumerate() {
            let bit = (basis >> site) & 1;
            *coord = bit;
            amp *= if bit == 0 { qubits[site].0 } else { qubits[site].1 };
        }
        expected.set(&coords, amp);
    }
    expected
}

#[test]
fn test_round_trip_sweep_preserves_state() {
    let topology = Arc::new(chain(4));
    let qubits = vec![
        (c(0.6, 0.0), c(0.8, 0.0)),
        (c(1.0, 0.0), c(0.0, 0.0)),
        (c(std::f64::consts::FRAC_1_SQRT_2, 0.0), c(0.0, std::f64::consts::FRAC_1_SQRT_2)),
        (c(0.0, 0.0), c(1.0, 0.0)),
    ];
    let mut state = CircuitState::new(Arc::clone(&topology), &qubits, None).unwrap();
    let expected = product_state(&state, &qubits);

    // Sweep the cursor across every edge and back.
    let exact = TruncationParams::new().with_cutoff(0.0);
    for target in [2, 3, 1, 0] {
        state.shift_to(target, &exact).unwrap();
    }
    assert_eq!(state.cursor(), (0, 1));

    let full = full_state(&state);
    assert_relative_eq!(full.norm(), 1.0, epsilon = 1e-10);

    // Equal to the original product state up to a global phase.
    let dot = (&full.conj() * &expected).scalar().unwrap();
    assert_relative_eq!(dot.norm(), 1.0, epsilon = 1e-10);
}

#[test]
fn test_sweep_across_binary_tree() {
    let topology = Arc::new(binary_tree(3));
    let n = topology.number_of_bits();
    let mut state = CircuitState::new(Arc::clone(&topology), &all_zero(n), None).unwrap();

    // Walk the cursor over every edge of the tree: 0-1, 1-3, 1-4, 0-2,
    // 2-5, 2-6, touching each leaf.
    for target in [3, 4, 0, 2, 5, 6] {
        state.move_cursor_to_site(target).unwrap();
    }

    let full = full_state(&state);
    assert_relative_eq!(full.norm(), 1.0, epsilon = 1e-10);

    // Still the all-zero product state.
    let mut coords = vec![0usize; n];
    assert_relative_eq!(full.permuted(state.site_indices()).at(&coords).norm(), 1.0, epsilon = 1e-10);
    coords[3] = 1;
    assert_relative_eq!(full.permuted(state.site_indices()).at(&coords).norm(), 0.0, epsilon = 1e-10);
}

#[test]
fn test_decompose_reports_spectrum() {
    let topology = Arc::new(chain(3));
    let mut state = CircuitState::new(Arc::clone(&topology), &all_zero(3), None).unwrap();
    state.apply_one_qubit(&OneQubitGate::Hadamard(0)).unwrap();
    state.apply_two_qubit(&TwoQubitGate::Cnot(0, 1)).unwrap();

    // Bell pair across the cursor edge: two equal singular values.
    let spectrum = state.decompose_psi(&TruncationParams::new()).unwrap();
    assert_eq!(spectrum.bond_dim(), 2);
    let r = std::f64::consts::FRAC_1_SQRT_2;
    assert_relative_eq!(spectrum.singular_values[0], r, epsilon = 1e-10);
    assert_relative_eq!(spectrum.singular_values[1], r, epsilon = 1e-10);
    assert_relative_eq!(spectrum.truncation_error, 0.0);
}

#[test]
fn test_shift_truncates_to_max_dim() {
    let topology = Arc::new(chain(3));
    let mut state = CircuitState::new(Arc::clone(&topology), &all_zero(3), None).unwrap();
    state.apply_one_qubit(&OneQubitGate::Hadamard(0)).unwrap();
    state.apply_two_qubit(&TwoQubitGate::Cnot(0, 1)).unwrap();

    // Cutting the Bell pair down to bond dimension 1 discards half the
    // weight; the engine renormalizes what is kept.
    let spectrum = state
        .shift_to(2, &TruncationParams::new().with_max_dim(1))
        .unwrap();
    assert_eq!(spectrum.bond_dim(), 1);
    assert_relative_eq!(spectrum.discarded_weight, 0.5, epsilon = 1e-10);
    assert_relative_eq!(spectrum.truncation_error, 0.5, epsilon = 1e-10);
    assert_relative_eq!(state.merged_tensor().norm(), 1.0, epsilon = 1e-10);
}

#[test]
fn test_normalize_after_projection() {
    let topology = Arc::new(chain(2));
    let mut state = CircuitState::new(Arc::clone(&topology), &all_zero(2), None).unwrap();
    state.apply_one_qubit(&OneQubitGate::Hadamard(0)).unwrap();
    state.apply_one_qubit(&OneQubitGate::Proj0(0)).unwrap();

    // The projector is not unitary: norm drops to 1/sqrt(2).
    assert_relative_eq!(
        state.merged_tensor().norm(),
        std::f64::consts::FRAC_1_SQRT_2,
        epsilon = 1e-10
    );
    state.normalize().unwrap();
    assert_relative_eq!(state.merged_tensor().norm(), 1.0, epsilon = 1e-10);
}

#[test]
fn test_shift_preconditions() {
    let topology = Arc::new(chain(4));
    let mut state = CircuitState::new(Arc::clone(&topology), &all_zero(4), None).unwrap();
    let params = TruncationParams::new();

    // Target already under the cursor.
    assert!(matches!(
        state.shift_to(1, &params).unwrap_err(),
        CircuitError::Invariant(InvariantViolation::TargetAtCursor { target: 1, .. })
    ));
    // Target adjacent to neither cursor site.
    assert!(matches!(
        state.shift_to(3, &params).unwrap_err(),
        CircuitError::Invariant(InvariantViolation::TargetNotAdjacent { target: 3, .. })
    ));
    // Target out of bounds.
    assert!(matches!(
        state.shift_to(9, &params).unwrap_err(),
        CircuitError::Invariant(InvariantViolation::SiteOutOfBounds { site: 9, .. })
    ));
    // The failed calls must not have moved the cursor.
    assert_eq!(state.cursor(), (0, 1));
}

#[test]
fn test_shift_rejects_target_adjacent_to_both() {
    // A triangle makes the target adjacent to both cursor sites.
    let mut topology = CircuitTopology::new(3);
    topology.generate_link(0, 1).unwrap();
    topology.generate_link(1, 2).unwrap();
    topology.generate_link(0, 2).unwrap();

    let mut state = CircuitState::new(Arc::new(topology), &all_zero(3), None).unwrap();
    assert!(matches!(
        state.shift_to(2, &TruncationParams::new()).unwrap_err(),
        CircuitError::Invariant(InvariantViolation::TargetAdjacentToBoth { target: 2, .. })
    ));
}

#[test]
fn test_construction_preconditions() {
    // Degree 4 is rejected.
    let mut star = CircuitTopology::new(5);
    for leaf in 1..5 {
        star.generate_link(0, leaf).unwrap();
    }
    assert!(matches!(
        CircuitState::new(Arc::new(star), &all_zero(5), None).unwrap_err(),
        CircuitError::Invariant(InvariantViolation::UnsupportedDegree { site: 0, degree: 4 })
    ));

    // Fewer than two sites cannot hold a cursor.
    assert!(matches!(
        CircuitState::new(Arc::new(chain(1)), &all_zero(1), None).unwrap_err(),
        CircuitError::Invariant(InvariantViolation::TooFewSites { size: 1 })
    ));

    // Amplitude list must match the site count.
    assert!(matches!(
        CircuitState::new(Arc::new(chain(3)), &all_zero(2), None).unwrap_err(),
        CircuitError::DimensionMismatch { expected: 3, actual: 2, .. }
    ));

    // Sites 0 and 1 must be adjacent for the initial cursor.
    let mut topology = CircuitTopology::new(3);
    topology.generate_link(0, 2).unwrap();
    topology.generate_link(2, 1).unwrap();
    assert!(matches!(
        CircuitState::new(Arc::new(topology), &all_zero(3), None).unwrap_err(),
        CircuitError::Invariant(InvariantViolation::InitialCursorNotAdjacent)
    ));
}

#[test]
fn test_site_tensor_stale_after_apply() {
    let topology = Arc::new(chain(2));
    let mut state = CircuitState::new(Arc::clone(&topology), &all_zero(2), None).unwrap();

    assert!(state.site_tensor(0).is_ok());
    state.apply_one_qubit(&OneQubitGate::PauliX(0)).unwrap();
    assert!(matches!(
        state.site_tensor(0).unwrap_err(),
        CircuitError::Invariant(InvariantViolation::MergePending { site: 0 })
    ));
    assert!(state.site_tensors().is_err());

    state.decompose_psi(&TruncationParams::new()).unwrap();
    assert!(state.site_tensor(0).is_ok());
    assert!(state.site_tensors().is_ok());
}

#[test]
fn test_apply_rejects_foreign_gate() {
    let topology = Arc::new(chain(3));
    let mut state = CircuitState::new(Arc::clone(&topology), &all_zero(3), None).unwrap();

    // Gate on a site outside the cursor.
    let s2 = *state.site_index(2);
    let s0 = *state.site_index(0);
    let foreign = &tqsim_circuit::gates::pauli_x(&s2) * &tqsim_circuit::gates::ident(&s0);
    assert!(matches!(
        state.apply(&foreign).unwrap_err(),
        CircuitError::Invariant(InvariantViolation::GateLegMismatch { .. })
    ));

    // Wrong leg count.
    let two_legs = tqsim_circuit::gates::pauli_x(&s0);
    assert!(matches!(
        state.apply(&two_legs).unwrap_err(),
        CircuitError::Invariant(InvariantViolation::GateLegCount { legs: 2 })
    ));
}

#[test]
fn test_prime_all_shifts_every_index() {
    let topology = Arc::new(chain(2));
    let mut state = CircuitState::new(Arc::clone(&topology), &all_zero(2), None).unwrap();
    let before = *state.site_index(0);

    state.prime_all();
    let after = *state.site_index(0);
    assert!(before.same_id(&after));
    assert_eq!(after.prime, before.prime + 1);
    assert_eq!(state.link_index(0).prime, 1);

    // Gates built against the primed indices still apply cleanly.
    state.apply_one_qubit(&OneQubitGate::PauliX(0)).unwrap();
    assert!(state.decompose_psi(&TruncationParams::new()).is_ok());
}
