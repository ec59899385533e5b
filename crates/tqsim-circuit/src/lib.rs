//! Tensor-network quantum circuit simulation.
//!
//! A [`CircuitState`] stores the wave function of a qubit register as one
//! small tensor per site of a [`CircuitTopology`], with a two-site cursor
//! that slides across the topology to wherever a gate should land. Memory
//! scales with the bond dimension of the links instead of `2^N`, so
//! circuits whose entanglement stays local to the topology can be
//! simulated far beyond full-state-vector sizes.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use num_complex::Complex64;
//! use tqsim_circuit::gates::{OneQubitGate, TwoQubitGate};
//! use tqsim_circuit::{overlap, CircuitState};
//! use tqsim_core::TruncationParams;
//! use tqsim_topology::chain;
//!
//! let topology = Arc::new(chain(4));
//! let zero = (Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0));
//! let mut state = CircuitState::new(topology, &vec![zero; 4], None).unwrap();
//!
//! // Entangle the first two qubits.
//! state.apply_one_qubit(&OneQubitGate::Hadamard(0)).unwrap();
//! state.apply_two_qubit(&TwoQubitGate::Cnot(0, 1)).unwrap();
//!
//! // Self-overlap of a normalized state is 1.
//! let ops: Vec<_> = (0..4)
//!     .map(|i| state.operator_tensor(&OneQubitGate::Ident(i)).unwrap())
//!     .collect();
//! let value = overlap(&state, &ops, &state, &TruncationParams::new()).unwrap();
//! assert!((value.re - 1.0).abs() < 1e-10);
//! ```

pub mod error;
pub mod gates;
pub mod overlap;
pub mod state;

pub use error::{CircuitError, InvariantViolation};
pub use gates::{OneQubitGate, TwoQubitGate};
pub use overlap::overlap;
pub use state::CircuitState;
