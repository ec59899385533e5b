//! Tensor-network quantum circuit simulator.
//!
//! `tqsim` simulates quantum circuits by storing the register as a
//! network of small tensors laid out over a site/link topology (a line or
//! tree of degree at most 3), instead of a full `2^N` amplitude vector.
//! Entanglement that stays local to the topology keeps the link (bond)
//! dimensions small, so memory follows the entanglement rather than the
//! qubit count.
//!
//! The workspace splits into three layers, re-exported here:
//!
//! - `tqsim-core`: named-index tensor algebra with truncated SVD,
//! - `tqsim-topology`: circuit topologies and generators,
//! - `tqsim-circuit`: the state engine, gate library and overlap
//!   evaluation.
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use num_complex::Complex64;
//! use tqsim::circuit::gates::{OneQubitGate, TwoQubitGate};
//! use tqsim::{chain, CircuitState};
//!
//! // Three qubits on a line, all |0>.
//! let topology = Arc::new(chain(3));
//! let zero = (Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0));
//! let mut state = CircuitState::new(topology, &vec![zero; 3], None).unwrap();
//!
//! // GHZ preparation.
//! state.set_cutoff(1e-10);
//! state.apply_one_qubit(&OneQubitGate::Hadamard(0)).unwrap();
//! state.apply_two_qubit(&TwoQubitGate::Cnot(0, 1)).unwrap();
//! state.apply_two_qubit(&TwoQubitGate::Cnot(1, 2)).unwrap();
//!
//! // Either both-zero or both-one outcomes, equally likely.
//! let p0 = state.probability_of_zero(0).unwrap();
//! assert!((p0 - 0.5).abs() < 1e-10);
//! ```

pub use tqsim_circuit as circuit;
pub use tqsim_core as algebra;
pub use tqsim_topology as topology;

pub use tqsim_circuit::{overlap, CircuitError, CircuitState, InvariantViolation};
pub use tqsim_core::{svd, Index, Spectrum, SvdDecomposition, SvdError, Tensor, TruncationParams};
pub use tqsim_topology::{binary_tree, chain, CircuitTopology, Neighbor, TopologyError};
