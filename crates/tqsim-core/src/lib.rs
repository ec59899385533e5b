//! Named-index tensor algebra for tree tensor network simulation.
//!
//! This crate provides the numeric substrate of the `tqsim` workspace:
//!
//! - [`Index`]: a dimensioned tensor leg with runtime identity and a prime
//!   level. Two tensors sharing an index (same identity, same prime level)
//!   are contractible along that leg.
//! - [`Tensor`]: a dense complex tensor over a list of indices. The `*`
//!   operator contracts all shared legs and degenerates to the outer
//!   product when there are none.
//! - [`svd`]: SVD factorization with a [`TruncationParams`] configuration,
//!   returning the decomposition together with [`Spectrum`] diagnostics.
//!
//! Truncation is never read from ambient state: every factorization takes
//! its parameters explicitly.

pub mod index;
pub mod index_ops;
pub mod svd;
pub mod tensor;
pub mod truncation;

pub use index::{Index, IndexId};
pub use index_ops::{common_ind, common_inds, has_ind};
pub use svd::{svd, SvdDecomposition, SvdError};
pub use tensor::Tensor;
pub use truncation::{Spectrum, TruncationParams};
