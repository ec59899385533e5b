//! Error types for the circuit state engine.

use thiserror::Error;

use tqsim_core::SvdError;

/// Result type for circuit operations.
pub type Result<T> = std::result::Result<T, CircuitError>;

/// A broken precondition or postcondition of the state engine.
///
/// These are programmer or topology-construction errors: they are raised
/// at the call that detects them, before any tensor or index table is
/// mutated, and are not retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The topology has fewer than two sites, so no cursor can exist.
    #[error("topology has {size} sites, the engine needs at least 2")]
    TooFewSites { size: usize },

    /// The initial cursor sites (0, 1) are not linked in the topology.
    #[error("sites 0 and 1 are not adjacent, cannot place the initial cursor")]
    InitialCursorNotAdjacent,

    /// A site has a degree the engine does not support.
    #[error("site {site} has degree {degree}, supported range is 1..=3")]
    UnsupportedDegree { site: usize, degree: usize },

    /// A supplied physical index has the wrong dimension.
    #[error("physical index for site {site} has dimension {dim}, expected 2")]
    BadPhysicalIndex { site: usize, dim: usize },

    /// A site id is out of range.
    #[error("site {site} is out of bounds (circuit has {size} sites)")]
    SiteOutOfBounds { site: usize, size: usize },

    /// A cursor move targeted a site already under the cursor.
    #[error("cursor move target {target} is already a cursor site ({first}, {second})")]
    TargetAtCursor {
        target: usize,
        first: usize,
        second: usize,
    },

    /// A cursor move targeted a site adjacent to neither cursor site.
    #[error("target {target} is adjacent to neither cursor site ({first}, {second})")]
    TargetNotAdjacent {
        target: usize,
        first: usize,
        second: usize,
    },

    /// A cursor move targeted a site adjacent to both cursor sites.
    #[error("target {target} is adjacent to both cursor sites ({first}, {second})")]
    TargetAdjacentToBoth {
        target: usize,
        first: usize,
        second: usize,
    },

    /// No route exists from the cursor to the requested site.
    #[error("no path from cursor ({first}, {second}) to site {target}")]
    NoRouteToSite {
        target: usize,
        first: usize,
        second: usize,
    },

    /// A two-site gate addressed sites without a connecting link.
    #[error("sites {site1} and {site2} are not adjacent in the topology")]
    SitesNotAdjacent { site1: usize, site2: usize },

    /// A gate tensor has the wrong number of legs.
    #[error("gate tensor has {legs} legs, expected 4")]
    GateLegCount { legs: usize },

    /// A gate tensor carries a leg that is not a cursor physical index or
    /// its primed counterpart.
    #[error("gate leg does not match the cursor physical indices of sites {first} and {second}")]
    GateLegMismatch { first: usize, second: usize },

    /// A per-site tensor was read while a merged-tensor edit is pending.
    #[error("site tensor {site} is stale, decompose the merged tensor first")]
    MergePending { site: usize },

    /// The state (or merged tensor) has zero norm and cannot be rescaled.
    #[error("state has zero norm")]
    ZeroNorm,

    /// An overlap contraction did not reduce to a scalar.
    #[error("overlap did not reduce to a scalar, {remaining_legs} legs remain")]
    OverlapNotScalar { remaining_legs: usize },
}

/// Error type for circuit operations.
///
/// The taxonomy follows three roots: broken invariants, numeric
/// decomposition failures, and operator-list dimension mismatches.
#[derive(Debug, Error)]
pub enum CircuitError {
    /// A precondition or postcondition of the engine was violated.
    #[error("invariant violation: {0}")]
    Invariant(#[from] InvariantViolation),

    /// The SVD kernel failed.
    #[error("decomposition failed: {0}")]
    Decomposition(#[from] SvdError),

    /// A per-site list does not match the circuit size.
    #[error("{what} has {actual} entries, expected {expected}")]
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}
