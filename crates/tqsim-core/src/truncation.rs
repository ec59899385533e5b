//! Truncation configuration and decomposition diagnostics.

/// Truncation parameters for SVD-based compression.
///
/// Both fields are explicit per call; there is no process-wide default.
/// An unset `cutoff` keeps every singular value and an unset `max_dim`
/// leaves the bond dimension unbounded.
///
/// # Semantics
///
/// `cutoff` bounds the *relative discarded weight*: singular values are
/// dropped from the smallest upwards while
/// `sum_discarded(sigma_i^2) <= cutoff * sum(sigma_i^2)`.
/// At least one value is always kept.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TruncationParams {
    /// Relative discarded-weight bound. `None` keeps everything.
    pub cutoff: Option<f64>,
    /// Maximum bond dimension. `None` means unbounded.
    pub max_dim: Option<usize>,
}

impl TruncationParams {
    /// Create parameters that keep everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the relative discarded-weight cutoff.
    #[must_use]
    pub fn with_cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    /// Set the maximum bond dimension.
    #[must_use]
    pub fn with_max_dim(mut self, max_dim: usize) -> Self {
        self.max_dim = Some(max_dim);
        self
    }

    /// Effective maximum bond dimension (`usize::MAX` when unbounded).
    #[must_use]
    pub fn effective_max_dim(&self) -> usize {
        self.max_dim.unwrap_or(usize::MAX)
    }
}

/// Diagnostics of one truncated decomposition.
///
/// Singular values are reported as returned by the factorization, before
/// any renormalization the caller applies to the singular-value tensor.
#[derive(Debug, Clone, Default)]
pub struct Spectrum {
    /// Kept singular values, descending.
    pub singular_values: Vec<f64>,
    /// Sum of the squared discarded singular values.
    pub discarded_weight: f64,
    /// Discarded weight relative to the total squared norm
    /// (0 when nothing was discarded or the input was zero).
    pub truncation_error: f64,
}

impl Spectrum {
    /// Bond dimension retained by the decomposition.
    pub fn bond_dim(&self) -> usize {
        self.singular_values.len()
    }
}
