//! Truncated SVD factorization of tensors.

use nalgebra::DMatrix;
use num_complex::Complex64;
use thiserror::Error;

use crate::index::Index;
use crate::tensor::Tensor;
use crate::truncation::{Spectrum, TruncationParams};

/// Error type for SVD factorization.
#[derive(Debug, Error)]
pub enum SvdError {
    /// The iterative SVD kernel did not converge.
    #[error("SVD did not converge for a {rows}x{cols} matrix")]
    NonConvergence { rows: usize, cols: usize },

    /// The requested left/right leg split is not a valid bipartition.
    #[error("invalid factorization split: {message}")]
    InvalidSplit { message: String },
}

/// Result of a truncated SVD of a tensor.
///
/// The factors satisfy `u * s * v ≈ input`, with equality when nothing was
/// truncated:
/// - `u` carries the requested left legs plus a fresh u-side bond index,
/// - `s` is diagonal over (u-side bond, v-side bond),
/// - `v` carries the remaining legs plus the v-side bond index.
///
/// The bond shared between two factors is recoverable with
/// [`common_inds`](crate::index_ops::common_inds).
#[derive(Debug)]
pub struct SvdDecomposition {
    pub u: Tensor,
    pub s: Tensor,
    pub v: Tensor,
    /// Diagnostics: kept singular values and discarded weight.
    pub spectrum: Spectrum,
}

/// Factor `t` into `U * S * V` with `left` legs on the U side.
///
/// The tensor is unfolded into a matrix with `left` legs as rows and the
/// remaining legs as columns, decomposed, and truncated according to
/// `params` (relative discarded weight ≤ cutoff, bond dimension ≤
/// max_dim, at least one value kept).
///
/// # Errors
/// Returns [`SvdError::InvalidSplit`] if `left` is empty, covers every
/// leg, or lists a leg the tensor does not have, and
/// [`SvdError::NonConvergence`] if the numeric kernel fails.
pub fn svd(t: &Tensor, left: &[Index], params: &TruncationParams) -> Result<SvdDecomposition, SvdError> {
    for ind in left {
        if t.position(ind).is_none() {
            return Err(SvdError::InvalidSplit {
                message: format!("left leg {ind:?} is not part of the tensor"),
            });
        }
    }
    let right: Vec<Index> = t
        .indices()
        .iter()
        .filter(|i| !left.contains(i))
        .copied()
        .collect();
    if left.is_empty() || right.is_empty() {
        return Err(SvdError::InvalidSplit {
            message: format!(
                "split must leave legs on both sides (left {}, right {})",
                left.len(),
                right.len()
            ),
        });
    }

    // Unfold: row-major data over [left..., right...] is the matrix itself.
    let order: Vec<Index> = left.iter().chain(&right).copied().collect();
    let unfolded = t.permuted(&order);
    let m: usize = left.iter().map(|i| i.dim).product();
    let n: usize = right.iter().map(|i| i.dim).product();
    let k = m.min(n);

    let a = DMatrix::from_fn(m, n, |r, c| unfolded.data()[r * n + c]);
    let dec = a
        .try_svd(true, true, f64::EPSILON, 4096)
        .ok_or(SvdError::NonConvergence { rows: m, cols: n })?;
    let u_mat = dec.u.expect("requested U factor");
    let vt_mat = dec.v_t.expect("requested V^H factor");
    let sv = dec.singular_values;

    // nalgebra does not guarantee ordering; sort descending ourselves.
    let mut by_size: Vec<usize> = (0..k).collect();
    by_size.sort_by(|&x, &y| sv[y].partial_cmp(&sv[x]).expect("singular values are finite"));
    let sigma: Vec<f64> = by_size.iter().map(|&i| sv[i]).collect();

    let mut r = match params.cutoff {
        None => k,
        Some(cutoff) => retained_rank(&sigma, cutoff),
    };
    r = r.min(params.effective_max_dim()).max(1);

    let total: f64 = sigma.iter().map(|s| s * s).sum();
    let discarded_weight: f64 = sigma[r..].iter().map(|s| s * s).sum();
    let spectrum = Spectrum {
        singular_values: sigma[..r].to_vec(),
        discarded_weight,
        truncation_error: if total > 0.0 { discarded_weight / total } else { 0.0 },
    };

    let bond_u = Index::new_link(r);
    let bond_v = Index::new_link(r);

    // U: [left..., bond_u], m x r row-major.
    let mut u_indices = left.to_vec();
    u_indices.push(bond_u);
    let mut u_data = Vec::with_capacity(m * r);
    for row in 0..m {
        for &src in &by_size[..r] {
            u_data.push(u_mat[(row, src)]);
        }
    }
    let u = Tensor::new(u_indices, u_data);

    // S: diagonal over (bond_u, bond_v).
    let mut s = Tensor::zeros(vec![bond_u, bond_v]);
    for (i, &value) in spectrum.singular_values.iter().enumerate() {
        s.set(&[i, i], Complex64::new(value, 0.0));
    }

    // V: [right..., bond_v], from the conjugate transpose of V^H.
    let mut v_indices = right.clone();
    v_indices.push(bond_v);
    let mut v_data = Vec::with_capacity(n * r);
    for row in 0..n {
        for &src in &by_size[..r] {
            v_data.push(vt_mat[(src, row)].conj());
        }
    }
    let v = Tensor::new(v_indices, v_data);

    Ok(SvdDecomposition { u, s, v, spectrum })
}

/// Smallest retained rank whose relative discarded weight stays within
/// `cutoff`. Keeps at least one value.
fn retained_rank(sigma: &[f64], cutoff: f64) -> usize {
    let total: f64 = sigma.iter().map(|s| s * s).sum();
    if total == 0.0 {
        return 1;
    }
    let budget = cutoff * total;

    let mut discarded = 0.0;
    let mut r = sigma.len();
    for i in (0..sigma.len()).rev() {
        let w = sigma[i] * sigma[i];
        if discarded + w <= budget {
            discarded += w;
            r = i;
        } else {
            break;
        }
    }
    r.max(1)
}
