//! Inner products between two circuit states.

use num_complex::Complex64;

use tqsim_core::{Tensor, TruncationParams};

use crate::error::{CircuitError, InvariantViolation, Result};
use crate::state::CircuitState;

/// Compute `<a| op |b>`: the inner product of two states sandwiching a
/// per-site operator list.
///
/// Both states are decomposed at their current cursor (working on private
/// clones, so the arguments are untouched), `b`'s indices are primed
/// wholesale, and the network is contracted site by site in index order:
///
/// ```text
/// reduction = conj(M_a[0]) * op[0] * M_b[0]
/// reduction = conj(M_a[i]) * op[i] * reduction * M_b[i]   for i = 1..N
/// ```
///
/// This ordering assumes the topology numbers sites so that each site
/// shares a link with the sites before it (true for the provided
/// generators, which number in BFS order); this is the caller's
/// responsibility.
/// Each `op[i]` must carry `a`'s physical index of site `i` and its
/// primed counterpart (see [`CircuitState::operator_tensor`]); the two
/// states must share physical index identity for the sandwich to close.
///
/// # Errors
/// Fails if the operator list length does not match the state sizes, if
/// either decomposition fails, or if the contraction does not reduce to a
/// scalar (mismatched operators, unshared indices or mis-ordered
/// topology numbering).
pub fn overlap(
    a: &CircuitState,
    operators: &[Tensor],
    b: &CircuitState,
    params: &TruncationParams,
) -> Result<Complex64> {
    if a.size() != b.size() {
        return Err(CircuitError::DimensionMismatch {
            what: "second state's site count",
            expected: a.size(),
            actual: b.size(),
        });
    }
    if operators.len() != a.size() {
        return Err(CircuitError::DimensionMismatch {
            what: "operator list",
            expected: a.size(),
            actual: operators.len(),
        });
    }

    let mut bra = a.clone();
    let mut ket = b.clone();
    bra.decompose_psi(params)?;
    ket.decompose_psi(params)?;
    ket.prime_all();

    let mut reduction =
        &(&bra.site_tensor(0)?.conj() * &operators[0]) * ket.site_tensor(0)?;
    for i in 1..bra.size() {
        reduction =
            &(&(&bra.site_tensor(i)?.conj() * &operators[i]) * &reduction) * ket.site_tensor(i)?;
    }

    reduction.scalar().ok_or_else(|| {
        InvariantViolation::OverlapNotScalar {
            remaining_legs: reduction.rank(),
        }
        .into()
    })
}
