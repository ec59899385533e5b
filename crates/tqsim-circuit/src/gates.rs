//! Elementary gate tensors.
//!
//! Free functions build the gate tensor for given physical indices; each
//! operator carries the index itself plus its primed counterpart (four
//! legs for two-qubit gates). Basis value 0 is |0>, value 1 is |1>.
//!
//! [`OneQubitGate`] and [`TwoQubitGate`] are the site-addressed variants
//! the engine's gate-application surface consumes.

use num_complex::Complex64;

use tqsim_core::{Index, Tensor};

fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

/// Identity operator.
pub fn ident(s: &Index) -> Tensor {
    let mut ret = Tensor::zeros(vec![*s, s.primed()]);
    ret.set(&[0, 0], c(1.0, 0.0));
    ret.set(&[1, 1], c(1.0, 0.0));
    ret
}

/// Pauli X: swaps |0> and |1>.
pub fn pauli_x(s: &Index) -> Tensor {
    let mut ret = Tensor::zeros(vec![*s, s.primed()]);
    ret.set(&[0, 1], c(1.0, 0.0));
    ret.set(&[1, 0], c(1.0, 0.0));
    ret
}

/// Pauli Y: |0> -> -i, |1> -> +i off-diagonals.
pub fn pauli_y(s: &Index) -> Tensor {
    let mut ret = Tensor::zeros(vec![*s, s.primed()]);
    ret.set(&[0, 1], c(0.0, -1.0));
    ret.set(&[1, 0], c(0.0, 1.0));
    ret
}

/// Pauli Z: diagonal (1, -1).
pub fn pauli_z(s: &Index) -> Tensor {
    let mut ret = Tensor::zeros(vec![*s, s.primed()]);
    ret.set(&[0, 0], c(1.0, 0.0));
    ret.set(&[1, 1], c(-1.0, 0.0));
    ret
}

/// Projector |0><0|.
pub fn proj_0(s: &Index) -> Tensor {
    let mut ret = Tensor::zeros(vec![*s, s.primed()]);
    ret.set(&[0, 0], c(1.0, 0.0));
    ret
}

/// Projector |1><1|.
pub fn proj_1(s: &Index) -> Tensor {
    let mut ret = Tensor::zeros(vec![*s, s.primed()]);
    ret.set(&[1, 1], c(1.0, 0.0));
    ret
}

/// |1><0|: maps |0> to |1>.
pub fn proj_0_to_1(s: &Index) -> Tensor {
    let mut ret = Tensor::zeros(vec![*s, s.primed()]);
    ret.set(&[1, 0], c(1.0, 0.0));
    ret
}

/// |0><1|: maps |1> to |0>.
pub fn proj_1_to_0(s: &Index) -> Tensor {
    let mut ret = Tensor::zeros(vec![*s, s.primed()]);
    ret.set(&[0, 1], c(1.0, 0.0));
    ret
}

/// Hadamard, as the exact projector combination
/// `(|0><0| + |1><0| + |1><1| - |0><1|) / sqrt(2)`.
pub fn hadamard(s: &Index) -> Tensor {
    let inv_sqrt2 = c(std::f64::consts::FRAC_1_SQRT_2, 0.0);
    let lower = (&proj_0(s) + &proj_0_to_1(s)).scaled(inv_sqrt2);
    let upper = (&proj_1(s) - &proj_1_to_0(s)).scaled(inv_sqrt2);
    &lower + &upper
}

/// Controlled-U: `|0><0| (x) Id + |1><1| (x) U`.
///
/// `u` must be an operator over `target` and its primed counterpart.
pub fn controlled(control: &Index, target: &Index, u: &Tensor) -> Tensor {
    &(&proj_0(control) * &ident(target)) + &(&proj_1(control) * u)
}

/// Controlled NOT.
pub fn cnot(control: &Index, target: &Index) -> Tensor {
    controlled(control, target, &pauli_x(target))
}

/// Controlled Y.
pub fn cy(control: &Index, target: &Index) -> Tensor {
    controlled(control, target, &pauli_y(target))
}

/// Controlled Z.
pub fn cz(control: &Index, target: &Index) -> Tensor {
    controlled(control, target, &pauli_z(target))
}

/// Swap of two qubits.
pub fn swap(s1: &Index, s2: &Index) -> Tensor {
    let mut ret = Tensor::zeros(vec![*s1, s1.primed(), *s2, s2.primed()]);
    ret.set(&[0, 0, 0, 0], c(1.0, 0.0));
    ret.set(&[1, 1, 1, 1], c(1.0, 0.0));
    ret.set(&[0, 1, 1, 0], c(1.0, 0.0));
    ret.set(&[1, 0, 0, 1], c(1.0, 0.0));
    ret
}

/// A one-qubit gate addressed to a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OneQubitGate {
    Ident(usize),
    PauliX(usize),
    PauliY(usize),
    PauliZ(usize),
    Proj0(usize),
    Proj1(usize),
    Proj0To1(usize),
    Proj1To0(usize),
    Hadamard(usize),
}

impl OneQubitGate {
    /// The site this gate acts on.
    pub fn site(&self) -> usize {
        match *self {
            Self::Ident(s)
            | Self::PauliX(s)
            | Self::PauliY(s)
            | Self::PauliZ(s)
            | Self::Proj0(s)
            | Self::Proj1(s)
            | Self::Proj0To1(s)
            | Self::Proj1To0(s)
            | Self::Hadamard(s) => s,
        }
    }

    /// The operator tensor over the given physical index.
    pub fn tensor(&self, s: &Index) -> Tensor {
        match self {
            Self::Ident(_) => ident(s),
            Self::PauliX(_) => pauli_x(s),
            Self::PauliY(_) => pauli_y(s),
            Self::PauliZ(_) => pauli_z(s),
            Self::Proj0(_) => proj_0(s),
            Self::Proj1(_) => proj_1(s),
            Self::Proj0To1(_) => proj_0_to_1(s),
            Self::Proj1To0(_) => proj_1_to_0(s),
            Self::Hadamard(_) => hadamard(s),
        }
    }
}

/// A two-qubit gate addressed to a (control, target) or (left, right) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoQubitGate {
    Cnot(usize, usize),
    CY(usize, usize),
    CZ(usize, usize),
    Swap(usize, usize),
}

impl TwoQubitGate {
    /// The pair of sites this gate acts on.
    pub fn sites(&self) -> (usize, usize) {
        match *self {
            Self::Cnot(a, b) | Self::CY(a, b) | Self::CZ(a, b) | Self::Swap(a, b) => (a, b),
        }
    }

    /// The operator tensor over the given pair of physical indices.
    pub fn tensor(&self, s1: &Index, s2: &Index) -> Tensor {
        match self {
            Self::Cnot(_, _) => cnot(s1, s2),
            Self::CY(_, _) => cy(s1, s2),
            Self::CZ(_, _) => cz(s1, s2),
            Self::Swap(_, _) => swap(s1, s2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pauli_matrices() {
        let s = Index::new(2);

        let x = pauli_x(&s);
        assert_eq!(x.at(&[0, 1]), c(1.0, 0.0));
        assert_eq!(x.at(&[1, 0]), c(1.0, 0.0));
        assert_eq!(x.at(&[0, 0]), c(0.0, 0.0));

        let y = pauli_y(&s);
        assert_eq!(y.at(&[0, 1]), c(0.0, -1.0));
        assert_eq!(y.at(&[1, 0]), c(0.0, 1.0));

        let z = pauli_z(&s);
        assert_eq!(z.at(&[0, 0]), c(1.0, 0.0));
        assert_eq!(z.at(&[1, 1]), c(-1.0, 0.0));
        assert_eq!(z.at(&[0, 1]), c(0.0, 0.0));
    }

    #[test]
    fn test_hadamard_entries() {
        let s = Index::new(2);
        let h = hadamard(&s);
        let r = std::f64::consts::FRAC_1_SQRT_2;

        assert_relative_eq!(h.at(&[0, 0]).re, r);
        assert_relative_eq!(h.at(&[1, 0]).re, r);
        assert_relative_eq!(h.at(&[0, 1]).re, -r);
        assert_relative_eq!(h.at(&[1, 1]).re, r);
    }

    #[test]
    fn test_hadamard_action_on_basis() {
        // This convention sends |0> to (|0>+|1>)/sqrt(2) and |1> to
        // (-|0>+|1>)/sqrt(2).
        let s = Index::new(2);
        let h = hadamard(&s);
        let r = std::f64::consts::FRAC_1_SQRT_2;

        let mut ket0 = Tensor::zeros(vec![s.primed()]);
        ket0.set(&[0], c(1.0, 0.0));
        let out0 = &h * &ket0;
        assert_relative_eq!(out0.at(&[0]).re, r);
        assert_relative_eq!(out0.at(&[1]).re, r);

        let mut ket1 = Tensor::zeros(vec![s.primed()]);
        ket1.set(&[1], c(1.0, 0.0));
        let out1 = &h * &ket1;
        assert_relative_eq!(out1.at(&[0]).re, -r);
        assert_relative_eq!(out1.at(&[1]).re, r);
    }

    #[test]
    fn test_cnot_action() {
        let s1 = Index::new(2);
        let s2 = Index::new(2);
        let g = cnot(&s1, &s2).permuted(&[s1, s1.primed(), s2, s2.primed()]);

        assert_eq!(g.rank(), 4);
        // |00> -> |00>
        assert_eq!(g.at(&[0, 0, 0, 0]), c(1.0, 0.0));
        // |10> -> |11>
        assert_eq!(g.at(&[1, 1, 1, 0]), c(1.0, 0.0));
        // |10> does not stay |10>
        assert_eq!(g.at(&[1, 1, 0, 0]), c(0.0, 0.0));
    }

    #[test]
    fn test_cz_diagonal() {
        let s1 = Index::new(2);
        let s2 = Index::new(2);
        let g = cz(&s1, &s2).permuted(&[s1, s1.primed(), s2, s2.primed()]);

        assert_eq!(g.at(&[0, 0, 0, 0]), c(1.0, 0.0));
        assert_eq!(g.at(&[1, 1, 0, 0]), c(1.0, 0.0));
        assert_eq!(g.at(&[1, 1, 1, 1]), c(-1.0, 0.0));
        assert_eq!(g.at(&[0, 0, 1, 1]), c(1.0, 0.0));
    }

    #[test]
    fn test_swap_entries() {
        let s1 = Index::new(2);
        let s2 = Index::new(2);
        let g = swap(&s1, &s2);

        // |10> -> |01> and |01> -> |10>; basis-aligned inputs pass through.
        assert_eq!(g.at(&[0, 1, 1, 0]), c(1.0, 0.0));
        assert_eq!(g.at(&[1, 0, 0, 1]), c(1.0, 0.0));
        assert_eq!(g.at(&[0, 0, 0, 0]), c(1.0, 0.0));
        assert_eq!(g.at(&[1, 1, 1, 1]), c(1.0, 0.0));
        // |01> does not stay |01>.
        assert_eq!(g.at(&[0, 0, 1, 1]), c(0.0, 0.0));
    }

    #[test]
    fn test_projectors_single_entry() {
        let s = Index::new(2);
        for (gate, coords) in [
            (proj_0(&s), [0, 0]),
            (proj_1(&s), [1, 1]),
            (proj_0_to_1(&s), [1, 0]),
            (proj_1_to_0(&s), [0, 1]),
        ] {
            assert_eq!(gate.at(&coords), c(1.0, 0.0));
            assert_relative_eq!(gate.norm(), 1.0);
        }
    }

    #[test]
    fn test_gate_enums() {
        let s = Index::new(2);
        let g = OneQubitGate::Hadamard(3);
        assert_eq!(g.site(), 3);
        assert_relative_eq!((&g.tensor(&s) - &hadamard(&s)).norm(), 0.0);

        let t = TwoQubitGate::Cnot(1, 2);
        assert_eq!(t.sites(), (1, 2));
    }
}
