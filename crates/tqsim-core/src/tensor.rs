//! Dense complex tensor with named legs.

use std::ops::{Add, Mul, Sub};

use nalgebra::DMatrix;
use num_complex::Complex64;
use num_traits::Zero;

use crate::index::Index;

/// Dense tensor over a list of named legs.
///
/// Elements are stored row-major in the order of `indices`. Two tensors
/// contract over every leg they share (same identity and prime level);
/// legs are never matched positionally.
#[derive(Clone)]
pub struct Tensor {
    indices: Vec<Index>,
    data: Vec<Complex64>,
}

impl Tensor {
    /// Create a tensor from legs and row-major data.
    ///
    /// # Panics
    /// Panics if the data length does not match the product of the leg
    /// dimensions, or if the same leg appears twice.
    pub fn new(indices: Vec<Index>, data: Vec<Complex64>) -> Self {
        let expected: usize = indices.iter().map(|i| i.dim).product();
        assert_eq!(
            data.len(),
            expected,
            "data length {} does not match leg dimensions (product {})",
            data.len(),
            expected
        );
        for (n, idx) in indices.iter().enumerate() {
            assert!(
                !indices[n + 1..].contains(idx),
                "tensor legs must be unique, {idx:?} appears twice"
            );
        }
        Self { indices, data }
    }

    /// Create a zero-filled tensor over the given legs.
    pub fn zeros(indices: Vec<Index>) -> Self {
        let len: usize = indices.iter().map(|i| i.dim).product();
        Self::new(indices, vec![Complex64::zero(); len])
    }

    /// The legs of this tensor.
    pub fn indices(&self) -> &[Index] {
        &self.indices
    }

    /// Number of legs.
    pub fn rank(&self) -> usize {
        self.indices.len()
    }

    /// Leg dimensions, in leg order.
    pub fn dims(&self) -> Vec<usize> {
        self.indices.iter().map(|i| i.dim).collect()
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the tensor has no elements (possible only for a dim-0 leg).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw row-major element slice.
    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    /// Position of `ind` among the legs.
    pub fn position(&self, ind: &Index) -> Option<usize> {
        self.indices.iter().position(|i| i == ind)
    }

    fn linear(&self, coords: &[usize]) -> usize {
        assert_eq!(coords.len(), self.indices.len(), "coordinate rank mismatch");
        let mut lin = 0;
        for (c, idx) in coords.iter().zip(&self.indices) {
            assert!(*c < idx.dim, "coordinate {c} out of range for {idx:?}");
            lin = lin * idx.dim + c;
        }
        lin
    }

    /// Element at the given coordinates (one per leg, in leg order).
    pub fn at(&self, coords: &[usize]) -> Complex64 {
        self.data[self.linear(coords)]
    }

    /// Set the element at the given coordinates.
    pub fn set(&mut self, coords: &[usize], value: Complex64) {
        let lin = self.linear(coords);
        self.data[lin] = value;
    }

    /// Reorder legs to `order`, permuting the data accordingly.
    ///
    /// # Panics
    /// Panics if `order` is not a permutation of the tensor's legs.
    #[must_use]
    pub fn permuted(&self, order: &[Index]) -> Self {
        if order == self.indices.as_slice() {
            return self.clone();
        }
        let perm = permutation_of(&self.indices, order);

        let old_dims = self.dims();
        let new_dims: Vec<usize> = order.iter().map(|i| i.dim).collect();

        let mut old_strides = vec![1usize; old_dims.len()];
        for ax in (0..old_dims.len().saturating_sub(1)).rev() {
            old_strides[ax] = old_strides[ax + 1] * old_dims[ax + 1];
        }

        let mut data = vec![Complex64::zero(); self.data.len()];
        let mut coords = vec![0usize; new_dims.len()];
        for (lin, slot) in data.iter_mut().enumerate() {
            // Decompose `lin` into coordinates over the new axis order.
            let mut rem = lin;
            for ax in (0..new_dims.len()).rev() {
                coords[ax] = rem % new_dims[ax];
                rem /= new_dims[ax];
            }
            let mut old_lin = 0;
            for (ax, &c) in coords.iter().enumerate() {
                old_lin += c * old_strides[perm[ax]];
            }
            *slot = self.data[old_lin];
        }

        Self {
            indices: order.to_vec(),
            data,
        }
    }

    /// Elementwise complex conjugate.
    #[must_use]
    pub fn conj(&self) -> Self {
        Self {
            indices: self.indices.clone(),
            data: self.data.iter().map(|z| z.conj()).collect(),
        }
    }

    /// Frobenius norm.
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt()
    }

    /// Tensor scaled by a complex factor.
    #[must_use]
    pub fn scaled(&self, factor: Complex64) -> Self {
        Self {
            indices: self.indices.clone(),
            data: self.data.iter().map(|z| z * factor).collect(),
        }
    }

    /// Extract the scalar value of a rank-0 (single-element) tensor.
    ///
    /// Returns `None` if any legs remain.
    pub fn scalar(&self) -> Option<Complex64> {
        if self.indices.is_empty() && self.data.len() == 1 {
            Some(self.data[0])
        } else {
            None
        }
    }

    /// Copy of the tensor with every leg's prime level raised by one.
    #[must_use]
    pub fn primed_all(&self) -> Self {
        Self {
            indices: self.indices.iter().map(|i| i.primed()).collect(),
            data: self.data.clone(),
        }
    }

    /// Copy of the tensor with the prime level of each leg matching one of
    /// `targets` raised by one. Legs not listed are untouched.
    #[must_use]
    pub fn primed(&self, targets: &[Index]) -> Self {
        Self {
            indices: self
                .indices
                .iter()
                .map(|i| if targets.contains(i) { i.primed() } else { *i })
                .collect(),
            data: self.data.clone(),
        }
    }

    /// Contract with `other` over all shared legs.
    ///
    /// The result carries `self`'s unshared legs followed by `other`'s.
    /// With no shared legs this is the outer product; with no unshared
    /// legs it is a rank-0 scalar tensor.
    #[must_use]
    pub fn contract(&self, other: &Tensor) -> Tensor {
        let shared: Vec<Index> = self
            .indices
            .iter()
            .filter(|i| other.indices.contains(i))
            .copied()
            .collect();
        let left: Vec<Index> = self
            .indices
            .iter()
            .filter(|i| !shared.contains(i))
            .copied()
            .collect();
        let right: Vec<Index> = other
            .indices
            .iter()
            .filter(|i| !shared.contains(i))
            .copied()
            .collect();

        let a_order: Vec<Index> = left.iter().chain(&shared).copied().collect();
        let b_order: Vec<Index> = shared.iter().chain(&right).copied().collect();
        let a = self.permuted(&a_order);
        let b = other.permuted(&b_order);

        let m: usize = left.iter().map(|i| i.dim).product();
        let k: usize = shared.iter().map(|i| i.dim).product();
        let n: usize = right.iter().map(|i| i.dim).product();

        let ma = DMatrix::from_fn(m, k, |r, c| a.data[r * k + c]);
        let mb = DMatrix::from_fn(k, n, |r, c| b.data[r * n + c]);
        let prod = ma * mb;

        let mut data = Vec::with_capacity(m * n);
        for r in 0..m {
            for c in 0..n {
                data.push(prod[(r, c)]);
            }
        }

        let indices: Vec<Index> = left.into_iter().chain(right).collect();
        Tensor::new(indices, data)
    }

    /// Elementwise sum with `other`, matching legs by identity.
    ///
    /// # Panics
    /// Panics if the two tensors do not carry the same leg set.
    #[must_use]
    pub fn add(&self, other: &Tensor) -> Tensor {
        let rhs = other.permuted(&self.indices);
        let data = self
            .data
            .iter()
            .zip(&rhs.data)
            .map(|(x, y)| x + y)
            .collect();
        Tensor {
            indices: self.indices.clone(),
            data,
        }
    }

    /// Elementwise difference with `other`, matching legs by identity.
    ///
    /// # Panics
    /// Panics if the two tensors do not carry the same leg set.
    #[must_use]
    pub fn sub(&self, other: &Tensor) -> Tensor {
        self.add(&other.scaled(Complex64::new(-1.0, 0.0)))
    }
}

/// Compute the permutation mapping `order[i]` to its position in `from`.
///
/// # Panics
/// Panics if `order` is not a permutation of `from`.
fn permutation_of(from: &[Index], order: &[Index]) -> Vec<usize> {
    assert_eq!(
        from.len(),
        order.len(),
        "permutation must cover all {} legs",
        from.len()
    );
    let mut used = vec![false; from.len()];
    let mut perm = Vec::with_capacity(order.len());
    for idx in order {
        let pos = from
            .iter()
            .position(|i| i == idx)
            .unwrap_or_else(|| panic!("leg {idx:?} is not part of the tensor"));
        assert!(!used[pos], "duplicate leg {idx:?} in permutation");
        used[pos] = true;
        perm.push(pos);
    }
    perm
}

impl Mul for &Tensor {
    type Output = Tensor;

    fn mul(self, rhs: &Tensor) -> Tensor {
        self.contract(rhs)
    }
}

impl Add for &Tensor {
    type Output = Tensor;

    fn add(self, rhs: &Tensor) -> Tensor {
        Tensor::add(self, rhs)
    }
}

impl Sub for &Tensor {
    type Output = Tensor;

    fn sub(self, rhs: &Tensor) -> Tensor {
        Tensor::sub(self, rhs)
    }
}

impl std::fmt::Debug for Tensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tensor{:?} ({} elems)", self.indices, self.data.len())
    }
}
