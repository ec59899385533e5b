//! Tensor index (leg) type with runtime identity and prime levels.

use std::cell::RefCell;

use rand::Rng;

/// Runtime identity of an index.
///
/// Uses u128 for extremely low collision probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexId(pub u128);

/// A named, dimensioned tensor leg.
///
/// An `Index` is a cheap handle: copying it yields the *same* leg, not a
/// new one. Two tensors that carry an equal `Index` are contractible along
/// it.
///
/// **Equality**: two indices are equal if and only if their `id` and
/// `prime` level match. The tag is metadata only and never participates in
/// comparisons.
///
/// The prime level distinguishes paired variants of the same leg: a gate
/// tensor carries a physical index together with its primed counterpart,
/// and a bra network is kept distinguishable from a ket network sharing
/// the same physical indices by priming one of them wholesale.
#[derive(Clone, Copy)]
pub struct Index {
    /// Identity of this leg.
    pub id: IndexId,
    /// Dimension (number of basis values) of this leg.
    pub dim: usize,
    /// Prime level; 0 for a freshly created index.
    pub prime: u32,
    /// Human-readable tag for debugging ("Site", "Link", ...).
    pub tag: &'static str,
}

impl Index {
    /// Create a new index with a fresh identity and the given dimension.
    pub fn new(dim: usize) -> Self {
        Self::with_tag(dim, "")
    }

    /// Create a new index with a fresh identity, dimension and tag.
    pub fn with_tag(dim: usize, tag: &'static str) -> Self {
        Self {
            id: IndexId(generate_id()),
            dim,
            prime: 0,
            tag,
        }
    }

    /// Create a new bond index with the "Link" tag.
    ///
    /// Used by factorizations to label the internal bond connecting the
    /// factors.
    pub fn new_link(dim: usize) -> Self {
        Self::with_tag(dim, "Link")
    }

    /// Dimension of this index.
    pub fn size(&self) -> usize {
        self.dim
    }

    /// The primed variant of this index (same identity, prime level + 1).
    #[must_use]
    pub fn primed(&self) -> Self {
        self.primed_by(1)
    }

    /// The variant of this index with the prime level raised by `n`.
    #[must_use]
    pub fn primed_by(&self, n: u32) -> Self {
        Self {
            prime: self.prime + n,
            ..*self
        }
    }

    /// Whether `other` is the same leg ignoring prime levels.
    pub fn same_id(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

// Equality and Hash: identity and prime level only.
impl PartialEq for Index {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.prime == other.prime
    }
}

impl Eq for Index {}

impl std::hash::Hash for Index {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.prime.hash(state);
    }
}

impl std::fmt::Debug for Index {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short id: the low 16 bits are plenty for telling legs apart in a dump.
        write!(f, "({}|{:04x}", self.dim, self.id.0 & 0xffff)?;
        if !self.tag.is_empty() {
            write!(f, "|{}", self.tag)?;
        }
        write!(f, ")")?;
        for _ in 0..self.prime {
            write!(f, "'")?;
        }
        Ok(())
    }
}

thread_local! {
    /// Thread-local random number generator for ID generation.
    ///
    /// Each thread has its own RNG, so ID generation needs no global
    /// synchronization.
    static ID_RNG: RefCell<rand::rngs::ThreadRng> = RefCell::new(rand::thread_rng());
}

/// Generate a unique random ID for new indices (thread-safe).
pub(crate) fn generate_id() -> u128 {
    ID_RNG.with(|rng| rng.borrow_mut().gen())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_id_generation_unique() {
        let ids: HashSet<u128> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_index_equality_by_identity() {
        let i1 = Index::new(2);
        let i2 = i1;
        let i3 = Index::new(2);

        assert_eq!(i1, i2);
        assert_ne!(i1, i3);
    }

    #[test]
    fn test_prime_distinguishes() {
        let s = Index::with_tag(2, "Site");
        let sp = s.primed();

        assert_ne!(s, sp);
        assert!(s.same_id(&sp));
        assert_eq!(sp.prime, 1);
        assert_eq!(sp.dim, s.dim);
        assert_eq!(sp.primed_by(2).prime, 3);
    }

    #[test]
    fn test_index_in_hashset() {
        let s = Index::new(2);
        let mut set = HashSet::new();
        set.insert(s);

        assert!(set.contains(&s));
        assert!(!set.contains(&s.primed()));
        assert!(!set.contains(&Index::new(2)));
    }

    #[test]
    fn test_link_tag() {
        let l = Index::new_link(7);
        assert_eq!(l.tag, "Link");
        assert_eq!(l.size(), 7);
        assert_eq!(l.prime, 0);
    }
}
