//! Helpers operating on slices of indices.

use crate::index::Index;

/// Indices present in both `a` and `b`, in `a`'s order.
pub fn common_inds(a: &[Index], b: &[Index]) -> Vec<Index> {
    a.iter().filter(|i| b.contains(i)).copied().collect()
}

/// The first index present in both `a` and `b`, if any.
pub fn common_ind(a: &[Index], b: &[Index]) -> Option<Index> {
    a.iter().find(|i| b.contains(i)).copied()
}

/// Whether `inds` contains `ind`.
pub fn has_ind(inds: &[Index], ind: &Index) -> bool {
    inds.contains(ind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_inds() {
        let i = Index::new(2);
        let j = Index::new(3);
        let k = Index::new(4);

        let a = vec![i, j];
        let b = vec![j, k];

        assert_eq!(common_inds(&a, &b), vec![j]);
        assert_eq!(common_ind(&a, &b), Some(j));
        assert_eq!(common_ind(&a, &[k]), None);
    }

    #[test]
    fn test_common_inds_respects_prime() {
        let i = Index::new(2);
        let a = vec![i];
        let b = vec![i.primed()];

        assert!(common_inds(&a, &b).is_empty());
        assert!(has_ind(&a, &i));
        assert!(!has_ind(&a, &i.primed()));
    }
}
