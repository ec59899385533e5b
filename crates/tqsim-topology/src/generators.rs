//! Standard topology layouts.
//!
//! Both generators number sites in BFS order from site 0, so contracting
//! site by site in index order always meets a previously seen link. This
//! is the ordering contract overlap evaluation relies on.

use crate::topology::CircuitTopology;

/// Open chain of `size` sites: `0 - 1 - ... - size-1`.
pub fn chain(size: usize) -> CircuitTopology {
    let mut topology = CircuitTopology::new(size);
    for i in 0..size.saturating_sub(1) {
        topology
            .generate_link(i, i + 1)
            .expect("chain links are distinct and in range");
    }
    topology
}

/// Complete binary tree with `depth` levels (`2^depth - 1` sites) in BFS
/// numbering: site `i` links to `2i+1` and `2i+2`.
///
/// The root has degree 2, internal sites degree 3, leaves degree 1.
pub fn binary_tree(depth: u32) -> CircuitTopology {
    let size = (1usize << depth) - 1;
    let mut topology = CircuitTopology::new(size);
    for i in 0..size {
        for child in [2 * i + 1, 2 * i + 2] {
            if child < size {
                topology
                    .generate_link(i, child)
                    .expect("tree links are distinct and in range");
            }
        }
    }
    topology
}
