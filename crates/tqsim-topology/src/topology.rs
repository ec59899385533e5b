//! The circuit topology graph.

use petgraph::algo::{astar, connected_components};
use petgraph::graph::{NodeIndex, UnGraph};
use thiserror::Error;

/// Error type for topology construction and queries.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// A link endpoint is not a valid site id.
    #[error("site {site} is out of range (topology has {size} sites)")]
    SiteOutOfRange { site: usize, size: usize },

    /// Both endpoints of a link are the same site.
    #[error("cannot link site {site} to itself")]
    SelfLink { site: usize },

    /// The two sites are already linked.
    #[error("sites {site1} and {site2} are already linked")]
    DuplicateLink { site1: usize, site2: usize },
}

/// An adjacent site together with the id of the connecting link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    /// Adjacent site id.
    pub site: usize,
    /// Id of the link reaching it.
    pub link: usize,
}

/// Graph of qubit sites and the links between them.
///
/// Sites are `0..number_of_bits()`; links get consecutive ids in creation
/// order. Neighbor lists preserve link creation order per site.
#[derive(Debug, Clone)]
pub struct CircuitTopology {
    graph: UnGraph<usize, usize>,
    neighbors: Vec<Vec<Neighbor>>,
}

impl CircuitTopology {
    /// Create a topology over `num_bits` sites with no links yet.
    pub fn new(num_bits: usize) -> Self {
        let mut graph = UnGraph::new_undirected();
        for site in 0..num_bits {
            graph.add_node(site);
        }
        Self {
            graph,
            neighbors: vec![Vec::new(); num_bits],
        }
    }

    /// Add a link between two sites, returning the new link id.
    ///
    /// # Errors
    /// Rejects out-of-range endpoints, self links and parallel links.
    pub fn generate_link(&mut self, site1: usize, site2: usize) -> Result<usize, TopologyError> {
        let size = self.number_of_bits();
        for site in [site1, site2] {
            if site >= size {
                return Err(TopologyError::SiteOutOfRange { site, size });
            }
        }
        if site1 == site2 {
            return Err(TopologyError::SelfLink { site: site1 });
        }
        if self.link_between(site1, site2).is_some() {
            return Err(TopologyError::DuplicateLink { site1, site2 });
        }

        let link = self.number_of_links();
        self.graph
            .add_edge(NodeIndex::new(site1), NodeIndex::new(site2), link);
        self.neighbors[site1].push(Neighbor { site: site2, link });
        self.neighbors[site2].push(Neighbor { site: site1, link });
        Ok(link)
    }

    /// Number of qubit sites.
    pub fn number_of_bits(&self) -> usize {
        self.neighbors.len()
    }

    /// Number of links.
    pub fn number_of_links(&self) -> usize {
        self.graph.edge_count()
    }

    /// Neighbors of `site`, in link creation order.
    ///
    /// # Panics
    /// Panics if `site` is out of range.
    pub fn neighbors_of(&self, site: usize) -> &[Neighbor] {
        &self.neighbors[site]
    }

    /// Number of links incident to `site`.
    ///
    /// # Panics
    /// Panics if `site` is out of range.
    pub fn degree(&self, site: usize) -> usize {
        self.neighbors[site].len()
    }

    /// The link id between two sites, if they are adjacent.
    pub fn link_between(&self, site1: usize, site2: usize) -> Option<usize> {
        if site1 >= self.number_of_bits() || site2 >= self.number_of_bits() {
            return None;
        }
        self.neighbors[site1]
            .iter()
            .find(|n| n.site == site2)
            .map(|n| n.link)
    }

    /// Whether every site is reachable from every other.
    pub fn is_connected(&self) -> bool {
        self.number_of_bits() <= 1 || connected_components(&self.graph) == 1
    }

    /// Shortest site path from `from` to `to`, endpoints included.
    ///
    /// Returns `None` when either site is out of range or no path exists.
    pub fn path_between(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        if from >= self.number_of_bits() || to >= self.number_of_bits() {
            return None;
        }
        let goal = NodeIndex::new(to);
        let (_, path) = astar(
            &self.graph,
            NodeIndex::new(from),
            |node| node == goal,
            |_| 1usize,
            |_| 0usize,
        )?;
        Some(path.into_iter().map(|n| n.index()).collect())
    }
}
