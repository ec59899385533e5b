//! The tensor-network circuit state and its cursor protocol.

use std::sync::Arc;

use num_complex::Complex64;
use rand::Rng;

use tqsim_core::{common_ind, svd, Index, Spectrum, Tensor, TruncationParams};
use tqsim_topology::CircuitTopology;

use crate::error::{CircuitError, InvariantViolation, Result};
use crate::gates::{ident, proj_0, proj_1, OneQubitGate, TwoQubitGate};

/// Wave function of a qubit register, stored as one tensor per site of a
/// circuit topology.
///
/// Site tensors are connected by link (bond) indices following the
/// topology. Two adjacent sites (the *cursor*) are always merged into the
/// working tensor `psi`, which is where gates land. `decompose_psi`
/// splits the merged tensor back into its two site tensors via a
/// truncated SVD, and `shift_to` slides the cursor across a link,
/// re-merging with the next site. `apply` edits only `psi` and leaves the
/// cursor's site tensors stale until the next decompose or shift.
///
/// Physical indices may be supplied at construction to share qubit
/// identity with another state over the same topology ("replica" states);
/// such replicas must be disambiguated with [`CircuitState::prime_all`]
/// before any cross-state contraction.
#[derive(Clone)]
pub struct CircuitState {
    topology: Arc<CircuitTopology>,
    /// Link (bond) indices, one per topology link.
    links: Vec<Index>,
    /// Physical indices, one per site.
    sites: Vec<Index>,
    /// Site tensors.
    tensors: Vec<Tensor>,
    /// Merged two-site working tensor at the cursor.
    psi: Tensor,
    /// Cursor position; the two sites are always adjacent.
    cursor: (usize, usize),
    /// Set by `apply`: the cursor site tensors no longer agree with `psi`.
    merge_pending: bool,
    /// Truncation fed into internally triggered decompositions.
    truncation: TruncationParams,
}

impl CircuitState {
    /// Build the product state `(alpha_i |0> + beta_i |1>)` over a
    /// topology.
    ///
    /// Every link starts at bond dimension 1 and the cursor at sites
    /// (0, 1). `physical_indices` may carry the site indices of another
    /// state to share qubit identity; otherwise fresh indices are created.
    ///
    /// # Errors
    /// Fails if the topology has fewer than two sites, sites 0 and 1 are
    /// not adjacent, any site degree is outside `1..=3`, or the supplied
    /// lists have the wrong length or dimensions.
    pub fn new(
        topology: Arc<CircuitTopology>,
        init_qubits: &[(Complex64, Complex64)],
        physical_indices: Option<Vec<Index>>,
    ) -> Result<Self> {
        let n = topology.number_of_bits();
        if n < 2 {
            return Err(InvariantViolation::TooFewSites { size: n }.into());
        }
        if init_qubits.len() != n {
            return Err(CircuitError::DimensionMismatch {
                what: "initial qubit amplitude list",
                expected: n,
                actual: init_qubits.len(),
            });
        }
        for site in 0..n {
            let degree = topology.degree(site);
            if !(1..=3).contains(&degree) {
                return Err(InvariantViolation::UnsupportedDegree { site, degree }.into());
            }
        }
        if topology.link_between(0, 1).is_none() {
            return Err(InvariantViolation::InitialCursorNotAdjacent.into());
        }

        let sites = match physical_indices {
            Some(given) => {
                if given.len() != n {
                    return Err(CircuitError::DimensionMismatch {
                        what: "physical index list",
                        expected: n,
                        actual: given.len(),
                    });
                }
                for (site, idx) in given.iter().enumerate() {
                    if idx.dim != 2 {
                        return Err(InvariantViolation::BadPhysicalIndex {
                            site,
                            dim: idx.dim,
                        }
                        .into());
                    }
                }
                given
            }
            None => (0..n).map(|_| Index::with_tag(2, "Site")).collect(),
        };

        let links: Vec<Index> = (0..topology.number_of_links())
            .map(|_| Index::with_tag(1, "Link"))
            .collect();

        let mut tensors = Vec::with_capacity(n);
        for (site, &(alpha, beta)) in init_qubits.iter().enumerate() {
            let mut legs = vec![sites[site]];
            legs.extend(topology.neighbors_of(site).iter().map(|nb| links[nb.link]));

            let mut m = Tensor::zeros(legs);
            let mut coords = vec![0usize; m.rank()];
            m.set(&coords, alpha);
            coords[0] = 1;
            m.set(&coords, beta);
            tensors.push(m);
        }

        let cursor = (0, 1);
        let psi = &tensors[cursor.0] * &tensors[cursor.1];

        Ok(Self {
            topology,
            links,
            sites,
            tensors,
            psi,
            cursor,
            merge_pending: false,
            truncation: TruncationParams::new(),
        })
    }

    /// Number of qubits.
    pub fn size(&self) -> usize {
        self.topology.number_of_bits()
    }

    /// The topology this state lives on.
    pub fn topology(&self) -> &CircuitTopology {
        &self.topology
    }

    /// Current cursor position.
    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// The merged two-site working tensor.
    pub fn merged_tensor(&self) -> &Tensor {
        &self.psi
    }

    /// Physical index of a site.
    ///
    /// # Panics
    /// Panics if `site` is out of range.
    pub fn site_index(&self, site: usize) -> &Index {
        &self.sites[site]
    }

    /// All physical indices, in site order.
    pub fn site_indices(&self) -> &[Index] {
        &self.sites
    }

    /// Link index of a topology link.
    ///
    /// # Panics
    /// Panics if `link` is out of range.
    pub fn link_index(&self, link: usize) -> &Index {
        &self.links[link]
    }

    /// Truncation parameters used by internally triggered decompositions
    /// (gate routing, measurement).
    pub fn truncation(&self) -> TruncationParams {
        self.truncation
    }

    /// Replace the truncation parameters for internally triggered
    /// decompositions.
    pub fn set_truncation(&mut self, params: TruncationParams) {
        self.truncation = params;
    }

    /// The approximation cutoff, if one is set.
    pub fn cutoff(&self) -> Option<f64> {
        self.truncation.cutoff
    }

    /// Set the approximation cutoff for subsequent internal
    /// decompositions.
    pub fn set_cutoff(&mut self, cutoff: f64) {
        self.truncation.cutoff = Some(cutoff);
    }

    /// Cap the bond dimension for subsequent internal decompositions.
    pub fn set_max_dim(&mut self, max_dim: usize) {
        self.truncation.max_dim = Some(max_dim);
    }

    /// Tensor of one site.
    ///
    /// # Errors
    /// Fails for an out-of-range site, or while a merged-tensor edit is
    /// pending (after `apply`, before the next decompose/shift).
    pub fn site_tensor(&self, site: usize) -> Result<&Tensor> {
        if site >= self.size() {
            return Err(InvariantViolation::SiteOutOfBounds {
                site,
                size: self.size(),
            }
            .into());
        }
        if self.merge_pending {
            return Err(InvariantViolation::MergePending { site }.into());
        }
        Ok(&self.tensors[site])
    }

    /// All site tensors, in site order.
    ///
    /// # Errors
    /// Fails while a merged-tensor edit is pending.
    pub fn site_tensors(&self) -> Result<&[Tensor]> {
        if self.merge_pending {
            return Err(InvariantViolation::MergePending {
                site: self.cursor.0,
            }
            .into());
        }
        Ok(&self.tensors)
    }

    /// Split the merged tensor back into the two cursor site tensors.
    ///
    /// The SVD puts the physical index of `cursor.0` and all its links
    /// except the cursor edge on the U side. The link index at the cursor
    /// edge is replaced by the (possibly truncated) new bond, the
    /// singular-value tensor is rescaled to unit norm, and the site
    /// tensors become `U` and `S * V`. The merged tensor itself is left
    /// untouched.
    ///
    /// # Errors
    /// Propagates SVD failures; fails on a zero-norm spectrum.
    pub fn decompose_psi(&mut self, params: &TruncationParams) -> Result<Spectrum> {
        let (first, second) = self.cursor;
        let edge = self.cursor_edge();

        let u_legs = self.side_legs(first, second);
        let dec = svd(&self.psi, &u_legs, params)?;

        let bond = common_ind(dec.u.indices(), dec.s.indices())
            .expect("U and S share the u-side bond");
        let s_hat = unit_spectrum(&dec.s)?;

        self.links[edge] = bond;
        self.tensors[first] = dec.u;
        self.tensors[second] = &s_hat * &dec.v;
        self.merge_pending = false;
        Ok(dec.spectrum)
    }

    /// Slide the cursor so `target` becomes one of its sites.
    ///
    /// `target` must be adjacent to exactly one cursor site. The far
    /// cursor site is split off by SVD (with `params` truncation), the
    /// cursor edge's link index is updated, and the merged tensor is
    /// rebuilt over the new pair. Afterwards the cursor reads
    /// `(target, old near site)` or `(old near site, target)`.
    ///
    /// # Errors
    /// Fails when `target` is out of range, already under the cursor, or
    /// adjacent to neither or both cursor sites; propagates SVD failures.
    pub fn shift_to(&mut self, target: usize, params: &TruncationParams) -> Result<Spectrum> {
        let (first, second) = self.cursor;
        if target >= self.size() {
            return Err(InvariantViolation::SiteOutOfBounds {
                site: target,
                size: self.size(),
            }
            .into());
        }
        if target == first || target == second {
            return Err(InvariantViolation::TargetAtCursor {
                target,
                first,
                second,
            }
            .into());
        }

        let near_first = self.topology.link_between(target, first).is_some();
        let near_second = self.topology.link_between(target, second).is_some();
        let edge = self.cursor_edge();

        match (near_first, near_second) {
            (true, false) => {
                // Split off `second`; re-merge U*S with the target.
                let v_legs = self.side_legs(second, first);
                let u_legs: Vec<Index> = self
                    .psi
                    .indices()
                    .iter()
                    .filter(|i| !v_legs.contains(i))
                    .copied()
                    .collect();
                let dec = svd(&self.psi, &u_legs, params)?;

                let bond = common_ind(dec.s.indices(), dec.v.indices())
                    .expect("S and V share the v-side bond");
                let s_hat = unit_spectrum(&dec.s)?;

                self.links[edge] = bond;
                self.tensors[second] = dec.v;
                self.psi = &(&self.tensors[target] * &dec.u) * &s_hat;
                self.cursor = (target, first);
                self.merge_pending = false;
                Ok(dec.spectrum)
            }
            (false, true) => {
                // Split off `first`; re-merge S*V with the target.
                let u_legs = self.side_legs(first, second);
                let dec = svd(&self.psi, &u_legs, params)?;

                let bond = common_ind(dec.u.indices(), dec.s.indices())
                    .expect("U and S share the u-side bond");
                let s_hat = unit_spectrum(&dec.s)?;

                self.links[edge] = bond;
                self.tensors[first] = dec.u;
                self.psi = &(&s_hat * &dec.v) * &self.tensors[target];
                self.cursor = (second, target);
                self.merge_pending = false;
                Ok(dec.spectrum)
            }
            (true, true) => Err(InvariantViolation::TargetAdjacentToBoth {
                target,
                first,
                second,
            }
            .into()),
            (false, false) => Err(InvariantViolation::TargetNotAdjacent {
                target,
                first,
                second,
            }
            .into()),
        }
    }

    /// Apply a two-site operator at the cursor.
    ///
    /// `op` must carry exactly the physical indices of the two cursor
    /// sites and their primed counterparts. The merged tensor becomes
    /// `op * psi'` (cursor physical legs primed before contracting); the
    /// cursor site tensors are stale until the next decompose or shift.
    ///
    /// # Errors
    /// Fails on any leg mismatch, before touching the state.
    pub fn apply(&mut self, op: &Tensor) -> Result<()> {
        let (first, second) = self.cursor;
        let s1 = self.sites[first];
        let s2 = self.sites[second];

        if op.rank() != 4 {
            return Err(InvariantViolation::GateLegCount { legs: op.rank() }.into());
        }
        let allowed = [s1, s2, s1.primed(), s2.primed()];
        if !op.indices().iter().all(|leg| allowed.contains(leg)) {
            return Err(InvariantViolation::GateLegMismatch { first, second }.into());
        }

        self.psi = op * &self.psi.primed(&[s1, s2]);
        self.merge_pending = true;
        Ok(())
    }

    /// Rescale the merged tensor to unit norm.
    ///
    /// # Errors
    /// Fails on a zero-norm state.
    pub fn normalize(&mut self) -> Result<()> {
        let norm = self.psi.norm();
        if norm == 0.0 {
            return Err(InvariantViolation::ZeroNorm.into());
        }
        self.psi = self.psi.scaled(Complex64::new(1.0 / norm, 0.0));
        Ok(())
    }

    /// Raise the prime level of every physical index, link index and
    /// tensor by one.
    ///
    /// Used to disambiguate this state's legs from a replica sharing the
    /// same physical indices before contracting the two together.
    pub fn prime_all(&mut self) {
        for idx in &mut self.sites {
            *idx = idx.primed();
        }
        for idx in &mut self.links {
            *idx = idx.primed();
        }
        for t in &mut self.tensors {
            *t = t.primed_all();
        }
        self.psi = self.psi.primed_all();
    }

    /// Operator tensor for a one-qubit gate over this state's physical
    /// index, as used in overlap operator lists.
    ///
    /// # Errors
    /// Fails if the gate's site is out of range.
    pub fn operator_tensor(&self, gate: &OneQubitGate) -> Result<Tensor> {
        let site = gate.site();
        if site >= self.size() {
            return Err(InvariantViolation::SiteOutOfBounds {
                site,
                size: self.size(),
            }
            .into());
        }
        Ok(gate.tensor(&self.sites[site]))
    }

    // ------------------------------------------------------------------
    // Cursor routing
    // ------------------------------------------------------------------

    /// Shift the cursor through consecutive sites of `path`.
    ///
    /// Each entry must be adjacent to exactly one current cursor site, as
    /// for [`CircuitState::shift_to`]. Uses the state's own truncation
    /// parameters.
    pub fn move_cursor_along(&mut self, path: &[usize]) -> Result<()> {
        let params = self.truncation;
        for &site in path {
            self.shift_to(site, &params)?;
        }
        Ok(())
    }

    /// Move the cursor until `site` is one of its two sites.
    pub fn move_cursor_to_site(&mut self, site: usize) -> Result<()> {
        if site >= self.size() {
            return Err(InvariantViolation::SiteOutOfBounds {
                site,
                size: self.size(),
            }
            .into());
        }
        let (first, second) = self.cursor;
        if site == first || site == second {
            return Ok(());
        }

        let route = self.route_from_cursor(site)?;
        self.move_cursor_along(&route)
    }

    /// Move the cursor onto the adjacent pair `(site1, site2)`.
    pub fn move_cursor_to_pair(&mut self, site1: usize, site2: usize) -> Result<()> {
        if self.topology.link_between(site1, site2).is_none() {
            return Err(InvariantViolation::SitesNotAdjacent { site1, site2 }.into());
        }
        self.move_cursor_to_site(site1)?;
        let (first, second) = self.cursor;
        if site2 == first || site2 == second {
            return Ok(());
        }
        let params = self.truncation;
        self.shift_to(site2, &params)?;
        Ok(())
    }

    /// Walking route from the cursor to `site`: the shortest path whose
    /// first hop leaves the cursor without stepping onto its other site.
    fn route_from_cursor(&self, site: usize) -> Result<Vec<usize>> {
        let (first, second) = self.cursor;

        let mut best: Option<Vec<usize>> = None;
        for (start, other) in [(first, second), (second, first)] {
            if let Some(path) = self.topology.path_between(start, site) {
                if path.contains(&other) {
                    continue;
                }
                if best.as_ref().map_or(true, |b| path.len() < b.len()) {
                    best = Some(path);
                }
            }
        }
        let path = best.ok_or(InvariantViolation::NoRouteToSite {
            target: site,
            first,
            second,
        })?;
        Ok(path[1..].to_vec())
    }

    // ------------------------------------------------------------------
    // Gate application surface
    // ------------------------------------------------------------------

    /// Apply a one-qubit gate, routing the cursor onto its site first.
    ///
    /// The gate is padded with the identity on the other cursor site.
    /// Uses the state's own truncation parameters for any cursor moves.
    pub fn apply_one_qubit(&mut self, gate: &OneQubitGate) -> Result<()> {
        self.move_cursor_to_site(gate.site())?;
        let (first, second) = self.cursor;
        let partner = if gate.site() == first { second } else { first };

        let op = &gate.tensor(&self.sites[gate.site()]) * &ident(&self.sites[partner]);
        self.apply(&op)
    }

    /// Apply two one-qubit gates on an adjacent pair of sites at once.
    pub fn apply_one_qubit_pair(&mut self, g1: &OneQubitGate, g2: &OneQubitGate) -> Result<()> {
        self.move_cursor_to_pair(g1.site(), g2.site())?;
        let op = &g1.tensor(&self.sites[g1.site()]) * &g2.tensor(&self.sites[g2.site()]);
        self.apply(&op)
    }

    /// Apply a two-qubit gate, routing the cursor onto its site pair.
    ///
    /// The two sites must be adjacent in the topology.
    pub fn apply_two_qubit(&mut self, gate: &TwoQubitGate) -> Result<()> {
        let (site1, site2) = gate.sites();
        self.move_cursor_to_pair(site1, site2)?;
        let op = gate.tensor(&self.sites[site1], &self.sites[site2]);
        self.apply(&op)
    }

    // ------------------------------------------------------------------
    // Measurement surface
    // ------------------------------------------------------------------

    /// Probability of measuring |0> on `site`.
    ///
    /// Routes the cursor onto the site, projects the merged tensor with
    /// |0><0| and reports the squared norm ratio.
    pub fn probability_of_zero(&mut self, site: usize) -> Result<f64> {
        self.move_cursor_to_site(site)?;
        let norm = self.psi.norm();
        if norm == 0.0 {
            return Err(InvariantViolation::ZeroNorm.into());
        }

        let s = self.sites[site];
        let projected = &proj_0(&s) * &self.psi.primed(&[s]);
        let ratio = projected.norm() / norm;
        Ok(ratio * ratio)
    }

    /// Projectively measure `site`, collapsing the state.
    ///
    /// Samples the outcome from `rng`, applies the matching projector and
    /// renormalizes. Returns the observed basis value (0 or 1).
    pub fn observe_qubit<R: Rng + ?Sized>(&mut self, site: usize, rng: &mut R) -> Result<u8> {
        let p_zero = self.probability_of_zero(site)?;
        let outcome = if rng.gen::<f64>() < p_zero { 0u8 } else { 1u8 };

        let (first, second) = self.cursor;
        let partner = if site == first { second } else { first };
        let s = self.sites[site];
        let projector = if outcome == 0 { proj_0(&s) } else { proj_1(&s) };
        let op = &projector * &ident(&self.sites[partner]);

        self.apply(&op)?;
        self.normalize()?;
        Ok(outcome)
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    /// Link id of the edge between the cursor sites.
    fn cursor_edge(&self) -> usize {
        let (first, second) = self.cursor;
        self.topology
            .link_between(first, second)
            .expect("cursor sites are adjacent")
    }

    /// Legs belonging to `site`'s side of the cursor: its physical index
    /// plus its link indices, excluding the edge towards `towards`.
    fn side_legs(&self, site: usize, towards: usize) -> Vec<Index> {
        let mut legs = vec![self.sites[site]];
        legs.extend(
            self.topology
                .neighbors_of(site)
                .iter()
                .filter(|nb| nb.site != towards)
                .map(|nb| self.links[nb.link]),
        );
        legs
    }
}

/// The singular-value tensor rescaled to unit norm.
fn unit_spectrum(s: &Tensor) -> Result<Tensor> {
    let norm = s.norm();
    if norm == 0.0 {
        return Err(InvariantViolation::ZeroNorm.into());
    }
    Ok(s.scaled(Complex64::new(1.0 / norm, 0.0)))
}

impl std::fmt::Debug for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CircuitState")
            .field("size", &self.size())
            .field("cursor", &self.cursor)
            .field("merge_pending", &self.merge_pending)
            .field("psi", &self.psi)
            .finish()
    }
}

impl std::fmt::Display for CircuitState {
    /// Debug dump: per-site tensor legs, the merged tensor and the cursor.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (site, t) in self.tensors.iter().enumerate() {
            writeln!(f, "M[{site}] = {t:?}")?;
        }
        writeln!(f, "-----------")?;
        writeln!(f, "Psi = {:?}", self.psi)?;
        write!(f, "cursor = ({}, {})", self.cursor.0, self.cursor.1)
    }
}
