use anyhow::{ensure, Result};

use crate::graph::Graph;

impl Graph {
    /// Flag each unit whose restricted neighbor count is strictly below its full
    /// neighbor count, i.e. units with at least one neighbor in another district.
    ///
    /// `self` is the full adjacency and `restricted` the result of [`Graph::restrict`].
    pub fn boundary(&self, restricted: &Graph) -> Result<Vec<bool>> {
        ensure!(restricted.node_count() == self.node_count(),
            "[Graph.boundary] restricted node count ({}) must match full node count ({})",
            restricted.node_count(), self.node_count());

        Ok(self.boundary_of(restricted))
    }

    /// Unchecked boundary detection; node counts must match.
    pub(crate) fn boundary_of(&self, restricted: &Graph) -> Vec<bool> {
        (0..self.node_count())
            .map(|node| self.degree(node) > restricted.degree(node))
            .collect()
    }
}
