use anyhow::{ensure, Result};

/// An undirected unit adjacency graph in compressed sparse row format.
///
/// Every neighbor entry carries the length of the border shared with that
/// neighbor, so neighbors and border lengths can never drift out of alignment.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Graph {
    size: usize,
    offsets: Vec<u32>,
    edges: Vec<u32>,
    edge_weights: Vec<f64>,
}

impl Graph {
    /// Construct a graph from per-unit lists of `(neighbor, border_length)` pairs.
    ///
    /// Neighbor lists are kept in the given order. The structure is expected to be
    /// symmetric (if `i` lists `j`, `j` lists `i`); this is not checked.
    pub fn new(neighbors: &[Vec<(usize, f64)>]) -> Result<Self> {
        let size = neighbors.len();
        for (node, list) in neighbors.iter().enumerate() {
            for &(other, length) in list {
                ensure!(other < size,
                    "[Graph.new] unit {node} lists neighbor {other}, but there are only {size} units");
                ensure!(length.is_finite() && length >= 0.0,
                    "[Graph.new] border length between {node} and {other} must be finite and non-negative, got {length}");
            }
        }

        Ok(Self::from_parts(
            neighbors.iter().map(|list| list.iter().map(|&(v, _)| v as u32).collect()),
            neighbors.iter().flatten().map(|&(_, w)| w).collect(),
        ))
    }

    /// Construct a graph from plain adjacency lists, with every border length set to zero.
    pub fn unweighted(neighbors: &[Vec<usize>]) -> Result<Self> {
        Self::new(&neighbors.iter()
            .map(|list| list.iter().map(|&v| (v, 0.0)).collect())
            .collect::<Vec<_>>())
    }

    /// Assemble the CSR arrays from per-node neighbor lists and flattened weights.
    fn from_parts(lists: impl Iterator<Item = Vec<u32>>, edge_weights: Vec<f64>) -> Self {
        let mut offsets = vec![0u32];
        let mut edges = Vec::with_capacity(edge_weights.len());
        for list in lists {
            edges.extend_from_slice(&list);
            offsets.push(edges.len() as u32);
        }
        assert!(edges.len() == edge_weights.len(), "edges.len() must equal edge_weights.len()");

        Self { size: offsets.len() - 1, offsets, edges, edge_weights }
    }

    /// Get the number of nodes in the graph.
    #[inline] pub fn node_count(&self) -> usize { self.size }

    /// Get the number of directed edge entries in the graph (each undirected edge counts twice).
    #[inline] pub fn edge_count(&self) -> usize { self.edges.len() }

    /// Get the range of edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get the ith neighbor of a given node.
    #[inline]
    pub fn edge(&self, node: usize, i: usize) -> Option<usize> {
        self.range(node).nth(i).map(|v| self.edges[v] as usize)
    }

    /// Get an iterator over the neighbors of a given node.
    #[inline]
    pub fn edges(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |v| self.edges[v] as usize)
    }

    /// Get an iterator over the neighbors and border lengths of a given node.
    #[inline]
    pub fn edges_with_weights(&self, node: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.range(node).map(move |v| (self.edges[v] as usize, self.edge_weights[v]))
    }

    /// Restrict the graph to edges between units sharing a district label.
    ///
    /// The result has the same node count, and each node keeps its surviving
    /// neighbors (with their border lengths) in their original order.
    pub fn restrict(&self, assignments: &[u32]) -> Result<Self> {
        ensure!(assignments.len() == self.size,
            "[Graph.restrict] assignments length ({}) must match node count ({})",
            assignments.len(), self.size);

        Ok(self.restrict_by(assignments))
    }

    /// Unchecked restriction; `assignments.len()` must equal `node_count()`.
    pub(crate) fn restrict_by(&self, assignments: &[u32]) -> Self {
        debug_assert!(assignments.len() == self.size, "assignments length mismatch");

        let mut offsets = Vec::with_capacity(self.size + 1);
        let mut edges = Vec::new();
        let mut edge_weights = Vec::new();
        offsets.push(0u32);

        for node in 0..self.size {
            let part = assignments[node];
            for (other, length) in self.edges_with_weights(node) {
                if assignments[other] == part {
                    edges.push(other as u32);
                    edge_weights.push(length);
                }
            }
            offsets.push(edges.len() as u32);
        }

        Self { size: self.size, offsets, edges, edge_weights }
    }
}
