//! Device connectivity graph.
//!
//! The connectivity graph describes which pairs of physical qubits
//! can interact with two-qubit gates. It is validated and frozen at
//! construction: all-pairs BFS distances and predecessors are
//! precomputed once, so `distance()` is an O(1) lookup and
//! `shortest_path()` is O(path length) during routing. The graph is
//! read-only afterwards and safe to share across any number of
//! placement or routing runs.

use serde::{Deserialize, Serialize};

use crate::error::{RouteError, RouteResult};

/// Immutable connectivity graph over physical qubits.
///
/// Physical qubits are dense indices `0..num_nodes`. Edges may be
/// directed (for asymmetric two-qubit primitives); distance and
/// adjacency queries always use the symmetric closure, while
/// [`contains_edge_directed`](Self::contains_edge_directed)
/// distinguishes orientation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityGraph {
    /// Number of physical qubits.
    num_nodes: u32,
    /// Edge list as supplied at construction.
    edges: Vec<(u32, u32)>,
    /// Whether the edge list is orientation-sensitive.
    directed: bool,
    /// Symmetric adjacency lists, sorted ascending.
    #[serde(skip)]
    adjacency: Vec<Vec<u32>>,
    /// All-pairs shortest-path distances; `u32::MAX` if unreachable.
    #[serde(skip)]
    dist: Vec<Vec<u32>>,
    /// Predecessor matrix for path reconstruction.
    #[serde(skip)]
    pred: Vec<Vec<u32>>,
}

impl ConnectivityGraph {
    /// Build an undirected graph from a coupling list.
    ///
    /// Self-loops, duplicate edges (in either orientation) and edges
    /// referencing nodes outside `0..num_nodes` are rejected.
    pub fn from_edges(
        num_nodes: u32,
        edges: impl IntoIterator<Item = (u32, u32)>,
    ) -> RouteResult<Self> {
        Self::validated(num_nodes, edges.into_iter().collect(), false)
    }

    /// Build a directed graph from a coupling list.
    ///
    /// Both orientations of a pair may appear; an exact repeat is
    /// still a duplicate.
    pub fn from_directed_edges(
        num_nodes: u32,
        edges: impl IntoIterator<Item = (u32, u32)>,
    ) -> RouteResult<Self> {
        Self::validated(num_nodes, edges.into_iter().collect(), true)
    }

    fn validated(num_nodes: u32, edges: Vec<(u32, u32)>, directed: bool) -> RouteResult<Self> {
        for (i, &(a, b)) in edges.iter().enumerate() {
            if a == b {
                return Err(RouteError::SelfLoopEdge(a));
            }
            if a >= num_nodes || b >= num_nodes {
                return Err(RouteError::EdgeOutOfRange { a, b, num_nodes });
            }
            let dup = edges[..i]
                .iter()
                .any(|&(x, y)| (x, y) == (a, b) || (!directed && (x, y) == (b, a)));
            if dup {
                return Err(RouteError::DuplicateEdge(a, b));
            }
        }
        Ok(Self::build(num_nodes, edges, directed))
    }

    /// Construct without validation; callers guarantee well-formed edges.
    fn build(num_nodes: u32, edges: Vec<(u32, u32)>, directed: bool) -> Self {
        let n = num_nodes as usize;
        let mut adjacency = vec![vec![]; n];
        for &(a, b) in &edges {
            if !adjacency[a as usize].contains(&b) {
                adjacency[a as usize].push(b);
            }
            if !adjacency[b as usize].contains(&a) {
                adjacency[b as usize].push(a);
            }
        }
        for neighbours in &mut adjacency {
            neighbours.sort_unstable();
        }

        // All-pairs BFS over the symmetric closure.
        let mut dist = vec![vec![u32::MAX; n]; n];
        let mut pred = vec![vec![u32::MAX; n]; n];
        for src in 0..n {
            dist[src][src] = 0;
            let mut queue = std::collections::VecDeque::new();
            queue.push_back(src as u32);
            while let Some(current) = queue.pop_front() {
                let cur = current as usize;
                for &nb in &adjacency[cur] {
                    let nbi = nb as usize;
                    if dist[src][nbi] == u32::MAX {
                        dist[src][nbi] = dist[src][cur] + 1;
                        pred[src][nbi] = current;
                        queue.push_back(nb);
                    }
                }
            }
        }

        Self {
            num_nodes,
            edges,
            directed,
            adjacency,
            dist,
            pred,
        }
    }

    /// Rebuild adjacency and distance caches from the edge list.
    ///
    /// The caches are skipped during serialization; call this after
    /// deserializing, otherwise distance queries will report every
    /// pair as disconnected.
    pub fn rebuild_caches(&mut self) {
        *self = Self::build(self.num_nodes, std::mem::take(&mut self.edges), self.directed);
    }

    /// Get the number of physical qubits.
    #[inline]
    pub fn num_nodes(&self) -> u32 {
        self.num_nodes
    }

    /// Iterate over physical qubit indices.
    pub fn nodes(&self) -> impl Iterator<Item = u32> {
        0..self.num_nodes
    }

    /// Get the coupling edges as supplied at construction.
    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// Whether the graph was built with directed edges.
    #[inline]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Neighbours of a qubit under the symmetric closure, ascending.
    pub fn neighbours(&self, node: u32) -> &[u32] {
        self.adjacency
            .get(node as usize)
            .map_or(&[], Vec::as_slice)
    }

    /// Degree of a qubit under the symmetric closure.
    pub fn degree(&self, node: u32) -> usize {
        self.neighbours(node).len()
    }

    /// Check if two qubits can interact (orientation ignored).
    #[inline]
    pub fn contains_edge(&self, a: u32, b: u32) -> bool {
        self.neighbours(a).binary_search(&b).is_ok()
    }

    /// Check for an edge with the given orientation.
    ///
    /// For undirected graphs this is equivalent to
    /// [`contains_edge`](Self::contains_edge).
    pub fn contains_edge_directed(&self, a: u32, b: u32) -> bool {
        if self.directed {
            self.edges.contains(&(a, b))
        } else {
            self.contains_edge(a, b)
        }
    }

    /// Shortest-path distance between two qubits, if connected.
    pub fn distance(&self, a: u32, b: u32) -> Option<u32> {
        let d = *self.dist.get(a as usize)?.get(b as usize)?;
        (d != u32::MAX).then_some(d)
    }

    /// Reconstruct a shortest path from `a` to `b` inclusive.
    pub fn shortest_path(&self, a: u32, b: u32) -> Option<Vec<u32>> {
        self.distance(a, b)?;
        let mut path = vec![b];
        let mut current = b;
        while current != a {
            current = self.pred[a as usize][current as usize];
            path.push(current);
        }
        path.reverse();
        Some(path)
    }

    /// Physical qubits adjacent to both `a` and `b`.
    pub fn common_neighbours(&self, a: u32, b: u32) -> Vec<u32> {
        self.neighbours(a)
            .iter()
            .copied()
            .filter(|&c| self.contains_edge(b, c))
            .collect()
    }

    /// Longest shortest path over all connected pairs. Zero for
    /// graphs with fewer than two nodes.
    pub fn diameter(&self) -> u32 {
        self.dist
            .iter()
            .flatten()
            .copied()
            .filter(|&d| d != u32::MAX)
            .max()
            .unwrap_or(0)
    }

    /// Check if every pair of qubits is connected by some path.
    pub fn is_connected(&self) -> bool {
        self.dist
            .iter()
            .all(|row| row.iter().all(|&d| d != u32::MAX))
    }

    /// Create a linear chain 0-1-2-...-(n-1).
    pub fn linear(n: u32) -> Self {
        let edges = (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect();
        Self::build(n, edges, false)
    }

    /// Create a ring 0-1-...-(n-1)-0.
    pub fn ring(n: u32) -> Self {
        let mut edges: Vec<_> = (0..n.saturating_sub(1)).map(|i| (i, i + 1)).collect();
        if n > 2 {
            edges.push((n - 1, 0));
        }
        Self::build(n, edges, false)
    }

    /// Create a star with node 0 at the centre.
    pub fn star(n: u32) -> Self {
        let edges = (1..n).map(|i| (0, i)).collect();
        Self::build(n, edges, false)
    }

    /// Create a `rows` x `cols` rectangular grid, row-major indices.
    pub fn grid(rows: u32, cols: u32) -> Self {
        let mut edges = vec![];
        for r in 0..rows {
            for c in 0..cols {
                let i = r * cols + c;
                if c + 1 < cols {
                    edges.push((i, i + 1));
                }
                if r + 1 < rows {
                    edges.push((i, i + cols));
                }
            }
        }
        Self::build(rows * cols, edges, false)
    }

    /// Create a fully connected graph.
    pub fn full(n: u32) -> Self {
        let mut edges = vec![];
        for i in 0..n {
            for j in (i + 1)..n {
                edges.push((i, j));
            }
        }
        Self::build(n, edges, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear() {
        let g = ConnectivityGraph::linear(5);
        assert!(g.contains_edge(0, 1));
        assert!(g.contains_edge(1, 0));
        assert!(!g.contains_edge(0, 2));
        assert_eq!(g.distance(0, 4), Some(4));
        assert_eq!(g.diameter(), 4);
        assert!(g.is_connected());
    }

    #[test]
    fn test_ring_distance() {
        let g = ConnectivityGraph::ring(6);
        assert_eq!(g.distance(0, 3), Some(3));
        assert_eq!(g.distance(0, 5), Some(1));
        assert_eq!(g.diameter(), 3);
    }

    #[test]
    fn test_star() {
        let g = ConnectivityGraph::star(5);
        assert!(g.contains_edge(0, 4));
        assert!(!g.contains_edge(1, 2));
        assert_eq!(g.distance(1, 2), Some(2));
        assert_eq!(g.common_neighbours(1, 2), vec![0]);
    }

    #[test]
    fn test_grid() {
        let g = ConnectivityGraph::grid(2, 3);
        // 0 1 2
        // 3 4 5
        assert!(g.contains_edge(0, 1));
        assert!(g.contains_edge(1, 4));
        assert!(!g.contains_edge(0, 4));
        assert_eq!(g.distance(0, 5), Some(3));
    }

    #[test]
    fn test_shortest_path() {
        let g = ConnectivityGraph::linear(5);
        assert_eq!(g.shortest_path(0, 3), Some(vec![0, 1, 2, 3]));
        assert_eq!(g.shortest_path(2, 2), Some(vec![2]));
    }

    #[test]
    fn test_rejects_self_loop() {
        let result = ConnectivityGraph::from_edges(3, [(0, 1), (2, 2)]);
        assert!(matches!(result, Err(RouteError::SelfLoopEdge(2))));
    }

    #[test]
    fn test_rejects_duplicate() {
        let result = ConnectivityGraph::from_edges(3, [(0, 1), (1, 0)]);
        assert!(matches!(result, Err(RouteError::DuplicateEdge(1, 0))));
    }

    #[test]
    fn test_rejects_out_of_range() {
        let result = ConnectivityGraph::from_edges(2, [(0, 5)]);
        assert!(matches!(result, Err(RouteError::EdgeOutOfRange { .. })));
    }

    #[test]
    fn test_directed_edges() {
        let g = ConnectivityGraph::from_directed_edges(3, [(0, 1), (1, 0), (1, 2)]).unwrap();
        assert!(g.contains_edge_directed(0, 1));
        assert!(g.contains_edge_directed(1, 0));
        assert!(g.contains_edge_directed(1, 2));
        assert!(!g.contains_edge_directed(2, 1));
        // Symmetric closure still answers adjacency.
        assert!(g.contains_edge(2, 1));
    }

    #[test]
    fn test_serde_roundtrip_rebuilds() {
        let g = ConnectivityGraph::linear(4);
        let json = serde_json::to_string(&g).unwrap();
        let mut back: ConnectivityGraph = serde_json::from_str(&json).unwrap();
        back.rebuild_caches();
        assert_eq!(back.distance(0, 3), Some(3));
        assert!(back.contains_edge(1, 2));
    }

    #[test]
    fn test_disconnected() {
        let g = ConnectivityGraph::from_edges(4, [(0, 1), (2, 3)]).unwrap();
        assert!(!g.is_connected());
        assert_eq!(g.distance(0, 2), None);
        assert_eq!(g.shortest_path(1, 3), None);
    }
}
