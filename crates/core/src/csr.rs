use common::error::Error;
use common::types::Edge;

use super::traits::RatioGraph;

/// Graph in Compressed Sparse Row (CSR) format for fast graph traversal.
///
/// CSR format stores outgoing edges of each node contiguously in memory:
/// - `node_pointers[u]..node_pointers[u+1]` → edges from node `u`
/// - `edge_targets[i]` -> target node of edge `i`
/// - `edge_weights[i]` / `edge_transits[i]` -> the two attributes of edge `i`
/// - `edge_source_by_index[i]` -> source node of edge `i`
///
/// On top of the forward layout, a reverse index groups edge ids by target
/// node (`in_pointers[v]..in_pointers[v+1]` → positions in `in_edge_ids`),
/// which is what the solver's reverse breadth-first pass walks. Both indexes
/// are built once with the two-pass counting technique; the structure is
/// immutable after construction.
#[derive(Debug, Clone)]
pub struct GraphCSR {
    pub num_nodes: usize,
    pub node_pointers: Vec<usize>,
    pub edge_targets: Vec<usize>,
    pub edge_weights: Vec<i64>,
    pub edge_transits: Vec<i64>,
    pub edge_source_by_index: Vec<usize>,
    pub in_pointers: Vec<usize>,
    pub in_edge_ids: Vec<usize>,
}

impl GraphCSR {
    /// Creates a new CSR graph from a list of edges `(src, dst, weight, transit)`.
    ///
    /// Edges are sorted by source node to ensure contiguous blocks for each
    /// node; edge ids handed back through [`RatioGraph`] refer to this sorted
    /// order.
    ///
    /// # Arguments
    /// - `num_nodes`: total number of nodes (graph indices: 0..num_nodes-1)
    /// - `edges`: slice of `(src, dst, weight, transit)` tuples
    ///
    /// # Errors
    /// Returns `Error::NodeIndexOutOfBounds` if any edge endpoint is not a
    /// valid node index.
    pub fn from_edges(num_nodes: usize, edges: &mut [Edge]) -> Result<Self, Error> {
        for &(u, v, _, _) in edges.iter() {
            if u >= num_nodes {
                return Err(Error::NodeIndexOutOfBounds(u));
            }
            if v >= num_nodes {
                return Err(Error::NodeIndexOutOfBounds(v));
            }
        }

        edges.sort_by_key(|(src, _, _, _)| *src);

        let m = edges.len();
        let mut node_pointers = vec![0; num_nodes + 1];

        for &(u, _, _, _) in edges.iter() {
            node_pointers[u + 1] += 1;
        }

        for i in 1..=num_nodes {
            node_pointers[i] += node_pointers[i - 1];
        }

        let mut edge_targets = vec![0; m];
        let mut edge_weights = vec![0; m];
        let mut edge_transits = vec![0; m];
        let mut edge_source_by_index = vec![0; m];

        let mut cursor = node_pointers.clone();

        for &(u, v, weight, transit) in edges.iter() {
            let pos = cursor[u]; // Next available position for node 'u'
            edge_targets[pos] = v;
            edge_weights[pos] = weight;
            edge_transits[pos] = transit;
            edge_source_by_index[pos] = u;

            cursor[u] += 1;
        }

        let (in_pointers, in_edge_ids) = Self::build_reverse_index(num_nodes, &edge_targets);

        Ok(Self {
            num_nodes,
            node_pointers,
            edge_targets,
            edge_weights,
            edge_transits,
            edge_source_by_index,
            in_pointers,
            in_edge_ids,
        })
    }

    /// Builds the reverse adjacency index from the already-placed forward
    /// arrays, using the same two-pass counting technique as the forward
    /// build: count in-degrees, prefix-sum, then scatter edge ids into their
    /// target's block.
    fn build_reverse_index(
        num_nodes: usize,
        edge_targets: &[usize],
    ) -> (Vec<usize>, Vec<usize>) {
        let m = edge_targets.len();
        let mut in_pointers = vec![0; num_nodes + 1];

        for &v in edge_targets {
            in_pointers[v + 1] += 1;
        }

        for i in 1..=num_nodes {
            in_pointers[i] += in_pointers[i - 1];
        }

        let mut in_edge_ids = vec![0; m];
        let mut cursor = in_pointers.clone();

        for (edge_id, &v) in edge_targets.iter().enumerate() {
            in_edge_ids[cursor[v]] = edge_id;
            cursor[v] += 1;
        }

        (in_pointers, in_edge_ids)
    }

    /// O(1) lookup for the source node of a given edge index.
    ///
    /// # Errors
    /// Returns `Error::InvalidGraph` if `edge_idx` is out of bounds.
    pub fn get_edge_source_node(&self, edge_idx: usize) -> Result<usize, Error> {
        self.edge_source_by_index
            .get(edge_idx)
            .copied()
            .ok_or(Error::InvalidGraph)
    }
}

impl RatioGraph for GraphCSR {
    fn node_count(&self) -> usize {
        self.num_nodes
    }

    fn edge_count(&self) -> usize {
        self.edge_targets.len()
    }

    fn edge_source(&self, edge: usize) -> usize {
        self.edge_source_by_index[edge]
    }

    fn edge_target(&self, edge: usize) -> usize {
        self.edge_targets[edge]
    }

    fn edge_weight(&self, edge: usize) -> i64 {
        self.edge_weights[edge]
    }

    fn edge_transit(&self, edge: usize) -> i64 {
        self.edge_transits[edge]
    }

    fn in_degree(&self, node: usize) -> usize {
        self.in_pointers[node + 1] - self.in_pointers[node]
    }

    fn predecessor_edge_source(&self, node: usize, i: usize) -> usize {
        let edge_id = self.in_edge_ids[self.in_pointers[node] + i];
        self.edge_source_by_index[edge_id]
    }
}
