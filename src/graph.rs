use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Undirected graph over internal indices `[0, vertices)`.
///
/// Ingestion may reorder or relabel the input, so every internal index keeps
/// its original identifier in `vertex_ids`; the bijection is fixed at load
/// time and survives unchanged through reporting.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    edges: Vec<(u32, u32)>,
    neighbours: Vec<u32>,
    neighbour_indices: Vec<u32>,
    vertices: u32,
    vertex_ids: Vec<u32>,
}

impl Graph {
    /// Builds a graph from an edge list. Self-loops and duplicate edges are
    /// dropped; the solver contract assumes neither.
    pub fn from_edges(vertices: u32, mut edges: Vec<(u32, u32)>, vertex_ids: Vec<u32>) -> Graph {
        debug_assert_eq!(vertex_ids.len(), vertices as usize);
        for edge in &mut edges {
            if edge.0 > edge.1 {
                *edge = (edge.1, edge.0);
            }
        }
        edges.sort_unstable();
        edges.dedup();
        let loops = edges.len();
        edges.retain(|&(u, v)| u != v);
        if loops != edges.len() {
            log::debug!("dropped {} self-loops during ingestion", loops - edges.len());
        }
        let mut graph = Graph {
            edges,
            vertices,
            vertex_ids,
            ..Default::default()
        };
        graph.populate_neighbours();
        graph
    }

    fn populate_neighbours(&mut self) {
        let mut degrees = vec![0u32; self.vertices as usize + 1];
        for &(start, end) in &self.edges {
            degrees[start as usize] += 1;
            degrees[end as usize] += 1;
        }
        self.neighbour_indices = Vec::with_capacity(self.vertices as usize + 1);
        let mut offset = 0;
        for vertex in 0..=self.vertices {
            self.neighbour_indices.push(offset);
            offset += degrees[vertex as usize];
        }
        self.neighbours = vec![0; 2 * self.edges.len()];
        let mut cursor: Vec<u32> = self.neighbour_indices.clone();
        for &(start, end) in &self.edges {
            self.neighbours[cursor[start as usize] as usize] = end;
            cursor[start as usize] += 1;
            self.neighbours[cursor[end as usize] as usize] = start;
            cursor[end as usize] += 1;
        }
        for slot in 0..self.vertices {
            let start = self.neighbour_indices[slot as usize] as usize;
            let end = self.neighbour_indices[slot as usize + 1] as usize;
            self.neighbours[start..end].sort_unstable();
        }
    }

    pub fn neighbours(&self, vertex: u32) -> &[u32] {
        let start = self.neighbour_indices[vertex as usize] as usize;
        let end = self.neighbour_indices[vertex as usize + 1] as usize;
        &self.neighbours[start..end]
    }

    pub fn degree(&self, vertex: u32) -> usize {
        self.neighbours(vertex).len()
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[(u32, u32)] {
        &self.edges
    }

    /// The index → original-identifier bijection captured at ingestion.
    pub fn vertex_ids(&self) -> &[u32] {
        &self.vertex_ids
    }
}

/// Loads a graph from `path`.
///
/// A `.dat` extension selects the pre-parsed binary adjacency format; any
/// other extension walks the ordered text-parser list (SNAP edge list, then
/// DIMACS) and takes the first success. When every candidate fails the
/// failures are surfaced together as one `Format` error.
pub fn load(path: &Path) -> Result<Graph> {
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if path.extension().is_some_and(|ext| ext == "dat") {
        return parse_dat(&bytes).map_err(Error::Format);
    }
    let text = String::from_utf8_lossy(&bytes);
    let parsers: [(&str, fn(&str) -> std::result::Result<Graph, String>); 2] =
        [("snap", parse_snap), ("dimacs", parse_dimacs)];
    let mut failures = Vec::new();
    for (name, parser) in parsers {
        match parser(&text) {
            Ok(graph) => {
                log::debug!("parsed {} as {name}", path.display());
                return Ok(graph);
            }
            Err(reason) => failures.push(format!("{name}: {reason}")),
        }
    }
    Err(Error::Format(failures.join("; ")))
}

/// SNAP edge list: one `u v` pair per line, `#` comment lines. Identifiers
/// are arbitrary, so vertices are relabeled to contiguous indices in sorted
/// identifier order.
pub fn parse_snap(input: &str) -> std::result::Result<Graph, String> {
    let mut raw_edges = Vec::new();
    for (number, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split_whitespace();
        let start = parse_id(fields.next(), number)?;
        let end = parse_id(fields.next(), number)?;
        if fields.next().is_some() {
            return Err(format!("line {}: expected two fields", number + 1));
        }
        raw_edges.push((start, end));
    }
    // Sorted-id relabeling keeps ingestion deterministic.
    let mut index_of = BTreeMap::new();
    for &(start, end) in &raw_edges {
        index_of.insert(start, 0u32);
        index_of.insert(end, 0u32);
    }
    let mut vertex_ids = Vec::with_capacity(index_of.len());
    for (slot, (&id, index)) in index_of.iter_mut().enumerate() {
        *index = slot as u32;
        vertex_ids.push(id);
    }
    let edges = raw_edges
        .iter()
        .map(|&(start, end)| (index_of[&start], index_of[&end]))
        .collect();
    Ok(Graph::from_edges(vertex_ids.len() as u32, edges, vertex_ids))
}

fn parse_id(field: Option<&str>, number: usize) -> std::result::Result<u32, String> {
    field
        .ok_or_else(|| format!("line {}: missing vertex id", number + 1))?
        .parse()
        .map_err(|_| format!("line {}: invalid vertex id", number + 1))
}

/// DIMACS: `c` comments, one `p edge <n> <m>` header, `e u v` lines with
/// 1-based endpoints. Internal index `i` keeps the original label `i + 1`.
pub fn parse_dimacs(input: &str) -> std::result::Result<Graph, String> {
    let mut vertices = None;
    let mut declared_edges = 0usize;
    let mut edges = Vec::new();
    for (number, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('c') {
            continue;
        }
        let mut fields = line.split_whitespace();
        match fields.next() {
            Some("p") => {
                if vertices.is_some() {
                    return Err(format!("line {}: duplicate problem line", number + 1));
                }
                let _format = fields
                    .next()
                    .ok_or_else(|| format!("line {}: truncated problem line", number + 1))?;
                vertices = Some(parse_id(fields.next(), number)?);
                declared_edges = parse_id(fields.next(), number)? as usize;
            }
            Some("e") => {
                let n = vertices
                    .ok_or_else(|| format!("line {}: edge before problem line", number + 1))?;
                let start = parse_id(fields.next(), number)?;
                let end = parse_id(fields.next(), number)?;
                if start < 1 || start > n || end < 1 || end > n {
                    return Err(format!("line {}: endpoint out of range", number + 1));
                }
                edges.push((start - 1, end - 1));
            }
            _ => return Err(format!("line {}: unrecognised line", number + 1)),
        }
    }
    let vertices = vertices.ok_or("missing problem line")?;
    if edges.len() != declared_edges {
        log::warn!(
            "dimacs header declared {declared_edges} edges, found {}",
            edges.len()
        );
    }
    let vertex_ids = (1..=vertices).collect();
    Ok(Graph::from_edges(vertices, edges, vertex_ids))
}

/// Binary `.dat` adjacency: little-endian `u32` vertex count, then per
/// vertex a `u32` degree followed by that many 0-based neighbour indices.
/// The adjacency must be symmetric. The identity map is the identity.
pub fn parse_dat(bytes: &[u8]) -> std::result::Result<Graph, String> {
    let mut cursor = 0usize;
    let mut next = |what: &str| -> std::result::Result<u32, String> {
        let chunk = bytes
            .get(cursor..cursor + 4)
            .ok_or_else(|| format!("truncated input while reading {what}"))?;
        cursor += 4;
        Ok(u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
    };
    let vertices = next("vertex count")?;
    let mut adjacency = Vec::with_capacity(vertices as usize);
    for vertex in 0..vertices {
        let degree = next("degree")?;
        let mut row = Vec::with_capacity(degree as usize);
        for _ in 0..degree {
            let neighbour = next("neighbour")?;
            if neighbour >= vertices {
                return Err(format!(
                    "vertex {vertex} lists out-of-range neighbour {neighbour}"
                ));
            }
            row.push(neighbour);
        }
        adjacency.push(row);
    }
    if cursor != bytes.len() {
        return Err("trailing bytes after adjacency".into());
    }
    let mut edges = Vec::new();
    for (vertex, row) in adjacency.iter().enumerate() {
        for &neighbour in row {
            if !adjacency[neighbour as usize].contains(&(vertex as u32)) {
                return Err(format!("asymmetric adjacency at ({vertex}, {neighbour})"));
            }
            if (vertex as u32) < neighbour {
                edges.push((vertex as u32, neighbour));
            }
        }
    }
    let vertex_ids = (0..vertices).collect();
    Ok(Graph::from_edges(vertices, edges, vertex_ids))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn snap_relabels_sparse_ids() {
        let graph = parse_snap("# comment\n10 30\n30 20\n").unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.vertex_ids(), &[10, 20, 30]);
        // 10 -> 0, 20 -> 1, 30 -> 2
        assert_eq!(graph.neighbours(2), &[0, 1]);
        assert_eq!(graph.neighbours(0), &[2]);
    }

    #[test]
    fn snap_drops_duplicates_and_loops() {
        let graph = parse_snap("0 1\n1 0\n1 1\n").unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn snap_rejects_dimacs() {
        assert!(parse_snap("p edge 3 2\ne 1 2\ne 2 3\n").is_err());
    }

    #[test]
    fn dimacs_keeps_one_based_labels() {
        let graph = parse_dimacs("c sample\np edge 3 2\ne 1 2\ne 2 3\n").unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.vertex_ids(), &[1, 2, 3]);
        assert_eq!(graph.neighbours(1), &[0, 2]);
    }

    #[test]
    fn dimacs_rejects_out_of_range_endpoint() {
        assert!(parse_dimacs("p edge 2 1\ne 1 3\n").is_err());
    }

    #[test]
    fn dat_round_trip() {
        // path 0 - 1 - 2
        let mut bytes = Vec::new();
        for word in [3u32, 1, 1, 2, 0, 2, 1, 1] {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        let graph = parse_dat(&bytes).unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.neighbours(1), &[0, 2]);
        assert_eq!(graph.vertex_ids(), &[0, 1, 2]);
    }

    #[test]
    fn dat_rejects_asymmetry() {
        let mut bytes = Vec::new();
        for word in [2u32, 1, 1, 0] {
            bytes.extend_from_slice(&word.to_le_bytes());
        }
        assert!(parse_dat(&bytes).unwrap_err().contains("asymmetric"));
    }

    #[test]
    fn load_falls_back_to_dimacs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graph.col");
        std::fs::write(&path, "p edge 2 1\ne 1 2\n").unwrap();
        let graph = load(&path).unwrap();
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn load_reports_both_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.txt");
        std::fs::write(&path, "neither one\nnor the other\n").unwrap();
        let err = load(&path).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("snap:"), "{message}");
        assert!(message.contains("dimacs:"), "{message}");
    }

    #[test]
    fn load_missing_file_is_io() {
        let err = load(Path::new("/nonexistent/graph.txt")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
