//! Splits the vertices of a doubled (mirrored) graph into an odd-cycle
//! transversal, a bipartite remainder and an undecided rest, by reading a
//! minimum-vertex-cover assignment back through the mirror encoding.

use std::path::Path;

pub mod classify;
pub mod error;
pub mod graph;
pub mod solver;

pub use classify::{classify, Assignment, Partition};
pub use error::{Error, Result};
pub use solver::{Branching, LowerBound, Reduction, SolverConfig, VcSolver};

/// Runs the whole pipeline on one input file: load the doubled graph, run
/// the cover solver, decode the assignment into the three-way partition and
/// relabel it with the original vertex identifiers captured at ingestion.
pub fn split_graph(path: &Path, config: &SolverConfig) -> Result<Partition> {
    log::info!("reading the input graph from {}", path.display());
    let graph = graph::load(path)?;
    let total = graph.vertex_count();
    log::info!("n = {}, m = {}", total, graph.edge_count());
    if total % 2 != 0 {
        return Err(Error::MalformedDoubledGraph(format!(
            "doubled graph needs an even vertex count, got {total}"
        )));
    }
    let originals = (total / 2) as usize;
    let assignment = VcSolver::new(&graph).preprocess(config);
    let partition = classify(originals, &assignment)?;
    Ok(partition.relabel(graph.vertex_ids()))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write as _;

    /// Mirror encoding of an original graph: vertex `v` becomes copies `v`
    /// and `v + n`, edge `{u, v}` becomes `{u, v + n}` and `{v, u + n}`.
    fn doubled_edges(n: u32, edges: &[(u32, u32)]) -> Vec<(u32, u32)> {
        edges
            .iter()
            .flat_map(|&(u, v)| [(u, v + n), (v, u + n)])
            .collect()
    }

    fn write_snap(edges: &[(u32, u32)]) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doubled.snap");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "# doubled graph").unwrap();
        for (u, v) in edges {
            writeln!(file, "{u} {v}").unwrap();
        }
        (dir, path)
    }

    #[test]
    fn doubled_triangle_end_to_end() {
        // Triangle 0-1-2; its double is a six-cycle.
        let edges = doubled_edges(3, &[(0, 1), (1, 2), (0, 2)]);
        let (_dir, path) = write_snap(&edges);
        let partition = split_graph(&path, &SolverConfig::default()).unwrap();
        assert_eq!(partition.format(), "OCT:\nBipartite: 2\nRest: 0 1\n");
    }

    #[test]
    fn doubled_triangle_without_reductions_is_all_rest() {
        let edges = doubled_edges(3, &[(0, 1), (1, 2), (0, 2)]);
        let (_dir, path) = write_snap(&edges);
        let config = SolverConfig {
            reduction: Reduction::None,
            ..Default::default()
        };
        let partition = split_graph(&path, &config).unwrap();
        assert_eq!(partition.format(), "OCT:\nBipartite:\nRest: 0 1 2\n");
    }

    #[test]
    fn report_uses_original_identifiers() {
        // Same doubled triangle, but with every identifier scaled by ten so
        // ingestion has to relabel: internal index i maps back to 10 * i.
        let edges: Vec<(u32, u32)> = doubled_edges(3, &[(0, 1), (1, 2), (0, 2)])
            .iter()
            .map(|&(u, v)| (10 * u, 10 * v))
            .collect();
        let (_dir, path) = write_snap(&edges);
        let partition = split_graph(&path, &SolverConfig::default()).unwrap();
        assert_eq!(partition.format(), "OCT:\nBipartite: 20\nRest: 0 10\n");
    }

    #[test]
    fn odd_vertex_count_is_malformed() {
        let (_dir, path) = write_snap(&[(0, 1), (1, 2)]);
        let err = split_graph(&path, &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, Error::MalformedDoubledGraph(_)));
    }

    #[test]
    fn missing_file_is_io() {
        let err =
            split_graph(Path::new("/no/such/graph.snap"), &SolverConfig::default()).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
