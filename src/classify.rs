use std::fmt::Write;

use crate::error::{Error, Result};

/// Per-vertex outcome of the cover solver, in the solver's raw `i8`
/// encoding: -1 undetermined, 0 excluded from the cover, 1 included,
/// 2 removed by a folding reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i8)]
pub enum Assignment {
    Undetermined = -1,
    Excluded = 0,
    Included = 1,
    Folded = 2,
}

impl Assignment {
    pub fn from_raw(vertex: usize, value: i8) -> Result<Assignment> {
        match value {
            -1 => Ok(Assignment::Undetermined),
            0 => Ok(Assignment::Excluded),
            1 => Ok(Assignment::Included),
            2 => Ok(Assignment::Folded),
            _ => Err(Error::InvalidAssignment { vertex, value }),
        }
    }
}

/// Three disjoint vertex sets covering the original `[0, n)` exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    pub oct: Vec<u32>,
    pub bipartite: Vec<u32>,
    pub rest: Vec<u32>,
}

impl Partition {
    /// Maps internal indices to their original identifiers, preserving
    /// order within each set.
    pub fn relabel(&self, vertex_ids: &[u32]) -> Partition {
        let map = |set: &[u32]| set.iter().map(|&v| vertex_ids[v as usize]).collect();
        Partition {
            oct: map(&self.oct),
            bipartite: map(&self.bipartite),
            rest: map(&self.rest),
        }
    }

    /// Renders the three-line report: fixed set order, `Label:` then one
    /// space-prefixed member per vertex, empty list when a set is empty.
    pub fn format(&self) -> String {
        let mut output = String::new();
        for (label, set) in [
            ("OCT", &self.oct),
            ("Bipartite", &self.bipartite),
            ("Rest", &self.rest),
        ] {
            let _ = write!(&mut output, "{label}:");
            for vertex in set {
                let _ = write!(&mut output, " {vertex}");
            }
            let _ = writeln!(&mut output);
        }
        output
    }
}

/// Decodes a vertex-cover assignment over a doubled graph into the
/// three-way partition of the `n` original vertices.
///
/// Index `i` and index `i + n` are the two copies of original vertex `i`,
/// one per hypothetical bipartition side. Per vertex, in priority order:
/// both copies included in the cover means no consistent side exists, so
/// the vertex is forced into the odd cycle transversal; either copy
/// provably excluded means the vertex can take that side of the bipartite
/// remainder; everything else stays undecided.
pub fn classify(n: usize, assignment: &[i8]) -> Result<Partition> {
    if assignment.len() != 2 * n {
        return Err(Error::MalformedDoubledGraph(format!(
            "expected {} assignments for {n} original vertices, got {}",
            2 * n,
            assignment.len()
        )));
    }
    let mut partition = Partition::default();
    for i in 0..n {
        let primary = Assignment::from_raw(i, assignment[i])?;
        let mirror = Assignment::from_raw(i + n, assignment[i + n])?;
        if primary == Assignment::Included && mirror == Assignment::Included {
            partition.oct.push(i as u32);
        } else if primary == Assignment::Excluded || mirror == Assignment::Excluded {
            partition.bipartite.push(i as u32);
        } else {
            partition.rest.push(i as u32);
        }
    }
    Ok(partition)
}
