use std::fmt::Write;

use bitvec::prelude::*;
use clap::ValueEnum;
use smallvec::SmallVec;

use crate::graph::Graph;

/// Which kernelization rules run during `preprocess`.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Reduction {
    /// No reductions; every vertex stays undetermined.
    None,
    /// Degree-0, pendant and triangle rules.
    Degree,
    /// Degree rules plus degree-2 folding.
    #[default]
    Folding,
}

/// Initial pruning budget for the branch-and-bound search.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LowerBound {
    /// Vertex count as the budget.
    None,
    /// min(vertices, edges), the trivial cover bound.
    #[default]
    Trivial,
}

/// Branch order of the search.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Branching {
    Input,
    MinDeg,
    #[default]
    MaxDeg,
}

/// Immutable per-invocation solver options. One value is threaded through
/// each call instead of process-wide flags, so concurrent runs with
/// different options cannot interfere.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolverConfig {
    pub reduction: Reduction,
    pub lower_bound: LowerBound,
    pub branching: Branching,
}

/// A vertex cover over internal indices.
#[derive(Debug, Clone, Default)]
pub struct Cover {
    pub vertices: Vec<u32>,
}

impl Cover {
    fn from_bits(bits: &BitSlice) -> Cover {
        Cover {
            vertices: bits.iter_ones().map(|x| x as u32).collect(),
        }
    }

    pub fn is_cover_of(&self, graph: &Graph) -> bool {
        for &(start, end) in graph.edges() {
            if !(self.vertices.contains(&start) || self.vertices.contains(&end)) {
                log::debug!("edge ({start}, {end}) not covered");
                return false;
            }
        }
        true
    }

    pub fn relabel(&self, vertex_ids: &[u32]) -> Cover {
        Cover {
            vertices: self
                .vertices
                .iter()
                .map(|&v| vertex_ids[v as usize])
                .collect(),
        }
    }

    /// Size on the first line, one vertex per following line.
    pub fn format(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(&mut output, "{}", self.vertices.len());
        for vertex in &self.vertices {
            let _ = writeln!(&mut output, "{vertex}");
        }
        output
    }
}

/// Minimum-vertex-cover engine over a fixed graph.
///
/// `preprocess` is the oracle call of the classification pipeline: a
/// kernelization fixpoint that labels each vertex -1 (undetermined),
/// 0 (excluded), 1 (included) or 2 (removed by folding). For every edge
/// whose endpoints are both labeled 0/1, at least one endpoint is 1.
pub struct VcSolver<'a> {
    graph: &'a Graph,
}

impl<'a> VcSolver<'a> {
    pub fn new(graph: &'a Graph) -> VcSolver<'a> {
        VcSolver { graph }
    }

    fn residual_adjacency(&self) -> Vec<BitVec> {
        let n = self.graph.vertex_count() as usize;
        (0..n)
            .map(|v| {
                let mut bits = bitvec![0; n];
                for &w in self.graph.neighbours(v as u32) {
                    bits.set(w as usize, true);
                }
                bits
            })
            .collect()
    }

    pub fn preprocess(&self, config: &SolverConfig) -> Vec<i8> {
        let n = self.graph.vertex_count() as usize;
        let mut assignment = vec![-1i8; n];
        if config.reduction == Reduction::None {
            return assignment;
        }
        let mut adj = self.residual_adjacency();
        loop {
            let mut changed = false;
            for v in 0..n {
                if assignment[v] != -1 {
                    continue;
                }
                match adj[v].count_ones() {
                    0 => {
                        assignment[v] = 0;
                        changed = true;
                    }
                    1 => {
                        log::trace!("pendant rule at {v}");
                        let u = adj[v].iter_ones().next().unwrap();
                        assignment[u] = 1;
                        assignment[v] = 0;
                        detach(&mut adj, u);
                        detach(&mut adj, v);
                        changed = true;
                    }
                    2 => {
                        let (a, b) = {
                            let mut ones = adj[v].iter_ones();
                            (ones.next().unwrap(), ones.next().unwrap())
                        };
                        if adj[a][b] {
                            log::trace!("triangle rule at {v}");
                            assignment[a] = 1;
                            assignment[b] = 1;
                            assignment[v] = 0;
                            detach(&mut adj, a);
                            detach(&mut adj, b);
                            detach(&mut adj, v);
                            changed = true;
                        } else if config.reduction == Reduction::Folding {
                            log::trace!("folding {v} and merging {b} into {a}");
                            assignment[v] = 2;
                            assignment[b] = 2;
                            let merged: SmallVec<[usize; 8]> = adj[b].iter_ones().collect();
                            detach(&mut adj, v);
                            detach(&mut adj, b);
                            for w in merged {
                                if w != v {
                                    adj[a].set(w, true);
                                    adj[w].set(a, true);
                                }
                            }
                            changed = true;
                        }
                    }
                    _ => {}
                }
            }
            if !changed {
                break;
            }
        }
        assignment
    }

    /// Full minimum-cover search: include-only reduction seeding, then the
    /// two-way branch (take `v`, or take all of `N(v)`).
    pub fn compute_cover(&self, config: &SolverConfig) -> Cover {
        let n = self.graph.vertex_count() as usize;
        // Folding decisions cannot seed the search, so cap the rules at the
        // include-only level.
        let seed_level = match config.reduction {
            Reduction::None => Reduction::None,
            _ => Reduction::Degree,
        };
        let seed = self.preprocess(&SolverConfig {
            reduction: seed_level,
            ..*config
        });
        let mut selected = bitvec![0; n];
        for (v, &value) in seed.iter().enumerate() {
            if value == 1 {
                selected.set(v, true);
            }
        }

        let mut order: Vec<u32> = (0..n as u32).collect();
        match config.branching {
            Branching::Input => {}
            Branching::MinDeg => order.sort_by_key(|&v| self.graph.degree(v)),
            Branching::MaxDeg => order.sort_by_key(|&v| std::cmp::Reverse(self.graph.degree(v))),
        }
        // Strictly above any optimum, so the best leaf always propagates.
        let budget = match config.lower_bound {
            LowerBound::None => n as u32 + 1,
            LowerBound::Trivial => (n as u32).min(self.graph.edge_count() as u32) + 1,
        };
        let ones = selected.count_ones() as u32;
        let (min, bits) = search(self.graph, selected, &order, budget, ones);
        log::debug!("minimum cover size {min}");
        Cover::from_bits(&bits)
    }
}

fn detach(adj: &mut [BitVec], v: usize) {
    let neighbours: SmallVec<[usize; 8]> = adj[v].iter_ones().collect();
    for w in neighbours {
        adj[w].set(v, false);
    }
    adj[v].fill(false);
}

fn search(graph: &Graph, selected: BitVec, vertices: &[u32], mut min: u32, ones: u32) -> (u32, BitVec) {
    if vertices.is_empty() {
        debug_assert!(Cover::from_bits(&selected).is_cover_of(graph));
        return (ones, selected);
    }
    let v = vertices[0];
    let vertices = &vertices[1..];
    if ones > min {
        return (min + 1, selected);
    }
    if selected[v as usize] {
        return search(graph, selected, vertices, min, ones);
    }
    let neighbours = graph.neighbours(v);
    let all = neighbours.iter().all(|&w| selected[w as usize]);

    let mut first = selected.clone();
    let set = if !all {
        first.set(v as usize, true);
        1
    } else {
        0
    };
    let (first_result, mut min_vec) = search(graph, first, vertices, min, ones + set);
    if first_result < min {
        min = first_result;
    }

    let mut second = selected.clone();
    let mut added = 0;
    for &neighbour in neighbours {
        if !second[neighbour as usize] {
            second.set(neighbour as usize, true);
            added += 1;
        }
    }
    let (result, second) = search(graph, second, vertices, min, ones + added);
    if result < min {
        min = result;
        min_vec = second;
    }

    (min, min_vec)
}
