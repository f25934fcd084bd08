use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use oct_mirror::{graph, solver, split_graph, Branching, LowerBound, Reduction, SolverConfig};

/// Classifies the vertices of a doubled graph into an odd-cycle
/// transversal, a bipartite remainder and an undecided rest.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Input graph file; `.dat` selects the binary adjacency format, any
    /// other extension tries the SNAP edge list and then DIMACS.
    input: PathBuf,

    /// Kernelization rules to run
    #[arg(short = 'r', long, value_enum, default_value_t)]
    reduction: Reduction,

    /// Pruning budget of the cover search
    #[arg(short = 'l', long, value_enum, default_value_t)]
    lower_bound: LowerBound,

    /// Branch order of the cover search
    #[arg(short = 'b', long, value_enum, default_value_t)]
    branching: Branching,

    /// Print a minimum vertex cover instead of the classification. The
    /// first line is the cover size, each following line one vertex ID.
    #[arg(short = 'p', long)]
    print_cover: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = SolverConfig {
        reduction: cli.reduction,
        lower_bound: cli.lower_bound,
        branching: cli.branching,
    };

    if cli.print_cover {
        let graph = graph::load(&cli.input)?;
        let cover = solver::VcSolver::new(&graph).compute_cover(&config);
        print!("{}", cover.relabel(graph.vertex_ids()).format());
        return Ok(());
    }

    let partition = split_graph(&cli.input, &config)?;
    print!("{}", partition.format());
    Ok(())
}
