use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors of a classification run. There is no local recovery except
/// the two-parser ingestion fallback, which is handled inside the loader.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unable to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no supported graph format matched: {0}")]
    Format(String),

    #[error("solver returned assignment {value} for vertex {vertex}, outside the domain {{-1, 0, 1, 2}}")]
    InvalidAssignment { vertex: usize, value: i8 },

    #[error("malformed doubled graph: {0}")]
    MalformedDoubledGraph(String),
}

pub type Result<T> = std::result::Result<T, Error>;
