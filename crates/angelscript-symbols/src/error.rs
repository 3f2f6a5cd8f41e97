//! Errors raised while loading a symbol graph.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort loading of a symbol graph.
#[derive(Debug, Error)]
pub enum SymbolError {
    /// The input path does not name a directory.
    #[error("'{}' is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    /// A file or directory could not be read.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file is not well-formed XML.
    #[error("malformed XML in '{}': {source}", path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: roxmltree::Error,
    },
}
