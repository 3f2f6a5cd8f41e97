//! Generate AngelScript registration headers from Doxygen XML.
//!
//! This crate wires the [`angelscript_symbols`] loader to the
//! [`angelscript_generator`] pipeline and writes the result to disk. The
//! binary in `main.rs` is a thin clap front end over [`run`].
//!
//! ```no_run
//! use angelscript_bindgen::{Config, run};
//!
//! let config = Config::new("doxygen/xml", ["Vec2", "Widget"]);
//! let outcome = run(&config)?;
//! for diagnostic in &outcome.diagnostics {
//!     eprintln!("{diagnostic}");
//! }
//! # Ok::<(), angelscript_bindgen::BindgenError>(())
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use angelscript_generator::{Diagnostics, GeneratorOptions, Report, generate};
use angelscript_symbols::{SymbolError, doxygen};
use thiserror::Error;

pub use angelscript_generator as generator;
pub use angelscript_symbols as symbols;

/// File written when no output path is given.
pub const DEFAULT_OUTPUT: &str = "angelscript_symbols_cpp.h";

/// Errors that stop a run.
///
/// Missing names and unbindable members are not errors; they come back as
/// [`Diagnostics`] and exclusion comments in the header.
#[derive(Debug, Error)]
pub enum BindgenError {
    /// The output file could not be created or written.
    #[error("cannot write '{}': {source}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The Doxygen XML could not be loaded.
    #[error(transparent)]
    Symbols(#[from] SymbolError),
}

/// One generator invocation.
#[derive(Debug, Clone)]
pub struct Config {
    /// Doxygen XML output directory.
    pub xml_dir: PathBuf,
    /// Qualified names to bind, in output order.
    pub names: Vec<String>,
    /// Header to write.
    pub output: PathBuf,
    pub options: GeneratorOptions,
}

impl Config {
    /// A config writing to [`DEFAULT_OUTPUT`] with default options.
    pub fn new<I, S>(xml_dir: impl Into<PathBuf>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            xml_dir: xml_dir.into(),
            names: names.into_iter().map(Into::into).collect(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            options: GeneratorOptions::default(),
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_options(mut self, options: GeneratorOptions) -> Self {
        self.options = options;
        self
    }
}

/// What a successful run produced besides the header.
#[derive(Debug)]
pub struct Outcome {
    pub diagnostics: Diagnostics,
    pub report: Report,
}

/// Load the symbol table, generate the registration program and write it.
///
/// The output file is created before any input is read, so an unwritable
/// destination fails fast.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn run(config: &Config) -> Result<Outcome, BindgenError> {
    let file = File::create(&config.output).map_err(|source| output_error(&config.output, source))?;
    let mut sink = BufWriter::new(file);

    let table = doxygen::load_directory(&config.xml_dir)?;
    tracing::debug!(symbols = table.len(), "symbol table frozen");

    let generated = generate(&table, &config.names, &config.options);
    generated
        .program
        .write_to(&mut sink)
        .and_then(|()| sink.flush())
        .map_err(|source| output_error(&config.output, source))?;

    tracing::info!(
        output = %config.output.display(),
        diagnostics = generated.diagnostics.len(),
        "wrote registration header"
    );
    Ok(Outcome {
        diagnostics: generated.diagnostics,
        report: generated.report,
    })
}

fn output_error(path: &Path, source: io::Error) -> BindgenError {
    BindgenError::Output {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = Config::new("xml", ["A", "B"]);
        assert_eq!(config.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(config.names, ["A", "B"]);
        assert_eq!(config.options, GeneratorOptions::default());
    }

    #[test]
    fn output_error_names_the_path() {
        let err = output_error(
            Path::new("out/header.h"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.to_string(), "cannot write 'out/header.h': denied");
    }
}
