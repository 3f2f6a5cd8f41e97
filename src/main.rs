//! angelscript-bindgen - write an AngelScript registration header for types
//! described by Doxygen XML.

use std::path::PathBuf;
use std::process::ExitCode;

use angelscript_bindgen::generator::{
    DEFAULT_ENTRY_POINT, DEFAULT_MAX_PARAMS, GeneratorOptions, IntNaming,
};
use angelscript_bindgen::{Config, DEFAULT_OUTPUT, run};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "angelscript-bindgen", version)]
#[command(about = "Generate AngelScript registration code from Doxygen XML")]
struct Cli {
    /// Doxygen XML output directory
    xml_dir: PathBuf,

    /// Qualified names of the classes, enums and typedefs to bind
    #[arg(required = true, num_args = 1..)]
    names: Vec<String>,

    /// Header to write
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Name of the generated registration function
    #[arg(long, default_value = DEFAULT_ENTRY_POINT)]
    entry_point: String,

    /// Spell 32-bit integers as int32/uint32
    #[arg(long)]
    fixed_width_ints: bool,

    /// Skip members with more parameters than this
    #[arg(long, default_value_t = DEFAULT_MAX_PARAMS)]
    max_params: usize,
}

impl Cli {
    fn into_config(self) -> Config {
        let options = GeneratorOptions {
            int_naming: if self.fixed_width_ints {
                IntNaming::FixedWidth
            } else {
                IntNaming::Runtime
            },
            entry_point: self.entry_point,
            max_params: self.max_params,
        };
        Config::new(self.xml_dir, self.names)
            .with_output(self.output)
            .with_options(options)
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "angelscript_bindgen=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Cli::parse().into_config();

    match run(&config) {
        Ok(outcome) => {
            for diagnostic in &outcome.diagnostics {
                eprintln!("{diagnostic}");
            }
            tracing::info!(
                bound = outcome.report.bound,
                registered = outcome.report.registered,
                excluded = outcome.report.excluded,
                trampolines = outcome.report.trampolines,
                "done"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
