//! Generator configuration.

/// Default name of the generated registration entry point.
pub const DEFAULT_ENTRY_POINT: &str = "RegisterAngelscriptObjects";

/// Most parameters the generic calling-convention wrappers can forward.
pub const DEFAULT_MAX_PARAMS: usize = 16;

/// How 32-bit integers are spelled in generated declarations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IntNaming {
    /// The engine's default names: `int` and `uint`.
    #[default]
    Runtime,
    /// Width-suffixed names throughout: `int32` and `uint32`.
    FixedWidth,
}

/// Options controlling a generator run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorOptions {
    /// Integer naming convention.
    pub int_naming: IntNaming,
    /// Name of the exported registration function.
    pub entry_point: String,
    /// Members with more parameters than this are not registered.
    pub max_params: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            int_naming: IntNaming::default(),
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
            max_params: DEFAULT_MAX_PARAMS,
        }
    }
}
