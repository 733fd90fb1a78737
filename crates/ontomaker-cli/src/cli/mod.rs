use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[cfg(test)]
mod tests;

#[derive(Debug, Parser)]
#[command(name = "ontomaker")]
#[command(about = "Compile ontology definition documents into wire IR", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Lower a definition document and print or write the IR.
    Compile(CompileArgs),
    /// Check a definition document without writing anything.
    Validate(DocumentArgs),
    /// Convert an OpenAPI document into a compute-module endpoint spec.
    Openapi(OpenApiArgs),
}

impl Commands {
    /// Operation name reported in error payloads.
    pub const fn operation(&self) -> &'static str {
        match self {
            Self::Compile(_) => "compile",
            Self::Validate(_) => "validate",
            Self::Openapi(_) => "openapi",
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct DocumentArgs {
    /// Definition document (.json, .yaml, .yml or .toml).
    pub document: PathBuf,

    /// Namespace prefix for local API names; overrides ONTOMAKER_NAMESPACE.
    #[arg(long)]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct CompileArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// Directory receiving `codegen/` static exports; overrides ONTOMAKER_OUTPUT_DIR.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub skip_export: bool,

    #[arg(long, value_enum, default_value_t = IrSection::All)]
    pub section: IrSection,

    /// Write the IR JSON here instead of stdout.
    #[arg(long)]
    pub ir_out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IrSection {
    All,
    Ontology,
    ValueTypes,
    Automation,
    ComputeModules,
}

#[derive(Debug, Clone, Args)]
pub struct OpenApiArgs {
    /// OpenAPI 3 document in JSON.
    pub spec: PathBuf,
}
