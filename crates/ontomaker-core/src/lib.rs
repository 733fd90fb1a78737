// Public fallible APIs in this crate share one concrete error contract (`MakerError`).
#![allow(
    clippy::missing_errors_doc,
    reason = "crate-wide fallible API uses one explicit error type; per-item boilerplate would duplicate contract"
)]

pub mod automation;
pub mod builder;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub(crate) mod iso8601;
pub mod lower;
pub mod model;
pub mod naming;
pub mod registry;
pub mod wire;

pub use builder::{OntologyBuilder, OntologyCompilation, define_ontology};
pub use config::CompilerConfig;
pub use document::{DocumentFormat, OntologyDocument};
pub use error::{ErrorPayload, MakerError, Result};
pub use lower::OntologyIr;
pub use registry::{EntityLookup, OntologyDefinition, OntologyEntity, OntologyEntityKind};
