use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result, anyhow};
use ontomaker_core::lower::convert_open_api_to_function_spec;
use ontomaker_core::registry::ALL_KINDS;
use ontomaker_core::{CompilerConfig, OntologyBuilder, OntologyCompilation, OntologyDocument};
use serde_json::{Map, Value, json};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands, CompileArgs, DocumentArgs, IrSection, OpenApiArgs};


pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = CompilerConfig::from_env()?;
    init_tracing(&config.log_filter);

    match cli.command {
        Commands::Compile(args) => run_compile(config, &args),
        Commands::Validate(args) => run_validate(config, &args),
        Commands::Openapi(args) => run_openapi(&args),
    }
}

fn init_tracing(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed when commands run inside tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .try_init();
}

fn run_compile(config: CompilerConfig, args: &CompileArgs) -> Result<()> {
    let document = OntologyDocument::load(&args.document.document)?;
    let config = config.with_overrides(
        args.document.namespace.as_deref(),
        args.output_dir.clone(),
        args.skip_export,
    )?;
    let namespace = resolve_namespace(&config, &document)?;

    let compilation = ontomaker_core::define_ontology(&namespace, config.export_dir(), |builder| {
        document.apply(builder)
    })?;
    let ir = select_section(&compilation, args.section)?;

    match &args.ir_out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            let rendered = serde_json::to_string_pretty(&ir)?;
            fs::write(path, format!("{rendered}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "wrote IR");
        }
        None => print_json(&ir)?,
    }
    Ok(())
}

fn run_validate(config: CompilerConfig, args: &DocumentArgs) -> Result<()> {
    let document = OntologyDocument::load(&args.document)?;
    let config = config.with_overrides(args.namespace.as_deref(), None, true)?;
    let namespace = resolve_namespace(&config, &document)?;

    let mut builder = OntologyBuilder::new(&namespace)?;
    document.apply(&mut builder)?;
    builder.compile()?;

    let entities = ALL_KINDS
        .iter()
        .map(|kind| (kind.as_str().to_string(), json!(builder.definition().count(*kind))))
        .collect::<Map<_, _>>();
    print_json(&json!({
        "status": "ok",
        "namespace": builder.namespace(),
        "entities": entities,
        "imported": builder.imported().total(),
    }))
}

fn run_openapi(args: &OpenApiArgs) -> Result<()> {
    let raw = fs::read_to_string(&args.spec)
        .with_context(|| format!("failed to read {}", args.spec.display()))?;
    let spec = convert_open_api_to_function_spec(&raw)
        .with_context(|| format!("failed to convert {}", args.spec.display()))?;
    print_json(&spec)
}

/// Command line, then environment, then the document itself.
fn resolve_namespace(config: &CompilerConfig, document: &OntologyDocument) -> Result<String> {
    config
        .namespace
        .clone()
        .or_else(|| document.namespace.clone())
        .ok_or_else(|| {
            anyhow!("no namespace given: pass --namespace, set ONTOMAKER_NAMESPACE, or add one to the document")
        })
}

fn select_section(compilation: &OntologyCompilation, section: IrSection) -> Result<Value> {
    Ok(match section {
        IrSection::All => json!({
            "automation": compilation.automation,
            "computeModules": compilation.compute_modules,
            "ontology": serde_json::to_value(&compilation.ontology)?,
            "valueTypes": compilation.value_types,
        }),
        IrSection::Ontology => serde_json::to_value(&compilation.ontology)?,
        IrSection::ValueTypes => compilation.value_types.clone(),
        IrSection::Automation => compilation.automation.clone().unwrap_or(Value::Null),
        IrSection::ComputeModules => compilation.compute_modules.clone(),
    })
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
