use super::*;
use clap::Parser;

#[test]
fn compile_parses_document_and_overrides() {
    let cli = Cli::try_parse_from([
        "ontomaker",
        "compile",
        "ontology.yaml",
        "--namespace",
        "com.palantir",
        "--output-dir",
        "out",
        "--section",
        "value-types",
    ])
    .expect("parse");
    match cli.command {
        Commands::Compile(args) => {
            assert_eq!(args.document.document, PathBuf::from("ontology.yaml"));
            assert_eq!(args.document.namespace.as_deref(), Some("com.palantir"));
            assert_eq!(args.output_dir, Some(PathBuf::from("out")));
            assert_eq!(args.section, IrSection::ValueTypes);
            assert!(!args.skip_export);
            assert!(args.ir_out.is_none());
        }
        _ => panic!("expected compile command"),
    }
}

#[test]
fn compile_defaults_to_all_sections() {
    let cli = Cli::try_parse_from(["ontomaker", "compile", "ontology.json", "--skip-export"])
        .expect("parse");
    match cli.command {
        Commands::Compile(args) => {
            assert_eq!(args.section, IrSection::All);
            assert!(args.skip_export);
        }
        _ => panic!("expected compile command"),
    }
}

#[test]
fn validate_requires_a_document() {
    assert!(Cli::try_parse_from(["ontomaker", "validate"]).is_err());
    let cli = Cli::try_parse_from(["ontomaker", "validate", "ontology.toml"]).expect("parse");
    assert_eq!(cli.command.operation(), "validate");
}

#[test]
fn unknown_section_is_rejected() {
    let parsed = Cli::try_parse_from(["ontomaker", "compile", "o.json", "--section", "links"]);
    assert!(parsed.is_err(), "links is not an IR section");
}
