use std::{fs, path::PathBuf};

use ontomaker_core::automation::effect_uuid;
use ontomaker_core::document::OntologyDocument;
use ontomaker_core::error::MakerError;
use ontomaker_core::{OntologyCompilation, define_ontology};
use serde_json::{Value, json};
use tempfile::tempdir;

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("staffing_ontology.json")
}

fn load_document() -> OntologyDocument {
    OntologyDocument::load(&fixture_path()).expect("load staffing fixture")
}

fn compile(document: &OntologyDocument, output_dir: Option<&std::path::Path>) -> OntologyCompilation {
    let namespace = document.namespace.clone().expect("fixture namespace");
    define_ontology(&namespace, output_dir, |builder| document.apply(builder))
        .expect("compile staffing fixture")
}

fn keys(map: &std::collections::BTreeMap<String, Value>) -> Vec<&str> {
    map.keys().map(String::as_str).collect()
}

#[test]
fn fixture_compiles_into_every_block() {
    let compilation = compile(&load_document(), None);
    let block_data = &compilation.ontology.block_data;

    assert_eq!(
        keys(&block_data.object_types),
        vec!["com.palantir.employee", "com.palantir.office"]
    );
    assert_eq!(
        keys(&block_data.link_types),
        vec!["employee-mentors", "office-employees"]
    );
    assert_eq!(keys(&block_data.interface_types), vec!["com.palantir.named"]);
    assert_eq!(
        keys(&block_data.shared_property_types),
        vec!["com.palantir.fullName"]
    );
    assert_eq!(
        keys(&block_data.action_types),
        vec![
            "com.palantir.create-object-office",
            "com.palantir.delete-object-office"
        ]
    );
    assert_eq!(
        keys(&block_data.block_permission_information.action_types),
        vec!["com.palantir.delete-object-office"]
    );

    let employee = &block_data.object_types["com.palantir.employee"]["objectType"];
    assert_eq!(
        employee["implementsInterfaces2"],
        json!([{
            "interfaceTypeApiName": "com.palantir.named",
            "properties": {"com.palantir.fullName": {"propertyTypeRid": "name"}},
        }])
    );

    let office_link = &block_data.link_types["office-employees"]["linkType"];
    assert_eq!(office_link["id"], "office-employees");
    assert_eq!(office_link["definition"]["type"], "oneToMany");

    let named = &block_data.interface_types["com.palantir.named"]["interfaceType"];
    assert_eq!(
        named["links"][0]["linkedEntityTypeId"],
        json!({"type": "objectType", "objectType": "com.palantir.office"})
    );

    assert_eq!(compilation.value_types["valueTypes"][0]["metadata"]["apiName"], "score");
    assert_eq!(compilation.compute_modules["scorer"]["numberOfFunctionsRegistered"], 1);
}

#[test]
fn automation_effects_resolve_against_fixture_entities() {
    let compilation = compile(&load_document(), None);
    let automation = compilation.automation.expect("fixture defines an automation");
    let effect = &automation["automationBlockData"]["subscribers"][0]["triggerEffects"]
        [effect_uuid("openOffice")];
    assert_eq!(
        effect["action"]["actionInputs"]["action-parameter-com.palantir.create-object-office-city"],
        json!({"type": "staticValue", "staticValue": "Denver"})
    );
    assert_eq!(
        automation["automationShapeData"]["objectTypes"],
        json!({"object-type-com.palantir.employee": {"apiName": "com.palantir.employee"}})
    );
}

#[test]
fn repeated_compilations_are_byte_identical() {
    let document = load_document();
    let render = |compilation: &OntologyCompilation| {
        serde_json::to_string(&json!({
            "ontology": compilation.ontology,
            "valueTypes": compilation.value_types,
            "automation": compilation.automation,
            "computeModules": compilation.compute_modules,
        }))
        .expect("render compilation")
    };
    assert_eq!(render(&compile(&document, None)), render(&compile(&document, None)));
}

#[test]
fn static_exports_are_written_after_lowering() {
    let temp = tempdir().expect("tempdir");
    compile(&load_document(), Some(temp.path()));

    let codegen = temp.path().join("codegen");
    let employee =
        fs::read_to_string(codegen.join("object-types").join("employee.ts")).expect("employee module");
    assert!(employee.contains("export default employee;"));
    let index = fs::read_to_string(codegen.join("index.ts")).expect("index");
    assert!(index.contains("compute_modules_scorer"));
    assert!(index.contains("link_types_officeEmployees"));
}

#[test]
fn failed_lowering_leaves_output_untouched() {
    let mut document = load_document();
    document.compute_modules[0].open_api["servers"] = json!([{"url": "http://localhost:8080/api"}]);
    let namespace = document.namespace.clone().expect("fixture namespace");
    let temp = tempdir().expect("tempdir");

    let err = define_ontology(&namespace, Some(temp.path()), |builder| document.apply(builder))
        .expect_err("context path must fail lowering");
    assert!(matches!(err, MakerError::Validation(_)));
    assert!(!temp.path().join("codegen").exists());
}
