//! Static export writer.
//!
//! Mirrors every registered entity into `<output>/codegen/` as a TypeScript module holding the
//! entity as a literal, plus an `index.ts` re-exporting all of them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{MakerError, Result};
use crate::naming::strip_namespace;
use crate::registry::OntologyDefinition;

pub const CODEGEN_DIR: &str = "codegen";
const INDEX_FILE: &str = "index.ts";

/// One module to write, relative to the codegen directory.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StaticModule {
    type_dir: &'static str,
    api_name: String,
    file_stem: String,
    literal: String,
}

impl StaticModule {
    fn new<T: Serialize + ?Sized>(
        type_dir: &'static str,
        namespace: &str,
        api_name: &str,
        entity: &T,
    ) -> Result<Self> {
        Ok(Self {
            type_dir,
            api_name: api_name.to_string(),
            file_stem: identifier(strip_namespace(namespace, api_name)),
            literal: serde_json::to_string_pretty(entity)?,
        })
    }

    fn relative_path(&self) -> String {
        format!("{}/{}.ts", self.type_dir, self.file_stem)
    }

    fn source(&self) -> String {
        format!(
            "const {ident} = {literal} as const;\n\nexport default {ident};\n",
            ident = self.file_stem,
            literal = self.literal,
        )
    }

    /// Unique across the index: the type directory disambiguates equal stems.
    fn index_ident(&self) -> String {
        format!("{}_{}", identifier(self.type_dir), self.file_stem)
    }
}

/// Rewrites `<output_dir>/codegen/` from scratch and returns every file written.
pub fn write_static_objects(
    definition: &OntologyDefinition,
    namespace: &str,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    if output_dir.is_file() {
        return Err(MakerError::Validation(format!(
            "output directory is a file: {}",
            output_dir.display()
        )));
    }
    let mut modules = collect_modules(definition, namespace)?;
    modules.sort_by_key(StaticModule::relative_path);

    let codegen = output_dir.join(CODEGEN_DIR);
    if codegen.exists() {
        fs::remove_dir_all(&codegen)?;
    }
    fs::create_dir_all(&codegen)?;

    let mut written = Vec::with_capacity(modules.len() + 1);
    for module in &modules {
        let path = codegen.join(module.type_dir).join(format!("{}.ts", module.file_stem));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, module.source())?;
        tracing::debug!(path = %path.display(), "wrote static export");
        written.push(path);
    }

    let index = codegen.join(INDEX_FILE);
    fs::write(&index, index_source(&modules))?;
    written.push(index);
    Ok(written)
}

fn collect_modules(definition: &OntologyDefinition, namespace: &str) -> Result<Vec<StaticModule>> {
    let mut modules = Vec::new();
    for object in definition.object_types.values() {
        modules.push(StaticModule::new("object-types", namespace, &object.api_name, object)?);
    }
    for link in definition.link_types.values() {
        modules.push(StaticModule::new(
            "link-types",
            namespace,
            link.definition.api_name(),
            link,
        )?);
    }
    for interface in definition.interface_types.values() {
        modules.push(StaticModule::new(
            "interface-types",
            namespace,
            &interface.api_name,
            interface,
        )?);
    }
    for spt in definition.shared_property_types.values() {
        modules.push(StaticModule::new(
            "shared-property-types",
            namespace,
            &spt.api_name,
            spt,
        )?);
    }
    for action in definition.action_types.values() {
        modules.push(StaticModule::new("action-types", namespace, &action.api_name, action)?);
    }
    for (api_name, versions) in &definition.value_types {
        modules.push(StaticModule::new("value-types", namespace, api_name, versions)?);
    }
    for automation in definition.automations.values() {
        modules.push(StaticModule::new(
            "automations",
            namespace,
            &automation.api_name,
            automation,
        )?);
    }
    for module in definition.compute_modules.values() {
        modules.push(StaticModule::new(
            "compute-modules",
            namespace,
            &module.api_name,
            module,
        )?);
    }

    let mut claimed = BTreeMap::new();
    for module in &modules {
        if let Some(previous) = claimed.insert(module.relative_path(), module.api_name.as_str()) {
            return Err(MakerError::Validation(format!(
                "{previous} and {} both export to {}",
                module.api_name,
                module.relative_path()
            )));
        }
    }
    Ok(modules)
}

fn index_source(modules: &[StaticModule]) -> String {
    let mut source = String::new();
    for module in modules {
        source.push_str(&format!(
            "export {{ default as {} }} from \"./{}/{}.js\";\n",
            module.index_ident(),
            module.type_dir,
            module.file_stem,
        ));
    }
    source
}

/// A valid TypeScript identifier: every other character becomes `_`.
fn identifier(raw: &str) -> String {
    let mut ident = raw
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '$' {
                ch
            } else {
                '_'
            }
        })
        .collect::<String>();
    if ident.is_empty() || ident.starts_with(|ch: char| ch.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;
    use crate::builder::OntologyBuilder;
    use crate::registry::OntologyEntity;

    fn builder() -> OntologyBuilder {
        let mut builder = OntologyBuilder::new("com.palantir.").expect("builder");
        builder
            .define_object(
                serde_json::from_value(json!({
                    "apiName": "foo",
                    "displayName": "Foo",
                    "pluralDisplayName": "Foos",
                    "primaryKeyPropertyApiName": "bar",
                    "titlePropertyApiName": "bar",
                    "properties": [{"apiName": "bar", "type": "string"}]
                }))
                .expect("object"),
            )
            .expect("define object");
        builder
            .define_create_object_action("foo", None)
            .expect("action");
        builder
    }

    #[test]
    fn identifiers_replace_non_word_characters() {
        assert_eq!(identifier("create-object-foo"), "create_object_foo");
        assert_eq!(identifier("1st"), "_1st");
        assert_eq!(identifier("com.other.foo"), "com_other_foo");
    }

    #[test]
    fn writes_one_module_per_entity_and_an_index() {
        let temp = tempdir().expect("tempdir");
        let builder = builder();
        let written = write_static_objects(builder.definition(), builder.namespace(), temp.path())
            .expect("export");
        assert_eq!(written.len(), 3);

        let codegen = temp.path().join(CODEGEN_DIR);
        let object = fs::read_to_string(codegen.join("object-types/foo.ts")).expect("object module");
        assert!(object.starts_with("const foo = {\n"));
        assert!(object.contains("\"apiName\": \"com.palantir.foo\""));
        assert!(object.ends_with("as const;\n\nexport default foo;\n"));

        let index = fs::read_to_string(codegen.join(INDEX_FILE)).expect("index");
        assert_eq!(
            index,
            concat!(
                "export { default as action_types_create_object_foo } from \"./action-types/create_object_foo.js\";\n",
                "export { default as object_types_foo } from \"./object-types/foo.js\";\n",
            )
        );
    }

    #[test]
    fn previous_output_is_removed() {
        let temp = tempdir().expect("tempdir");
        let stale = temp.path().join(CODEGEN_DIR).join("object-types/stale.ts");
        fs::create_dir_all(stale.parent().expect("parent")).expect("mkdir");
        fs::write(&stale, "stale").expect("write stale");

        let builder = builder();
        write_static_objects(builder.definition(), builder.namespace(), temp.path()).expect("export");
        assert!(!stale.exists());
        assert!(temp.path().join(CODEGEN_DIR).join("object-types/foo.ts").exists());
    }

    #[test]
    fn colliding_file_names_are_rejected_before_writing() {
        let mut definition = OntologyDefinition::default();
        for api_name in ["com.palantir.x-foo", "com.palantir.x.foo"] {
            definition.register(OntologyEntity::ObjectType(
                serde_json::from_value(json!({
                    "apiName": api_name,
                    "displayName": "Foo",
                    "pluralDisplayName": "Foos",
                    "primaryKeyPropertyApiName": "bar",
                    "titlePropertyApiName": "bar",
                    "properties": [{"apiName": "bar", "type": "string"}]
                }))
                .expect("object"),
            ));
        }

        let temp = tempdir().expect("tempdir");
        let err = write_static_objects(&definition, "com.palantir.", temp.path())
            .expect_err("colliding stems must fail");
        assert!(matches!(err, MakerError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "invariant failed: com.palantir.x-foo and com.palantir.x.foo both export to object-types/x_foo.ts"
        );
        assert!(!temp.path().join(CODEGEN_DIR).exists());
    }

    #[test]
    fn output_path_pointing_at_a_file_is_rejected() {
        let temp = tempdir().expect("tempdir");
        let file = temp.path().join("not-a-dir");
        fs::write(&file, "").expect("write");
        let builder = builder();
        let err = write_static_objects(builder.definition(), builder.namespace(), &file)
            .expect_err("file output must fail");
        assert!(matches!(err, MakerError::Validation(_)));
    }
}
