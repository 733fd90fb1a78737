use serde_json::{Value, json};

use super::object::datasource_entry;
use crate::error::{MakerError, Result};
use crate::model::{
    IntermediaryLink, LinkSideMetadata, LinkType, LinkTypeDefinition, ManyToManyLink,
    OneToManyCardinality, OneToManyLink, Status,
};
use crate::naming::{capitalize, kebab_case, plural_display_name};
use crate::registry::EntityLookup;
use crate::wire::tagged;

pub(super) fn lower_link_type(link: &LinkType, lookup: EntityLookup<'_>) -> Result<Value> {
    let (definition, datasources) = match &link.definition {
        LinkTypeDefinition::OneToMany(one_to_many) => {
            (lower_one_to_many(one_to_many, lookup)?, Vec::new())
        }
        LinkTypeDefinition::ManyToMany(many_to_many) => {
            let (definition, datasource) = lower_many_to_many(many_to_many, lookup)?;
            (definition, vec![datasource])
        }
        LinkTypeDefinition::Intermediary(intermediary) => {
            (lower_intermediary(intermediary, lookup)?, Vec::new())
        }
    };
    Ok(json!({
        "datasources": datasources,
        "entityMetadata": { "arePatchesEnabled": link.definition.edits_enabled() },
        "linkType": {
            "definition": definition,
            "id": link.id,
            "redacted": link.definition.redacted(),
            "status": link.definition.status().cloned().unwrap_or(Status::Active).to_wire(),
        },
    }))
}

fn link_metadata(metadata: &LinkSideMetadata) -> Value {
    json!({
        "apiName": metadata.api_name,
        "displayMetadata": {
            "displayName": metadata
                .display_name
                .clone()
                .unwrap_or_else(|| capitalize(&metadata.api_name)),
            "groupDisplayName": metadata.group_display_name.as_deref().unwrap_or(""),
            "pluralDisplayName": metadata
                .plural_display_name
                .clone()
                .unwrap_or_else(|| plural_display_name(&metadata.api_name)),
            "visibility": metadata.visibility.unwrap_or_default(),
        },
        "typeClasses": [],
    })
}

fn lower_one_to_many(link: &OneToManyLink, lookup: EntityLookup<'_>) -> Result<Value> {
    let one_key = primary_key(lookup, &link.one.object)?;
    let cardinality = match link.cardinality {
        OneToManyCardinality::OneToMany => "ONE_TO_MANY",
        OneToManyCardinality::OneToOne => "ONE_TO_ONE",
    };
    Ok(tagged(
        "oneToMany",
        json!({
            "cardinalityHint": cardinality,
            "manyToOneLinkMetadata": link_metadata(&link.to_many.metadata),
            "objectTypeRidManySide": link.to_many.object,
            "objectTypeRidOneSide": link.one.object,
            "oneSidePrimaryKeyToManySidePropertyMapping": [{
                "from": { "apiName": one_key, "object": link.one.object },
                "to": { "apiName": link.many_foreign_key_property, "object": link.to_many.object },
            }],
            "oneToManyLinkMetadata": link_metadata(&link.one.metadata),
        }),
    ))
}

fn primary_key<'a>(lookup: EntityLookup<'a>, object: &str) -> Result<&'a str> {
    lookup
        .object_type(object)
        .map(|object| object.primary_key_property_api_name.as_str())
        .ok_or_else(|| MakerError::NotFound(format!("Object type {object} is not defined")))
}

/// Many-to-many links are backed by a join dataset named after the link.
fn lower_many_to_many(link: &ManyToManyLink, lookup: EntityLookup<'_>) -> Result<(Value, Value)> {
    let a = &link.many.object;
    let b = &link.to_many.object;
    let a_key = primary_key(lookup, a)?;
    let b_key = primary_key(lookup, b)?;

    let definition = tagged(
        "manyToMany",
        json!({
            "objectTypeAPrimaryKeyPropertyMapping": [{
                "from": { "apiName": a_key, "object": a },
                "to": { "apiName": a_key, "object": a },
            }],
            "objectTypeAToBLinkMetadata": link_metadata(&link.many.metadata),
            "objectTypeBPrimaryKeyPropertyMapping": [{
                "from": { "apiName": b_key, "object": b },
                "to": { "apiName": b_key, "object": b },
            }],
            "objectTypeBToALinkMetadata": link_metadata(&link.to_many.metadata),
            "objectTypeRidA": a,
            "objectTypeRidB": b,
        }),
    );

    let dataset = format!("link-{}", link.api_name);
    let datasource = datasource_entry(
        &dataset,
        tagged(
            "dataset",
            json!({
                "datasetRid": dataset,
                "objectTypeAPrimaryKeyMapping": [{
                    "column": a_key,
                    "property": { "apiName": a_key, "object": a },
                }],
                // Join datasets name both key columns after A's primary key.
                "objectTypeBPrimaryKeyMapping": [{
                    "column": a_key,
                    "property": { "apiName": b_key, "object": b },
                }],
            }),
        ),
    );
    Ok((definition, datasource))
}

fn lower_intermediary(link: &IntermediaryLink, lookup: EntityLookup<'_>) -> Result<Value> {
    let link_id = |api_name: &str| -> Result<String> {
        let id = kebab_case(api_name);
        if lookup.link_type(&id).is_none() {
            return Err(MakerError::NotFound(format!(
                "Link type {api_name} is not defined"
            )));
        }
        Ok(id)
    };
    Ok(tagged(
        "intermediary",
        json!({
            "aToIntermediaryLinkTypeRid": link_id(&link.many.link_to_intermediary)?,
            "intermediaryObjectTypeRid": link.intermediary_object_type,
            "intermediaryToBLinkTypeRid": link_id(&link.to_many.link_to_intermediary)?,
            "objectTypeAToBLinkMetadata": link_metadata(&link.many.metadata),
            "objectTypeBToALinkMetadata": link_metadata(&link.to_many.metadata),
            "objectTypeRidA": link.many.object,
            "objectTypeRidB": link.to_many.object,
        }),
    ))
}
