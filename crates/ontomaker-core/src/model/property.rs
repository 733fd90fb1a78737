use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::{Nullability, Status, TypeClass, ValueTypeReference, Visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkingType {
    Mandatory,
    Cbac,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringOptions {
    pub is_long_text: bool,
    pub supports_efficient_leading_wildcard: bool,
    pub supports_exact_matching: bool,
}

impl Default for StringOptions {
    fn default() -> Self {
        Self {
            is_long_text: false,
            supports_efficient_leading_wildcard: false,
            supports_exact_matching: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub api_name: String,
    pub field_type: PropertyKind,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub aliases: Vec<String>,
    pub type_classes: Vec<TypeClass>,
}

impl StructField {
    #[must_use]
    pub fn new(api_name: &str, field_type: PropertyKind) -> Self {
        Self {
            api_name: api_name.to_string(),
            field_type,
            display_name: None,
            description: None,
            aliases: Vec::new(),
            type_classes: Vec::new(),
        }
    }
}

/// The one internal representation of a property's type.
///
/// Documents may spell a type as a bare tag (`"string"`) or as a tagged object
/// (`{"type": "marking", "markingType": "CBAC"}`); both collapse into this enum when parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPropertyType", into = "RawPropertyType")]
pub enum PropertyKind {
    Boolean,
    Byte,
    Date,
    Decimal,
    Double,
    Float,
    Integer,
    Long,
    Short,
    Timestamp,
    String(StringOptions),
    Geopoint,
    Geoshape,
    MediaReference,
    GeotimeSeries,
    Marking { marking_type: MarkingType },
    Struct(Vec<StructField>),
}

impl PropertyKind {
    #[must_use]
    pub fn string() -> Self {
        Self::String(StringOptions::default())
    }

    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "boolean" => Self::Boolean,
            "byte" => Self::Byte,
            "date" => Self::Date,
            "decimal" => Self::Decimal,
            "double" => Self::Double,
            "float" => Self::Float,
            "integer" => Self::Integer,
            "long" => Self::Long,
            "short" => Self::Short,
            "timestamp" => Self::Timestamp,
            "string" => Self::string(),
            "geopoint" => Self::Geopoint,
            "geoshape" => Self::Geoshape,
            "mediaReference" => Self::MediaReference,
            "geotimeSeries" => Self::GeotimeSeries,
            _ => return None,
        };
        Some(kind)
    }

    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Byte => "byte",
            Self::Date => "date",
            Self::Decimal => "decimal",
            Self::Double => "double",
            Self::Float => "float",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Short => "short",
            Self::Timestamp => "timestamp",
            Self::String(_) => "string",
            Self::Geopoint => "geopoint",
            Self::Geoshape => "geoshape",
            Self::MediaReference => "mediaReference",
            Self::GeotimeSeries => "geotimeSeries",
            Self::Marking { .. } => "marking",
            Self::Struct(_) => "struct",
        }
    }

    /// Types that cannot back a title or primary key.
    #[must_use]
    pub const fn is_exotic(&self) -> bool {
        matches!(
            self,
            Self::Geopoint
                | Self::Geoshape
                | Self::MediaReference
                | Self::GeotimeSeries
                | Self::Marking { .. }
                | Self::Struct(_)
        )
    }

    #[must_use]
    pub const fn supports_render_hints(&self) -> bool {
        !matches!(
            self,
            Self::Struct(_) | Self::MediaReference | Self::GeotimeSeries
        )
    }
}

/// One property declared on an object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ObjectPropertyType {
    pub api_name: String,
    #[serde(rename = "type")]
    pub property_type: PropertyKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub array: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub edit_only: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_classes: Option<Vec<TypeClass>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullability: Option<Nullability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_property_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueTypeReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_formatter: Option<serde_json::Value>,
}

impl ObjectPropertyType {
    #[must_use]
    pub fn new(api_name: &str, property_type: PropertyKind) -> Self {
        Self {
            api_name: api_name.to_string(),
            property_type,
            display_name: None,
            description: None,
            array: false,
            edit_only: false,
            visibility: None,
            status: None,
            type_classes: None,
            nullability: None,
            shared_property_type: None,
            value_type: None,
            base_formatter: None,
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawPropertyType {
    Tag(String),
    Detailed(DetailedPropertyType),
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
enum DetailedPropertyType {
    Marking {
        marking_type: MarkingType,
    },
    Struct {
        struct_definition: BTreeMap<String, RawStructField>,
    },
    String {
        #[serde(default)]
        is_long_text: bool,
        #[serde(default)]
        supports_efficient_leading_wildcard: bool,
        #[serde(default = "default_true")]
        supports_exact_matching: bool,
    },
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawStructField {
    Bare(RawPropertyType),
    Detailed(DetailedStructField),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DetailedStructField {
    field_type: RawPropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    aliases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    type_classes: Vec<TypeClass>,
}

const fn default_true() -> bool {
    true
}

impl TryFrom<RawPropertyType> for PropertyKind {
    type Error = String;

    fn try_from(raw: RawPropertyType) -> std::result::Result<Self, Self::Error> {
        match raw {
            RawPropertyType::Tag(tag) => {
                Self::from_tag(&tag).ok_or_else(|| format!("unknown property type '{tag}'"))
            }
            RawPropertyType::Detailed(DetailedPropertyType::Marking { marking_type }) => {
                Ok(Self::Marking { marking_type })
            }
            RawPropertyType::Detailed(DetailedPropertyType::String {
                is_long_text,
                supports_efficient_leading_wildcard,
                supports_exact_matching,
            }) => Ok(Self::String(StringOptions {
                is_long_text,
                supports_efficient_leading_wildcard,
                supports_exact_matching,
            })),
            RawPropertyType::Detailed(DetailedPropertyType::Struct { struct_definition }) => {
                let mut fields = Vec::with_capacity(struct_definition.len());
                for (api_name, raw_field) in struct_definition {
                    fields.push(struct_field_from_raw(api_name, raw_field)?);
                }
                Ok(Self::Struct(fields))
            }
        }
    }
}

fn struct_field_from_raw(
    api_name: String,
    raw: RawStructField,
) -> std::result::Result<StructField, String> {
    let (field_type, display_name, description, aliases, type_classes) = match raw {
        RawStructField::Bare(field_type) => (field_type, None, None, Vec::new(), Vec::new()),
        RawStructField::Detailed(detailed) => (
            detailed.field_type,
            detailed.display_name,
            detailed.description,
            detailed.aliases,
            detailed.type_classes,
        ),
    };
    let field_type = PropertyKind::try_from(field_type)?;
    if matches!(field_type, PropertyKind::Struct(_) | PropertyKind::Marking { .. }) {
        return Err(format!(
            "struct field '{api_name}' cannot be of type {}",
            field_type.tag()
        ));
    }
    Ok(StructField {
        api_name,
        field_type,
        display_name,
        description,
        aliases,
        type_classes,
    })
}

impl From<PropertyKind> for RawPropertyType {
    fn from(kind: PropertyKind) -> Self {
        match kind {
            PropertyKind::Marking { marking_type } => {
                Self::Detailed(DetailedPropertyType::Marking { marking_type })
            }
            PropertyKind::String(options) if options != StringOptions::default() => {
                Self::Detailed(DetailedPropertyType::String {
                    is_long_text: options.is_long_text,
                    supports_efficient_leading_wildcard: options
                        .supports_efficient_leading_wildcard,
                    supports_exact_matching: options.supports_exact_matching,
                })
            }
            PropertyKind::Struct(fields) => Self::Detailed(DetailedPropertyType::Struct {
                struct_definition: fields
                    .into_iter()
                    .map(|field| (field.api_name.clone(), RawStructField::from(field)))
                    .collect(),
            }),
            other => Self::Tag(other.tag().to_string()),
        }
    }
}

impl From<StructField> for RawStructField {
    fn from(field: StructField) -> Self {
        let plain = field.display_name.is_none()
            && field.description.is_none()
            && field.aliases.is_empty()
            && field.type_classes.is_empty();
        if plain {
            Self::Bare(field.field_type.into())
        } else {
            Self::Detailed(DetailedStructField {
                field_type: field.field_type.into(),
                display_name: field.display_name,
                description: field.description,
                aliases: field.aliases,
                type_classes: field.type_classes,
            })
        }
    }
}
