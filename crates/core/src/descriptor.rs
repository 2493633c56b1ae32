//! Input contract: route descriptors as produced by the upstream schema parser.
//!
//! The structs deserialize with serde from JSON. Shapes use the JSON Schema
//! subset that OpenAPI 3.x documents carry; `ir::schema` lowers them to
//! TypeScript types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::GenerateError;

/// HTTP method
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Every method, in the order operations are emitted at one route.
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Patch,
        HttpMethod::Delete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Lower-case form used as identifier prefix and transport accessor (`$get`).
    pub fn lower(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpMethod::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| s.to_string())
    }
}

/// Root of the descriptor document.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptorSet {
    /// Operations in upstream order.
    pub operations: Vec<RouteDescriptor>,
}

impl DescriptorSet {
    /// Parse a descriptor set from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, GenerateError> {
        serde_json::from_str(json).map_err(|e| GenerateError::InvalidDescriptors(e.to_string()))
    }
}

/// One (path, method) pair with its parameter and response shapes.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    /// Path template, `{name}` or `:name` marking parameters.
    pub path: String,
    /// HTTP method (case-insensitive).
    pub method: String,
    #[serde(default)]
    pub path_params: Vec<ParamDescriptor>,
    #[serde(default)]
    pub query_params: Vec<ParamDescriptor>,
    #[serde(default)]
    pub header_params: Vec<ParamDescriptor>,
    pub body: Option<BodyDescriptor>,
    #[serde(default)]
    pub responses: Vec<ResponseDescriptor>,
    /// Short description, printed into the generated doc comments.
    pub summary: Option<String>,
    #[serde(default)]
    pub deprecated: bool,
}

impl RouteDescriptor {
    /// Descriptor with no inputs and no responses.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method: method.as_str().to_string(),
            path_params: Vec::new(),
            query_params: Vec::new(),
            header_params: Vec::new(),
            body: None,
            responses: Vec::new(),
            summary: None,
            deprecated: false,
        }
    }
}

/// A path, query or header parameter.
#[derive(Debug, Clone, Deserialize)]
pub struct ParamDescriptor {
    pub name: String,
    #[serde(default)]
    pub required: bool,
    pub schema: Option<Schema>,
}

/// JSON request body.
#[derive(Debug, Clone, Deserialize)]
pub struct BodyDescriptor {
    #[serde(default = "default_true")]
    pub required: bool,
    pub schema: Option<Schema>,
}

const fn default_true() -> bool {
    true
}

/// One response variant. `schema` is absent for empty bodies (204, 304).
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseDescriptor {
    pub status: u16,
    pub schema: Option<Schema>,
}

/// JSON Schema definition used for parameter, body and response shapes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// The type of the schema (string, number, integer, boolean, object, array).
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Reference to another schema.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Properties for object types.
    pub properties: Option<BTreeMap<String, Schema>>,

    /// Required property names for object types.
    pub required: Option<Vec<String>>,

    /// Item schema for array types.
    pub items: Option<Box<Schema>>,

    /// Enum values (can be strings, integers, floats, booleans, or null).
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<EnumValue>>,

    /// Union type (any of these schemas).
    pub any_of: Option<Vec<Schema>>,

    /// Union type (exactly one of these schemas).
    pub one_of: Option<Vec<Schema>>,

    /// Intersection type (all of these schemas combined).
    pub all_of: Option<Vec<Schema>>,

    /// Additional properties for object types (for Record/dict types).
    pub additional_properties: Option<AdditionalProperties>,

    /// Discriminator for polymorphic oneOf schemas.
    pub discriminator: Option<Discriminator>,

    /// Constant value - schema matches only this exact value.
    #[serde(rename = "const")]
    pub const_value: Option<serde_json::Value>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    pub nullable: Option<bool>,
}

impl Schema {
    /// Schema with a single `type`.
    pub fn of_type(ty: &str) -> Self {
        Self {
            schema_type: Some(SchemaType::Single(ty.to_string())),
            ..Self::default()
        }
    }

    /// `$ref` schema.
    pub fn reference(path: &str) -> Self {
        Self {
            ref_path: Some(path.to_string()),
            ..Self::default()
        }
    }
}

/// Enum value can be string, integer, float, boolean, or null.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum EnumValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

/// Discriminator for polymorphic schemas (oneOf/anyOf).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discriminator {
    /// The property name that contains the discriminator value.
    pub property_name: String,
    /// Optional mapping from discriminator values to schema refs.
    pub mapping: Option<BTreeMap<String, String>>,
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

/// Additional properties can be a boolean or a schema.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<Schema>),
}
