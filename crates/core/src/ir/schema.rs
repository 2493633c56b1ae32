//! Lowering of descriptor shapes (JSON Schema subset) to TypeScript types.
//!
//! Lowering is total: anything it does not understand becomes `unknown`, so a
//! syntactically valid descriptor set always produces bindings.

use std::collections::{BTreeMap, HashSet};

use crate::descriptor::{AdditionalProperties, Discriminator, EnumValue, Schema, SchemaType};

use super::types::{TsLiteral, TsPrimitive, TsProp, TsType};
use super::utils::sanitize_ts_identifier;

/// Convert a Schema to TsType
pub fn schema_to_ts_type(schema: &Schema) -> TsType {
    let ty = schema_to_ts_type_inner(schema);
    if schema.nullable == Some(true) && !matches!(ty, TsType::Primitive(TsPrimitive::Null)) {
        TsType::Union(vec![ty, TsType::Primitive(TsPrimitive::Null)])
    } else {
        ty
    }
}

fn schema_to_ts_type_inner(schema: &Schema) -> TsType {
    // Handle $ref first
    if let Some(ref_path) = &schema.ref_path {
        return TsType::Ref(ref_to_type_name(ref_path));
    }

    if let Some(const_value) = &schema.const_value {
        return json_value_to_ts_type(const_value);
    }

    // allOf (intersection)
    if let Some(all_of) = &schema.all_of {
        return normalize_intersection(all_of);
    }

    // anyOf (union, often nullable)
    if let Some(any_of) = &schema.any_of {
        return normalize_union(any_of, None);
    }

    // oneOf (discriminated union)
    if let Some(one_of) = &schema.one_of {
        return normalize_union(one_of, schema.discriminator.as_ref());
    }

    match &schema.schema_type {
        Some(SchemaType::Single(t)) => schema_type_to_ts(t, schema),
        Some(SchemaType::Multiple(types)) => {
            let non_null: Vec<_> = types.iter().filter(|t| *t != "null").collect();
            let nullable = types.iter().any(|t| t == "null");
            let mut ts_types: Vec<_> = non_null
                .iter()
                .map(|t| schema_type_to_ts(t, schema))
                .collect();
            if nullable {
                ts_types.push(TsType::Primitive(TsPrimitive::Null));
            }
            match ts_types.len() {
                0 => TsType::Primitive(TsPrimitive::Unknown),
                1 => ts_types.remove(0),
                _ => TsType::Union(ts_types),
            }
        }
        None => {
            if schema.properties.is_some() {
                normalize_object_type(schema)
            } else if schema.additional_properties.is_some() {
                normalize_additional_properties(schema)
            } else if let Some(values) = &schema.enum_values {
                enum_to_union_type(values)
            } else {
                TsType::Primitive(TsPrimitive::Unknown)
            }
        }
    }
}

/// Convert JSON value to TsType literal
fn json_value_to_ts_type(value: &serde_json::Value) -> TsType {
    match value {
        serde_json::Value::Null => TsType::Literal(TsLiteral::Null),
        serde_json::Value::Bool(b) => TsType::Literal(TsLiteral::Bool(*b)),
        serde_json::Value::Number(n) => n.as_i64().map_or_else(
            || TsType::Literal(TsLiteral::Number(n.as_f64().unwrap_or(0.0))),
            |i| TsType::Literal(TsLiteral::Int(i)),
        ),
        serde_json::Value::String(s) => TsType::Literal(TsLiteral::String(s.clone())),
        _ => TsType::Primitive(TsPrimitive::Unknown),
    }
}

/// Normalize intersection type (allOf)
fn normalize_intersection(schemas: &[Schema]) -> TsType {
    let mut types: Vec<_> = schemas.iter().map(schema_to_ts_type).collect();
    match types.len() {
        0 => TsType::Primitive(TsPrimitive::Unknown),
        1 => types.remove(0),
        _ => TsType::Intersection(types),
    }
}

/// Normalize union type (anyOf/oneOf)
fn normalize_union(schemas: &[Schema], discriminator: Option<&Discriminator>) -> TsType {
    let Some(disc) = discriminator else {
        return TsType::Union(schemas.iter().map(schema_to_ts_type).collect());
    };

    let union_types = schemas
        .iter()
        .map(|schema| {
            let base_type = schema_to_ts_type(schema);
            let disc_value = match (&disc.mapping, &schema.ref_path) {
                (Some(mapping), Some(ref_path)) => mapping
                    .iter()
                    .find(|(_, v)| *v == ref_path)
                    .map(|(k, _)| k.clone()),
                (Some(_), None) => None,
                (None, ref_path) => ref_path.as_deref().map(ref_to_type_name),
            };

            match disc_value {
                // { kind: "dog" } & Dog
                Some(value) => TsType::Intersection(vec![
                    TsType::Object(vec![TsProp {
                        name: disc.property_name.clone(),
                        ty: TsType::Literal(TsLiteral::String(value)),
                        optional: false,
                    }]),
                    base_type,
                ]),
                None => base_type,
            }
        })
        .collect();

    TsType::Union(union_types)
}

/// Convert single schema type to TsType
fn schema_type_to_ts(schema_type: &str, schema: &Schema) -> TsType {
    match schema_type {
        "string" | "number" | "integer" => match &schema.enum_values {
            Some(values) => enum_to_union_type(values),
            None if schema_type == "string" => TsType::Primitive(TsPrimitive::String),
            None => TsType::Primitive(TsPrimitive::Number),
        },
        "boolean" => TsType::Primitive(TsPrimitive::Boolean),
        "null" => TsType::Primitive(TsPrimitive::Null),
        "array" => {
            let item_type = schema
                .items
                .as_deref()
                .map_or(TsType::Primitive(TsPrimitive::Unknown), schema_to_ts_type);
            TsType::Array(Box::new(item_type))
        }
        "object" => normalize_object_type(schema),
        _ => TsType::Primitive(TsPrimitive::Unknown),
    }
}

/// Convert enum values to union of literal types
fn enum_to_union_type(values: &[EnumValue]) -> TsType {
    TsType::Union(
        values
            .iter()
            .map(|v| TsType::Literal(enum_value_to_literal(v)))
            .collect(),
    )
}

/// Convert an enum value to a TypeScript literal.
fn enum_value_to_literal(v: &EnumValue) -> TsLiteral {
    match v {
        EnumValue::String(s) => TsLiteral::String(s.clone()),
        EnumValue::Integer(n) => TsLiteral::Int(*n),
        EnumValue::Float(f) => TsLiteral::Number(*f),
        EnumValue::Bool(b) => TsLiteral::Bool(*b),
        EnumValue::Null => TsLiteral::Null,
    }
}

/// Normalize object type
fn normalize_object_type(schema: &Schema) -> TsType {
    match (&schema.properties, schema.additional_properties.is_some()) {
        (Some(properties), true) => TsType::Intersection(vec![
            TsType::Object(normalize_properties(properties, schema.required.as_deref())),
            normalize_additional_properties(schema),
        ]),
        (Some(properties), false) => {
            TsType::Object(normalize_properties(properties, schema.required.as_deref()))
        }
        (None, true) => normalize_additional_properties(schema),
        (None, false) => make_unknown_record(),
    }
}

/// Normalize object properties (sorted by name through the BTreeMap)
fn normalize_properties(
    properties: &BTreeMap<String, Schema>,
    required: Option<&[String]>,
) -> Vec<TsProp> {
    let required_set: HashSet<&String> = required.map(|r| r.iter().collect()).unwrap_or_default();

    properties
        .iter()
        .map(|(name, schema)| TsProp {
            name: name.clone(),
            ty: schema_to_ts_type(schema),
            optional: !required_set.contains(name),
        })
        .collect()
}

/// Normalize additional properties to a Record type
fn normalize_additional_properties(schema: &Schema) -> TsType {
    match &schema.additional_properties {
        Some(AdditionalProperties::Bool(true)) | None => make_unknown_record(),
        Some(AdditionalProperties::Bool(false)) => TsType::Object(Vec::new()),
        Some(AdditionalProperties::Schema(s)) => make_string_record(schema_to_ts_type(s)),
    }
}

/// Create a `Record<string, T>` type.
fn make_string_record(value_type: TsType) -> TsType {
    TsType::Record {
        key: Box::new(TsType::Primitive(TsPrimitive::String)),
        value: Box::new(value_type),
    }
}

/// `Record<string, unknown>`, the default for free-form objects.
fn make_unknown_record() -> TsType {
    make_string_record(TsType::Primitive(TsPrimitive::Unknown))
}

/// Extract the type name from a `$ref` path (last path component).
pub fn ref_to_type_name(ref_path: &str) -> String {
    let name = ref_path.rsplit('/').next().unwrap_or(ref_path);
    sanitize_ts_identifier(name)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::ir::Emit;

    fn lower(json: &str) -> String {
        let schema: Schema = serde_json::from_str(json).unwrap();
        schema_to_ts_type(&schema).emit()
    }

    #[test]
    fn test_ref_uses_last_component() {
        assert_eq!(lower(r##"{ "$ref": "#/components/schemas/Ban" }"##), "Ban");
        assert_eq!(ref_to_type_name("#/definitions/audit-log.entry"), "auditlogentry");
    }

    #[test]
    fn test_primitives_and_arrays() {
        assert_eq!(lower(r#"{ "type": "string" }"#), "string");
        assert_eq!(lower(r#"{ "type": "integer" }"#), "number");
        assert_eq!(lower(r#"{ "type": "array", "items": { "type": "boolean" } }"#), "boolean[]");
        assert_eq!(lower(r#"{ "type": "array" }"#), "unknown[]");
        assert_eq!(lower(r#"{}"#), "unknown");
    }

    #[test]
    fn test_nullable_forms() {
        assert_eq!(lower(r#"{ "type": ["string", "null"] }"#), "string | null");
        assert_eq!(lower(r#"{ "type": "string", "nullable": true }"#), "string | null");
        assert_eq!(
            lower(r#"{ "anyOf": [{ "type": "integer" }, { "type": "null" }] }"#),
            "number | null"
        );
    }

    #[test]
    fn test_object_properties_sorted_and_optional() {
        let ts = lower(
            r#"{ "type": "object", "required": ["id"], "properties": { "name": { "type": "string" }, "id": { "type": "string" } } }"#,
        );
        assert_eq!(ts, "{ id: string; name?: string }");
    }

    #[test]
    fn test_additional_properties() {
        assert_eq!(lower(r#"{ "type": "object" }"#), "Record<string, unknown>");
        assert_eq!(
            lower(r#"{ "type": "object", "additionalProperties": { "type": "number" } }"#),
            "Record<string, number>"
        );
        assert_eq!(
            lower(r#"{ "type": "object", "properties": { "a": { "type": "string" } }, "additionalProperties": true }"#),
            "{ a?: string } & Record<string, unknown>"
        );
    }

    #[test]
    fn test_enum_and_const() {
        assert_eq!(lower(r#"{ "type": "string", "enum": ["a", "b"] }"#), "\"a\" | \"b\"");
        assert_eq!(lower(r#"{ "type": "integer", "enum": [1, 2] }"#), "1 | 2");
        assert_eq!(lower(r#"{ "const": "fixed" }"#), "\"fixed\"");
    }

    #[test]
    fn test_discriminated_union() {
        let ts = lower(
            r##"{
  "oneOf": [{ "$ref": "#/components/schemas/Dog" }, { "$ref": "#/components/schemas/Cat" }],
  "discriminator": { "propertyName": "kind", "mapping": { "dog": "#/components/schemas/Dog", "cat": "#/components/schemas/Cat" } }
}"##,
        );
        assert_eq!(ts, "{ kind: \"dog\" } & Dog | { kind: \"cat\" } & Cat");
    }

    #[test]
    fn test_all_of() {
        assert_eq!(
            lower(r##"{ "allOf": [{ "$ref": "#/components/schemas/Base" }, { "$ref": "#/components/schemas/Extra" }] }"##),
            "Base & Extra"
        );
        assert_eq!(lower(r##"{ "allOf": [{ "$ref": "#/components/schemas/Base" }] }"##), "Base");
    }
}
