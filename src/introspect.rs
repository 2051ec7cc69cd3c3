//! Schema introspection: describe payloads become domain schemas, and
//! schemas become generated Rust model definitions.
//!
//! The code generator is intentionally conservative: every field keeps a
//! serde rename back to its API name, nillable fields become `Option`, and
//! anything with a type the generator does not understand falls back to raw
//! JSON instead of being dropped.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::domain::schema::{FieldSchema, FieldType, ObjectSchema, ObjectSummary};
use crate::models::config::AdapterConfig;
use crate::models::describe::{FieldDescribe, SObjectDescribe, SObjectSummary};

/// Map a wire-level object description onto the domain schema.
pub fn object_schema(describe: &SObjectDescribe) -> ObjectSchema {
    ObjectSchema {
        name: describe.name.clone(),
        label: describe.label.clone(),
        custom: describe.custom,
        queryable: describe.queryable,
        createable: describe.createable,
        updateable: describe.updateable,
        deletable: describe.deletable,
        fields: describe.fields.iter().map(field_schema).collect(),
    }
}

pub fn object_summary(summary: &SObjectSummary) -> ObjectSummary {
    ObjectSummary {
        name: summary.name.clone(),
        label: summary.label.clone(),
        custom: summary.custom,
        queryable: summary.queryable,
    }
}

fn field_schema(field: &FieldDescribe) -> FieldSchema {
    FieldSchema {
        name: field.name.clone(),
        label: field.label.clone(),
        field_type: FieldType::from_api(&field.field_type),
        nillable: field.nillable,
        length: field.length,
        custom: field.custom,
        createable: field.createable,
        updateable: field.updateable,
        reference_to: field.reference_to.clone(),
        relationship_name: field.relationship_name.clone(),
        defaulted_on_create: field.defaulted_on_create,
        picklist_values: field
            .picklist_values
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.value.clone())
            .collect(),
    }
}

/// Rust type an introspected field maps to.
fn rust_type(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::Id
        | FieldType::String
        | FieldType::TextArea
        | FieldType::EncryptedString
        | FieldType::Phone
        | FieldType::Url
        | FieldType::Email
        | FieldType::Picklist
        | FieldType::MultiPicklist
        | FieldType::Combobox
        | FieldType::Reference
        | FieldType::Base64 => "String",
        FieldType::Boolean => "bool",
        FieldType::Int => "i64",
        FieldType::Currency | FieldType::Double | FieldType::Percent => "f64",
        FieldType::Date => "NaiveDate",
        FieldType::DateTime => "DateTime<Utc>",
        FieldType::Time => "NaiveTime",
        FieldType::Address | FieldType::Location | FieldType::AnyType | FieldType::Other(_) => {
            "serde_json::Value"
        }
    }
}

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
    "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod", "move",
    "mut", "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "type",
    "unsafe", "use", "where", "while",
];

/// Snake-case identifier for a field API name. Keywords get a trailing
/// underscore.
pub fn field_ident(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_underscore = true;
    for c in name.chars() {
        if c == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else if c.is_ascii_uppercase() {
            if !prev_underscore {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_underscore = false;
        } else {
            out.push(c);
            prev_underscore = false;
        }
    }
    let out = out.trim_end_matches('_').to_string();
    if RUST_KEYWORDS.contains(&out.as_str()) {
        format!("{out}_")
    } else {
        out
    }
}

/// Struct identifier for an object API name. `My_Object__c` becomes
/// `MyObjectC` so custom objects stay distinguishable from standard ones.
pub fn struct_ident(name: &str) -> String {
    let custom = name.ends_with("__c");
    let stem = name.strip_suffix("__c").unwrap_or(name);
    let mut out = String::with_capacity(stem.len());
    let mut upper_next = true;
    for c in stem.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    if custom {
        out.push('C');
    }
    out
}

/// Emit one model struct for an introspected object.
pub fn generate_model(schema: &ObjectSchema, config: &AdapterConfig) -> String {
    let mut out = String::new();
    let kind = if schema.custom { "custom" } else { "standard" };
    let _ = writeln!(out, "/// {} ({} object)", schema.label, kind);
    let _ = writeln!(out, "#[derive(Debug, Clone, Serialize, Deserialize)]");
    let _ = writeln!(out, "pub struct {} {{", struct_ident(&schema.name));

    for field in &schema.fields {
        // The configured pk name labels the primary key in the generated
        // view; the wire name stays `Id`, kept as an alias.
        let (serde_attr, ident) = if field.field_type == FieldType::Id {
            let attr = if config.pk == "Id" {
                "#[serde(rename = \"Id\")]".to_string()
            } else {
                format!("#[serde(rename = \"{}\", alias = \"Id\")]", config.pk)
            };
            (attr, field_ident(&config.pk))
        } else {
            (
                format!("#[serde(rename = \"{}\")]", field.name),
                field_ident(&field.name),
            )
        };
        let base = rust_type(&field.field_type);
        // The id is assigned by the platform, so it is optional on the way
        // in even though it is never null on the way out.
        let optional = field.nillable || field.field_type == FieldType::Id;
        let ty = if optional {
            format!("Option<{base}>")
        } else {
            base.to_string()
        };
        if !field.picklist_values.is_empty() {
            let _ = writeln!(out, "    /// Picklist: {}", field.picklist_values.join(", "));
        }
        let _ = writeln!(out, "    {serde_attr}");
        let _ = writeln!(out, "    pub {ident}: {ty},");
    }

    let _ = writeln!(out, "}}");
    out
}

/// Emit a full generated-models file: banner, imports, one struct per
/// object.
pub fn generate_models(schemas: &[ObjectSchema], config: &AdapterConfig) -> String {
    let mut imports: BTreeSet<&str> = BTreeSet::new();
    for schema in schemas {
        for field in &schema.fields {
            match rust_type(&field.field_type) {
                "NaiveDate" => {
                    imports.insert("NaiveDate");
                }
                "NaiveTime" => {
                    imports.insert("NaiveTime");
                }
                "DateTime<Utc>" => {
                    imports.insert("DateTime");
                    imports.insert("Utc");
                }
                _ => {}
            }
        }
    }

    let mut out = String::new();
    out.push_str("// Generated by inspectdb from remote object metadata.\n");
    out.push_str("// Field types are best-effort; review before relying on them.\n\n");
    if !imports.is_empty() {
        let list = imports.into_iter().collect::<Vec<_>>().join(", ");
        let _ = writeln!(out, "use chrono::{{{list}}};");
    }
    out.push_str("use serde::{Deserialize, Serialize};\n");
    for schema in schemas {
        out.push('\n');
        out.push_str(&generate_model(schema, config));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_idents_are_snake_cased() {
        assert_eq!(field_ident("FirstName"), "first_name");
        assert_eq!(field_ident("Id"), "id");
        assert_eq!(field_ident("My_Field__c"), "my_field_c");
        assert_eq!(field_ident("NumberOfEmployees"), "number_of_employees");
    }

    #[test]
    fn keywords_get_a_trailing_underscore() {
        assert_eq!(field_ident("Type"), "type_");
        assert_eq!(field_ident("Use"), "use_");
    }

    #[test]
    fn struct_idents_mark_custom_objects() {
        assert_eq!(struct_ident("Account"), "Account");
        assert_eq!(struct_ident("My_Object__c"), "MyObjectC");
    }
}
