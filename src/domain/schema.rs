//! Introspected object and field metadata in domain form.

use serde::{Deserialize, Serialize};

/// Field types reported by the metadata endpoints. Unrecognized types are
/// preserved verbatim rather than dropped.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum FieldType {
    Id,
    String,
    TextArea,
    EncryptedString,
    Phone,
    Url,
    Email,
    Picklist,
    MultiPicklist,
    Combobox,
    Reference,
    Boolean,
    Currency,
    Double,
    Percent,
    Int,
    Date,
    DateTime,
    Time,
    Base64,
    Address,
    Location,
    AnyType,
    Other(String),
}

impl FieldType {
    /// Map the wire-level type name onto the enum.
    pub fn from_api(name: &str) -> FieldType {
        match name {
            "id" => FieldType::Id,
            "string" => FieldType::String,
            "textarea" => FieldType::TextArea,
            "encryptedstring" => FieldType::EncryptedString,
            "phone" => FieldType::Phone,
            "url" => FieldType::Url,
            "email" => FieldType::Email,
            "picklist" => FieldType::Picklist,
            "multipicklist" => FieldType::MultiPicklist,
            "combobox" => FieldType::Combobox,
            "reference" => FieldType::Reference,
            "boolean" => FieldType::Boolean,
            "currency" => FieldType::Currency,
            "double" => FieldType::Double,
            "percent" => FieldType::Percent,
            "int" => FieldType::Int,
            "date" => FieldType::Date,
            "datetime" => FieldType::DateTime,
            "time" => FieldType::Time,
            "base64" => FieldType::Base64,
            "address" => FieldType::Address,
            "location" => FieldType::Location,
            "anyType" => FieldType::AnyType,
            other => FieldType::Other(other.to_string()),
        }
    }
}

/// One field of an introspected object.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct FieldSchema {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub nillable: bool,
    pub length: Option<u32>,
    pub custom: bool,
    pub createable: bool,
    pub updateable: bool,
    /// Objects a reference field may point at.
    pub reference_to: Vec<String>,
    /// Relationship name used when traversing to the parent object.
    pub relationship_name: Option<String>,
    pub defaulted_on_create: bool,
    pub picklist_values: Vec<String>,
}

/// An introspected object with its full field list.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ObjectSchema {
    pub name: String,
    pub label: String,
    pub custom: bool,
    pub queryable: bool,
    pub createable: bool,
    pub updateable: bool,
    pub deletable: bool,
    pub fields: Vec<FieldSchema>,
}

impl ObjectSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

/// Summary entry from the global object listing.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ObjectSummary {
    pub name: String,
    pub label: String,
    pub custom: bool,
    pub queryable: bool,
}
