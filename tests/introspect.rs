use serde_json::json;

use sfdc_bridge::DEFAULT_API_VERSION;
use sfdc_bridge::introspect::{generate_model, generate_models, object_schema};
use sfdc_bridge::models::config::{AdapterConfig, DEFAULT_HOST};
use sfdc_bridge::models::describe::SObjectDescribe;

fn config(pk: &str) -> AdapterConfig {
    AdapterConfig {
        consumer_key: "key".to_string(),
        consumer_secret: "secret".to_string(),
        user: "user@example.com".to_string(),
        password: "hunter2".to_string(),
        host: DEFAULT_HOST.to_string(),
        pk: pk.to_string(),
        lazy_connect: false,
        api_version: DEFAULT_API_VERSION.to_string(),
    }
}

fn sample_describe() -> SObjectDescribe {
    serde_json::from_value(json!({
        "name": "Donation__c",
        "label": "Donation",
        "custom": true,
        "queryable": true,
        "createable": true,
        "updateable": true,
        "deletable": true,
        "fields": [
            {"name": "Id", "label": "Record ID", "type": "id", "nillable": false},
            {"name": "Name", "label": "Name", "type": "string", "nillable": false, "length": 80},
            {"name": "Amount__c", "label": "Amount", "type": "currency", "nillable": true},
            {"name": "Received_On__c", "label": "Received On", "type": "date", "nillable": true},
            {"name": "Type", "label": "Type", "type": "picklist", "nillable": true,
             "picklistValues": [{"value": "Cash", "active": true}, {"value": "Pledge", "active": true}]},
            {"name": "ContactId", "label": "Contact", "type": "reference", "nillable": true,
             "referenceTo": ["Contact"], "relationshipName": "Contact"},
        ],
    }))
    .unwrap()
}

#[test]
fn generated_models_map_field_types() {
    let schema = object_schema(&sample_describe());
    let model = generate_model(&schema, &config("Id"));

    assert!(model.contains("pub struct DonationC {"));
    assert!(model.contains("#[serde(rename = \"Id\")]\n    pub id: Option<String>,"));
    assert!(model.contains("#[serde(rename = \"Name\")]\n    pub name: String,"));
    assert!(model.contains("#[serde(rename = \"Amount__c\")]\n    pub amount_c: Option<f64>,"));
    assert!(
        model.contains(
            "#[serde(rename = \"Received_On__c\")]\n    pub received_on_c: Option<NaiveDate>,"
        )
    );
    // `type` is a keyword, so the picklist field gets an escaped ident.
    assert!(model.contains("pub type_: Option<String>,"));
    assert!(model.contains("/// Picklist: Cash, Pledge"));
}

#[test]
fn lowercase_pk_keeps_a_wire_alias() {
    let schema = object_schema(&sample_describe());
    let model = generate_model(&schema, &config("id"));
    assert!(model.contains("#[serde(rename = \"id\", alias = \"Id\")]"));
}

#[test]
fn generated_files_carry_banner_and_imports() {
    let schema = object_schema(&sample_describe());
    let out = generate_models(std::slice::from_ref(&schema), &config("Id"));

    assert!(out.starts_with("// Generated by inspectdb"));
    assert!(out.contains("use chrono::{NaiveDate};"));
    assert!(out.contains("use serde::{Deserialize, Serialize};"));
    assert!(out.contains("pub struct DonationC {"));
}
