//! End-to-end tests against a real org. They run only when credentials are
//! exported; the expensive cases additionally require `SLOW_TESTS`.

use sfdc_bridge::domain::query::{ColumnRef, OrderBy, QueryOptions, SelectQuery};
use sfdc_bridge::domain::types::ObjectName;
use sfdc_bridge::known_bugs;
use sfdc_bridge::models::config::AdapterConfig;
use sfdc_bridge::repository::rest::RestRepository;
use sfdc_bridge::repository::{ObjectReader, ObjectWriter, SaveRow, SchemaReader};

mod common;

fn live_repository() -> Option<RestRepository> {
    if !common::live_credentials_present() {
        return None;
    }
    let config = AdapterConfig::from_env().expect("credentials are exported but invalid");
    Some(RestRepository::new(config).expect("failed to connect to the org"))
}

#[test]
fn queries_account_names() {
    let Some(repo) = live_repository() else {
        return;
    };
    let query = SelectQuery::new(ObjectName::new("Account").unwrap())
        .columns(["Id", "Name"])
        .order_by(OrderBy::asc(ColumnRef::new("Name")))
        .limit(5);
    let mut cursor = repo.query(&query, &QueryOptions::default()).unwrap();
    for row in cursor.fetchall().unwrap() {
        assert!(row.get_named("Id").is_some());
    }
}

#[test]
fn describes_the_account_object() {
    let Some(repo) = live_repository() else {
        return;
    };
    let schema = repo
        .describe(&ObjectName::new("Account").unwrap())
        .unwrap();
    assert!(schema.queryable);
    assert!(schema.field("Id").is_some());
}

#[test]
fn deep_offsets_are_a_registered_platform_limit() {
    let Some(repo) = live_repository() else {
        return;
    };
    let query = SelectQuery::new(ObjectName::new("Account").unwrap())
        .column("Id")
        .offset(2001)
        .limit(1);
    let result = repo
        .query(&query, &QueryOptions::default())
        .and_then(|mut cursor| cursor.fetchall());
    // Whether the org enforces the limit or not, the outcome is tolerated.
    known_bugs::tolerate("offset-above-2000", result).unwrap();
}

#[test]
fn contact_crud_round_trip() {
    let Some(repo) = live_repository() else {
        return;
    };
    if !common::slow_tests_enabled() {
        return;
    }

    let contact = ObjectName::new("Contact").unwrap();
    let rows = vec![
        SaveRow::new()
            .set("FirstName", "Integration")
            .set("LastName", "Probe"),
    ];
    let ids = repo
        .insert(&contact, &rows, &QueryOptions::default())
        .unwrap();
    assert_eq!(ids.len(), 1);

    let update = SaveRow::new().set("FirstName", "Updated");
    repo.update(&contact, &ids[0], &update).unwrap();

    let row = repo
        .retrieve(&contact, &ids[0], &["FirstName".to_string()])
        .unwrap()
        .expect("inserted record must exist");
    assert_eq!(
        row.get_named("FirstName").and_then(|v| v.as_str()),
        Some("Updated")
    );

    let deleted = repo
        .delete(&contact, &ids, &QueryOptions::default())
        .unwrap();
    assert_eq!(deleted, 1);
}
