//! Prints generated model definitions for remote objects.
//!
//! With object names as arguments only those objects are introspected;
//! without arguments every queryable object is.

use std::env;

use dotenvy::dotenv;

use sfdc_bridge::domain::types::ObjectName;
use sfdc_bridge::introspect;
use sfdc_bridge::models::config::AdapterConfig;
use sfdc_bridge::repository::SchemaReader;
use sfdc_bridge::repository::rest::RestRepository;

fn main() {
    dotenv().ok(); // Load .env file
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings_file = env::var("SF_SETTINGS_FILE").ok();
    let config = match AdapterConfig::load(settings_file.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            log::error!("Error loading settings: {err}");
            std::process::exit(1);
        }
    };

    let repo = match RestRepository::new(config.clone()) {
        Ok(repo) => repo,
        Err(err) => {
            log::error!("Error connecting: {err}");
            std::process::exit(1);
        }
    };

    let mut names: Vec<String> = env::args().skip(1).collect();
    if names.is_empty() {
        names = match repo.list_objects() {
            Ok(objects) => objects
                .into_iter()
                .filter(|o| o.queryable)
                .map(|o| o.name)
                .collect(),
            Err(err) => {
                log::error!("Error listing objects: {err}");
                std::process::exit(1);
            }
        };
    }

    let mut schemas = Vec::new();
    for name in &names {
        let object = match ObjectName::new(name.as_str()) {
            Ok(object) => object,
            Err(err) => {
                log::error!("Invalid object name {name:?}: {err}");
                std::process::exit(1);
            }
        };
        // Keep going when a single object cannot be described; the rest of
        // the listing is still useful.
        match repo.describe(&object) {
            Ok(schema) => schemas.push(schema),
            Err(err) => log::error!("Error describing {name}: {err}"),
        }
    }

    print!("{}", introspect::generate_models(&schemas, &config));
}
