use std::env;
use std::io::Write;

use sfdc_bridge::models::config::{AdapterConfig, DEFAULT_HOST};

/// Configuration tests read the real process environment, so they step
/// aside whenever org credentials are exported (the environment would
/// override the file under test).
fn env_is_clean() -> bool {
    env::vars().all(|(key, _)| !key.starts_with("SF_"))
}

#[test]
fn settings_file_provides_credentials_and_defaults_fill_in() {
    if !env_is_clean() {
        return;
    }

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .unwrap();
    writeln!(file, "consumer_key: file-key").unwrap();
    writeln!(file, "consumer_secret: file-secret").unwrap();
    writeln!(file, "user: file-user@example.com").unwrap();
    writeln!(file, "password: file-pass").unwrap();
    file.flush().unwrap();

    let config = AdapterConfig::load(file.path().to_str()).unwrap();

    assert_eq!(config.consumer_key, "file-key");
    assert_eq!(config.user, "file-user@example.com");
    assert_eq!(config.host, DEFAULT_HOST);
    assert_eq!(config.pk, "Id");
    assert!(!config.lazy_connect);
}

#[test]
fn settings_file_can_toggle_adapter_options() {
    if !env_is_clean() {
        return;
    }

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .unwrap();
    writeln!(file, "consumer_key: file-key").unwrap();
    writeln!(file, "consumer_secret: file-secret").unwrap();
    writeln!(file, "user: file-user@example.com").unwrap();
    writeln!(file, "password: file-pass").unwrap();
    writeln!(file, "lazy_connect: true").unwrap();
    writeln!(file, "host: https://test.salesforce.com").unwrap();
    file.flush().unwrap();

    let config = AdapterConfig::load(file.path().to_str()).unwrap();

    assert!(config.lazy_connect);
    assert_eq!(config.host, "https://test.salesforce.com");
}

#[test]
fn missing_credentials_fail_to_load() {
    if !env_is_clean() {
        return;
    }
    assert!(AdapterConfig::from_env().is_err());
}
