#![deny(warnings)]
#![deny(rust_2018_idioms)]

use config::{Config, File};
use harbor_analyzer::settings::{Environment, Settings};

pub mod analyzer;

fn settings_from_file(path: &str, environment: Environment) -> Settings {
    Config::builder()
        .add_source(File::with_name(path).required(true))
        .set_override("environment", environment.as_ref())
        .unwrap()
        .build()
        .unwrap()
        .try_deserialize::<Settings>()
        .unwrap()
}

#[test]
fn test_local_settings_are_valid() {
    let settings = settings_from_file("config/local.yml", Environment::Local);
    assert!(settings.lookup.is_some());
}

#[test]
fn test_development_settings_are_valid() {
    settings_from_file("config/development.yml", Environment::Development);
}

#[test]
fn test_test_settings_are_valid() {
    let settings = settings_from_file("config/test.yml", Environment::Test);
    assert_eq!(settings.sync_tolerance().unwrap(), chrono::Duration::minutes(2));
}
