//! Configuration precedence tests: flag over environment over default
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Every test here mutates process environment and is marked with #[serial].

use clap::Parser;
use serial_test::serial;
use std::env;

use chordbot_api::cli::Args;
use chordbot_common::{Error, ServiceConfig};

const ALL_KEYS: &[&str] = &[
    "SERVICE_NAME",
    "CHORDBOT_HOST",
    "CHORDBOT_PORT",
    "METRICS_PORT",
    "CHORDBOT_INFERENCE_URL",
    "CHORDBOT_MODEL",
    "HF_TOKEN",
];

fn clear_env() {
    for key in ALL_KEYS {
        env::remove_var(key);
    }
}

fn resolve(argv: &[&str]) -> chordbot_common::Result<ServiceConfig> {
    let mut full = vec!["chordbot-api"];
    full.extend_from_slice(argv);
    Args::try_parse_from(full)
        .expect("arguments should parse")
        .into_config()
}

#[test]
#[serial]
fn test_clean_environment_uses_defaults() {
    clear_env();

    let config = resolve(&[]).expect("defaults must validate");
    assert_eq!(config, ServiceConfig::default());
    assert_eq!(config.bind_address(), "127.0.0.1:7860");
}

#[test]
#[serial]
fn test_environment_values_are_picked_up() {
    clear_env();
    env::set_var("SERVICE_NAME", "chord-bot-ui");
    env::set_var("METRICS_PORT", "9464");
    env::set_var("CHORDBOT_MODEL", "google/flan-t5-base");
    env::set_var("CHORDBOT_INFERENCE_URL", "http://localhost:9999");
    env::set_var("HF_TOKEN", "hf_secret");

    let config = resolve(&[]).unwrap();
    assert_eq!(config.service_name, "chord-bot-ui");
    assert_eq!(config.metrics_port, 9464);
    assert_eq!(config.inference_model, "google/flan-t5-base");
    assert_eq!(config.inference_base_url, "http://localhost:9999");
    assert_eq!(config.inference_token.as_deref(), Some("hf_secret"));

    clear_env();
}

#[test]
#[serial]
fn test_flag_overrides_environment() {
    clear_env();
    env::set_var("SERVICE_NAME", "chord-bot-ui");
    env::set_var("CHORDBOT_PORT", "9000");

    let config = resolve(&["--service-name", "chord-bot-api-2", "--port", "9001"]).unwrap();
    assert_eq!(config.service_name, "chord-bot-api-2");
    assert_eq!(config.port, 9001);

    clear_env();
}

#[test]
#[serial]
fn test_flag_resolves_environment_port_collision() {
    clear_env();
    // Collides with the default front-end port on its own
    env::set_var("METRICS_PORT", "7860");

    let config = resolve(&["--port", "9000"]).expect("merged configuration is valid");
    assert_eq!(config.port, 9000);
    assert_eq!(config.metrics_port, 7860);

    clear_env();
}

#[test]
#[serial]
fn test_environment_port_collision_without_flag_rejected() {
    clear_env();
    env::set_var("METRICS_PORT", "7860");

    let result = resolve(&[]);
    assert!(matches!(result, Err(Error::Config(_))));

    clear_env();
}

#[test]
#[serial]
fn test_flag_shadows_unparsable_environment_port() {
    clear_env();
    env::set_var("CHORDBOT_PORT", "not-a-port");

    let config = resolve(&["--port", "9000"]).unwrap();
    assert_eq!(config.port, 9000);

    clear_env();
}

#[test]
#[serial]
fn test_unparsable_environment_port_reported() {
    clear_env();
    env::set_var("CHORDBOT_PORT", "70000");

    let result = Args::try_parse_from(["chordbot-api"]);
    assert!(result.is_err());

    clear_env();
}
