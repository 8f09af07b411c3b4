use std::env;

use super::model::Config;

/// Load the service configuration from a YAML file and environment variables.
/// This function reads the configuration file specified by the `CONFIG_FILE`
/// environment variable (default `config.yml`), parses it into a `Config`
/// struct, and lets `LISTEN_ADDR` override the bind address. A missing file
/// falls back to built-in defaults so the service can run unconfigured.
pub fn load_config() -> Config {
    let config_file_location = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.yml".to_string());

    let mut config = match std::fs::read_to_string(&config_file_location) {
        Ok(config_str) => serde_yaml::from_str(&config_str).expect("Invalid YAML"),
        Err(err) => {
            log::warn!("Could not read {config_file_location} ({err}), using defaults");
            Config::default()
        }
    };

    if let Ok(listen_addr) = env::var("LISTEN_ADDR") {
        config.listen_addr = listen_addr;
    }

    log::info!(
        "Probe strategy: {:?}, timeout: {}s",
        config.probe.strategy,
        config.probe.timeout_seconds
    );

    config
}
