use serde::Deserialize;

/// Service configuration for edgeprobe.
/// Contains the listen address for the HTTP layer and the probe settings.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Address the HTTP server binds to. Defaults to 0.0.0.0:8080.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default)]
    pub probe: ProbeConfig,
}

/// Settings for the performance prober.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// Whether probes issue a real outbound request ("live") or fabricate
    /// region-biased metrics ("simulate"). Defaults to live.
    #[serde(default)]
    pub strategy: Strategy,

    /// Upper bound on the outbound request, in seconds. Defaults to 15.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Accept invalid TLS certificates on the outbound request. Off by
    /// default; only enable to time targets with broken certificate chains.
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Live,
    Simulate,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            probe: ProbeConfig::default(),
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            timeout_seconds: default_timeout_seconds(),
            accept_invalid_certs: false,
        }
    }
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_timeout_seconds() -> u64 {
    15
}

#[cfg(test)]
pub mod test {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.probe.strategy, Strategy::Live);
        assert_eq!(config.probe.timeout_seconds, 15);
        assert!(!config.probe.accept_invalid_certs);
    }

    #[test]
    fn test_config_deserialization() {
        let yaml = r#"
                    listen_addr: 127.0.0.1:9100
                    probe:
                        strategy: simulate
                        timeout_seconds: 10
                        accept_invalid_certs: true
                    "#;

        let config: Config = serde_yaml::from_str(yaml).expect("Invalid YAML");
        assert_eq!(config.listen_addr, "127.0.0.1:9100");
        assert_eq!(config.probe.strategy, Strategy::Simulate);
        assert_eq!(config.probe.timeout_seconds, 10);
        assert!(config.probe.accept_invalid_certs);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = "probe:\n    strategy: simulate\n";

        let config: Config = serde_yaml::from_str(yaml).expect("Invalid YAML");
        assert_eq!(config.listen_addr, "0.0.0.0:8080");
        assert_eq!(config.probe.strategy, Strategy::Simulate);
        assert_eq!(config.probe.timeout_seconds, 15);
    }
}
