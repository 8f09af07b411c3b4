use serde::Serialize;

/// Metrics for a single probe run. Field names follow the wire contract
/// expected by the frontend, hence camelCase on serialization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub region: String,
    /// Full-response latency in milliseconds, used as an FCP proxy.
    pub first_contentful_paint: u64,
    /// Response body size in bytes.
    pub resource_size: u64,
    /// Milliseconds. Always >= first_contentful_paint.
    pub tti: u64,
    pub dns_time: u64,
    pub tcp_time: u64,
    pub test_time: String,
}
