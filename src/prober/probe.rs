use std::time::{Duration, Instant};

use chrono::Local;
use rand::Rng;
use reqwest::header::{
    ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CACHE_CONTROL, CONNECTION, CONTENT_LENGTH,
    HeaderMap, HeaderValue, USER_AGENT,
};
use url::Url;

use super::error::classify;
use super::prelude::*;
use super::region::{jitter, profile_for};
use crate::config::model::{ProbeConfig, Strategy};

// Browser-like headers reduce the chance of the target rejecting the probe as
// a bot.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Runs performance probes against target URLs. Holds a single reqwest client
/// reused across calls; no per-call state is kept, so one instance serves any
/// number of concurrent requests.
pub struct Prober {
    client: reqwest::Client,
    config: ProbeConfig,
}

impl Prober {
    pub fn new(config: ProbeConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .default_headers(browser_headers())
            .timeout(Duration::from_secs(config.timeout_seconds))
            // Off by default; turning this on trades certificate validation
            // for the ability to time endpoints with broken chains.
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self { client, config })
    }

    /// Validates the target URL, then measures or simulates depending on the
    /// configured strategy. The RNG is injected so tests can seed it.
    pub async fn probe<R: Rng + Send>(
        &self,
        url: &str,
        region: &str,
        rng: &mut R,
    ) -> Result<ProbeResult, ProbeError> {
        validate_url(url)?;

        match self.config.strategy {
            Strategy::Live => self.measure(url, region, rng).await,
            Strategy::Simulate => Ok(simulate(region, rng)),
        }
    }

    /// Live strategy: one outbound GET, wall-clock latency as the FCP proxy.
    /// DNS and TCP timings are synthesized since the client does not expose
    /// per-phase connection timings.
    async fn measure<R: Rng + Send>(
        &self,
        url: &str,
        region: &str,
        rng: &mut R,
    ) -> Result<ProbeResult, ProbeError> {
        let start = Instant::now();
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(err) => {
                log::error!("Probe request to {url} failed: {err}");
                return Err(classify(err, url, self.config.timeout_seconds));
            }
        };

        let first_contentful_paint = start.elapsed().as_millis() as u64;
        let tti = first_contentful_paint + rng.gen_range(0..1_500);
        let resource_size = resource_size(response.headers(), rng);

        Ok(ProbeResult {
            region: region.to_string(),
            first_contentful_paint,
            resource_size,
            tti,
            dns_time: rng.gen_range(0..800),
            tcp_time: rng.gen_range(0..1_000),
            test_time: timestamp(),
        })
    }
}

/// Simulation strategy: region baselines with ±10% jitter, no network. TTI is
/// jittered FCP plus a jittered non-negative increment, which keeps
/// tti >= firstContentfulPaint regardless of the draws.
fn simulate<R: Rng>(region: &str, rng: &mut R) -> ProbeResult {
    let profile = profile_for(region);
    let first_contentful_paint = jitter(rng, profile.fcp);
    let tti = first_contentful_paint + jitter(rng, profile.tti - profile.fcp);

    ProbeResult {
        region: region.to_string(),
        first_contentful_paint,
        resource_size: jitter(rng, profile.resource),
        tti,
        dns_time: jitter(rng, profile.dns),
        tcp_time: jitter(rng, profile.tcp),
        test_time: timestamp(),
    }
}

fn validate_url(url: &str) -> Result<(), ProbeError> {
    let parsed = Url::parse(url).map_err(|_| ProbeError::Validation)?;
    if parsed.scheme() != "https" {
        return Err(ProbeError::Validation);
    }
    Ok(())
}

/// Content-Length header when the target sends one, otherwise a random value
/// in [100 KiB, 600 KiB).
fn resource_size<R: Rng>(headers: &HeaderMap, rng: &mut R) -> u64 {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| rng.gen_range(100 * 1024..600 * 1024))
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("zh-CN,zh;q=0.9,en;q=0.8"),
    );
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate, br"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(
        "Upgrade-Insecure-Requests",
        HeaderValue::from_static("1"),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
