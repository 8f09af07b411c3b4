use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Body;
use hyper::header::{CONTENT_TYPE, HeaderValue, ORIGIN};
use hyper::{Method, Request, Response, StatusCode};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::prober::prelude::*;

const PROBE_PATH: &str = "/performance-test";

#[derive(Debug, Deserialize)]
struct ProbeRequest {
    url: Option<String>,
    region: Option<String>,
}

/// Wire envelope the frontend expects: `{code, msg, data?}` with the original
/// Chinese status messages.
#[derive(Debug, Serialize)]
struct Envelope {
    code: u16,
    msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<ProbeResult>,
}

impl Envelope {
    fn ok(data: ProbeResult) -> Self {
        Self {
            code: 200,
            msg: "测试成功".to_string(),
            data: Some(data),
        }
    }

    fn error(code: u16, msg: impl Into<String>) -> Self {
        Self {
            code,
            msg: msg.into(),
            data: None,
        }
    }
}

/// Routes a single request. Generic over the body type so tests can drive it
/// with an in-memory body instead of a live connection.
pub async fn handle<B>(
    req: Request<B>,
    prober: Arc<Prober>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: std::fmt::Display,
{
    let origin = req
        .headers()
        .get(ORIGIN)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("*"));

    // CORS preflight: 204, headers only.
    if req.method() == Method::OPTIONS {
        return Ok(empty_response(StatusCode::NO_CONTENT, &origin));
    }

    if req.method() != Method::POST || req.uri().path() != PROBE_PATH {
        return Ok(json_response(
            StatusCode::NOT_FOUND,
            &Envelope::error(404, "接口不存在"),
            &origin,
        ));
    }

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            log::debug!("Failed to read request body: {err}");
            Bytes::new()
        }
    };

    let probe_request = serde_json::from_slice::<ProbeRequest>(&body).unwrap_or(ProbeRequest {
        url: None,
        region: None,
    });

    let (url, region) = match (probe_request.url, probe_request.region) {
        (Some(url), Some(region)) if !url.is_empty() && !region.is_empty() => (url, region),
        _ => {
            return Ok(json_response(
                StatusCode::BAD_REQUEST,
                &Envelope::error(400, "缺少参数：url或region"),
                &origin,
            ));
        }
    };

    let mut rng = StdRng::from_entropy();
    match prober.probe(&url, &region, &mut rng).await {
        Ok(result) => Ok(json_response(StatusCode::OK, &Envelope::ok(result), &origin)),
        Err(err) => {
            log::warn!("Probe of {url} from region {region} failed: {err}");
            Ok(json_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &Envelope::error(500, err.to_string()),
                &origin,
            ))
        }
    }
}

fn json_response(
    status: StatusCode,
    envelope: &Envelope,
    origin: &HeaderValue,
) -> Response<Full<Bytes>> {
    let body = serde_json::to_vec(envelope).expect("Failed to serialize response envelope");

    let mut response = Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Full::new(Bytes::from(body)))
        .expect("Failed to build response");

    apply_cors(&mut response, origin);
    response
}

fn empty_response(status: StatusCode, origin: &HeaderValue) -> Response<Full<Bytes>> {
    let mut response = Response::builder()
        .status(status)
        .body(Full::new(Bytes::new()))
        .expect("Failed to build response");

    apply_cors(&mut response, origin);
    response
}

// Set unconditionally on every response, echoing the caller's Origin.
fn apply_cors(response: &mut Response<Full<Bytes>>, origin: &HeaderValue) {
    let headers = response.headers_mut();
    headers.insert("Access-Control-Allow-Origin", origin.clone());
    headers.insert(
        "Access-Control-Allow-Methods",
        HeaderValue::from_static("GET, POST, OPTIONS, PUT, DELETE"),
    );
    headers.insert(
        "Access-Control-Allow-Headers",
        HeaderValue::from_static("Content-Type, Authorization, X-Requested-With"),
    );
    headers.insert(
        "Access-Control-Allow-Credentials",
        HeaderValue::from_static("true"),
    );
    headers.insert("Access-Control-Max-Age", HeaderValue::from_static("86400"));
}
