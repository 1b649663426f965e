//! HTTP unit call for perf testing.
//!
//! Uses the curl crate (libcurl) to POST one JSON record to the target
//! service, time the round trip, and pull the payload out of the response's
//! `data` field.

use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};

use super::CallRecord;

/// Error from one service call. Kept as a concrete enum so callers can wrap
/// the call in a retry before converting to anyhow.
#[derive(Debug)]
pub enum HttpCallError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Request or response body was not valid JSON.
    Json(serde_json::Error),
    /// Response JSON had no `data` field.
    MissingData,
}

impl fmt::Display for HttpCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpCallError::Curl(e) => write!(f, "{}", e),
            HttpCallError::Http(code) => write!(f, "HTTP {}", code),
            HttpCallError::Json(e) => write!(f, "json: {}", e),
            HttpCallError::MissingData => write!(f, "response has no `data` field"),
        }
    }
}

impl std::error::Error for HttpCallError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HttpCallError::Curl(e) => Some(e),
            HttpCallError::Json(e) => Some(e),
            HttpCallError::Http(_) | HttpCallError::MissingData => None,
        }
    }
}

impl From<curl::Error> for HttpCallError {
    fn from(e: curl::Error) -> Self {
        HttpCallError::Curl(e)
    }
}

impl From<serde_json::Error> for HttpCallError {
    fn from(e: serde_json::Error) -> Self {
        HttpCallError::Json(e)
    }
}

/// POSTs `body` as JSON and returns the parsed response body.
///
/// Follows redirects. Runs in the current thread and blocks for the duration
/// of the transfer; the worker slot is occupied the whole time.
pub fn post_json(url: &str, body: &Value) -> Result<Value, HttpCallError> {
    let payload = serde_json::to_vec(body)?;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.post(true)?;
    easy.post_fields_copy(&payload)?;
    easy.follow_location(true)?;
    easy.connect_timeout(Duration::from_secs(15))?;
    easy.timeout(Duration::from_secs(120))?;

    let mut list = curl::easy::List::new();
    list.append("Content-Type: application/json")?;
    // Suppress 100-continue so small payloads go out in one write.
    list.append("Expect:")?;
    easy.http_headers(list)?;

    let mut response_body: Vec<u8> = Vec::new();
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            response_body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(HttpCallError::Http(code));
    }

    Ok(serde_json::from_slice(&response_body)?)
}

/// Times one POST of `item` and builds the perf record: request is the item
/// itself, response is the `data` field of the response body, cost is the
/// wall-clock seconds of the call.
pub fn call_service(url: &str, item: Value) -> Result<CallRecord, HttpCallError> {
    let start = Instant::now();
    let request = item.clone();
    let body = post_json(url, &request)?;
    let response = body.get("data").cloned().ok_or(HttpCallError::MissingData)?;
    let cost = start.elapsed().as_secs_f64();
    Ok(CallRecord { item, request, response, cost })
}
