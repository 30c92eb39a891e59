//! HTTP GET helpers over a pluggable [`HttpClient`].

mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Result, anyhow};
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Issues a GET and returns the body.
///
/// # Errors
///
/// Fails on transport errors and on non-2xx responses; the error message is
/// the response body, or the status reason when the body is empty.
pub async fn fetch_bytes<C: HttpClient>(client: &C, url: &str) -> Result<Vec<u8>> {
    let mut req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    req.headers_mut()
        .insert(ACCEPT, HeaderValue::from_static("application/json"));

    let resp = client.execute(req).await?;
    let status = resp.status();
    debug!(url, status = status.as_u16(), "Response received");

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(anyhow!(error_message(status, &body)));
    }

    Ok(resp.bytes().await?.to_vec())
}

/// Issues a GET and decodes the JSON body into `T`.
pub async fn fetch_json<C: HttpClient, T: DeserializeOwned>(client: &C, url: &str) -> Result<T> {
    let bytes = fetch_bytes(client, url).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}
