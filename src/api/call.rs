//! Classification of HTTP outcomes into [`RemoteError`].
//!
//! Every request made by the data source goes through [`api_call`], so no
//! `reqwest` or `serde_json` error ever leaves the API layer.

use crate::error::RemoteError;
use log::{debug, warn};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use std::error::Error as _;
use std::future::Future;

/// Awaits `execute` and turns its outcome into a decoded body or a classified error.
///
/// Cancellation needs no special case: dropping the returned future drops the
/// in-flight request with it.
pub async fn api_call<T, Fut>(endpoint: &str, execute: Fut) -> Result<T, RemoteError>
where
    T: DeserializeOwned,
    Fut: Future<Output = reqwest::Result<Response>>,
{
    let response = match execute.await {
        Ok(response) => response,
        Err(error) => {
            let classified = classify_transport_error(&error);
            warn!("{} failed before a response arrived: {}", endpoint, error);
            return Err(classified);
        }
    };

    response_to_result(endpoint, response).await
}

pub async fn response_to_result<T>(endpoint: &str, response: Response) -> Result<T, RemoteError>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if !status.is_success() {
        let classified = classify_status(status);
        warn!("{} returned {} ({:?})", endpoint, status, classified);
        return Err(classified);
    }

    let body = response.bytes().await.map_err(|error| {
        warn!("{} body could not be read: {}", endpoint, error);
        classify_transport_error(&error)
    })?;

    debug!("{} returned {} with {} bytes", endpoint, status, body.len());
    decode_body(&body)
}

/// Maps a non-2xx status onto the taxonomy.
pub fn classify_status(status: StatusCode) -> RemoteError {
    match status.as_u16() {
        408 => RemoteError::RequestTimeout,
        429 => RemoteError::TooManyRequests,
        500..=599 => RemoteError::Server,
        _ => RemoteError::Unknown,
    }
}

pub fn classify_transport_error(error: &reqwest::Error) -> RemoteError {
    if error.is_timeout() {
        RemoteError::RequestTimeout
    } else if error.is_connect() || error.is_request() || has_io_source(error) {
        RemoteError::NoInternet
    } else {
        RemoteError::Unknown
    }
}

/// Decodes a successful body; an empty or malformed body is a serialization failure.
pub fn decode_body<T>(body: &[u8]) -> Result<T, RemoteError>
where
    T: DeserializeOwned,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(RemoteError::Serialization);
    }

    serde_json::from_slice(body).map_err(|error| {
        debug!("response body rejected: {}", error);
        RemoteError::Serialization
    })
}

fn has_io_source(error: &reqwest::Error) -> bool {
    let mut source = error.source();
    while let Some(inner) = source {
        if inner.is::<std::io::Error>() {
            return true;
        }
        source = inner.source();
    }
    false
}
