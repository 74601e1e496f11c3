//! One GET, classified into an [`ApiOutcome`].

use std::time::Duration;

use crb_core::{errors::Error, outcome::ApiOutcome, utils::truncate_text, Result};
use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;

/// Response bodies are cut to this many characters in logs.
const LOG_BODY_CHARS: usize = 200;

pub(crate) fn build_http(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::External(format!("http client build error: {e}")))
}

/// `token` is sent as a bearer credential when present and non-empty.
pub(crate) async fn get_json<T: DeserializeOwned>(
    http: &reqwest::Client,
    url: &str,
    token: Option<&str>,
) -> ApiOutcome<T> {
    let mut req = http.get(url).header(header::ACCEPT, "application/json");
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        req = req.bearer_auth(token);
    }

    let resp = match req.send().await {
        Ok(resp) => resp,
        Err(e) => {
            tracing::warn!(url, error = %e, "api request failed");
            return ApiOutcome::NetworkError(e.to_string());
        }
    };

    let status = resp.status();
    if status != StatusCode::OK {
        // The body only feeds the log line; a failed read keeps the status classification.
        let snippet = match resp.text().await {
            Ok(body) => truncate_text(&body, LOG_BODY_CHARS),
            Err(e) => format!("<body unavailable: {e}>"),
        };
        tracing::warn!(url, status = status.as_u16(), body = %snippet, "api returned error status");
        return ApiOutcome::from_status(status.as_u16(), snippet);
    }

    let body = match resp.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::warn!(url, status = status.as_u16(), error = %e, "api body read failed");
            return ApiOutcome::NetworkError(e.to_string());
        }
    };

    match serde_json::from_str::<T>(&body) {
        Ok(value) => ApiOutcome::Success(value),
        Err(e) => {
            tracing::warn!(
                url,
                status = status.as_u16(),
                error = %e,
                body = %truncate_text(&body, LOG_BODY_CHARS),
                "api response did not decode"
            );
            ApiOutcome::Unexpected(format!("invalid response body: {e}"))
        }
    }
}
