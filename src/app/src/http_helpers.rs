//! HTTP helper functions for Crux Core
//!
//! The request side wraps `crux_http` commands into two verbs, [`get`] and
//! [`post`]. The response side folds the `crux_http` result into a terminal
//! [`Completion`], so update handlers only ever see a finished request.

use crux_core::Command;
use crux_http::{HttpError, Response};

use crate::events::Event;
use crate::{Effect, HttpCmd};

/// Base URL for device API endpoints.
///
/// NOTE: `crux_http` requires absolute URLs and rejects relative paths.
/// The Shell replaces this prefix with the configured device address.
pub const BASE_URL: &str = "http://device";

/// Constructs the full address from a given endpoint.
///
/// # Example
/// ```
/// use garage_panel_core::http_helpers::build_url;
/// let url = build_url("/api/doorStatus");
/// assert_eq!(url, "http://device/api/doorStatus");
/// ```
pub fn build_url(endpoint: &str) -> String {
    format!("{BASE_URL}{endpoint}")
}

/// Terminal outcome of a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// 2xx status with the response body
    Success(Vec<u8>),
    /// Any other status; the body may carry an `{"error": ...}` object
    Failed { status: u16, body: Vec<u8> },
    /// No response at all (connection refused, DNS failure, timeout)
    Unreachable(String),
}

impl From<crux_http::Result<Response<Vec<u8>>>> for Completion {
    fn from(result: crux_http::Result<Response<Vec<u8>>>) -> Self {
        match result {
            Ok(mut response) => {
                let status: u16 = response.status().into();
                let body = response.take_body().unwrap_or_default();
                if response.status().is_success() {
                    Self::Success(body)
                } else {
                    Self::Failed { status, body }
                }
            }
            // crux_http reports 4xx/5xx answers as errors carrying the body
            Err(HttpError::Http { code, body, .. }) => Self::Failed {
                status: code.into(),
                body: body.unwrap_or_default(),
            },
            Err(e) => Self::Unreachable(e.to_string()),
        }
    }
}

/// Issue a GET request; `on_complete` receives the terminal outcome.
pub fn get<F>(endpoint: &str, on_complete: F) -> Command<Effect, Event>
where
    F: FnOnce(Completion) -> Event + Send + 'static,
{
    HttpCmd::get(build_url(endpoint))
        .build()
        .then_send(move |result| on_complete(Completion::from(result)))
}

/// Issue a POST request; the body, if any, is sent verbatim as JSON.
pub fn post<F>(endpoint: &str, body: Option<String>, on_complete: F) -> Command<Effect, Event>
where
    F: FnOnce(Completion) -> Event + Send + 'static,
{
    let builder = HttpCmd::post(build_url(endpoint));
    let builder = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body_string(body),
        None => builder,
    };

    builder
        .build()
        .then_send(move |result| on_complete(Completion::from(result)))
}

/// Parse a JSON body, describing the failure for logging.
pub fn parse_json<T: serde::de::DeserializeOwned>(action: &str, body: &[u8]) -> Result<T, String> {
    serde_json::from_slice(body).map_err(|e| format!("{action}: JSON parse error: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_url_prefixes_base() {
        assert_eq!(build_url("/api/door1"), "http://device/api/door1");
    }

    #[test]
    fn error_status_is_a_failed_completion() {
        let result: crux_http::Result<Response<Vec<u8>>> = Err(HttpError::Http {
            code: crux_http::http::StatusCode::InternalServerError,
            message: "Internal Server Error".to_string(),
            body: Some(br#"{"error":"bad ssid"}"#.to_vec()),
        });

        assert_eq!(
            Completion::from(result),
            Completion::Failed {
                status: 500,
                body: br#"{"error":"bad ssid"}"#.to_vec(),
            }
        );
    }

    #[test]
    fn transport_error_is_unreachable() {
        let result: crux_http::Result<Response<Vec<u8>>> = Err(HttpError::Timeout);

        assert!(matches!(Completion::from(result), Completion::Unreachable(_)));
    }

    #[test]
    fn parse_json_reports_action() {
        let err = parse_json::<Vec<u8>>("Wifi scan", b"{").unwrap_err();
        assert!(err.starts_with("Wifi scan: JSON parse error"));
    }
}
