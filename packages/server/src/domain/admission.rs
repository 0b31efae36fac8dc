//! Admission control for the upgrade endpoint.
//!
//! Pure checks run before the websocket handshake is attempted. They only
//! look at the request method and headers.

use axum::http::{
    HeaderMap, Method,
    header::{HOST, ORIGIN},
};

use super::error::AdmissionError;

/// Check whether a request may be promoted to a persistent connection.
///
/// The method must be `GET` and the `Origin` header must equal
/// `http://<Host>`. A missing `Origin` or `Host` header is a mismatch.
pub fn check_admission(method: &Method, headers: &HeaderMap) -> Result<(), AdmissionError> {
    if *method != Method::GET {
        return Err(AdmissionError::MethodNotAllowed);
    }

    if !is_same_origin(headers) {
        return Err(AdmissionError::OriginNotAllowed);
    }

    Ok(())
}

/// `true` when the `Origin` header names the serving host over plain http.
pub fn is_same_origin(headers: &HeaderMap) -> bool {
    let origin = headers.get(ORIGIN).and_then(|v| v.to_str().ok());
    let host = headers.get(HOST).and_then(|v| v.to_str().ok());

    match (origin, host) {
        (Some(origin), Some(host)) => origin
            .strip_prefix("http://")
            .is_some_and(|authority| authority == host),
        _ => false,
    }
}
