//! Shared-secret bearer authentication for the trigger endpoints.
//!
//! The sync trigger is invoked by schedulers and scripts, not interactive
//! users, so a single shared secret is the whole story: callers present
//! `Authorization: Bearer <SYNC_SECRET>`.

use axum::http::{HeaderMap, header};
use secrecy::{ExposeSecret, SecretString};

use crate::error::AppError;

/// Require a valid `Authorization: Bearer` header matching the configured
/// sync secret.
///
/// # Errors
///
/// Returns [`AppError::Unauthorized`] for a missing, malformed, or wrong
/// token.
pub fn require_sync_token(headers: &HeaderMap, expected: &SecretString) -> Result<(), AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_owned()))?;

    if !constant_time_compare(token, expected.expose_secret()) {
        return Err(AppError::Unauthorized("invalid sync token".to_owned()));
    }

    Ok(())
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn secret() -> SecretString {
        SecretString::from("not-a-placeholder-7Kp2mQ9xVb4Rt8Wz".to_owned())
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_constant_time_compare_equal() {
        assert!(constant_time_compare("hello", "hello"));
        assert!(constant_time_compare("", ""));
    }

    #[test]
    fn test_constant_time_compare_not_equal() {
        assert!(!constant_time_compare("hello", "world"));
        assert!(!constant_time_compare("hello", "hell"));
        assert!(!constant_time_compare("hello", "helloo"));
    }

    #[test]
    fn test_valid_token_accepted() {
        let headers = headers_with("Bearer not-a-placeholder-7Kp2mQ9xVb4Rt8Wz");
        assert!(require_sync_token(&headers, &secret()).is_ok());
    }

    #[test]
    fn test_wrong_token_rejected() {
        let headers = headers_with("Bearer wrong-token");
        assert!(matches!(
            require_sync_token(&headers, &secret()),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_missing_header_rejected() {
        let headers = HeaderMap::new();
        assert!(matches!(
            require_sync_token(&headers, &secret()),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_non_bearer_scheme_rejected() {
        let headers = headers_with("Basic dXNlcjpwYXNz");
        assert!(matches!(
            require_sync_token(&headers, &secret()),
            Err(AppError::Unauthorized(_))
        ));
    }
}
