//! HTTP Basic authentication
//!
//! Credentials come from a JSON secrets file (an array of
//! `[username, password]` pairs). Verification compares the presented
//! pair against every known pair with constant-time equality and
//! without short-circuiting, so response timing does not leak which
//! username or password matched.

use std::path::Path;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use ring::constant_time::verify_slices_are_equal;

use crate::server::ServerState;
use crate::utils::AppError;

/// The authenticated user, injected into request extensions
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub username: String,
}

/// Known username/password pairs
#[derive(Debug, Clone)]
pub struct Credentials {
    pairs: Vec<(Vec<u8>, Vec<u8>)>,
}

impl Credentials {
    /// Load pairs from the secrets file: `[["user", "password"], ...]`
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            AppError::Internal(format!(
                "Failed to read secrets file {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let pairs: Vec<(String, String)> = serde_json::from_str(&raw)
            .map_err(|e| AppError::Internal(format!("Malformed secrets file: {e}")))?;

        if pairs.is_empty() {
            return Err(AppError::Internal("Secrets file has no credentials".into()));
        }

        Ok(Self {
            pairs: pairs
                .into_iter()
                .map(|(u, p)| (u.into_bytes(), p.into_bytes()))
                .collect(),
        })
    }

    #[cfg(test)]
    pub fn from_pairs(pairs: Vec<(&str, &str)>) -> Self {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(u, p)| (u.as_bytes().to_vec(), p.as_bytes().to_vec()))
                .collect(),
        }
    }

    /// Verify a presented pair. Every known pair is checked regardless
    /// of earlier matches; a pair is accepted only when the matching
    /// username and password sit at the same index.
    pub fn verify(&self, username: &str, password: &str) -> Option<String> {
        let mut username_index: i64 = -1;
        let mut password_index: i64 = -1;

        for (i, (u, p)) in self.pairs.iter().enumerate() {
            if verify_slices_are_equal(username.as_bytes(), u).is_ok() {
                username_index = i as i64;
            }
            if verify_slices_are_equal(password.as_bytes(), p).is_ok() {
                password_index = i as i64;
            }
        }

        let possible = username_index + password_index >= 0;
        let matches = username_index == password_index;
        if possible && matches {
            Some(username.to_string())
        } else {
            None
        }
    }
}

/// Parse an `Authorization: Basic ...` header into (username, password)
fn parse_basic(header: &str) -> Option<(String, String)> {
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, pass) = decoded.split_once(':')?;
    Some((user.to_string(), pass.to_string()))
}

/// Require authentication middleware
///
/// Validates Basic credentials on every request except public paths
/// and, if valid, adds the [`CurrentUser`] to the request extensions.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    // Public routes skip auth
    if path == "/health" {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some((username, password)) = auth_header.and_then(parse_basic) else {
        tracing::warn!(target: "security", uri = %req.uri(), "Missing or malformed credentials");
        return Err(AppError::Unauthorized);
    };

    match state.credentials.verify(&username, &password) {
        Some(username) => {
            tracing::debug!(username = %username, "User authenticated");
            req.extensions_mut().insert(CurrentUser { username });
            Ok(next.run(req).await)
        }
        None => {
            tracing::warn!(target: "security", username = %username, "Authentication failed");
            Err(AppError::Unauthorized)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::from_pairs(vec![("alice", "hunter2"), ("bob", "swordfish")])
    }

    #[test]
    fn test_verify_accepts_matching_pair() {
        assert_eq!(creds().verify("alice", "hunter2"), Some("alice".into()));
        assert_eq!(creds().verify("bob", "swordfish"), Some("bob".into()));
    }

    #[test]
    fn test_verify_rejects_crossed_pair() {
        // Valid username with another user's password
        assert_eq!(creds().verify("alice", "swordfish"), None);
    }

    #[test]
    fn test_verify_rejects_unknown() {
        assert_eq!(creds().verify("mallory", "hunter2"), None);
        assert_eq!(creds().verify("alice", "wrong"), None);
        assert_eq!(creds().verify("", ""), None);
    }

    #[test]
    fn test_parse_basic() {
        // "alice:hunter2"
        let header = format!("Basic {}", BASE64.encode(b"alice:hunter2"));
        assert_eq!(
            parse_basic(&header),
            Some(("alice".into(), "hunter2".into()))
        );
        assert_eq!(parse_basic("Bearer xyz"), None);
        assert_eq!(parse_basic("Basic !!!"), None);
    }
}
