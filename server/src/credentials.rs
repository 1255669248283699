//! Time-limited TURN credentials
//!
//! Implements the TURN REST API scheme shared with the relay
//! (`use-auth-secret` in coturn):
//!
//! - username: `<expiry unix timestamp>:<identity>`
//! - password: `base64(HMAC-SHA1(secret, username))`
//!
//! The relay recomputes the password from the username and rejects it once
//! the embedded expiry has passed, so nothing is stored here.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use ring::hmac;
use thiserror::Error;

use crate::{config::TurnConfig, models::TurnCredentials};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IssueError {
    #[error("TURN server secret not configured")]
    MissingSecret,
}

/// Builds credential bundles from read-only configuration.
#[derive(Debug, Clone)]
pub struct CredentialIssuer {
    secret: Vec<u8>,
    relay_host: String,
    relay_port: u16,
    secure_port: u16,
    allow_insecure_secret: bool,
}

impl CredentialIssuer {
    pub fn new(config: &TurnConfig) -> Self {
        Self {
            secret: config.secret.as_bytes().to_vec(),
            relay_host: config.relay_host.clone(),
            relay_port: config.relay_port,
            secure_port: config.secure_port,
            allow_insecure_secret: config.allow_insecure_secret,
        }
    }

    /// Issue credentials valid for `ttl` seconds from now.
    ///
    /// `identity` and `ttl` are expected to have passed
    /// [`crate::validation::validate_request`].
    pub fn issue(&self, identity: &str, ttl: u64) -> Result<TurnCredentials, IssueError> {
        self.issue_at(identity, ttl, Utc::now().timestamp())
    }

    /// Same as [`issue`](Self::issue) with the current time supplied.
    pub fn issue_at(
        &self,
        identity: &str,
        ttl: u64,
        now: i64,
    ) -> Result<TurnCredentials, IssueError> {
        if self.secret.is_empty() {
            if !self.allow_insecure_secret {
                return Err(IssueError::MissingSecret);
            }
            tracing::warn!(identity, "Issuing TURN credentials with an empty secret");
        }

        let expiry = now.saturating_add_unsigned(ttl);
        let username = signed_username(expiry, identity);
        let password = sign_username(&self.secret, &username);
        let uris = relay_uris(&self.relay_host, self.relay_port, self.secure_port);

        tracing::info!(identity, ttl, "Generated TURN credentials");

        Ok(TurnCredentials {
            username,
            password,
            ttl,
            uris,
        })
    }
}

pub fn signed_username(expiry: i64, identity: &str) -> String {
    format!("{}:{}", expiry, identity)
}

/// HMAC-SHA1 of `username` keyed by `secret`, base64 encoded.
pub fn sign_username(secret: &[u8], username: &str) -> String {
    let key = hmac::Key::new(hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY, secret);
    let signature = hmac::sign(&key, username.as_bytes());
    STANDARD.encode(signature.as_ref())
}

/// UDP, TCP and TLS relay URIs, in that order.
pub fn relay_uris(host: &str, port: u16, secure_port: u16) -> Vec<String> {
    vec![
        format!("turn:{}:{}?transport=udp", host, port),
        format!("turn:{}:{}?transport=tcp", host, port),
        format!("turns:{}:{}?transport=tcp", host, secure_port),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000;

    fn issuer(secret: &str) -> CredentialIssuer {
        CredentialIssuer::new(&TurnConfig {
            secret: secret.to_string(),
            relay_host: "turn.example.com".to_string(),
            relay_port: 5349,
            ..TurnConfig::default()
        })
    }

    #[test]
    fn test_regression_vector() {
        let creds = issuer("s3cr3t").issue_at("alice", 3600, NOW).unwrap();
        assert_eq!(creds.username, "1700003600:alice");
        assert_eq!(creds.password, "mN1PHBuEWsiXFQck8yiVDVXfuas=");
        assert_eq!(creds.ttl, 3600);
    }

    #[test]
    fn test_deterministic_for_fixed_time() {
        let issuer = issuer("s3cr3t");
        let a = issuer.issue_at("bob", 600, NOW).unwrap();
        let b = issuer.issue_at("bob", 600, NOW).unwrap();
        assert_eq!(a, b);

        let later = issuer.issue_at("bob", 600, NOW + 1).unwrap();
        assert_ne!(a.password, later.password);
    }

    #[test]
    fn test_password_depends_on_secret() {
        let a = issuer("one").issue_at("alice", 3600, NOW).unwrap();
        let b = issuer("two").issue_at("alice", 3600, NOW).unwrap();
        assert_eq!(a.username, b.username);
        assert_ne!(a.password, b.password);
    }

    #[test]
    fn test_password_is_sha1_sized() {
        let creds = issuer("s3cr3t").issue_at("alice", 3600, NOW).unwrap();
        let raw = STANDARD.decode(&creds.password).unwrap();
        assert_eq!(raw.len(), 20);
    }

    #[test]
    fn test_identity_after_first_colon() {
        let creds = issuer("s3cr3t").issue_at("user-1.name_2", 60, NOW).unwrap();
        let (expiry, identity) = creds.username.split_once(':').unwrap();
        assert_eq!(identity, "user-1.name_2");
        assert_eq!(expiry.parse::<i64>().unwrap(), NOW + 60);
    }

    #[test]
    fn test_expiry_uses_current_time() {
        let before = Utc::now().timestamp();
        let creds = issuer("s3cr3t").issue("alice", 3600).unwrap();
        let expiry: i64 = creds.username.split_once(':').unwrap().0.parse().unwrap();
        assert!((expiry - before - 3600).abs() <= 2);
    }

    #[test]
    fn test_uris() {
        let creds = issuer("s3cr3t").issue_at("alice", 3600, NOW).unwrap();
        assert_eq!(
            creds.uris,
            vec![
                "turn:turn.example.com:5349?transport=udp",
                "turn:turn.example.com:5349?transport=tcp",
                "turns:turn.example.com:5349?transport=tcp",
            ]
        );
    }

    #[test]
    fn test_uris_use_secure_port() {
        let uris = relay_uris("10.0.0.1", 3478, 443);
        assert_eq!(uris[0], "turn:10.0.0.1:3478?transport=udp");
        assert_eq!(uris[1], "turn:10.0.0.1:3478?transport=tcp");
        assert_eq!(uris[2], "turns:10.0.0.1:443?transport=tcp");
    }

    #[test]
    fn test_missing_secret_fails_closed() {
        let err = issuer("").issue_at("alice", 3600, NOW).unwrap_err();
        assert_eq!(err, IssueError::MissingSecret);
    }

    #[test]
    fn test_insecure_secret_when_allowed() {
        let issuer = CredentialIssuer::new(&TurnConfig {
            allow_insecure_secret: true,
            ..TurnConfig::default()
        });
        let creds = issuer.issue_at("alice", 3600, NOW).unwrap();
        assert_eq!(creds.password, "4+NcOw2o4sSZxF1Jh/Wir9Z9lAs=");
    }
}
