//! Request validation shared by every credential entry path
//!
//! Rules are checked in order and the first violation is reported.

use thiserror::Error;

use crate::config::TtlBounds;

pub const MAX_IDENTITY_LENGTH: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("empty identity")]
    EmptyIdentity,

    #[error("identity too long")]
    IdentityTooLong,

    #[error("invalid characters")]
    InvalidCharacters,

    #[error("ttl out of range")]
    TtlOutOfRange { min: u64, max: u64 },
}

impl ValidationError {
    /// Request field the violated rule applies to.
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::TtlOutOfRange { .. } => "ttl",
            _ => "username",
        }
    }
}

/// An identity and TTL that passed every rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRequest {
    pub identity: String,
    pub ttl: u64,
}

pub fn validate_identity(identity: &str) -> Result<(), ValidationError> {
    if identity.trim().is_empty() {
        return Err(ValidationError::EmptyIdentity);
    }
    if identity.chars().count() > MAX_IDENTITY_LENGTH {
        return Err(ValidationError::IdentityTooLong);
    }
    if !identity.chars().all(is_identity_char) {
        return Err(ValidationError::InvalidCharacters);
    }
    Ok(())
}

/// Resolve the effective TTL. `ttl` is signed so that negative input is
/// reported as out of range rather than as a decoding failure.
pub fn validate_ttl(ttl: Option<i64>, bounds: TtlBounds) -> Result<u64, ValidationError> {
    let Some(ttl) = ttl else {
        return Ok(bounds.default);
    };

    match u64::try_from(ttl) {
        Ok(ttl) if (bounds.min..=bounds.max).contains(&ttl) => Ok(ttl),
        _ => Err(ValidationError::TtlOutOfRange {
            min: bounds.min,
            max: bounds.max,
        }),
    }
}

pub fn validate_request(
    identity: &str,
    ttl: Option<i64>,
    bounds: TtlBounds,
) -> Result<ValidRequest, ValidationError> {
    validate_identity(identity)?;
    let ttl = validate_ttl(ttl, bounds)?;
    Ok(ValidRequest {
        identity: identity.to_string(),
        ttl,
    })
}

fn is_identity_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')
}
