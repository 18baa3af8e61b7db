use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Cookie name the guest identifier is persisted under.
pub const GUEST_COOKIE_NAME: &str = "guest_id";

// Prefix marking identifiers produced from local randomness.
const FALLBACK_PREFIX: &str = "guest_";
// Fingerprints shorter than this are treated as a broken fingerprinting API.
const MIN_FINGERPRINT_LEN: usize = 20;

/// Where a guest identifier came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentifierOrigin {
    /// Computed by the fingerprinting subsystem on this call.
    Fingerprint,
    /// Generated locally because fingerprinting failed.
    FallbackRandom,
    /// Read back from the cookie; the original origin is not recorded.
    Persisted,
}

/// Anonymous token identifying a browser/device without a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestIdentifier {
    pub value: String,
    pub origin: IdentifierOrigin,
}

impl GuestIdentifier {
    pub fn new(value: impl Into<String>, origin: IdentifierOrigin) -> Self {
        Self {
            value: value.into(),
            origin,
        }
    }

    /// Generates a fresh random identifier. Never fails and performs no I/O.
    pub fn fallback() -> Self {
        Self::new(new_fallback_value(), IdentifierOrigin::FallbackRandom)
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for GuestIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Builds a `guest_<32 hex>` token from a v4 UUID.
pub fn new_fallback_value() -> String {
    format!("{FALLBACK_PREFIX}{}", Uuid::new_v4().simple())
}

/// Returns true if `value` has the shape produced by [`new_fallback_value`].
pub fn is_fallback_identifier(value: &str) -> bool {
    match value.strip_prefix(FALLBACK_PREFIX) {
        Some(rest) => {
            rest.len() == 32
                && rest
                    .chars()
                    .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        }
        None => false,
    }
}

/// Shape check for fingerprint visitor ids: ASCII alphanumeric, at least 20 chars.
pub fn is_valid_fingerprint(value: &str) -> bool {
    value.len() >= MIN_FINGERPRINT_LEN && value.chars().all(|c| c.is_ascii_alphanumeric())
}
