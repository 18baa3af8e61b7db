use serde::{Deserialize, Serialize};
use std::time::Duration;

// Guest identifiers live for a year unless cleared.
pub const GUEST_COOKIE_MAX_AGE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

/// Attributes applied when a cookie is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieOptions {
    pub max_age: Duration,
    pub same_site: SameSite,
    pub secure: bool,
    pub path: String,
}

impl CookieOptions {
    /// Settings used for the guest identifier cookie.
    pub fn guest(production: bool) -> Self {
        Self {
            max_age: GUEST_COOKIE_MAX_AGE,
            same_site: SameSite::Lax,
            secure: production,
            path: "/".to_string(),
        }
    }

    /// Renders a `Set-Cookie` header value for `name=value` with these attributes.
    pub fn to_set_cookie(&self, name: &str, value: &str) -> String {
        let mut header = format!(
            "{name}={value}; Max-Age={}; Path={}; SameSite={}",
            self.max_age.as_secs(),
            self.path,
            self.same_site.as_str()
        );
        if self.secure {
            header.push_str("; Secure");
        }
        header
    }
}
