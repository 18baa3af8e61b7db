use thiserror::Error;

// Errors returned by guest identifier resolution.
#[derive(Debug, Error)]
pub enum ResolveError {
    // The caller is not running in a browser-capable context.
    #[error("guest identifier requested outside a browser context")]
    Environment,
}

// Fingerprinting failures. Always recovered by the resolver.
#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("fingerprint agent failed to load: {0}")]
    Load(String),
    #[error("fingerprint computation failed: {0}")]
    Compute(String),
    #[error("fingerprint has an unexpected shape: {0:?}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum CookieError {
    #[error("cookie store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("cookie store encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("cookie store lock poisoned")]
    Poisoned,
}

// Failures of the increment-views mutation.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("views transport error: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("views upstream error {status}")]
    Upstream { status: reqwest::StatusCode },
    #[error("views response decode error: {0}")]
    Decode(#[source] reqwest::Error),
    #[error("graphql error: {0}")]
    GraphQl(String),
    #[error("views mutation rejected: {0}")]
    Rejected(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

// Anything that ends a view-tracking attempt early. Logged, never surfaced.
#[derive(Debug, Error)]
pub enum TrackingError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}
