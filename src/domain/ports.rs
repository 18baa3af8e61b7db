use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::cookie::CookieOptions;
use crate::domain::errors::{CookieError, DispatchError, FingerprintError};
use crate::domain::views::{FingerprintResult, IncrementViewsResult};

// Port for cookie persistence. Cookie access is synchronous in a browser.
pub trait CookieStore: Send + Sync {
    fn get(&self, name: &str) -> Result<Option<String>, CookieError>;
    fn set(&self, name: &str, value: &str, options: &CookieOptions) -> Result<(), CookieError>;
    fn remove(&self, name: &str, path: &str) -> Result<(), CookieError>;
}

// Port for the fingerprinting library entry point. Loading is expensive.
#[async_trait]
pub trait FingerprintLoader: Send + Sync {
    async fn load(&self) -> Result<Arc<dyn FingerprintAgent>, FingerprintError>;
}

// A loaded fingerprint agent.
#[async_trait]
pub trait FingerprintAgent: Send + Sync {
    async fn get(&self) -> Result<FingerprintResult, FingerprintError>;
}

// Port for the backend view counter mutation.
#[async_trait]
pub trait ViewCounter: Send + Sync {
    async fn increment_views(
        &self,
        id: &str,
        identifier: &str,
    ) -> Result<IncrementViewsResult, DispatchError>;
}

// Port for retrieving the current time.
pub trait Clock: Send + Sync {
    fn now_epoch_seconds(&self) -> u64;
}
