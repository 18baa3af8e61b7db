use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::errors::{FingerprintError, ResolveError};
use crate::domain::identity::{GuestIdentifier, IdentifierOrigin, is_valid_fingerprint};
use crate::domain::ports::CookieStore;
use crate::use_cases::fingerprint_cache::FingerprintCache;
use crate::use_cases::guest_cookie::GuestCookie;

/// Where the resolver is running. Fingerprinting needs browser APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    Browser,
    Server,
}

/// Resolves a stable anonymous identifier for the current browser.
///
/// Lookup order is the `guest_id` cookie, then a device fingerprint, then a
/// random fallback. Whatever is produced gets written back to the cookie so
/// later calls take the cookie path. Creation is serialized per resolver, so
/// concurrent callers that all miss the cookie end up with one identifier.
pub struct GuestIdentifierResolver<S> {
    pub context: ExecutionContext,
    pub cookie: GuestCookie<S>,
    pub fingerprints: Arc<FingerprintCache>,
    // Held across the miss -> create -> persist sequence.
    create_lock: Mutex<()>,
}

impl<S> GuestIdentifierResolver<S>
where
    S: CookieStore,
{
    pub fn new(
        context: ExecutionContext,
        cookie: GuestCookie<S>,
        fingerprints: Arc<FingerprintCache>,
    ) -> Self {
        Self {
            context,
            cookie,
            fingerprints,
            create_lock: Mutex::new(()),
        }
    }

    pub async fn resolve(&self) -> Result<GuestIdentifier, ResolveError> {
        if self.context != ExecutionContext::Browser {
            return Err(ResolveError::Environment);
        }

        // Fast path: a persisted identifier wins and skips fingerprinting.
        if let Some(identifier) = self.persisted() {
            return Ok(identifier);
        }

        let _guard = self.create_lock.lock().await;
        // Another caller may have created the identifier while we waited.
        if let Some(identifier) = self.persisted() {
            return Ok(identifier);
        }

        let identifier = match self.fingerprint().await {
            Ok(visitor_id) => GuestIdentifier::new(visitor_id, IdentifierOrigin::Fingerprint),
            Err(err) => {
                tracing::warn!(error = %err, "fingerprint unavailable, using fallback identifier");
                GuestIdentifier::fallback()
            }
        };

        if let Err(err) = self.cookie.persist(identifier.as_str()) {
            tracing::warn!(error = %err, "failed to persist guest cookie");
        }
        tracing::debug!(origin = ?identifier.origin, "guest identifier created");

        Ok(identifier)
    }

    fn persisted(&self) -> Option<GuestIdentifier> {
        match self.cookie.get() {
            Ok(value) => value.map(|value| GuestIdentifier::new(value, IdentifierOrigin::Persisted)),
            Err(err) => {
                tracing::warn!(error = %err, "failed to read guest cookie");
                None
            }
        }
    }

    async fn fingerprint(&self) -> Result<String, FingerprintError> {
        let agent = self.fingerprints.agent().await?;
        let result = agent.get().await?;
        if !is_valid_fingerprint(&result.visitor_id) {
            return Err(FingerprintError::Malformed(result.visitor_id));
        }
        Ok(result.visitor_id)
    }
}
