// Lazily loaded fingerprint agent shared by every resolver in the process.

use std::sync::{Arc, OnceLock};
use tokio::sync::OnceCell;

use crate::domain::errors::FingerprintError;
use crate::domain::ports::{FingerprintAgent, FingerprintLoader};

/// Runs the fingerprint loader at most once and hands out the loaded agent.
///
/// Concurrent callers wait on the same initialization. A failed load is not
/// cached, so the next caller tries again.
pub struct FingerprintCache {
    loader: Arc<dyn FingerprintLoader>,
    agent: OnceCell<Arc<dyn FingerprintAgent>>,
}

impl FingerprintCache {
    pub fn new(loader: Arc<dyn FingerprintLoader>) -> Self {
        Self {
            loader,
            agent: OnceCell::new(),
        }
    }

    /// Process-wide cache. The loader passed by the first caller wins.
    pub fn global<F>(make_loader: F) -> Arc<FingerprintCache>
    where
        F: FnOnce() -> Arc<dyn FingerprintLoader>,
    {
        static GLOBAL: OnceLock<Arc<FingerprintCache>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(FingerprintCache::new(make_loader())))
            .clone()
    }

    pub async fn agent(&self) -> Result<Arc<dyn FingerprintAgent>, FingerprintError> {
        let agent = self
            .agent
            .get_or_try_init(|| async {
                tracing::debug!("loading fingerprint agent");
                self.loader.load().await
            })
            .await?;
        Ok(agent.clone())
    }

    pub fn is_loaded(&self) -> bool {
        self.agent.initialized()
    }
}
