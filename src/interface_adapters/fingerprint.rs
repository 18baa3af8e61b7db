use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::errors::FingerprintError;
use crate::domain::ports::{FingerprintAgent, FingerprintLoader};
use crate::domain::views::FingerprintResult;

/// Device signals that feed the fingerprint hash.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceAttributes {
    pub user_agent: String,
    pub language: String,
    pub platform: String,
    pub timezone: String,
    pub screen: Option<(u32, u32)>,
    pub hardware_concurrency: Option<usize>,
}

impl DeviceAttributes {
    /// Collects what the host process can see about the device.
    pub fn from_host() -> Self {
        Self {
            user_agent: format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
            language: std::env::var("LANG").unwrap_or_default(),
            platform: format!("{}-{}", std::env::consts::OS, std::env::consts::ARCH),
            timezone: std::env::var("TZ").unwrap_or_default(),
            screen: None,
            hardware_concurrency: std::thread::available_parallelism()
                .ok()
                .map(|n| n.get()),
        }
    }

    // Share of signals that carry a value; used as the agent's confidence.
    fn coverage(&self) -> f32 {
        let present = [
            !self.user_agent.is_empty(),
            !self.language.is_empty(),
            !self.platform.is_empty(),
            !self.timezone.is_empty(),
            self.screen.is_some(),
            self.hardware_concurrency.is_some(),
        ];
        present.iter().filter(|p| **p).count() as f32 / present.len() as f32
    }
}

/// Fingerprinter that hashes [`DeviceAttributes`] with BLAKE3.
#[derive(Debug, Clone)]
pub struct AttributeFingerprinter {
    attributes: DeviceAttributes,
}

impl AttributeFingerprinter {
    pub fn new(attributes: DeviceAttributes) -> Self {
        Self { attributes }
    }
}

#[async_trait]
impl FingerprintLoader for AttributeFingerprinter {
    async fn load(&self) -> Result<Arc<dyn FingerprintAgent>, FingerprintError> {
        if self.attributes == DeviceAttributes::default() {
            return Err(FingerprintError::Load("no device attributes available".to_string()));
        }
        // Canonical encoding is computed once per load and reused by get().
        let canonical = serde_json::to_vec(&self.attributes)
            .map_err(|e| FingerprintError::Load(e.to_string()))?;
        Ok(Arc::new(AttributeAgent {
            canonical,
            confidence: self.attributes.coverage(),
        }))
    }
}

struct AttributeAgent {
    canonical: Vec<u8>,
    confidence: f32,
}

#[async_trait]
impl FingerprintAgent for AttributeAgent {
    async fn get(&self) -> Result<FingerprintResult, FingerprintError> {
        let digest = blake3::hash(&self.canonical);
        Ok(FingerprintResult {
            visitor_id: digest.to_hex().to_string(),
            confidence: self.confidence,
        })
    }
}
