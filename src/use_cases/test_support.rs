use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::cookie::CookieOptions;
use crate::domain::errors::{CookieError, DispatchError, FingerprintError};
use crate::domain::ports::{CookieStore, FingerprintAgent, FingerprintLoader, ViewCounter};
use crate::domain::views::{FingerprintResult, IncrementViewsResult, ViewCount};

pub(crate) const VALID_FINGERPRINT: &str = "a1b2c3d4e5f6a7b8c9d0e1f2";

pub(crate) type CookieTable = Arc<Mutex<HashMap<String, (String, CookieOptions)>>>;

#[derive(Clone, Copy, Default)]
pub(crate) struct CookieFailures {
    pub get: bool,
    pub set: bool,
}

// Cookie store that keeps every write so tests can inspect attributes.
#[derive(Clone)]
pub(crate) struct RecordingCookieJar {
    cookies: CookieTable,
    writes: Arc<AtomicUsize>,
    failures: CookieFailures,
}

impl RecordingCookieJar {
    pub(crate) fn new() -> Self {
        Self {
            cookies: Arc::new(Mutex::new(HashMap::new())),
            writes: Arc::new(AtomicUsize::new(0)),
            failures: CookieFailures::default(),
        }
    }

    pub(crate) fn with_failures(mut self, failures: CookieFailures) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn seed(&self, name: &str, value: &str) {
        let mut guard = self.cookies.lock().expect("cookies mutex poisoned");
        guard.insert(name.to_string(), (value.to_string(), CookieOptions::guest(false)));
    }

    pub(crate) fn stored(&self, name: &str) -> Option<(String, CookieOptions)> {
        let guard = self.cookies.lock().expect("cookies mutex poisoned");
        guard.get(name).cloned()
    }

    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl CookieStore for RecordingCookieJar {
    fn get(&self, name: &str) -> Result<Option<String>, CookieError> {
        if self.failures.get {
            return Err(CookieError::Poisoned);
        }
        let guard = self.cookies.lock().expect("cookies mutex poisoned");
        Ok(guard.get(name).map(|(value, _)| value.clone()))
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) -> Result<(), CookieError> {
        if self.failures.set {
            return Err(CookieError::Poisoned);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.cookies.lock().expect("cookies mutex poisoned");
        guard.insert(name.to_string(), (value.to_string(), options.clone()));
        Ok(())
    }

    fn remove(&self, name: &str, _path: &str) -> Result<(), CookieError> {
        let mut guard = self.cookies.lock().expect("cookies mutex poisoned");
        guard.remove(name);
        Ok(())
    }
}

#[derive(Clone)]
pub(crate) enum FingerprintBehavior {
    Returns(String),
    FailLoad,
    FailGet,
}

impl FingerprintBehavior {
    pub(crate) fn valid() -> Self {
        FingerprintBehavior::Returns(VALID_FINGERPRINT.to_string())
    }
}

// Fingerprinter double that counts loads and agent calls.
#[derive(Clone)]
pub(crate) struct StubFingerprinter {
    behavior: FingerprintBehavior,
    loads: Arc<AtomicUsize>,
    gets: Arc<AtomicUsize>,
}

impl StubFingerprinter {
    pub(crate) fn new(behavior: FingerprintBehavior) -> Self {
        Self {
            behavior,
            loads: Arc::new(AtomicUsize::new(0)),
            gets: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn load_calls(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub(crate) fn get_calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FingerprintLoader for StubFingerprinter {
    async fn load(&self) -> Result<Arc<dyn FingerprintAgent>, FingerprintError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        // Let racing callers pile up on the cell before the load finishes.
        tokio::task::yield_now().await;
        if matches!(self.behavior, FingerprintBehavior::FailLoad) {
            return Err(FingerprintError::Load("script blocked".to_string()));
        }
        Ok(Arc::new(self.clone()))
    }
}

#[async_trait]
impl FingerprintAgent for StubFingerprinter {
    async fn get(&self) -> Result<FingerprintResult, FingerprintError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            FingerprintBehavior::Returns(visitor_id) => Ok(FingerprintResult {
                visitor_id: visitor_id.clone(),
                confidence: 0.9,
            }),
            FingerprintBehavior::FailGet | FingerprintBehavior::FailLoad => {
                Err(FingerprintError::Compute("canvas unavailable".to_string()))
            }
        }
    }
}

// View counter double recording every (id, identifier) pair it receives.
#[derive(Clone, Default)]
pub(crate) struct RecordingViewCounter {
    calls: Arc<Mutex<Vec<(String, String)>>>,
    should_fail: bool,
}

impl RecordingViewCounter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub(crate) fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }
}

#[async_trait]
impl ViewCounter for RecordingViewCounter {
    async fn increment_views(
        &self,
        id: &str,
        identifier: &str,
    ) -> Result<IncrementViewsResult, DispatchError> {
        let views = {
            let mut guard = self.calls.lock().expect("calls mutex poisoned");
            guard.push((id.to_string(), identifier.to_string()));
            guard.len() as u64
        };
        if self.should_fail {
            return Err(DispatchError::GraphQl("internal server error".to_string()));
        }
        Ok(IncrementViewsResult {
            success: true,
            message: None,
            data: Some(ViewCount {
                id: id.to_string(),
                views,
            }),
        })
    }
}
