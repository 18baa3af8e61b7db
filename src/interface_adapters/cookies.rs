use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::cookie::{CookieOptions, SameSite};
use crate::domain::errors::CookieError;
use crate::domain::ports::{Clock, CookieStore};

// Cookie record as kept by the jar and written to disk.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredCookie {
    value: String,
    path: String,
    same_site: SameSite,
    secure: bool,
    expires_at: u64,
}

type CookieTable = HashMap<String, StoredCookie>;

/// Cookie jar honoring expiry, optionally mirrored to a JSON file.
///
/// This plays the role of `document.cookie` for hosts that are not a browser.
#[derive(Clone)]
pub struct CookieJar<C> {
    cookies: Arc<Mutex<CookieTable>>,
    file: Option<PathBuf>,
    clock: C,
}

impl<C> CookieJar<C>
where
    C: Clock,
{
    pub fn in_memory(clock: C) -> Self {
        Self {
            cookies: Arc::new(Mutex::new(HashMap::new())),
            file: None,
            clock,
        }
    }

    /// Opens a file-backed jar. A missing file starts an empty jar.
    pub fn open(path: impl AsRef<Path>, clock: C) -> Result<Self, CookieError> {
        let path = path.as_ref().to_path_buf();
        let cookies = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<CookieTable>(&bytes)?,
            Err(err) if err.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err.into()),
        };
        tracing::debug!(path = %path.display(), cookies = cookies.len(), "cookie jar opened");

        Ok(Self {
            cookies: Arc::new(Mutex::new(cookies)),
            file: Some(path),
            clock,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, CookieTable>, CookieError> {
        self.cookies.lock().map_err(|_| CookieError::Poisoned)
    }

    fn flush(&self, cookies: &CookieTable) -> Result<(), CookieError> {
        let Some(path) = &self.file else {
            return Ok(());
        };
        // Write then rename so a crash never leaves a truncated jar behind.
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(cookies)?)?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl<C> CookieStore for CookieJar<C>
where
    C: Clock,
{
    fn get(&self, name: &str) -> Result<Option<String>, CookieError> {
        let now = self.clock.now_epoch_seconds();
        let mut cookies = self.lock()?;
        let expired = match cookies.get(name) {
            Some(cookie) if cookie.expires_at > now => return Ok(Some(cookie.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            cookies.remove(name);
        }
        Ok(None)
    }

    fn set(&self, name: &str, value: &str, options: &CookieOptions) -> Result<(), CookieError> {
        let expires_at = self.clock.now_epoch_seconds() + options.max_age.as_secs();
        let mut cookies = self.lock()?;
        // Only a table that reached disk becomes visible to readers.
        let mut candidate = cookies.clone();
        candidate.insert(
            name.to_string(),
            StoredCookie {
                value: value.to_string(),
                path: options.path.clone(),
                same_site: options.same_site,
                secure: options.secure,
                expires_at,
            },
        );
        self.flush(&candidate)?;
        *cookies = candidate;
        Ok(())
    }

    fn remove(&self, name: &str, path: &str) -> Result<(), CookieError> {
        let mut cookies = self.lock()?;
        if cookies.get(name).is_some_and(|cookie| cookie.path == path) {
            let mut candidate = cookies.clone();
            candidate.remove(name);
            self.flush(&candidate)?;
            *cookies = candidate;
        }
        Ok(())
    }
}
