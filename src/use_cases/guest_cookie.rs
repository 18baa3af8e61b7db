// Cookie-only guest identifiers, used where fingerprinting is unnecessary.

use crate::domain::cookie::CookieOptions;
use crate::domain::errors::CookieError;
use crate::domain::identity::{GUEST_COOKIE_NAME, GuestIdentifier, IdentifierOrigin};
use crate::domain::ports::CookieStore;

pub struct GuestCookie<S> {
    pub store: S,
    pub options: CookieOptions,
}

impl<S> GuestCookie<S>
where
    S: CookieStore,
{
    pub fn new(store: S, options: CookieOptions) -> Self {
        Self { store, options }
    }

    /// Returns the persisted identifier, if any. Empty values count as absent.
    pub fn get(&self) -> Result<Option<String>, CookieError> {
        Ok(self
            .store
            .get(GUEST_COOKIE_NAME)?
            .filter(|value| !value.is_empty()))
    }

    pub fn has(&self) -> Result<bool, CookieError> {
        Ok(self.get()?.is_some())
    }

    /// Returns the persisted identifier or creates and persists a random one.
    pub fn get_or_create(&self) -> Result<GuestIdentifier, CookieError> {
        if let Some(value) = self.get()? {
            return Ok(GuestIdentifier::new(value, IdentifierOrigin::Persisted));
        }
        let identifier = GuestIdentifier::fallback();
        self.persist(identifier.as_str())?;
        Ok(identifier)
    }

    /// Drops the current identifier and creates a new one.
    pub fn refresh(&self) -> Result<GuestIdentifier, CookieError> {
        self.clear()?;
        self.get_or_create()
    }

    pub fn clear(&self) -> Result<(), CookieError> {
        self.store.remove(GUEST_COOKIE_NAME, &self.options.path)
    }

    pub fn persist(&self, value: &str) -> Result<(), CookieError> {
        self.store.set(GUEST_COOKIE_NAME, value, &self.options)
    }
}
