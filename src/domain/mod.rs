// Domain layer: entities, errors and the ports the use cases depend on.

pub mod cookie;
pub mod errors;
pub mod identity;
pub mod ports;
pub mod views;

// Re-export the domain boundary types and ports.
pub use cookie::{CookieOptions, SameSite};
pub use errors::{
    ConfigError, CookieError, DispatchError, FingerprintError, ResolveError, TrackingError,
};
pub use identity::{GuestIdentifier, IdentifierOrigin};
pub use ports::{Clock, CookieStore, FingerprintAgent, FingerprintLoader, ViewCounter};
pub use views::{FingerprintResult, IncrementViewsResult, ViewCount};
