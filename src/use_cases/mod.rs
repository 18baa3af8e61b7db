// Use cases: guest identity resolution and view tracking.

pub mod fingerprint_cache;
pub mod guest_cookie;
pub mod resolve_guest;
pub mod view_tracker;

#[cfg(test)]
pub(crate) mod test_support;

pub use fingerprint_cache::FingerprintCache;
pub use guest_cookie::GuestCookie;
pub use resolve_guest::{ExecutionContext, GuestIdentifierResolver};
pub use view_tracker::{TrackerSettings, TrackerState, ViewTracker};
