// Interface adapters: backend client, cookie storage and device fingerprinting.

pub mod clients;
pub mod clock;
pub mod cookies;
pub mod fingerprint;
