//! Access-token claims, the opaque token value, and registry records.

pub mod claims;
pub mod record;
pub mod secret;
