/// Session claims forwarded by the identity gateway
pub mod auth;
/// Domain error to HTTP response mapping
pub mod error_handling;
