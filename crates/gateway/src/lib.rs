//! HTTP boundary: bearer-token auth, per-route validation, orchestration of
//! staging + dispatch, response mapping.
//!
//! Lifecycle:
//! 1. Session bootstrap reaches `Connected` (handled upstream)
//! 2. Build router with global auth middleware
//! 3. Serve until the process receives a termination signal
//!
//! Callers only ever see 200 success, 400 bad input, 401 unauthorized, or
//! 500 internal failure; error detail goes to logs.

pub mod auth;
pub mod routes;
pub mod server;
pub mod state;

pub use state::GatewayState;
