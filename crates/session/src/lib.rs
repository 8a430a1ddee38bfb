//! Session bootstrap: drive the messaging backend from process start to a
//! usable connection.
//!
//! Two paths: first-time pairing over a QR channel, or restoring a persisted
//! device session. Either way the HTTP gateway must not start accepting
//! calls before the machine reaches `Connected`, and every failure here is
//! fatal to startup — an operator rescans or restarts.

pub mod bootstrap;
pub mod machine;
pub mod qr;

pub use bootstrap::{BootstrapError, Bootstrapper};
pub use machine::{BootstrapState, FailureReason};
