//! Messaging backend and session store contracts.
//!
//! The wire protocol, its cryptography, and durable device-identity internals
//! live behind these traits. The rest of the workspace only calls the
//! operations declared here: connect, pairing channel, upload, send,
//! disconnect, and first-device lookup.

pub mod backend;
pub mod noop;
pub mod store;

pub use backend::{
    BackendError, MediaKind, MessagingBackend, OutboundPayload, PairingEvent, UploadedMedia,
};
pub use noop::NoopBackend;
pub use store::{DeviceSession, SessionStore, SledSessionStore};
