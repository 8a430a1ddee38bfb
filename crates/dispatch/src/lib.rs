//! Outbound message dispatch: one validated request in, one protocol send
//! call out, with an upload step first for media kinds.

pub mod dispatcher;
pub mod jid;
pub mod request;

pub use dispatcher::{DispatchError, Dispatcher};
pub use jid::to_jid;
pub use request::OutboundRequest;
