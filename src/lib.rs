//! Session core for a text-line-oriented, IRC-derived chat service.
//!
//! This crate owns the lifecycle of a single logical chat session: connect,
//! authenticate, join channels, exchange chat lines, disconnect. All
//! session-affecting operations are serialized onto one background worker
//! task; callers and the transport's delivery callbacks only ever enqueue
//! [`Action`]s. The transport itself and the wall clock are pluggable
//! collaborators ([`Connection`], [`Clock`]), so the core performs no I/O
//! and no system-time reads of its own.
//!
//! Construct a session with [`Session::builder`], registering a connection
//! factory and the callbacks to observe login, logout, joins, and chat
//! messages; outcomes are reported exclusively through those callbacks.

pub mod action;
pub mod clock;
pub mod codec;
pub mod connection;
pub mod error;
pub mod hooks;
pub mod message;
pub mod session;
pub mod timeout;
mod worker;

pub use action::Action;
pub use clock::{Clock, SharedClock, TokioClock};
pub use codec::{LINE_TERMINATOR, LineCodec};
pub use connection::{
    Connection,
    ConnectionFactory,
    DisconnectedCallback,
    MessageReceivedCallback,
};
pub use error::SessionError;
pub use hooks::SessionHooks;
pub use message::{Message, RPL_ENDOFMOTD};
pub use session::{Session, SessionBuilder};
pub use worker::LOGIN_TIMEOUT_SECS;
