//! Canonical error type for the crate.
//!
//! Session-affecting operations report their outcomes through the registered
//! hooks, never through return values; the only fallible public surface is
//! session construction and shutdown.

/// Errors surfaced by session construction and shutdown.
#[derive(Debug)]
pub enum SessionError {
    /// The builder was finalized without a connection factory.
    MissingConnectionFactory,
    /// The worker task panicked before shutdown completed.
    WorkerPanicked,
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingConnectionFactory => {
                write!(f, "a connection factory is required before spawning a session")
            }
            Self::WorkerPanicked => write!(f, "the session worker panicked"),
        }
    }
}

impl std::error::Error for SessionError {}
