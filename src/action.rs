//! Units of work consumed by the session worker.

use bytes::Bytes;

/// A unit of work submitted to the worker.
///
/// Actions are immutable once enqueued and are processed in strict FIFO
/// order; the worker never reorders or coalesces them. Callers submit the
/// first four variants through the session facade; the transport's delivery
/// callbacks submit the last two.
#[derive(Clone, Debug)]
pub enum Action {
    /// Establish a connection and begin the login handshake.
    LogIn {
        /// Nickname to present to the server.
        nickname: String,
        /// OAuth token used to authenticate.
        token: String,
    },
    /// Send a quit line and release the connection.
    LogOut {
        /// Reason carried in the quit line.
        farewell: String,
    },
    /// Request membership of a channel.
    Join {
        /// Channel to join.
        channel: String,
    },
    /// Send a chat line to a channel.
    SendMessage {
        /// Destination channel.
        channel: String,
        /// Chat text.
        text: String,
    },
    /// Raw bytes delivered by the transport.
    DataReceived(Bytes),
    /// The transport reported a server-initiated close.
    ServerDisconnected,
}
