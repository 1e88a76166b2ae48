//! Transport collaborator interface.
//!
//! The core never opens sockets itself. A [`Connection`] represents one live
//! link to the chat server, provided by the embedding application through a
//! [`ConnectionFactory`]; the worker drives its lifecycle and registers the
//! delivery callbacks that feed received bytes and disconnect notifications
//! back into the action queue.

/// Bytes-delivery callback registered against a connection.
///
/// May run on a transport-owned thread; registered implementations only hand
/// the bytes over to the action queue, never touch session state.
pub type MessageReceivedCallback = Box<dyn FnMut(&[u8]) + Send>;

/// Disconnect-notification callback registered against a connection.
///
/// Same threading rules as [`MessageReceivedCallback`].
pub type DisconnectedCallback = Box<dyn FnMut() + Send>;

/// Factory producing a fresh connection for each login attempt.
pub type ConnectionFactory = Box<dyn FnMut() -> Box<dyn Connection> + Send>;

/// One link to the chat server.
///
/// Implementations own the actual transport (TCP, TLS, an in-memory pipe in
/// tests); the session core only calls this interface.
pub trait Connection: Send {
    /// Establish the connection.
    ///
    /// Synchronous: the attempt has succeeded or failed by the time the call
    /// returns.
    fn connect(&mut self) -> bool;

    /// Close the connection and release transport resources.
    fn disconnect(&mut self);

    /// Queue `text` for transmission.
    ///
    /// Fire-and-forget: the text may or may not have been sent when the call
    /// returns. `text` is a complete wire line including its terminator.
    fn send(&mut self, text: &str);

    /// Register the callback invoked with bytes received from the server.
    fn set_message_received_callback(&mut self, callback: MessageReceivedCallback);

    /// Register the callback invoked when the server closes the connection.
    fn set_disconnected_callback(&mut self, callback: DisconnectedCallback);
}
