//! Caller-supplied session callbacks.
//!
//! [`SessionHooks`] stores the optional callbacks fired by the worker as the
//! session changes state. Unset hooks are skipped. All outcomes of session
//! operations are observed through these hooks; no error crosses the worker
//! boundary back to the caller.

/// Type alias for the login-succeeded callback.
pub type LoginHook = Box<dyn FnMut() + Send>;

/// Type alias for the logged-out callback.
///
/// Fired for voluntary logout, server-initiated disconnect, login timeout,
/// and failed connection attempts alike.
pub type LogoutHook = Box<dyn FnMut() + Send>;

/// Type alias for the channel-joined callback: `(channel, user)`.
pub type JoinHook = Box<dyn FnMut(&str, &str) + Send>;

/// Type alias for the chat-message callback: `(channel, user, text)`.
pub type MessageHook = Box<dyn FnMut(&str, &str, &str) + Send>;

/// Callbacks fired by the session worker.
#[derive(Default)]
pub struct SessionHooks {
    /// Invoked once when the login handshake completes.
    pub(crate) on_login: Option<LoginHook>,
    /// Invoked whenever the session returns to the idle state.
    pub(crate) on_logout: Option<LogoutHook>,
    /// Invoked when a user joins a channel.
    pub(crate) on_join: Option<JoinHook>,
    /// Invoked when a chat message arrives.
    pub(crate) on_message: Option<MessageHook>,
}

impl SessionHooks {
    /// Run the login-succeeded hook if registered.
    pub(crate) fn login(&mut self) {
        if let Some(hook) = &mut self.on_login {
            hook();
        }
    }

    /// Run the logged-out hook if registered.
    pub(crate) fn logout(&mut self) {
        if let Some(hook) = &mut self.on_logout {
            hook();
        }
    }

    /// Run the channel-joined hook if registered.
    pub(crate) fn join(&mut self, channel: &str, user: &str) {
        if let Some(hook) = &mut self.on_join {
            hook(channel, user);
        }
    }

    /// Run the chat-message hook if registered.
    pub(crate) fn message(&mut self, channel: &str, user: &str, text: &str) {
        if let Some(hook) = &mut self.on_message {
            hook(channel, user, text);
        }
    }
}
