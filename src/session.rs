//! Thread-safe entry point owning the worker's lifetime.
//!
//! [`Session`] is the public facade. Mutating operations are pure
//! submission: they enqueue an action for the worker and return immediately,
//! performing no I/O and never failing synchronously. Spawning via
//! [`SessionBuilder::spawn`] starts the worker; [`Session::shutdown`] stops
//! it gracefully, letting the current cycle finish.

use std::sync::Arc;

use tokio::{sync::mpsc, task::JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::{
    action::Action,
    clock::{Clock, SharedClock, TokioClock},
    connection::{Connection, ConnectionFactory},
    error::SessionError,
    hooks::SessionHooks,
    worker::SessionWorker,
};

/// Configures and spawns a [`Session`].
pub struct SessionBuilder {
    factory: Option<ConnectionFactory>,
    clock: SharedClock,
    hooks: SessionHooks,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            factory: None,
            clock: Arc::new(TokioClock::new()),
            hooks: SessionHooks::default(),
        }
    }

    /// Provide the factory used to create a connection per login attempt.
    #[must_use]
    pub fn connection_factory<F>(mut self, factory: F) -> Self
    where
        F: FnMut() -> Box<dyn Connection> + Send + 'static,
    {
        self.factory = Some(Box::new(factory));
        self
    }

    /// Replace the default runtime-anchored clock.
    #[must_use]
    pub fn clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Register the login-succeeded callback.
    #[must_use]
    pub fn on_login<H>(mut self, hook: H) -> Self
    where
        H: FnMut() + Send + 'static,
    {
        self.hooks.on_login = Some(Box::new(hook));
        self
    }

    /// Register the logged-out callback.
    #[must_use]
    pub fn on_logout<H>(mut self, hook: H) -> Self
    where
        H: FnMut() + Send + 'static,
    {
        self.hooks.on_logout = Some(Box::new(hook));
        self
    }

    /// Register the channel-joined callback `(channel, user)`.
    #[must_use]
    pub fn on_join<H>(mut self, hook: H) -> Self
    where
        H: FnMut(&str, &str) + Send + 'static,
    {
        self.hooks.on_join = Some(Box::new(hook));
        self
    }

    /// Register the chat-message callback `(channel, user, text)`.
    #[must_use]
    pub fn on_message<H>(mut self, hook: H) -> Self
    where
        H: FnMut(&str, &str, &str) + Send + 'static,
    {
        self.hooks.on_message = Some(Box::new(hook));
        self
    }

    /// Start the session worker and return the facade handle.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingConnectionFactory`] when no connection
    /// factory was provided.
    pub fn spawn(self) -> Result<Session, SessionError> {
        let factory = self.factory.ok_or(SessionError::MissingConnectionFactory)?;
        let (queue, actions) = mpsc::unbounded_channel();
        let shutdown = CancellationToken::new();
        let worker = SessionWorker::new(
            actions,
            queue.clone(),
            shutdown.clone(),
            factory,
            self.clock,
            self.hooks,
        );
        let handle = tokio::spawn(worker.run());
        Ok(Session {
            queue,
            shutdown,
            worker: Some(handle),
        })
    }
}

/// Facade for one logical chat session.
///
/// Cheap to share behind a reference from any thread; every method only
/// enqueues work for the worker task.
pub struct Session {
    queue: mpsc::UnboundedSender<Action>,
    shutdown: CancellationToken,
    worker: Option<JoinHandle<()>>,
}

impl Session {
    /// Start configuring a new session.
    #[must_use]
    pub fn builder() -> SessionBuilder { SessionBuilder::new() }

    /// Begin logging in with the given nickname and OAuth token.
    ///
    /// A no-op when a login is already in flight or established.
    pub fn log_in(&self, nickname: impl Into<String>, token: impl Into<String>) {
        self.submit(Action::LogIn {
            nickname: nickname.into(),
            token: token.into(),
        });
    }

    /// Log out, sending `farewell` as the quit reason.
    ///
    /// A no-op when no connection exists.
    pub fn log_out(&self, farewell: impl Into<String>) {
        self.submit(Action::LogOut {
            farewell: farewell.into(),
        });
    }

    /// Request membership of `channel`.
    pub fn join(&self, channel: impl Into<String>) {
        self.submit(Action::Join {
            channel: channel.into(),
        });
    }

    /// Send a chat line to `channel`.
    pub fn send_message(&self, channel: impl Into<String>, text: impl Into<String>) {
        self.submit(Action::SendMessage {
            channel: channel.into(),
            text: text.into(),
        });
    }

    fn submit(&self, action: Action) {
        if self.queue.send(action).is_err() {
            trace!("session worker already stopped; dropping action");
        }
    }

    /// Stop the worker and wait for it to finish its current cycle.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::WorkerPanicked`] when the worker task did not
    /// exit cleanly.
    pub async fn shutdown(mut self) -> Result<(), SessionError> {
        self.shutdown.cancel();
        match self.worker.take() {
            Some(handle) => handle.await.map_err(|_| SessionError::WorkerPanicked),
            None => Ok(()),
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // Signal the worker even when the caller skipped `shutdown`; the
        // detached task finishes its current cycle and exits.
        self.shutdown.cancel();
    }
}
