//! The single-task state machine that owns the live session.
//!
//! All session-mutating logic runs here, serialized on one tokio task. The
//! facade and the transport's delivery callbacks only ever enqueue actions;
//! the worker polls expired timeouts, drains the queue in FIFO order,
//! applies parsed messages to session state, and fires the registered
//! hooks. It blocks only while waiting for the next action or the nearest
//! pending deadline, never on transport I/O.

use std::{collections::HashSet, time::Duration};

use bytes::{Bytes, BytesMut};
use tokio::sync::mpsc;
use tokio_util::{
    codec::{Decoder, Encoder},
    sync::CancellationToken,
};
use tracing::{debug, trace, warn};

use crate::{
    action::Action,
    clock::SharedClock,
    codec::LineCodec,
    connection::{Connection, ConnectionFactory},
    hooks::SessionHooks,
    message::{Message, RPL_ENDOFMOTD},
    timeout::{PendingTimeouts, TimeoutKind},
};

/// Seconds allowed between sending credentials and the end-of-MOTD numeric.
pub const LOGIN_TIMEOUT_SECS: f64 = 5.0;

/// Farewell carried in the quit line when the login handshake times out.
pub(crate) const LOGIN_TIMEOUT_FAREWELL: &str = "Timeout waiting for login completion";

/// Authentication progress of the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoginState {
    /// No connection; nothing in flight.
    Idle,
    /// Credentials sent, awaiting the end-of-MOTD numeric.
    LoggingIn,
    /// Handshake complete; the session is usable.
    LoggedIn,
}

/// The background state machine driving one logical session.
pub(crate) struct SessionWorker {
    actions: mpsc::UnboundedReceiver<Action>,
    /// Sender cloned into transport delivery callbacks, so received bytes
    /// and disconnects re-enter as queued actions.
    queue: mpsc::UnboundedSender<Action>,
    shutdown: CancellationToken,
    factory: ConnectionFactory,
    clock: SharedClock,
    hooks: SessionHooks,
    state: LoginState,
    connection: Option<Box<dyn Connection>>,
    nickname: String,
    channels: HashSet<String>,
    recv_buf: BytesMut,
    codec: LineCodec,
    timeouts: PendingTimeouts,
}

impl SessionWorker {
    pub(crate) fn new(
        actions: mpsc::UnboundedReceiver<Action>,
        queue: mpsc::UnboundedSender<Action>,
        shutdown: CancellationToken,
        factory: ConnectionFactory,
        clock: SharedClock,
        hooks: SessionHooks,
    ) -> Self {
        Self {
            actions,
            queue,
            shutdown,
            factory,
            clock,
            hooks,
            state: LoginState::Idle,
            connection: None,
            nickname: String::new(),
            channels: HashSet::new(),
            recv_buf: BytesMut::new(),
            codec: LineCodec::default(),
            timeouts: PendingTimeouts::new(),
        }
    }

    /// Drive the worker until shutdown is requested.
    ///
    /// Each cycle runs in a fixed order: poll timeouts, drain all currently
    /// queued actions, then sleep until the next action or the nearest
    /// deadline. An action runs to completion before the next is dequeued.
    pub(crate) async fn run(mut self) {
        loop {
            self.fire_expired_timeouts();
            self.drain_queued_actions();

            let wait = self.next_deadline_delay();
            tokio::select! {
                biased;

                () = self.shutdown.cancelled() => break,

                action = self.actions.recv() => match action {
                    Some(action) => self.handle_action(action),
                    None => break,
                },

                () = Self::sleep(wait) => {}
            }
        }
        debug!("session worker stopping");
    }

    async fn sleep(wait: Option<Duration>) {
        match wait {
            Some(delay) => tokio::time::sleep(delay).await,
            None => std::future::pending().await,
        }
    }

    fn next_deadline_delay(&self) -> Option<Duration> {
        let deadline = self.timeouts.next_deadline()?;
        let remaining = (deadline - self.clock.now()).max(0.0);
        Some(Duration::from_secs_f64(remaining))
    }

    fn fire_expired_timeouts(&mut self) {
        let now = self.clock.now();
        for kind in self.timeouts.poll_expired(now) {
            match kind {
                TimeoutKind::Login => {
                    if self.state == LoginState::LoggingIn {
                        warn!("login handshake timed out");
                        self.log_out(LOGIN_TIMEOUT_FAREWELL);
                    }
                }
            }
        }
    }

    fn drain_queued_actions(&mut self) {
        while let Ok(action) = self.actions.try_recv() {
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::LogIn { nickname, token } => self.log_in(&nickname, &token),
            Action::LogOut { farewell } => self.log_out(&farewell),
            Action::Join { channel } => self.join(&channel),
            Action::SendMessage { channel, text } => self.send_chat(&channel, &text),
            Action::DataReceived(bytes) => self.data_received(&bytes),
            Action::ServerDisconnected => self.server_disconnected(),
        }
    }

    /// Establish a connection and begin the login handshake.
    ///
    /// At most one login may be in flight or established; anything but the
    /// idle state makes this a no-op.
    fn log_in(&mut self, nickname: &str, token: &str) {
        if self.state != LoginState::Idle {
            trace!("log-in requested while a session is active; ignoring");
            return;
        }

        let mut connection = (self.factory)();

        let queue = self.queue.clone();
        connection.set_message_received_callback(Box::new(move |bytes| {
            let _ = queue.send(Action::DataReceived(Bytes::copy_from_slice(bytes)));
        }));
        let queue = self.queue.clone();
        connection.set_disconnected_callback(Box::new(move || {
            let _ = queue.send(Action::ServerDisconnected);
        }));

        if !connection.connect() {
            debug!("connection attempt failed");
            self.hooks.logout();
            return;
        }

        self.connection = Some(connection);
        self.send_line(&format!("PASS oauth:{token}"));
        self.send_line(&format!("NICK {nickname}"));
        self.nickname = nickname.to_owned();
        self.timeouts
            .schedule(TimeoutKind::Login, self.clock.now() + LOGIN_TIMEOUT_SECS);
        self.state = LoginState::LoggingIn;
        debug!(nickname, "login credentials sent");
    }

    /// Send a quit line, release the connection, and return to idle.
    fn log_out(&mut self, farewell: &str) {
        if self.connection.is_none() {
            trace!("log-out requested while idle; ignoring");
            return;
        }

        self.send_line(&format!("QUIT :{farewell}"));
        if let Some(mut connection) = self.connection.take() {
            connection.disconnect();
        }
        self.reset_session();
        self.hooks.logout();
    }

    /// Handle a server-initiated close. Idempotent: a stale notification
    /// after the session already went idle by another path does nothing.
    fn server_disconnected(&mut self) {
        let Some(connection) = self.connection.take() else {
            trace!("disconnect notification while idle; ignoring");
            return;
        };
        // The transport is already closed; release it without a quit line.
        drop(connection);
        self.reset_session();
        self.hooks.logout();
    }

    fn reset_session(&mut self) {
        self.state = LoginState::Idle;
        self.nickname.clear();
        self.channels.clear();
        self.recv_buf.clear();
        self.codec = LineCodec::default();
        self.timeouts.cancel(TimeoutKind::Login);
    }

    fn join(&mut self, channel: &str) {
        if self.state != LoginState::LoggedIn {
            trace!(channel, "join requested while not logged in; ignoring");
            return;
        }
        if self.channels.contains(channel) {
            trace!(channel, "already joined; ignoring");
            return;
        }
        self.send_line(&format!("JOIN {channel}"));
    }

    fn send_chat(&mut self, channel: &str, text: &str) {
        if self.state != LoginState::LoggedIn {
            trace!(channel, "chat message while not logged in; ignoring");
            return;
        }
        self.send_line(&format!("PRIVMSG {channel} :{text}"));
    }

    /// Append delivered bytes and drain every complete line before yielding.
    fn data_received(&mut self, bytes: &[u8]) {
        if self.connection.is_none() {
            debug!(
                len = bytes.len(),
                "dropping bytes delivered with no live connection"
            );
            return;
        }

        self.recv_buf.extend_from_slice(bytes);
        loop {
            match self.codec.decode(&mut self.recv_buf) {
                Ok(Some(line)) => self.handle_line(&line),
                Ok(None) => break,
                Err(error) => {
                    warn!(%error, "line decode failed; discarding buffered data");
                    self.recv_buf.clear();
                    break;
                }
            }
        }
    }

    fn handle_line(&mut self, line: &str) {
        let message = Message::parse(line);
        if !message.is_valid() {
            trace!(line, "ignoring malformed line");
            return;
        }
        self.dispatch(&message);
    }

    fn dispatch(&mut self, message: &Message) {
        match message.command.as_str() {
            RPL_ENDOFMOTD => self.login_complete(),
            "PING" => self.pong(message),
            "JOIN" => self.channel_joined(message),
            "PRIVMSG" => self.chat_message(message),
            _ => trace!(command = %message.command, "unhandled command"),
        }
    }

    /// Complete the handshake exactly once; a repeated end-of-MOTD after the
    /// session is already logged in has no further effect.
    fn login_complete(&mut self) {
        if self.state != LoginState::LoggingIn {
            return;
        }
        self.timeouts.cancel(TimeoutKind::Login);
        self.state = LoginState::LoggedIn;
        debug!("login complete");
        self.hooks.login();
    }

    fn pong(&mut self, message: &Message) {
        let reply = message
            .params
            .first()
            .map_or_else(|| "PONG".to_owned(), |token| format!("PONG :{token}"));
        self.send_line(&reply);
    }

    fn channel_joined(&mut self, message: &Message) {
        let Some(channel) = message.params.first().cloned() else {
            trace!("JOIN without a channel parameter; ignoring");
            return;
        };
        let user = message.sender_nick().to_owned();
        if user == self.nickname {
            self.channels.insert(channel.clone());
        }
        self.hooks.join(&channel, &user);
    }

    fn chat_message(&mut self, message: &Message) {
        let [channel, text, ..] = message.params.as_slice() else {
            trace!("PRIVMSG without channel and text; ignoring");
            return;
        };
        let (channel, text) = (channel.clone(), text.clone());
        let user = message.sender_nick().to_owned();
        self.hooks.message(&channel, &user, &text);
    }

    /// Frame `line` with the terminator and hand it to the transport.
    fn send_line(&mut self, line: &str) {
        let Some(connection) = self.connection.as_mut() else {
            return;
        };
        let mut framed = BytesMut::with_capacity(line.len() + 2);
        if let Err(error) = self.codec.encode(line, &mut framed) {
            warn!(%error, "dropping malformed outgoing line");
            return;
        }
        connection.send(&String::from_utf8_lossy(&framed));
    }
}
