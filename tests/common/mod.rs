//! Shared utilities for integration tests.
//!
//! Provides a scripted in-memory [`Connection`] plus helpers to observe what
//! the session worker sent and to inject server-side events (received bytes,
//! disconnects) from the test body.

// Items in this shared module may not be used by all test binaries that import it.
#![allow(
    dead_code,
    reason = "shared test utilities are not used by all test binaries"
)]

use std::sync::{
    Arc,
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use chatwire::{Connection, DisconnectedCallback, MessageReceivedCallback};

/// Shared result type for integration tests.
pub type TestResult<T = ()> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Default)]
struct MockState {
    sent: Mutex<Vec<String>>,
    connect_attempts: AtomicUsize,
    disconnect_calls: AtomicUsize,
    on_data: Mutex<Option<MessageReceivedCallback>>,
    on_disconnect: Mutex<Option<DisconnectedCallback>>,
}

/// Handle kept by tests to observe and drive mock connections.
///
/// All connections created through [`MockServer::factory`] share this
/// state, so the handle stays valid across re-logins.
#[derive(Clone, Default)]
pub struct MockServer {
    state: Arc<MockState>,
}

impl MockServer {
    pub fn new() -> Self { Self::default() }

    /// Factory handed to the session builder. Each produced connection
    /// accepts or refuses `connect` according to `accept`.
    pub fn factory(&self, accept: bool) -> impl FnMut() -> Box<dyn Connection> + Send + 'static {
        let state = Arc::clone(&self.state);
        move || {
            Box::new(MockConnection {
                state: Arc::clone(&state),
                accept,
            }) as Box<dyn Connection>
        }
    }

    /// Deliver server bytes through the registered delivery callback.
    pub fn deliver(&self, bytes: &[u8]) {
        if let Some(callback) = self.state.on_data.lock().expect("lock").as_mut() {
            callback(bytes);
        }
    }

    /// Deliver one CR LF terminated protocol line.
    pub fn deliver_line(&self, line: &str) { self.deliver(format!("{line}\r\n").as_bytes()); }

    /// Simulate a server-initiated close.
    pub fn drop_from_server(&self) {
        if let Some(callback) = self.state.on_disconnect.lock().expect("lock").as_mut() {
            callback();
        }
    }

    /// Lines the worker handed to the transport so far.
    pub fn sent_lines(&self) -> Vec<String> { self.state.sent.lock().expect("lock").clone() }

    /// Whether some sent line equals `line` (terminator included).
    pub fn sent_contains(&self, line: &str) -> bool {
        self.sent_lines().iter().any(|sent| sent == line)
    }

    pub fn connect_attempts(&self) -> usize {
        self.state.connect_attempts.load(Ordering::SeqCst)
    }

    pub fn disconnect_calls(&self) -> usize {
        self.state.disconnect_calls.load(Ordering::SeqCst)
    }
}

struct MockConnection {
    state: Arc<MockState>,
    accept: bool,
}

impl Connection for MockConnection {
    fn connect(&mut self) -> bool {
        self.state.connect_attempts.fetch_add(1, Ordering::SeqCst);
        self.accept
    }

    fn disconnect(&mut self) {
        self.state.disconnect_calls.fetch_add(1, Ordering::SeqCst);
    }

    fn send(&mut self, text: &str) {
        self.state.sent.lock().expect("lock").push(text.to_owned());
    }

    fn set_message_received_callback(&mut self, callback: MessageReceivedCallback) {
        *self.state.on_data.lock().expect("lock") = Some(callback);
    }

    fn set_disconnected_callback(&mut self, callback: DisconnectedCallback) {
        *self.state.on_disconnect.lock().expect("lock") = Some(callback);
    }
}

/// Await until `predicate` holds, yielding to the worker between polls.
///
/// Under paused tokio time the sleeps auto-advance, so polling completes in
/// virtually zero wall-clock time.
pub async fn wait_until(mut predicate: impl FnMut() -> bool) {
    for _ in 0..1_000 {
        if predicate() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(1)).await;
    }
    panic!("condition not reached in time");
}
