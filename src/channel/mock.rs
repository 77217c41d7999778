//! Mock transport for testing
//!
//! This module provides a scriptable transport that can be used to exercise
//! the stream channel without a real server: inbound events are queued up
//! front (or through a shared feed handle), and every outbound text frame is
//! recorded in a shared log the test can inspect after the worker ran.
//!
//! # Example
//!
//! ```ignore
//! use pipeview::channel::mock::MockTransport;
//!
//! let mut transport = MockTransport::new();
//! transport.queue_binary(vec![0xFF, 0xD8, 0xFF]);
//! transport.queue_close();
//!
//! let sent = transport.sent_log();
//! // move `transport` into the channel worker, run it, then:
//! // assert_eq!(sent.lock().unwrap().as_slice(), [r#"{"number":5}"#]);
//! ```

use crate::channel::transport::{Transport, TransportEvent};
use crate::error::{PipeViewError, Result};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Shared queue tests use to feed inbound events after construction
pub type EventFeed = Arc<Mutex<VecDeque<TransportEvent>>>;

/// Shared log of outbound text frames, in send order
pub type SentLog = Arc<Mutex<Vec<String>>>;

/// A scriptable in-memory transport
pub struct MockTransport {
    connected: bool,
    fail_connect: bool,
    inbound: EventFeed,
    sent: SentLog,
    connect_count: Arc<Mutex<u32>>,
}

impl MockTransport {
    /// Create a mock transport with no scripted events
    pub fn new() -> Self {
        Self {
            connected: false,
            fail_connect: false,
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            sent: Arc::new(Mutex::new(Vec::new())),
            connect_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Make every `connect` call fail
    pub fn with_fail_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    /// Queue an inbound binary frame
    pub fn queue_binary(&mut self, bytes: Vec<u8>) {
        self.inbound
            .lock()
            .expect("mock inbound lock")
            .push_back(TransportEvent::Binary(bytes));
    }

    /// Queue an inbound text message
    pub fn queue_text(&mut self, text: impl Into<String>) {
        self.inbound
            .lock()
            .expect("mock inbound lock")
            .push_back(TransportEvent::Text(text.into()));
    }

    /// Queue a peer-initiated close
    pub fn queue_close(&mut self) {
        self.inbound
            .lock()
            .expect("mock inbound lock")
            .push_back(TransportEvent::Closed);
    }

    /// Handle for feeding inbound events while the worker owns the transport
    pub fn event_feed(&self) -> EventFeed {
        self.inbound.clone()
    }

    /// Handle for inspecting outbound text frames
    pub fn sent_log(&self) -> SentLog {
        self.sent.clone()
    }

    /// Handle for counting `connect` calls
    pub fn connect_counter(&self) -> Arc<Mutex<u32>> {
        self.connect_count.clone()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn connect(&mut self, endpoint: &str) -> Result<()> {
        *self.connect_count.lock().expect("mock connect lock") += 1;
        if self.fail_connect {
            return Err(PipeViewError::Channel(format!(
                "mock refused connection to {}",
                endpoint
            )));
        }
        self.connected = true;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn send_text(&mut self, payload: &str) -> Result<()> {
        if !self.connected {
            return Err(PipeViewError::Channel("not connected".to_string()));
        }
        self.sent
            .lock()
            .expect("mock sent lock")
            .push(payload.to_string());
        Ok(())
    }

    fn poll(&mut self) -> Result<Option<TransportEvent>> {
        if !self.connected {
            return Ok(None);
        }
        let event = self.inbound.lock().expect("mock inbound lock").pop_front();
        if matches!(event, Some(TransportEvent::Closed)) {
            self.connected = false;
        }
        Ok(event)
    }

    fn close(&mut self) {
        self.connected = false;
    }
}
