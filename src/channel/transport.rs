//! Transport trait for the stream channel
//!
//! This module provides a common trait for the wire transport, enabling
//! both the real WebSocket client and a mock transport for testing.
//! Implementations must be `Send` so the worker thread can own them.

use crate::error::Result;

/// An inbound event surfaced by a transport poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// A complete binary message (one JPEG frame)
    Binary(Vec<u8>),
    /// A complete text message
    Text(String),
    /// The peer closed the connection
    Closed,
}

/// Statistics for stream channel operations
///
/// The worker resets these on every successful connect, so counts always
/// cover the current connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelStats {
    /// Total binary frames received
    pub frames_received: u64,
    /// Total frame bytes received
    pub bytes_received: u64,
    /// Size of the most recent frame in bytes
    pub last_frame_bytes: u64,
    /// Edge-list snapshots transmitted
    pub snapshots_sent: u64,
    /// Numeric selection commands transmitted
    pub numbers_sent: u64,
    /// Outbound sends that failed at the transport
    pub send_failures: u64,
}

impl ChannelStats {
    /// Record one received binary frame
    pub fn record_frame(&mut self, bytes: u64) {
        self.frames_received += 1;
        self.bytes_received += bytes;
        self.last_frame_bytes = bytes;
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Unified interface for the stream transport
///
/// One long-lived connection carrying binary frames inbound and JSON text
/// messages outbound. Messages are fire-and-forget, at-most-once; the only
/// ordering guarantee is the transport's own in-order delivery on a single
/// connection.
pub trait Transport: Send {
    /// Open the connection to `endpoint`
    ///
    /// Binary messages are negotiated as byte buffers. May be called again
    /// after a closed or failed connection; an external supervisor driving
    /// repeated calls is the intended reconnect seam.
    fn connect(&mut self, endpoint: &str) -> Result<()>;

    /// Whether a connection is currently open
    fn is_connected(&self) -> bool;

    /// Transmit one text frame
    fn send_text(&mut self, payload: &str) -> Result<()>;

    /// Poll for the next inbound event
    ///
    /// Returns `Ok(None)` when nothing is pending. Implementations must not
    /// block indefinitely; the WebSocket transport bounds this with a read
    /// timeout on the underlying stream.
    fn poll(&mut self) -> Result<Option<TransportEvent>>;

    /// Close the connection
    fn close(&mut self);
}
