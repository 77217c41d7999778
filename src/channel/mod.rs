//! Stream channel: transport worker and caller-side handle
//!
//! This module bridges the frame stream to the display sink and UI commands
//! to the wire. The transport work runs on a dedicated thread so the caller
//! never blocks; the two sides communicate over crossbeam channels:
//!
//! - [`ChannelCommand`] - Messages sent from the caller to the worker
//!   (connect, send edges, send number, shutdown)
//! - [`ChannelEvent`] - Messages sent from the worker to the caller
//!   (status, frames, errors, stats)
//! - [`ChannelHandle`] - Caller-side handle for sending commands and
//!   receiving events
//! - [`StreamBackend`] - Entry point that owns the worker's dependencies
//!   until [`run`](StreamBackend::run) moves them onto the worker thread
//!
//! # Components
//!
//! - [`Transport`] - Wire seam (real WebSocket or mock)
//! - [`WebSocketTransport`] - tungstenite client with read-timeout polling
//! - [`MockTransport`] - Scriptable transport for tests and demos
//! - [`FrameSink`] / [`LatestFrameSink`] - Display seam with RAII frame release
//! - [`ChannelWorker`] - The loop that owns transport and sink
//!
//! # Example
//!
//! ```ignore
//! use pipeview::channel::{StreamBackend, WebSocketTransport, LatestFrameSink};
//!
//! let (backend, handle) = StreamBackend::new(
//!     Box::new(WebSocketTransport::new()),
//!     Box::new(LatestFrameSink::new()),
//! );
//! std::thread::spawn(move || backend.run());
//!
//! handle.connect("ws://127.0.0.1:3000/ws");
//! for event in handle.drain() {
//!     // handle status/frame events
//! }
//! ```

pub mod mock;
pub mod sink;
pub mod transport;
pub mod websocket;
pub mod worker;

pub use mock::MockTransport;
pub use sink::{FrameHandle, FrameSink, LatestFrameSink, ReleaseCounter};
pub use transport::{ChannelStats, Transport, TransportEvent};
pub use websocket::WebSocketTransport;
pub use worker::ChannelWorker;

use crate::graph::TopologySubscriber;
use crate::types::ConnectionStatus;
use crate::wire::EdgeSnapshot;
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Message sent from the caller to the channel worker
#[derive(Debug, Clone)]
pub enum ChannelCommand {
    /// Open the connection to an endpoint
    Connect {
        /// WebSocket endpoint URL (`ws://<host>/ws`)
        endpoint: String,
    },
    /// Transmit an edge-list snapshot as one text frame
    SendEdges(EdgeSnapshot),
    /// Transmit a numeric selection command as one text frame
    SendNumber(i64),
    /// Request current statistics
    RequestStats,
    /// Stop the worker, releasing the current frame and closing the wire
    Shutdown,
}

/// Message sent from the channel worker to the caller
#[derive(Debug, Clone)]
pub enum ChannelEvent {
    /// Connection status changed
    Status(ConnectionStatus),
    /// Transport-level error (logged and otherwise swallowed; no recovery)
    TransportError(String),
    /// One binary frame was presented to the sink
    FrameReceived {
        /// Delivery sequence number
        seq: u64,
        /// Frame size in bytes
        bytes: usize,
    },
    /// Statistics update (response to [`ChannelCommand::RequestStats`])
    Stats(ChannelStats),
    /// The worker stopped
    Shutdown,
}

/// Caller-side handle to the channel worker
pub struct ChannelHandle {
    /// Receiver for worker events
    pub receiver: Receiver<ChannelEvent>,
    command_sender: Sender<ChannelCommand>,
}

impl ChannelHandle {
    /// Try to receive an event without blocking
    pub fn try_recv(&self) -> Option<ChannelEvent> {
        self.receiver.try_recv().ok()
    }

    /// Receive all pending events
    pub fn drain(&self) -> Vec<ChannelEvent> {
        self.receiver.try_iter().collect()
    }

    /// Send a raw command to the worker
    pub fn send_command(&self, cmd: ChannelCommand) -> bool {
        self.command_sender.send(cmd).is_ok()
    }

    /// Request a connection to `endpoint`
    ///
    /// No automatic reconnect exists; calling this again after a failure or
    /// closure is the reconnect seam for an external supervisor.
    pub fn connect(&self, endpoint: &str) {
        let _ = self.command_sender.send(ChannelCommand::Connect {
            endpoint: endpoint.to_string(),
        });
    }

    /// Transmit an edge-list snapshot
    pub fn send_edges(&self, snapshot: EdgeSnapshot) {
        let _ = self.command_sender.send(ChannelCommand::SendEdges(snapshot));
    }

    /// Transmit a numeric selection command
    pub fn send_number(&self, number: i64) {
        let _ = self.command_sender.send(ChannelCommand::SendNumber(number));
    }

    /// Request a statistics snapshot
    pub fn request_stats(&self) {
        let _ = self.command_sender.send(ChannelCommand::RequestStats);
    }

    /// Request shutdown
    pub fn shutdown(&self) {
        let _ = self.command_sender.send(ChannelCommand::Shutdown);
    }

    /// A topology subscriber that forwards snapshots into this channel
    pub fn publisher(&self) -> ChannelPublisher {
        ChannelPublisher {
            command_sender: self.command_sender.clone(),
        }
    }
}

/// Forwards committed topology snapshots to the channel worker
///
/// The sole production implementation of [`TopologySubscriber`]: the graph
/// serializes synchronously inside the committing call, and the FIFO command
/// queue preserves commit order on the wire.
pub struct ChannelPublisher {
    command_sender: Sender<ChannelCommand>,
}

impl TopologySubscriber for ChannelPublisher {
    fn topology_changed(&mut self, snapshot: &EdgeSnapshot) {
        let _ = self
            .command_sender
            .send(ChannelCommand::SendEdges(snapshot.clone()));
    }
}

/// The stream channel backend that runs on a separate thread
pub struct StreamBackend {
    command_receiver: Receiver<ChannelCommand>,
    event_sender: Sender<ChannelEvent>,
    transport: Box<dyn Transport>,
    sink: Box<dyn FrameSink>,
    running: Arc<AtomicBool>,
    releases: ReleaseCounter,
}

impl StreamBackend {
    /// Create a new backend with communication channels
    pub fn new(
        transport: Box<dyn Transport>,
        sink: Box<dyn FrameSink>,
    ) -> (Self, ChannelHandle) {
        let (cmd_tx, cmd_rx) = bounded(256);
        // Bounded for backpressure if the caller stops draining events
        let (event_tx, event_rx) = bounded(1024);

        let backend = Self {
            command_receiver: cmd_rx,
            event_sender: event_tx,
            transport,
            sink,
            running: Arc::new(AtomicBool::new(true)),
            releases: ReleaseCounter::new(),
        };

        let handle = ChannelHandle {
            receiver: event_rx,
            command_sender: cmd_tx,
        };

        (backend, handle)
    }

    /// Run the worker loop (call on a dedicated thread)
    pub fn run(self) {
        let worker = ChannelWorker::new(
            self.command_receiver,
            self.event_sender,
            self.transport,
            self.sink,
            self.running,
            self.releases,
        );
        worker.run();
    }

    /// Counter observing frame-handle releases
    pub fn release_counter(&self) -> ReleaseCounter {
        self.releases.clone()
    }

    /// Flag that stops the worker when cleared
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }
}
