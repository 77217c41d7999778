//! Channel worker loop
//!
//! This module contains the loop that runs on the channel thread and owns
//! the transport and the frame sink exclusively. It drains UI commands,
//! polls the transport for inbound frames, and keeps the channel statistics.
//!
//! # Ordering
//!
//! Commands are executed in FIFO order from a single queue and frames are
//! presented in transport delivery order, so edge snapshots hit the wire in
//! the same order the graph committed them, and no frame is dropped or
//! reordered relative to the connection's own ordering.
//!
//! # Failure handling
//!
//! Transport errors are logged, surfaced as [`ChannelEvent::TransportError`],
//! and otherwise swallowed: no retry, no backoff, no acknowledgement. A
//! caller that wants reconnection issues another
//! [`ChannelCommand::Connect`](crate::channel::ChannelCommand::Connect).

use crate::channel::sink::{FrameHandle, FrameSink, ReleaseCounter};
use crate::channel::transport::{ChannelStats, Transport, TransportEvent};
use crate::channel::{ChannelCommand, ChannelEvent};
use crate::types::ConnectionStatus;
use crate::wire::NumberCommand;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on inbound events handled per tick
const MAX_POLL_BATCH: usize = 64;

/// Command-wait timeout while a connection is open
const ACTIVE_WAIT: Duration = Duration::from_millis(1);

/// Command-wait timeout while idle/disconnected
const IDLE_WAIT: Duration = Duration::from_millis(50);

enum Outbound {
    Snapshot,
    Number,
}

/// The worker that owns the transport and the display sink
pub struct ChannelWorker {
    command_rx: Receiver<ChannelCommand>,
    event_tx: Sender<ChannelEvent>,
    transport: Box<dyn Transport>,
    sink: Box<dyn FrameSink>,
    running: Arc<AtomicBool>,
    releases: ReleaseCounter,
    stats: ChannelStats,
    next_seq: u64,
    status: ConnectionStatus,
}

impl ChannelWorker {
    /// Create a new worker
    pub fn new(
        command_rx: Receiver<ChannelCommand>,
        event_tx: Sender<ChannelEvent>,
        transport: Box<dyn Transport>,
        sink: Box<dyn FrameSink>,
        running: Arc<AtomicBool>,
        releases: ReleaseCounter,
    ) -> Self {
        Self {
            command_rx,
            event_tx,
            transport,
            sink,
            running,
            releases,
            stats: ChannelStats::default(),
            next_seq: 0,
            status: ConnectionStatus::Disconnected,
        }
    }

    /// Run until shutdown, then tear down the transport and sink
    pub fn run(mut self) {
        tracing::debug!("Channel worker started");
        while self.running.load(Ordering::SeqCst) {
            if !self.tick() {
                break;
            }
        }
        self.shutdown();
    }

    /// One scheduling step: handle pending commands, then poll inbound
    ///
    /// Returns `false` when the worker should stop. Exposed so tests can
    /// drive the loop synchronously without a thread.
    pub fn tick(&mut self) -> bool {
        let wait = if self.transport.is_connected() {
            ACTIVE_WAIT
        } else {
            IDLE_WAIT
        };

        match self.command_rx.recv_timeout(wait) {
            Ok(cmd) => {
                if !self.handle_command(cmd) {
                    return false;
                }
                loop {
                    match self.command_rx.try_recv() {
                        Ok(cmd) => {
                            if !self.handle_command(cmd) {
                                return false;
                            }
                        }
                        Err(TryRecvError::Empty) => break,
                        Err(TryRecvError::Disconnected) => return false,
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => return false,
        }

        for _ in 0..MAX_POLL_BATCH {
            match self.transport.poll() {
                Ok(Some(event)) => self.handle_transport_event(event),
                Ok(None) => break,
                Err(err) => {
                    tracing::error!("Transport error: {}", err);
                    self.emit(ChannelEvent::TransportError(err.to_string()));
                    self.set_status(ConnectionStatus::Error);
                    break;
                }
            }
        }

        true
    }

    /// Release the current frame and close the transport
    pub fn shutdown(&mut self) {
        self.sink.clear();
        self.transport.close();
        self.running.store(false, Ordering::SeqCst);
        self.emit(ChannelEvent::Shutdown);
        tracing::debug!("Channel worker stopped");
    }

    fn handle_command(&mut self, cmd: ChannelCommand) -> bool {
        match cmd {
            ChannelCommand::Connect { endpoint } => {
                self.set_status(ConnectionStatus::Connecting);
                match self.transport.connect(&endpoint) {
                    Ok(()) => {
                        tracing::info!("Stream channel ready on {}", endpoint);
                        // Stats cover the current connection only
                        self.stats.reset();
                        self.set_status(ConnectionStatus::Connected);
                    }
                    Err(err) => {
                        tracing::error!("Connection to {} failed: {}", endpoint, err);
                        self.emit(ChannelEvent::TransportError(err.to_string()));
                        self.set_status(ConnectionStatus::Error);
                    }
                }
                true
            }
            ChannelCommand::SendEdges(snapshot) => {
                match snapshot.to_json() {
                    Ok(json) => self.send_text(&json, Outbound::Snapshot),
                    Err(err) => tracing::error!("Snapshot encoding failed: {}", err),
                }
                true
            }
            ChannelCommand::SendNumber(number) => {
                match NumberCommand::new(number).to_json() {
                    Ok(json) => {
                        tracing::info!("Sending number selection: {}", json);
                        self.send_text(&json, Outbound::Number);
                    }
                    Err(err) => tracing::error!("Number encoding failed: {}", err),
                }
                true
            }
            ChannelCommand::RequestStats => {
                self.emit(ChannelEvent::Stats(self.stats.clone()));
                true
            }
            ChannelCommand::Shutdown => false,
        }
    }

    fn send_text(&mut self, json: &str, kind: Outbound) {
        match self.transport.send_text(json) {
            Ok(()) => match kind {
                Outbound::Snapshot => self.stats.snapshots_sent += 1,
                Outbound::Number => self.stats.numbers_sent += 1,
            },
            Err(err) => {
                self.stats.send_failures += 1;
                tracing::warn!("Send failed: {}", err);
                self.emit(ChannelEvent::TransportError(err.to_string()));
            }
        }
    }

    fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Binary(bytes) => {
                let seq = self.next_seq;
                self.next_seq += 1;
                let len = bytes.len();
                self.stats.record_frame(len as u64);

                let frame =
                    FrameHandle::new(bytes, seq).with_release_counter(self.releases.clone());
                self.sink.present(frame);
                self.emit(ChannelEvent::FrameReceived { seq, bytes: len });
            }
            TransportEvent::Text(text) => {
                tracing::debug!("Ignoring inbound text message: {}", text);
            }
            TransportEvent::Closed => {
                self.set_status(ConnectionStatus::Disconnected);
            }
        }
    }

    fn set_status(&mut self, status: ConnectionStatus) {
        if self.status != status {
            self.status = status;
            self.emit(ChannelEvent::Status(status));
        }
    }

    fn emit(&self, event: ChannelEvent) {
        let _ = self.event_tx.send(event);
    }
}
