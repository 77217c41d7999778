//! # pipeview: live frame-stream client with an editable pipeline graph
//!
//! A headless client for a camera stream server: one WebSocket connection
//! delivers JPEG frames for display while the user wires processing
//! operators into a pipeline whose edge list is pushed back over the same
//! socket.
//!
//! ## Architecture
//!
//! - **Channel**: owns the transport on a worker thread; bridges binary
//!   frames to a display sink and JSON commands to the wire
//! - **Graph**: the editable node/edge topology with one-input/one-output
//!   admission control over a fixed operator palette
//! - **Session**: wires graph commits to the channel and maps the delete
//!   shortcut onto batch edge removal
//! - **Communication**: crossbeam channels between the caller and the
//!   channel worker; topology snapshots serialize synchronously at every
//!   graph edit batch
//!
//! ## Example
//!
//! ```ignore
//! use pipeview::{
//!     channel::{LatestFrameSink, StreamBackend, WebSocketTransport},
//!     config::AppConfig,
//!     session::EditorSession,
//! };
//!
//! fn main() {
//!     let config = AppConfig::load_or_default();
//!
//!     let (backend, handle) = StreamBackend::new(
//!         Box::new(WebSocketTransport::new()),
//!         Box::new(LatestFrameSink::new()),
//!     );
//!     std::thread::spawn(move || backend.run());
//!
//!     let mut session = EditorSession::new(handle);
//!     session.connect(&config.stream.endpoint_url);
//!     session.apply_pipeline(&config.pipeline);
//!
//!     for event in session.channel().receiver.iter() {
//!         // status, frames, errors
//!     }
//! }
//! ```

pub mod channel;
pub mod config;
pub mod error;
pub mod graph;
pub mod session;
pub mod types;
pub mod wire;

// Re-export commonly used types
pub use channel::{ChannelCommand, ChannelEvent, ChannelHandle, StreamBackend};
pub use config::AppConfig;
pub use error::{PipeViewError, Result};
pub use graph::{ConnectionGraph, EdgeRejection, GraphElement, TopologySubscriber};
pub use session::EditorSession;
pub use types::{ConnectionStatus, EdgeId, NodeId, NodeLabel};
pub use wire::{EdgeEntry, EdgeSnapshot, NumberCommand};
