//! Wire message shapes for the pipeline server
//!
//! Two outbound JSON text messages are in use:
//!
//! - `{"nodes": [{"source": <string|null>, "target": <string|null>}, ...]}`
//!   is the full edge-list snapshot, sent after every committed add and
//!   after every delete batch.
//! - `{"number": <integer>}` is a direct numeric selection command.
//!
//! Inbound binary messages carry no envelope at all: each one is a complete
//! JPEG image, handled by the channel layer without touching this module.
//!
//! The snapshot shape tolerates `null` endpoints even though the graph model
//! never commits a dangling edge; the server contract requires the field to
//! be nullable.

use serde::{Deserialize, Serialize};

/// One edge in an outbound snapshot, by endpoint label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeEntry {
    /// Source node label, or `None` for a dangling reference
    pub source: Option<String>,
    /// Target node label, or `None` for a dangling reference
    pub target: Option<String>,
}

impl EdgeEntry {
    /// Create an entry with both endpoints resolved
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            target: Some(target.into()),
        }
    }
}

/// Immutable serialized snapshot of the committed edge set
///
/// Entries appear in edge insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    /// Every committed edge, as a source/target label pair
    pub nodes: Vec<EdgeEntry>,
}

impl EdgeSnapshot {
    /// Encode the snapshot as a JSON text frame
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Direct numeric selection command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberCommand {
    /// The selected number
    pub number: i64,
}

impl NumberCommand {
    /// Create a new numeric selection command
    pub fn new(number: i64) -> Self {
        Self { number }
    }

    /// Encode the command as a JSON text frame
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
