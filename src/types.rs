//! Core data types for pipeview
//!
//! This module contains the fundamental data structures shared between the
//! graph model and the stream channel: node/edge identities, the fixed node
//! vocabulary, presentation geometry, and connection status.

use serde::{Deserialize, Serialize};

/// Stable identity of a node in the connection graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Stable identity of an edge in the connection graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// The fixed vocabulary of node labels
///
/// One `Camera` node plus a fixed ordered palette of 10 operator labels.
/// The wire form is the snake_case string (see [`NodeLabel::as_str`]),
/// matching what the pipeline server expects in edge-list snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeLabel {
    /// The frame source and conceptual root of the pipeline
    Camera,
    /// Canny edge detection
    Canny,
    /// Binary threshold
    Binary,
    /// Face detection
    Face,
    /// White balance correction
    WhiteBalance,
    /// Superpixel segmentation
    Superpixel,
    /// Haar-like feature overlay
    HaarLike,
    /// Red channel removal
    RemovedRed,
    /// Green channel removal
    RemovedGreen,
    /// Blue channel removal
    RemovedBlue,
    /// Text overlay
    Text,
}

impl NodeLabel {
    /// The operator palette, in presentation order (camera excluded)
    pub const OPERATORS: [NodeLabel; 10] = [
        NodeLabel::Canny,
        NodeLabel::Binary,
        NodeLabel::Face,
        NodeLabel::WhiteBalance,
        NodeLabel::Superpixel,
        NodeLabel::HaarLike,
        NodeLabel::RemovedRed,
        NodeLabel::RemovedGreen,
        NodeLabel::RemovedBlue,
        NodeLabel::Text,
    ];

    /// The wire/display name of this label
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeLabel::Camera => "camera",
            NodeLabel::Canny => "canny",
            NodeLabel::Binary => "binary",
            NodeLabel::Face => "face",
            NodeLabel::WhiteBalance => "white_balance",
            NodeLabel::Superpixel => "superpixel",
            NodeLabel::HaarLike => "haar_like",
            NodeLabel::RemovedRed => "removed_red",
            NodeLabel::RemovedGreen => "removed_green",
            NodeLabel::RemovedBlue => "removed_blue",
            NodeLabel::Text => "text",
        }
    }

    /// Parse a wire/display name back into a label
    pub fn parse(s: &str) -> Option<NodeLabel> {
        let all = std::iter::once(NodeLabel::Camera).chain(Self::OPERATORS);
        for label in all {
            if label.as_str() == s {
                return Some(label);
            }
        }
        None
    }

    /// Whether this is the camera label
    pub fn is_camera(&self) -> bool {
        matches!(self, NodeLabel::Camera)
    }
}

impl std::fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Presentation-only geometry of a node
///
/// Positions and sizes are carried for the benefit of an external
/// diagramming widget; they have no semantic meaning to the graph model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NodeGeometry {
    /// X position of the top-left corner
    pub x: f32,
    /// Y position of the top-left corner
    pub y: f32,
    /// Node width
    pub width: f32,
    /// Node height
    pub height: f32,
}

impl NodeGeometry {
    /// Create a new geometry rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Connection status of the stream channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionStatus {
    /// Not connected to any endpoint
    #[default]
    Disconnected,
    /// Attempting to connect
    Connecting,
    /// Connected and receiving frames
    Connected,
    /// Connection error occurred
    Error,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
            ConnectionStatus::Connecting => write!(f, "Connecting..."),
            ConnectionStatus::Connected => write!(f, "Connected"),
            ConnectionStatus::Error => write!(f, "Error"),
        }
    }
}
