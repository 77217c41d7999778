//! Connection graph for the processing pipeline
//!
//! This module holds the editable node/edge topology the user wires up in
//! the diagramming surface, and enforces the one-input/one-output pipeline
//! constraint on every edit.
//!
//! # Components
//!
//! - [`ConnectionGraph`] - The committed node/edge sets plus admission control
//! - [`TopologySubscriber`] - Notification seam fired once per edit batch
//! - [`EdgeRejection`] - Typed reason why an edge was refused
//! - [`GraphElement`] - Selection element (node or edge) for batch removal
//!
//! # Topology rules
//!
//! Edges chain operators *toward* the camera: the camera is the pipeline
//! root in processing order but a sink in edge direction, so the camera node
//! is never admitted as an edge's source. Every other node may hold at most
//! one outgoing and one incoming edge, and edges may only join two existing
//! nodes. The ordered operator chain is recovered from the edge set by
//! walking predecessors backward from the camera (see
//! [`ConnectionGraph::process_chain`]).

pub mod model;

pub use model::{
    ConnectionGraph, Edge, EdgeRejection, GraphElement, Node, TopologySubscriber,
};
