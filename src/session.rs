//! Editor session: graph edits wired to the stream channel
//!
//! [`EditorSession`] owns the connection graph and the caller-side channel
//! handle, and installs the channel publisher as the graph's topology
//! subscriber, so every edit batch serializes synchronously into the
//! channel's command queue. It also maps the delete shortcut (Control+X)
//! onto batch edge removal and applies a configured initial pipeline at
//! startup.

use crate::channel::{ChannelEvent, ChannelHandle};
use crate::config::PipelineConfig;
use crate::graph::{ConnectionGraph, GraphElement};
use crate::types::{EdgeId, NodeId, NodeLabel};

/// A keyboard shortcut as reported by the input surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyCombo {
    /// Control modifier held
    pub ctrl: bool,
    /// The pressed key
    pub key: char,
}

impl KeyCombo {
    /// Control+X: delete all selected edges
    pub const DELETE_EDGES: KeyCombo = KeyCombo {
        ctrl: true,
        key: 'x',
    };
}

/// The per-session pairing of graph and channel
pub struct EditorSession {
    graph: ConnectionGraph,
    channel: ChannelHandle,
}

impl EditorSession {
    /// Create a session over an existing channel handle
    ///
    /// The graph is created with the fixed node set and subscribed to the
    /// channel; the session lives until dropped, nothing is persisted.
    pub fn new(channel: ChannelHandle) -> Self {
        let mut graph = ConnectionGraph::new();
        graph.set_subscriber(Box::new(channel.publisher()));
        Self { graph, channel }
    }

    /// Request a connection to the streaming endpoint
    pub fn connect(&self, endpoint: &str) {
        self.channel.connect(endpoint);
    }

    /// The committed graph state
    pub fn graph(&self) -> &ConnectionGraph {
        &self.graph
    }

    /// The channel handle, for event draining and raw commands
    pub fn channel(&self) -> &ChannelHandle {
        &self.channel
    }

    /// Attempt to connect two nodes (drag-to-connect gesture)
    pub fn try_connect(&mut self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        self.graph.try_add_edge(source, target)
    }

    /// Handle a keyboard shortcut against the current selection
    ///
    /// Returns the number of edges removed; unrecognized combos do nothing.
    pub fn handle_key(&mut self, combo: KeyCombo, selection: &[GraphElement]) -> usize {
        if combo == KeyCombo::DELETE_EDGES {
            self.graph.remove_selected_edges(selection)
        } else {
            0
        }
    }

    /// Send a direct numeric selection command
    pub fn send_number(&self, number: i64) {
        self.channel.send_number(number);
    }

    /// Receive all pending channel events
    pub fn drain_events(&self) -> Vec<ChannelEvent> {
        self.channel.drain()
    }

    /// Apply a configured initial pipeline through admission control
    ///
    /// Pairs that name unknown labels or violate the topology rules are
    /// logged and skipped. Returns the number of edges committed.
    pub fn apply_pipeline(&mut self, pipeline: &PipelineConfig) -> usize {
        let mut committed = 0;
        for spec in &pipeline.edges {
            let Some(source) = self.resolve(&spec.source) else {
                tracing::warn!("Skipping pipeline edge: unknown label {:?}", spec.source);
                continue;
            };
            let Some(target) = self.resolve(&spec.target) else {
                tracing::warn!("Skipping pipeline edge: unknown label {:?}", spec.target);
                continue;
            };
            match self.graph.try_add_edge(source, target) {
                Some(_) => committed += 1,
                None => {
                    tracing::warn!(
                        "Skipping pipeline edge {} -> {}: refused by admission control",
                        spec.source,
                        spec.target
                    );
                }
            }
        }
        committed
    }

    fn resolve(&self, label: &str) -> Option<NodeId> {
        let label = NodeLabel::parse(label)?;
        self.graph.node_by_label(label).map(|n| n.id)
    }
}
