//! Graph model and edge admission control
//!
//! The graph is created once per session with the fixed node set
//! pre-populated (one camera node plus the 10-operator palette) and is
//! mutated only through [`ConnectionGraph::try_add_edge`] and
//! [`ConnectionGraph::remove_selected_edges`]. Both paths notify the
//! topology subscriber synchronously: once per committed add, and once per
//! delete batch whether or not it removed anything, so snapshots always
//! reflect the post-mutation edge set in application order.

use crate::types::{EdgeId, NodeGeometry, NodeId, NodeLabel};
use crate::wire::{EdgeEntry, EdgeSnapshot};

/// A processing node in the connection graph
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Stable node identity
    pub id: NodeId,
    /// Label from the fixed vocabulary
    pub label: NodeLabel,
    /// Presentation-only geometry
    pub geometry: NodeGeometry,
}

/// A directed edge between two nodes
///
/// Endpoints are references by id, never owning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    /// Stable edge identity
    pub id: EdgeId,
    /// Source node id
    pub source: NodeId,
    /// Target node id
    pub target: NodeId,
}

/// A selectable graph element, as reported by the diagramming surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphElement {
    /// A selected node
    Node(NodeId),
    /// A selected edge
    Edge(EdgeId),
}

/// Why an attempted edge was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeRejection {
    /// The camera node may never be used as an edge's source
    CameraSource,
    /// The source node already has an outgoing edge
    SourceOccupied(NodeId),
    /// The target node already has an incoming edge
    TargetOccupied(NodeId),
    /// An endpoint id did not resolve to an existing node
    UnknownNode(NodeId),
}

impl std::fmt::Display for EdgeRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeRejection::CameraSource => {
                write!(f, "camera cannot be used as an edge source")
            }
            EdgeRejection::SourceOccupied(id) => {
                write!(f, "source {} already has an outgoing edge", id)
            }
            EdgeRejection::TargetOccupied(id) => {
                write!(f, "target {} already has an incoming edge", id)
            }
            EdgeRejection::UnknownNode(id) => write!(f, "node {} does not exist", id),
        }
    }
}

/// Notification seam for topology edits
///
/// Fired synchronously, once per committed add and once per delete batch
/// (even a batch that removed nothing), with the post-mutation snapshot.
/// Never fired for a rejected add. The sole production subscriber forwards
/// snapshots to the stream channel; tests inject recording subscribers
/// instead.
pub trait TopologySubscriber: Send {
    /// Called after the committed edge set changed
    fn topology_changed(&mut self, snapshot: &EdgeSnapshot);
}

/// The editable node/edge topology
///
/// Exclusively owns its node and edge collections; no other component
/// mutates them directly. Edges keep insertion order, which is also the
/// order they appear in snapshots.
pub struct ConnectionGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    next_edge_id: u32,
    subscriber: Option<Box<dyn TopologySubscriber>>,
}

impl ConnectionGraph {
    /// Create the graph with the fixed node set pre-populated
    ///
    /// The camera node sits at (500, 100) sized 100x50; the 10 operators
    /// fill a two-column grid starting at (50, 30), matching the preset
    /// layout the diagramming surface renders.
    pub fn new() -> Self {
        let mut nodes = Vec::with_capacity(1 + NodeLabel::OPERATORS.len());
        nodes.push(Node {
            id: NodeId(0),
            label: NodeLabel::Camera,
            geometry: NodeGeometry::new(500.0, 100.0, 100.0, 50.0),
        });

        for (i, label) in NodeLabel::OPERATORS.iter().enumerate() {
            let row = (i / 2) as f32;
            let col = (i % 2) as f32;
            nodes.push(Node {
                id: NodeId(i as u32 + 1),
                label: *label,
                geometry: NodeGeometry::new(50.0 + col * 100.0, 30.0 + row * 40.0, 80.0, 30.0),
            });
        }

        Self {
            nodes,
            edges: Vec::new(),
            next_edge_id: 0,
            subscriber: None,
        }
    }

    /// Install the topology subscriber
    pub fn set_subscriber(&mut self, subscriber: Box<dyn TopologySubscriber>) {
        self.subscriber = Some(subscriber);
    }

    /// All nodes, camera first then the palette in order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All committed edges, in insertion order
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Look up a node by id
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Look up a node by label
    pub fn node_by_label(&self, label: NodeLabel) -> Option<&Node> {
        self.nodes.iter().find(|n| n.label == label)
    }

    /// Number of committed edges leaving `id`
    pub fn out_degree(&self, id: NodeId) -> usize {
        self.edges.iter().filter(|e| e.source == id).count()
    }

    /// Number of committed edges entering `id`
    pub fn in_degree(&self, id: NodeId) -> usize {
        self.edges.iter().filter(|e| e.target == id).count()
    }

    /// Run admission control without committing anything
    ///
    /// [`try_add_edge`](Self::try_add_edge) is silent about why it refused
    /// an edge; callers that need diagnostics ask here.
    pub fn check_edge(&self, source: NodeId, target: NodeId) -> Result<(), EdgeRejection> {
        let source_node = self
            .node(source)
            .ok_or(EdgeRejection::UnknownNode(source))?;
        self.node(target).ok_or(EdgeRejection::UnknownNode(target))?;

        if source_node.label.is_camera() {
            return Err(EdgeRejection::CameraSource);
        }
        if self.out_degree(source) > 0 {
            return Err(EdgeRejection::SourceOccupied(source));
        }
        if self.in_degree(target) > 0 {
            return Err(EdgeRejection::TargetOccupied(target));
        }
        Ok(())
    }

    /// Attempt to commit a new edge from `source` to `target`
    ///
    /// Returns the new edge id on success. A refused edge returns `None`
    /// and leaves the graph untouched; no notification fires. The rejection
    /// reason is logged at debug level and available via
    /// [`check_edge`](Self::check_edge).
    pub fn try_add_edge(&mut self, source: NodeId, target: NodeId) -> Option<EdgeId> {
        if let Err(reason) = self.check_edge(source, target) {
            tracing::debug!("Edge {} -> {} refused: {}", source, target, reason);
            return None;
        }

        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        self.edges.push(Edge { id, source, target });
        tracing::debug!("Edge {} committed: {} -> {}", id, source, target);

        self.notify();
        Some(id)
    }

    /// Remove every selected element that is an edge
    ///
    /// Selected nodes are left untouched. Returns the number of edges
    /// removed. A single notification fires per batch, unconditionally: a
    /// selection holding no committed edges still resends the unchanged
    /// edge set.
    pub fn remove_selected_edges(&mut self, selection: &[GraphElement]) -> usize {
        let selected: Vec<EdgeId> = selection
            .iter()
            .filter_map(|el| match el {
                GraphElement::Edge(id) => Some(*id),
                GraphElement::Node(_) => None,
            })
            .collect();

        let before = self.edges.len();
        self.edges.retain(|e| !selected.contains(&e.id));
        let removed = before - self.edges.len();

        if removed > 0 {
            tracing::debug!("Removed {} edge(s) from selection", removed);
        }
        self.notify();
        removed
    }

    /// Serialize the committed edge set
    ///
    /// Entries are in edge insertion order. An endpoint whose id no longer
    /// resolves serializes as `null`; committed edges cannot dangle, so this
    /// only exercises the wire shape's tolerance.
    pub fn snapshot(&self) -> EdgeSnapshot {
        let nodes = self
            .edges
            .iter()
            .map(|e| EdgeEntry {
                source: self.node(e.source).map(|n| n.label.as_str().to_string()),
                target: self.node(e.target).map(|n| n.label.as_str().to_string()),
            })
            .collect();
        EdgeSnapshot { nodes }
    }

    /// Derive the ordered operator chain rooted at the camera
    ///
    /// Walks predecessor edges backward from the camera node: edges
    /// `{3 -> camera, 2 -> 3, 1 -> 2}` yield `[1, 2, 3]` in processing
    /// order. The walk terminates because every node has at most one
    /// outgoing edge, so no source can reappear at a later step.
    pub fn process_chain(&self) -> Vec<NodeLabel> {
        let mut chain = Vec::new();
        let mut successor = NodeLabel::Camera;

        while let Some(preceding) = self.preceding(successor) {
            chain.push(preceding);
            successor = preceding;
        }
        chain.reverse();
        chain
    }

    /// The label of the node with an edge into the node labeled `successor`
    fn preceding(&self, successor: NodeLabel) -> Option<NodeLabel> {
        let target = self.node_by_label(successor)?.id;
        let edge = self.edges.iter().find(|e| e.target == target)?;
        self.node(edge.source).map(|n| n.label)
    }

    fn notify(&mut self) {
        let snapshot = self.snapshot();
        if let Some(subscriber) = self.subscriber.as_mut() {
            subscriber.topology_changed(&snapshot);
        }
    }
}

impl Default for ConnectionGraph {
    fn default() -> Self {
        Self::new()
    }
}
