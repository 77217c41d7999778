//! Integration tests for graph topology and snapshot notifications
//!
//! These tests validate the admission-control rules end to end:
//! - Degree constraints over arbitrary edit sequences
//! - The camera-as-source prohibition
//! - Exactly one snapshot per commit or delete batch, none for rejections

use pipeview::graph::{ConnectionGraph, GraphElement, TopologySubscriber};
use pipeview::types::{NodeId, NodeLabel};
use pipeview::wire::EdgeSnapshot;
use proptest::prelude::*;
use std::sync::{Arc, Mutex};

/// Subscriber that records every snapshot it is handed
#[derive(Clone, Default)]
struct RecordingSubscriber {
    snapshots: Arc<Mutex<Vec<EdgeSnapshot>>>,
}

impl RecordingSubscriber {
    fn new() -> (Self, Arc<Mutex<Vec<EdgeSnapshot>>>) {
        let sub = Self::default();
        let snapshots = sub.snapshots.clone();
        (sub, snapshots)
    }
}

impl TopologySubscriber for RecordingSubscriber {
    fn topology_changed(&mut self, snapshot: &EdgeSnapshot) {
        self.snapshots
            .lock()
            .expect("snapshot lock")
            .push(snapshot.clone());
    }
}

fn by_label(graph: &ConnectionGraph, label: NodeLabel) -> NodeId {
    graph.node_by_label(label).unwrap().id
}

#[test]
fn camera_source_asymmetry() {
    // Camera is the conceptual pipeline root, yet may never be an edge's
    // source; as a target it is fair game.
    let mut graph = ConnectionGraph::new();
    let camera = by_label(&graph, NodeLabel::Camera);
    let canny = by_label(&graph, NodeLabel::Canny);

    assert!(graph.try_add_edge(camera, canny).is_none());
    assert!(graph.try_add_edge(canny, camera).is_some());
}

#[test]
fn one_snapshot_per_commit_none_per_rejection() {
    let mut graph = ConnectionGraph::new();
    let (subscriber, snapshots) = RecordingSubscriber::new();
    graph.set_subscriber(Box::new(subscriber));

    let camera = by_label(&graph, NodeLabel::Camera);
    let canny = by_label(&graph, NodeLabel::Canny);
    let binary = by_label(&graph, NodeLabel::Binary);
    let text = by_label(&graph, NodeLabel::Text);

    let e1 = graph.try_add_edge(canny, camera).unwrap();
    graph.try_add_edge(binary, canny).unwrap();
    // Rejections: occupied source, occupied target, camera source
    assert!(graph.try_add_edge(canny, text).is_none());
    assert!(graph.try_add_edge(text, canny).is_none());
    assert!(graph.try_add_edge(camera, text).is_none());

    {
        let snapshots = snapshots.lock().unwrap();
        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].nodes.len(), 1);
        assert_eq!(snapshots[1].nodes.len(), 2);
        // Post-mutation edge set, in application order
        assert_eq!(snapshots[1].nodes[0].source.as_deref(), Some("canny"));
        assert_eq!(snapshots[1].nodes[1].source.as_deref(), Some("binary"));
    }

    // Batch removal fires once for the whole batch
    graph.remove_selected_edges(&[GraphElement::Edge(e1), GraphElement::Node(camera)]);
    {
        let snapshots = snapshots.lock().unwrap();
        assert_eq!(snapshots.len(), 3);
        assert_eq!(snapshots[2].nodes.len(), 1);
    }

    // A delete batch that removes nothing still resends the edge set
    graph.remove_selected_edges(&[GraphElement::Node(canny)]);
    {
        let snapshots = snapshots.lock().unwrap();
        assert_eq!(snapshots.len(), 4);
        assert_eq!(snapshots[3], snapshots[2]);
    }
}

#[test]
fn empty_delete_batch_resends_unchanged_snapshot() {
    let mut graph = ConnectionGraph::new();
    let (subscriber, snapshots) = RecordingSubscriber::new();
    graph.set_subscriber(Box::new(subscriber));

    let camera = by_label(&graph, NodeLabel::Camera);
    let canny = by_label(&graph, NodeLabel::Canny);
    graph.try_add_edge(canny, camera).unwrap();

    // Node-only selection: zero removals, one snapshot all the same
    assert_eq!(
        graph.remove_selected_edges(&[GraphElement::Node(camera)]),
        0
    );

    let snapshots = snapshots.lock().unwrap();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[1], snapshots[0]);
    assert_eq!(snapshots[1].nodes.len(), 1);
}

#[test]
fn removal_restores_admissibility() {
    let mut graph = ConnectionGraph::new();
    let canny = by_label(&graph, NodeLabel::Canny);
    let binary = by_label(&graph, NodeLabel::Binary);

    let edge = graph.try_add_edge(canny, binary).unwrap();
    assert!(graph.try_add_edge(canny, binary).is_none());

    graph.remove_selected_edges(&[GraphElement::Edge(edge)]);
    assert_eq!(graph.out_degree(canny), 0);
    assert_eq!(graph.in_degree(binary), 0);
    assert!(graph.try_add_edge(canny, binary).is_some());
}

#[test]
fn full_chain_snapshot_shape() {
    let mut graph = ConnectionGraph::new();
    let camera = by_label(&graph, NodeLabel::Camera);
    let canny = by_label(&graph, NodeLabel::Canny);
    let face = by_label(&graph, NodeLabel::Face);

    graph.try_add_edge(canny, camera).unwrap();
    graph.try_add_edge(face, canny).unwrap();

    let json = graph.snapshot().to_json().unwrap();
    assert_eq!(
        json,
        r#"{"nodes":[{"source":"canny","target":"camera"},{"source":"face","target":"canny"}]}"#
    );
    assert_eq!(
        graph.process_chain(),
        vec![NodeLabel::Face, NodeLabel::Canny]
    );
}

proptest! {
    /// After any sequence of attempted edges, every non-camera node holds
    /// at most one outgoing and one incoming edge, and the camera holds
    /// none outgoing.
    #[test]
    fn degree_invariant_over_random_edits(
        attempts in prop::collection::vec((0u32..11, 0u32..11), 0..64)
    ) {
        let mut graph = ConnectionGraph::new();
        for (s, t) in attempts {
            let _ = graph.try_add_edge(NodeId(s), NodeId(t));
        }

        for node in graph.nodes() {
            prop_assert!(graph.in_degree(node.id) <= 1);
            if node.label.is_camera() {
                prop_assert_eq!(graph.out_degree(node.id), 0);
            } else {
                prop_assert!(graph.out_degree(node.id) <= 1);
            }
        }
    }

    /// Random edits never produce a dangling snapshot entry
    #[test]
    fn snapshots_never_dangle(
        attempts in prop::collection::vec((0u32..16, 0u32..16), 0..64)
    ) {
        let mut graph = ConnectionGraph::new();
        for (s, t) in attempts {
            let _ = graph.try_add_edge(NodeId(s), NodeId(t));
        }
        for entry in graph.snapshot().nodes {
            prop_assert!(entry.source.is_some());
            prop_assert!(entry.target.is_some());
        }
    }
}
