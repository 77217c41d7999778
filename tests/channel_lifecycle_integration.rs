//! Integration tests for the stream channel lifecycle
//!
//! These tests validate the complete channel workflow over the mock
//! transport:
//! - Connection, frame delivery, and shutdown
//! - Outbound command payloads on the wire
//! - Frame-handle release across replacement and teardown

use pipeview::channel::{
    ChannelEvent, LatestFrameSink, MockTransport, StreamBackend,
};
use pipeview::session::{EditorSession, KeyCombo};
use pipeview::graph::GraphElement;
use pipeview::types::{ConnectionStatus, NodeLabel};
use std::sync::{Arc, Mutex};
use std::thread;

fn frame(seed: u8, len: usize) -> Vec<u8> {
    // Arbitrary non-empty JPEG-ish payload
    let mut bytes = vec![0xFF, 0xD8];
    bytes.extend(std::iter::repeat(seed).take(len));
    bytes
}

#[test]
fn test_stream_to_sink_end_to_end() {
    let mut transport = MockTransport::new();
    transport.queue_binary(frame(1, 10));
    transport.queue_binary(frame(2, 20));
    transport.queue_binary(frame(3, 30));
    transport.queue_close();

    let sink = Arc::new(Mutex::new(LatestFrameSink::new()));
    let (backend, handle) = StreamBackend::new(Box::new(transport), Box::new(sink.clone()));
    let releases = backend.release_counter();
    let worker = thread::spawn(move || backend.run());

    handle.connect("mock://stream");

    // Collect events until the peer close surfaces
    let mut seqs = Vec::new();
    for event in handle.receiver.iter() {
        match event {
            ChannelEvent::FrameReceived { seq, .. } => seqs.push(seq),
            ChannelEvent::Status(ConnectionStatus::Disconnected) => break,
            _ => {}
        }
    }
    assert_eq!(seqs, vec![0, 1, 2]);

    {
        let sink = sink.lock().unwrap();
        assert_eq!(sink.presented(), 3);
        let current = sink.current().unwrap();
        assert_eq!(current.seq(), 2);
        assert_eq!(current.len(), 32);
    }
    // Two frames replaced so far, the last still installed
    assert_eq!(releases.count(), 2);

    handle.shutdown();
    worker.join().unwrap();

    // Teardown released the final frame
    assert_eq!(releases.count(), 3);
    assert!(sink.lock().unwrap().current().is_none());
}

#[test]
fn test_number_and_edges_on_the_wire() {
    let transport = MockTransport::new();
    let sent = transport.sent_log();

    let (backend, handle) =
        StreamBackend::new(Box::new(transport), Box::new(LatestFrameSink::new()));
    let worker = thread::spawn(move || backend.run());

    let mut session = EditorSession::new(handle);
    session.connect("mock://stream");
    session.send_number(5);

    let canny = session.graph().node_by_label(NodeLabel::Canny).unwrap().id;
    let camera = session.graph().node_by_label(NodeLabel::Camera).unwrap().id;
    let edge = session.try_connect(canny, camera).unwrap();
    session.handle_key(KeyCombo::DELETE_EDGES, &[GraphElement::Edge(edge)]);

    session.channel().shutdown();
    worker.join().unwrap();

    let sent = sent.lock().unwrap();
    assert_eq!(
        sent.as_slice(),
        [
            r#"{"number":5}"#,
            r#"{"nodes":[{"source":"canny","target":"camera"}]}"#,
            r#"{"nodes":[]}"#,
        ]
    );
}

#[test]
fn test_failed_connect_surfaces_error_and_stays_idle() {
    let transport = MockTransport::new().with_fail_connect();
    let connects = transport.connect_counter();

    let (backend, handle) =
        StreamBackend::new(Box::new(transport), Box::new(LatestFrameSink::new()));
    let worker = thread::spawn(move || backend.run());

    handle.connect("mock://nowhere");

    let mut saw_error = false;
    for event in handle.receiver.iter() {
        if let ChannelEvent::Status(ConnectionStatus::Error) = event {
            saw_error = true;
            break;
        }
    }
    assert!(saw_error, "Should surface an error status");

    // No automatic retry: exactly the one attempt we requested
    assert_eq!(*connects.lock().unwrap(), 1);

    // The reconnect seam: a second explicit connect drives another attempt
    handle.connect("mock://nowhere");
    for event in handle.receiver.iter() {
        if let ChannelEvent::Status(ConnectionStatus::Error) = event {
            break;
        }
    }
    assert_eq!(*connects.lock().unwrap(), 2);

    handle.shutdown();
    worker.join().unwrap();
}

#[test]
fn test_late_frames_reach_sink_via_feed() {
    let transport = MockTransport::new();
    let feed = transport.event_feed();

    let sink = Arc::new(Mutex::new(LatestFrameSink::new()));
    let (backend, handle) = StreamBackend::new(Box::new(transport), Box::new(sink.clone()));
    let worker = thread::spawn(move || backend.run());

    handle.connect("mock://stream");
    // Feed a frame only after the connection is up
    for event in handle.receiver.iter() {
        if matches!(event, ChannelEvent::Status(ConnectionStatus::Connected)) {
            break;
        }
    }
    feed.lock()
        .unwrap()
        .push_back(pipeview::channel::TransportEvent::Binary(frame(9, 5)));

    for event in handle.receiver.iter() {
        if matches!(event, ChannelEvent::FrameReceived { .. }) {
            break;
        }
    }
    assert_eq!(sink.lock().unwrap().presented(), 1);

    handle.shutdown();
    worker.join().unwrap();
}
