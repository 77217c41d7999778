//! pipeview - Main Entry Point
//!
//! Headless viewer for a live camera-frame stream: connects to the
//! configured endpoint, applies the configured initial pipeline through the
//! graph's admission control, and logs stream activity until the connection
//! ends. No reconnect is attempted; an external supervisor can restart the
//! process or drive another connect.

use pipeview::channel::{
    ChannelEvent, LatestFrameSink, MockTransport, StreamBackend, Transport, WebSocketTransport,
};
use pipeview::config::AppConfig;
use pipeview::session::EditorSession;
use pipeview::types::ConnectionStatus;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pipeview=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting pipeview");

    let config = AppConfig::load_or_default();

    let transport: Box<dyn Transport> = if config.stream.use_mock {
        tracing::info!("Using mock transport");
        Box::new(MockTransport::new())
    } else {
        Box::new(WebSocketTransport::with_read_timeout(Duration::from_millis(
            config.stream.read_timeout_ms,
        )))
    };

    let sink = Arc::new(Mutex::new(LatestFrameSink::new()));
    let (backend, handle) = StreamBackend::new(transport, Box::new(sink.clone()));
    let worker = std::thread::spawn(move || backend.run());

    let mut session = EditorSession::new(handle);
    session.connect(&config.stream.endpoint_url);

    let committed = session.apply_pipeline(&config.pipeline);
    if !config.pipeline.edges.is_empty() {
        tracing::info!(
            "Applied initial pipeline: {}/{} edge(s) committed, chain: {:?}",
            committed,
            config.pipeline.edges.len(),
            session.graph().process_chain()
        );
    }

    // Drain events until the stream ends or errors out
    let mut last_stats = std::time::Instant::now();
    'outer: loop {
        match session
            .channel()
            .receiver
            .recv_timeout(Duration::from_secs(1))
        {
            Ok(ChannelEvent::Status(status)) => {
                tracing::info!("Stream status: {}", status);
                if matches!(
                    status,
                    ConnectionStatus::Disconnected | ConnectionStatus::Error
                ) {
                    break 'outer;
                }
            }
            Ok(ChannelEvent::TransportError(err)) => {
                tracing::warn!("Transport error: {}", err);
            }
            Ok(ChannelEvent::FrameReceived { seq, bytes }) => {
                tracing::debug!("Frame {} ({} bytes)", seq, bytes);
            }
            Ok(ChannelEvent::Stats(stats)) => {
                tracing::info!(
                    "Stream stats: {} frame(s), {} byte(s), {} snapshot(s) sent",
                    stats.frames_received,
                    stats.bytes_received,
                    stats.snapshots_sent
                );
            }
            Ok(ChannelEvent::Shutdown) => break 'outer,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => {
                if last_stats.elapsed() >= Duration::from_secs(10) {
                    session.channel().request_stats();
                    last_stats = std::time::Instant::now();
                }
            }
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break 'outer,
        }
    }

    tracing::info!("Shutting down...");
    session.channel().shutdown();
    let _ = worker.join();
}
