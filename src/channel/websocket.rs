//! WebSocket transport implementation
//!
//! Blocking tungstenite client with a read timeout on the underlying TCP
//! stream, so [`Transport::poll`] returns promptly when no message is
//! pending and the worker loop stays responsive to commands.

use crate::channel::transport::{Transport, TransportEvent};
use crate::error::{PipeViewError, Result};
use std::io::ErrorKind;
use std::net::TcpStream;
use std::time::Duration;
use tungstenite::stream::MaybeTlsStream;
use tungstenite::{Message, WebSocket};

/// Default read timeout for inbound polling
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(10);

/// WebSocket client transport
///
/// Binary messages arrive as raw byte buffers natively; no extra
/// negotiation is needed beyond the WebSocket handshake.
pub struct WebSocketTransport {
    socket: Option<WebSocket<MaybeTlsStream<TcpStream>>>,
    read_timeout: Duration,
}

impl WebSocketTransport {
    /// Create a transport with the default read timeout
    pub fn new() -> Self {
        Self::with_read_timeout(DEFAULT_READ_TIMEOUT)
    }

    /// Create a transport with an explicit read timeout
    pub fn with_read_timeout(read_timeout: Duration) -> Self {
        Self {
            socket: None,
            read_timeout,
        }
    }
}

impl Default for WebSocketTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for WebSocketTransport {
    fn connect(&mut self, endpoint: &str) -> Result<()> {
        let (socket, response) = tungstenite::connect(endpoint)?;
        tracing::info!(
            "WebSocket connection opened to {} ({})",
            endpoint,
            response.status()
        );

        if let MaybeTlsStream::Plain(stream) = socket.get_ref() {
            stream.set_read_timeout(Some(self.read_timeout))?;
        }

        self.socket = Some(socket);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    fn send_text(&mut self, payload: &str) -> Result<()> {
        let socket = self
            .socket
            .as_mut()
            .ok_or_else(|| PipeViewError::Channel("not connected".to_string()))?;
        socket.send(Message::Text(payload.into()))?;
        Ok(())
    }

    fn poll(&mut self) -> Result<Option<TransportEvent>> {
        let Some(socket) = self.socket.as_mut() else {
            return Ok(None);
        };

        match socket.read() {
            Ok(Message::Binary(data)) => Ok(Some(TransportEvent::Binary(data.to_vec()))),
            Ok(Message::Text(text)) => Ok(Some(TransportEvent::Text(text.to_string()))),
            Ok(Message::Close(_)) => {
                tracing::info!("WebSocket connection closed by peer");
                self.socket = None;
                Ok(Some(TransportEvent::Closed))
            }
            // Control frames are answered by tungstenite internally
            Ok(Message::Ping(_) | Message::Pong(_) | Message::Frame(_)) => Ok(None),
            Err(err) => match err {
                tungstenite::Error::Io(ref io)
                    if io.kind() == ErrorKind::WouldBlock || io.kind() == ErrorKind::TimedOut =>
                {
                    Ok(None)
                }
                tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed => {
                    tracing::info!("WebSocket connection closed");
                    self.socket = None;
                    Ok(Some(TransportEvent::Closed))
                }
                other => {
                    tracing::error!("WebSocket error: {}", other);
                    self.socket = None;
                    Err(other.into())
                }
            },
        }
    }

    fn close(&mut self) {
        if let Some(mut socket) = self.socket.take() {
            let _ = socket.close(None);
            let _ = socket.flush();
            tracing::info!("WebSocket connection closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_without_connection_fails() {
        let mut transport = WebSocketTransport::new();
        assert!(!transport.is_connected());
        let err = transport.send_text("{}").unwrap_err();
        assert!(err.to_string().contains("not connected"));
    }

    #[test]
    fn test_poll_without_connection_is_idle() {
        let mut transport = WebSocketTransport::new();
        assert!(matches!(transport.poll(), Ok(None)));
    }

    #[test]
    fn test_close_without_connection_is_noop() {
        let mut transport = WebSocketTransport::new();
        transport.close();
        assert!(!transport.is_connected());
    }
}
