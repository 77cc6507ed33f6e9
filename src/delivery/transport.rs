//! Outbound TCP transport.
//!
//! One connection attempt per call, bounded by a timeout that only covers
//! establishment. Once connected the stream has no deadline.

use crate::error::{DeliveryError, DeliveryResult};
use crate::types::Port;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

/// TCP transport towards a single host.
///
/// Never retries; callers own the returned stream and must close it.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    host: IpAddr,
}

impl TcpTransport {
    /// Transport bound to `127.0.0.1`.
    pub fn loopback() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        }
    }

    /// Point the transport at another host.
    pub fn with_host(mut self, host: IpAddr) -> Self {
        self.host = host;
        self
    }

    pub fn host(&self) -> IpAddr {
        self.host
    }

    /// Socket address for a port on this host.
    pub fn addr(&self, port: Port) -> SocketAddr {
        SocketAddr::new(self.host, port.as_u16())
    }

    /// Open a connection, giving up after `limit`.
    pub async fn connect(&self, port: Port, limit: Duration) -> DeliveryResult<TcpStream> {
        let addr = self.addr(port);
        trace!(%addr, timeout_ms = limit.as_millis() as u64, "connecting");

        match timeout(limit, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                debug!(%addr, "connected");
                Ok(stream)
            }
            Ok(Err(e)) => Err(DeliveryError::Connection {
                addr,
                reason: e.to_string(),
            }),
            Err(_) => Err(DeliveryError::Timeout {
                addr,
                timeout_ms: limit.as_millis() as u64,
            }),
        }
    }
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::loopback()
    }
}

/// Write `bytes` in full, then close the stream whatever the outcome.
pub async fn send_and_close(mut stream: TcpStream, bytes: &[u8]) -> DeliveryResult<()> {
    let addr = peer_or_unspecified(&stream);
    let written = stream.write_all(bytes).await;
    close(stream).await;

    written.map_err(|e| DeliveryError::Write {
        addr,
        reason: e.to_string(),
    })?;
    trace!(%addr, bytes = bytes.len(), "payload written");
    Ok(())
}

/// Gracefully shut down the write half and release the socket.
pub async fn close(mut stream: TcpStream) {
    if let Err(e) = stream.shutdown().await {
        trace!(error = %e, "shutdown failed; dropping socket");
    }
}

fn peer_or_unspecified(stream: &TcpStream) -> SocketAddr {
    stream
        .peer_addr()
        .unwrap_or_else(|_| SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0))
}
