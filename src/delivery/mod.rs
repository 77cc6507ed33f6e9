//! Delivery module - drives per-port attempts and aggregates their outcomes.
//!
//! Two policies exist:
//!
//! - **Fan-out** (`Target::All` with real data): every port is attempted,
//!   successes are collected and the last failure is remembered.
//! - **Short-circuit** (a single port, or any probe): ports are tried in
//!   order and the first success ends the call; failures are dropped.
//!
//! Ports are always attempted one at a time. An all-ports sweep therefore
//! takes at most `ports × connect_timeout`.

pub mod compress;
pub mod report;
pub mod transport;

pub use compress::compress;
pub use report::{AttemptOutcome, DeliveryMode, DeliveryReport, PortAttempt, FAILED_ALL};
pub use transport::TcpTransport;

use crate::config::Settings;
use crate::error::DeliveryResult;
use crate::types::{Payload, Port, PortSet, Target};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default establishment timeout for delivery attempts.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(800);
/// Default establishment timeout for reachability checks.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(400);

/// Reachability of one port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PortStatus {
    pub port: Port,
    pub reachable: bool,
}

/// Delivers payloads to the configured port set.
///
/// Holds no state between calls beyond its immutable configuration.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    ports: PortSet,
    transport: TcpTransport,
    connect_timeout: Duration,
    probe_timeout: Duration,
}

impl Dispatcher {
    /// Create a dispatcher over `ports` on loopback with default timeouts.
    pub fn new(ports: PortSet) -> Self {
        Self {
            ports,
            transport: TcpTransport::loopback(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Build from loaded settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.ports.clone())
            .with_connect_timeout(Duration::from_millis(settings.connect_timeout_ms))
            .with_probe_timeout(Duration::from_millis(settings.probe_timeout_ms))
    }

    /// Set the timeout used by `execute`/`deliver`.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the timeout used by `check_port`.
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    pub fn ports(&self) -> &PortSet {
        &self.ports
    }

    /// Deliver `payload` to `target` and report every attempt.
    pub async fn deliver(&self, payload: &Payload, target: Target) -> DeliveryReport {
        let working: Vec<Port> = match target {
            Target::All => self.ports.iter().collect(),
            Target::Single(port) => vec![port],
        };

        if target.is_all() && !payload.is_probe() {
            self.fan_out(payload, &working).await
        } else {
            self.short_circuit(payload, &working).await
        }
    }

    /// Deliver `payload` to `target`, returning the status line.
    pub async fn execute(&self, payload: &Payload, target: Target) -> String {
        self.deliver(payload, target).await.message()
    }

    /// String entry point: `code == "NULL"` probes, `target == "ALL"` fans out.
    ///
    /// An unparsable target fails like an unreachable port.
    pub async fn execute_raw(&self, code: &str, target: &str) -> String {
        match target.parse::<Target>() {
            Ok(target) => self.execute(&Payload::from_raw(code), target).await,
            Err(e) => {
                debug!(selector = target, error = %e, "invalid delivery target");
                FAILED_ALL.to_string()
            }
        }
    }

    /// Probe every port, stopping at the first one that accepts.
    pub async fn attach_any(&self) -> String {
        self.execute(&Payload::Probe, Target::All).await
    }

    /// Probe a single port.
    pub async fn attach_to_port(&self, port: Port) -> String {
        self.execute(&Payload::Probe, Target::Single(port)).await
    }

    /// Whether `port` accepts a connection within the probe timeout.
    pub async fn check_port(&self, port: Port) -> bool {
        match self.transport.connect(port, self.probe_timeout).await {
            Ok(stream) => {
                transport::close(stream).await;
                true
            }
            Err(e) => {
                debug!(%port, error = %e, "port check failed");
                false
            }
        }
    }

    /// `check_port` for a raw port string; unparsable input is unreachable.
    pub async fn check_port_raw(&self, port: &str) -> bool {
        match port.parse::<Port>() {
            Ok(port) => self.check_port(port).await,
            Err(_) => false,
        }
    }

    /// Check every configured port in order.
    pub async fn port_status(&self) -> Vec<PortStatus> {
        let mut statuses = Vec::with_capacity(self.ports.len());
        for port in self.ports.iter() {
            let reachable = self.check_port(port).await;
            statuses.push(PortStatus { port, reachable });
        }
        statuses
    }

    async fn fan_out(&self, payload: &Payload, ports: &[Port]) -> DeliveryReport {
        let mut report = DeliveryReport::new(DeliveryMode::FanOut);

        for &port in ports {
            let outcome = AttemptOutcome::from(self.attempt(port, payload).await);
            match outcome.error() {
                None => info!(%port, "payload delivered"),
                Some(err) => warn!(%port, error = err, "delivery failed"),
            }
            report.record(port, outcome);
        }

        report
    }

    async fn short_circuit(&self, payload: &Payload, ports: &[Port]) -> DeliveryReport {
        let mut report = DeliveryReport::new(DeliveryMode::ShortCircuit);

        for &port in ports {
            let outcome = AttemptOutcome::from(self.attempt(port, payload).await);
            let done = outcome.is_success();
            if done {
                info!(%port, probe = payload.is_probe(), "connected");
            } else {
                debug!(%port, outcome = %outcome, "attempt failed");
            }
            report.record(port, outcome);
            if done {
                break;
            }
        }

        report
    }

    /// One connect, optional compress and write, then close.
    async fn attempt(&self, port: Port, payload: &Payload) -> DeliveryResult<()> {
        let stream = self.transport.connect(port, self.connect_timeout).await?;

        let Some(text) = payload.text() else {
            transport::close(stream).await;
            return Ok(());
        };

        match compress(text) {
            Ok(bytes) => transport::send_and_close(stream, &bytes).await,
            Err(e) => {
                transport::close(stream).await;
                Err(e)
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(PortSet::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::Read;
    use std::time::Instant;
    use tokio::io::AsyncReadExt;
    use tokio::net::{TcpListener, TcpSocket, TcpStream};
    use tokio::task::JoinHandle;

    /// A service instance that records what each connection sent.
    struct Listener {
        port: Port,
        received: JoinHandle<Vec<Vec<u8>>>,
    }

    impl Listener {
        async fn spawn(connections: usize) -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
            let received = tokio::spawn(async move {
                let mut all = Vec::new();
                for _ in 0..connections {
                    let (mut socket, _) = listener.accept().await.unwrap();
                    let mut buf = Vec::new();
                    socket.read_to_end(&mut buf).await.unwrap();
                    all.push(buf);
                }
                all
            });
            Self { port, received }
        }

        async fn received(self) -> Vec<Vec<u8>> {
            self.received.await.unwrap()
        }
    }

    async fn closed_port() -> Port {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
        drop(listener);
        port
    }

    /// A listener whose accept queue is already full, so new SYNs are
    /// dropped and connects hang until they time out.
    async fn saturated_port() -> (Port, TcpListener, TcpStream) {
        let socket = TcpSocket::new_v4().unwrap();
        socket.bind("127.0.0.1:0".parse().unwrap()).unwrap();
        let listener = socket.listen(0).unwrap();
        let addr = listener.local_addr().unwrap();
        let filler = TcpStream::connect(addr).await.unwrap();
        (Port::new(addr.port()).unwrap(), listener, filler)
    }

    /// Text that barely compresses, so the wire payload stays large.
    fn noisy_script(len: usize) -> String {
        const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789+/";
        let mut state: u32 = 0x2545_f491;
        (0..len)
            .map(|_| {
                state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                ALPHABET[(state >> 26) as usize] as char
            })
            .collect()
    }

    fn inflate(bytes: &[u8]) -> String {
        let mut out = String::new();
        ZlibDecoder::new(bytes).read_to_string(&mut out).unwrap();
        out
    }

    fn dispatcher(ports: &[Port]) -> Dispatcher {
        Dispatcher::new(PortSet::new(ports.iter().copied()).unwrap())
    }

    #[tokio::test]
    async fn test_single_port_delivers_compressed_script() {
        let listener = Listener::spawn(1).await;
        let d = dispatcher(&[listener.port]);
        let script = "print('hello from potash')";

        let msg = d.execute(&Payload::data(script), listener.port.into()).await;

        assert_eq!(
            msg,
            format!("Successfully connected to Opiumware on port: {}", listener.port)
        );
        let received = listener.received().await;
        assert_eq!(inflate(&received[0]), script);
    }

    #[tokio::test]
    async fn test_probe_sends_no_bytes() {
        let listener = Listener::spawn(1).await;
        let d = dispatcher(&[listener.port]);
        let port = listener.port;

        let msg = d.execute_raw("NULL", &port.to_string()).await;

        assert_eq!(msg, format!("Successfully connected to Opiumware on port: {}", port));
        assert!(listener.received().await[0].is_empty());
    }

    #[tokio::test]
    async fn test_typed_null_text_is_delivered() {
        let listener = Listener::spawn(1).await;
        let d = dispatcher(&[listener.port]);

        d.execute(&Payload::data("NULL"), listener.port.into()).await;

        assert_eq!(inflate(&listener.received().await[0]), "NULL");
    }

    #[tokio::test]
    async fn test_fan_out_reports_every_reachable_port() {
        let a = closed_port().await;
        let first = Listener::spawn(1).await;
        let b = closed_port().await;
        let second = Listener::spawn(1).await;
        let d = dispatcher(&[a, first.port, b, second.port]);

        let report = d.deliver(&Payload::data("hello"), Target::All).await;

        assert_eq!(report.mode, DeliveryMode::FanOut);
        assert_eq!(report.attempts.len(), 4);
        assert_eq!(report.succeeded(), vec![first.port, second.port]);
        assert_eq!(report.errors().len(), 2);
        assert_eq!(
            report.message(),
            format!("Successfully executed on ports: {}, {}", first.port, second.port)
        );
        assert_eq!(inflate(&first.received().await[0]), "hello");
        assert_eq!(inflate(&second.received().await[0]), "hello");
    }

    #[tokio::test]
    async fn test_fan_out_single_success_message() {
        let a = closed_port().await;
        let listener = Listener::spawn(1).await;
        let d = dispatcher(&[a, listener.port]);

        let msg = d.execute_raw("hello", "ALL").await;

        assert_eq!(
            msg,
            format!("Successfully connected to Opiumware on port: {}", listener.port)
        );
    }

    #[tokio::test]
    async fn test_fan_out_failure_keeps_last_error() {
        let a = closed_port().await;
        let b = closed_port().await;
        let d = dispatcher(&[a, b]);

        let report = d.deliver(&Payload::data("hello"), Target::All).await;
        let msg = report.message();

        assert!(!report.is_success());
        assert!(msg.starts_with("Failed to connect on all ports: "));
        assert!(msg.contains(&format!("127.0.0.1:{}", b)));
        assert_eq!(report.errors()[0].0, a);
    }

    #[tokio::test]
    async fn test_fan_out_continues_past_timed_out_port() {
        let (stuck, _listener, _filler) = saturated_port().await;
        let live = Listener::spawn(1).await;
        let limit = Duration::from_millis(300);
        let d = dispatcher(&[stuck, live.port]).with_connect_timeout(limit);

        let start = Instant::now();
        let report = d.deliver(&Payload::data("hello"), Target::All).await;
        let elapsed = start.elapsed();

        assert!(matches!(report.attempts[0].outcome, AttemptOutcome::TimedOut(_)));
        assert_eq!(report.attempts[1].outcome, AttemptOutcome::Connected);
        assert!(elapsed >= limit);
        assert!(elapsed < limit * 2 + Duration::from_millis(500));
        assert_eq!(
            report.message(),
            format!("Successfully connected to Opiumware on port: {}", live.port)
        );
        assert_eq!(inflate(&live.received().await[0]), "hello");
    }

    #[tokio::test]
    async fn test_fan_out_timeout_becomes_last_error() {
        let (stuck, _listener, _filler) = saturated_port().await;
        let d = dispatcher(&[stuck]).with_connect_timeout(Duration::from_millis(200));

        let report = d.deliver(&Payload::data("hello"), Target::All).await;

        assert!(!report.is_success());
        assert!(report.message().ends_with("timed out after 200ms"));
        assert_eq!(
            report.last_error.as_deref(),
            Some(format!("connect to 127.0.0.1:{} timed out after 200ms", stuck).as_str())
        );
    }

    // Multi-threaded so the peer can reset while the large payload is
    // still being compressed.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_fan_out_reports_write_error_on_reset() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = Port::new(listener.local_addr().unwrap().port()).unwrap();
        let peer = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            #[allow(deprecated)]
            socket.set_linger(Some(Duration::ZERO)).unwrap();
            drop(socket);
        });
        let d = dispatcher(&[port]);

        let report = d.deliver(&Payload::data(noisy_script(4 << 20)), Target::All).await;
        peer.await.unwrap();

        assert!(matches!(report.attempts[0].outcome, AttemptOutcome::WriteError(_)));
        assert!(report
            .last_error
            .as_deref()
            .is_some_and(|err| err.starts_with(&format!("write to 127.0.0.1:{} failed", port))));
        assert!(report.message().starts_with("Failed to connect on all ports: write to"));
    }

    #[tokio::test]
    async fn test_single_port_failure_has_no_detail() {
        let port = closed_port().await;
        let d = dispatcher(&[port]);

        assert_eq!(d.execute_raw("hello", &port.to_string()).await, FAILED_ALL);
    }

    #[tokio::test]
    async fn test_probe_all_stops_at_first_reachable() {
        let a = closed_port().await;
        let b = closed_port().await;
        // The reachable port is probed twice below.
        let first = Listener::spawn(2).await;
        let second = Listener::spawn(1).await;
        let d = dispatcher(&[a, b, first.port, second.port]);

        let report = d.deliver(&Payload::Probe, Target::All).await;

        assert_eq!(report.mode, DeliveryMode::ShortCircuit);
        assert_eq!(report.attempts.len(), 3);
        assert!(report.last_error.is_none());
        assert_eq!(
            d.attach_any().await,
            format!("Successfully connected to Opiumware on port: {}", first.port)
        );
        second.received.abort();
    }

    #[tokio::test]
    async fn test_attach_to_port() {
        let listener = Listener::spawn(1).await;
        let closed = closed_port().await;
        let d = dispatcher(&[listener.port, closed]);

        let msg = d.attach_to_port(listener.port).await;
        assert!(msg.ends_with(&listener.port.to_string()));
        assert_eq!(d.attach_to_port(closed).await, FAILED_ALL);
    }

    #[tokio::test]
    async fn test_invalid_target_string_fails_quietly() {
        let d = Dispatcher::default();
        assert_eq!(d.execute_raw("hello", "abc").await, FAILED_ALL);
        assert_eq!(d.execute_raw("hello", "0").await, FAILED_ALL);
        assert!(!d.check_port_raw("not-a-port").await);
    }

    #[tokio::test]
    async fn test_check_port_is_stable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open = Port::new(listener.local_addr().unwrap().port()).unwrap();
        let closed = closed_port().await;
        let d = dispatcher(&[open, closed]);

        for _ in 0..3 {
            assert!(d.check_port(open).await);
            assert!(!d.check_port(closed).await);
        }
        assert!(d.check_port_raw(&open.to_string()).await);

        let statuses = d.port_status().await;
        assert_eq!(
            statuses,
            vec![
                PortStatus { port: open, reachable: true },
                PortStatus { port: closed, reachable: false },
            ]
        );
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            ports: "9000-9001".parse().unwrap(),
            connect_timeout_ms: 250,
            probe_timeout_ms: 100,
        };
        let d = Dispatcher::from_settings(&settings);

        assert_eq!(d.ports().len(), 2);
        assert_eq!(d.connect_timeout, Duration::from_millis(250));
        assert_eq!(d.probe_timeout, Duration::from_millis(100));
    }
}
