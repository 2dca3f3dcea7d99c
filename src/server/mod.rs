//! Single-client HTTP status server.
//!
//! One connection at most is handled per main-loop iteration:
//!
//! ```text
//!   Idle ──(accept ready)──▶ ReadRequest ──▶ BuildResponse ──▶ SendResponse ──▶ Close ──▶ Idle
//!     ▲                                                                                   │
//!     └──────────────────────────────(WouldBlock: nothing pending)─────────────────────────┘
//! ```
//!
//! The listener is non-blocking, so an idle poll costs one syscall.  Once a
//! client is accepted, a single deadline of `request_timeout_ms` covers the
//! whole request read: however the client paces its bytes, reading stops
//! when the deadline passes.  The request is logged, never routed, and a
//! failed or cut-short read still gets the page.  A failed write closes the
//! connection and the loop carries on.
//!
//! Uses `std::net` on every target; ESP-IDF's std port maps it onto lwIP.

pub mod page;

use core::fmt;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::app::events::{AppEvent, StatusSnapshot};
use crate::app::ports::EventSink;
use crate::config::SystemConfig;

/// Longest request line kept for logging.
const MAX_REQUEST_LINE: u64 = 256;
/// Upper bound on header bytes discarded after the request line.
const MAX_HEADER_BYTES: u64 = 2048;

// ───────────────────────────────────────────────────────────────
// Error type
// ───────────────────────────────────────────────────────────────

/// Errors that prevent the server from listening at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerError {
    /// Could not bind the listening socket.
    Bind(io::ErrorKind),
    /// Could not switch the listener to non-blocking mode.
    NonBlocking(io::ErrorKind),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind(kind) => write!(f, "bind failed ({kind})"),
            Self::NonBlocking(kind) => write!(f, "set_nonblocking failed ({kind})"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Poll outcome
// ───────────────────────────────────────────────────────────────

/// What one [`StatusServer::poll_once`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No connection was pending.
    Idle,
    /// A full response was written and the connection closed.
    Served { bytes: usize },
    /// A client was accepted but dropped before the response went out.
    Dropped(&'static str),
}

// ───────────────────────────────────────────────────────────────
// StatusServer
// ───────────────────────────────────────────────────────────────

pub struct StatusServer {
    listener: TcpListener,
    refresh_ms: u32,
    request_timeout: Duration,
    served: u64,
}

impl StatusServer {
    /// Bind `0.0.0.0:<config.http_port>` in non-blocking mode.
    pub fn bind(config: &SystemConfig) -> Result<Self, ServerError> {
        Self::bind_port(config.http_port, config)
    }

    /// Bind an explicit port; `0` lets the OS pick one (see
    /// [`local_addr`](Self::local_addr)).
    pub fn bind_port(port: u16, config: &SystemConfig) -> Result<Self, ServerError> {
        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).map_err(|e| ServerError::Bind(e.kind()))?;
        listener
            .set_nonblocking(true)
            .map_err(|e| ServerError::NonBlocking(e.kind()))?;
        info!("Status server listening on port {}", port);

        Ok(Self {
            listener,
            refresh_ms: config.page_refresh_ms,
            request_timeout: Duration::from_millis(u64::from(config.request_timeout_ms)),
            served: 0,
        })
    }

    /// The actual bound address.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Responses fully written since boot.
    pub fn served(&self) -> u64 {
        self.served
    }

    /// Accept at most one pending client and serve it `snapshot`.
    pub fn poll_once(
        &mut self,
        snapshot: &StatusSnapshot,
        sink: &mut impl EventSink,
    ) -> PollOutcome {
        let (stream, peer) = match self.listener.accept() {
            Ok(conn) => conn,
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return PollOutcome::Idle,
            Err(e) => {
                warn!("Status server: accept error: {}", e);
                return PollOutcome::Idle;
            }
        };
        debug!("Status server: client {}", peer);

        let outcome = self.handle(&stream, snapshot);
        // Close regardless of how the exchange went.
        let _ = stream.shutdown(Shutdown::Both);

        match outcome {
            PollOutcome::Served { bytes } => {
                self.served += 1;
                sink.emit(&AppEvent::RequestServed { bytes });
            }
            PollOutcome::Dropped(reason) => {
                warn!("Status server: dropped {} ({})", peer, reason);
                sink.emit(&AppEvent::RequestFailed(reason));
            }
            PollOutcome::Idle => {}
        }
        outcome
    }

    fn handle(&self, stream: &TcpStream, snapshot: &StatusSnapshot) -> PollOutcome {
        let deadline = Instant::now() + self.request_timeout;
        // Some stacks hand out accepted sockets with the listener's
        // non-blocking flag; the exchange below relies on timeouts instead.
        if stream.set_nonblocking(false).is_err()
            || stream.set_write_timeout(Some(self.request_timeout)).is_err()
        {
            return PollOutcome::Dropped("socket setup");
        }

        // ── ReadRequest ───────────────────────────────────────
        let mut reader = BufReader::new(DeadlineReader { stream, deadline });
        let mut line = Vec::new();
        match (&mut reader).take(MAX_REQUEST_LINE).read_until(b'\n', &mut line) {
            Ok(_) => discard_headers(&mut reader),
            Err(e) => debug!("Status server: request read stopped: {}", e),
        }
        log_request_line(&String::from_utf8_lossy(&line));

        // ── BuildResponse / SendResponse ──────────────────────
        let response = page::render_response(snapshot, self.refresh_ms);
        let mut out = stream;
        if out.write_all(response.as_bytes()).and_then(|()| out.flush()).is_err() {
            return PollOutcome::Dropped("response write");
        }
        PollOutcome::Served {
            bytes: response.len(),
        }
    }
}

/// Socket reader that never waits past `deadline`, however many reads the
/// caller issues.
struct DeadlineReader<'a> {
    stream: &'a TcpStream,
    deadline: Instant,
}

impl Read for DeadlineReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let left = self.deadline.saturating_duration_since(Instant::now());
        if left.is_zero() {
            return Err(io::ErrorKind::TimedOut.into());
        }
        self.stream.set_read_timeout(Some(left))?;
        let mut stream = self.stream;
        stream.read(buf)
    }
}

fn log_request_line(line: &str) {
    let request = line.trim_end();
    if request.is_empty() {
        warn!("Status server: empty request");
    } else if !is_http_request_line(request) {
        warn!("Status server: malformed request line {:?}", request);
    } else {
        info!("Status server: {}", request);
    }
}

/// `METHOD SP target SP HTTP/x.y`, checked only for logging.
fn is_http_request_line(line: &str) -> bool {
    let mut parts = line.split(' ');
    matches!(
        (parts.next(), parts.next(), parts.next(), parts.next()),
        (Some(method), Some(_), Some(version), None)
            if !method.is_empty() && version.starts_with("HTTP/")
    )
}

/// Read and drop header lines up to the blank separator, at most
/// `MAX_HEADER_BYTES` in total.
fn discard_headers(reader: &mut impl BufRead) {
    let mut limited = reader.by_ref().take(MAX_HEADER_BYTES);
    let mut line = Vec::new();
    loop {
        line.clear();
        match limited.read_until(b'\n', &mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) if line.trim_ascii().is_empty() => break,
            Ok(_) => {}
        }
    }
}
