//! Transport multiplexer.
//!
//! One duplex connection carries synchronous request/reply traffic and
//! asynchronous input events. The inbound stream interleaves both, so the
//! [`Multiplexer`] has two read modes:
//!
//! 1. **Direct**: before any window is open, [`Multiplexer::send_request`]
//!    reads the connection itself. Events met along the way are routed
//!    through the [`SceneRegistry`].
//! 2. **Classification**: after the first window opens, a dedicated task owns
//!    the read half. It routes events to windows and hands every other reply
//!    to the request currently in flight through the stray-reply queue.
//!
//! The switch is one-way. All requests across all windows pass through a
//! single admission gate, so at most one request is ever waiting for a reply.

pub mod registry;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tracing::{debug, error, info, trace, warn};

use crate::app::AppConfig;
use crate::error::{Error, Result};
use crate::protocol::{decode_reply, encode_request, read_frame, write_frame, LayerId, Reply, Request};
use crate::shutdown::{QuitReason, Shutdown};

pub use registry::{SceneRegistry, WindowMessage};

/// Readiness token the window server sends after the handshake.
pub const READY_TOKEN: &[u8; 5] = b"READY";

/// Boxed read half of the connection.
pub type BoxReader = Box<dyn AsyncRead + Send + Unpin>;
/// Boxed write half of the connection.
pub type BoxWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// State owned by whoever holds the admission gate.
struct RequestSlot {
    strays: UnboundedReceiver<Reply>,
}

/// Clears the in-flight flag when a request finishes, however it finishes.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::Release);
        Self(flag)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Request/reply and event multiplexing over one connection.
pub struct Multiplexer {
    writer: Mutex<BoxWriter>,
    /// Read half while in direct mode; `None` once classification started.
    direct: Mutex<Option<BoxReader>>,
    /// The admission gate.
    slot: Mutex<RequestSlot>,
    strays_tx: UnboundedSender<Reply>,
    in_flight: AtomicBool,
    loop_ended: AtomicBool,
    registry: Arc<SceneRegistry>,
    shutdown: Shutdown,
    poll_interval: Duration,
    max_attempts: u32,
}

impl Multiplexer {
    /// Wrap an already-connected reader and writer.
    pub fn new(
        reader: BoxReader,
        writer: BoxWriter,
        registry: Arc<SceneRegistry>,
        shutdown: Shutdown,
        config: &AppConfig,
    ) -> Arc<Self> {
        let (strays_tx, strays) = mpsc::unbounded_channel();
        Arc::new(Self {
            writer: Mutex::new(writer),
            direct: Mutex::new(Some(reader)),
            slot: Mutex::new(RequestSlot { strays }),
            strays_tx,
            in_flight: AtomicBool::new(false),
            loop_ended: AtomicBool::new(false),
            registry,
            shutdown,
            poll_interval: config.poll_interval,
            max_attempts: config.max_attempts.max(1),
        })
    }

    /// Perform the handshake on `stream` and wrap it.
    ///
    /// Writes `pid` as 4 little-endian bytes, then expects exactly the
    /// `READY` token back.
    pub async fn handshake<S>(
        stream: S,
        pid: u32,
        registry: Arc<SceneRegistry>,
        shutdown: Shutdown,
        config: &AppConfig,
    ) -> Result<Arc<Self>>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (mut reader, mut writer) = tokio::io::split(stream);

        writer.write_all(&pid.to_le_bytes()).await?;
        writer.flush().await?;

        let mut token = [0u8; 5];
        reader.read_exact(&mut token).await.map_err(|err| match err.kind() {
            std::io::ErrorKind::UnexpectedEof => Error::ConnectionClosed,
            _ => Error::Io(err),
        })?;
        if &token != READY_TOKEN {
            return Err(Error::Handshake { received: String::from_utf8_lossy(&token).into_owned() });
        }

        info!(pid, "connected to window server");
        Ok(Self::new(Box::new(reader), Box::new(writer), registry, shutdown, config))
    }

    /// Send a request and wait for the layer id in its acknowledgement.
    ///
    /// `Repeat`, unexpected replies, undecodable frames and (in
    /// classification mode) poll timeouts all resend the request, up to the
    /// configured number of attempts.
    pub async fn send_request(&self, request: &Request) -> Result<LayerId> {
        let payload = encode_request(request);

        let mut slot = self.slot.lock().await;
        let _in_flight = InFlight::raise(&self.in_flight);
        while let Ok(stale) = slot.strays.try_recv() {
            debug!(?stale, "discarding stale reply");
        }

        for attempt in 1..=self.max_attempts {
            trace!(request = request.name(), layer = ?request.layer(), attempt, "sending request");
            self.write_payload(&payload).await?;

            match self.next_reply(&mut slot).await? {
                Some(reply) => match reply.acknowledged() {
                    Some(id) => {
                        trace!(request = request.name(), %id, attempt, "request acknowledged");
                        return Ok(id);
                    }
                    None => debug!(request = request.name(), ?reply, "resending request"),
                },
                None => debug!(request = request.name(), attempt, "no usable reply, resending"),
            }
        }

        warn!(request = request.name(), attempts = self.max_attempts, "request gave up");
        Err(Error::Timeout { attempts: self.max_attempts })
    }

    /// Start the inbound classification loop. Returns `false` if it had
    /// already been started.
    pub async fn start_classification(self: &Arc<Self>) -> bool {
        let reader = self.direct.lock().await.take();
        let Some(reader) = reader else {
            return false;
        };
        let mux = Arc::clone(self);
        tokio::spawn(async move { mux.classify(reader).await });
        true
    }

    /// Whether the classification loop owns the read half.
    pub async fn is_classifying(&self) -> bool {
        self.direct.lock().await.is_none()
    }

    /// Whether a request currently holds the admission gate.
    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn registry(&self) -> &Arc<SceneRegistry> {
        &self.registry
    }

    // -----------------------------------------------------------------------
    // internals
    // -----------------------------------------------------------------------

    async fn write_payload(&self, payload: &[u8]) -> Result<()> {
        let mut writer = self.writer.lock().await;
        write_frame(&mut **writer, payload).await
    }

    /// Wait for the next non-event reply. `Ok(None)` means "resend".
    async fn next_reply(&self, slot: &mut RequestSlot) -> Result<Option<Reply>> {
        {
            let mut direct = self.direct.lock().await;
            if let Some(reader) = direct.as_mut() {
                return self.read_direct(reader).await;
            }
        }

        if self.loop_ended.load(Ordering::Acquire) {
            return Err(Error::ConnectionClosed);
        }
        match tokio::time::timeout(self.poll_interval, slot.strays.recv()).await {
            Ok(Some(reply)) => Ok(Some(reply)),
            Ok(None) => Err(Error::ConnectionClosed),
            Err(_elapsed) => Ok(None),
        }
    }

    async fn read_direct(&self, reader: &mut BoxReader) -> Result<Option<Reply>> {
        loop {
            let Some(frame) = read_frame(reader).await? else {
                return Err(Error::ConnectionClosed);
            };
            match decode_reply(&frame) {
                Ok(Reply::Event(event)) => {
                    self.registry.dispatch(event);
                }
                Ok(reply) => return Ok(Some(reply)),
                Err(err) => {
                    warn!(%err, "undecodable reply");
                    return Ok(None);
                }
            }
        }
    }

    async fn classify(self: Arc<Self>, mut reader: BoxReader) {
        info!("inbound classification started");
        let mut stop = self.shutdown.subscribe();

        let reason = loop {
            let frame = tokio::select! {
                frame = read_frame(&mut reader) => frame,
                _ = stop.wait() => {
                    debug!("classification loop stopping on shutdown");
                    self.loop_ended.store(true, Ordering::Release);
                    return;
                }
            };
            match frame {
                Ok(Some(bytes)) => self.classify_frame(&bytes),
                Ok(None) => {
                    info!("window server closed the connection");
                    break QuitReason::EndOfStream;
                }
                Err(err) => {
                    error!(%err, "transport failed");
                    break QuitReason::TransportFailed(err.to_string());
                }
            }
        };

        self.loop_ended.store(true, Ordering::Release);
        self.shutdown.trigger(reason);
    }

    fn classify_frame(&self, bytes: &[u8]) {
        match decode_reply(bytes) {
            Ok(Reply::Event(event)) => {
                self.registry.dispatch(event);
            }
            Ok(reply) if self.in_flight() => {
                let _ = self.strays_tx.send(reply);
            }
            Ok(reply) => debug!(?reply, "dropping reply with no request in flight"),
            Err(err) => warn!(%err, "ignoring undecodable frame"),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
