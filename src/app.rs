//! Application: connection lifecycle, windows, key routing, shutdown.
//!
//! [`Application`] is a cheap-to-clone handle. It owns the [`Multiplexer`]
//! for the window-server connection, the [`SceneRegistry`] of open windows,
//! the active key sink, and the shutdown signal. Windows receive a clone when
//! they are opened.

use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::gesture::KeySink;
use crate::protocol::{LayerId, Request};
use crate::shutdown::{QuitReason, Shutdown};
use crate::transport::{Multiplexer, SceneRegistry};
use crate::window::Window;

/// Where the window server listens unless configured otherwise.
pub const DEFAULT_SOCKET_PATH: &str = "/tmp/fws.sock";

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Unix socket of the window server.
    pub socket_path: PathBuf,
    /// How long a request waits for its reply before it is resent, once
    /// windows are open.
    pub poll_interval: Duration,
    /// Sends per request before giving up with [`Error::Timeout`].
    pub max_attempts: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            poll_interval: Duration::from_millis(100),
            max_attempts: 32,
        }
    }
}

impl AppConfig {
    /// Create a new default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the socket path (builder).
    pub fn with_socket_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.socket_path = path.into();
        self
    }

    /// Set the reply poll interval (builder).
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Set the attempt limit (builder). Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

struct AppInner {
    mux: Arc<Multiplexer>,
    registry: Arc<SceneRegistry>,
    shutdown: Shutdown,
    key_sink: RwLock<Option<Arc<dyn KeySink>>>,
    pid: u32,
    config: AppConfig,
}

/// Handle to a connected application.
#[derive(Clone)]
pub struct Application {
    inner: Arc<AppInner>,
}

impl Application {
    /// Connect to the window server at `config.socket_path`.
    #[cfg(unix)]
    pub async fn connect(config: AppConfig) -> Result<Self> {
        debug!(path = %config.socket_path.display(), "connecting to window server");
        let stream = tokio::net::UnixStream::connect(&config.socket_path).await?;
        Self::with_stream(stream, config).await
    }

    /// Handshake over an already-open stream.
    pub async fn with_stream<S>(stream: S, config: AppConfig) -> Result<Self>
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let pid = std::process::id();
        let registry = Arc::new(SceneRegistry::new());
        let shutdown = Shutdown::new();
        let mux = Multiplexer::handshake(stream, pid, Arc::clone(&registry), shutdown.clone(), &config).await?;
        Ok(Self {
            inner: Arc::new(AppInner {
                mux,
                registry,
                shutdown,
                key_sink: RwLock::new(None),
                pid,
                config,
            }),
        })
    }

    /// Open `window`: obtain a layer, register it, draw the first frame and
    /// start its event loop.
    pub async fn open_window(&self, mut window: Window) -> Result<WindowHandle> {
        window.bind_app(self.clone());
        let id = window.request_layer_id().await?;

        let (inbox_tx, inbox) = mpsc::unbounded_channel();
        self.inner.registry.register(id, inbox_tx);
        if let Err(err) = window.build_content().await {
            self.inner.registry.unregister(id);
            return Err(err);
        }

        if self.inner.mux.start_classification().await {
            debug!("inbound classification started");
        }
        tokio::spawn(window.run(inbox, self.inner.shutdown.subscribe()));
        Ok(WindowHandle { id, registry: Arc::clone(&self.inner.registry) })
    }

    /// Send one request and wait for its acknowledgement.
    pub async fn send_request(&self, request: &Request) -> Result<LayerId> {
        self.inner.mux.send_request(request).await
    }

    /// Stop the application. Every window loop ends and [`run`](Self::run)
    /// returns.
    pub fn quit(&self) {
        if self.inner.shutdown.trigger(QuitReason::Requested) {
            info!("quit requested");
        }
    }

    /// Wait until the application stops.
    ///
    /// Returns the reason, or [`Error::TransportFailed`] if the connection
    /// broke.
    pub async fn run(&self) -> Result<QuitReason> {
        let reason = self.inner.shutdown.subscribe().wait().await;
        info!(?reason, "application stopped");
        match reason {
            QuitReason::TransportFailed(reason) => Err(Error::TransportFailed { reason }),
            reason => Ok(reason),
        }
    }

    /// Route keyboard input to `sink`, replacing the previous sink.
    pub fn set_key_sink(&self, sink: Arc<dyn KeySink>) {
        *self.inner.key_sink.write().unwrap_or_else(PoisonError::into_inner) = Some(sink);
    }

    pub fn clear_key_sink(&self) {
        *self.inner.key_sink.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn key_sink(&self) -> Option<Arc<dyn KeySink>> {
        self.inner.key_sink.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Process id announced in the handshake.
    pub fn pid(&self) -> u32 {
        self.inner.pid
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &Arc<SceneRegistry> {
        &self.inner.registry
    }

    pub fn shutdown(&self) -> &Shutdown {
        &self.inner.shutdown
    }

    pub fn is_running(&self) -> bool {
        !self.inner.shutdown.is_triggered()
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("pid", &self.inner.pid)
            .field("windows", &self.inner.registry.len())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// WindowHandle
// ---------------------------------------------------------------------------

/// Handle to an open window.
#[derive(Debug, Clone)]
pub struct WindowHandle {
    id: LayerId,
    registry: Arc<SceneRegistry>,
}

impl WindowHandle {
    pub fn layer_id(&self) -> LayerId {
        self.id
    }

    /// Ask the window to close. Returns `false` if it is no longer open.
    pub fn close(&self) -> bool {
        self.registry.request_close(self.id)
    }

    pub fn is_open(&self) -> bool {
        self.registry.contains(self.id)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::KeyEvent;
    use crate::gesture::EventContext;
    use crate::testing::FakeServer;
    use crate::view::Text;

    struct NullSink;

    impl KeySink for NullSink {
        fn handle_key(&self, _key: KeyEvent, _ctx: &mut EventContext) {}
    }

    // ── AppConfig ────────────────────────────────────────────────────

    #[test]
    fn config_defaults() {
        let config = AppConfig::new();
        assert_eq!(config.socket_path, PathBuf::from("/tmp/fws.sock"));
        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.max_attempts, 32);
    }

    #[test]
    fn config_builders() {
        let config = AppConfig::new()
            .with_socket_path("/run/fws.sock")
            .with_poll_interval(Duration::from_millis(5))
            .with_max_attempts(0);
        assert_eq!(config.socket_path, PathBuf::from("/run/fws.sock"));
        assert_eq!(config.poll_interval, Duration::from_millis(5));
        assert_eq!(config.max_attempts, 1);
    }

    // ── Application ──────────────────────────────────────────────────

    #[tokio::test]
    async fn handshake_announces_pid() {
        let (server, stream) = FakeServer::start();
        let app = Application::with_stream(stream, AppConfig::new()).await.unwrap();
        assert_eq!(server.pid(), Some(std::process::id()));
        assert_eq!(app.pid(), std::process::id());
        assert!(app.is_running());
    }

    #[tokio::test]
    async fn key_sink_is_replaced_and_cleared() {
        let (_server, stream) = FakeServer::start();
        let app = Application::with_stream(stream, AppConfig::new()).await.unwrap();
        assert!(app.key_sink().is_none());
        app.set_key_sink(Arc::new(NullSink));
        assert!(app.key_sink().is_some());
        app.clear_key_sink();
        assert!(app.key_sink().is_none());
    }

    #[tokio::test]
    async fn quit_ends_run_with_requested() {
        let (_server, stream) = FakeServer::start();
        let app = Application::with_stream(stream, AppConfig::new()).await.unwrap();
        let runner = app.clone();
        let run = tokio::spawn(async move { runner.run().await });
        app.quit();
        assert_eq!(run.await.unwrap().unwrap(), QuitReason::Requested);
        assert!(!app.is_running());
    }

    #[tokio::test]
    async fn open_window_registers_and_starts_classification() {
        let (server, stream) = FakeServer::start();
        let app = Application::with_stream(stream, AppConfig::new()).await.unwrap();
        let handle = app.open_window(Window::new("t", Text::new("hi"))).await.unwrap();

        assert!(handle.is_open());
        assert_eq!(app.registry().layers(), vec![handle.layer_id()]);
        let names: Vec<&str> = server.requests().iter().map(Request::name).collect();
        assert_eq!(names, vec!["new-window", "draw-fill", "render"]);
    }

    #[tokio::test]
    async fn server_hangup_ends_run() {
        let (server, stream) = FakeServer::start();
        let app = Application::with_stream(stream, AppConfig::new()).await.unwrap();
        app.open_window(Window::new("t", Text::new("hi"))).await.unwrap();
        server.hang_up();
        assert_eq!(app.run().await.unwrap(), QuitReason::EndOfStream);
    }
}
