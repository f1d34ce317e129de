//! Application-wide shutdown signal.
//!
//! A [`Shutdown`] is triggered once, with the [`QuitReason`] that ended the
//! application. Window loops and [`Application::run`](crate::app::Application::run)
//! wait on a [`ShutdownListener`].

use std::sync::Arc;

use tokio::sync::watch;

/// Why the application stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuitReason {
    /// `quit()` was called, directly or through a window command.
    Requested,
    /// The window server closed the connection.
    EndOfStream,
    /// The inbound loop hit an I/O error.
    TransportFailed(String),
}

/// Trigger side of the shutdown signal. Cheap to clone.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<Option<QuitReason>>>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// Trigger the signal. The first reason wins; returns `false` if the
    /// signal had already fired.
    pub fn trigger(&self, reason: QuitReason) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        })
    }

    /// The reason, once triggered.
    pub fn reason(&self) -> Option<QuitReason> {
        self.tx.borrow().clone()
    }

    pub fn is_triggered(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// A listener that resolves once the signal fires.
    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener { rx: self.tx.subscribe() }
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Receive side of the shutdown signal.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    rx: watch::Receiver<Option<QuitReason>>,
}

impl ShutdownListener {
    /// Wait until the signal fires. Returns immediately if it already has.
    pub async fn wait(&mut self) -> QuitReason {
        loop {
            if let Some(reason) = self.rx.borrow_and_update().clone() {
                return reason;
            }
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().clone().unwrap_or(QuitReason::Requested);
            }
        }
    }
}
