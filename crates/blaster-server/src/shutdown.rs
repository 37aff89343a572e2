//! Graceful shutdown.
//!
//! A [`ShutdownSignal`] is a cloneable one-shot trigger. The accept loop
//! stops on it, open connections finish their in-flight request and close,
//! and the server waits for them through a [`ConnectionTracker`] bounded by
//! the configured shutdown timeout.
//!
//! # Example
//!
//! ```rust
//! use blaster_server::ShutdownSignal;
//!
//! let shutdown = ShutdownSignal::new();
//! let for_server = shutdown.clone();
//!
//! shutdown.trigger();
//! assert!(for_server.is_shutdown());
//! ```

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{watch, Notify};

/// A trigger for stopping servers.
///
/// Every clone observes the same state. Triggering is idempotent.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    state: Arc<watch::Sender<bool>>,
}

impl ShutdownSignal {
    /// Creates an untriggered signal.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(false);
        Self {
            state: Arc::new(state),
        }
    }

    /// Creates a signal that also fires on SIGINT or SIGTERM (Ctrl+C
    /// elsewhere).
    ///
    /// Must be called inside a tokio runtime.
    #[must_use]
    pub fn with_os_signals() -> Self {
        let signal = Self::new();
        let trigger = signal.clone();

        tokio::spawn(async move {
            match wait_for_os_signal().await {
                Ok(()) => trigger.trigger(),
                Err(err) => tracing::error!(error = %err, "failed to listen for OS signals"),
            }
        });

        signal
    }

    /// Fires the signal.
    pub fn trigger(&self) {
        if !self.state.send_replace(true) {
            tracing::debug!("shutdown triggered");
        }
    }

    /// Returns `true` once the signal has fired.
    #[must_use]
    pub fn is_shutdown(&self) -> bool {
        *self.state.borrow()
    }

    /// Completes when the signal fires, immediately if it already has.
    pub async fn recv(&self) {
        let mut state = self.state.subscribe();
        // The sender lives in `self`, so the channel cannot close here
        let _ = state.wait_for(|triggered| *triggered).await;
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
async fn wait_for_os_signal() -> io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => tracing::info!("received SIGTERM, shutting down"),
        _ = sigint.recv() => tracing::info!("received SIGINT, shutting down"),
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_os_signal() -> io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("received Ctrl+C, shutting down");
    Ok(())
}

#[derive(Debug, Default)]
struct TrackerState {
    active: AtomicUsize,
    idle: Notify,
}

/// Counts open connections so shutdown can wait for them.
///
/// ```rust
/// use blaster_server::ConnectionTracker;
///
/// let tracker = ConnectionTracker::new();
/// let guard = tracker.track();
/// assert_eq!(tracker.active(), 1);
///
/// drop(guard);
/// assert_eq!(tracker.active(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConnectionTracker {
    state: Arc<TrackerState>,
}

impl ConnectionTracker {
    /// Creates a tracker with no connections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a connection; it counts until the guard is dropped.
    #[must_use]
    pub fn track(&self) -> ConnectionGuard {
        self.state.active.fetch_add(1, Ordering::SeqCst);
        ConnectionGuard {
            state: Arc::clone(&self.state),
        }
    }

    /// Number of open connections.
    #[must_use]
    pub fn active(&self) -> usize {
        self.state.active.load(Ordering::SeqCst)
    }

    /// Completes once no connection is open.
    pub async fn wait_idle(&self) {
        loop {
            // Registered before the check so a concurrent last drop is not missed
            let idle = self.state.idle.notified();
            if self.active() == 0 {
                return;
            }
            idle.await;
        }
    }
}

/// Keeps one connection counted while alive.
#[derive(Debug)]
pub struct ConnectionGuard {
    state: Arc<TrackerState>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        if self.state.active.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.state.idle.notify_waiters();
        }
    }
}
