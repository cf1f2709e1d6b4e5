// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # System Signal Handling
//!
//! Cross-platform signal handling for graceful shutdown: SIGTERM, SIGINT,
//! and (Unix-only) SIGHUP.

use std::future::Future;
use std::pin::Pin;

/// Callback invoked once a shutdown signal arrives.
pub type ShutdownCallback = Box<dyn FnOnce() + Send + 'static>;

pub trait SystemSignals: Send + Sync {
    fn wait_for_signal(&self, on_shutdown: ShutdownCallback) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

#[cfg(unix)]
pub struct UnixSignalHandler;

#[cfg(unix)]
impl UnixSignalHandler {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl Default for UnixSignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
impl SystemSignals for UnixSignalHandler {
    fn wait_for_signal(&self, on_shutdown: ShutdownCallback) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let mut sigterm = signal(SignalKind::terminate()).expect("failed to register SIGTERM handler");
            let mut sigint = signal(SignalKind::interrupt()).expect("failed to register SIGINT handler");
            let mut sighup = signal(SignalKind::hangup()).expect("failed to register SIGHUP handler");

            tokio::select! {
                _ = sigterm.recv() => tracing::info!("received SIGTERM, initiating graceful shutdown"),
                _ = sigint.recv() => tracing::info!("received SIGINT, initiating graceful shutdown"),
                _ = sighup.recv() => tracing::info!("received SIGHUP, initiating graceful shutdown"),
            }

            on_shutdown();
        })
    }
}

#[cfg(windows)]
pub struct WindowsSignalHandler;

#[cfg(windows)]
impl WindowsSignalHandler {
    pub fn new() -> Self {
        Self
    }
}

#[cfg(windows)]
impl Default for WindowsSignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(windows)]
impl SystemSignals for WindowsSignalHandler {
    fn wait_for_signal(&self, on_shutdown: ShutdownCallback) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            tokio::signal::ctrl_c().await.expect("failed to register Ctrl+C handler");
            tracing::info!("received Ctrl+C, initiating graceful shutdown");
            on_shutdown();
        })
    }
}

/// Never fires. Lets tests drive shutdown explicitly via
/// `ShutdownCoordinator` instead of racing a real signal.
pub struct NoOpSignalHandler;

impl NoOpSignalHandler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpSignalHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSignals for NoOpSignalHandler {
    fn wait_for_signal(&self, _on_shutdown: ShutdownCallback) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            std::future::pending::<()>().await;
        })
    }
}

pub fn create_signal_handler() -> Box<dyn SystemSignals> {
    #[cfg(unix)]
    {
        Box::new(UnixSignalHandler::new())
    }

    #[cfg(windows)]
    {
        Box::new(WindowsSignalHandler::new())
    }

    #[cfg(not(any(unix, windows)))]
    {
        compile_error!("unsupported platform for signal handling");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn noop_handler_never_fires() {
        let handler = NoOpSignalHandler::new();
        let called = Arc::new(AtomicBool::new(false));
        let called_clone = called.clone();
        let callback: ShutdownCallback = Box::new(move || called_clone.store(true, Ordering::SeqCst));

        tokio::select! {
            _ = handler.wait_for_signal(callback) => panic!("no-op handler should never complete"),
            _ = tokio::time::sleep(tokio::time::Duration::from_millis(50)) => {}
        }

        assert!(!called.load(Ordering::SeqCst));
    }

    #[test]
    fn create_signal_handler_does_not_panic() {
        let _handler = create_signal_handler();
    }
}
