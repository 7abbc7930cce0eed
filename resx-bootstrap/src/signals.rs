// /////////////////////////////////////////////////////////////////////////////
// resx
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Signal handling (SIGTERM/SIGINT/SIGHUP): wires process signals into a
//! [`crate::shutdown::ShutdownCoordinator`] so in-flight file-producer
//! writes get a grace period before the process exits.

use crate::shutdown::ShutdownCoordinator;

/// Spawns a task that waits for SIGTERM, SIGINT, or SIGHUP and initiates
/// graceful shutdown on the coordinator. Returns immediately; the
/// spawned task runs for the remainder of the process.
pub fn install(coordinator: ShutdownCoordinator) {
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("received shutdown signal");
        coordinator.initiate_shutdown();
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};
    let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
    let mut sigint = signal(SignalKind::interrupt()).expect("failed to install SIGINT handler");
    let mut sighup = signal(SignalKind::hangup()).expect("failed to install SIGHUP handler");
    tokio::select! {
        _ = sigterm.recv() => {}
        _ = sigint.recv() => {}
        _ = sighup.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    /// `install` itself never initiates shutdown; only an actual signal
    /// does. Sending real signals from a test would affect the whole
    /// test process, so this only checks the installation doesn't panic
    /// and the coordinator is left untouched until a signal arrives.
    #[tokio::test]
    async fn install_does_not_preemptively_shut_down() {
        let coordinator = ShutdownCoordinator::new(Duration::from_secs(5));
        install(coordinator.clone());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!coordinator.is_shutting_down());
    }
}
