use log::info;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[cfg(target_family = "unix")]
use tokio::select;
#[cfg(target_family = "unix")]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Waits for the process to be asked to stop. The handlers are installed by `register`, so any
/// signal arriving after that point is caught rather than killing the process outright.
#[cfg(target_family = "unix")]
pub struct Termination {
    interrupt: Signal,
    terminate: Signal,
}

#[cfg(target_family = "unix")]
impl Termination {
    pub fn register() -> std::io::Result<Self> {
        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    pub async fn recv(&mut self) -> &'static str {
        select! {
            Some(_) = self.interrupt.recv() => "SIGINT",
            Some(_) = self.terminate.recv() => "SIGTERM",
        }
    }
}

// Windows doesn't directly support SIGTERM, so Ctrl+C is all we can watch for here.
#[cfg(not(target_family = "unix"))]
pub struct Termination;

#[cfg(not(target_family = "unix"))]
impl Termination {
    pub fn register() -> std::io::Result<Self> {
        Ok(Self)
    }

    pub async fn recv(&mut self) -> &'static str {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
        "Ctrl+C"
    }
}

/// Flags the blocking USB worker to stop once `signal` resolves.
pub async fn stop_on<F: Future<Output = &'static str>>(signal: F, stopping: Arc<AtomicBool>) {
    let name = signal.await;
    info!("{} received, stopping after the current read..", name);
    stopping.store(true, Ordering::Relaxed);
}
