use crate::device::base::UsbHandle;
use crate::error::TransferError;
use crate::frame::{hex, Response};
use crate::session::Session;
use crate::TRANSFER_TIMEOUT;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Receives everything the report loop reads. Reports are opaque here, making sense of them is
/// left to whoever implements this.
pub trait ReportObserver {
    fn on_report(&mut self, report: &Response);
    fn on_timeout(&mut self) {}
    fn on_error(&mut self, error: &TransferError);
}

/// Writes each report to the log as a hex dump.
#[derive(Debug, Default)]
pub struct LogObserver;

impl ReportObserver for LogObserver {
    fn on_report(&mut self, report: &Response) {
        info!("Received {} bytes", report.len());
        info!("{}", hex(report.bytes()));
    }

    // A quiet controller reads as an empty report, so the poll stays visible at the default level.
    fn on_timeout(&mut self) {
        info!("Received 0 bytes (timed out, polling again)");
    }

    fn on_error(&mut self, error: &TransferError) {
        warn!("Error reading report: {}", error);
    }
}

pub struct ReportLoop {
    timeout: Duration,
}

impl Default for ReportLoop {
    fn default() -> Self {
        Self {
            timeout: TRANSFER_TIMEOUT,
        }
    }
}

impl ReportLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Reads from the controller until `stopping` is set, handing each result to the observer.
    /// Errors never end the loop. Since the flag is only checked between reads, stopping can take
    /// up to one transfer timeout. Returns the number of reads performed.
    pub fn run<H: UsbHandle, O: ReportObserver>(
        &self,
        session: &Session<H>,
        stopping: &AtomicBool,
        observer: &mut O,
    ) -> u64 {
        let mut reads = 0;
        info!("Polling {} for reports", session.info());

        loop {
            if stopping.load(Ordering::Relaxed) {
                break;
            }

            reads += 1;
            match session.receive(self.timeout) {
                Ok(report) => observer.on_report(&report),
                Err(error) if error.is_timeout() => observer.on_timeout(),
                Err(error) => observer.on_error(&error),
            }
        }

        debug!("Report loop stopped after {} reads", reads);
        reads
    }
}
