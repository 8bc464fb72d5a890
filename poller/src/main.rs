use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::task;
use xbox_usb::descriptors;
use xbox_usb::device::LibUsbHost;
use xbox_usb::devices;
use xbox_usb::frame::CommandFramer;
use xbox_usb::handshake::Handshake;
use xbox_usb::report::{LogObserver, ReportLoop};
use xbox_usb::session::Session;
use xbox_usb::{PID_XBOX_CONTROLLER, VID_XBOX};

use crate::cli::Cli;
use crate::shutdown::{stop_on, Termination};

mod cli;
mod shutdown;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    CombinedLogger::init(vec![TermLogger::new(
        args.log_level.into(),
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )])
    .context("Could not configure the logger")?;
    log_panics::init();

    info!("Starting Xbox Controller Poller v{}", VERSION);
    let host = LibUsbHost::new(args.libusb_debug).context("Error initialising libusb")?;

    if args.list_devices {
        let found = descriptors::dump(&host, VID_XBOX).context("Unable to list USB devices")?;
        info!("Found {} device(s) with vendor id {:04x}", found, VID_XBOX);
        return Ok(());
    }

    // The USB side is entirely blocking, so it runs on its own thread. Flipping this flag is
    // the only way to ask it to stop.
    let stopping = Arc::new(AtomicBool::new(false));
    let mut termination = Termination::register().context("Unable to watch for signals")?;
    let signal_stopping = stopping.clone();
    tokio::spawn(async move { stop_on(termination.recv(), signal_stopping).await });

    let worker_stopping = stopping.clone();
    task::spawn_blocking(move || run(host, args.skip_handshake, &worker_stopping))
        .await
        .context("USB worker panicked")??;

    info!("Shutting down");
    Ok(())
}

fn run(
    host: LibUsbHost<xbox_usb::rusb::Context>,
    skip_handshake: bool,
    stopping: &AtomicBool,
) -> Result<()> {
    let located = devices::find(&host, VID_XBOX, PID_XBOX_CONTROLLER)
        .context("Cannot find the device, ensure the Xbox controller is attached")?;
    let session = Session::open(&host, &located).context("Cannot open the Xbox controller")?;

    let mut framer = CommandFramer::new();
    if skip_handshake {
        warn!("Skipping the handshake, the controller may not send any reports");
    } else {
        let result = Handshake::new().run(&session, &mut framer);
        if !result.is_clean() {
            warn!("Handshake did not complete cleanly, continuing anyway");
        }
    }

    let reads = ReportLoop::new().run(&session, stopping, &mut LogObserver);
    info!("Stopped polling after {} reads", reads);

    session.close();
    Ok(())
}
