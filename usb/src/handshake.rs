use crate::commands::{AudioVolume, Command};
use crate::device::base::UsbHandle;
use crate::error::{StepError, TransferError};
use crate::frame::{CommandFrame, CommandFramer, Response};
use crate::session::Session;
use crate::TRANSFER_TIMEOUT;
use log::{debug, info, warn};
use std::thread::sleep;
use std::time::Duration;

/// How long the controller is given to act on a command before we look for its response.
pub const RESPONSE_DELAY: Duration = Duration::from_secs(1);

pub struct Handshake {
    delay: Duration,
    timeout: Duration,
    volume: AudioVolume,
}

impl Default for Handshake {
    fn default() -> Self {
        Self {
            delay: RESPONSE_DELAY,
            timeout: TRANSFER_TIMEOUT,
            volume: AudioVolume::default(),
        }
    }
}

impl Handshake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_volume(mut self, volume: AudioVolume) -> Self {
        self.volume = volume;
        self
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn commands(&self) -> [Command; 2] {
        [Command::PowerOn, Command::SetAudioVolume(self.volume)]
    }

    /// Powers the controller on, then unmutes the headset and sets its volume. A failed step
    /// doesn't stop the next one from being attempted, the outcome of each is handed back.
    pub fn run<H: UsbHandle>(
        &self,
        session: &Session<H>,
        framer: &mut CommandFramer,
    ) -> HandshakeResult {
        let steps = self
            .commands()
            .into_iter()
            .map(|command| self.step(session, framer, command))
            .collect();

        HandshakeResult { steps }
    }

    fn step<H: UsbHandle>(
        &self,
        session: &Session<H>,
        framer: &mut CommandFramer,
        command: Command,
    ) -> StepOutcome {
        info!("Sending {:?}", command);

        let sent = framer
            .frame(command)
            .map_err(StepError::from)
            .and_then(|frame| {
                session
                    .send(&frame, self.timeout)
                    .map(|_| frame)
                    .map_err(StepError::from)
            });

        if let Err(error) = &sent {
            warn!("Failed to send {:?}: {}", command, error);
        }

        sleep(self.delay);

        let response = session.receive(self.timeout);
        match &response {
            Ok(response) => {
                info!("Received {} bytes in response to {:?}", response.len(), command);
                debug!("{:?}", response);
            }
            Err(error) => warn!("No response to {:?}: {}", command, error),
        }

        StepOutcome {
            command,
            sent,
            response,
        }
    }
}

#[derive(Debug)]
pub struct StepOutcome {
    pub command: Command,
    pub sent: Result<CommandFrame, StepError>,
    pub response: Result<Response, TransferError>,
}

impl StepOutcome {
    pub fn is_clean(&self) -> bool {
        self.sent.is_ok() && self.response.is_ok()
    }
}

#[derive(Debug)]
pub struct HandshakeResult {
    steps: Vec<StepOutcome>,
}

impl HandshakeResult {
    pub fn steps(&self) -> &[StepOutcome] {
        &self.steps
    }

    pub fn is_clean(&self) -> bool {
        self.steps.iter().all(StepOutcome::is_clean)
    }
}
