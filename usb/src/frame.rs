use crate::commands::Command;
use crate::error::FrameError;
use crate::PACKET_SIZE;
use std::fmt::{Display, Formatter};
use std::num::Wrapping;

/// command id, options, sequence and payload length, one byte apiece.
pub const HEADER_SIZE: usize = 4;
pub const MAX_PAYLOAD: usize = PACKET_SIZE - HEADER_SIZE;

/// A single vendor command, laid out on the wire as
/// `[command_id][options][sequence][payload_length][payload..]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    command_id: u8,
    options: u8,
    sequence: u8,
    payload: Vec<u8>,
}

impl CommandFrame {
    pub fn command_id(&self) -> u8 {
        self.command_id
    }
    pub fn options(&self) -> u8 {
        self.options
    }
    pub fn sequence(&self) -> u8 {
        self.sequence
    }
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    // Construction guarantees the payload fits inside a single packet.
    pub fn payload_length(&self) -> u8 {
        self.payload.len() as u8
    }

    pub fn wire_length(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.wire_length());
        bytes.push(self.command_id);
        bytes.push(self.options);
        bytes.push(self.sequence);
        bytes.push(self.payload_length());
        bytes.extend_from_slice(&self.payload);
        bytes
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FrameError> {
        if bytes.len() > PACKET_SIZE {
            return Err(FrameError::FrameTooLarge {
                length: bytes.len(),
                max: PACKET_SIZE,
            });
        }
        if bytes.len() < HEADER_SIZE {
            return Err(FrameError::Truncated {
                length: bytes.len(),
            });
        }

        let declared = bytes[3] as usize;
        let payload = &bytes[HEADER_SIZE..];
        if declared != payload.len() {
            return Err(FrameError::LengthMismatch {
                declared,
                actual: payload.len(),
            });
        }

        Ok(Self {
            command_id: bytes[0],
            options: bytes[1],
            sequence: bytes[2],
            payload: payload.to_vec(),
        })
    }
}

impl Display for CommandFrame {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&hex(&self.to_bytes()))
    }
}

/// Hands out frames stamped with consecutive sequence numbers. One framer should live for the
/// whole session, the device uses the sequence to spot lost or reordered commands.
#[derive(Debug, Default)]
pub struct CommandFramer {
    sequence: Wrapping<u8>,
}

impl CommandFramer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(sequence: u8) -> Self {
        Self {
            sequence: Wrapping(sequence),
        }
    }

    /// The sequence number the next frame will carry.
    pub fn sequence(&self) -> u8 {
        self.sequence.0
    }

    pub fn next_frame(
        &mut self,
        command_id: u8,
        options: u8,
        payload: &[u8],
    ) -> Result<CommandFrame, FrameError> {
        if payload.len() > MAX_PAYLOAD {
            return Err(FrameError::FrameTooLarge {
                length: HEADER_SIZE + payload.len(),
                max: PACKET_SIZE,
            });
        }

        let sequence = self.sequence.0;
        self.sequence += Wrapping(1);

        Ok(CommandFrame {
            command_id,
            options,
            sequence,
            payload: payload.to_vec(),
        })
    }

    pub fn frame(&mut self, command: Command) -> Result<CommandFrame, FrameError> {
        self.next_frame(command.command_id(), command.options(), &command.payload())
    }
}

/// A single interrupt read, the buffer is always a full packet but only `len()` bytes are real.
#[derive(Clone, PartialEq, Eq)]
pub struct Response {
    buffer: [u8; PACKET_SIZE],
    length: usize,
}

impl Response {
    pub(crate) fn new(buffer: [u8; PACKET_SIZE], length: usize) -> Self {
        Self {
            buffer,
            length: length.min(PACKET_SIZE),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buffer[..self.length]
    }

    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

impl std::fmt::Debug for Response {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Response({} bytes: {})", self.length, hex(self.bytes()))
    }
}

pub(crate) fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect::<Vec<_>>()
        .join(" ")
}
