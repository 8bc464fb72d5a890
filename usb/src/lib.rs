use std::time::Duration;

pub use rusb;
pub mod commands;
pub mod descriptors;
pub mod devices;
pub mod error;
pub mod frame;
pub mod handshake;
pub mod report;
pub mod session;

pub mod device;

pub const VID_XBOX: u16 = 0x045e;
pub const PID_XBOX_CONTROLLER: u16 = 0x0b12;

// The vendor command pipe lives on the first interface, over a pair of interrupt endpoints.
pub const INTERFACE: u8 = 0;
pub const ENDPOINT_OUT: u8 = 0x02;
pub const ENDPOINT_IN: u8 = 0x82;

/// Every interrupt transfer, in either direction, is capped at this many bytes.
pub const PACKET_SIZE: usize = 64;

/// Applied to every transfer, sends and receives alike.
pub const TRANSFER_TIMEOUT: Duration = Duration::from_millis(5000);
