pub mod base;

// Linux and MacOS both talk to the controller through libUSB.
mod libusb;
pub use crate::device::libusb::device::LibUsbHost;

#[cfg(test)]
pub(crate) mod mock;
