use crate::device::base::{UsbDeviceInfo, UsbHandle, UsbHost};
use crate::devices::LocatedDevice;
use crate::error::{ConnectError, TransferError};
use crate::frame::{CommandFrame, Response};
use crate::{ENDPOINT_IN, ENDPOINT_OUT, INTERFACE, PACKET_SIZE};
use log::{debug, error, info, warn};
use std::time::Duration;

/// An open handle with the vendor interface claimed. The interface is released exactly once,
/// either by `close`, or when the session is dropped.
pub struct Session<H: UsbHandle> {
    handle: H,
    info: UsbDeviceInfo,
    interface: u8,
    detached_kernel_driver: bool,
    released: bool,
}

impl<H: UsbHandle> Session<H> {
    pub fn open<U: UsbHost<Handle = H>>(
        host: &U,
        located: &LocatedDevice<U::Device>,
    ) -> Result<Self, ConnectError> {
        let mut handle = host
            .open(&located.device)
            .map_err(ConnectError::OpenFailed)?;
        info!("Opened device at {}", located.info);

        let interface = INTERFACE;
        let detached_kernel_driver = detach_kernel_driver(&mut handle, interface);

        if let Err(source) = handle.claim_interface(interface) {
            error!("Unable to claim interface {}: {}", interface, source);
            if detached_kernel_driver {
                if let Err(error) = handle.attach_kernel_driver(interface) {
                    warn!("Unable to hand the interface back to the kernel: {}", error);
                }
            }

            // Closes the handle before we bail.
            drop(handle);
            return Err(ConnectError::ClaimFailed { interface, source });
        }
        debug!("Claimed interface {}", interface);

        Ok(Self {
            handle,
            info: located.info,
            interface,
            detached_kernel_driver,
            released: false,
        })
    }

    pub fn info(&self) -> UsbDeviceInfo {
        self.info
    }

    pub fn interface(&self) -> u8 {
        self.interface
    }

    pub fn send(&self, frame: &CommandFrame, timeout: Duration) -> Result<usize, TransferError> {
        let bytes = frame.to_bytes();
        debug!("Sending: {}", frame);

        let written = self
            .handle
            .write_interrupt(ENDPOINT_OUT, &bytes, timeout)
            .map_err(|e| TransferError::from_usb(ENDPOINT_OUT, e))?;

        if written != bytes.len() {
            return Err(TransferError::ShortWrite {
                endpoint: ENDPOINT_OUT,
                written,
                expected: bytes.len(),
            });
        }
        Ok(written)
    }

    pub fn receive(&self, timeout: Duration) -> Result<Response, TransferError> {
        let mut buffer = [0; PACKET_SIZE];
        let length = self
            .handle
            .read_interrupt(ENDPOINT_IN, &mut buffer, timeout)
            .map_err(|e| TransferError::from_usb(ENDPOINT_IN, e))?;

        Ok(Response::new(buffer, length))
    }

    pub fn close(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        if let Err(error) = self.handle.release_interface(self.interface) {
            warn!("Unable to release interface {}: {}", self.interface, error);
        }

        if self.detached_kernel_driver {
            if let Err(error) = self.handle.attach_kernel_driver(self.interface) {
                warn!("Unable to reattach the kernel driver: {}", error);
            }
        }
        info!("Released device at {}", self.info);
    }
}

impl<H: UsbHandle> Drop for Session<H> {
    fn drop(&mut self) {
        self.release();
    }
}

// Detaching is advisory, if it fails we still try to claim the interface and let that decide.
fn detach_kernel_driver<H: UsbHandle>(handle: &mut H, interface: u8) -> bool {
    match handle.kernel_driver_active(interface) {
        Ok(true) => {
            info!("Kernel has hold of this device, detaching kernel driver");
            match handle.detach_kernel_driver(interface) {
                Ok(()) => true,
                Err(error) => {
                    warn!("Unable to detach kernel driver: {}", error);
                    false
                }
            }
        }
        Ok(false) => false,
        Err(rusb::Error::NotSupported) => false,
        Err(error) => {
            warn!("Unable to query the kernel driver state: {}", error);
            false
        }
    }
}
