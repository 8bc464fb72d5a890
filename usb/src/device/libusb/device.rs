use crate::device::base::{UsbDevice, UsbDeviceInfo, UsbHandle, UsbHost};
use log::debug;
use rusb::{Context, Device, DeviceHandle, LogLevel, UsbContext};
use std::time::Duration;

pub struct LibUsbHost<T: UsbContext> {
    context: T,
}

impl LibUsbHost<Context> {
    /// Creates a private libusb context. libusb's own logging stays at warnings unless
    /// `verbose` is set.
    pub fn new(verbose: bool) -> rusb::Result<Self> {
        let mut context = Context::new()?;
        if verbose {
            context.set_log_level(LogLevel::Debug);
        } else {
            context.set_log_level(LogLevel::Warning);
        }
        debug!("Created libusb context (verbose: {})", verbose);

        Ok(Self { context })
    }
}

impl<T: UsbContext> UsbHost for LibUsbHost<T> {
    type Device = Device<T>;
    type Handle = DeviceHandle<T>;

    fn devices(&self) -> rusb::Result<Vec<Self::Device>> {
        Ok(self.context.devices()?.iter().collect())
    }

    fn open(&self, device: &Self::Device) -> rusb::Result<Self::Handle> {
        device.open()
    }
}

impl<T: UsbContext> UsbDevice for Device<T> {
    fn info(&self) -> rusb::Result<UsbDeviceInfo> {
        let descriptor = self.device_descriptor()?;
        Ok(UsbDeviceInfo {
            vendor_id: descriptor.vendor_id(),
            product_id: descriptor.product_id(),
            bus_number: self.bus_number(),
            address: self.address(),
        })
    }
}

// The inherent rusb methods share these names, so they're called out explicitly to avoid any
// doubt about which one is being invoked.
impl<T: UsbContext> UsbHandle for DeviceHandle<T> {
    fn kernel_driver_active(&self, interface: u8) -> rusb::Result<bool> {
        DeviceHandle::kernel_driver_active(self, interface)
    }

    fn detach_kernel_driver(&mut self, interface: u8) -> rusb::Result<()> {
        DeviceHandle::detach_kernel_driver(self, interface)
    }

    fn attach_kernel_driver(&mut self, interface: u8) -> rusb::Result<()> {
        DeviceHandle::attach_kernel_driver(self, interface)
    }

    fn claim_interface(&mut self, interface: u8) -> rusb::Result<()> {
        DeviceHandle::claim_interface(self, interface)
    }

    fn release_interface(&mut self, interface: u8) -> rusb::Result<()> {
        DeviceHandle::release_interface(self, interface)
    }

    fn write_interrupt(&self, endpoint: u8, data: &[u8], timeout: Duration) -> rusb::Result<usize> {
        DeviceHandle::write_interrupt(self, endpoint, data, timeout)
    }

    fn read_interrupt(
        &self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> rusb::Result<usize> {
        DeviceHandle::read_interrupt(self, endpoint, buf, timeout)
    }
}
