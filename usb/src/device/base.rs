use std::fmt::{Display, Formatter};
use std::time::Duration;

// These traits sit between the session logic and the host USB layer, so everything above them
// can be driven without a controller attached.

pub trait UsbHost {
    type Device: UsbDevice;
    type Handle: UsbHandle;

    fn devices(&self) -> rusb::Result<Vec<Self::Device>>;
    fn open(&self, device: &Self::Device) -> rusb::Result<Self::Handle>;
}

pub trait UsbDevice {
    fn info(&self) -> rusb::Result<UsbDeviceInfo>;
}

pub trait UsbHandle {
    fn kernel_driver_active(&self, interface: u8) -> rusb::Result<bool>;
    fn detach_kernel_driver(&mut self, interface: u8) -> rusb::Result<()>;
    fn attach_kernel_driver(&mut self, interface: u8) -> rusb::Result<()>;

    fn claim_interface(&mut self, interface: u8) -> rusb::Result<()>;
    fn release_interface(&mut self, interface: u8) -> rusb::Result<()>;

    fn write_interrupt(&self, endpoint: u8, data: &[u8], timeout: Duration) -> rusb::Result<usize>;
    fn read_interrupt(&self, endpoint: u8, buf: &mut [u8], timeout: Duration)
        -> rusb::Result<usize>;
}

// We primarily need the ids for matching, the bus number and address are for the logs..
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UsbDeviceInfo {
    pub(crate) vendor_id: u16,
    pub(crate) product_id: u16,
    pub(crate) bus_number: u8,
    pub(crate) address: u8,
}

impl UsbDeviceInfo {
    pub fn new(vendor_id: u16, product_id: u16, bus_number: u8, address: u8) -> Self {
        Self {
            vendor_id,
            product_id,
            bus_number,
            address,
        }
    }

    pub fn vendor_id(&self) -> u16 {
        self.vendor_id
    }
    pub fn product_id(&self) -> u16 {
        self.product_id
    }
    pub fn bus_number(&self) -> u8 {
        self.bus_number
    }
    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn matches(&self, vendor_id: u16, product_id: u16) -> bool {
        self.vendor_id == vendor_id && self.product_id == product_id
    }
}

impl Display for UsbDeviceInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:04x}:{:04x} (Bus {:03} Device {:03})",
            self.vendor_id, self.product_id, self.bus_number, self.address
        )
    }
}

// A plain descriptor is its own device, which lets a fixed list stand in for enumeration.
impl UsbDevice for UsbDeviceInfo {
    fn info(&self) -> rusb::Result<UsbDeviceInfo> {
        Ok(*self)
    }
}
