use crate::device::base::{UsbDevice, UsbDeviceInfo, UsbHost};
use crate::error::ConnectError;
use log::{debug, info};

/// A device picked out of the host's enumeration, alongside what we read from its descriptor.
#[derive(Debug, Clone)]
pub struct LocatedDevice<D> {
    pub device: D,
    pub info: UsbDeviceInfo,
}

/// Performs a single enumeration pass and returns the first device matching the pair. There's
/// no waiting around for a device to appear, if it's not there now, it's not found.
pub fn find<U: UsbHost>(
    host: &U,
    vendor_id: u16,
    product_id: u16,
) -> Result<LocatedDevice<U::Device>, ConnectError> {
    let devices = host.devices().map_err(ConnectError::Enumeration)?;
    debug!("Enumerated {} USB devices", devices.len());

    find_in(devices, vendor_id, product_id)
}

pub fn find_in<D: UsbDevice>(
    devices: impl IntoIterator<Item = D>,
    vendor_id: u16,
    product_id: u16,
) -> Result<LocatedDevice<D>, ConnectError> {
    for device in devices {
        let info = match device.info() {
            Ok(info) => info,
            Err(error) => {
                debug!("Skipping device with unreadable descriptor: {}", error);
                continue;
            }
        };

        if info.matches(vendor_id, product_id) {
            info!("Found device {}", info);
            return Ok(LocatedDevice { device, info });
        }
    }

    Err(ConnectError::DeviceNotFound {
        vendor_id,
        product_id,
    })
}
