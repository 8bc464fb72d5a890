// Diagnostic listing of a device's interfaces and endpoints. Nothing here is needed to talk to
// the controller, it's purely for working out what a device exposes.
use crate::device::base::{UsbDevice, UsbHost};
use crate::device::LibUsbHost;
use log::{info, warn};
use rusb::{Device, Direction, TransferType, UsbContext};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSummary {
    pub address: u8,
    pub direction: Direction,
    pub transfer_type: TransferType,
    pub max_packet_size: u16,
    pub interval: u8,
}

impl Display for EndpointSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let direction = match self.direction {
            Direction::In => "IN",
            Direction::Out => "OUT",
        };
        write!(
            f,
            "EP Address: 0x{:02X}({}) {}, EP Type: {}, Max Packet: {}, Interval: {}",
            self.address,
            self.address,
            direction,
            transfer_type_name(self.transfer_type),
            self.max_packet_size,
            self.interval
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceSummary {
    pub number: u8,
    pub alternate_setting: u8,
    pub endpoints: Vec<EndpointSummary>,
}

pub fn transfer_type_name(transfer_type: TransferType) -> &'static str {
    match transfer_type {
        TransferType::Control => "CONTROL",
        TransferType::Isochronous => "ISOCHRONOUS",
        TransferType::Bulk => "BULK",
        TransferType::Interrupt => "INTERRUPT",
    }
}

/// Walks the first configuration descriptor, one summary per alternate setting.
pub fn describe<T: UsbContext>(device: &Device<T>) -> rusb::Result<Vec<InterfaceSummary>> {
    let config = device.config_descriptor(0)?;

    let mut interfaces = vec![];
    for interface in config.interfaces() {
        for descriptor in interface.descriptors() {
            let endpoints = descriptor
                .endpoint_descriptors()
                .map(|endpoint| EndpointSummary {
                    address: endpoint.address(),
                    direction: endpoint.direction(),
                    transfer_type: endpoint.transfer_type(),
                    max_packet_size: endpoint.max_packet_size(),
                    interval: endpoint.interval(),
                })
                .collect();

            interfaces.push(InterfaceSummary {
                number: descriptor.interface_number(),
                alternate_setting: descriptor.setting_number(),
                endpoints,
            });
        }
    }
    Ok(interfaces)
}

pub fn log_interfaces(interfaces: &[InterfaceSummary]) {
    for interface in interfaces {
        info!(
            "Interface Number: {}, Alternate Setting: {}",
            interface.number, interface.alternate_setting
        );
        info!("Number of endpoints: {}", interface.endpoints.len());
        for endpoint in &interface.endpoints {
            info!("\t{}", endpoint);
        }
    }
}

/// Logs the layout of every attached device from the given vendor, returning how many were found.
pub fn dump<T: UsbContext>(host: &LibUsbHost<T>, vendor_id: u16) -> rusb::Result<usize> {
    let mut found = 0;
    for device in host.devices()? {
        let Ok(info) = device.info() else {
            continue;
        };
        if info.vendor_id() != vendor_id {
            continue;
        }

        found += 1;
        info!("Device {}", info);
        match describe(&device) {
            Ok(interfaces) => log_interfaces(&interfaces),
            Err(error) => warn!("Unable to read the configuration descriptor: {}", error),
        }
    }
    Ok(found)
}
