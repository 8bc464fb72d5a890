// A scripted stand-in for the host USB layer. Every call made against it is recorded in order,
// so tests can assert on exactly what would have reached the wire.
use crate::device::base::{UsbDevice, UsbDeviceInfo, UsbHandle, UsbHost};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open(UsbDeviceInfo),
    KernelDriverQuery(u8),
    Detach(u8),
    Attach(u8),
    Claim(u8),
    Release(u8),
    Write {
        endpoint: u8,
        data: Vec<u8>,
        timeout: Duration,
    },
    Read {
        endpoint: u8,
        timeout: Duration,
    },
    Close,
}

#[derive(Debug, Clone)]
pub struct MockDevice {
    pub info: rusb::Result<UsbDeviceInfo>,
}

impl MockDevice {
    pub fn new(vendor_id: u16, product_id: u16, address: u8) -> Self {
        Self {
            info: Ok(UsbDeviceInfo::new(vendor_id, product_id, 1, address)),
        }
    }

    pub fn unreadable() -> Self {
        Self {
            info: Err(rusb::Error::Io),
        }
    }
}

impl UsbDevice for MockDevice {
    fn info(&self) -> rusb::Result<UsbDeviceInfo> {
        self.info
    }
}

#[derive(Debug)]
pub struct Script {
    pub open: rusb::Result<()>,
    pub kernel_driver_active: rusb::Result<bool>,
    pub detach: rusb::Result<()>,
    pub claim: rusb::Result<()>,
    pub release: rusb::Result<()>,

    // Writes succeed in full unless a result is queued, reads time out once the queue runs dry.
    pub writes: VecDeque<rusb::Result<usize>>,
    pub reads: VecDeque<rusb::Result<Vec<u8>>>,
}

impl Default for Script {
    fn default() -> Self {
        Self {
            open: Ok(()),
            kernel_driver_active: Ok(false),
            detach: Ok(()),
            claim: Ok(()),
            release: Ok(()),
            writes: VecDeque::new(),
            reads: VecDeque::new(),
        }
    }
}

#[derive(Debug, Default)]
struct State {
    script: Script,
    events: Vec<Event>,
}

#[derive(Debug, Clone)]
pub struct MockHost {
    devices: Vec<MockDevice>,
    state: Arc<Mutex<State>>,
}

impl MockHost {
    pub fn new(devices: Vec<MockDevice>) -> Self {
        Self::with_script(devices, Script::default())
    }

    pub fn with_script(devices: Vec<MockDevice>, script: Script) -> Self {
        Self {
            devices,
            state: Arc::new(Mutex::new(State {
                script,
                events: vec![],
            })),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Write { data, .. } => Some(data),
                _ => None,
            })
            .collect()
    }

    pub fn reads(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, Event::Read { .. }))
            .count()
    }

    // The timeout handed to every write and read, in the order they were made.
    pub fn timeouts(&self) -> Vec<Duration> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Write { timeout, .. } | Event::Read { timeout, .. } => Some(timeout),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Event) -> usize {
        self.events().iter().filter(|e| *e == wanted).count()
    }
}

impl UsbHost for MockHost {
    type Device = MockDevice;
    type Handle = MockHandle;

    fn devices(&self) -> rusb::Result<Vec<Self::Device>> {
        Ok(self.devices.clone())
    }

    fn open(&self, device: &Self::Device) -> rusb::Result<Self::Handle> {
        let info = device.info()?;
        let mut state = self.state.lock().unwrap();
        state.script.open?;
        state.events.push(Event::Open(info));

        Ok(MockHandle {
            state: self.state.clone(),
        })
    }
}

pub struct MockHandle {
    state: Arc<Mutex<State>>,
}

impl MockHandle {
    fn record(&self, event: Event) {
        self.state.lock().unwrap().events.push(event);
    }
}

impl UsbHandle for MockHandle {
    fn kernel_driver_active(&self, interface: u8) -> rusb::Result<bool> {
        self.record(Event::KernelDriverQuery(interface));
        self.state.lock().unwrap().script.kernel_driver_active
    }

    fn detach_kernel_driver(&mut self, interface: u8) -> rusb::Result<()> {
        self.record(Event::Detach(interface));
        self.state.lock().unwrap().script.detach
    }

    fn attach_kernel_driver(&mut self, interface: u8) -> rusb::Result<()> {
        self.record(Event::Attach(interface));
        Ok(())
    }

    fn claim_interface(&mut self, interface: u8) -> rusb::Result<()> {
        self.record(Event::Claim(interface));
        self.state.lock().unwrap().script.claim
    }

    fn release_interface(&mut self, interface: u8) -> rusb::Result<()> {
        self.record(Event::Release(interface));
        self.state.lock().unwrap().script.release
    }

    fn write_interrupt(&self, endpoint: u8, data: &[u8], timeout: Duration) -> rusb::Result<usize> {
        self.record(Event::Write {
            endpoint,
            data: data.to_vec(),
            timeout,
        });
        let queued = self.state.lock().unwrap().script.writes.pop_front();
        queued.unwrap_or(Ok(data.len()))
    }

    fn read_interrupt(
        &self,
        endpoint: u8,
        buf: &mut [u8],
        timeout: Duration,
    ) -> rusb::Result<usize> {
        self.record(Event::Read { endpoint, timeout });
        let queued = self.state.lock().unwrap().script.reads.pop_front();
        let data = queued.unwrap_or(Err(rusb::Error::Timeout))?;
        let length = data.len().min(buf.len());
        buf[..length].copy_from_slice(&data[..length]);
        Ok(length)
    }
}

impl Drop for MockHandle {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.events.push(Event::Close);
        }
    }
}
