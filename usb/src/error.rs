#[derive(thiserror::Error, Debug)]
pub enum ConnectError {
    #[error("No device matching {vendor_id:04x}:{product_id:04x} was found")]
    DeviceNotFound { vendor_id: u16, product_id: u16 },

    #[error("Unable to enumerate USB devices: {0}")]
    Enumeration(#[source] rusb::Error),

    #[error("Unable to open the device: {0}")]
    OpenFailed(#[source] rusb::Error),

    #[error("Unable to Claim Interface {interface}: {source}")]
    ClaimFailed {
        interface: u8,
        #[source]
        source: rusb::Error,
    },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error("Frame is {length} bytes, but a transfer holds at most {max}")]
    FrameTooLarge { length: usize, max: usize },

    #[error("Frame of {length} bytes is shorter than its header")]
    Truncated { length: usize },

    #[error("Frame declares a {declared} byte payload, but carries {actual}")]
    LengthMismatch { declared: usize, actual: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Transfer on endpoint {endpoint:#04x} timed out")]
    Timeout { endpoint: u8 },

    #[error("USB error on endpoint {endpoint:#04x}: {source}")]
    Usb {
        endpoint: u8,
        #[source]
        source: rusb::Error,
    },

    #[error("Short write on endpoint {endpoint:#04x}, sent {written} of {expected} bytes")]
    ShortWrite {
        endpoint: u8,
        written: usize,
        expected: usize,
    },
}

impl TransferError {
    pub(crate) fn from_usb(endpoint: u8, error: rusb::Error) -> Self {
        match error {
            rusb::Error::Timeout => TransferError::Timeout { endpoint },
            source => TransferError::Usb { endpoint, source },
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TransferError::Timeout { .. })
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StepError {
    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error(transparent)]
    Transfer(#[from] TransferError),
}
