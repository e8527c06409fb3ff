//! Delivery of control packets to the monitor's HID endpoint.
use tracing::debug;

use crate::packet::ControlPacket;

pub const VENDOR_ID: u16 = 0x0bda;
pub const PRODUCT_ID: u16 = 0x1100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceId {
    pub vendor_id: u16,
    pub product_id: u16,
}

impl Default for DeviceId {
    fn default() -> Self {
        Self { vendor_id: VENDOR_ID, product_id: PRODUCT_ID }
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:04x}:{:04x}", self.vendor_id, self.product_id))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[cfg(feature = "hidraw")]
    #[error("could not initialize the HID library")]
    InitHidApi(#[source] hidapi::HidError),
    #[error("no HID device with id {0} is connected")]
    DeviceNotFound(DeviceId),
    #[cfg(feature = "hidraw")]
    #[error("could not open the HID device {1}")]
    OpenDevice(#[source] hidapi::HidError, DeviceId),
    #[cfg(feature = "hidraw")]
    #[error("could not write the output report to {1}")]
    Write(#[source] hidapi::HidError, DeviceId),
    #[cfg(not(feature = "hidraw"))]
    #[error("built without HID support, enable the `hidraw` feature to talk to {0}")]
    TransportUnavailable(DeviceId),
}

#[derive(clap::Parser, Clone, Debug)]
#[group(id = "device::Args")]
pub struct Args {
    /// USB vendor ID of the monitor's HID endpoint.
    #[arg(long, default_value = "0x0bda", value_parser = parse_usb_id)]
    vendor_id: u16,
    /// USB product ID of the monitor's HID endpoint.
    #[arg(long, default_value = "0x1100", value_parser = parse_usb_id)]
    product_id: u16,
}

impl Args {
    pub fn device_id(&self) -> DeviceId {
        DeviceId { vendor_id: self.vendor_id, product_id: self.product_id }
    }
}

/// Parse an USB ID given either in hexadecimal with a `0x` prefix or in decimal.
pub fn parse_usb_id(s: &str) -> Result<u16, std::num::ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

/// Something that accepts control packets as HID output reports.
pub trait OutputReportWriter {
    /// Write the packet as a single output report, returning the number of bytes accepted.
    fn write_report(&mut self, packet: &ControlPacket) -> Result<usize, Error>;
}

/// An open handle to the monitor's HID endpoint.
///
/// The handle is closed when this is dropped.
#[cfg(feature = "hidraw")]
pub struct HidMonitor {
    device: hidapi::HidDevice,
    id: DeviceId,
}

#[cfg(feature = "hidraw")]
impl HidMonitor {
    pub fn open(id: DeviceId) -> Result<Self, Error> {
        let api = hidapi::HidApi::new().map_err(Error::InitHidApi)?;
        let Some(info) = api
            .device_list()
            .find(|d| d.vendor_id() == id.vendor_id && d.product_id() == id.product_id)
        else {
            return Err(Error::DeviceNotFound(id));
        };
        debug!(
            message = "found monitor",
            device = %id,
            interface = info.interface_number(),
            product = ?info.product_string(),
            serial = ?info.serial_number(),
        );
        let device = info.open_device(&api).map_err(|e| Error::OpenDevice(e, id))?;
        Ok(Self { device, id })
    }
}

#[cfg(feature = "hidraw")]
impl OutputReportWriter for HidMonitor {
    fn write_report(&mut self, packet: &ControlPacket) -> Result<usize, Error> {
        let written = self.device.write(packet.as_bytes()).map_err(|e| Error::Write(e, self.id))?;
        debug!(message = "wrote output report", device = %self.id, written);
        Ok(written)
    }
}

#[cfg(feature = "hidraw")]
impl Drop for HidMonitor {
    fn drop(&mut self) {
        debug!(message = "closing monitor", device = %self.id);
    }
}

/// Open the monitor with the given ID for writing.
#[cfg(feature = "hidraw")]
pub fn open(id: DeviceId) -> Result<Box<dyn OutputReportWriter>, Error> {
    Ok(Box::new(HidMonitor::open(id)?))
}

#[cfg(not(feature = "hidraw"))]
pub fn open(id: DeviceId) -> Result<Box<dyn OutputReportWriter>, Error> {
    debug!(message = "no HID transport compiled in", device = %id);
    Err(Error::TransportUnavailable(id))
}
