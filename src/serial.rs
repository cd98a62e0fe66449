use std::{
    io::{self, BufRead, BufReader, ErrorKind, Read},
    mem,
    time::Duration,
};

use anyhow::{Context as _, Result};
use log::{debug, warn};
use serialport::{FlowControl, SerialPort, SerialPortInfo, SerialPortType};
use tokio::sync::mpsc;

// Raspberry Pi USB vendor ID, used by the RP2040/RP2350 CDC interface.
pub const PICO_VENDOR_ID: u16 = 0x2e8a;

pub const READ_TIMEOUT: Duration = Duration::from_secs(1);

pub fn available_ports() -> Result<Vec<SerialPortInfo>> {
    serialport::available_ports().context("failed to enumerate serial ports")
}

/// Picks the port the monitor is most likely attached to: a Pico by vendor ID
/// or product name first, then any USB/ACM serial device.
pub fn select_port(ports: &[SerialPortInfo]) -> Option<&SerialPortInfo> {
    ports
        .iter()
        .find(|p| is_pico(p))
        .or_else(|| ports.iter().find(|p| is_generic_usb(p)))
}

fn is_pico(port: &SerialPortInfo) -> bool {
    match &port.port_type {
        SerialPortType::UsbPort(info) => {
            info.vid == PICO_VENDOR_ID
                || [&info.product, &info.manufacturer]
                    .into_iter()
                    .flatten()
                    .any(|s| s.contains("Pico"))
        }
        _ => false,
    }
}

fn is_generic_usb(port: &SerialPortInfo) -> bool {
    matches!(port.port_type, SerialPortType::UsbPort(_))
        || port.port_name.contains("ACM")
        || port.port_name.contains("USB")
}

pub fn describe_port(port: &SerialPortInfo) -> String {
    match &port.port_type {
        SerialPortType::UsbPort(info) => {
            let mut description = format!(
                "{} - USB (VID: 0x{:04x}, PID: 0x{:04x})",
                port.port_name, info.vid, info.pid
            );
            if let Some(manufacturer) = &info.manufacturer {
                description.push_str(&format!(", {manufacturer}"));
            }
            if let Some(product) = &info.product {
                description.push_str(&format!(", {product}"));
            }
            description
        }
        SerialPortType::BluetoothPort => format!("{} - Bluetooth", port.port_name),
        SerialPortType::PciPort => format!("{} - PCI", port.port_name),
        SerialPortType::Unknown => format!("{} - Unknown", port.port_name),
    }
}

pub fn open(port_name: &str, baud_rate: u32) -> Result<Box<dyn SerialPort>> {
    let mut port = serialport::new(port_name, baud_rate)
        .timeout(READ_TIMEOUT)
        .flow_control(FlowControl::None)
        .open()
        .with_context(|| format!("failed to open serial port: {port_name}"))?;

    // Some CDC stacks hold back output until DTR is asserted.
    if let Err(err) = port.write_data_terminal_ready(true) {
        warn!("failed to set DTR on {port_name}: {err}");
    }

    Ok(port)
}

/// Longest partial line kept while waiting for a line break.
pub const MAX_LINE_LEN: usize = 4096;

/// Splits a byte stream into lines, keeping partial lines across read timeouts.
#[derive(Debug)]
pub struct LineReader<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
    discarding: bool,
}

impl<R: Read> LineReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            reader: BufReader::new(inner),
            buf: Vec::new(),
            discarding: false,
        }
    }

    /// `Ok(None)` means the read timed out before a full line arrived, or that
    /// an overlong line was dropped. Invalid UTF-8 is replaced rather than
    /// rejected.
    pub fn read_line(&mut self) -> io::Result<Option<String>> {
        let limit = (MAX_LINE_LEN - self.buf.len()) as u64;

        match (&mut self.reader).take(limit).read_until(b'\n', &mut self.buf) {
            Ok(0) if self.buf.is_empty() => Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                "serial stream ended",
            )),
            Ok(_) if !self.buf.ends_with(b"\n") && self.buf.len() >= MAX_LINE_LEN => {
                debug!("dropping {} bytes without a line break", self.buf.len());
                self.buf.clear();
                self.discarding = true;
                Ok(None)
            }
            Ok(_) => {
                let discarded = mem::replace(&mut self.discarding, false);
                let line = (!discarded).then(|| String::from_utf8_lossy(&self.buf).into_owned());
                self.buf.clear();
                Ok(line)
            }
            Err(err) if is_timeout(&err) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
    )
}

/// Forwards lines into `tx` until the receiver goes away or the stream fails.
/// The reader (and with it the port) is dropped on return.
pub fn pump_lines<R: Read>(
    mut reader: LineReader<R>,
    tx: mpsc::Sender<String>,
) -> io::Result<()> {
    loop {
        if tx.is_closed() {
            debug!("line receiver closed, stopping serial reader");
            return Ok(());
        }

        let Some(line) = reader.read_line()? else {
            continue;
        };

        if tx.blocking_send(line).is_err() {
            debug!("line receiver closed, stopping serial reader");
            return Ok(());
        }
    }
}
