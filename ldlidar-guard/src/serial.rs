use crate::config::GuardConfig;
use crate::error::LidarError;
use crate::source::ByteSource;
use log::debug;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, Read};
use std::time::Duration;

/// Opens the sensor port as 8N1 without flow control.
pub fn open_port(
    port_name: &str,
    baud_rate: u32,
    poll_interval: Duration,
) -> Result<Box<dyn SerialPort>, LidarError> {
    let port = serialport::new(port_name, baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .flow_control(FlowControl::None)
        .timeout(poll_interval)
        .open()?;
    Ok(port)
}

pub(crate) fn get_n_read(port: &mut Box<dyn SerialPort>) -> Result<usize, LidarError> {
    let n_u32: u32 = port.bytes_to_read()?;
    Ok(n_u32.try_into().unwrap_or(0))
}

/// Discards whatever is waiting in the input buffer.
pub(crate) fn flush(port: &mut Box<dyn SerialPort>) -> Result<(), LidarError> {
    let n_read: usize = get_n_read(port).unwrap_or(0);
    if n_read == 0 {
        return Ok(());
    }
    let mut stale: Vec<u8> = vec![0; n_read];
    port.read(stale.as_mut_slice())?;
    debug!("Flushed {} stale bytes", n_read);
    Ok(())
}

/// Byte source backed by a serial port.
pub struct SerialSource {
    port: Box<dyn SerialPort>,
}

impl SerialSource {
    pub fn new(port: Box<dyn SerialPort>) -> SerialSource {
        SerialSource { port }
    }

    pub fn open(config: &GuardConfig) -> Result<SerialSource, LidarError> {
        let mut port = open_port(&config.port, config.baud_rate, config.poll_interval())?;
        if !cfg!(test) {
            // In testing, disable flushing to receive dummy signals
            flush(&mut port)?;
        }
        Ok(SerialSource::new(port))
    }

    pub fn into_inner(self) -> Box<dyn SerialPort> {
        self.port
    }
}

impl ByteSource for SerialSource {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, LidarError> {
        match self.port.read(buf) {
            Ok(0) => Err(LidarError::TransportClosed),
            Ok(n) => Ok(n),
            Err(e) => match e.kind() {
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => {
                    Ok(0)
                }
                io::ErrorKind::BrokenPipe
                | io::ErrorKind::NotConnected
                | io::ErrorKind::UnexpectedEof
                | io::ErrorKind::ConnectionAborted => Err(LidarError::TransportClosed),
                _ => Err(LidarError::IoError(e)),
            },
        }
    }
}
