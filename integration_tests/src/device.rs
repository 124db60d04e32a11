//! Serial client for the steering firmware.

use std::io::{Read, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use serialport::SerialPort;

use crate::protocol::{
    build_command, build_command_payload, cobs_decode, cobs_encode, parse_response, parse_status,
    CommandId, LinkStatus, Response, ResponseId,
};

/// Find the first ttyACM port that answers GetVersion.
pub fn find_data_port() -> Result<String> {
    for port_info in serialport::available_ports()? {
        if !port_info.port_name.contains("ttyACM") {
            continue;
        }

        if let Ok(mut client) = DeviceClient::new(&port_info.port_name, 115200) {
            client.set_timeout(Duration::from_millis(500));
            if let Ok(response) = client.send_command(CommandId::GetVersion, &[]) {
                if response.resp_id == ResponseId::Version {
                    return Ok(port_info.port_name);
                }
            }
        }
    }

    anyhow::bail!("No data port found - ensure device is connected")
}

/// Resolve a port argument - returns the port path if not "auto", otherwise auto-detects.
pub fn resolve_port(port_arg: &str) -> Result<String> {
    if port_arg == "auto" {
        find_data_port()
    } else {
        Ok(port_arg.to_string())
    }
}

/// Client for the steering firmware's serial protocol.
pub struct DeviceClient {
    port: Box<dyn SerialPort>,
    timeout: Duration,
}

impl DeviceClient {
    /// Open the serial port.
    pub fn new(port_name: &str, baud_rate: u32) -> Result<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(Duration::from_secs(2))
            .open()?;

        Ok(Self {
            port,
            timeout: Duration::from_secs(2),
        })
    }

    /// Set the response timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Clear any pending data in the serial buffer.
    pub fn clear_buffer(&mut self) -> Result<()> {
        self.port.clear(serialport::ClearBuffer::All)?;
        Ok(())
    }

    /// Send a command and wait for its response.
    pub fn send_command(&mut self, cmd_id: CommandId, payload: &[u8]) -> Result<Response> {
        let frame = build_command(cmd_id, payload);
        self.send_frame(&frame)
    }

    /// Send a command with a raw command ID (for testing invalid commands).
    #[allow(dead_code)] // integration-tests only
    pub fn send_raw_command(&mut self, cmd_id: u8, payload: &[u8]) -> Result<Response> {
        let frame = cobs_encode(&build_command_payload(cmd_id, payload));
        self.send_frame(&frame)
    }

    /// Send an already built raw frame after COBS encoding it.
    #[allow(dead_code)] // integration-tests only
    pub fn send_raw_frame(&mut self, raw: &[u8]) -> Result<Response> {
        self.send_frame(&cobs_encode(raw))
    }

    /// Push a steering angle.
    pub fn set_steering_angle(&mut self, angle: f32) -> Result<Response> {
        self.send_command(CommandId::SetSteeringAngle, &angle.to_le_bytes())
    }

    /// Query the BLE link status.
    pub fn get_status(&mut self) -> Result<LinkStatus> {
        let response = self.send_command(CommandId::GetStatus, &[])?;
        parse_status(&response)
    }

    /// Poll GetStatus until `predicate` holds or `timeout` expires.
    #[allow(dead_code)] // ble-steering-tests only
    pub fn wait_for_status<F>(&mut self, timeout: Duration, predicate: F) -> Result<LinkStatus>
    where
        F: Fn(&LinkStatus) -> bool,
    {
        let start = Instant::now();
        loop {
            let status = self.get_status()?;
            if predicate(&status) {
                return Ok(status);
            }
            if start.elapsed() >= timeout {
                anyhow::bail!("Timeout waiting for link status, last: {:?}", status);
            }
            std::thread::sleep(Duration::from_millis(100));
        }
    }

    fn send_frame(&mut self, frame: &[u8]) -> Result<Response> {
        self.port.write_all(frame)?;
        self.port.flush()?;

        // Add zero delimiter back - corncobs expects it
        let mut response_data = self.read_frame()?;
        response_data.push(0x00);
        let decoded = cobs_decode(&response_data)?;
        parse_response(&decoded)
    }

    /// Read bytes until zero delimiter.
    fn read_frame(&mut self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        let mut buf = [0u8; 1];
        let start = Instant::now();

        while start.elapsed() < self.timeout {
            match self.port.read(&mut buf) {
                Ok(1) => {
                    if buf[0] == 0x00 {
                        if !data.is_empty() {
                            return Ok(data);
                        }
                    } else {
                        data.push(buf[0]);
                    }
                }
                Ok(_) => {}
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                Err(e) => return Err(e.into()),
            }
        }

        anyhow::bail!(
            "Timeout waiting for response, got {} bytes: {:02x?}",
            data.len(),
            data
        );
    }
}
