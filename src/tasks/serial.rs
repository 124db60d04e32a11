//! Serial task for command/response handling.
//!
//! Reads COBS frames from the host, dispatches each command against the BLE
//! link and writes the response back. Generic over `embedded_io_async`
//! halves so it works with USB Serial JTAG or a UART.

use embassy_time::{Duration, Timer};
use embedded_io_async::{Read, Write};
use log::warn;

use crate::commands::{CommandParser, ResponseSerialiser};
use crate::dispatcher::CommandDispatcher;
use crate::link::StaticLink;
use crate::protocol::FrameAccumulator;

/// Task that serves serial commands until the port fails for good.
pub async fn serial_task<R: Read, W: Write>(mut reader: R, mut writer: W) {
    let mut accumulator = FrameAccumulator::new();
    let parser = CommandParser::new();
    let serialiser = ResponseSerialiser::new();
    let dispatcher = CommandDispatcher::new();
    let link = StaticLink;

    let mut buf = [0u8; 64];
    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => continue,
            Ok(n) => n,
            Err(_) => {
                // Transient port error, back off and retry
                Timer::after(Duration::from_millis(10)).await;
                continue;
            }
        };

        for &byte in &buf[..n] {
            let Some(frame) = accumulator.push(byte) else {
                continue;
            };

            let response = match parser.decode_frame(&frame) {
                Ok(command) => dispatcher.dispatch(&link, command),
                Err(response) => response,
            };

            let encoded = serialiser.serialise(&response);
            if writer.write_all(&encoded).await.is_err() {
                warn!("Serial: response write failed");
            }
        }
    }
}
