//! End-to-end steering tests.
//!
//! Angles go in over serial and come back out as BLE notifications on the
//! steering characteristic. Needs one flashed device reachable over both.

mod ble_client;
mod device;
mod protocol;

use std::time::Duration;

use clap::Parser;
use colored::Colorize;

use ble_client::SteeringClient;
use device::{resolve_port, DeviceClient};
use protocol::{ResponseId, ResponseStatus};

#[derive(Parser)]
#[command(name = "ble-steering-tests")]
#[command(about = "Serial to BLE notification tests for the steering service")]
struct Args {
    /// Serial port for the device (use "auto" to auto-detect)
    #[arg(short, long, default_value = "auto")]
    port: String,

    /// Advertised name prefix
    #[arg(long, default_value = "Steering-")]
    ble_name: String,

    /// Baud rate for serial
    #[arg(short, long, default_value = "115200")]
    baud: u32,

    /// BLE scan timeout in seconds
    #[arg(long, default_value = "10")]
    scan_timeout: u64,
}

const NOTIFY_TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let port = resolve_port(&args.port)?;

    println!("{}", "BLE Steering Tests".bold());
    println!("Serial: {}", port);
    println!("BLE: scanning for \"{}*\"", args.ble_name);
    println!();

    println!("Connecting via serial...");
    let mut device = DeviceClient::new(&port, args.baud)?;
    std::thread::sleep(Duration::from_millis(500));
    device.clear_buffer()?;
    println!("{}", "  Serial connected!".green());

    println!("Scanning for BLE device...");
    let client =
        SteeringClient::connect_by_name(&args.ble_name, Duration::from_secs(args.scan_timeout))
            .await?;
    println!("{}", "  BLE connected!".green());

    println!("Waiting for the device to see the subscription...");
    device.wait_for_status(Duration::from_secs(5), |s| s.connected && s.subscribed)?;
    client.clear_notifications().await;

    println!("\n{}", "Running tests...".bold());
    println!();

    let mut passed = 0;
    let mut failed = 0;

    let angles = [
        ("45.5 degrees", 45.5f32),
        ("negative zero", -0.0f32),
        ("NaN payload", f32::from_bits(0x7FC0_0001)),
        ("f32::MAX", f32::MAX),
    ];

    for (i, (name, angle)) in angles.iter().enumerate() {
        print!("  Test {}: notify {} ... ", i + 1, name);
        std::io::Write::flush(&mut std::io::stdout())?;
        report(
            test_angle_notified(&mut device, &client, *angle).await,
            &mut passed,
            &mut failed,
        );
    }

    print!("  Test {}: status tracks last angle ... ", angles.len() + 1);
    std::io::Write::flush(&mut std::io::stdout())?;
    report(test_status_last_angle(&mut device, &client).await, &mut passed, &mut failed);

    print!("  Test {}: angle rejected after disconnect ... ", angles.len() + 2);
    std::io::Write::flush(&mut std::io::stdout())?;
    report(test_disconnect(&mut device, &client).await, &mut passed, &mut failed);

    println!();
    println!("{}", "=".repeat(60));
    println!(
        "  Total: {} passed, {} failed",
        passed.to_string().green(),
        if failed > 0 {
            failed.to_string().red()
        } else {
            failed.to_string().normal()
        }
    );
    println!("{}", "=".repeat(60));

    if failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}

fn report(result: anyhow::Result<()>, passed: &mut u32, failed: &mut u32) {
    match result {
        Ok(()) => {
            println!("{}", "PASS".green().bold());
            *passed += 1;
        }
        Err(e) => {
            println!("{}", "FAIL".red().bold());
            println!("    {}", e.to_string().red());
            *failed += 1;
        }
    }
}

async fn test_angle_notified(
    device: &mut DeviceClient,
    client: &SteeringClient,
    angle: f32,
) -> anyhow::Result<()> {
    let response = device.set_steering_angle(angle)?;
    if response.resp_id != ResponseId::AngleAccepted {
        anyhow::bail!("Expected AngleAccepted, got {:?}", response);
    }

    let value = client.wait_for_notification(NOTIFY_TIMEOUT).await?;
    let expected = angle.to_bits().to_le_bytes();
    if value != expected {
        anyhow::bail!("Expected {:02x?}, got {:02x?}", expected, value);
    }

    Ok(())
}

async fn test_status_last_angle(
    device: &mut DeviceClient,
    client: &SteeringClient,
) -> anyhow::Result<()> {
    device.set_steering_angle(-12.25)?;
    client.wait_for_notification(NOTIFY_TIMEOUT).await?;

    let status = device.get_status()?;
    if status.last_angle != -12.25 {
        anyhow::bail!("Expected last angle -12.25, got {}", status.last_angle);
    }

    let value = client.read_value().await?;
    if value != (-12.25f32).to_le_bytes() {
        anyhow::bail!("Characteristic read returned {:02x?}", value);
    }

    Ok(())
}

async fn test_disconnect(device: &mut DeviceClient, client: &SteeringClient) -> anyhow::Result<()> {
    client.disconnect().await?;
    device.wait_for_status(Duration::from_secs(5), |s| !s.connected)?;

    let response = device.set_steering_angle(1.0)?;
    match response.error_status() {
        Some(status) if status == ResponseStatus::NotConnected as u8 => Ok(()),
        _ => anyhow::bail!("Expected NotConnected, got {:?}", response),
    }
}
