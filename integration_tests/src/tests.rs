//! Serial integration test cases.
//!
//! Run with no BLE central connected to the device.

use colored::Colorize;

use crate::device::DeviceClient;
use crate::protocol::{build_command_payload, CommandId, Response, ResponseId, ResponseStatus};

/// Test result.
pub struct TestResult {
    pub name: String,
    pub passed: bool,
    pub message: Option<String>,
}

impl TestResult {
    fn pass() -> Self {
        Self {
            name: String::new(),
            passed: true,
            message: None,
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            name: String::new(),
            passed: false,
            message: Some(message.into()),
        }
    }
}

/// Run a test function and print results as it happens.
fn run_test<F>(name: &str, device: &mut DeviceClient, test_fn: F) -> TestResult
where
    F: FnOnce(&mut DeviceClient) -> TestResult,
{
    print!("  {} ... ", name);
    std::io::Write::flush(&mut std::io::stdout()).ok();

    let mut result = test_fn(device);
    result.name = name.to_string();

    if result.passed {
        println!("{}", "PASS".green().bold());
    } else {
        println!("{}", "FAIL".red().bold());
        if let Some(msg) = &result.message {
            println!("    {}", msg.red());
        }
    }

    result
}

/// Run all tests and return results.
pub fn run_all_tests(device: &mut DeviceClient) -> Vec<TestResult> {
    vec![
        run_test("GetVersion returns version bytes", device, test_get_version),
        run_test("Invalid command returns error", device, test_invalid_command),
        run_test("Corrupted CRC returns error", device, test_bad_crc),
        run_test("GetStatus reports disconnected", device, test_status_disconnected),
        run_test("Angle without central is rejected", device, test_angle_not_connected),
        run_test("Short angle payload is rejected", device, test_angle_bad_length),
    ]
}

/// Print test results summary.
pub fn print_results(results: &[TestResult]) {
    println!("\n{}", "=".repeat(60));
    println!("{}", "Test Results".bold());
    println!("{}", "=".repeat(60));

    let mut passed = 0;
    let mut failed = 0;

    for result in results {
        if result.passed {
            println!("  {} {}", "[PASS]".green().bold(), result.name);
            passed += 1;
        } else {
            println!("  {} {}", "[FAIL]".red().bold(), result.name);
            if let Some(msg) = &result.message {
                println!("         {}", msg.red());
            }
            failed += 1;
        }
    }

    println!("{}", "-".repeat(60));
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
}

/// Check that `response` is an Error with `expected` status.
fn expect_error(response: anyhow::Result<Response>, expected: ResponseStatus) -> TestResult {
    match response {
        Ok(response) => match response.error_status() {
            Some(status) if status == expected as u8 => TestResult::pass(),
            Some(status) => TestResult::fail(format!(
                "Expected {:?} (0x{:02x}), got 0x{:02x}",
                expected, expected as u8, status
            )),
            None => TestResult::fail(format!("Expected Error response, got {:?}", response.resp_id)),
        },
        Err(e) => TestResult::fail(format!("Error: {}", e)),
    }
}

// --- Individual Tests ---

fn test_get_version(device: &mut DeviceClient) -> TestResult {
    match device.send_command(CommandId::GetVersion, &[]) {
        Ok(response) if response.resp_id == ResponseId::Version && response.payload.len() == 3 => {
            let p = &response.payload;
            print!("(v{}.{}.{}) ", p[0], p[1], p[2]);
            TestResult::pass()
        }
        Ok(response) => TestResult::fail(format!("Unexpected response: {:?}", response)),
        Err(e) => TestResult::fail(format!("Error: {}", e)),
    }
}

fn test_invalid_command(device: &mut DeviceClient) -> TestResult {
    // 0xFE is invalid, 0xFF is the Error response ID
    expect_error(device.send_raw_command(0xFE, &[]), ResponseStatus::InvalidCommand)
}

fn test_bad_crc(device: &mut DeviceClient) -> TestResult {
    let mut raw = build_command_payload(CommandId::GetVersion as u8, &[]);
    let len = raw.len();
    raw[len - 1] ^= 0xFF;
    expect_error(device.send_raw_frame(&raw), ResponseStatus::CrcError)
}

fn test_status_disconnected(device: &mut DeviceClient) -> TestResult {
    match device.get_status() {
        Ok(status) if !status.connected && !status.subscribed => TestResult::pass(),
        Ok(status) => TestResult::fail(format!("Expected disconnected, got {:?}", status)),
        Err(e) => TestResult::fail(format!("Error: {}", e)),
    }
}

fn test_angle_not_connected(device: &mut DeviceClient) -> TestResult {
    expect_error(device.set_steering_angle(45.5), ResponseStatus::NotConnected)
}

fn test_angle_bad_length(device: &mut DeviceClient) -> TestResult {
    expect_error(
        device.send_command(CommandId::SetSteeringAngle, &[0x00, 0x00, 0x36]),
        ResponseStatus::InvalidLength,
    )
}
