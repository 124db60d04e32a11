#![no_std]
#![no_main]

extern crate alloc;

// Required for ESP-IDF bootloader compatibility
// Use explicit parameters to ensure correct efuse block revision values
esp_bootloader_esp_idf::esp_app_desc!(
    env!("CARGO_PKG_VERSION"),  // version
    env!("CARGO_PKG_NAME"),     // project_name
    "00:00:00",                 // build_time
    "2025-01-01",               // build_date
    "0.0.0",                    // idf_ver (not using IDF)
    0x10000,                    // mmu_page_size (64KB)
    0,                          // min_efuse_blk_rev_full (accept all)
    u16::MAX                    // max_efuse_blk_rev_full (accept all)
);

use embassy_executor::Spawner;
use esp_backtrace as _;
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{Config as UartConfig, Uart, UartTx};
use esp_hal::usb_serial_jtag::{UsbSerialJtag, UsbSerialJtagRx, UsbSerialJtagTx};
use esp_hal::Async;
use log::{info, LevelFilter};
use static_cell::StaticCell;

use steering_service_firmware::config;
use steering_service_firmware::debug;
use steering_service_firmware::tasks;

/// Static executor for embassy
static EXECUTOR: StaticCell<esp_rtos::embassy::Executor> = StaticCell::new();

/// Static cell for esp-radio controller (needed for 'static lifetime)
static RADIO_CONTROLLER: StaticCell<esp_radio::Controller<'static>> = StaticCell::new();

/// Type alias for the BLE controller
type BleController = trouble_host::prelude::ExternalController<
    esp_radio::ble::controller::BleConnector<'static>,
    10,
>;

#[esp_hal::main]
fn main() -> ! {
    // Initialise heap allocator for BLE support (64KB - BLE requires significant heap)
    esp_alloc::heap_allocator!(size: 64 * 1024);

    let peripherals = esp_hal::init(esp_hal::Config::default());

    // Log output on UART0 TX, installed before anything logs
    let log_uart = Uart::new(
        peripherals.UART0,
        UartConfig::default().with_baudrate(config::debug_uart::BAUD_RATE),
    )
    .unwrap()
    .with_tx(peripherals.GPIO43)
    .into_async();
    let (_, log_tx) = log_uart.split();
    debug::init(LevelFilter::Info);

    // Initialise the RTOS scheduler with timer - MUST be done before any async operations
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);

    // USB Serial JTAG carries steering commands from the host
    let usb_serial = UsbSerialJtag::new(peripherals.USB_DEVICE).into_async();
    let (usb_rx, usb_tx) = usb_serial.split();

    // Unique device ID from eFuse MAC address (last 3 bytes)
    let mac = esp_hal::efuse::Efuse::read_base_mac_address();
    let device_id: [u8; 3] = [mac[3], mac[4], mac[5]];

    // Initialise esp-radio for BLE support (must be after esp_rtos::start)
    let radio_controller = RADIO_CONTROLLER.init(
        esp_radio::init().expect("Failed to initialize esp-radio")
    );

    let ble_connector = esp_radio::ble::controller::BleConnector::new(
        radio_controller,
        peripherals.BT,
        esp_radio::ble::Config::default(),
    ).expect("Failed to initialize BLE connector");

    // Wrap in ExternalController for trouble-host compatibility
    let controller: BleController = trouble_host::prelude::ExternalController::new(ble_connector);

    info!("Steering service firmware {}", env!("CARGO_PKG_VERSION"));

    let executor = EXECUTOR.init(esp_rtos::embassy::Executor::new());
    executor.run(|spawner| {
        spawner.must_spawn(async_main(spawner, usb_rx, usb_tx, log_tx, controller, device_id));
    })
}

#[embassy_executor::task]
async fn async_main(
    spawner: Spawner,
    usb_rx: UsbSerialJtagRx<'static, Async>,
    usb_tx: UsbSerialJtagTx<'static, Async>,
    log_tx: UartTx<'static, Async>,
    ble_controller: BleController,
    device_id: [u8; 3],
) {
    spawner.must_spawn(log_writer_task(log_tx));
    spawner.must_spawn(serial_task(usb_rx, usb_tx));
    spawner.must_spawn(ble_host_task(ble_controller, device_id));
}

/// Task that drains buffered log output to UART0
#[embassy_executor::task]
async fn log_writer_task(log_tx: UartTx<'static, Async>) {
    debug::debug_writer_task(log_tx).await;
}

/// Task that serves steering commands from USB serial
#[embassy_executor::task]
async fn serial_task(
    usb_rx: UsbSerialJtagRx<'static, Async>,
    usb_tx: UsbSerialJtagTx<'static, Async>,
) {
    tasks::serial_task(usb_rx, usb_tx).await;
}

/// Task that manages BLE connectivity
///
/// Advertises the steering service and notifies each new steering angle to
/// the connected central.
#[embassy_executor::task]
async fn ble_host_task(controller: BleController, device_id: [u8; 3]) {
    tasks::ble_task(controller, device_id).await;
}
