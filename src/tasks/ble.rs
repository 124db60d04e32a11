//! BLE task for the steering service
//!
//! Implements the BLE host task that advertises, accepts a central and
//! pushes steering angles from [`STEERING_SIGNAL`] through the service adapter.

use core::sync::atomic::Ordering;

use embassy_futures::select::{select, Either};
use log::{error, info, warn};
use trouble_host::prelude::*;

use crate::ble::binding::GattCharacteristic;
use crate::ble::naming::{format_device_name, DEVICE_NAME_BUF_LEN};
use crate::ble::service::SteeringServer;
use crate::ble::{notification_event, Event, InitConfig, ServiceState};
use crate::config::ble::{CONNECTIONS_MAX, L2CAP_CHANNELS_MAX};
use crate::link::{CONNECTED, STEERING_SIGNAL, SUBSCRIBED};

/// Handler registered with the service state
fn on_service_event(event: Event) {
    info!("BLE: Steering service event {:?}", event);
}

/// Main BLE task that manages the Bluetooth stack and connections
///
/// This task:
/// 1. Initialises the BLE host on top of `controller`
/// 2. Advertises as "Steering-XXXXXX" (unique per device)
/// 3. Binds the steering service state to each accepted connection
/// 4. Notifies every steering angle received while connected
pub async fn ble_task<C: Controller>(controller: C, device_id: [u8; 3]) {
    let mut device_name_buf = [0u8; DEVICE_NAME_BUF_LEN];
    let device_name = format_device_name(&mut device_name_buf, &device_id);

    info!("BLE: Starting as '{}'", device_name);

    let mut resources: HostResources<DefaultPacketPool, CONNECTIONS_MAX, L2CAP_CHANNELS_MAX> =
        HostResources::new();

    // Random static address derived from the device ID
    let stack = trouble_host::new(controller, &mut resources).set_random_address(
        Address::random([device_id[0], device_id[1], device_id[2], 0x5E, 0xE7, 0xC3]),
    );

    let Host {
        mut peripheral,
        mut runner,
        ..
    } = stack.build();

    let gap = GapConfig::Peripheral(PeripheralConfig {
        name: device_name,
        appearance: &appearance::UNKNOWN,
    });
    let server = match SteeringServer::new_with_config(gap) {
        Ok(s) => s,
        Err(_) => {
            error!("BLE: Failed to create GATT server");
            return;
        }
    };

    let runner_task = runner.run();

    let peripheral_task = async {
        let mut adv_data = [0u8; 31];
        let len = match AdStructure::encode_slice(
            &[
                AdStructure::Flags(LE_GENERAL_DISCOVERABLE | BR_EDR_NOT_SUPPORTED),
                AdStructure::CompleteLocalName(device_name.as_bytes()),
            ],
            &mut adv_data,
        ) {
            Ok(l) => l,
            Err(_) => return,
        };

        loop {
            info!("BLE: Advertising...");
            let advertiser = match peripheral
                .advertise(
                    &Default::default(),
                    Advertisement::ConnectableScannableUndirected {
                        adv_data: &adv_data[..len],
                        scan_data: &[],
                    },
                )
                .await
            {
                Ok(a) => a,
                Err(_) => continue,
            };

            let acceptor = match advertiser.accept().await {
                Ok(a) => a,
                Err(_) => continue,
            };

            let conn = match acceptor.with_attribute_server(&*server) {
                Ok(c) => c,
                Err(_) => continue,
            };

            serve_connection(&server, &conn).await;
        }
    };

    select(runner_task, peripheral_task).await;
}

/// Run the steering service for one connection until the central disconnects
async fn serve_connection<P: PacketPool>(
    server: &SteeringServer<'_>,
    conn: &GattConnection<'_, '_, P>,
) {
    let service = &server.steering_service;
    let steering = GattCharacteristic::new(server, &service.steering, conn);
    let rx = GattCharacteristic::new(server, &service.rx, conn);
    let tx = GattCharacteristic::new(server, &service.tx, conn);

    let mut state = ServiceState::new();
    let _ = state.initialize(&InitConfig {
        evt_handler: Some(on_service_event),
    });

    // Registration: hand the stack-owned characteristics to the service state
    state.set_service_handle(service.handle);
    state.bind_steering(&steering);
    state.bind_rx(&rx);
    state.bind_tx(&tx);
    state.set_connection_handle(conn.raw().handle().raw());

    // Drop any angle submitted before this connection
    STEERING_SIGNAL.reset();
    CONNECTED.store(true, Ordering::Relaxed);
    state.dispatch_event(Event::Connected);

    loop {
        match select(conn.next(), STEERING_SIGNAL.wait()).await {
            Either::First(GattConnectionEvent::Disconnected { reason }) => {
                info!("BLE: Disconnected ({:?})", reason);
                break;
            }
            Either::First(GattConnectionEvent::Gatt { event }) => match event {
                GattEvent::Write(write_event) => {
                    if Some(write_event.handle()) == service.steering.cccd_handle {
                        let event = notification_event(write_event.data());
                        SUBSCRIBED.store(event == Event::NotificationEnabled, Ordering::Relaxed);
                        state.dispatch_event(event);
                    }
                    // RX writes are accepted and ignored
                    let _ = write_event.accept();
                }
                GattEvent::Read(read_event) => {
                    let _ = read_event.accept();
                }
                GattEvent::Other(other_event) => {
                    let _ = other_event.accept();
                }
            },
            Either::First(_) => {}
            Either::Second(angle) => {
                if let Err(e) = state.update_steering_value(angle).await {
                    warn!("BLE: Steering update failed ({:?})", e);
                }
            }
        }
    }

    state.clear_connection();
    CONNECTED.store(false, Ordering::Relaxed);
    SUBSCRIBED.store(false, Ordering::Relaxed);
    state.dispatch_event(Event::Disconnected);
}
