//! BLE client that subscribes to the steering characteristic.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use btleplug::api::{Central, Characteristic, Manager as _, Peripheral as _, ScanFilter};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::time::timeout;
use uuid::Uuid;

pub const STEERING_SERVICE_UUID: Uuid = Uuid::from_u128(0x4fafc201_1fb5_459e_8fcc_c5c9c331914b);
pub const STEERING_CHAR_UUID: Uuid = Uuid::from_u128(0xbeb5483e_36e1_4688_b7f5_ea07361b26a8);

/// BLE central subscribed to steering notifications.
pub struct SteeringClient {
    peripheral: Peripheral,
    steering_char: Characteristic,
    /// Notification values in arrival order
    notifications: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl SteeringClient {
    /// Scan for a device whose name starts with `name_prefix` and connect.
    pub async fn connect_by_name(name_prefix: &str, scan_timeout: Duration) -> Result<Self> {
        let manager = Manager::new().await?;
        let adapters = manager.adapters().await?;
        let adapter = adapters
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No Bluetooth adapters found"))?;

        adapter.start_scan(ScanFilter::default()).await?;
        let peripheral = Self::find_device_by_name(&adapter, name_prefix, scan_timeout).await?;
        adapter.stop_scan().await?;

        peripheral.connect().await?;
        peripheral.discover_services().await?;

        let steering_char = peripheral
            .characteristics()
            .iter()
            .find(|c| c.uuid == STEERING_CHAR_UUID && c.service_uuid == STEERING_SERVICE_UUID)
            .cloned()
            .ok_or_else(|| anyhow!("Steering characteristic not found"))?;

        peripheral.subscribe(&steering_char).await?;

        let notifications = Arc::new(Mutex::new(Vec::new()));

        let notifications_clone = notifications.clone();
        let peripheral_clone = peripheral.clone();
        tokio::spawn(async move {
            let mut stream = match peripheral_clone.notifications().await {
                Ok(s) => s,
                Err(_) => return,
            };

            while let Some(data) = stream.next().await {
                if data.uuid == STEERING_CHAR_UUID {
                    notifications_clone.lock().await.push(data.value);
                }
            }
        });

        Ok(Self {
            peripheral,
            steering_char,
            notifications,
        })
    }

    async fn find_device_by_name(
        adapter: &Adapter,
        name_prefix: &str,
        scan_timeout: Duration,
    ) -> Result<Peripheral> {
        let start = std::time::Instant::now();

        while start.elapsed() < scan_timeout {
            for peripheral in adapter.peripherals().await? {
                if let Some(props) = peripheral.properties().await? {
                    if let Some(local_name) = props.local_name {
                        if local_name.starts_with(name_prefix) {
                            return Ok(peripheral);
                        }
                    }
                }
            }

            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        Err(anyhow!("Device '{}*' not found within timeout", name_prefix))
    }

    /// Wait for the next steering notification.
    pub async fn wait_for_notification(&self, wait: Duration) -> Result<Vec<u8>> {
        let result = timeout(wait, async {
            loop {
                {
                    let mut notifications = self.notifications.lock().await;
                    if !notifications.is_empty() {
                        return notifications.remove(0);
                    }
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await;

        result.map_err(|_| anyhow!("Timeout waiting for steering notification"))
    }

    /// Read the current characteristic value.
    pub async fn read_value(&self) -> Result<Vec<u8>> {
        Ok(self.peripheral.read(&self.steering_char).await?)
    }

    /// Drop any notifications received so far.
    pub async fn clear_notifications(&self) {
        self.notifications.lock().await.clear();
    }

    /// Unsubscribe and disconnect.
    pub async fn disconnect(&self) -> Result<()> {
        self.peripheral.unsubscribe(&self.steering_char).await?;
        self.peripheral.disconnect().await?;
        Ok(())
    }
}
