//! trouble-host binding for [`CharacteristicHandle`]
//!
//! Wraps a characteristic registered in [`SteeringServer`] together with the
//! active connection, so the service adapter can set and notify it without
//! knowing about the stack.

use heapless::Vec;
use trouble_host::prelude::*;

use crate::ble::service::{CharacteristicValue, SteeringServer};
use crate::ble::traits::{CharacteristicHandle, StackError};

/// A characteristic owned by the attribute server, bound to one connection
pub struct GattCharacteristic<'a, 'values, 'server, P: PacketPool> {
    server: &'a SteeringServer<'values>,
    characteristic: &'a Characteristic<CharacteristicValue>,
    connection: &'a GattConnection<'values, 'server, P>,
}

impl<'a, 'values, 'server, P: PacketPool> GattCharacteristic<'a, 'values, 'server, P> {
    pub fn new(
        server: &'a SteeringServer<'values>,
        characteristic: &'a Characteristic<CharacteristicValue>,
        connection: &'a GattConnection<'values, 'server, P>,
    ) -> Self {
        Self {
            server,
            characteristic,
            connection,
        }
    }
}

impl<'a, 'values, 'server, P: PacketPool> CharacteristicHandle
    for GattCharacteristic<'a, 'values, 'server, P>
{
    fn set_value(&self, value: &[u8]) -> Result<(), StackError> {
        let value: CharacteristicValue =
            Vec::from_slice(value).map_err(|_| StackError::InvalidLength)?;
        self.server
            .set(self.characteristic, &value)
            .map_err(|_| StackError::SetValueFailed)
    }

    async fn notify(&self) -> Result<(), StackError> {
        let value = self
            .server
            .get(self.characteristic)
            .map_err(|_| StackError::NotifyFailed)?;
        self.characteristic
            .notify(self.connection, &value)
            .await
            .map_err(|_| StackError::NotConnected)
    }
}
