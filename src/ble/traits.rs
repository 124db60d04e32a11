//! Characteristic trait for abstraction and testability
//!
//! The BLE stack owns every characteristic object. This trait is the narrow
//! surface the service adapter needs from one, so the trouble-host binding
//! can be swapped with a recording mock in tests.

use core::future::Future;

/// Errors reported by the BLE stack for a characteristic operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackError {
    /// Storing the characteristic value failed
    SetValueFailed,
    /// Pushing the notification to the peer failed
    NotifyFailed,
    /// Value does not fit the characteristic
    InvalidLength,
    /// No active connection to notify on
    NotConnected,
}

/// Characteristic object owned by the BLE stack
///
/// Methods take `&self`: the adapter only ever holds a shared, non-owning
/// borrow of the characteristic.
pub trait CharacteristicHandle {
    /// Store `value` as the characteristic's current value
    fn set_value(&self, value: &[u8]) -> Result<(), StackError>;

    /// Push the current value to subscribed peers
    fn notify(&self) -> impl Future<Output = Result<(), StackError>>;
}

#[cfg(test)]
pub mod mock {
    //! Mock characteristic for testing

    use super::*;
    use core::cell::RefCell;
    use heapless::Vec;

    /// Maximum value length recorded per call
    pub const MAX_VALUE_LEN: usize = 16;

    /// A single recorded stack call
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        SetValue(Vec<u8, MAX_VALUE_LEN>),
        Notify,
    }

    /// Mock characteristic recording every call in order
    pub struct MockCharacteristic {
        /// Ordered call log
        calls: RefCell<Vec<Call, 16>>,
        /// Current stored value
        value: RefCell<Vec<u8, MAX_VALUE_LEN>>,
        /// Error to return on next set_value
        next_set_error: RefCell<Option<StackError>>,
        /// Error to return on next notify
        next_notify_error: RefCell<Option<StackError>>,
    }

    impl MockCharacteristic {
        /// Create a new mock characteristic
        pub fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                value: RefCell::new(Vec::new()),
                next_set_error: RefCell::new(None),
                next_notify_error: RefCell::new(None),
            }
        }

        /// Get the ordered call log
        pub fn calls(&self) -> Vec<Call, 16> {
            self.calls.borrow().clone()
        }

        /// Get the value most recently stored
        pub fn value(&self) -> Vec<u8, MAX_VALUE_LEN> {
            self.value.borrow().clone()
        }

        /// Set an error to be returned by the next set_value() call
        pub fn set_next_set_error(&self, error: StackError) {
            *self.next_set_error.borrow_mut() = Some(error);
        }

        /// Set an error to be returned by the next notify() call
        pub fn set_next_notify_error(&self, error: StackError) {
            *self.next_notify_error.borrow_mut() = Some(error);
        }
    }

    impl Default for MockCharacteristic {
        fn default() -> Self {
            Self::new()
        }
    }

    impl CharacteristicHandle for MockCharacteristic {
        fn set_value(&self, value: &[u8]) -> Result<(), StackError> {
            let mut recorded = Vec::new();
            recorded
                .extend_from_slice(value)
                .map_err(|_| StackError::InvalidLength)?;
            let _ = self.calls.borrow_mut().push(Call::SetValue(recorded.clone()));

            if let Some(error) = self.next_set_error.borrow_mut().take() {
                return Err(error);
            }

            *self.value.borrow_mut() = recorded;
            Ok(())
        }

        async fn notify(&self) -> Result<(), StackError> {
            let _ = self.calls.borrow_mut().push(Call::Notify);

            if let Some(error) = self.next_notify_error.borrow_mut().take() {
                return Err(error);
            }

            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_mock_records_in_order() {
            let characteristic = MockCharacteristic::new();

            futures::executor::block_on(async {
                characteristic.set_value(&[0x01, 0x02]).unwrap();
                characteristic.notify().await.unwrap();
            });

            let calls = characteristic.calls();
            assert_eq!(calls.len(), 2);
            assert_eq!(calls[0], Call::SetValue(Vec::from_slice(&[0x01, 0x02]).unwrap()));
            assert_eq!(calls[1], Call::Notify);
            assert_eq!(characteristic.value().as_slice(), &[0x01, 0x02]);
        }

        #[test]
        fn test_mock_notify_error() {
            let characteristic = MockCharacteristic::new();

            futures::executor::block_on(async {
                characteristic.set_next_notify_error(StackError::NotConnected);

                let result = characteristic.notify().await;
                assert_eq!(result, Err(StackError::NotConnected));

                // Error should be cleared, next call should succeed
                characteristic.notify().await.unwrap();
            });
        }

        #[test]
        fn test_mock_set_error_keeps_previous_value() {
            let characteristic = MockCharacteristic::new();
            characteristic.set_value(&[0xAA]).unwrap();

            characteristic.set_next_set_error(StackError::SetValueFailed);
            assert_eq!(
                characteristic.set_value(&[0xBB]),
                Err(StackError::SetValueFailed)
            );
            assert_eq!(characteristic.value().as_slice(), &[0xAA]);
        }
    }
}
