//! Adapter layer - concrete implementations of the domain's ports.

mod block_device_adapter;
mod error;

pub use block_device_adapter::BlockDeviceAdapter;
pub use error::AdapterInitError;
