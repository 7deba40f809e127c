//! Adapter-level errors.

use crate::domain::GeometryError;
use core::fmt;

/// Errors that can occur while constructing a
/// [`BlockDeviceAdapter`](super::BlockDeviceAdapter).
///
/// Construction is the only fallible point of the adapter; after it
/// succeeds, contract violations are fatal rather than reported.
#[derive(Debug)]
pub enum AdapterInitError<E> {
    /// The probed capacity does not yield a valid geometry.
    Geometry(GeometryError),
    /// The medium failed the capacity query.
    Device(E),
}

impl<E: fmt::Display> fmt::Display for AdapterInitError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Geometry(e) => write!(f, "geometry error: {}", e),
            Self::Device(e) => write!(f, "device error: {}", e),
        }
    }
}

impl<E: fmt::Debug + fmt::Display> core::error::Error for AdapterInitError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Geometry(e) => Some(e),
            Self::Device(_) => None,
        }
    }
}
