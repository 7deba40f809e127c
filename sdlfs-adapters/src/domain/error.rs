//! Domain-level errors.

use core::fmt;

/// Errors that can occur while deriving a block geometry from a medium.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum GeometryError {
    /// The medium reported a capacity of zero sectors.
    ZeroCapacity,
}

impl fmt::Display for GeometryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCapacity => write!(f, "medium reports zero capacity"),
        }
    }
}

impl core::error::Error for GeometryError {}
