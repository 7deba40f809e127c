//! RAM-backed sector device for host-side testing.

extern crate alloc;

use alloc::vec::Vec;
use core::fmt;

use aligned::{Aligned, A4};

use crate::{sectors_to_slice, SectorDevice};

/// Byte value every sector holds after an erase.
pub const ERASED_BYTE: u8 = 0xFF;

/// Error reported by [`RamSectorDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RamDeviceError {
    /// The request extends past the end of the medium.
    OutOfRange {
        /// First sector of the rejected request.
        sector: u32,
        /// Number of sectors requested.
        count: u32,
    },
}

impl fmt::Display for RamDeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { sector, count } => {
                write!(f, "sectors {}..{} are out of range", sector, sector + count)
            }
        }
    }
}

impl core::error::Error for RamDeviceError {}

/// An in-memory medium with sector semantics.
///
/// Sectors start out erased ([`ERASED_BYTE`]) and return to that state on
/// [`erase_sectors`](SectorDevice::erase_sectors). Out-of-range requests
/// fail with [`RamDeviceError::OutOfRange`]; everything in range succeeds.
pub struct RamSectorDevice<const SECTOR_SIZE: usize> {
    sectors: Vec<Aligned<A4, [u8; SECTOR_SIZE]>>,
}

impl<const SECTOR_SIZE: usize> RamSectorDevice<SECTOR_SIZE> {
    /// Create a device holding `sector_count` erased sectors.
    pub fn new(sector_count: u32) -> Self {
        let mut sectors = Vec::new();
        sectors.resize_with(sector_count as usize, || Aligned([ERASED_BYTE; SECTOR_SIZE]));
        Self { sectors }
    }

    /// Borrow one sector's content.
    ///
    /// # Panics
    ///
    /// Panics if `sector` is out of range.
    pub fn sector(&self, sector: u32) -> &[u8] {
        &self.sectors[sector as usize][..]
    }

    /// Borrow the whole medium as one byte slice.
    pub fn contents(&self) -> &[u8] {
        sectors_to_slice(&self.sectors)
    }

    fn span(&self, sector: u32, count: u32) -> Result<core::ops::Range<usize>, RamDeviceError> {
        let start = sector as usize;
        let end = start + count as usize;
        if end > self.sectors.len() {
            return Err(RamDeviceError::OutOfRange { sector, count });
        }
        Ok(start..end)
    }
}

impl<const SECTOR_SIZE: usize> SectorDevice<SECTOR_SIZE> for RamSectorDevice<SECTOR_SIZE> {
    type Error = RamDeviceError;
    type Align = A4;

    async fn read_sectors(
        &mut self,
        sector: u32,
        dst: &mut [Aligned<Self::Align, [u8; SECTOR_SIZE]>],
    ) -> Result<(), Self::Error> {
        let span = self.span(sector, dst.len() as u32)?;
        for (dst, src) in dst.iter_mut().zip(&self.sectors[span]) {
            dst.copy_from_slice(&src[..]);
        }
        Ok(())
    }

    async fn write_sectors(
        &mut self,
        sector: u32,
        src: &[Aligned<Self::Align, [u8; SECTOR_SIZE]>],
    ) -> Result<(), Self::Error> {
        let span = self.span(sector, src.len() as u32)?;
        for (dst, src) in self.sectors[span].iter_mut().zip(src) {
            dst.copy_from_slice(&src[..]);
        }
        Ok(())
    }

    async fn erase_sectors(&mut self, sector: u32, count: u32) -> Result<(), Self::Error> {
        let span = self.span(sector, count)?;
        for s in &mut self.sectors[span] {
            s.fill(ERASED_BYTE);
        }
        Ok(())
    }

    async fn sector_count(&mut self) -> Result<u32, Self::Error> {
        Ok(self.sectors.len() as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTOR_SIZE: usize = 512;

    #[tokio::test]
    async fn starts_erased_and_round_trips() {
        let mut device = RamSectorDevice::<SECTOR_SIZE>::new(8);
        assert!(device.contents().iter().all(|&b| b == ERASED_BYTE));

        let payload: Aligned<A4, [u8; SECTOR_SIZE]> = Aligned([0x42; SECTOR_SIZE]);
        device.write_sectors(3, core::slice::from_ref(&payload)).await.unwrap();

        let mut read: Aligned<A4, [u8; SECTOR_SIZE]> = Aligned([0; SECTOR_SIZE]);
        device.read_sectors(3, core::slice::from_mut(&mut read)).await.unwrap();
        assert_eq!(&read[..], &payload[..]);
    }

    #[tokio::test]
    async fn erase_restores_the_erased_state() {
        let mut device = RamSectorDevice::<SECTOR_SIZE>::new(4);
        let payload: Aligned<A4, [u8; SECTOR_SIZE]> = Aligned([0x42; SECTOR_SIZE]);
        device.write_sectors(1, core::slice::from_ref(&payload)).await.unwrap();

        device.erase_sectors(1, 1).await.unwrap();
        assert!(device.sector(1).iter().all(|&b| b == ERASED_BYTE));
    }

    #[tokio::test]
    async fn out_of_range_requests_fail() {
        let mut device = RamSectorDevice::<SECTOR_SIZE>::new(4);
        assert_eq!(device.sector_count().await.unwrap(), 4);

        let err = device.erase_sectors(3, 2).await.unwrap_err();
        assert_eq!(err, RamDeviceError::OutOfRange { sector: 3, count: 2 });

        let mut read: Aligned<A4, [u8; SECTOR_SIZE]> = Aligned([0; SECTOR_SIZE]);
        assert!(device.read_sectors(4, core::slice::from_mut(&mut read)).await.is_err());
    }
}
