//! Sector device trait for SD/MMC-class media.
//!
//! A sector device exposes storage as a flat run of fixed-size sectors,
//! addressed by a zero-based sector index. Every transfer moves whole
//! sectors; there is no byte-granular access at this layer. Implementations
//! wrap the card's command-layer driver (SPI or SDMMC), which is responsible
//! for bus bring-up and card identification before the device is handed out.
//!
//! Buffers are [`Aligned`] because DMA-capable hosts reject under-aligned
//! transfer memory. The alignment requirement is chosen by the
//! implementation through [`SectorDevice::Align`].
//!
//! The [`alloc` feature](RamSectorDevice) adds a RAM-backed device so the
//! layers above can be exercised on a host without hardware.

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![allow(async_fn_in_trait)]

use core::mem::{align_of, size_of};

pub use aligned::{self, Aligned};

#[cfg(feature = "alloc")]
mod ram;

#[cfg(feature = "alloc")]
pub use ram::{RamDeviceError, RamSectorDevice, ERASED_BYTE};

/// A storage medium addressed in whole sectors.
///
/// All operations run to completion before returning; a transaction that the
/// medium never finishes hangs the caller. There is no retry at this layer:
/// an `Err` means the medium reported the transfer failed.
#[trait_variant::make(SendSectorDevice: Send)]
pub trait SectorDevice<const SECTOR_SIZE: usize> {
    /// Medium-level error reported by a failed transaction.
    type Error: core::error::Error;

    /// Alignment required of transfer buffers.
    type Align: aligned::Alignment;

    /// Read `dst.len()` sectors starting at `sector` into `dst`.
    async fn read_sectors(
        &mut self,
        sector: u32,
        dst: &mut [Aligned<Self::Align, [u8; SECTOR_SIZE]>],
    ) -> Result<(), Self::Error>;

    /// Write `src.len()` sectors starting at `sector` from `src`.
    async fn write_sectors(
        &mut self,
        sector: u32,
        src: &[Aligned<Self::Align, [u8; SECTOR_SIZE]>],
    ) -> Result<(), Self::Error>;

    /// Reset `count` sectors starting at `sector` to the erased state.
    ///
    /// The erased content is medium-defined. Implementations must report
    /// success only if the medium actually performed the erase; they must
    /// not fake one on media that cannot provide it.
    async fn erase_sectors(&mut self, sector: u32, count: u32) -> Result<(), Self::Error>;

    /// Number of sectors the medium holds.
    async fn sector_count(&mut self) -> Result<u32, Self::Error>;
}

/// Reinterpret a run of aligned sectors as one contiguous byte slice.
pub fn sectors_to_slice<A: aligned::Alignment, const N: usize>(
    sectors: &[Aligned<A, [u8; N]>],
) -> &[u8] {
    assert_eq!(
        size_of::<Aligned<A, [u8; N]>>(),
        N,
        "sector size must be a multiple of the alignment"
    );
    // SAFETY: the assert guarantees Aligned<A, [u8; N]> has the same size as
    // [u8; N], so the element layouts line up and the total length is exact.
    unsafe { core::slice::from_raw_parts(sectors.as_ptr().cast(), sectors.len() * N) }
}

/// Mutable variant of [`sectors_to_slice`].
pub fn sectors_to_slice_mut<A: aligned::Alignment, const N: usize>(
    sectors: &mut [Aligned<A, [u8; N]>],
) -> &mut [u8] {
    assert_eq!(
        size_of::<Aligned<A, [u8; N]>>(),
        N,
        "sector size must be a multiple of the alignment"
    );
    // SAFETY: as in sectors_to_slice.
    unsafe { core::slice::from_raw_parts_mut(sectors.as_mut_ptr().cast(), sectors.len() * N) }
}

/// Reinterpret a byte slice as a run of aligned sectors.
///
/// # Panics
///
/// Panics if the slice does not cover a whole number of sectors or its
/// address is under-aligned for `A`.
pub fn slice_to_sectors<A: aligned::Alignment, const N: usize>(
    bytes: &[u8],
) -> &[Aligned<A, [u8; N]>] {
    assert_eq!(
        size_of::<Aligned<A, [u8; N]>>(),
        N,
        "sector size must be a multiple of the alignment"
    );
    assert_eq!(bytes.len() % N, 0, "byte slice must cover whole sectors");
    assert_eq!(
        bytes.as_ptr() as usize % align_of::<Aligned<A, [u8; N]>>(),
        0,
        "byte slice is under-aligned for this sector type"
    );
    // SAFETY: length and alignment were checked above; element layouts are
    // identical per the size assert.
    unsafe { core::slice::from_raw_parts(bytes.as_ptr().cast(), bytes.len() / N) }
}

/// Mutable variant of [`slice_to_sectors`].
///
/// # Panics
///
/// Panics under the same conditions as [`slice_to_sectors`].
pub fn slice_to_sectors_mut<A: aligned::Alignment, const N: usize>(
    bytes: &mut [u8],
) -> &mut [Aligned<A, [u8; N]>] {
    assert_eq!(
        size_of::<Aligned<A, [u8; N]>>(),
        N,
        "sector size must be a multiple of the alignment"
    );
    assert_eq!(bytes.len() % N, 0, "byte slice must cover whole sectors");
    assert_eq!(
        bytes.as_ptr() as usize % align_of::<Aligned<A, [u8; N]>>(),
        0,
        "byte slice is under-aligned for this sector type"
    );
    // SAFETY: as in slice_to_sectors.
    unsafe { core::slice::from_raw_parts_mut(bytes.as_mut_ptr().cast(), bytes.len() / N) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aligned::A4;

    #[test]
    fn sectors_round_trip_through_byte_view() {
        let mut sectors: [Aligned<A4, [u8; 16]>; 2] = [Aligned([0u8; 16]), Aligned([0u8; 16])];

        sectors_to_slice_mut(&mut sectors)[20] = 0xAB;
        assert_eq!(sectors[1][4], 0xAB);

        let bytes = sectors_to_slice(&sectors);
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[20], 0xAB);
    }

    #[test]
    fn byte_slice_reinterprets_as_sectors() {
        let mut backing: Aligned<A4, [u8; 32]> = Aligned([0u8; 32]);
        backing[17] = 0x5A;

        let sectors: &[Aligned<A4, [u8; 16]>] = slice_to_sectors(&backing[..]);
        assert_eq!(sectors.len(), 2);
        assert_eq!(sectors[1][1], 0x5A);
    }

    #[test]
    #[should_panic(expected = "whole sectors")]
    fn partial_sector_slice_is_rejected() {
        let backing: Aligned<A4, [u8; 24]> = Aligned([0u8; 24]);
        let _: &[Aligned<A4, [u8; 16]>] = slice_to_sectors(&backing[..]);
    }
}
