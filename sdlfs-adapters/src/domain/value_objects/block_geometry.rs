//! Block geometry value object.

use super::block_request::{BlockOp, BlockRequest};
use crate::domain::error::GeometryError;

/// Bytes per logical block; equals the medium's native sector size, so one
/// block is always exactly one sector and no transfer is ever partial or
/// multi-sector.
pub const BLOCK_SIZE: usize = 512;

/// Immutable geometry of one adapter session.
///
/// Derived once from the attached medium's reported capacity and never
/// mutated afterwards. All buffer sizes equal the block size: the adapter
/// is single-buffered and does no multi-block caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlockGeometry {
    block_size: u32,
    block_count: u32,
    read_size: u32,
    prog_size: u32,
    cache_size: u32,
    lookahead_size: u32,
}

impl BlockGeometry {
    /// Derive the geometry from the medium's capacity in sectors.
    pub fn from_capacity(sector_count: u32) -> Result<Self, GeometryError> {
        if sector_count == 0 {
            return Err(GeometryError::ZeroCapacity);
        }
        let block_size = BLOCK_SIZE as u32;
        Ok(Self {
            block_size,
            block_count: sector_count,
            read_size: block_size,
            prog_size: block_size,
            cache_size: block_size,
            lookahead_size: block_size,
        })
    }

    /// Bytes per logical block.
    #[inline]
    pub const fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Number of addressable blocks.
    #[inline]
    pub const fn block_count(&self) -> u32 {
        self.block_count
    }

    /// Minimum read unit in bytes.
    #[inline]
    pub const fn read_size(&self) -> u32 {
        self.read_size
    }

    /// Minimum program unit in bytes.
    #[inline]
    pub const fn prog_size(&self) -> u32 {
        self.prog_size
    }

    /// Size of the filesystem's block cache in bytes.
    #[inline]
    pub const fn cache_size(&self) -> u32 {
        self.cache_size
    }

    /// Size of the free-block lookahead buffer in bytes.
    #[inline]
    pub const fn lookahead_size(&self) -> u32 {
        self.lookahead_size
    }

    /// Total medium capacity in bytes.
    #[inline]
    pub const fn total_bytes(&self) -> u64 {
        self.block_count as u64 * self.block_size as u64
    }

    /// Whether `block` addresses a block on the medium.
    #[inline]
    pub const fn contains(&self, block: u32) -> bool {
        block < self.block_count
    }

    /// Check a request against this geometry.
    ///
    /// # Panics
    ///
    /// Panics with a diagnostic naming the request if the request does not
    /// match the geometry: non-zero offset or non-block-size length on
    /// read/program, or an out-of-range block index on any addressed
    /// operation. A violation means the filesystem was configured with a
    /// different geometry than the adapter and the session cannot continue.
    pub fn check(&self, req: &BlockRequest) {
        match req.op() {
            BlockOp::Read | BlockOp::Program => {
                assert!(req.offset() == 0, "{}: sub-block offset is not supported", req);
                assert!(
                    req.len() == self.block_size as usize,
                    "{}: transfer length must equal the {}-byte block size",
                    req,
                    self.block_size
                );
                assert!(
                    self.contains(req.block()),
                    "{}: block index exceeds medium capacity of {} blocks",
                    req,
                    self.block_count
                );
            }
            BlockOp::Erase => {
                assert!(
                    self.contains(req.block()),
                    "{}: block index exceeds medium capacity of {} blocks",
                    req,
                    self.block_count
                );
            }
            BlockOp::Sync => {}
        }
    }
}
