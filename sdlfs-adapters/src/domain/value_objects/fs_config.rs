//! Filesystem configuration contract.

use super::block_geometry::BlockGeometry;

/// The complete configuration handed to the filesystem at session start.
///
/// This is the whole wire contract between adapter and filesystem besides
/// the operations themselves: the probed [`BlockGeometry`] plus tuning
/// knobs. Every limit is `None`, meaning the filesystem applies its own
/// default; in particular `block_cycles: None` leaves wear-leveling to the
/// medium and `compact_thresh: None` leaves metadata compaction unbounded.
///
/// The value is `Copy`, built once per session and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FsConfig {
    geometry: BlockGeometry,
    block_cycles: Option<u32>,
    compact_thresh: Option<u32>,
    name_max: Option<u32>,
    file_max: Option<u32>,
    attr_max: Option<u32>,
    metadata_max: Option<u32>,
    inline_max: Option<u32>,
}

impl FsConfig {
    /// Build the contract for the given geometry with all limits unset.
    pub const fn new(geometry: BlockGeometry) -> Self {
        Self {
            geometry,
            block_cycles: None,
            compact_thresh: None,
            name_max: None,
            file_max: None,
            attr_max: None,
            metadata_max: None,
            inline_max: None,
        }
    }

    /// The probed block geometry.
    #[inline]
    pub const fn geometry(&self) -> BlockGeometry {
        self.geometry
    }

    /// Program/erase cycles before the filesystem relocates a block;
    /// `None` disables filesystem-side wear-leveling.
    #[inline]
    pub const fn block_cycles(&self) -> Option<u32> {
        self.block_cycles
    }

    /// Metadata compaction threshold in bytes; `None` is unbounded.
    #[inline]
    pub const fn compact_thresh(&self) -> Option<u32> {
        self.compact_thresh
    }

    /// Maximum file name length; `None` is the filesystem default.
    #[inline]
    pub const fn name_max(&self) -> Option<u32> {
        self.name_max
    }

    /// Maximum file size; `None` is the filesystem default.
    #[inline]
    pub const fn file_max(&self) -> Option<u32> {
        self.file_max
    }

    /// Maximum custom-attribute size; `None` is the filesystem default.
    #[inline]
    pub const fn attr_max(&self) -> Option<u32> {
        self.attr_max
    }

    /// Maximum metadata-pair size; `None` is the filesystem default.
    #[inline]
    pub const fn metadata_max(&self) -> Option<u32> {
        self.metadata_max
    }

    /// Maximum inlined-file size; `None` is the filesystem default.
    #[inline]
    pub const fn inline_max(&self) -> Option<u32> {
        self.inline_max
    }
}
