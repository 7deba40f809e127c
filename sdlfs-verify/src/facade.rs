//! Filesystem facade port - the file-handle API the harness drives.

use core::fmt;

use bitflags::bitflags;

/// Error codes surfaced by the filesystem.
///
/// The harness never inspects these beyond recording them in the
/// [`Outcome`](crate::Outcome): any error is fatal to the phase it occurred
/// in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum FsError {
    /// Medium-level input/output error.
    Io,
    /// On-medium state failed an internal consistency check.
    Corrupt,
    /// No entry with the given name exists.
    NotFound,
    /// An entry with the given name already exists.
    Exists,
    /// No free blocks remain.
    NoSpace,
    /// The filesystem ran out of working memory.
    NoMemory,
    /// The call is not valid in the current state.
    Invalid,
}

impl fmt::Display for FsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "input/output error"),
            Self::Corrupt => write!(f, "filesystem corrupt"),
            Self::NotFound => write!(f, "no such entry"),
            Self::Exists => write!(f, "entry already exists"),
            Self::NoSpace => write!(f, "no space left on medium"),
            Self::NoMemory => write!(f, "out of memory"),
            Self::Invalid => write!(f, "invalid operation"),
        }
    }
}

impl core::error::Error for FsError {}

bitflags! {
    /// File open modes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OpenFlags: u32 {
        /// Open for reading.
        const READ = 0x0001;
        /// Open for writing.
        const WRITE = 0x0002;
        /// Open for reading and writing.
        const RDWR = Self::READ.bits() | Self::WRITE.bits();
        /// Create the file if it does not exist.
        const CREATE = 0x0100;
        /// Discard existing content on open.
        const TRUNCATE = 0x0200;
    }
}

/// The embedded filesystem as the harness sees it.
///
/// Session lifecycle (`format`, `mount`, `unmount`) plus file access
/// through opaque handles. Reads and writes move the handle's implicit
/// position forward; the harness only ever appends and reads sequentially,
/// so no seek operation is part of the port.
///
/// Every call returns either the generic success value or an [`FsError`];
/// the harness treats any error as fatal to the current phase.
pub trait FilesystemFacade {
    /// Opaque file handle.
    type File;

    /// Write the on-medium structures of an empty filesystem.
    async fn format(&mut self) -> Result<(), FsError>;

    /// Attach to a formatted medium.
    async fn mount(&mut self) -> Result<(), FsError>;

    /// Detach, flushing anything pending.
    async fn unmount(&mut self) -> Result<(), FsError>;

    /// Open `path` with the given flags.
    async fn open(&mut self, path: &str, flags: OpenFlags) -> Result<Self::File, FsError>;

    /// Write `buf` at the file's current position; returns the byte count
    /// actually written.
    async fn write(&mut self, file: &mut Self::File, buf: &[u8]) -> Result<usize, FsError>;

    /// Read into `buf` from the file's current position; returns the byte
    /// count actually read (zero at end of file).
    async fn read(&mut self, file: &mut Self::File, buf: &mut [u8]) -> Result<usize, FsError>;

    /// Close a handle, flushing pending file state.
    async fn close(&mut self, file: Self::File) -> Result<(), FsError>;
}
