//! BlockOps port - the block contract a log-structured filesystem consumes.

use crate::domain::value_objects::FsConfig;
use core::error::Error;

/// The four-operation block contract plus the session configuration.
///
/// This is the entire surface the filesystem sees of its storage: the
/// geometry and tuning in [`config`](BlockOps::config), scratch memory in
/// [`lookahead_buffer`](BlockOps::lookahead_buffer), and the four
/// operations. All of it is fixed when the implementor is constructed and
/// never changes afterwards.
///
/// # Calling contract
///
/// The filesystem must only issue requests that match the configured
/// geometry: whole blocks at offset zero for `read`/`program`, block
/// indices below the block count for every addressed operation. Whether a
/// violation is reported or fatal is up to the implementor;
/// [`BlockDeviceAdapter`](crate::adapters::BlockDeviceAdapter) treats it as
/// fatal.
///
/// Implementors are not reentrant and not safe for concurrent use; callers
/// uphold single-threaded, one-call-at-a-time access.
pub trait BlockOps {
    /// Error surfaced to the filesystem by an operation.
    ///
    /// `Ok(())` is the filesystem's generic success code.
    type Error: Error;

    /// The configuration contract fixed at session start.
    fn config(&self) -> &FsConfig;

    /// Scratch memory for the filesystem's free-block bookkeeping.
    ///
    /// The memory is owned by the implementor; its size is
    /// [`lookahead_size`](crate::BlockGeometry::lookahead_size). The
    /// implementor never interprets its content.
    fn lookahead_buffer(&mut self) -> &mut [u8];

    /// Read one whole block into `buf`.
    async fn read(&mut self, block: u32, offset: u32, buf: &mut [u8])
        -> Result<(), Self::Error>;

    /// Program (write) one whole block from `buf`.
    async fn program(&mut self, block: u32, offset: u32, buf: &[u8])
        -> Result<(), Self::Error>;

    /// Reset one block to the medium's erased state.
    async fn erase(&mut self, block: u32) -> Result<(), Self::Error>;

    /// Make all completed programs durable.
    async fn sync(&mut self) -> Result<(), Self::Error>;
}
