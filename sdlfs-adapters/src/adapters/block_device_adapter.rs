//! Adapter translating the filesystem's block contract into single-sector
//! medium transactions.

use core::convert::Infallible;

use aligned::Aligned;
use sdlfs_sector_device::SectorDevice;

use crate::{
    adapters::error::AdapterInitError,
    domain::{
        ports::BlockOps,
        value_objects::{BlockGeometry, BlockRequest, FsConfig, BLOCK_SIZE},
    },
};

/// Presents a [`SectorDevice`] to a log-structured filesystem as a block
/// device with one block per sector.
///
/// The adapter owns three block-sized buffers: aligned staging for reads
/// and programs (the filesystem hands out plain byte slices, the medium
/// wants aligned sectors) and the lookahead scratch lent to the filesystem
/// through the [`BlockOps`] port. They are initialized once at construction
/// and reused for every call, which is why the adapter is neither
/// reentrant nor safe to share between threads.
///
/// Every operation either returns `Ok` or panics: a request that violates
/// the probed geometry, or a medium-level transaction failure, is a fatal
/// contract violation (see the [crate docs](crate)). Accordingly the
/// [`BlockOps`] error type is [`Infallible`].
pub struct BlockDeviceAdapter<D: SectorDevice<BLOCK_SIZE>> {
    device: D,
    geometry: BlockGeometry,
    config: FsConfig,
    read_buf: Aligned<D::Align, [u8; BLOCK_SIZE]>,
    prog_buf: Aligned<D::Align, [u8; BLOCK_SIZE]>,
    lookahead_buf: Aligned<D::Align, [u8; BLOCK_SIZE]>,
}

impl<D: SectorDevice<BLOCK_SIZE>> core::fmt::Debug for BlockDeviceAdapter<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BlockDeviceAdapter")
            .field("geometry", &self.geometry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<D: SectorDevice<BLOCK_SIZE>> BlockDeviceAdapter<D> {
    /// Probe the medium's capacity and build an adapter around it.
    ///
    /// The device handle is constructed by the caller (once, at process
    /// start) and moved in here; there is no global lookup.
    pub async fn new(mut device: D) -> Result<Self, AdapterInitError<D::Error>> {
        let sectors = device.sector_count().await.map_err(AdapterInitError::Device)?;
        let geometry = BlockGeometry::from_capacity(sectors).map_err(AdapterInitError::Geometry)?;
        Ok(Self {
            device,
            geometry,
            config: FsConfig::new(geometry),
            read_buf: Aligned([0; BLOCK_SIZE]),
            prog_buf: Aligned([0; BLOCK_SIZE]),
            lookahead_buf: Aligned([0; BLOCK_SIZE]),
        })
    }

    /// The geometry probed at construction.
    pub fn geometry(&self) -> BlockGeometry {
        self.geometry
    }

    /// Get a reference to the underlying device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Get a mutable reference to the underlying device.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Consume the adapter and return the underlying device.
    pub fn into_inner(self) -> D {
        self.device
    }
}

impl<D: SectorDevice<BLOCK_SIZE>> BlockOps for BlockDeviceAdapter<D> {
    type Error = Infallible;

    fn config(&self) -> &FsConfig {
        &self.config
    }

    fn lookahead_buffer(&mut self) -> &mut [u8] {
        &mut self.lookahead_buf[..]
    }

    async fn read(&mut self, block: u32, offset: u32, buf: &mut [u8]) -> Result<(), Infallible> {
        let req = BlockRequest::read(block, offset, buf.len());
        self.geometry.check(&req);
        if let Err(e) = self
            .device
            .read_sectors(block, core::slice::from_mut(&mut self.read_buf))
            .await
        {
            panic!("{}: sector read failed: {}", req, e);
        }
        buf.copy_from_slice(&self.read_buf[..]);
        Ok(())
    }

    async fn program(&mut self, block: u32, offset: u32, buf: &[u8]) -> Result<(), Infallible> {
        let req = BlockRequest::program(block, offset, buf.len());
        self.geometry.check(&req);
        self.prog_buf.copy_from_slice(buf);
        if let Err(e) = self
            .device
            .write_sectors(block, core::slice::from_ref(&self.prog_buf))
            .await
        {
            panic!("{}: sector write failed: {}", req, e);
        }
        Ok(())
    }

    async fn erase(&mut self, block: u32) -> Result<(), Infallible> {
        let req = BlockRequest::erase(block);
        self.geometry.check(&req);
        if let Err(e) = self.device.erase_sectors(block, 1).await {
            panic!("{}: sector erase failed: {}", req, e);
        }
        Ok(())
    }

    async fn sync(&mut self) -> Result<(), Infallible> {
        // Each sector transaction is durable before the medium returns, so
        // there is nothing buffered to flush.
        self.geometry.check(&BlockRequest::sync());
        Ok(())
    }
}
