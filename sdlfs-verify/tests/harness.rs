//! End-to-end verification scenarios.
//!
//! Wires the real stack together: a RAM sector medium under the block
//! device adapter, a minimal block-granular file store driven through the
//! `BlockOps` contract, and the harness on top. Fault-injecting wrappers
//! script the failure scenarios.

use std::collections::HashMap;

use sdlfs_adapters::{BlockDeviceAdapter, BlockOps, BLOCK_SIZE};
use sdlfs_sector_device::RamSectorDevice;
use sdlfs_verify::{
    CycleFault, FilesystemFacade, FsError, OpenFlags, Outcome, TestRecord, VerificationHarness,
    Workload,
};

fn init_logs() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Minimal block-granular file store on top of the `BlockOps` contract.
///
/// Not a filesystem: the directory lives in host memory and only file
/// payload moves through the block contract. It keeps just enough
/// structure to exercise the adapter the way a real filesystem would -
/// every record becomes an erase + program of a freshly allocated block,
/// allocation bookkeeping lives in the adapter's lookahead buffer, and
/// reads pull whole blocks back. Records are block-sized by construction,
/// so the store only accepts whole-block transfers.
struct BlockFs<B: BlockOps> {
    ops: B,
    dir: HashMap<String, Vec<u32>>,
    formatted: bool,
    mounted: bool,
}

#[derive(Debug)]
struct BlockFile {
    name: String,
    blocks: Vec<u32>,
    cursor: usize,
    writable: bool,
}

impl<B: BlockOps> BlockFs<B> {
    fn new(ops: B) -> Self {
        Self {
            ops,
            dir: HashMap::new(),
            formatted: false,
            mounted: false,
        }
    }

    /// Claim the lowest free block in the lookahead bitmap.
    ///
    /// Blocks of superseded files are never reclaimed; the test media are
    /// sized so the runs fit regardless.
    fn alloc_block(&mut self) -> Result<u32, FsError> {
        let block_count = self.ops.config().geometry().block_count();
        let map = self.ops.lookahead_buffer();
        for (i, byte) in map.iter_mut().enumerate() {
            if *byte == 0xFF {
                continue;
            }
            let bit = (0..8).find(|b| *byte & (1u8 << b) == 0).unwrap();
            let block = (i * 8 + bit as usize) as u32;
            if block >= block_count {
                return Err(FsError::NoSpace);
            }
            *byte |= 1 << bit;
            return Ok(block);
        }
        Err(FsError::NoSpace)
    }
}

impl<B: BlockOps> FilesystemFacade for BlockFs<B> {
    type File = BlockFile;

    async fn format(&mut self) -> Result<(), FsError> {
        self.ops.erase(0).await.map_err(|_| FsError::Io)?;
        self.ops.sync().await.map_err(|_| FsError::Io)?;
        self.dir.clear();
        self.formatted = true;
        self.mounted = false;
        Ok(())
    }

    async fn mount(&mut self) -> Result<(), FsError> {
        if !self.formatted {
            return Err(FsError::Corrupt);
        }
        let map = self.ops.lookahead_buffer();
        map.fill(0);
        map[0] = 0x01; // block 0 stays reserved
        self.mounted = true;
        Ok(())
    }

    async fn unmount(&mut self) -> Result<(), FsError> {
        if !self.mounted {
            return Err(FsError::Invalid);
        }
        self.ops.sync().await.map_err(|_| FsError::Io)?;
        self.mounted = false;
        Ok(())
    }

    async fn open(&mut self, path: &str, flags: OpenFlags) -> Result<Self::File, FsError> {
        if !self.mounted {
            return Err(FsError::Invalid);
        }
        if flags.contains(OpenFlags::CREATE) {
            Ok(BlockFile {
                name: path.to_string(),
                blocks: Vec::new(),
                cursor: 0,
                writable: true,
            })
        } else {
            let blocks = self.dir.get(path).ok_or(FsError::NotFound)?.clone();
            Ok(BlockFile {
                name: path.to_string(),
                blocks,
                cursor: 0,
                writable: false,
            })
        }
    }

    async fn write(&mut self, file: &mut Self::File, buf: &[u8]) -> Result<usize, FsError> {
        if !file.writable || buf.len() != BLOCK_SIZE {
            return Err(FsError::Invalid);
        }
        let block = self.alloc_block()?;
        self.ops.erase(block).await.map_err(|_| FsError::Io)?;
        self.ops.program(block, 0, buf).await.map_err(|_| FsError::Io)?;
        file.blocks.push(block);
        Ok(buf.len())
    }

    async fn read(&mut self, file: &mut Self::File, buf: &mut [u8]) -> Result<usize, FsError> {
        if file.writable || buf.len() != BLOCK_SIZE {
            return Err(FsError::Invalid);
        }
        if file.cursor >= file.blocks.len() {
            return Ok(0);
        }
        self.ops
            .read(file.blocks[file.cursor], 0, buf)
            .await
            .map_err(|_| FsError::Io)?;
        file.cursor += 1;
        Ok(buf.len())
    }

    async fn close(&mut self, file: Self::File) -> Result<(), FsError> {
        if file.writable {
            self.dir.insert(file.name, file.blocks);
        }
        Ok(())
    }
}

/// How a scripted write should fail.
enum WriteFault {
    Error(FsError),
    Short(usize),
}

/// Scripted failures for one run.
#[derive(Default)]
struct FaultPlan {
    fail_format: Option<FsError>,
    fail_mount: Option<FsError>,
    fail_unmount: Option<FsError>,
    /// Fail the nth (1-based) write to the named file.
    fail_write: Option<(&'static str, u32, WriteFault)>,
    /// Corrupt the nth (1-based) read from the named file.
    corrupt_read: Option<(&'static str, u32)>,
}

/// Facade wrapper injecting scripted failures and recording call history.
struct FaultFs<F: FilesystemFacade> {
    inner: F,
    plan: FaultPlan,
    opened: Vec<String>,
    writes: HashMap<String, u32>,
    reads: HashMap<String, u32>,
    mount_calls: u32,
}

struct FaultHandle<H> {
    inner: H,
    name: String,
}

impl<F: FilesystemFacade> FaultFs<F> {
    fn new(inner: F, plan: FaultPlan) -> Self {
        Self {
            inner,
            plan,
            opened: Vec::new(),
            writes: HashMap::new(),
            reads: HashMap::new(),
            mount_calls: 0,
        }
    }

    fn opened_names(&self) -> &[String] {
        &self.opened
    }
}

impl<F: FilesystemFacade> FilesystemFacade for FaultFs<F> {
    type File = FaultHandle<F::File>;

    async fn format(&mut self) -> Result<(), FsError> {
        if let Some(e) = self.plan.fail_format {
            return Err(e);
        }
        self.inner.format().await
    }

    async fn mount(&mut self) -> Result<(), FsError> {
        self.mount_calls += 1;
        if let Some(e) = self.plan.fail_mount {
            return Err(e);
        }
        self.inner.mount().await
    }

    async fn unmount(&mut self) -> Result<(), FsError> {
        if let Some(e) = self.plan.fail_unmount {
            return Err(e);
        }
        self.inner.unmount().await
    }

    async fn open(&mut self, path: &str, flags: OpenFlags) -> Result<Self::File, FsError> {
        self.opened.push(path.to_string());
        let inner = self.inner.open(path, flags).await?;
        Ok(FaultHandle { inner, name: path.to_string() })
    }

    async fn write(&mut self, file: &mut Self::File, buf: &[u8]) -> Result<usize, FsError> {
        let seen = self.writes.entry(file.name.clone()).or_insert(0);
        *seen += 1;
        let nth = *seen;
        if let Some((name, at, fault)) = &self.plan.fail_write {
            if *name == file.name && nth == *at {
                return match fault {
                    WriteFault::Error(e) => Err(*e),
                    WriteFault::Short(len) => Ok(*len),
                };
            }
        }
        self.inner.write(&mut file.inner, buf).await
    }

    async fn read(&mut self, file: &mut Self::File, buf: &mut [u8]) -> Result<usize, FsError> {
        let seen = self.reads.entry(file.name.clone()).or_insert(0);
        *seen += 1;
        let nth = *seen;
        let n = self.inner.read(&mut file.inner, buf).await?;
        if let Some((name, at)) = &self.plan.corrupt_read {
            if *name == file.name && nth == *at {
                buf[0] ^= 0xFF;
            }
        }
        Ok(n)
    }

    async fn close(&mut self, file: Self::File) -> Result<(), FsError> {
        self.inner.close(file.inner).await
    }
}

/// Fresh stack: RAM medium of `sectors` sectors, adapter, block store.
async fn block_fs(sectors: u32) -> BlockFs<BlockDeviceAdapter<RamSectorDevice<BLOCK_SIZE>>> {
    let adapter = BlockDeviceAdapter::new(RamSectorDevice::new(sectors))
        .await
        .expect("adapter construction");
    BlockFs::new(adapter)
}

#[tokio::test]
async fn default_escalation_passes() {
    init_logs();
    let mut harness = VerificationHarness::new(block_fs(4096).await);
    assert_eq!(harness.workload().first(), 32);
    assert_eq!(harness.workload().last(), 64);

    let outcome = harness.run().await;
    assert!(outcome.is_pass(), "unexpected outcome: {outcome}");
    assert_eq!(outcome.code(), 0);

    // every iteration left its file behind, test32 and test64 included
    let fs = harness.into_inner();
    assert_eq!(fs.dir.len(), 33);
    assert_eq!(fs.dir["test32"].len(), 32);
    assert_eq!(fs.dir["test64"].len(), 64);
}

#[tokio::test]
async fn escalation_covers_single_and_multi_block_files() {
    let fs = block_fs(64).await;
    let mut harness = VerificationHarness::with_workload(fs, Workload::new(1, 8 * TestRecord::LEN));

    let outcome = harness.run().await;
    assert!(outcome.is_pass(), "unexpected outcome: {outcome}");

    let fs = harness.into_inner();
    assert_eq!(fs.dir["test1"].len(), 1); // single block
    assert_eq!(fs.dir["test8"].len(), 8); // spans multiple blocks
}

#[tokio::test]
async fn injected_write_failure_stops_the_run() {
    init_logs();
    let plan = FaultPlan {
        fail_write: Some(("test10", 5, WriteFault::Error(FsError::Io))),
        ..FaultPlan::default()
    };
    let fs = FaultFs::new(block_fs(256).await, plan);
    let mut harness =
        VerificationHarness::with_workload(fs, Workload::new(8, 16 * TestRecord::LEN));

    let outcome = harness.run().await;
    assert_eq!(
        outcome,
        Outcome::CycleFailed { iteration: 10, fault: CycleFault::Fs(FsError::Io) }
    );
    assert_eq!(outcome.code(), -10);

    // the failing file was never read and no later iteration was attempted
    let fs = harness.into_inner();
    assert_eq!(fs.reads.get("test10"), None);
    assert!(!fs.opened_names().iter().any(|n| n == "test11"));
    assert_eq!(fs.opened_names().iter().filter(|n| *n == "test10").count(), 1);
}

#[tokio::test]
async fn short_write_is_reported_as_such() {
    let plan = FaultPlan {
        fail_write: Some(("test2", 2, WriteFault::Short(100))),
        ..FaultPlan::default()
    };
    let fs = FaultFs::new(block_fs(64).await, plan);
    let mut harness =
        VerificationHarness::with_workload(fs, Workload::new(1, 4 * TestRecord::LEN));

    let outcome = harness.run().await;
    assert_eq!(
        outcome,
        Outcome::CycleFailed { iteration: 2, fault: CycleFault::ShortWrite { written: 100 } }
    );
    assert_eq!(outcome.code(), -2);
}

#[tokio::test]
async fn corrupted_read_back_is_a_mismatch() {
    let plan = FaultPlan {
        corrupt_read: Some(("test3", 2)),
        ..FaultPlan::default()
    };
    let fs = FaultFs::new(block_fs(64).await, plan);
    let mut harness =
        VerificationHarness::with_workload(fs, Workload::new(1, 4 * TestRecord::LEN));

    let outcome = harness.run().await;
    assert_eq!(
        outcome,
        Outcome::CycleFailed { iteration: 3, fault: CycleFault::Mismatch { record: 1 } }
    );
    assert_eq!(outcome.code(), -3);
}

#[tokio::test]
async fn format_failure_aborts_before_mount() {
    let plan = FaultPlan {
        fail_format: Some(FsError::Io),
        ..FaultPlan::default()
    };
    let fs = FaultFs::new(block_fs(64).await, plan);
    let mut harness = VerificationHarness::new(fs);

    let outcome = harness.run().await;
    assert_eq!(outcome, Outcome::FormatFailed(FsError::Io));
    assert_eq!(outcome.code(), 1);

    let fs = harness.into_inner();
    assert_eq!(fs.mount_calls, 0);
    assert!(fs.opened_names().is_empty());
}

#[tokio::test]
async fn mount_failure_aborts_the_run() {
    let plan = FaultPlan {
        fail_mount: Some(FsError::Corrupt),
        ..FaultPlan::default()
    };
    let fs = FaultFs::new(block_fs(64).await, plan);
    let mut harness = VerificationHarness::new(fs);

    let outcome = harness.run().await;
    assert_eq!(outcome, Outcome::MountFailed(FsError::Corrupt));
    assert_eq!(outcome.code(), 2);
    assert!(harness.into_inner().opened_names().is_empty());
}

#[tokio::test]
async fn unmount_failure_is_reported_after_clean_cycles() {
    let plan = FaultPlan {
        fail_unmount: Some(FsError::Io),
        ..FaultPlan::default()
    };
    let fs = FaultFs::new(block_fs(64).await, plan);
    let mut harness =
        VerificationHarness::with_workload(fs, Workload::new(1, 4 * TestRecord::LEN));

    let outcome = harness.run().await;
    assert_eq!(outcome, Outcome::UnmountFailed(FsError::Io));
    assert_eq!(outcome.code(), 3);

    // every cycle had verified before the unmount failed
    let fs = harness.into_inner();
    assert_eq!(fs.inner.dir.len(), 4);
}

#[tokio::test]
async fn flat_sweep_populates_one_record_per_file() {
    let mut harness = VerificationHarness::new(block_fs(64).await);

    let outcome = harness.sweep(16).await;
    assert!(outcome.is_pass(), "unexpected outcome: {outcome}");

    let fs = harness.into_inner();
    assert_eq!(fs.dir.len(), 16);
    assert!(fs.dir.values().all(|blocks| blocks.len() == 1));
}

#[tokio::test]
async fn close_and_reopen_preserve_content() {
    let mut fs = block_fs(64).await;
    fs.format().await.unwrap();
    fs.mount().await.unwrap();

    let record = TestRecord::canonical();
    let mut file = fs.open("alpha", OpenFlags::RDWR | OpenFlags::CREATE).await.unwrap();
    for _ in 0..3 {
        assert_eq!(fs.write(&mut file, record.as_bytes()).await.unwrap(), TestRecord::LEN);
    }
    fs.close(file).await.unwrap();

    // two read-only sessions in a row observe identical content
    for _ in 0..2 {
        let mut file = fs.open("alpha", OpenFlags::READ).await.unwrap();
        let mut buf = [0u8; TestRecord::LEN];
        for _ in 0..3 {
            assert_eq!(fs.read(&mut file, &mut buf).await.unwrap(), TestRecord::LEN);
            assert!(record.matches(&buf));
        }
        assert_eq!(fs.read(&mut file, &mut buf).await.unwrap(), 0);
        fs.close(file).await.unwrap();
    }

    fs.unmount().await.unwrap();
}

#[tokio::test]
async fn open_requires_a_mounted_filesystem() {
    let mut fs = block_fs(16).await;
    assert_eq!(
        fs.open("early", OpenFlags::RDWR | OpenFlags::CREATE).await.unwrap_err(),
        FsError::Invalid
    );
}
