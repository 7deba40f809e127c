//! The verification harness: escalating write/read-back workloads.

use alloc::{format, string::String};

#[cfg(feature = "defmt")]
use defmt::{debug, warn};
#[cfg(feature = "log")]
use log::{debug, warn};

use crate::{
    facade::{FilesystemFacade, OpenFlags},
    outcome::{CycleFault, Outcome},
    record::TestRecord,
};

/// Bounds of the escalating workload.
///
/// The harness runs one cycle per iteration `i`, starting at
/// [`first`](Workload::first) and continuing while `i` records still fit
/// the byte [`budget`](Workload::budget). The default covers repeat counts
/// 32 through 64: a budget of twice the starting file size, so every run
/// crosses the point where files outgrow a single metadata pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Workload {
    first: u32,
    budget: usize,
}

impl Workload {
    /// A workload starting at iteration `first` with a total per-file byte
    /// budget of `budget`.
    ///
    /// # Panics
    ///
    /// Panics if `first` is zero; an empty file verifies nothing.
    pub fn new(first: u32, budget: usize) -> Self {
        assert!(first >= 1, "workload must start at iteration 1 or later");
        Self { first, budget }
    }

    /// First iteration of the run.
    #[inline]
    pub const fn first(&self) -> u32 {
        self.first
    }

    /// Per-file byte budget bounding the run.
    #[inline]
    pub const fn budget(&self) -> usize {
        self.budget
    }

    /// Last iteration of the run: the largest `i` with
    /// `i * record len <= budget`.
    #[inline]
    pub const fn last(&self) -> u32 {
        (self.budget / TestRecord::LEN) as u32
    }

    /// The iterations the run will attempt, in order.
    pub fn iterations(&self) -> core::ops::RangeInclusive<u32> {
        self.first..=self.last()
    }
}

impl Default for Workload {
    fn default() -> Self {
        Self::new(32, 32 * 2 * TestRecord::LEN)
    }
}

/// Named target of one verification cycle.
///
/// Its identity is its name, derived from the iteration index. Files are
/// never deleted; each iteration's file simply supersedes the previous
/// one's in interest and the set accumulates until the run ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestFile {
    name: String,
    repeats: u32,
}

impl TestFile {
    /// The file for escalation iteration `i`: `test{i}`, holding `i`
    /// records.
    pub fn for_iteration(i: u32) -> Self {
        Self { name: format!("test{}", i), repeats: i }
    }

    /// The file for flat-sweep slot `i`: `test{i}`, holding one record.
    pub fn single(i: u32) -> Self {
        Self { name: format!("test{}", i), repeats: 1 }
    }

    /// The file's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How many records the file holds when fully written.
    pub const fn repeats(&self) -> u32 {
        self.repeats
    }
}

/// Drives a filesystem through format, mount, an escalating series of
/// write/read-back cycles and unmount, returning the first deviation as a
/// tagged [`Outcome`].
///
/// The harness owns the canonical record and a single record-sized
/// read-back buffer; both live for the whole run. Like the adapter below
/// it, the harness is strictly sequential - it is not reentrant and must
/// not be shared between threads.
pub struct VerificationHarness<F: FilesystemFacade> {
    fs: F,
    workload: Workload,
    record: TestRecord,
    read_back: [u8; TestRecord::LEN],
}

impl<F: FilesystemFacade> VerificationHarness<F> {
    /// Harness over `fs` with the default workload.
    ///
    /// The filesystem handle is constructed by the caller and moved in
    /// here, mirroring the adapter's explicit-ownership construction.
    pub fn new(fs: F) -> Self {
        Self::with_workload(fs, Workload::default())
    }

    /// Harness over `fs` with a caller-chosen workload.
    pub fn with_workload(fs: F, workload: Workload) -> Self {
        Self {
            fs,
            workload,
            record: TestRecord::canonical(),
            read_back: [0; TestRecord::LEN],
        }
    }

    /// The workload this harness will run.
    pub fn workload(&self) -> Workload {
        self.workload
    }

    /// Consume the harness and return the filesystem.
    pub fn into_inner(self) -> F {
        self.fs
    }

    /// Run the escalating verification: format, mount, one
    /// write-then-verify cycle per iteration, unmount.
    ///
    /// The run stops at the first deviation: a failing cycle returns
    /// immediately without unmounting, so the medium still holds the state
    /// that produced the failure.
    pub async fn run(&mut self) -> Outcome {
        if let Err(e) = self.fs.format().await {
            warn!("format failed: {}", e);
            return Outcome::FormatFailed(e);
        }
        if let Err(e) = self.fs.mount().await {
            warn!("mount failed: {}", e);
            return Outcome::MountFailed(e);
        }
        debug!(
            "mounted; escalating from {} to {} records per file",
            self.workload.first(),
            self.workload.last()
        );

        for i in self.workload.iterations() {
            let file = TestFile::for_iteration(i);
            if let Err(fault) = self.write_then_verify(&file).await {
                warn!("cycle {} failed: {}", i, fault);
                return Outcome::CycleFailed { iteration: i, fault };
            }
        }

        if let Err(e) = self.fs.unmount().await {
            warn!("unmount failed: {}", e);
            return Outcome::UnmountFailed(e);
        }
        debug!("verification passed");
        Outcome::Passed
    }

    /// Run the flat sweep: `files` single-record files, one
    /// write-then-verify cycle each.
    ///
    /// An alternate workload that grows the directory instead of the
    /// files, for exercising name-lookup and metadata paths under many
    /// small entries. Same phases and outcome mapping as [`run`], with the
    /// slot index standing in for the iteration.
    pub async fn sweep(&mut self, files: u32) -> Outcome {
        if let Err(e) = self.fs.format().await {
            warn!("format failed: {}", e);
            return Outcome::FormatFailed(e);
        }
        if let Err(e) = self.fs.mount().await {
            warn!("mount failed: {}", e);
            return Outcome::MountFailed(e);
        }
        debug!("mounted; sweeping {} single-record files", files);

        for i in 0..files {
            let file = TestFile::single(i);
            if let Err(fault) = self.write_then_verify(&file).await {
                warn!("sweep slot {} failed: {}", i, fault);
                return Outcome::CycleFailed { iteration: i, fault };
            }
        }

        if let Err(e) = self.fs.unmount().await {
            warn!("unmount failed: {}", e);
            return Outcome::UnmountFailed(e);
        }
        debug!("sweep passed");
        Outcome::Passed
    }

    /// One cycle: create the file, write its records, close, reopen
    /// read-only, read every record back and compare, close.
    async fn write_then_verify(&mut self, file: &TestFile) -> Result<(), CycleFault> {
        debug!("writing {}: {} records", file.name(), file.repeats());
        let mut handle = self
            .fs
            .open(file.name(), OpenFlags::RDWR | OpenFlags::CREATE)
            .await
            .map_err(CycleFault::Fs)?;
        for _ in 0..file.repeats() {
            let written = self
                .fs
                .write(&mut handle, self.record.as_bytes())
                .await
                .map_err(CycleFault::Fs)?;
            if written != TestRecord::LEN {
                return Err(CycleFault::ShortWrite { written });
            }
        }
        self.fs.close(handle).await.map_err(CycleFault::Fs)?;

        debug!("verifying {}", file.name());
        let mut handle = self
            .fs
            .open(file.name(), OpenFlags::READ)
            .await
            .map_err(CycleFault::Fs)?;
        for record in 0..file.repeats() {
            // a short or failed read leaves zeroes behind, which the
            // comparison below catches
            self.read_back.fill(0);
            self.fs
                .read(&mut handle, &mut self.read_back)
                .await
                .map_err(CycleFault::Fs)?;
            if !self.record.matches(&self.read_back) {
                return Err(CycleFault::Mismatch { record });
            }
        }
        self.fs.close(handle).await.map_err(CycleFault::Fs)?;
        Ok(())
    }
}
