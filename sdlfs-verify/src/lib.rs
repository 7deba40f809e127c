//! Integrity verification for embedded filesystems.
//!
//! The crate drives a filesystem, consumed through the [`FilesystemFacade`]
//! port, through an escalating sequence of write/read-back cycles: for a
//! growing repeat count `i`, a file named after `i` is filled with `i`
//! copies of a canonical 512-byte record, closed, reopened and compared
//! byte-for-byte against the record. Growing files walk the filesystem
//! through its indirection and metadata-growth paths, so the first failing
//! iteration pinpoints the smallest workload that reproduces a regression
//! without a separate bisection step.
//!
//! The run result is a tagged [`Outcome`]; [`Outcome::code`] folds it into
//! the single signed integer consumed by process-level callers.
//!
//! Enable either the `log` (default) or the `defmt` feature for phase and
//! deviation logging.
//!
//! # Quick start
//!
//! ```ignore
//! use sdlfs_verify::VerificationHarness;
//!
//! let fs = MyFilesystem::new(adapter, config);
//! let mut harness = VerificationHarness::new(fs);
//! let outcome = harness.run().await;
//! assert!(outcome.is_pass(), "verification failed: {}", outcome);
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![allow(async_fn_in_trait)]

extern crate alloc;

// Logging shims for builds with neither `log` nor `defmt` enabled.
#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(any(feature = "log", feature = "defmt")))]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

mod facade;
mod harness;
mod outcome;
mod record;

pub use facade::{FilesystemFacade, FsError, OpenFlags};
pub use harness::{TestFile, VerificationHarness, Workload};
pub use outcome::{CycleFault, Outcome};
pub use record::TestRecord;
