//! Verification outcomes.

use core::fmt;

use crate::facade::FsError;

/// What went wrong inside one write-then-verify cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CycleFault {
    /// A write returned fewer bytes than one record.
    ShortWrite {
        /// Byte count the filesystem reported as written.
        written: usize,
    },
    /// A read-back record differed from the canonical pattern.
    Mismatch {
        /// Zero-based index of the mismatching record within the file.
        record: u32,
    },
    /// The filesystem rejected a call mid-cycle.
    Fs(FsError),
}

impl fmt::Display for CycleFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortWrite { written } => {
                write!(f, "short write of {} bytes", written)
            }
            Self::Mismatch { record } => write!(f, "mismatch at record {}", record),
            Self::Fs(e) => write!(f, "filesystem error: {}", e),
        }
    }
}

/// Result of a verification run.
///
/// The variant carries the phase and its detail. [`code`](Outcome::code)
/// folds the outcome into the single signed integer historically consumed
/// at process level: `0` pass, `1`/`2`/`3` for format/mount/unmount
/// failure, `-i` for a failure in cycle `i`. The fold is lossy - it drops
/// the fault detail, and a failure in cycle `0` of a
/// [`sweep`](crate::VerificationHarness::sweep) collides with the pass
/// code - so callers that can consume the enum should.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[must_use]
pub enum Outcome {
    /// Every cycle verified byte-exact and the session closed cleanly.
    Passed,
    /// Formatting the medium failed; nothing else was attempted.
    FormatFailed(FsError),
    /// Mounting the freshly formatted filesystem failed.
    MountFailed(FsError),
    /// All cycles verified, but the final unmount failed.
    UnmountFailed(FsError),
    /// A write-then-verify cycle failed; the run stopped there.
    CycleFailed {
        /// The iteration (repeat count) that failed.
        iteration: u32,
        /// What failed within the cycle.
        fault: CycleFault,
    },
}

impl Outcome {
    /// The legacy signed outcome code.
    pub const fn code(&self) -> i32 {
        match self {
            Self::Passed => 0,
            Self::FormatFailed(_) => 1,
            Self::MountFailed(_) => 2,
            Self::UnmountFailed(_) => 3,
            Self::CycleFailed { iteration, .. } => -(*iteration as i32),
        }
    }

    /// Whether the run verified everything and closed cleanly.
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Passed => write!(f, "passed"),
            Self::FormatFailed(e) => write!(f, "format failed: {}", e),
            Self::MountFailed(e) => write!(f, "mount failed: {}", e),
            Self::UnmountFailed(e) => write!(f, "unmount failed: {}", e),
            Self::CycleFailed { iteration, fault } => {
                write!(f, "cycle {} failed: {}", iteration, fault)
            }
        }
    }
}
