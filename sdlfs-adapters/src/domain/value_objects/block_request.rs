//! Transient description of one adapter invocation.

use core::fmt;

/// The operation kind of a [`BlockRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlockOp {
    /// Read one block.
    Read,
    /// Program (write) one block.
    Program,
    /// Erase one block.
    Erase,
    /// Flush pending state; carries no address.
    Sync,
}

/// One adapter invocation: operation kind, block index, intra-block offset
/// and transfer length.
///
/// Requests exist to be checked against a
/// [`BlockGeometry`](super::BlockGeometry) and to label the diagnostic when
/// a check fails; they are built per call and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlockRequest {
    op: BlockOp,
    block: u32,
    offset: u32,
    len: usize,
}

impl BlockRequest {
    /// A read of `len` bytes at `offset` within `block`.
    pub const fn read(block: u32, offset: u32, len: usize) -> Self {
        Self { op: BlockOp::Read, block, offset, len }
    }

    /// A program of `len` bytes at `offset` within `block`.
    pub const fn program(block: u32, offset: u32, len: usize) -> Self {
        Self { op: BlockOp::Program, block, offset, len }
    }

    /// An erase of `block`.
    pub const fn erase(block: u32) -> Self {
        Self { op: BlockOp::Erase, block, offset: 0, len: 0 }
    }

    /// A sync; addresses nothing.
    pub const fn sync() -> Self {
        Self { op: BlockOp::Sync, block: 0, offset: 0, len: 0 }
    }

    /// The operation kind.
    pub const fn op(&self) -> BlockOp {
        self.op
    }

    /// The addressed block index.
    pub const fn block(&self) -> u32 {
        self.block
    }

    /// The intra-block byte offset.
    pub const fn offset(&self) -> u32 {
        self.offset
    }

    /// The transfer length in bytes.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the request transfers no bytes.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Display for BlockRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.op {
            BlockOp::Read => {
                write!(f, "read(block={}, off={}, len={})", self.block, self.offset, self.len)
            }
            BlockOp::Program => {
                write!(f, "program(block={}, off={}, len={})", self.block, self.offset, self.len)
            }
            BlockOp::Erase => write!(f, "erase(block={})", self.block),
            BlockOp::Sync => write!(f, "sync()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_invocation() {
        assert_eq!(
            format!("{}", BlockRequest::read(7, 0, 512)),
            "read(block=7, off=0, len=512)"
        );
        assert_eq!(
            format!("{}", BlockRequest::program(3, 0, 512)),
            "program(block=3, off=0, len=512)"
        );
        assert_eq!(format!("{}", BlockRequest::erase(9)), "erase(block=9)");
        assert_eq!(format!("{}", BlockRequest::sync()), "sync()");
    }

    #[test]
    fn accessors_reflect_the_request() {
        let req = BlockRequest::program(12, 0, 512);
        assert_eq!(req.op(), BlockOp::Program);
        assert_eq!(req.block(), 12);
        assert_eq!(req.offset(), 0);
        assert_eq!(req.len(), 512);
        assert!(!req.is_empty());
        assert!(BlockRequest::sync().is_empty());
    }
}
