//! Value objects - immutable validated data of the block contract.

mod block_geometry;
mod block_request;
mod fs_config;

pub use block_geometry::{BlockGeometry, BLOCK_SIZE};
pub use block_request::{BlockOp, BlockRequest};
pub use fs_config::FsConfig;
