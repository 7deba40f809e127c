//! Domain layer - the block contract, free of device specifics.
//!
//! The domain layer holds the pieces of the adapter that do not touch a
//! device:
//! - **Value Objects**: immutable validated data ([`BlockGeometry`],
//!   [`BlockRequest`], [`FsConfig`])
//! - **Ports**: the [`BlockOps`] interface the filesystem consumes
//! - **Domain Errors**: [`GeometryError`]
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │        Filesystem                │
//!     └────────────┬─────────────────────┘
//!                  │ consumes
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │      BlockOps port               │  ◄── this module
//!     │  (geometry + read/program/       │
//!     │   erase/sync + buffers)          │
//!     └────────────┬─────────────────────┘
//!                  │ implemented by
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │
//!     │  - BlockDeviceAdapter            │
//!     └──────────────────────────────────┘
//! ```

mod error;
pub mod ports;
pub mod value_objects;

pub use error::GeometryError;
pub use ports::BlockOps;
pub use value_objects::{BlockGeometry, BlockOp, BlockRequest, FsConfig, BLOCK_SIZE};
