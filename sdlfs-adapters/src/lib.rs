//! Block device adapter for log-structured filesystems over sector media.
//!
//! This crate translates the four-operation block contract a log-structured
//! filesystem requires (read / program / erase / sync) into single-sector
//! transactions against a [`SectorDevice`](sdlfs_sector_device::SectorDevice).
//! One logical block maps to exactly one physical sector; the geometry is
//! probed from the medium once and never changes for the adapter's lifetime.
//!
//! # Architecture
//!
//! The crate is organized in two layers:
//!
//! ## Domain Layer (`domain`)
//! The contract itself, free of device specifics:
//! - **Value Objects**: [`BlockGeometry`], [`BlockRequest`], [`FsConfig`]
//! - **Ports**: [`BlockOps`], the interface the filesystem consumes
//!
//! ## Adapter Layer (`adapters`)
//! - **[`BlockDeviceAdapter`]**: implements `BlockOps` over a `SectorDevice`
//!
//! # Failure model
//!
//! There is no recoverable-error path through the adapter. A request that
//! violates the configured geometry, or a medium-level I/O failure, is a
//! fatal contract violation and panics with a diagnostic naming the request.
//! The filesystem was configured with the same geometry the adapter checks
//! against, so a violation means the session is misconfigured and cannot be
//! repaired mid-flight.
//!
//! # Quick start
//!
//! ```ignore
//! use sdlfs_adapters::BlockDeviceAdapter;
//!
//! let card = SdCard::acquire(bus)?;
//! let adapter = BlockDeviceAdapter::new(card).await?;
//! let config = *adapter.config();
//! // hand `adapter` (as `impl BlockOps`) and `config` to the filesystem
//! ```

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![allow(async_fn_in_trait)]

pub mod adapters;
pub mod domain;

pub use adapters::{AdapterInitError, BlockDeviceAdapter};
pub use domain::{
    BlockGeometry, BlockOp, BlockOps, BlockRequest, FsConfig, GeometryError, BLOCK_SIZE,
};

// Re-export the device layer so dependents need only this crate.
pub use sdlfs_sector_device::{self as sector_device, Aligned, SectorDevice};
