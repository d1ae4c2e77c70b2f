//! # chunkring - Fixed-Capacity Byte Ring
//!
//! chunkring is a single-threaded circular byte buffer for staging bytes
//! between a producer and a consumer, typically around network framing,
//! without copies beyond the ones the caller asks for.
//!
//! ## Features
//!
//! - **Copy-in writes**: `put` is all-or-nothing against the free space
//! - **Zero-copy descriptors**: write into and read out of the ring's own storage
//! - **Owned or borrowed storage**: allocate, or lay the ring over a caller region
//! - **Explicit occupancy**: a `used` counter keeps empty and full apart
//!
//! ## Layout
//!
//! ```text
//! owned ring                     adopted region
//! ┌────────────┐                 ┌────────────┬──────────────────────┐
//! │ RingHeader │ + Box<[u8]>     │ RingHeader │      data area       │
//! └────────────┘                 └────────────┴──────────────────────┘
//!                                 METADATA_OVERHEAD   len - overhead
//! ```
//!
//! Allocation failures are reported through `tracing`; install a subscriber
//! in the embedding application to see them.

pub mod error;
pub mod ringbuf;

// Main API re-exports
pub use error::{RingError, Result};
pub use ringbuf::{
    HeapStorage, OwnedRingBuffer, RegionRingBuffer, RegionStorage, RingBuffer, RingBufferConfig,
    RingBufferConfigBuilder, RingHeader, RingShape, RingStorage, StorageKind, HEADER_ALIGNMENT,
    METADATA_OVERHEAD, MIN_REGION_SIZE,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration constants
pub mod config {
    /// Default ring buffer capacity
    pub const DEFAULT_RING_CAPACITY: usize = 4096;

    /// Name given to rings created without a configuration
    pub const DEFAULT_RING_NAME: &str = "ringbuf";
}
