//! Fixed-capacity byte ring with zero-copy read and write descriptors

pub mod buffer;
pub mod config;
pub mod header;
pub mod storage;

#[cfg(test)]
mod tests;

// Re-export main types for convenience
pub use buffer::RingBuffer;
pub use config::{RingBufferConfig, RingBufferConfigBuilder};
pub use header::{RingHeader, RingShape, HEADER_ALIGNMENT, METADATA_OVERHEAD, MIN_REGION_SIZE};
pub use storage::{HeapStorage, RegionStorage, RingStorage, StorageKind};

/// Ring that owns its storage
pub type OwnedRingBuffer = RingBuffer<HeapStorage>;

/// Ring laid over a caller-owned region
pub type RegionRingBuffer<'a> = RingBuffer<RegionStorage<'a>>;
