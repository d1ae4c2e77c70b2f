//! Single-threaded byte ring with zero-copy chunk access

use std::fmt;

use tracing::{debug, error, trace};

use crate::error::{RingError, Result};

use super::{
    config::RingBufferConfig,
    header::{RingHeader, RingShape},
    storage::{HeapStorage, RegionStorage, RingStorage, StorageKind},
};

/// Fixed-capacity circular byte buffer.
///
/// Bytes go in either by copy ([`put`](Self::put)) or by writing straight
/// into the slice returned from [`writable`](Self::writable) and committing
/// with [`wrote`](Self::wrote). They come out through
/// [`next_chunk`](Self::next_chunk) followed by
/// [`mark_consumed`](Self::mark_consumed).
///
/// Descriptors expose one contiguous run per call. When free space or live
/// data wraps past the end of storage, a second call after committing or
/// consuming the first run returns the remainder:
///
/// ```
/// use chunkring::RingBuffer;
///
/// let mut ring = RingBuffer::new(8).unwrap();
/// ring.put(b"abcdef").unwrap();
/// ring.mark_consumed(4);
/// ring.put(b"ghij").unwrap();
///
/// let mut out = Vec::new();
/// while !ring.is_empty() {
///     let chunk = ring.next_chunk();
///     out.extend_from_slice(chunk);
///     let len = chunk.len();
///     ring.mark_consumed(len);
/// }
/// assert_eq!(out, b"efghij");
/// ```
///
/// All mutation goes through `&mut self`; sharing a ring across threads
/// needs external locking.
pub struct RingBuffer<S: RingStorage = HeapStorage> {
    storage: S,
    name: String,
}

impl RingBuffer<HeapStorage> {
    /// Allocate a ring with `capacity` bytes of storage.
    ///
    /// Fails with [`RingError::InvalidParameter`] for a zero capacity and
    /// [`RingError::OutOfMemory`] when the allocation cannot be satisfied.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_config(RingBufferConfig::default().with_capacity(capacity))
    }

    /// Allocate a ring from a validated configuration
    pub fn with_config(config: RingBufferConfig) -> Result<Self> {
        config.validate()?;

        let storage = HeapStorage::allocate(config.capacity).map_err(|err| {
            error!(
                ring = %config.name,
                requested = config.capacity,
                "out of memory allocating ring buffer storage"
            );
            err
        })?;

        debug!(ring = %config.name, capacity = config.capacity, "ring buffer allocated");

        Ok(Self {
            storage,
            name: config.name,
        })
    }

    /// Free the ring's storage.
    ///
    /// Only owned rings can be released; an adopted region goes back to its
    /// owner through [`RingBuffer::into_region`]. Dropping the ring has the
    /// same effect.
    pub fn release(self) {
        trace!(ring = %self.name, "ring buffer released");
        drop(self);
    }
}

impl<'a> RingBuffer<RegionStorage<'a>> {
    /// Use `region` as backing storage.
    ///
    /// The first [`METADATA_OVERHEAD`](crate::METADATA_OVERHEAD) bytes hold
    /// the cursors; the rest become the data area. Regions shorter than
    /// [`MIN_REGION_SIZE`](crate::MIN_REGION_SIZE) fail with
    /// [`RingError::RegionTooSmall`], and regions whose start is not aligned
    /// to [`HEADER_ALIGNMENT`](crate::HEADER_ALIGNMENT) fail with
    /// [`RingError::Misaligned`]. A failed call does not write to `region`.
    pub fn from_region(region: &'a mut [u8]) -> Result<Self> {
        let size = region.len();
        let storage = RegionStorage::adopt(region)?;
        let ring = Self {
            storage,
            name: crate::config::DEFAULT_RING_NAME.to_string(),
        };
        debug!(region = size, capacity = ring.capacity(), "ring buffer adopted region");
        Ok(ring)
    }

    /// Adopt a region previously returned by [`into_region`](Self::into_region),
    /// keeping whatever was pending in it.
    ///
    /// Fails with [`RingError::CorruptHeader`] when the cursors stored in the
    /// region are inconsistent with its size.
    pub fn reattach(region: &'a mut [u8]) -> Result<Self> {
        let storage = RegionStorage::reattach(region)?;
        let ring = Self {
            storage,
            name: crate::config::DEFAULT_RING_NAME.to_string(),
        };
        debug!(
            capacity = ring.capacity(),
            pending = ring.pending(),
            "ring buffer reattached to region"
        );
        Ok(ring)
    }

    /// Hand the region, header included, back to the caller.
    ///
    /// The cursors stay in the region so it can be passed to
    /// [`reattach`](Self::reattach) later.
    pub fn into_region(self) -> &'a mut [u8] {
        self.storage.into_region()
    }
}

impl<S: RingStorage> RingBuffer<S> {
    /// Replace the name used in log events
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Name used in log events
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the ring owns its storage
    pub fn storage_kind(&self) -> StorageKind {
        self.storage.kind()
    }

    /// Snapshot of the cursors
    pub fn header(&self) -> &RingHeader {
        self.storage.header()
    }

    /// Size of the data area in bytes
    pub fn capacity(&self) -> usize {
        self.header().capacity()
    }

    /// Bytes that can still be written
    pub fn free_space(&self) -> usize {
        self.header().free_space()
    }

    /// Bytes written but not yet consumed
    pub fn pending(&self) -> usize {
        self.header().used()
    }

    /// True when nothing is pending
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// True when no byte can be written
    pub fn is_full(&self) -> bool {
        self.pending() == self.capacity()
    }

    /// Current layout of the pending bytes
    pub fn shape(&self) -> RingShape {
        self.header().shape()
    }

    /// Copy `data` into the ring.
    ///
    /// All or nothing: if `data` is longer than [`free_space`](Self::free_space)
    /// nothing is written and [`RingError::InsufficientSpace`] is returned.
    pub fn put(&mut self, data: &[u8]) -> Result<()> {
        let len = data.len();
        let available = self.free_space();
        if len > available {
            return Err(RingError::insufficient_space(len, available));
        }

        let (header, storage) = self.storage.split_mut();
        debug_assert_eq!(header.free_space_from_cursors(), available);

        let write = header.write_pos();
        if write < header.read_pos() {
            // Free space is the single run [write, read)
            storage[write..write + len].copy_from_slice(data);
        } else {
            // Free space is [write, capacity) then [0, read)
            let first = (header.capacity() - write).min(len);
            storage[write..write + first].copy_from_slice(&data[..first]);
            if len > first {
                storage[..len - first].copy_from_slice(&data[first..]);
            }
        }

        header.advance_write(len);
        Ok(())
    }

    /// Next run of free space, for writing in place.
    ///
    /// Empty when the ring is full. Bytes written here become pending only
    /// after [`wrote`](Self::wrote). If free space wraps, the run stops at the
    /// end of storage and the rest is offered by the next call.
    pub fn writable(&mut self) -> &mut [u8] {
        let (header, storage) = self.storage.split_mut();
        let start = header.write_pos();
        let run = header.writable_run();
        &mut storage[start..start + run]
    }

    /// Commit `len` bytes written into the slice from
    /// [`writable`](Self::writable).
    ///
    /// # Panics
    /// Panics if `len` is longer than the current writable run.
    pub fn wrote(&mut self, len: usize) {
        self.storage.header_mut().commit_write(len);
    }

    /// Next run of pending bytes, for reading in place.
    ///
    /// Empty when nothing is pending. If pending data wraps, only the run up
    /// to the end of storage is returned; consume it and call again for the
    /// rest.
    pub fn next_chunk(&self) -> &[u8] {
        let header = self.storage.header();
        let start = header.read_pos();
        let run = header.readable_run();
        &self.storage.data()[start..start + run]
    }

    /// Release `len` bytes from the front of the pending data.
    ///
    /// # Panics
    /// Panics if `len` is greater than [`pending`](Self::pending).
    pub fn mark_consumed(&mut self, len: usize) {
        self.storage.header_mut().consume(len);
    }

    /// Drop all pending bytes and rewind the cursors. Storage is kept.
    pub fn clear(&mut self) {
        trace!(ring = %self.name, dropped = self.pending(), "ring buffer cleared");
        self.storage.header_mut().reset();
    }
}

impl<S: RingStorage> fmt::Debug for RingBuffer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = self.header();
        f.debug_struct("RingBuffer")
            .field("name", &self.name)
            .field("storage", &self.storage_kind())
            .field("capacity", &header.capacity())
            .field("used", &header.used())
            .field("write", &header.write_pos())
            .field("read", &header.read_pos())
            .field("shape", &header.shape())
            .finish()
    }
}
