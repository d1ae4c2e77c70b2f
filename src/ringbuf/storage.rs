//! Backing storage for ring buffers
//!
//! A ring either owns its bytes ([`HeapStorage`]) or is laid over a region the
//! caller owns ([`RegionStorage`]). The two are separate types so operations
//! that free memory can only exist for the owned case.

use std::{
    alloc::{self, Layout},
    fmt, ptr,
};

use crate::error::{RingError, Result};

use super::header::{RingHeader, HEADER_ALIGNMENT, METADATA_OVERHEAD, MIN_REGION_SIZE};

/// Who is responsible for releasing the backing bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    /// The ring allocated its storage and frees it on drop
    Exclusive,
    /// The caller supplied the storage and keeps ownership of it
    Borrowed,
}

mod sealed {
    pub trait Sealed {}
}

/// Header plus data area backing a ring buffer.
///
/// Implemented only by [`HeapStorage`] and [`RegionStorage`]; the ring relies
/// on the data area being exactly `capacity` bytes long.
///
/// ```compile_fail
/// use chunkring::{RingHeader, RingStorage, StorageKind};
///
/// struct Elsewhere;
///
/// impl RingStorage for Elsewhere {
///     fn header(&self) -> &RingHeader { unimplemented!() }
///     fn data(&self) -> &[u8] { &[] }
///     fn split_mut(&mut self) -> (&mut RingHeader, &mut [u8]) { unimplemented!() }
///     fn kind(&self) -> StorageKind { StorageKind::Borrowed }
/// }
/// ```
pub trait RingStorage: sealed::Sealed {
    /// Cursor state
    fn header(&self) -> &RingHeader;

    /// Data area; its length equals the header capacity
    fn data(&self) -> &[u8];

    /// Mutable cursor state and data area at once
    fn split_mut(&mut self) -> (&mut RingHeader, &mut [u8]);

    /// Mutable cursor state
    fn header_mut(&mut self) -> &mut RingHeader {
        self.split_mut().0
    }

    /// Ownership of the backing bytes
    fn kind(&self) -> StorageKind;
}

/// Heap storage allocated and owned by the ring
pub struct HeapStorage {
    header: RingHeader,
    data: Box<[u8]>,
}

impl HeapStorage {
    /// Allocate a zeroed data area of `capacity` bytes.
    ///
    /// Allocation failure is reported as [`RingError::OutOfMemory`] instead
    /// of aborting the process.
    pub fn allocate(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(RingError::invalid_parameter(
                "capacity",
                "Capacity must be greater than 0",
            ));
        }

        let layout =
            Layout::array::<u8>(capacity).map_err(|_| RingError::out_of_memory(capacity))?;

        // Zeroed pages come straight from the allocator, so a large ring is
        // not touched byte by byte before it is used.
        let data = unsafe {
            let bytes = alloc::alloc_zeroed(layout);
            if bytes.is_null() {
                return Err(RingError::out_of_memory(capacity));
            }
            // SAFETY: `bytes` is a live allocation of `layout`, which is the
            // layout `Box<[u8]>` uses for `capacity` bytes.
            Box::from_raw(ptr::slice_from_raw_parts_mut(bytes, capacity))
        };

        Ok(Self {
            header: RingHeader::new(capacity),
            data,
        })
    }
}

impl sealed::Sealed for HeapStorage {}

impl RingStorage for HeapStorage {
    fn header(&self) -> &RingHeader {
        &self.header
    }

    fn data(&self) -> &[u8] {
        &self.data
    }

    fn split_mut(&mut self) -> (&mut RingHeader, &mut [u8]) {
        (&mut self.header, &mut self.data)
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Exclusive
    }
}

/// Storage laid over a caller-supplied region.
///
/// The first [`METADATA_OVERHEAD`] bytes of the region hold the
/// [`RingHeader`]; the rest is the data area. The region is never freed by
/// the ring; [`RegionStorage::into_region`] hands it back.
pub struct RegionStorage<'a> {
    region: &'a mut [u8],
}

impl<'a> RegionStorage<'a> {
    /// Lay a fresh, empty header over `region`.
    ///
    /// The region is only inspected (length and address) before the checks
    /// pass; nothing is written on failure.
    pub fn adopt(region: &'a mut [u8]) -> Result<Self> {
        Self::check_region(region)?;
        let mut storage = Self { region };
        let capacity = storage.region.len() - METADATA_OVERHEAD;
        *storage.header_mut() = RingHeader::new(capacity);
        Ok(storage)
    }

    /// Re-adopt a region whose header was written by an earlier ring,
    /// keeping its pending bytes.
    pub fn reattach(region: &'a mut [u8]) -> Result<Self> {
        Self::check_region(region)?;
        let storage = Self { region };
        storage
            .header()
            .validate(storage.region.len() - METADATA_OVERHEAD)?;
        Ok(storage)
    }

    /// Give the whole region, header included, back to the caller
    pub fn into_region(self) -> &'a mut [u8] {
        self.region
    }

    fn check_region(region: &[u8]) -> Result<()> {
        if region.len() < MIN_REGION_SIZE {
            return Err(RingError::region_too_small(region.len(), MIN_REGION_SIZE));
        }

        let address = region.as_ptr() as usize;
        if address % HEADER_ALIGNMENT != 0 {
            return Err(RingError::misaligned(address, HEADER_ALIGNMENT));
        }

        Ok(())
    }
}

impl sealed::Sealed for RegionStorage<'_> {}

impl RingStorage for RegionStorage<'_> {
    fn header(&self) -> &RingHeader {
        // SAFETY: construction checked that the region is at least
        // METADATA_OVERHEAD bytes and aligned for RingHeader. RingHeader is
        // plain usize fields, so any initialized bytes are a valid value.
        unsafe { &*(self.region.as_ptr() as *const RingHeader) }
    }

    fn data(&self) -> &[u8] {
        &self.region[METADATA_OVERHEAD..]
    }

    fn split_mut(&mut self) -> (&mut RingHeader, &mut [u8]) {
        let (head, data) = self.region.split_at_mut(METADATA_OVERHEAD);
        // SAFETY: as in `header`; `head` is exclusively borrowed and disjoint
        // from `data`.
        let header = unsafe { &mut *(head.as_mut_ptr() as *mut RingHeader) };
        (header, data)
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Borrowed
    }
}

impl fmt::Debug for HeapStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeapStorage")
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for RegionStorage<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegionStorage")
            .field("region_len", &self.region.len())
            .field("header", self.header())
            .finish()
    }
}
