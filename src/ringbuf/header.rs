//! Ring cursor header and wraparound arithmetic
//!
//! The header is the whole state of a ring apart from its bytes. It is
//! `#[repr(C)]` so an adopted region can carry it in place, ahead of the data
//! area.
//!
//! ```text
//!  contiguous                         wrapped
//!  ┌────┬──────────┬──────┐          ┌────┬──────────┬──────┐
//!  │free│   live   │ free │          │live│   free   │ live │
//!  └────┴──────────┴──────┘          └────┴──────────┴──────┘
//!       read       write                  write      read
//! ```
//!
//! `write == read` is ambiguous between an empty and a full ring; `used`
//! resolves it and is the only source of truth for occupancy.

use std::mem::{align_of, size_of};

use crate::error::{RingError, Result};

/// Bytes an adopted region gives up to hold the header
pub const METADATA_OVERHEAD: usize = size_of::<RingHeader>();

/// Alignment an adopted region must satisfy
pub const HEADER_ALIGNMENT: usize = align_of::<RingHeader>();

/// Smallest region that can be adopted: header plus one data byte
pub const MIN_REGION_SIZE: usize = METADATA_OVERHEAD + 1;

/// Shape of the live data, recomputed from the cursors on every call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingShape {
    /// No live bytes; `write == read`
    Empty,
    /// Every byte is live; `write == read`
    Full,
    /// Live bytes form the single run `[read, write)`
    Contiguous,
    /// Live bytes are `[read, capacity)` followed by `[0, write)`
    Wrapped,
}

/// Cursor state of a ring buffer
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingHeader {
    /// Size of the data area; never changes after creation
    capacity: usize,
    /// Live bytes
    used: usize,
    /// Index of the next byte to write
    write: usize,
    /// Index of the next byte to read
    read: usize,
}

impl RingHeader {
    /// Create an empty header for a data area of `capacity` bytes
    pub(crate) fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0);
        Self {
            capacity,
            used: 0,
            write: 0,
            read: 0,
        }
    }

    /// Size of the data area
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Live bytes waiting to be consumed
    pub fn used(&self) -> usize {
        self.used
    }

    /// Index of the next byte to write
    pub fn write_pos(&self) -> usize {
        self.write
    }

    /// Index of the next byte to read
    pub fn read_pos(&self) -> usize {
        self.read
    }

    /// Bytes that can still be written
    pub fn free_space(&self) -> usize {
        self.capacity - self.used
    }

    /// Classify the live data
    pub fn shape(&self) -> RingShape {
        if self.read < self.write {
            RingShape::Contiguous
        } else if self.read > self.write {
            RingShape::Wrapped
        } else if self.used == 0 {
            RingShape::Empty
        } else {
            RingShape::Full
        }
    }

    /// Free space as derived from the cursors alone, using `used` only to
    /// break the `write == read` tie.
    pub(crate) fn free_space_from_cursors(&self) -> usize {
        if self.write < self.read {
            self.read - self.write
        } else if self.write == self.read {
            self.capacity - self.used
        } else {
            (self.capacity - self.write) + self.read
        }
    }

    /// Length of the free run starting at `write`
    pub(crate) fn writable_run(&self) -> usize {
        if self.used == self.capacity {
            0
        } else if self.write >= self.read {
            self.capacity - self.write
        } else {
            self.read - self.write
        }
    }

    /// Length of the live run starting at `read`
    pub(crate) fn readable_run(&self) -> usize {
        if self.read < self.write {
            self.write - self.read
        } else if self.read == self.write && self.used == 0 {
            0
        } else {
            // Wrapped, or full with both cursors at the same index. Only the
            // run up to the end of storage is handed out.
            self.capacity - self.read
        }
    }

    /// Account for `len` bytes copied in at `write`
    pub(crate) fn advance_write(&mut self, len: usize) {
        debug_assert!(len <= self.free_space());
        self.write = (self.write + len) % self.capacity;
        self.used += len;
    }

    /// Commit `len` bytes written into the current writable run.
    ///
    /// # Panics
    /// Panics if `len` exceeds the writable run.
    pub(crate) fn commit_write(&mut self, len: usize) {
        let max = self.writable_run();
        assert!(
            len <= max,
            "committed {len} bytes but the writable run is only {max} bytes"
        );
        self.advance_write(len);
    }

    /// Release `len` consumed bytes.
    ///
    /// # Panics
    /// Panics if `len` exceeds the pending byte count.
    pub(crate) fn consume(&mut self, len: usize) {
        assert!(
            len <= self.used,
            "consumed {len} bytes but only {} are pending",
            self.used
        );
        self.read = (self.read + len) % self.capacity;
        self.used -= len;
    }

    /// Drop all live bytes and rewind both cursors
    pub(crate) fn reset(&mut self) {
        self.used = 0;
        self.write = 0;
        self.read = 0;
    }

    /// Check a header found in memory against a data area of
    /// `data_len` bytes
    pub(crate) fn validate(&self, data_len: usize) -> Result<()> {
        if self.capacity == 0 || self.capacity != data_len {
            return Err(RingError::corrupt_header(format!(
                "capacity {} does not match data area of {} bytes",
                self.capacity, data_len
            )));
        }
        if self.used > self.capacity {
            return Err(RingError::corrupt_header(format!(
                "used {} exceeds capacity {}",
                self.used, self.capacity
            )));
        }
        if self.write >= self.capacity || self.read >= self.capacity {
            return Err(RingError::corrupt_header(format!(
                "cursor out of range (write {}, read {}, capacity {})",
                self.write, self.read, self.capacity
            )));
        }

        let consistent = match self.shape() {
            RingShape::Contiguous => self.used == self.write - self.read,
            RingShape::Wrapped => self.used == (self.capacity - self.read) + self.write,
            // Equal cursors mean nothing or everything is live
            RingShape::Empty | RingShape::Full => {
                self.used == 0 || self.used == self.capacity
            }
        };
        if !consistent {
            return Err(RingError::corrupt_header(format!(
                "used {} disagrees with cursors (write {}, read {})",
                self.used, self.write, self.read
            )));
        }

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn from_parts(capacity: usize, used: usize, write: usize, read: usize) -> Self {
        Self {
            capacity,
            used,
            write,
            read,
        }
    }
}
