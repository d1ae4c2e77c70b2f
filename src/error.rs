//! Error types and handling for chunkring

/// Result type alias for ring buffer operations
pub type Result<T> = std::result::Result<T, RingError>;

/// Recoverable failures reported by the ring buffer.
///
/// Caller contract violations (committing more than was reserved, consuming
/// more than is pending) are not represented here: they panic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// Backing storage could not be allocated
    #[error("Out of memory: failed to allocate {requested} bytes")]
    OutOfMemory { requested: usize },

    /// Not enough free space for a copy-in write
    #[error("Insufficient space: requested {requested}, available {available}")]
    InsufficientSpace { requested: usize, available: usize },

    /// Caller-supplied region cannot hold the header plus one data byte
    #[error("Region too small: {size} bytes, need at least {minimum}")]
    RegionTooSmall { size: usize, minimum: usize },

    /// Caller-supplied region is not aligned for the in-place header
    #[error("Alignment error: address {address:#x} not aligned to {alignment}")]
    Misaligned { address: usize, alignment: usize },

    /// Invalid parameters or configuration
    #[error("Invalid parameter: {parameter} - {message}")]
    InvalidParameter { parameter: String, message: String },

    /// A header found in an adopted region violates the ring invariants
    #[error("Corrupt header: {message}")]
    CorruptHeader { message: String },
}

impl RingError {
    /// Create an out-of-memory error
    pub fn out_of_memory(requested: usize) -> Self {
        Self::OutOfMemory { requested }
    }

    /// Create an insufficient space error
    pub fn insufficient_space(requested: usize, available: usize) -> Self {
        Self::InsufficientSpace {
            requested,
            available,
        }
    }

    /// Create a region-too-small error
    pub fn region_too_small(size: usize, minimum: usize) -> Self {
        Self::RegionTooSmall { size, minimum }
    }

    /// Create an alignment error
    pub fn misaligned(address: usize, alignment: usize) -> Self {
        Self::Misaligned { address, alignment }
    }

    /// Create an invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a corrupt header error
    pub fn corrupt_header(message: impl Into<String>) -> Self {
        Self::CorruptHeader {
            message: message.into(),
        }
    }

    /// True for failures caused by running out of room, as opposed to
    /// construction problems
    pub fn is_exhaustion(&self) -> bool {
        matches!(self, Self::OutOfMemory { .. } | Self::InsufficientSpace { .. })
    }
}
