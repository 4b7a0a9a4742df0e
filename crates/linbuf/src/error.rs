use alloc::collections::TryReserveError;

use thiserror::Error;

/// Failure to construct a [`LinearBuffer`](crate::LinearBuffer).
///
/// Running out of room is never reported through this type: appends clamp
/// and return the number of bytes they accepted.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// A buffer must be able to hold at least one byte.
    #[error("buffer capacity must be greater than zero")]
    ZeroCapacity,
    /// The capacity plus the terminator slot does not fit in `usize`.
    #[error("buffer capacity {capacity} overflows the addressable size")]
    CapacityOverflow {
        /// Requested capacity.
        capacity: usize,
    },
    /// The allocator refused the backing region.
    #[error("failed to allocate {capacity} byte buffer")]
    Allocation {
        /// Requested capacity.
        capacity: usize,
        /// Error reported by the allocator.
        #[source]
        source: TryReserveError,
    },
}
