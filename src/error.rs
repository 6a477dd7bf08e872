//! Error types for fallible construction.

use core::alloc::Layout;
use core::fmt::{self, Debug, Display, Formatter};

/// The error type returned by the fallible constructors of
/// [`CircularVec`](crate::CircularVec) and
/// [`AllocStorage`](crate::storage::AllocStorage).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TryReserveError {
    /// The requested capacity exceeds the maximum size of an allocation
    /// for the element type, i.e. `isize::MAX` bytes.
    CapacityOverflow,
    /// The allocator failed to provide a block of the given layout.
    AllocError {
        /// The layout of the rejected allocation request.
        layout: Layout,
    },
}

impl Display for TryReserveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("memory allocation failed")?;
        match self {
            TryReserveError::CapacityOverflow => {
                f.write_str(" because the computed capacity exceeded the collection's maximum")
            }
            TryReserveError::AllocError { layout } => write!(
                f,
                " because the memory allocator returned an error (size: {}, align: {})",
                layout.size(),
                layout.align()
            ),
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docs_rs, doc(cfg(feature = "std")))]
impl std::error::Error for TryReserveError {}
