//! Error type for bitstream and entropy coder operations.
//!
//! | Error | Raised when |
//! |-------|-------------|
//! | [`InvalidArgument`] | Zero lengths, undersized destinations, bad static split |
//! | [`OutOfMemory`] | An owned buffer could not be allocated |
//! | [`CapacityLimit`] | A write would run past the end of the buffer |
//! | [`InvalidResource`] | Strict read past the data, read-only write, decode desync |
//! | [`ExecutionFailure`] | An internal invariant did not hold |
//!
//! Failures the caller did not provoke directly are "posted" through [`post`], which sends
//! them to the `log` facade before handing them back.
//!
//! [`InvalidArgument`]: CabacError::InvalidArgument
//! [`OutOfMemory`]: CabacError::OutOfMemory
//! [`CapacityLimit`]: CabacError::CapacityLimit
//! [`InvalidResource`]: CabacError::InvalidResource
//! [`ExecutionFailure`]: CabacError::ExecutionFailure

use std::fmt;
use std::io;

use log::error;

/// Status of a failed bitstream or coder call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CabacError {
    /// The call itself was malformed (zero length, destination too small, ...).
    InvalidArgument(&'static str),

    /// An owned buffer of `bytes` bytes could not be obtained.
    OutOfMemory {
        /// Number of bytes requested.
        bytes: usize,
    },

    /// The write would exceed the allocated bit capacity. Nothing was written.
    CapacityLimit {
        /// Bits the write needed.
        needed: usize,
        /// Bits still free in the buffer.
        available: usize,
    },

    /// Not enough data, a read-only buffer, or coder state that contradicts the input.
    InvalidResource(&'static str),

    /// An assumption of the algorithm was violated.
    ExecutionFailure(&'static str),
}

impl fmt::Display for CabacError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            Self::OutOfMemory { bytes } => write!(f, "Out of memory allocating {} bytes", bytes),
            Self::CapacityLimit { needed, available } => {
                write!(
                    f,
                    "Capacity limit: need {} bits, {} bits available",
                    needed, available
                )
            }
            Self::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Self::ExecutionFailure(msg) => write!(f, "Execution failure: {}", msg),
        }
    }
}

impl std::error::Error for CabacError {}

impl From<CabacError> for io::Error {
    fn from(e: CabacError) -> Self {
        let kind = match e {
            CabacError::InvalidArgument(_) => io::ErrorKind::InvalidInput,
            CabacError::OutOfMemory { .. } => io::ErrorKind::OutOfMemory,
            CabacError::CapacityLimit { .. } => io::ErrorKind::WriteZero,
            CabacError::InvalidResource(_) => io::ErrorKind::InvalidData,
            CabacError::ExecutionFailure(_) => io::ErrorKind::Other,
        };
        io::Error::new(kind, e)
    }
}

/// Report an error to the log and hand it back for propagation.
pub fn post(e: CabacError) -> CabacError {
    error!("{}", e);
    e
}

pub type Result<T> = std::result::Result<T, CabacError>;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn display_test() {
        let e = CabacError::CapacityLimit {
            needed: 9,
            available: 3,
        };
        assert_eq!(
            e.to_string(),
            "Capacity limit: need 9 bits, 3 bits available"
        );
        assert_eq!(
            CabacError::InvalidResource("no data").to_string(),
            "Invalid resource: no data"
        );
    }

    #[test]
    fn io_conversion_test() {
        let e: io::Error = CabacError::InvalidArgument("zero length").into();
        assert_eq!(e.kind(), io::ErrorKind::InvalidInput);
        let e: io::Error = CabacError::InvalidResource("desync").into();
        assert_eq!(e.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn post_returns_same_error() {
        let e = CabacError::ExecutionFailure("bulk copy moved no bits");
        assert_eq!(post(e.clone()), e);
    }
}
