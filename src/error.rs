//! Configuration errors

use core::fmt::{self, Display};

/// A configuration error
///
/// Every variant is detected while setting up the transfer chain, before
/// the completion interrupt is unmasked. None of them are recoverable at
/// runtime; firmware is expected to halt on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Every DMA channel is already claimed
    NoFreeChannel,
    /// The stage table has no stages
    EmptySequence,
    /// A descriptor's source buffer is empty
    EmptyTransfer,
    /// A memory destination cannot hold the whole source
    DestinationTooShort {
        /// Source length, in bytes
        source: usize,
        /// Destination length, in bytes
        destination: usize,
    },
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoFreeChannel => f.write_str("no unclaimed DMA channel"),
            Error::EmptySequence => f.write_str("transfer sequence has no stages"),
            Error::EmptyTransfer => f.write_str("transfer source is empty"),
            Error::DestinationTooShort {
                source,
                destination,
            } => write!(
                f,
                "destination of {destination} bytes cannot hold a {source} byte transfer"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;
    use super::Error;
    use std::string::ToString;

    #[test]
    fn display_names_sizes() {
        let err = Error::DestinationTooShort {
            source: 16,
            destination: 8,
        };
        assert_eq!(
            err.to_string(),
            "destination of 8 bytes cannot hold a 16 byte transfer"
        );
    }
}
