//! Error types for the NTLM negotiate codec

use std::io;
use thiserror::Error;

/// Result type for NTLM codec operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for NTLM message encoding and decoding
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the underlying cursor
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The message does not start with "NTLMSSP\0"
    #[error("Invalid NTLM signature")]
    InvalidSignature,

    /// The message type field does not name a negotiate message
    #[error("Unexpected NTLM message type: {0}")]
    UnexpectedMessageType(u32),

    /// The input ends before the fixed header or a referenced payload
    #[error("Truncated NTLM message: need {need} bytes, have {have}")]
    TruncatedMessage { need: usize, have: usize },

    /// Two payload descriptors reference overlapping byte ranges
    #[error("Overlapping payload: {0}")]
    OverlappingPayload(String),

    /// A payload descriptor disagrees with its payload or the negotiate flags
    #[error("Malformed payload descriptor: {0}")]
    MalformedDescriptor(String),

    /// The version block disagrees with the NEGOTIATE_VERSION flag
    #[error("Version block mismatch: {0}")]
    VersionMismatch(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncated_display() {
        let err = Error::TruncatedMessage { need: 32, have: 31 };
        let display = format!("{}", err);
        assert!(display.contains("need 32"));
        assert!(display.contains("have 31"));
    }

    #[test]
    fn test_io_conversion() {
        let io_err = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
