//! NTLM message layer

pub mod flags;
pub mod layout;
pub mod negotiate;
pub mod payload;
pub mod version;

use crate::error::Result;

pub use flags::{NtlmFlags, NtlmMessageType, NTLMSSP_SIGNATURE};
pub use layout::{NegotiateLayout, NEGOTIATE_HEADER_SIZE};
pub use negotiate::{NegotiateConfig, NegotiateMessage};
pub use payload::PayloadDescriptor;
pub use version::{VersionBlock, NTLMSSP_REVISION_W2K3};

/// Trait for NTLM messages that can be parsed from and serialized to bytes
pub trait NtlmMessage: Sized {
    /// Parse message from bytes
    fn parse(buf: &[u8]) -> Result<Self>;

    /// Serialize message to bytes
    fn serialize(&self) -> Result<Vec<u8>>;

    /// Get the size of the message when serialized
    fn size(&self) -> usize;
}
