//! Negotiate message layout
//!
//! Fixed-size sections are sized first; payload offsets follow from section
//! order. Whether the version block is present is decided once, from the
//! flags, and every offset below is derived from that decision.

use super::flags::NtlmFlags;
use super::version::VersionBlock;

/// Signature, message type, flags and the two payload descriptors
pub const NEGOTIATE_HEADER_SIZE: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiateLayout {
    version_present: bool,
}

impl NegotiateLayout {
    pub fn for_flags(flags: NtlmFlags) -> Self {
        Self {
            version_present: flags.has_version(),
        }
    }

    pub fn has_version(&self) -> bool {
        self.version_present
    }

    /// First byte after the fixed header and the optional version block
    pub fn payload_offset(&self) -> usize {
        if self.version_present {
            NEGOTIATE_HEADER_SIZE + VersionBlock::SIZE
        } else {
            NEGOTIATE_HEADER_SIZE
        }
    }

    /// Domain and workstation offsets; the workstation bytes follow the domain.
    /// An empty field still gets the position it would occupy.
    pub fn offsets(&self, domain_len: u16) -> (u32, u32) {
        // At most 40 + u16::MAX, always within u32
        let domain_offset = self.payload_offset() as u32;
        (domain_offset, domain_offset + u32::from(domain_len))
    }

    pub fn message_len(&self, domain_len: u16, workstation_len: u16) -> usize {
        self.payload_offset() + domain_len as usize + workstation_len as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_without_version() {
        let layout = NegotiateLayout::for_flags(NtlmFlags::from_bits_retain(0xb203));
        assert!(!layout.has_version());
        assert_eq!(layout.payload_offset(), 32);
        assert_eq!(layout.offsets(7), (32, 39));
        assert_eq!(layout.message_len(7, 0), 39);
    }

    #[test]
    fn test_layout_with_version() {
        let flags = NtlmFlags::client_default() | NtlmFlags::NEGOTIATE_VERSION;
        let layout = NegotiateLayout::for_flags(flags);
        assert!(layout.has_version());
        assert_eq!(layout.payload_offset(), 40);
        assert_eq!(layout.offsets(6), (40, 46));
        assert_eq!(layout.message_len(6, 4), 50);
    }

    #[test]
    fn test_layout_largest_payload() {
        let layout = NegotiateLayout::for_flags(NtlmFlags::NEGOTIATE_VERSION);
        let (domain, workstation) = layout.offsets(u16::MAX);
        assert_eq!(domain, 40);
        assert_eq!(workstation, 40 + u16::MAX as u32);
    }
}
