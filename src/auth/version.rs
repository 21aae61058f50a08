//! NTLM version block

use crate::error::Result;
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt};
use std::io::{self, Read, Write};

/// NTLMSSP revision 15, the only revision in current use
pub const NTLMSSP_REVISION_W2K3: u8 = 0x0F;

/// NTLM version information (MS-NLMP 2.2.2.10)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionBlock {
    pub major: u8,
    pub minor: u8,
    pub build: u16,
    pub ntlm_revision: u8,
}

impl VersionBlock {
    /// Encoded size of the version block
    pub const SIZE: usize = 8;

    pub fn new(major: u8, minor: u8, build: u16) -> Self {
        Self {
            major,
            minor,
            build,
            ntlm_revision: NTLMSSP_REVISION_W2K3,
        }
    }

    pub fn bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        out[0] = self.major;
        out[1] = self.minor;
        LittleEndian::write_u16(&mut out[2..4], self.build);
        // bytes 4..7 reserved
        out[7] = self.ntlm_revision;
        out
    }

    pub fn parse(cursor: &mut io::Cursor<&[u8]>) -> Result<Self> {
        let major = cursor.read_u8()?;
        let minor = cursor.read_u8()?;
        let build = cursor.read_u16::<LittleEndian>()?;
        let mut reserved = [0u8; 3];
        cursor.read_exact(&mut reserved)?;
        let ntlm_revision = cursor.read_u8()?;

        Ok(Self {
            major,
            minor,
            build,
            ntlm_revision,
        })
    }

    pub fn serialize(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.write_all(&self.bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_layout() {
        // Windows 10, build 19041
        let version = VersionBlock::new(10, 0, 19041);
        assert_eq!(
            version.bytes(),
            [0x0A, 0x00, 0x61, 0x4A, 0x00, 0x00, 0x00, 0x0F]
        );
    }

    #[test]
    fn test_version_parse_ignores_reserved() {
        let raw = [6u8, 1, 0xB1, 0x1D, 0xAA, 0xBB, 0xCC, 0x0F];
        let mut cursor = io::Cursor::new(&raw[..]);
        let version = VersionBlock::parse(&mut cursor).unwrap();
        assert_eq!(version, VersionBlock::new(6, 1, 7601));
        assert_eq!(cursor.position(), 8);
    }

    #[test]
    fn test_version_parse_short_input() {
        let raw = [6u8, 1, 0xB1];
        let mut cursor = io::Cursor::new(&raw[..]);
        assert!(VersionBlock::parse(&mut cursor).is_err());
    }
}
