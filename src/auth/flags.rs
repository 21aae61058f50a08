//! NTLM message types and negotiate flags

use crate::error::Error;
use bitflags::bitflags;

/// NTLM signature - "NTLMSSP\0"
pub const NTLMSSP_SIGNATURE: [u8; 8] = *b"NTLMSSP\0";

/// NTLM message types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum NtlmMessageType {
    /// Type 1: Negotiate message (client -> server)
    Negotiate = 0x00000001,
    /// Type 2: Challenge message (server -> client)
    Challenge = 0x00000002,
    /// Type 3: Authenticate message (client -> server)
    Authenticate = 0x00000003,
}

impl TryFrom<u32> for NtlmMessageType {
    type Error = Error;

    fn try_from(value: u32) -> std::result::Result<Self, Self::Error> {
        match value {
            0x00000001 => Ok(Self::Negotiate),
            0x00000002 => Ok(Self::Challenge),
            0x00000003 => Ok(Self::Authenticate),
            _ => Err(Error::UnexpectedMessageType(value)),
        }
    }
}

bitflags! {
    /// NTLM negotiation flags (MS-NLMP 2.2.2.5)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct NtlmFlags: u32 {
        /// Negotiate Unicode encoding
        const NEGOTIATE_UNICODE = 0x00000001;
        /// Negotiate OEM encoding
        const NEGOTIATE_OEM = 0x00000002;
        /// Request target name from server
        const REQUEST_TARGET = 0x00000004;
        /// Sign messages
        const NEGOTIATE_SIGN = 0x00000010;
        /// Seal (encrypt) messages
        const NEGOTIATE_SEAL = 0x00000020;
        /// Use datagram style authentication
        const NEGOTIATE_DATAGRAM = 0x00000040;
        /// Use LAN Manager session key
        const NEGOTIATE_LM_KEY = 0x00000080;
        /// Use NTLM v1
        const NEGOTIATE_NTLM = 0x00000200;
        /// Anonymous connection
        const NEGOTIATE_ANONYMOUS = 0x00000800;
        /// Domain name is present in the negotiate payload
        const NEGOTIATE_OEM_DOMAIN_SUPPLIED = 0x00001000;
        /// Workstation name is present in the negotiate payload
        const NEGOTIATE_OEM_WORKSTATION_SUPPLIED = 0x00002000;
        /// Always sign messages
        const NEGOTIATE_ALWAYS_SIGN = 0x00008000;
        /// Target type is domain
        const TARGET_TYPE_DOMAIN = 0x00010000;
        /// Target type is server
        const TARGET_TYPE_SERVER = 0x00020000;
        /// NTLMv2 session security
        const NEGOTIATE_EXTENDED_SESSIONSECURITY = 0x00080000;
        /// Identify level security
        const NEGOTIATE_IDENTIFY = 0x00100000;
        /// Request non-NT session key
        const REQUEST_NON_NT_SESSION_KEY = 0x00400000;
        /// Target info present
        const NEGOTIATE_TARGET_INFO = 0x00800000;
        /// Version block present
        const NEGOTIATE_VERSION = 0x02000000;
        /// 128-bit encryption
        const NEGOTIATE_128 = 0x20000000;
        /// Explicit key exchange
        const NEGOTIATE_KEY_EXCH = 0x40000000;
        /// 56-bit encryption
        const NEGOTIATE_56 = 0x80000000;
    }
}

impl NtlmFlags {
    /// Flags a client sends when nothing else is configured
    pub fn client_default() -> Self {
        NtlmFlags::NEGOTIATE_UNICODE
            | NtlmFlags::NEGOTIATE_OEM
            | NtlmFlags::REQUEST_TARGET
            | NtlmFlags::NEGOTIATE_NTLM
            | NtlmFlags::NEGOTIATE_ALWAYS_SIGN
            | NtlmFlags::NEGOTIATE_EXTENDED_SESSIONSECURITY
            | NtlmFlags::NEGOTIATE_128
            | NtlmFlags::NEGOTIATE_56
    }

    /// Whether a version block follows the descriptor table
    pub fn has_version(self) -> bool {
        self.contains(NtlmFlags::NEGOTIATE_VERSION)
    }
}
