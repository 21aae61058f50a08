//! NTLM Type 1 message - Negotiate
//!
//! The client's opening message: capability flags, and optionally its domain
//! and workstation names in the OEM character set.
//!
//! ```text
//! 0   signature "NTLMSSP\0"      8
//! 8   message type (1)           4
//! 12  negotiate flags            4
//! 16  domain descriptor          8
//! 24  workstation descriptor     8
//! 32  version (NEGOTIATE_VERSION only)   8
//! ..  domain bytes, workstation bytes
//! ```

use super::flags::{NtlmFlags, NtlmMessageType, NTLMSSP_SIGNATURE};
use super::layout::{NegotiateLayout, NEGOTIATE_HEADER_SIZE};
use super::payload::PayloadDescriptor;
use super::version::VersionBlock;
use super::NtlmMessage;
use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{self, Read, Write};
use tracing::{debug, trace};

/// Settings a client uses to build its negotiate message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiateConfig {
    /// Capability flags. The supplied and version flags are derived from the
    /// fields below and overwritten.
    pub flags: NtlmFlags,
    /// Domain name, sent only when non-empty
    pub domain: Option<String>,
    /// Workstation name, sent only when non-empty
    pub workstation: Option<String>,
    /// Version block, sent only when present
    pub version: Option<VersionBlock>,
}

impl Default for NegotiateConfig {
    fn default() -> Self {
        Self {
            flags: NtlmFlags::client_default(),
            domain: None,
            workstation: None,
            version: None,
        }
    }
}

impl NegotiateConfig {
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_workstation(mut self, workstation: impl Into<String>) -> Self {
        self.workstation = Some(workstation.into());
        self
    }

    pub fn with_version(mut self, version: VersionBlock) -> Self {
        self.version = Some(version);
        self
    }
}

/// NTLM Type 1 Message - Negotiate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NegotiateMessage {
    pub signature: [u8; 8],
    pub message_type: NtlmMessageType,
    pub flags: NtlmFlags,
    pub domain: PayloadDescriptor,
    pub workstation: PayloadDescriptor,
    pub version: Option<VersionBlock>,
}

impl NegotiateMessage {
    /// Negotiate message with the default client flags
    pub fn new(domain: &str, workstation: &str) -> Result<Self> {
        let config = NegotiateConfig::default()
            .with_domain(domain)
            .with_workstation(workstation);
        Self::from_config(&config)
    }

    /// Build a self-consistent message: supplied/version flags follow the
    /// fields, and descriptor offsets come from the layout.
    pub fn from_config(config: &NegotiateConfig) -> Result<Self> {
        let domain = oem_field("domain", config.domain.as_deref())?;
        let workstation = oem_field("workstation", config.workstation.as_deref())?;

        let mut flags = config.flags;
        flags.set(NtlmFlags::NEGOTIATE_OEM_DOMAIN_SUPPLIED, !domain.is_empty());
        flags.set(
            NtlmFlags::NEGOTIATE_OEM_WORKSTATION_SUPPLIED,
            !workstation.is_empty(),
        );
        flags.set(NtlmFlags::NEGOTIATE_VERSION, config.version.is_some());

        let layout = NegotiateLayout::for_flags(flags);
        let (domain_offset, workstation_offset) = layout.offsets(domain.length);

        Ok(Self {
            signature: NTLMSSP_SIGNATURE,
            message_type: NtlmMessageType::Negotiate,
            flags,
            domain: domain.with_offset(domain_offset),
            workstation: workstation.with_offset(workstation_offset),
            version: config.version,
        })
    }

    pub fn layout(&self) -> NegotiateLayout {
        NegotiateLayout::for_flags(self.flags)
    }

    /// Where the payload region starts: 32, or 40 with a version block
    pub fn payload_offset(&self) -> usize {
        self.layout().payload_offset()
    }

    /// Domain bytes followed by workstation bytes
    pub fn payload(&self) -> Vec<u8> {
        let mut payload =
            Vec::with_capacity(self.domain.payload.len() + self.workstation.payload.len());
        payload.extend_from_slice(&self.domain.payload);
        payload.extend_from_slice(&self.workstation.payload);
        payload
    }

    pub fn domain_name(&self) -> String {
        String::from_utf8_lossy(&self.domain.payload).into_owned()
    }

    pub fn workstation_name(&self) -> String {
        String::from_utf8_lossy(&self.workstation.payload).into_owned()
    }

    /// Reject anything that would not encode to a conformant message
    pub fn validate(&self) -> Result<()> {
        if self.signature != NTLMSSP_SIGNATURE {
            return Err(Error::InvalidSignature);
        }
        if self.message_type != NtlmMessageType::Negotiate {
            return Err(Error::UnexpectedMessageType(self.message_type as u32));
        }

        self.domain.validate("domain")?;
        self.workstation.validate("workstation")?;
        check_supplied(
            self.flags,
            NtlmFlags::NEGOTIATE_OEM_DOMAIN_SUPPLIED,
            &self.domain,
            "domain",
        )?;
        check_supplied(
            self.flags,
            NtlmFlags::NEGOTIATE_OEM_WORKSTATION_SUPPLIED,
            &self.workstation,
            "workstation",
        )?;

        match (self.flags.has_version(), self.version.is_some()) {
            (true, false) => Err(Error::VersionMismatch(
                "NEGOTIATE_VERSION is set but no version block is present".into(),
            )),
            (false, true) => Err(Error::VersionMismatch(
                "version block is present but NEGOTIATE_VERSION is not set".into(),
            )),
            _ => Ok(()),
        }
    }
}

impl NtlmMessage for NegotiateMessage {
    fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < NEGOTIATE_HEADER_SIZE {
            return Err(Error::TruncatedMessage {
                need: NEGOTIATE_HEADER_SIZE,
                have: data.len(),
            });
        }

        let mut cursor = io::Cursor::new(data);

        // Check signature
        let mut signature = [0u8; 8];
        cursor.read_exact(&mut signature)?;
        if signature != NTLMSSP_SIGNATURE {
            return Err(Error::InvalidSignature);
        }

        // Message type
        let raw_type = cursor.read_u32::<LittleEndian>()?;
        if raw_type != NtlmMessageType::Negotiate as u32 {
            return Err(Error::UnexpectedMessageType(raw_type));
        }

        // Unknown bits are kept as-is
        let flags = NtlmFlags::from_bits_retain(cursor.read_u32::<LittleEndian>()?);

        let mut domain = PayloadDescriptor::parse(&mut cursor)?;
        let mut workstation = PayloadDescriptor::parse(&mut cursor)?;

        let layout = NegotiateLayout::for_flags(flags);
        let payload_offset = layout.payload_offset();
        if data.len() < payload_offset {
            return Err(Error::TruncatedMessage {
                need: payload_offset,
                have: data.len(),
            });
        }

        let version = if layout.has_version() {
            Some(VersionBlock::parse(&mut cursor)?)
        } else {
            None
        };

        check_supplied(
            flags,
            NtlmFlags::NEGOTIATE_OEM_DOMAIN_SUPPLIED,
            &domain,
            "domain",
        )?;
        check_supplied(
            flags,
            NtlmFlags::NEGOTIATE_OEM_WORKSTATION_SUPPLIED,
            &workstation,
            "workstation",
        )?;

        let domain_bytes = locate(&domain, data, payload_offset, "domain")?;
        let workstation_bytes = locate(&workstation, data, payload_offset, "workstation")?;

        if !domain.is_empty() && !workstation.is_empty() {
            let (d, w) = (domain.range(), workstation.range());
            if d.start < w.end && w.start < d.end {
                return Err(Error::OverlappingPayload(format!(
                    "domain {:?} overlaps workstation {:?}",
                    d, w
                )));
            }
        }

        domain.payload = domain_bytes.to_vec();
        workstation.payload = workstation_bytes.to_vec();

        debug!(
            "Parsed NTLM negotiate message: flags=0x{:08X}, domain={} bytes, workstation={} bytes",
            flags.bits(),
            domain.length,
            workstation.length
        );

        Ok(Self {
            signature,
            message_type: NtlmMessageType::Negotiate,
            flags,
            domain,
            workstation,
            version,
        })
    }

    fn serialize(&self) -> Result<Vec<u8>> {
        self.validate()?;

        let layout = self.layout();
        let (domain_offset, workstation_offset) = layout.offsets(self.domain.length);
        let mut buf = Vec::with_capacity(self.size());

        // Fixed part
        buf.write_all(&self.signature)?;
        buf.write_u32::<LittleEndian>(self.message_type as u32)?;
        buf.write_u32::<LittleEndian>(self.flags.bits())?;

        // Offsets come from the layout, never from the descriptors
        self.domain.serialize_at(domain_offset, &mut buf)?;
        self.workstation.serialize_at(workstation_offset, &mut buf)?;

        if let Some(version) = &self.version {
            version.serialize(&mut buf)?;
        }
        debug_assert_eq!(buf.len(), layout.payload_offset());

        // Payload, in descriptor order
        buf.write_all(&self.domain.payload)?;
        buf.write_all(&self.workstation.payload)?;

        trace!(
            "Serialized NTLM negotiate message: {} bytes, payload at {}",
            buf.len(),
            layout.payload_offset()
        );

        Ok(buf)
    }

    fn size(&self) -> usize {
        self.payload_offset() + self.domain.payload.len() + self.workstation.payload.len()
    }
}

/// OEM-charset descriptor for an optional name
fn oem_field(field: &str, name: Option<&str>) -> Result<PayloadDescriptor> {
    match name {
        Some(name) if !name.is_empty() => {
            if !name.is_ascii() {
                return Err(Error::MalformedDescriptor(format!(
                    "{} name {:?} is not representable in the OEM character set",
                    field, name
                )));
            }
            PayloadDescriptor::new(name.as_bytes().to_vec())
        }
        _ => Ok(PayloadDescriptor::empty()),
    }
}

/// A field whose supplied flag is clear must be empty
fn check_supplied(
    flags: NtlmFlags,
    supplied: NtlmFlags,
    descriptor: &PayloadDescriptor,
    field: &str,
) -> Result<()> {
    if !flags.contains(supplied) && (descriptor.length != 0 || descriptor.max_length != 0) {
        return Err(Error::MalformedDescriptor(format!(
            "{} has length {} but its supplied flag is not set",
            field, descriptor.length
        )));
    }
    Ok(())
}

/// Bounds-checked payload slice. Empty descriptors are never dereferenced.
fn locate<'a>(
    descriptor: &PayloadDescriptor,
    data: &'a [u8],
    payload_offset: usize,
    field: &str,
) -> Result<&'a [u8]> {
    if descriptor.max_length < descriptor.length {
        return Err(Error::MalformedDescriptor(format!(
            "{} max length {} is below length {}",
            field, descriptor.max_length, descriptor.length
        )));
    }
    if descriptor.is_empty() {
        return Ok(&[]);
    }
    if (descriptor.offset as usize) < payload_offset {
        return Err(Error::OverlappingPayload(format!(
            "{} offset {} points into the header, payload starts at {}",
            field, descriptor.offset, payload_offset
        )));
    }
    descriptor.extract_data(data)
}
