//! Payload descriptors: the length/max-length/offset triple that locates a
//! variable-length field inside an NTLM message

use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io;
use std::ops::Range;

/// Payload descriptor for NTLM messages, together with the bytes it references
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayloadDescriptor {
    /// Length of the referenced bytes
    pub length: u16,
    /// Allocated length, conventionally equal to `length`
    pub max_length: u16,
    /// Offset from the beginning of the NTLM message
    pub offset: u32,
    /// The referenced bytes
    pub payload: Vec<u8>,
}

impl PayloadDescriptor {
    /// Encoded size of the descriptor header
    pub const SIZE: usize = 8;

    /// Descriptor for an absent field
    pub fn empty() -> Self {
        Self::default()
    }

    /// Describe `payload`. The offset stays 0 until a layout assigns it.
    pub fn new(payload: Vec<u8>) -> Result<Self> {
        let length = u16::try_from(payload.len()).map_err(|_| {
            Error::MalformedDescriptor(format!(
                "payload of {} bytes exceeds the 16-bit length field",
                payload.len()
            ))
        })?;

        Ok(Self {
            length,
            max_length: length,
            offset: 0,
            payload,
        })
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Render the 8-byte descriptor header
    pub fn bytes(&self) -> [u8; Self::SIZE] {
        let mut out = [0u8; Self::SIZE];
        LittleEndian::write_u16(&mut out[0..2], self.length);
        LittleEndian::write_u16(&mut out[2..4], self.max_length);
        LittleEndian::write_u32(&mut out[4..8], self.offset);
        out
    }

    /// Read a descriptor header. The payload is left empty; see `extract_data`.
    pub fn parse(cursor: &mut io::Cursor<&[u8]>) -> Result<Self> {
        let length = cursor.read_u16::<LittleEndian>()?;
        let max_length = cursor.read_u16::<LittleEndian>()?;
        let offset = cursor.read_u32::<LittleEndian>()?;

        Ok(Self {
            length,
            max_length,
            offset,
            payload: Vec::new(),
        })
    }

    pub fn serialize(&self, buf: &mut Vec<u8>) -> Result<()> {
        self.serialize_at(self.offset, buf)
    }

    /// Write the descriptor header pointing at `offset` instead of `self.offset`
    pub fn serialize_at(&self, offset: u32, buf: &mut Vec<u8>) -> Result<()> {
        buf.write_u16::<LittleEndian>(self.length)?;
        buf.write_u16::<LittleEndian>(self.max_length)?;
        buf.write_u32::<LittleEndian>(offset)?;
        Ok(())
    }

    /// Byte range this descriptor covers within the message
    pub fn range(&self) -> Range<usize> {
        let start = self.offset as usize;
        start..start + self.length as usize
    }

    /// Slice the referenced bytes out of `message`
    pub fn extract_data<'a>(&self, message: &'a [u8]) -> Result<&'a [u8]> {
        let range = self.range();
        if range.end > message.len() {
            return Err(Error::TruncatedMessage {
                need: range.end,
                have: message.len(),
            });
        }

        Ok(&message[range])
    }

    /// Check that the header agrees with the bytes it carries
    pub fn validate(&self, field: &str) -> Result<()> {
        if self.length as usize != self.payload.len() {
            return Err(Error::MalformedDescriptor(format!(
                "{} length {} does not match {} payload bytes",
                field,
                self.length,
                self.payload.len()
            )));
        }
        if self.max_length < self.length {
            return Err(Error::MalformedDescriptor(format!(
                "{} max length {} is below length {}",
                field, self.max_length, self.length
            )));
        }
        Ok(())
    }
}
