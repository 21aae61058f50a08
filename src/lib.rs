//! NTLM Negotiate (Type 1) message codec
//!
//! A safe, sans-io encoder and decoder for the first message of the NTLM
//! handshake.

#![allow(missing_docs)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod error;

pub use auth::{
    NegotiateConfig, NegotiateMessage, NtlmFlags, NtlmMessage, NtlmMessageType,
    PayloadDescriptor, VersionBlock,
};
pub use error::{Error, Result};
