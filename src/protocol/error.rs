//! LDP codec error types

use thiserror::Error;

/// Errors produced while encoding or decoding LDP packets.
///
/// The dispatcher never surfaces these to callers; a failed decode
/// terminates processing of that single packet.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Input ended before the expected structure was complete.
    #[error("truncated packet: need {needed} bytes, got {got}")]
    Truncated {
        /// Bytes required to finish the read.
        needed: usize,
        /// Bytes actually available.
        got: usize,
    },

    /// Output window is too small for the encoded body.
    #[error("encode buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Bytes required by the encoder.
        needed: usize,
        /// Bytes available in the window.
        got: usize,
    },

    /// Logical opcode byte does not map to a known packet type.
    #[error("unknown packet type: {kind:#04x}")]
    UnknownPacketType {
        /// Raw opcode byte.
        kind: u8,
    },

    /// Overlay discriminator byte is reserved or unassigned.
    #[error("unknown overlay type: {kind:#04x}")]
    UnknownOverlayType {
        /// Raw overlay byte.
        kind: u8,
    },

    /// A length-prefixed byte string exceeds its 255-byte wire limit.
    #[error("field too long: {len} bytes (max {max})")]
    FieldTooLong {
        /// Length of the offending field.
        len: usize,
        /// Maximum length the prefix can express.
        max: usize,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
