//! Logical packet header
//!
//! Every logical packet starts with the same 5-byte header.

use super::{Error, PacketType, Result, LOGICAL_HEADER_SIZE};

/// Fixed logical packet header.
///
/// # Wire Format
///
/// ```text
///  0      1      2      3      4
/// +------+------+------+------+------+
/// | kind |  src_port   |  dst_port   |
/// +------+------+------+------+------+
/// ```
///
/// `src_port` and `dst_port` are big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogicalHeader {
    /// Packet opcode.
    pub kind: PacketType,
    /// Port of the sending device.
    pub src_port: u16,
    /// Port of the destination device, or [`super::BROADCAST_PORT`].
    pub dst_port: u16,
}

impl LogicalHeader {
    /// Create a new header.
    #[must_use]
    pub const fn new(kind: PacketType, src_port: u16, dst_port: u16) -> Self {
        Self {
            kind,
            src_port,
            dst_port,
        }
    }

    /// Encode into the first [`LOGICAL_HEADER_SIZE`] bytes of `out`.
    pub fn encode(&self, out: &mut [u8]) -> Result<()> {
        if out.len() < LOGICAL_HEADER_SIZE {
            return Err(Error::BufferTooSmall {
                needed: LOGICAL_HEADER_SIZE,
                got: out.len(),
            });
        }
        out[0] = self.kind.as_u8();
        out[1..3].copy_from_slice(&self.src_port.to_be_bytes());
        out[3..5].copy_from_slice(&self.dst_port.to_be_bytes());
        Ok(())
    }

    /// Decode from raw bytes.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < LOGICAL_HEADER_SIZE {
            return Err(Error::Truncated {
                needed: LOGICAL_HEADER_SIZE,
                got: buf.len(),
            });
        }
        let kind =
            PacketType::from_u8(buf[0]).ok_or(Error::UnknownPacketType { kind: buf[0] })?;
        Ok(Self {
            kind,
            src_port: u16::from_be_bytes([buf[1], buf[2]]),
            dst_port: u16::from_be_bytes([buf[3], buf[4]]),
        })
    }

    /// Destination port of a raw logical packet, without a full decode.
    ///
    /// Used by the dispatcher to route before the opcode is validated.
    pub fn peek_dst_port(buf: &[u8]) -> Result<u16> {
        if buf.len() < LOGICAL_HEADER_SIZE {
            return Err(Error::Truncated {
                needed: LOGICAL_HEADER_SIZE,
                got: buf.len(),
            });
        }
        Ok(u16::from_be_bytes([buf[3], buf[4]]))
    }
}
