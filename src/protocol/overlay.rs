//! Overlay framing
//!
//! A one-byte discriminator ahead of the logical packet selects reliable or
//! unreliable framing. The reliable variant carries a sequence number on the
//! wire but no retransmit machinery is attached to it yet; receivers accept
//! it and ignore the sequence.

use super::{Error, Result};

/// Encoded size of an unreliable overlay header.
pub const OVERLAY_UNRELIABLE_SIZE: usize = 1;

/// Encoded size of a reliable overlay header (`type` + `sequence_num`).
pub const OVERLAY_RELIABLE_SIZE: usize = 3;

/// Overlay framing selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OverlayType {
    /// Sequence-numbered framing (reserved; codec only)
    Reliable = 1,
    /// Bare datagram framing
    Unreliable = 2,
}

impl OverlayType {
    /// Convert from wire byte.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::Reliable),
            2 => Some(Self::Unreliable),
            _ => None,
        }
    }

    /// Convert to wire byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Encoded size of this overlay's header.
    #[must_use]
    pub const fn header_size(self) -> usize {
        match self {
            Self::Reliable => OVERLAY_RELIABLE_SIZE,
            Self::Unreliable => OVERLAY_UNRELIABLE_SIZE,
        }
    }

    /// Write the overlay header into the front of `out`.
    ///
    /// Reliable frames are emitted with sequence number 0; nothing assigns
    /// sequence numbers yet.
    pub fn encode_header(self, out: &mut [u8]) -> Result<()> {
        let needed = self.header_size();
        if out.len() < needed {
            return Err(Error::BufferTooSmall {
                needed,
                got: out.len(),
            });
        }
        out[0] = self.as_u8();
        if self == Self::Reliable {
            out[1..3].copy_from_slice(&0u16.to_be_bytes());
        }
        Ok(())
    }

    /// Split a received mesh frame into its overlay type and logical bytes.
    pub fn strip(frame: &[u8]) -> Result<(Self, &[u8])> {
        let Some(&first) = frame.first() else {
            return Err(Error::Truncated { needed: 1, got: 0 });
        };
        let overlay =
            Self::from_u8(first).ok_or(Error::UnknownOverlayType { kind: first })?;
        let hdr = overlay.header_size();
        if frame.len() < hdr {
            return Err(Error::Truncated {
                needed: hdr,
                got: frame.len(),
            });
        }
        Ok((overlay, &frame[hdr..]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreliable_header() {
        let mut buf = [0xEE; 4];
        OverlayType::Unreliable.encode_header(&mut buf).unwrap();
        assert_eq!(buf[0], 2);
        let (kind, rest) = OverlayType::strip(&[2, 0xAB, 0xCD]).unwrap();
        assert_eq!(kind, OverlayType::Unreliable);
        assert_eq!(rest, &[0xAB, 0xCD]);
    }

    #[test]
    fn reliable_header_carries_sequence() {
        let mut buf = [0xEE; 4];
        OverlayType::Reliable.encode_header(&mut buf).unwrap();
        assert_eq!(&buf[..3], &[1, 0, 0]);
        let (kind, rest) = OverlayType::strip(&[1, 0, 7, 0x42]).unwrap();
        assert_eq!(kind, OverlayType::Reliable);
        assert_eq!(rest, &[0x42]);
    }

    #[test]
    fn strip_rejects_unknown_and_short() {
        assert!(matches!(
            OverlayType::strip(&[0, 1, 2]),
            Err(Error::UnknownOverlayType { kind: 0 })
        ));
        assert!(matches!(
            OverlayType::strip(&[9]),
            Err(Error::UnknownOverlayType { kind: 9 })
        ));
        assert!(OverlayType::strip(&[]).is_err());
        // Reliable header cut before the sequence number.
        assert!(matches!(
            OverlayType::strip(&[1, 0]),
            Err(Error::Truncated { needed: 3, got: 2 })
        ));
    }
}
