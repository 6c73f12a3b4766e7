//! LDP wire format: opcodes, headers, and per-opcode body codecs.
//!
//! Everything in this module is pure data transformation; nothing here
//! touches the mesh or the device runtime. All multi-byte fields are
//! big-endian on the wire.

mod address;
mod bodies;
mod codec;
mod error;
mod header;
mod overlay;
mod types;

pub use address::LogicalAddress;
pub use bodies::{
    ActionExecute, ActionExecuteResult, ActionFetch, ActionRecord, ActionResponse, AttribRecord,
    FieldDictionary, HelloWorld, SubscriptionCallback, SubscriptionDone, SubscriptionStart,
    SubscriptionStop,
};
pub use codec::{Reader, Writer};
pub use error::{Error, Result};
pub use header::LogicalHeader;
pub use overlay::{OverlayType, OVERLAY_RELIABLE_SIZE, OVERLAY_UNRELIABLE_SIZE};
pub use types::{ActionExecuteStatus, ActionType, DeviceClass, ExecuteFlags, PacketType};

/// Logical port addressing every device hosted on the destination node.
pub const BROADCAST_PORT: u16 = 0xFFFF;

/// Size of the fixed logical packet header (`kind, src_port, dst_port`).
pub const LOGICAL_HEADER_SIZE: usize = 5;

/// Longest byte string permitted in a length-prefixed wire field.
pub const MAX_FIELD_LEN: usize = 255;
