//! LDP (Logical Device Protocol) - lightweight application-layer protocol and
//! dispatch runtime for smart-home device meshes.
//!
//! A *logical device* is a small addressable unit (a button, a relay, a
//! sensor, a controller). Many logical devices can be co-hosted on a single
//! physical node of a mesh network; each owns a 16-bit port. This crate
//! provides the bit-exact packet grammar for the logical protocol and its
//! thin reliable/unreliable overlay, plus the per-node runtime that
//! demultiplexes incoming packets to hosted devices, drives discovery and
//! introspection, and manages subscriptions with expiry and periodic
//! callbacks.
//!
//! # Features
//!
//! - **Bit-exact wire grammar** - hand-written big-endian codec, no layout
//!   tricks, cursor-based walkers for variable-length bodies
//! - **Port dispatch** - broadcast and unicast demultiplexing with
//!   per-opcode size validation; malformed packets are dropped, never crash
//! - **Subscriptions** - per-device subscriber table with absolute-deadline
//!   expiry and periodic callback fan-out
//! - **Pooled packet building** - fixed slab pool with transparent heap
//!   fallback and synchronous loopback for self-addressed packets
//!
//! # Overview
//!
//! The [`runtime::Node`] is the center of the crate. It owns the port map of
//! hosted devices, the outgoing packet pool, and the handle to the mesh
//! transport. Mesh frames enter through [`runtime::Node::on_mesh_receive`],
//! which strips the overlay header and dispatches the logical packet; a
//! periodic [`runtime::Node::tick`] drives every device's subscription
//! engine. Devices implement the [`runtime::Device`] trait and receive typed
//! event hooks; replies and callbacks are built through the node's pooled
//! [`runtime::PacketBuilder`], which transparently loops self-addressed
//! packets back into the local dispatcher.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

pub mod protocol;
pub mod runtime;

pub use protocol::{
    Error, LogicalAddress, OverlayType, PacketType, Result, BROADCAST_PORT, LOGICAL_HEADER_SIZE,
};
pub use runtime::{Device, MeshTransport, Node};

/// LDP protocol version
pub const VERSION: &str = "1.0.0-draft";
