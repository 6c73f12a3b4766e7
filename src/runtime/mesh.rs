//! Mesh transport boundary
//!
//! The mesh itself (routing, retransmission, fragmentation) lives outside
//! this crate. The runtime only needs a fire-and-forget frame sender; the
//! receive direction is the embedding calling
//! [`super::Node::on_mesh_receive`] with whatever the transport delivers.

/// Physical address that every mesh node receives on.
pub const BROADCAST_NODE: u32 = 0xFFFF_FFFF;

/// Outgoing half of the mesh transport.
///
/// `send` must not synchronously re-enter the node (for example by
/// delivering a broadcast frame back into `on_mesh_receive` from inside the
/// call); the node's own loopback already covers local delivery.
pub trait MeshTransport {
    /// Hand a fully framed overlay packet to the mesh, fire-and-forget.
    ///
    /// `dst` is a unicast node id or [`BROADCAST_NODE`].
    fn send(&mut self, dst: u32, frame: &[u8]);
}
