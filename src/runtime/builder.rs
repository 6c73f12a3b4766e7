//! Outgoing packet builder
//!
//! A builder owns one pool lease for the lifetime of one outgoing packet:
//! it writes the overlay and logical headers up front, hands the caller a
//! writable body window, and on [`PacketBuilder::finish`] routes the frame
//! to the mesh, the local dispatcher, or both. The lease is released
//! exactly once on every path, including a builder dropped mid-build.

use tracing::trace;

use crate::protocol::{
    LogicalAddress, LogicalHeader, OverlayType, PacketType, BROADCAST_PORT, LOGICAL_HEADER_SIZE,
};

use super::node::Node;
use super::pool::PoolLease;

/// In-flight outgoing packet.
///
/// Created by [`Node::packet`]. Destinations on the local node skip the
/// overlay entirely: the frame is built as bare logical bytes and injected
/// straight into the dispatcher on finish.
pub struct PacketBuilder<'a> {
    node: &'a Node,
    lease: Option<PoolLease>,
    dst: LogicalAddress,
    overlay_len: usize,
    loopback: bool,
}

impl<'a> PacketBuilder<'a> {
    pub(crate) fn new(
        node: &'a Node,
        dst: LogicalAddress,
        src_port: u16,
        kind: PacketType,
        overlay: OverlayType,
        body_len: usize,
    ) -> Self {
        let loopback = dst.node == node.self_addr();
        let overlay_len = if loopback { 0 } else { overlay.header_size() };
        let total = overlay_len + LOGICAL_HEADER_SIZE + body_len;

        let mut lease = node.pool_acquire(total);
        let frame = lease.as_mut_slice();
        if !loopback {
            overlay
                .encode_header(frame)
                .expect("lease sized for overlay header");
        }
        LogicalHeader::new(kind, src_port, dst.port)
            .encode(&mut frame[overlay_len..])
            .expect("lease sized for logical header");

        Self {
            node,
            lease: Some(lease),
            dst,
            overlay_len,
            loopback,
        }
    }

    /// Writable window over the packet body (after the logical header).
    pub fn body_mut(&mut self) -> &mut [u8] {
        let start = self.overlay_len + LOGICAL_HEADER_SIZE;
        &mut self
            .lease
            .as_mut()
            .expect("builder not finished")
            .as_mut_slice()[start..]
    }

    /// Send the packet and release its buffer.
    ///
    /// Self-addressed packets bypass the overlay and the mesh; broadcast
    /// packets go to the mesh and to every locally hosted device.
    pub fn finish(mut self) {
        let lease = self.lease.take().expect("builder finished once");
        let frame = lease.as_slice();

        if self.loopback {
            trace!(dst = %self.dst, "loopback dispatch");
            self.node.dispatch(frame, self.node.self_addr());
        } else {
            self.node.mesh_send(self.dst.node, frame);
            if self.dst.port == BROADCAST_PORT {
                self.node
                    .dispatch(&frame[self.overlay_len..], self.node.self_addr());
            }
        }

        self.node.pool_release(lease);
    }
}

impl Drop for PacketBuilder<'_> {
    fn drop(&mut self) {
        // Abandoned build (encode error upstream): nothing is sent, the
        // lease still goes back.
        if let Some(lease) = self.lease.take() {
            trace!(dst = %self.dst, "packet builder dropped without sending");
            self.node.pool_release(lease);
        }
    }
}
