//! Per-node dispatcher
//!
//! A [`Node`] hosts a set of logical devices keyed by port, feeds them
//! incoming packets with per-opcode size validation, and drives their
//! subscription engines from the host's main loop. It is strictly
//! single-threaded and cooperative: every packet and timer event runs to
//! completion before the next one is processed, so the port map, the pool
//! bitmap, and the subscriber tables need no locking.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use bytes::Bytes;
use tracing::{debug, trace, warn};

use crate::protocol::{
    ActionExecuteResult, ActionRecord, AttribRecord, ExecuteFlags, FieldDictionary, HelloWorld,
    LogicalAddress, LogicalHeader, OverlayType, PacketType, SubscriptionStart, Writer,
    BROADCAST_PORT, LOGICAL_HEADER_SIZE,
};

use super::builder::PacketBuilder;
use super::clock::Clock;
use super::device::Device;
use super::mesh::{MeshTransport, BROADCAST_NODE};
use super::pool::{PacketPool, PoolConfig, PoolLease};
use super::subscriptions::TimerEvent;

/// A mesh node hosting logical devices.
pub struct Node {
    self_addr: u32,
    devices: RefCell<HashMap<u16, Rc<RefCell<dyn Device>>>>,
    pool: RefCell<PacketPool>,
    mesh: RefCell<Box<dyn MeshTransport>>,
    clock: Box<dyn Clock>,
}

impl Node {
    /// Create a node with the given physical address, transport, and clock.
    #[must_use]
    pub fn new(
        self_addr: u32,
        mesh: Box<dyn MeshTransport>,
        clock: Box<dyn Clock>,
        pool_config: &PoolConfig,
    ) -> Self {
        Self {
            self_addr,
            devices: RefCell::new(HashMap::new()),
            pool: RefCell::new(PacketPool::new(pool_config)),
            mesh: RefCell::new(mesh),
            clock,
        }
    }

    /// This node's physical mesh address.
    #[must_use]
    pub fn self_addr(&self) -> u32 {
        self.self_addr
    }

    /// Current monotonic time in microseconds.
    #[must_use]
    pub fn now_us(&self) -> u64 {
        self.clock.now_us()
    }

    /// Number of pool slots currently leased.
    #[must_use]
    pub fn pool_used(&self) -> usize {
        self.pool.borrow().used()
    }

    pub(crate) fn pool_acquire(&self, len: usize) -> PoolLease {
        self.pool.borrow_mut().acquire(len)
    }

    pub(crate) fn pool_release(&self, lease: PoolLease) {
        self.pool.borrow_mut().release(lease);
    }

    pub(crate) fn mesh_send(&self, dst: u32, frame: &[u8]) {
        trace!(dst, len = frame.len(), "mesh send");
        self.mesh.borrow_mut().send(dst, frame);
    }

    /// Bind a device to its port and broadcast its HELLO to the mesh.
    ///
    /// A port holds at most one device; rebinding an occupied port replaces
    /// the previous device.
    pub fn add_device(&self, device: Rc<RefCell<dyn Device>>) {
        let port = device.borrow().port();
        debug!(port, "registering device");
        if self
            .devices
            .borrow_mut()
            .insert(port, Rc::clone(&device))
            .is_some()
        {
            warn!(port, "port rebound to a new device");
        }

        // Build the announcement before sending: the broadcast loops back
        // into the dispatcher, which must be able to borrow this device.
        let (src_port, hello) = {
            let dev = device.borrow();
            (dev.port(), Self::hello_body(&*dev))
        };
        self.send_hello_body(
            src_port,
            &hello,
            PacketType::HelloWorld,
            LogicalAddress::new(BROADCAST_NODE, BROADCAST_PORT),
        );
    }

    /// Unbind the device on `port`.
    pub fn remove_device(&self, port: u16) {
        if self.devices.borrow_mut().remove(&port).is_some() {
            debug!(port, "device removed");
        }
    }

    /// Device currently bound to `port`.
    #[must_use]
    pub fn lookup(&self, port: u16) -> Option<Rc<RefCell<dyn Device>>> {
        self.devices.borrow().get(&port).cloned()
    }

    /// Number of devices currently hosted.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.borrow().len()
    }

    /// Entry point for frames delivered by the mesh transport.
    ///
    /// Strips the overlay header and dispatches the logical packet. The
    /// reliable overlay's sequence number is accepted and ignored.
    pub fn on_mesh_receive(&self, src_phy: u32, frame: &[u8]) {
        match OverlayType::strip(frame) {
            Ok((overlay, logical)) => {
                trace!(src_phy, ?overlay, len = logical.len(), "mesh frame");
                self.dispatch(logical, src_phy);
            }
            Err(err) => trace!(src_phy, %err, "dropping mesh frame"),
        }
    }

    /// Dispatch a logical packet to the device(s) it addresses.
    ///
    /// Malformed packets are dropped silently; nothing here returns an
    /// error to the caller.
    pub fn dispatch(&self, packet: &[u8], src_phy: u32) {
        let Ok(dst_port) = LogicalHeader::peek_dst_port(packet) else {
            trace!(len = packet.len(), "dropping truncated logical packet");
            return;
        };

        if dst_port == BROADCAST_PORT {
            // Snapshot before any handler runs: a handler adding or
            // removing devices must not alter this delivery round.
            let snapshot: Vec<Rc<RefCell<dyn Device>>> =
                self.devices.borrow().values().cloned().collect();
            for device in snapshot {
                self.handle(&device, packet, src_phy);
            }
        } else {
            let device = self.devices.borrow().get(&dst_port).cloned();
            match device {
                Some(device) => self.handle(&device, packet, src_phy),
                None => trace!(dst_port, "no device bound to port"),
            }
        }
    }

    /// Drive every hosted device's subscription engine once.
    ///
    /// Call this from the main loop at roughly the finest period
    /// granularity any device uses.
    pub fn tick(&self) {
        let now_us = self.clock.now_us();
        let snapshot: Vec<Rc<RefCell<dyn Device>>> =
            self.devices.borrow().values().cloned().collect();
        for device in snapshot {
            let Ok(mut dev) = device.try_borrow_mut() else {
                continue;
            };
            let dev = &mut *dev;
            for event in dev.subscriptions_mut().poll(now_us) {
                match event {
                    TimerEvent::SelfUpdate => dev.on_timer_update(self),
                    TimerEvent::Subscription {
                        addr,
                        subscription_id,
                        action_id,
                    } => dev.on_subscription_timer_update(self, addr, subscription_id, action_id),
                }
            }
        }
    }

    /// Start building an outgoing packet.
    ///
    /// `body_len` is the full encoded length of the opcode body. The
    /// returned builder must be finished (or dropped) before the next
    /// packet is built from the same call stack.
    #[must_use]
    pub fn packet(
        &self,
        dst: LogicalAddress,
        src_port: u16,
        kind: PacketType,
        overlay: OverlayType,
        body_len: usize,
    ) -> PacketBuilder<'_> {
        PacketBuilder::new(self, dst, src_port, kind, overlay, body_len)
    }

    /// Announce a device to `dst` with a HELLO or HELLO response.
    pub fn send_hello(&self, device: &dyn Device, kind: PacketType, dst: LogicalAddress) {
        let hello = Self::hello_body(device);
        self.send_hello_body(device.port(), &hello, kind, dst);
    }

    fn hello_body(device: &dyn Device) -> HelloWorld {
        HelloWorld {
            device_class: device.device_class().as_u32(),
            name: Bytes::copy_from_slice(device.name().as_bytes()),
            attribs: device
                .attribs()
                .iter()
                .map(|attrib| AttribRecord {
                    key: Bytes::copy_from_slice(attrib.key.as_bytes()),
                    value: Bytes::copy_from_slice(attrib.value.as_bytes()),
                })
                .collect(),
            actions: device
                .api_actions()
                .iter()
                .map(|action| ActionRecord {
                    kind: action.kind.as_u8(),
                    name: Bytes::copy_from_slice(action.name.as_bytes()),
                })
                .collect(),
        }
    }

    fn send_hello_body(
        &self,
        src_port: u16,
        hello: &HelloWorld,
        kind: PacketType,
        dst: LogicalAddress,
    ) {
        let mut builder = self.packet(
            dst,
            src_port,
            kind,
            OverlayType::Unreliable,
            hello.encoded_len(),
        );
        let mut w = Writer::new(builder.body_mut());
        match hello.encode_into(&mut w) {
            Ok(()) => builder.finish(),
            Err(err) => warn!(%err, src_port, "hello encode failed"),
        }
    }

    /// Send a device's api field dictionary to `dst`.
    pub fn send_field_dictionary(&self, device: &dyn Device, dst: LogicalAddress) {
        let dict = FieldDictionary {
            fields: device
                .api_fields()
                .iter()
                .map(|field| Bytes::copy_from_slice(field.name.as_bytes()))
                .collect(),
        };
        let mut builder = self.packet(
            dst,
            device.port(),
            PacketType::FieldDictionaryResponse,
            OverlayType::Unreliable,
            dict.encoded_len(),
        );
        let mut w = Writer::new(builder.body_mut());
        match dict.encode_into(&mut w) {
            Ok(()) => builder.finish(),
            Err(err) => warn!(%err, port = device.port(), "field dictionary encode failed"),
        }
    }

    /// Typed per-device packet handling. `packet` is at least a full
    /// logical header; the body prefix is validated per opcode before any
    /// body field is read.
    fn handle(&self, device: &Rc<RefCell<dyn Device>>, packet: &[u8], src_phy: u32) {
        let Ok(mut dev) = device.try_borrow_mut() else {
            trace!(src_phy, "device busy, dropping re-entrant packet");
            return;
        };
        let dev = &mut *dev;

        if !dev.on_general_packet_accept(self, packet, src_phy) {
            return;
        }

        let Some(kind) = PacketType::from_u8(packet[0]) else {
            trace!(opcode = packet[0], "unknown opcode");
            return;
        };
        let src_port = u16::from_be_bytes([packet[1], packet[2]]);
        let src = LogicalAddress::new(src_phy, src_port);
        let body = &packet[LOGICAL_HEADER_SIZE..];
        if body.len() < kind.body_prefix_size() {
            trace!(%kind, len = body.len(), "short body, dropping");
            return;
        }

        match kind {
            PacketType::HelloWorld => {
                if src_port == dev.port() && src_phy == self.self_addr {
                    // Own broadcast coming back around.
                    trace!(port = src_port, "suppressing self hello echo");
                    return;
                }
                match HelloWorld::decode(body) {
                    Ok(hello) => {
                        self.send_hello(&*dev, PacketType::HelloWorldResponse, src);
                        dev.on_device_discover(self, &hello, src);
                    }
                    Err(err) => trace!(%err, "bad hello body"),
                }
            }
            PacketType::HelloWorldResponse => match HelloWorld::decode(body) {
                Ok(hello) => dev.on_device_discover(self, &hello, src),
                Err(err) => trace!(%err, "bad hello body"),
            },
            PacketType::FieldDictionaryRequest => {
                self.send_field_dictionary(&*dev, src);
            }
            PacketType::FieldDictionaryResponse => match FieldDictionary::decode(body) {
                Ok(dict) => dev.on_device_field_dictionary(self, &dict.fields, src_phy),
                Err(err) => trace!(%err, "bad field dictionary body"),
            },
            PacketType::ActionExecute => {
                let action_id = u16::from_be_bytes([body[0], body[1]]);
                let request_id = body[2];
                let flags = ExecuteFlags::from_u8(body[3]);
                let status = dev.on_action_set(self, action_id, &body[4..], src);
                if flags.requires_status() {
                    let result = ActionExecuteResult {
                        action_id,
                        request_id,
                        status,
                    };
                    let mut builder = self.packet(
                        src,
                        dev.port(),
                        PacketType::ActionExecuteResult,
                        OverlayType::Unreliable,
                        result.encoded_len(),
                    );
                    let mut w = Writer::new(builder.body_mut());
                    if result.encode_into(&mut w).is_ok() {
                        builder.finish();
                    }
                }
            }
            PacketType::ActionFetch => {
                let action_id = u16::from_be_bytes([body[0], body[1]]);
                let request_id = body[2];
                dev.on_action_get(self, action_id, &body[3..], src, request_id);
            }
            PacketType::ActionResponse => {
                let action_id = u16::from_be_bytes([body[1], body[2]]);
                let request_id = body[3];
                dev.on_action_get_response(self, action_id, &body[4..], src, request_id);
            }
            PacketType::SubscriptionStart => match SubscriptionStart::decode(body) {
                Ok(sub_start) => {
                    let now_us = self.clock.now_us();
                    dev.subscriptions_mut().add_subscriber(&sub_start, src, now_us);
                }
                Err(err) => trace!(%err, "bad subscription start body"),
            },
            PacketType::SubscriptionCallback => {
                let id = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
                dev.on_subscription_data(self, &body[4..], src, id);
            }
            PacketType::SubscriptionStop => {
                let id = u32::from_be_bytes([body[0], body[1], body[2], body[3]]);
                dev.subscriptions_mut().stop_subscription(id, src);
            }
            // Execute results have no dedicated hook; devices that care
            // observe them through on_general_packet_accept.
            PacketType::ActionExecuteResult => {}
            // Reserved opcodes: accepted, never handled.
            PacketType::SubscriptionDone
            | PacketType::GroupsListRequest
            | PacketType::GroupsListResponse
            | PacketType::GroupsAdd
            | PacketType::GroupsEdit
            | PacketType::GroupsRemove
            | PacketType::GroupsFindUsersRequest
            | PacketType::GroupsFindUsersResponse => {}
        }
    }
}
