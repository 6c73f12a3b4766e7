//! Device contract
//!
//! Every logical device hosted on a node implements [`Device`]: a fixed
//! identity (port, name, class), introspection tables (attributes, api
//! fields, api actions), an embedded [`SubscriptionManager`], and event
//! hooks invoked by the dispatcher. All hooks default to no-ops, so a
//! minimal device only supplies its identity and subscription state.

use bytes::Bytes;

use crate::protocol::{
    ActionExecuteStatus, ActionType, DeviceClass, HelloWorld, LogicalAddress,
};

use super::node::Node;
use super::subscriptions::SubscriptionManager;

/// One static key/value attribute a device publishes in its HELLO.
///
/// Attributes extend the device class or carry deployment metadata, e.g.
/// `location = "desk lamp"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceAttrib {
    /// Attribute key.
    pub key: String,
    /// Attribute value.
    pub value: String,
}

impl DeviceAttrib {
    /// Create an attribute.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// One named string in the device's api field dictionary.
///
/// The index in the declared list is the field id on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiField {
    /// Field name.
    pub name: String,
}

impl ApiField {
    /// Create a field.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// One named, typed action a device exposes.
///
/// The index in the declared list is the action id on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiAction {
    /// Action name.
    pub name: String,
    /// Declared action type.
    pub kind: ActionType,
}

impl ApiAction {
    /// Create an action.
    pub fn new(name: impl Into<String>, kind: ActionType) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// The capability set of a hosted logical device.
///
/// The dispatcher talks to devices exclusively through this trait. Hooks
/// receive the owning [`Node`] so they can build replies and callbacks; a
/// hook runs to completion before the next packet or timer event is
/// processed.
#[allow(unused_variables)]
pub trait Device {
    /// Logical port this device answers on.
    fn port(&self) -> u16;

    /// Human-readable device name, published in HELLO packets.
    fn name(&self) -> &str;

    /// Device class tag.
    fn device_class(&self) -> DeviceClass;

    /// Published attributes. Must be stable for the device's lifetime.
    fn attribs(&self) -> &[DeviceAttrib] {
        &[]
    }

    /// Api field dictionary. Must be stable for the device's lifetime.
    fn api_fields(&self) -> &[ApiField] {
        &[]
    }

    /// Declared actions. Must be stable for the device's lifetime.
    fn api_actions(&self) -> &[ApiAction] {
        &[]
    }

    /// The device's subscription engine.
    fn subscriptions(&self) -> &SubscriptionManager;

    /// The device's subscription engine, mutable.
    fn subscriptions_mut(&mut self) -> &mut SubscriptionManager;

    /// First look at every logical packet addressed to this device.
    ///
    /// `packet` is the raw logical packet including its header. Return
    /// `false` to discard the packet before any typed handling.
    fn on_general_packet_accept(&mut self, node: &Node, packet: &[u8], src_phy: u32) -> bool {
        true
    }

    /// Another device announced itself (HELLO or HELLO response).
    fn on_device_discover(&mut self, node: &Node, hello: &HelloWorld, src: LogicalAddress) {}

    /// A queried device returned its api field dictionary.
    fn on_device_field_dictionary(&mut self, node: &Node, fields: &[Bytes], src_phy: u32) {}

    /// A subscription this device holds on a remote device fired.
    fn on_subscription_data(
        &mut self,
        node: &Node,
        payload: &[u8],
        src: LogicalAddress,
        subscription_id: u32,
    ) {
    }

    /// A remote subscriber's periodic interval elapsed; the device should
    /// emit its callback data (typically via
    /// [`SubscriptionManager::send_callback_data`]).
    fn on_subscription_timer_update(
        &mut self,
        node: &Node,
        addr: LogicalAddress,
        subscription_id: u32,
        action_id: u16,
    ) {
    }

    /// The device's own self-update timer elapsed.
    fn on_timer_update(&mut self, node: &Node) {}

    /// A peer executed an action on this device.
    ///
    /// The returned status is sent back only when the peer requested it.
    fn on_action_set(
        &mut self,
        node: &Node,
        action_id: u16,
        payload: &[u8],
        src: LogicalAddress,
    ) -> ActionExecuteStatus {
        ActionExecuteStatus::Unknown
    }

    /// A peer requested action data; the device is responsible for sending
    /// any `ActionResponse`.
    fn on_action_get(
        &mut self,
        node: &Node,
        action_id: u16,
        payload: &[u8],
        src: LogicalAddress,
        request_id: u8,
    ) {
    }

    /// A device answered an earlier `ActionFetch` from this device.
    fn on_action_get_response(
        &mut self,
        node: &Node,
        action_id: u16,
        payload: &[u8],
        src: LogicalAddress,
        request_id: u8,
    ) {
    }
}
