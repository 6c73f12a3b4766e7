//! LDP node runtime
//!
//! This module hosts everything above the wire format: the monotonic clock
//! abstraction, the outgoing packet pool and builder, the mesh transport
//! boundary, the device contract, the per-device subscription engine, the
//! preserved-property storage, and the [`Node`] dispatcher tying them
//! together.

mod builder;
mod clock;
mod device;
mod mesh;
mod node;
mod pool;
mod storage;
mod subscriptions;

pub use builder::PacketBuilder;
pub use clock::{Clock, ManualClock, MonotonicClock};
pub use device::{ApiAction, ApiField, Device, DeviceAttrib};
pub use mesh::{MeshTransport, BROADCAST_NODE};
pub use node::Node;
pub use pool::{PacketPool, PoolConfig, PoolLease};
pub use storage::{MemoryStorage, PreservedProperty, PropertyValue, Storage};
pub use subscriptions::{Subscriber, SubscriptionManager, TimerEvent, NEVER};
