//! LDP packet types, device classes, and action enums

use std::fmt;

/// Logical packet opcodes.
///
/// The seven `Groups*` opcodes are reserved: their numbers are allocated but
/// no payload contract is defined, and the dispatcher treats them as no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    /// Broadcast on device registration
    HelloWorld = 1,
    /// Unicast response to `HelloWorld`
    HelloWorldResponse = 2,
    /// Request the device's api field dictionary
    FieldDictionaryRequest = 3,
    /// Response to `FieldDictionaryRequest`
    FieldDictionaryResponse = 4,

    /// Reserved
    GroupsListRequest = 5,
    /// Reserved
    GroupsListResponse = 6,
    /// Reserved
    GroupsAdd = 7,
    /// Reserved
    GroupsEdit = 8,
    /// Reserved
    GroupsRemove = 9,
    /// Reserved
    GroupsFindUsersRequest = 10,
    /// Reserved
    GroupsFindUsersResponse = 11,

    /// Execute an action on the destination device
    ActionExecute = 12,
    /// Status result for `ActionExecute`
    ActionExecuteResult = 13,
    /// Request action data
    ActionFetch = 14,
    /// Response to `ActionFetch`
    ActionResponse = 15,

    /// Open or refresh a subscription to an action
    SubscriptionStart = 16,
    /// Acknowledgement of `SubscriptionStart` (reserved)
    SubscriptionDone = 17,
    /// Event callback delivered to a subscriber
    SubscriptionCallback = 18,
    /// Cancel a subscription (from the subscriber side)
    SubscriptionStop = 19,
}

impl PacketType {
    /// Convert from wire byte.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(Self::HelloWorld),
            2 => Some(Self::HelloWorldResponse),
            3 => Some(Self::FieldDictionaryRequest),
            4 => Some(Self::FieldDictionaryResponse),
            5 => Some(Self::GroupsListRequest),
            6 => Some(Self::GroupsListResponse),
            7 => Some(Self::GroupsAdd),
            8 => Some(Self::GroupsEdit),
            9 => Some(Self::GroupsRemove),
            10 => Some(Self::GroupsFindUsersRequest),
            11 => Some(Self::GroupsFindUsersResponse),
            12 => Some(Self::ActionExecute),
            13 => Some(Self::ActionExecuteResult),
            14 => Some(Self::ActionFetch),
            15 => Some(Self::ActionResponse),
            16 => Some(Self::SubscriptionStart),
            17 => Some(Self::SubscriptionDone),
            18 => Some(Self::SubscriptionCallback),
            19 => Some(Self::SubscriptionStop),
            _ => None,
        }
    }

    /// Convert to wire byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Fixed-prefix size of this opcode's body.
    ///
    /// A received packet shorter than the logical header plus this prefix is
    /// dropped before any body field is read. Variable-length tails (names,
    /// attribute lists, payloads) come after the prefix.
    #[must_use]
    pub const fn body_prefix_size(self) -> usize {
        match self {
            Self::HelloWorld | Self::HelloWorldResponse => 7,
            Self::FieldDictionaryResponse => 2,
            Self::ActionExecute | Self::ActionExecuteResult | Self::ActionResponse => 4,
            Self::ActionFetch => 3,
            Self::SubscriptionStart => 12,
            Self::SubscriptionDone => 8,
            Self::SubscriptionCallback | Self::SubscriptionStop => 4,
            Self::FieldDictionaryRequest
            | Self::GroupsListRequest
            | Self::GroupsListResponse
            | Self::GroupsAdd
            | Self::GroupsEdit
            | Self::GroupsRemove
            | Self::GroupsFindUsersRequest
            | Self::GroupsFindUsersResponse => 0,
        }
    }
}

impl fmt::Display for PacketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::HelloWorld => "HelloWorld",
            Self::HelloWorldResponse => "HelloWorldResponse",
            Self::FieldDictionaryRequest => "FieldDictionaryRequest",
            Self::FieldDictionaryResponse => "FieldDictionaryResponse",
            Self::GroupsListRequest => "GroupsListRequest",
            Self::GroupsListResponse => "GroupsListResponse",
            Self::GroupsAdd => "GroupsAdd",
            Self::GroupsEdit => "GroupsEdit",
            Self::GroupsRemove => "GroupsRemove",
            Self::GroupsFindUsersRequest => "GroupsFindUsersRequest",
            Self::GroupsFindUsersResponse => "GroupsFindUsersResponse",
            Self::ActionExecute => "ActionExecute",
            Self::ActionExecuteResult => "ActionExecuteResult",
            Self::ActionFetch => "ActionFetch",
            Self::ActionResponse => "ActionResponse",
            Self::SubscriptionStart => "SubscriptionStart",
            Self::SubscriptionDone => "SubscriptionDone",
            Self::SubscriptionCallback => "SubscriptionCallback",
            Self::SubscriptionStop => "SubscriptionStop",
        };
        write!(f, "{name}")
    }
}

/// Well-known device classes.
///
/// The wire carries a raw `u32`; this enum is an interpretation helper, so
/// classes this crate does not know about survive a round-trip untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DeviceClass {
    /// Class not declared or not understood
    Unknown = 0,
    /// Momentary or latching button
    Button = 1,
    /// Relay output module
    Relay = 2,
    /// Temperature sensor
    TemperatureSensor = 3,
    /// Combined temperature/humidity sensor
    TempHumSensor = 4,
    /// Standalone controller; not meant for direct interaction
    Controller = 5,
    /// PC-to-mesh adapter
    PcAdapter = 6,
    /// Hosted Lua interpreter
    LuaInterpreter = 7,
    /// Single-channel dimmable LED
    Led1Dim = 8,
    /// Dual-channel dimmable LED
    Led2Dim = 9,
    /// Virtual device interfacing a specific chip
    HwAccessor = 10,
    /// Hosted Python interpreter
    PyInterpreter = 11,
}

impl DeviceClass {
    /// Convert from the wire value.
    #[must_use]
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Button),
            2 => Some(Self::Relay),
            3 => Some(Self::TemperatureSensor),
            4 => Some(Self::TempHumSensor),
            5 => Some(Self::Controller),
            6 => Some(Self::PcAdapter),
            7 => Some(Self::LuaInterpreter),
            8 => Some(Self::Led1Dim),
            9 => Some(Self::Led2Dim),
            10 => Some(Self::HwAccessor),
            11 => Some(Self::PyInterpreter),
            _ => None,
        }
    }

    /// Convert to the wire value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}

/// Declared type of a device action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ActionType {
    /// Untyped
    Unknown = 0,
    /// Fire-and-forget trigger
    Immediate = 1,
    /// Two-state toggle
    Toggle = 2,
    /// Number range [0, 255]
    Range = 3,
    /// Free-form label
    Label = 4,
    /// Temperature reading
    Temperature = 5,
    /// Humidity reading
    Humidity = 6,
    /// Relative time, e.g. uptime
    TimeDelta = 7,
    /// Absolute time
    Time = 8,
}

impl ActionType {
    /// Convert from wire byte.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Immediate),
            2 => Some(Self::Toggle),
            3 => Some(Self::Range),
            4 => Some(Self::Label),
            5 => Some(Self::Temperature),
            6 => Some(Self::Humidity),
            7 => Some(Self::TimeDelta),
            8 => Some(Self::Time),
            _ => None,
        }
    }

    /// Convert to wire byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Status returned by a device for an executed action.
///
/// This is the only in-band error channel of the protocol, and it is sent
/// only when the peer set [`ExecuteFlags::REQUIRE_STATUS_RESPONSE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ActionExecuteStatus {
    /// Device did not handle the action
    Unknown = 0,
    /// Action applied
    Success = 1,
    /// Action failed
    Fail = 2,
    /// Payload arguments were rejected
    ArgumentsError = 3,
    /// No action with the requested id
    ActionNotFound = 4,
    /// Action timed out internally
    Timeout = 5,
}

impl ActionExecuteStatus {
    /// Convert from wire byte.
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Unknown),
            1 => Some(Self::Success),
            2 => Some(Self::Fail),
            3 => Some(Self::ArgumentsError),
            4 => Some(Self::ActionNotFound),
            5 => Some(Self::Timeout),
            _ => None,
        }
    }

    /// Convert to wire byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }
}

/// Flag bits carried by `ActionExecute`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExecuteFlags(u8);

impl ExecuteFlags {
    /// Sender wants an `ActionExecuteResult` with the handler's status.
    pub const REQUIRE_STATUS_RESPONSE: u8 = 1 << 0;

    /// Create an empty flag set.
    #[must_use]
    pub const fn new() -> Self {
        Self(0)
    }

    /// Create from the raw wire byte. Undefined bits are preserved.
    #[must_use]
    pub const fn from_u8(value: u8) -> Self {
        Self(value)
    }

    /// Convert to the wire byte.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }

    /// Set a flag.
    #[must_use]
    pub const fn with(mut self, flag: u8) -> Self {
        self.0 |= flag;
        self
    }

    /// Check whether a flag is set.
    #[must_use]
    pub const fn has(self, flag: u8) -> bool {
        (self.0 & flag) != 0
    }

    /// Check whether the sender requested a status response.
    #[must_use]
    pub const fn requires_status(self) -> bool {
        self.has(Self::REQUIRE_STATUS_RESPONSE)
    }
}
