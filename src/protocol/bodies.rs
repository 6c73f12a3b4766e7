//! Per-opcode packet bodies
//!
//! Each body knows its own encoded length, encodes into a caller-provided
//! window, and decodes from the received byte slice with a bounds-checked
//! walk. Decoded byte strings are owned [`Bytes`]; the hot dispatch path
//! hands borrowed payload tails to device hooks instead of going through
//! these types.

use bytes::Bytes;

use super::{ActionExecuteStatus, Error, ExecuteFlags, Reader, Result, Writer};

fn encode_to_vec(len: usize, f: impl FnOnce(&mut Writer<'_>) -> Result<()>) -> Result<Vec<u8>> {
    let mut out = vec![0u8; len];
    let mut w = Writer::new(&mut out);
    f(&mut w)?;
    debug_assert_eq!(w.written(), len);
    Ok(out)
}

/// One `key`/`value` attribute record inside a HELLO body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttribRecord {
    /// Attribute key (at most 255 bytes).
    pub key: Bytes,
    /// Attribute value (at most 255 bytes).
    pub value: Bytes,
}

/// One declared action record inside a HELLO body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    /// Raw action-type tag.
    pub kind: u8,
    /// Action name (at most 255 bytes).
    pub name: Bytes,
}

/// Body of `HelloWorld` and `HelloWorldResponse`.
///
/// The device class rides as a raw `u32` so classes unknown to this crate
/// survive a round-trip; interpret it with
/// [`super::DeviceClass::from_u32`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelloWorld {
    /// Raw device class tag.
    pub device_class: u32,
    /// Device name (at most 255 bytes).
    pub name: Bytes,
    /// Declared attributes.
    pub attribs: Vec<AttribRecord>,
    /// Declared actions, in id order.
    pub actions: Vec<ActionRecord>,
}

impl HelloWorld {
    /// Total encoded size of this body.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        let mut len = 7 + self.name.len();
        for attrib in &self.attribs {
            len += 2 + attrib.key.len() + attrib.value.len();
        }
        for action in &self.actions {
            len += 2 + action.name.len();
        }
        len
    }

    /// Encode into a writer positioned at the body start.
    pub fn encode_into(&self, w: &mut Writer<'_>) -> Result<()> {
        let attrib_count = u8::try_from(self.attribs.len()).map_err(|_| Error::FieldTooLong {
            len: self.attribs.len(),
            max: super::MAX_FIELD_LEN,
        })?;
        let action_count = u8::try_from(self.actions.len()).map_err(|_| Error::FieldTooLong {
            len: self.actions.len(),
            max: super::MAX_FIELD_LEN,
        })?;
        w.u32(self.device_class)?;
        let name_len = u8::try_from(self.name.len()).map_err(|_| Error::FieldTooLong {
            len: self.name.len(),
            max: super::MAX_FIELD_LEN,
        })?;
        w.u8(name_len)?;
        w.u8(attrib_count)?;
        w.u8(action_count)?;
        w.bytes(&self.name)?;
        for attrib in &self.attribs {
            let key_len = u8::try_from(attrib.key.len()).map_err(|_| Error::FieldTooLong {
                len: attrib.key.len(),
                max: super::MAX_FIELD_LEN,
            })?;
            let value_len = u8::try_from(attrib.value.len()).map_err(|_| Error::FieldTooLong {
                len: attrib.value.len(),
                max: super::MAX_FIELD_LEN,
            })?;
            w.u8(key_len)?;
            w.u8(value_len)?;
            w.bytes(&attrib.key)?;
            w.bytes(&attrib.value)?;
        }
        for action in &self.actions {
            w.u8(action.kind)?;
            w.prefixed(&action.name)?;
        }
        Ok(())
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_to_vec(self.encoded_len(), |w| self.encode_into(w))
    }

    /// Decode a HELLO body, walking the attribute and action lists.
    ///
    /// A record cut mid-way fails the whole decode; nothing past the
    /// received size is ever read.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = Reader::new(buf);
        let device_class = r.u32()?;
        let name_len = r.u8()? as usize;
        let attrib_count = r.u8()?;
        let action_count = r.u8()?;
        let name = Bytes::copy_from_slice(r.take(name_len)?);

        let mut attribs = Vec::with_capacity(attrib_count as usize);
        for _ in 0..attrib_count {
            let key_len = r.u8()? as usize;
            let value_len = r.u8()? as usize;
            let key = Bytes::copy_from_slice(r.take(key_len)?);
            let value = Bytes::copy_from_slice(r.take(value_len)?);
            attribs.push(AttribRecord { key, value });
        }

        let mut actions = Vec::with_capacity(action_count as usize);
        for _ in 0..action_count {
            let kind = r.u8()?;
            let name_len = r.u8()? as usize;
            let name = Bytes::copy_from_slice(r.take(name_len)?);
            actions.push(ActionRecord { kind, name });
        }

        Ok(Self {
            device_class,
            name,
            attribs,
            actions,
        })
    }
}

/// Body of `FieldDictionaryResponse`: the device's api strings in id order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldDictionary {
    /// Field strings; the index in this list is the field id.
    pub fields: Vec<Bytes>,
}

impl FieldDictionary {
    /// Total encoded size of this body.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        2 + self.fields.iter().map(|f| 1 + f.len()).sum::<usize>()
    }

    /// Encode into a writer positioned at the body start.
    pub fn encode_into(&self, w: &mut Writer<'_>) -> Result<()> {
        let count = u16::try_from(self.fields.len()).map_err(|_| Error::FieldTooLong {
            len: self.fields.len(),
            max: usize::from(u16::MAX),
        })?;
        w.u16(count)?;
        for field in &self.fields {
            w.prefixed(field)?;
        }
        Ok(())
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_to_vec(self.encoded_len(), |w| self.encode_into(w))
    }

    /// Decode a field dictionary body.
    ///
    /// A body that ends cleanly on a record boundary with fewer records than
    /// `field_count` yields the records actually present; a record cut
    /// mid-string fails the decode.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = Reader::new(buf);
        let count = r.u16()?;
        let mut fields = Vec::new();
        for _ in 0..count {
            if r.is_empty() {
                break;
            }
            let len = r.u8()? as usize;
            fields.push(Bytes::copy_from_slice(r.take(len)?));
        }
        Ok(Self { fields })
    }
}

/// Body of `ActionExecute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionExecute {
    /// Index of the action in the device's declared list.
    pub action_id: u16,
    /// Caller-chosen id echoed in the status result.
    pub request_id: u8,
    /// Execution flags.
    pub flags: ExecuteFlags,
    /// Action-specific argument bytes.
    pub payload: Bytes,
}

impl ActionExecute {
    /// Total encoded size of this body.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        4 + self.payload.len()
    }

    /// Encode into a writer positioned at the body start.
    pub fn encode_into(&self, w: &mut Writer<'_>) -> Result<()> {
        w.u16(self.action_id)?;
        w.u8(self.request_id)?;
        w.u8(self.flags.as_u8())?;
        w.bytes(&self.payload)
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_to_vec(self.encoded_len(), |w| self.encode_into(w))
    }

    /// Decode from a received body.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = Reader::new(buf);
        Ok(Self {
            action_id: r.u16()?,
            request_id: r.u8()?,
            flags: ExecuteFlags::from_u8(r.u8()?),
            payload: Bytes::copy_from_slice(r.rest()),
        })
    }
}

/// Body of `ActionExecuteResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionExecuteResult {
    /// Action the status refers to.
    pub action_id: u16,
    /// Request id echoed from the triggering `ActionExecute`.
    pub request_id: u8,
    /// Handler status.
    pub status: ActionExecuteStatus,
}

impl ActionExecuteResult {
    /// Total encoded size of this body.
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        4
    }

    /// Encode into a writer positioned at the body start.
    pub fn encode_into(&self, w: &mut Writer<'_>) -> Result<()> {
        w.u16(self.action_id)?;
        w.u8(self.request_id)?;
        w.u8(self.status.as_u8())
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_to_vec(self.encoded_len(), |w| self.encode_into(w))
    }

    /// Decode from a received body. Unassigned status bytes read as
    /// [`ActionExecuteStatus::Unknown`].
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = Reader::new(buf);
        Ok(Self {
            action_id: r.u16()?,
            request_id: r.u8()?,
            status: ActionExecuteStatus::from_u8(r.u8()?)
                .unwrap_or(ActionExecuteStatus::Unknown),
        })
    }
}

/// Body of `ActionFetch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionFetch {
    /// Index of the action being queried.
    pub action_id: u16,
    /// Caller-chosen id echoed in the response.
    pub request_id: u8,
    /// Action-specific query bytes.
    pub payload: Bytes,
}

impl ActionFetch {
    /// Total encoded size of this body.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        3 + self.payload.len()
    }

    /// Encode into a writer positioned at the body start.
    pub fn encode_into(&self, w: &mut Writer<'_>) -> Result<()> {
        w.u16(self.action_id)?;
        w.u8(self.request_id)?;
        w.bytes(&self.payload)
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_to_vec(self.encoded_len(), |w| self.encode_into(w))
    }

    /// Decode from a received body.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = Reader::new(buf);
        Ok(Self {
            action_id: r.u16()?,
            request_id: r.u8()?,
            payload: Bytes::copy_from_slice(r.rest()),
        })
    }
}

/// Body of `ActionResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Status of the fetch.
    pub status: ActionExecuteStatus,
    /// Action the data belongs to.
    pub action_id: u16,
    /// Request id echoed from the triggering `ActionFetch`.
    pub request_id: u8,
    /// Action data bytes.
    pub payload: Bytes,
}

impl ActionResponse {
    /// Total encoded size of this body.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        4 + self.payload.len()
    }

    /// Encode into a writer positioned at the body start.
    pub fn encode_into(&self, w: &mut Writer<'_>) -> Result<()> {
        w.u8(self.status.as_u8())?;
        w.u16(self.action_id)?;
        w.u8(self.request_id)?;
        w.bytes(&self.payload)
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_to_vec(self.encoded_len(), |w| self.encode_into(w))
    }

    /// Decode from a received body.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = Reader::new(buf);
        Ok(Self {
            status: ActionExecuteStatus::from_u8(r.u8()?)
                .unwrap_or(ActionExecuteStatus::Unknown),
            action_id: r.u16()?,
            request_id: r.u8()?,
            payload: Bytes::copy_from_slice(r.rest()),
        })
    }
}

/// Body of `SubscriptionStart`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionStart {
    /// Subscriber-chosen id, unique per source address.
    pub id: u32,
    /// Action to subscribe to.
    pub action_id: u16,
    /// Lifetime of the subscription in seconds.
    pub duration_s: u16,
    /// Periodic callback interval in milliseconds; 0 disables periodic fires.
    pub period_ms: u32,
    /// Device-class-specific subscription description.
    pub info: Bytes,
}

impl SubscriptionStart {
    /// Total encoded size of this body.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        12 + self.info.len()
    }

    /// Encode into a writer positioned at the body start.
    pub fn encode_into(&self, w: &mut Writer<'_>) -> Result<()> {
        w.u32(self.id)?;
        w.u16(self.action_id)?;
        w.u16(self.duration_s)?;
        w.u32(self.period_ms)?;
        w.bytes(&self.info)
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_to_vec(self.encoded_len(), |w| self.encode_into(w))
    }

    /// Decode from a received body.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = Reader::new(buf);
        Ok(Self {
            id: r.u32()?,
            action_id: r.u16()?,
            duration_s: r.u16()?,
            period_ms: r.u32()?,
            info: Bytes::copy_from_slice(r.rest()),
        })
    }
}

/// Body of `SubscriptionDone` (reserved; state 0 means OK).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionDone {
    /// Subscription id being acknowledged.
    pub id: u32,
    /// 0 for OK, anything else an error.
    pub state: u32,
}

impl SubscriptionDone {
    /// Total encoded size of this body.
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        8
    }

    /// Encode into a writer positioned at the body start.
    pub fn encode_into(&self, w: &mut Writer<'_>) -> Result<()> {
        w.u32(self.id)?;
        w.u32(self.state)
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_to_vec(self.encoded_len(), |w| self.encode_into(w))
    }

    /// Decode from a received body.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = Reader::new(buf);
        Ok(Self {
            id: r.u32()?,
            state: r.u32()?,
        })
    }
}

/// Body of `SubscriptionCallback`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionCallback {
    /// Id of the subscription the event belongs to.
    pub id: u32,
    /// Event payload.
    pub payload: Bytes,
}

impl SubscriptionCallback {
    /// Total encoded size of this body.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        4 + self.payload.len()
    }

    /// Encode into a writer positioned at the body start.
    pub fn encode_into(&self, w: &mut Writer<'_>) -> Result<()> {
        w.u32(self.id)?;
        w.bytes(&self.payload)
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_to_vec(self.encoded_len(), |w| self.encode_into(w))
    }

    /// Decode from a received body.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = Reader::new(buf);
        Ok(Self {
            id: r.u32()?,
            payload: Bytes::copy_from_slice(r.rest()),
        })
    }
}

/// Body of `SubscriptionStop`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionStop {
    /// Id of the subscription to cancel.
    pub id: u32,
}

impl SubscriptionStop {
    /// Total encoded size of this body.
    #[must_use]
    pub const fn encoded_len(&self) -> usize {
        4
    }

    /// Encode into a writer positioned at the body start.
    pub fn encode_into(&self, w: &mut Writer<'_>) -> Result<()> {
        w.u32(self.id)
    }

    /// Encode into a fresh buffer.
    pub fn encode(&self) -> Result<Vec<u8>> {
        encode_to_vec(self.encoded_len(), |w| self.encode_into(w))
    }

    /// Decode from a received body.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        let mut r = Reader::new(buf);
        Ok(Self { id: r.u32()? })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hello_sample() -> HelloWorld {
        HelloWorld {
            device_class: 2,
            name: Bytes::from_static(b"desk-relay"),
            attribs: vec![
                AttribRecord {
                    key: Bytes::from_static(b"location"),
                    value: Bytes::from_static(b"office"),
                },
                AttribRecord {
                    key: Bytes::from_static(b"hw"),
                    value: Bytes::from_static(b"v2"),
                },
            ],
            actions: vec![
                ActionRecord {
                    kind: 2,
                    name: Bytes::from_static(b"state"),
                },
                ActionRecord {
                    kind: 1,
                    name: Bytes::from_static(b"pulse"),
                },
            ],
        }
    }

    #[test]
    fn hello_roundtrip() {
        let hello = hello_sample();
        let encoded = hello.encode().unwrap();
        assert_eq!(encoded.len(), hello.encoded_len());
        assert_eq!(HelloWorld::decode(&encoded).unwrap(), hello);
    }

    #[test]
    fn hello_wire_layout() {
        let hello = HelloWorld {
            device_class: 1,
            name: Bytes::from_static(b"btn"),
            attribs: vec![],
            actions: vec![],
        };
        let encoded = hello.encode().unwrap();
        assert_eq!(encoded, [0, 0, 0, 1, 3, 0, 0, b'b', b't', b'n']);
    }

    #[test]
    fn hello_truncated_record_is_rejected() {
        let hello = hello_sample();
        let encoded = hello.encode().unwrap();
        // Cut into the middle of the second attribute's value.
        let cut = encoded.len() - hello.actions.iter().map(|a| 2 + a.name.len()).sum::<usize>() - 1;
        assert!(matches!(
            HelloWorld::decode(&encoded[..cut]),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn field_dictionary_roundtrip() {
        let dict = FieldDictionary {
            fields: vec![
                Bytes::from_static(b"on"),
                Bytes::from_static(b"off"),
                Bytes::from_static(b"state"),
            ],
        };
        let encoded = dict.encode().unwrap();
        assert_eq!(encoded[..2], [0, 3]);
        assert_eq!(FieldDictionary::decode(&encoded).unwrap(), dict);
    }

    #[test]
    fn field_dictionary_short_count_tolerated() {
        // Declares 5 records but carries 2 complete ones.
        let body = [0u8, 5, 2, b'o', b'n', 3, b'o', b'f', b'f'];
        let dict = FieldDictionary::decode(&body).unwrap();
        assert_eq!(dict.fields.len(), 2);
    }

    #[test]
    fn field_dictionary_cut_record_rejected() {
        let body = [0u8, 2, 2, b'o', b'n', 5, b'o', b'f'];
        assert!(matches!(
            FieldDictionary::decode(&body),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn action_execute_roundtrip() {
        let exec = ActionExecute {
            action_id: 7,
            request_id: 42,
            flags: ExecuteFlags::new().with(ExecuteFlags::REQUIRE_STATUS_RESPONSE),
            payload: Bytes::from_static(&[0xAB]),
        };
        let encoded = exec.encode().unwrap();
        assert_eq!(encoded, [0, 7, 42, 1, 0xAB]);
        assert_eq!(ActionExecute::decode(&encoded).unwrap(), exec);
    }

    #[test]
    fn action_execute_result_roundtrip() {
        let result = ActionExecuteResult {
            action_id: 7,
            request_id: 42,
            status: ActionExecuteStatus::Success,
        };
        let encoded = result.encode().unwrap();
        assert_eq!(encoded, [0, 7, 42, 1]);
        assert_eq!(ActionExecuteResult::decode(&encoded).unwrap(), result);
    }

    #[test]
    fn action_fetch_and_response_roundtrip() {
        let fetch = ActionFetch {
            action_id: 3,
            request_id: 9,
            payload: Bytes::from_static(b"q"),
        };
        assert_eq!(ActionFetch::decode(&fetch.encode().unwrap()).unwrap(), fetch);

        let response = ActionResponse {
            status: ActionExecuteStatus::Success,
            action_id: 3,
            request_id: 9,
            payload: Bytes::from_static(&[0x01, 0x02]),
        };
        let encoded = response.encode().unwrap();
        assert_eq!(encoded[..4], [1, 0, 3, 9]);
        assert_eq!(ActionResponse::decode(&encoded).unwrap(), response);
    }

    #[test]
    fn subscription_bodies_roundtrip() {
        let start = SubscriptionStart {
            id: 9,
            action_id: 7,
            duration_s: 2,
            period_ms: 500,
            info: Bytes::new(),
        };
        let encoded = start.encode().unwrap();
        assert_eq!(encoded, [0, 0, 0, 9, 0, 7, 0, 2, 0, 0, 1, 0xF4]);
        assert_eq!(SubscriptionStart::decode(&encoded).unwrap(), start);

        let done = SubscriptionDone { id: 9, state: 0 };
        assert_eq!(SubscriptionDone::decode(&done.encode().unwrap()).unwrap(), done);

        let callback = SubscriptionCallback {
            id: 9,
            payload: Bytes::from_static(&[0xFE]),
        };
        assert_eq!(
            SubscriptionCallback::decode(&callback.encode().unwrap()).unwrap(),
            callback
        );

        let stop = SubscriptionStop { id: 9 };
        assert_eq!(SubscriptionStop::decode(&stop.encode().unwrap()).unwrap(), stop);
    }

    #[test]
    fn truncated_prefixes_rejected() {
        assert!(ActionExecute::decode(&[0, 7, 42]).is_err());
        assert!(ActionFetch::decode(&[0, 7]).is_err());
        assert!(ActionResponse::decode(&[1, 0, 3]).is_err());
        assert!(SubscriptionStart::decode(&[0; 11]).is_err());
        assert!(SubscriptionDone::decode(&[0; 7]).is_err());
        assert!(SubscriptionCallback::decode(&[0; 3]).is_err());
        assert!(SubscriptionStop::decode(&[0; 3]).is_err());
        assert!(HelloWorld::decode(&[0; 6]).is_err());
        assert!(FieldDictionary::decode(&[0]).is_err());
    }

    // Property-based tests
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn small_bytes() -> impl Strategy<Value = Bytes> {
            prop::collection::vec(any::<u8>(), 0..=64).prop_map(Bytes::from)
        }

        fn hello_strategy() -> impl Strategy<Value = HelloWorld> {
            (
                any::<u32>(),
                small_bytes(),
                prop::collection::vec((small_bytes(), small_bytes()), 0..4),
                prop::collection::vec((any::<u8>(), small_bytes()), 0..4),
            )
                .prop_map(|(device_class, name, attribs, actions)| HelloWorld {
                    device_class,
                    name,
                    attribs: attribs
                        .into_iter()
                        .map(|(key, value)| AttribRecord { key, value })
                        .collect(),
                    actions: actions
                        .into_iter()
                        .map(|(kind, name)| ActionRecord { kind, name })
                        .collect(),
                })
        }

        proptest! {
            /// Property: every well-formed HELLO body roundtrips byte-exact.
            #[test]
            fn prop_hello_roundtrip(hello in hello_strategy()) {
                let encoded = hello.encode().unwrap();
                prop_assert_eq!(encoded.len(), hello.encoded_len());
                let decoded = HelloWorld::decode(&encoded).unwrap();
                prop_assert_eq!(decoded.encode().unwrap(), encoded);
            }

            /// Property: decoding never reads past an arbitrary cut.
            #[test]
            fn prop_hello_cut_never_panics(hello in hello_strategy(), cut_ratio in 0.0f64..1.0) {
                let encoded = hello.encode().unwrap();
                #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let cut = ((encoded.len() as f64) * cut_ratio) as usize;
                let _ = HelloWorld::decode(&encoded[..cut]);
            }

            /// Property: subscription start carries its numeric fields exactly.
            #[test]
            fn prop_subscription_start_roundtrip(
                id in any::<u32>(),
                action_id in any::<u16>(),
                duration_s in any::<u16>(),
                period_ms in any::<u32>(),
                info in small_bytes(),
            ) {
                let start = SubscriptionStart { id, action_id, duration_s, period_ms, info };
                let decoded = SubscriptionStart::decode(&start.encode().unwrap()).unwrap();
                prop_assert_eq!(decoded, start);
            }

            /// Property: execute bodies tolerate arbitrary payload tails.
            #[test]
            fn prop_action_execute_roundtrip(
                action_id in any::<u16>(),
                request_id in any::<u8>(),
                flags in any::<u8>(),
                payload in small_bytes(),
            ) {
                let exec = ActionExecute {
                    action_id,
                    request_id,
                    flags: ExecuteFlags::from_u8(flags),
                    payload,
                };
                let decoded = ActionExecute::decode(&exec.encode().unwrap()).unwrap();
                prop_assert_eq!(decoded, exec);
            }
        }
    }
}
