//! Preserved device properties
//!
//! Devices keep small typed values (a relay's last state, a dimmer level)
//! across restarts through a narrow key/value storage contract. A missing
//! key falls back to the caller-supplied default; a write only happens when
//! the value actually changed.

use std::collections::HashMap;

use tracing::trace;
use xxhash_rust::xxh3::xxh3_64;

/// Narrow persistent key/value contract.
///
/// Backed by NVS or flash on real hardware; [`MemoryStorage`] serves hosts
/// and tests.
pub trait Storage {
    /// Persist `bytes` under `key`, replacing any previous value.
    fn save(&mut self, key: &str, bytes: &[u8]);

    /// Load the bytes previously saved under `key`.
    fn load(&self, key: &str) -> Option<Vec<u8>>;
}

/// Volatile in-memory storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&mut self, key: &str, bytes: &[u8]) {
        self.entries.insert(key.to_owned(), bytes.to_vec());
    }

    fn load(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }
}

/// Fixed-width little-endian value encoding for preserved properties.
pub trait PropertyValue: Sized {
    /// Encode the value for storage.
    fn to_bytes(&self) -> Vec<u8>;

    /// Decode a stored value; `None` on size or content mismatch.
    fn from_bytes(bytes: &[u8]) -> Option<Self>;
}

macro_rules! numeric_property {
    ($($ty:ty),*) => {
        $(impl PropertyValue for $ty {
            fn to_bytes(&self) -> Vec<u8> {
                self.to_le_bytes().to_vec()
            }

            fn from_bytes(bytes: &[u8]) -> Option<Self> {
                Some(<$ty>::from_le_bytes(bytes.try_into().ok()?))
            }
        })*
    };
}

numeric_property!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl PropertyValue for bool {
    fn to_bytes(&self) -> Vec<u8> {
        vec![u8::from(*self)]
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [0] => Some(false),
            [1] => Some(true),
            _ => None,
        }
    }
}

impl PropertyValue for String {
    fn to_bytes(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        String::from_utf8(bytes.to_vec()).ok()
    }
}

/// Storage key for a device property: owning port plus a short name hash.
///
/// Flash key/value stores cap key length, so the name rides as a 32-bit
/// hash rather than verbatim.
#[must_use]
pub fn property_key(port: u16, name: &str) -> String {
    #[allow(clippy::cast_possible_truncation)]
    let name_hash = xxh3_64(name.as_bytes()) as u32;
    format!("{port:x}:{name_hash:x}")
}

/// A typed device property written through to [`Storage`].
#[derive(Debug)]
pub struct PreservedProperty<T> {
    key: String,
    value: T,
}

impl<T: PropertyValue + PartialEq> PreservedProperty<T> {
    /// Load the property, falling back to `default` on a miss or a value
    /// that no longer decodes.
    pub fn new(storage: &dyn Storage, port: u16, name: &str, default: T) -> Self {
        let key = property_key(port, name);
        let value = match storage.load(&key).and_then(|bytes| T::from_bytes(&bytes)) {
            Some(stored) => stored,
            None => {
                trace!(key = %key, "no stored value, using default");
                default
            }
        };
        Self { key, value }
    }

    /// Current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Update the value, persisting only when it changed.
    pub fn set(&mut self, storage: &mut dyn Storage, new_value: T) {
        if self.value == new_value {
            return;
        }
        storage.save(&self.key, &new_value.to_bytes());
        self.value = new_value;
    }
}

impl<T> std::ops::Deref for PreservedProperty<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_falls_back_to_default() {
        let storage = MemoryStorage::new();
        let prop = PreservedProperty::new(&storage, 100, "level", 42u8);
        assert_eq!(*prop.get(), 42);
    }

    #[test]
    fn set_persists_and_reloads() {
        let mut storage = MemoryStorage::new();
        let mut prop = PreservedProperty::new(&storage, 100, "level", 0u8);
        prop.set(&mut storage, 7);
        assert_eq!(*prop.get(), 7);

        let reloaded = PreservedProperty::new(&storage, 100, "level", 0u8);
        assert_eq!(*reloaded.get(), 7);
    }

    #[test]
    fn unchanged_set_is_a_no_op_write() {
        let mut storage = MemoryStorage::new();
        let mut prop = PreservedProperty::new(&storage, 100, "state", false);
        prop.set(&mut storage, false);
        assert!(storage.load(&property_key(100, "state")).is_none());
        prop.set(&mut storage, true);
        assert!(storage.load(&property_key(100, "state")).is_some());
    }

    #[test]
    fn properties_are_scoped_by_port_and_name() {
        let mut storage = MemoryStorage::new();
        let mut a = PreservedProperty::new(&storage, 100, "level", 0u32);
        a.set(&mut storage, 9);
        let b = PreservedProperty::new(&storage, 101, "level", 0u32);
        let c = PreservedProperty::new(&storage, 100, "other", 0u32);
        assert_eq!(*b.get(), 0);
        assert_eq!(*c.get(), 0);
    }

    #[test]
    fn corrupt_value_falls_back() {
        let mut storage = MemoryStorage::new();
        storage.save(&property_key(5, "level"), &[1, 2, 3]);
        let prop = PreservedProperty::new(&storage, 5, "level", 10u16);
        assert_eq!(*prop.get(), 10);
    }

    #[test]
    fn string_property_roundtrip() {
        let mut storage = MemoryStorage::new();
        let mut prop =
            PreservedProperty::new(&storage, 1, "label", String::from("unset"));
        prop.set(&mut storage, String::from("desk"));
        let reloaded = PreservedProperty::new(&storage, 1, "label", String::new());
        assert_eq!(reloaded.get(), "desk");
    }
}
