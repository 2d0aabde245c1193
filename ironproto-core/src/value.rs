//! Intermediate representation for decoded message values.
//!
//! Decoders produce [`MessageValue`]s, name-keyed maps of [`Value`]s. All
//! scalar widths are explicit; 64-bit integers are native `i64`/`u64`.

use std::collections::BTreeMap;

use bytes::Bytes;

/// A single decoded field value.
///
/// `bytes` and `string` payloads are copied out of the input buffer, so a
/// decoded value never borrows from the reader that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent value (used for missing map values of message type).
    Null,
    Bool(bool),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Bytes(Bytes),
    /// A nested decoded message or group.
    Message(Box<MessageValue>),
    /// A repeated field.
    List(Vec<Value>),
    /// A map field. BTreeMap keeps map equality order-independent.
    Map(BTreeMap<MapKey, Value>),
}

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f32(&self) -> Option<f32> {
        match self {
            Value::F32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v.as_ref()),
            _ => None,
        }
    }

    pub fn as_message(&self) -> Option<&MessageValue> {
        match self {
            Value::Message(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<MapKey, Value>> {
        match self {
            Value::Map(v) => Some(v),
            _ => None,
        }
    }
}

/// Key of a decoded map field.
///
/// Map keys are restricted to the integral scalars, bool, and string; keeping
/// them in a dedicated ordered enum lets 64-bit keys stay native integers
/// instead of being stringified.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MapKey {
    Bool(bool),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    String(String),
}

impl MapKey {
    /// Converts a decoded key value into a map key.
    ///
    /// Returns `None` for value variants that are not legal key types.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(v) => Some(Self::Bool(v)),
            Value::I32(v) => Some(Self::I32(v)),
            Value::U32(v) => Some(Self::U32(v)),
            Value::I64(v) => Some(Self::I64(v)),
            Value::U64(v) => Some(Self::U64(v)),
            Value::String(v) => Some(Self::String(v)),
            _ => None,
        }
    }
}

/// A decoded message instance.
///
/// Field slots are keyed by field name; absent fields are simply absent.
/// Equality is field-by-field, list-equal for repeated fields and
/// set-equal for maps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MessageValue {
    /// Fully-qualified name of the message type this value was decoded as.
    pub type_name: String,
    /// Decoded field slots.
    pub fields: BTreeMap<String, Value>,
}

impl MessageValue {
    /// Creates an empty instance for the named type.
    #[must_use]
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Returns the value of a field, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Sets a field slot, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Appends a value to a repeated field slot, creating the list on first use.
    pub fn push(&mut self, name: &str, value: Value) {
        match self.fields.get_mut(name) {
            Some(Value::List(items)) => items.push(value),
            _ => {
                self.fields
                    .insert(name.to_string(), Value::List(vec![value]));
            }
        }
    }

    /// Inserts an entry into a map field slot, creating the map on first use.
    pub fn insert_map_entry(&mut self, name: &str, key: MapKey, value: Value) {
        match self.fields.get_mut(name) {
            Some(Value::Map(entries)) => {
                entries.insert(key, value);
            }
            _ => {
                let mut entries = BTreeMap::new();
                entries.insert(key, value);
                self.fields.insert(name.to_string(), Value::Map(entries));
            }
        }
    }
}
