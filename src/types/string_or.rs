//! A value that travels either as a plain string or as a typed JSON value.
//!
//! The platform accepts `"auto"` wherever a numeric hyper-parameter may be
//! chosen by the server, so fields like `n_epochs` are `StringOr<i64>`.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Either a string or a `T`; never both.
///
/// Decoding `null` leaves both sides unset. A JSON string decodes into the
/// string side; any other token is decoded as `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct StringOr<T> {
    string: Option<String>,
    value: Option<T>,
}

impl<T> Default for StringOr<T> {
    fn default() -> Self {
        Self {
            string: None,
            value: None,
        }
    }
}

impl<T> StringOr<T> {
    pub fn string(s: impl Into<String>) -> Self {
        Self {
            string: Some(s.into()),
            value: None,
        }
    }

    pub fn value(v: T) -> Self {
        Self {
            string: None,
            value: Some(v),
        }
    }

    /// Set the string side, clearing any value.
    pub fn set_string(&mut self, s: impl Into<String>) {
        self.string = Some(s.into());
        self.value = None;
    }

    /// Set the value side, clearing any string.
    pub fn set_value(&mut self, v: T) {
        self.value = Some(v);
        self.string = None;
    }

    pub fn as_string(&self) -> Option<&str> {
        self.string.as_deref()
    }

    pub fn as_value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn is_unset(&self) -> bool {
        self.string.is_none() && self.value.is_none()
    }
}

impl<T: Serialize> Serialize for StringOr<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match (&self.value, &self.string) {
            (Some(v), _) => v.serialize(serializer),
            (None, Some(s)) => serializer.serialize_str(s),
            (None, None) => serializer.serialize_none(),
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for StringOr<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
        match raw {
            None | Some(serde_json::Value::Null) => Ok(Self::default()),
            Some(serde_json::Value::String(s)) => Ok(Self::string(s)),
            Some(other) => serde_json::from_value(other)
                .map(Self::value)
                .map_err(D::Error::custom),
        }
    }
}

impl<T> From<T> for StringOr<T> {
    fn from(v: T) -> Self {
        Self::value(v)
    }
}
