//! Request body assembly shared by every endpoint.
//!
//! Required keys are always written; optional keys only when a value was
//! set. An unset optional never turns into a `null` on the wire.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, ErrorContext};
use crate::Result;

/// JSON object builder for request bodies.
///
/// Serialization failures are remembered and reported by [`BodyBuilder::build`]
/// so call sites can chain without checking each key.
#[derive(Debug, Default)]
pub struct BodyBuilder {
    body: Map<String, Value>,
    error: Option<(String, serde_json::Error)>,
}

impl BodyBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Always present.
    pub fn required<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
        self.insert(key, value);
        self
    }

    /// Present only when `Some`.
    pub fn optional<T: Serialize>(mut self, key: &str, value: Option<&T>) -> Self {
        if let Some(value) = value {
            self.insert(key, value);
        }
        self
    }

    /// Present only when the list has elements.
    pub fn non_empty<T: Serialize>(mut self, key: &str, values: &[T]) -> Self {
        if !values.is_empty() {
            self.insert(key, values);
        }
        self
    }

    /// Nest an already built object; skipped when it has no keys.
    pub fn nested(mut self, key: &str, inner: BodyBuilder) -> Self {
        match inner.build() {
            Ok(map) if map.is_empty() => {}
            Ok(map) => {
                self.body.insert(key.to_string(), Value::Object(map));
            }
            Err(Error::Serialization(e)) if self.error.is_none() => {
                self.error = Some((key.to_string(), e));
            }
            Err(_) => {}
        }
        self
    }

    fn insert<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        if self.error.is_some() {
            return;
        }
        match serde_json::to_value(value) {
            Ok(v) => {
                self.body.insert(key.to_string(), v);
            }
            Err(e) => self.error = Some((key.to_string(), e)),
        }
    }

    pub fn build(self) -> Result<Map<String, Value>> {
        match self.error {
            Some((key, e)) => {
                tracing::warn!(field = %key, error = %e, "request body field failed to serialize");
                Err(Error::Serialization(e))
            }
            None => Ok(self.body),
        }
    }

    /// Like [`BodyBuilder::build`], rejecting bodies missing any of `keys`.
    pub fn build_requiring(self, keys: &[&str]) -> Result<Map<String, Value>> {
        let body = self.build()?;
        for key in keys {
            let present = match body.get(*key) {
                None | Some(Value::Null) => false,
                Some(Value::String(s)) => !s.is_empty(),
                Some(_) => true,
            };
            if !present {
                return Err(Error::validation_with_context(
                    format!("missing required field `{key}`"),
                    ErrorContext::new()
                        .with_field_path(*key)
                        .with_source("body_builder"),
                ));
            }
        }
        Ok(body)
    }
}
