// Copyright (c) 2026 Oleksandr Melnychenko, Ukraine
// Ecliptix Security — OPAQUE Session Bridge
// Licensed under the MIT License

use std::fmt;

use bridge_core::{BridgeError, BridgeResult, Identifier, SecureBytes};
use zeroize::Zeroize;

/// A value crossing the host boundary.
///
/// Byte buffers are zeroized when the value is dropped and redacted in
/// `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    Text(String),
    Bytes(Vec<u8>),
    /// Named fields, in the order the call produced them.
    Map(Vec<(String, Value)>),
}

impl Value {
    pub(crate) fn map<const N: usize>(fields: [(&str, Value); N]) -> Self {
        Value::Map(
            fields
                .into_iter()
                .map(|(name, value)| (name.to_owned(), value))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(value) => Some(value.as_slice()),
            _ => None,
        }
    }

    /// Looks up a named field of a [`Value::Map`].
    pub fn field(&self, name: &str) -> Option<&Value> {
        match self {
            Value::Map(fields) => fields
                .iter()
                .find(|(field, _)| field == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Map(_) => "map",
        }
    }
}

impl Drop for Value {
    fn drop(&mut self) {
        if let Value::Bytes(bytes) = self {
            bytes.zeroize();
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("Null"),
            Value::Bool(value) => write!(f, "Bool({value})"),
            Value::Text(value) => write!(f, "Text({value:?})"),
            Value::Bytes(bytes) => write!(f, "Bytes([REDACTED; {}])", bytes.len()),
            Value::Map(fields) => f.debug_map().entries(fields.iter().map(|(k, v)| (k, v))).finish(),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<Identifier> for Value {
    fn from(value: Identifier) -> Self {
        Value::Text(value.into_string())
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&SecureBytes> for Value {
    fn from(value: &SecureBytes) -> Self {
        Value::Bytes(value.to_vec())
    }
}

/// Positional arguments of one call, checked for count up front and for type
/// on access.
pub(crate) struct Args<'a> {
    values: &'a [Value],
}

impl<'a> Args<'a> {
    pub(crate) fn expect(call: &str, values: &'a [Value], count: usize) -> BridgeResult<Self> {
        if values.len() != count {
            return Err(BridgeError::InvalidArgument(format!(
                "{call} expects {count} arguments, got {}",
                values.len()
            )));
        }
        Ok(Self { values })
    }

    fn wrong_type(&self, index: usize, name: &str, expected: &str) -> BridgeError {
        BridgeError::InvalidArgument(format!(
            "{name} argument must be {expected}, got {}",
            self.values[index].kind()
        ))
    }

    pub(crate) fn text(&self, index: usize, name: &str) -> BridgeResult<&'a str> {
        let values = self.values;
        values[index]
            .as_text()
            .ok_or_else(|| self.wrong_type(index, name, "text"))
    }

    pub(crate) fn bytes(&self, index: usize, name: &str) -> BridgeResult<&'a [u8]> {
        let values = self.values;
        values[index]
            .as_bytes()
            .ok_or_else(|| self.wrong_type(index, name, "bytes"))
    }

    /// Bytes or `Null`.
    pub(crate) fn optional_bytes(&self, index: usize, name: &str) -> BridgeResult<Option<&'a [u8]>> {
        let values = self.values;
        match &values[index] {
            Value::Null => Ok(None),
            Value::Bytes(bytes) => Ok(Some(bytes.as_slice())),
            _ => Err(self.wrong_type(index, name, "bytes or null")),
        }
    }

    /// Text or bytes, as raw bytes. Hosts commonly pass passwords as strings.
    pub(crate) fn secret(&self, index: usize, name: &str) -> BridgeResult<&'a [u8]> {
        let values = self.values;
        match &values[index] {
            Value::Text(text) => Ok(text.as_bytes()),
            Value::Bytes(bytes) => Ok(bytes.as_slice()),
            _ => Err(self.wrong_type(index, name, "text or bytes")),
        }
    }
}
