use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors raised when a value cannot be used as a record identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("identifier '{0}' is not numeric")]
    NotNumeric(String),
}

impl IdError {
    /// The text that failed to parse.
    pub fn raw(&self) -> &str {
        match self {
            IdError::NotNumeric(raw) => raw,
        }
    }
}

/// Integer identifier assigned by the hosted store.
///
/// Serializes as a bare JSON number. Deserializes from a number or from numeric text,
/// since identifiers routinely arrive as strings from route parameters and form inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IntLike::Text(s.to_owned())
            .coerce()
            .map(RecordId)
            .ok_or_else(|| IdError::NotNumeric(s.to_owned()))
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<RecordId> for i64 {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IntLike::deserialize(deserializer)?;
        raw.coerce()
            .map(RecordId)
            .ok_or_else(|| serde::de::Error::custom(IdError::NotNumeric(raw.to_string())))
    }
}

/// Anything a caller may hand over as a record identifier.
///
/// Service entry points accept `impl ToRecordId` so that route parameters (`"42"`),
/// integers and already-parsed [`RecordId`]s can all be passed directly.
pub trait ToRecordId {
    fn to_record_id(&self) -> Result<RecordId, IdError>;
}

impl ToRecordId for RecordId {
    fn to_record_id(&self) -> Result<RecordId, IdError> {
        Ok(*self)
    }
}

impl ToRecordId for i64 {
    fn to_record_id(&self) -> Result<RecordId, IdError> {
        Ok(RecordId(*self))
    }
}

impl ToRecordId for i32 {
    fn to_record_id(&self) -> Result<RecordId, IdError> {
        Ok(RecordId(i64::from(*self)))
    }
}

impl ToRecordId for u32 {
    fn to_record_id(&self) -> Result<RecordId, IdError> {
        Ok(RecordId(i64::from(*self)))
    }
}

impl ToRecordId for str {
    fn to_record_id(&self) -> Result<RecordId, IdError> {
        self.parse()
    }
}

impl ToRecordId for String {
    fn to_record_id(&self) -> Result<RecordId, IdError> {
        self.parse()
    }
}

impl ToRecordId for IntLike {
    fn to_record_id(&self) -> Result<RecordId, IdError> {
        self.coerce()
            .map(RecordId)
            .ok_or_else(|| IdError::NotNumeric(self.to_string()))
    }
}

impl<T: ToRecordId + ?Sized> ToRecordId for &T {
    fn to_record_id(&self) -> Result<RecordId, IdError> {
        (**self).to_record_id()
    }
}

/// An integer as it may arrive from loosely typed callers: a JSON integer, a float
/// or a numeric string.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum IntLike {
    Int(i64),
    Float(f64),
    Text(String),
}

impl IntLike {
    /// Coerce to an integer.
    ///
    /// Floats are truncated toward zero. Text is trimmed and parsed as an integer, then
    /// as a float. Returns `None` for empty, non-numeric or non-finite input.
    pub fn coerce(&self) -> Option<i64> {
        match self {
            IntLike::Int(i) => Some(*i),
            IntLike::Float(f) => float_to_int(*f),
            IntLike::Text(s) => {
                let s = s.trim();
                if s.is_empty() {
                    return None;
                }
                s.parse::<i64>()
                    .ok()
                    .or_else(|| s.parse::<f64>().ok().and_then(float_to_int))
            }
        }
    }
}

fn float_to_int(f: f64) -> Option<i64> {
    if f.is_finite() && f.abs() < i64::MAX as f64 {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

impl fmt::Display for IntLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntLike::Int(i) => write!(f, "{i}"),
            IntLike::Float(x) => write!(f, "{x}"),
            IntLike::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for IntLike {
    fn from(value: i64) -> Self {
        IntLike::Int(value)
    }
}

impl From<RecordId> for IntLike {
    fn from(value: RecordId) -> Self {
        IntLike::Int(value.get())
    }
}

impl From<&str> for IntLike {
    fn from(value: &str) -> Self {
        IntLike::Text(value.to_owned())
    }
}
