//! Partial-update building.
//!
//! A [`Patch`] is the minimal set of stored-name assignments for one record. Fields the
//! caller never mentioned are not in it; fields the caller set to `null` are in it as
//! `null`. Integer fields are coerced while assigning, and the first failed coercion
//! aborts the whole patch.

use crate::codec::coerce_int;
use crate::WireResult;
use serde_json::{Map, Value};
use ward_types::{Field, IntLike, LooseText, RecordId};

/// Stored-name key of the platform record identifier.
pub const ID_FIELD: &str = "Id";

/// Assignments for one existing record.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch {
    id: RecordId,
    assignments: Map<String, Value>,
}

impl Patch {
    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn assignments(&self) -> &Map<String, Value> {
        &self.assignments
    }

    /// Assigned value for a stored field name, if the patch touches it.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.assignments.get(field)
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// The record as submitted to the store: `Id` plus every assignment.
    pub fn into_record(self) -> Map<String, Value> {
        let mut record = self.assignments;
        record.insert(ID_FIELD.to_owned(), Value::from(self.id.get()));
        record
    }
}

/// Collects stored-name assignments, skipping absent fields.
#[derive(Debug, Default)]
pub(crate) struct Assignments(Map<String, Value>);

impl Assignments {
    pub(crate) fn put(&mut self, field: &'static str, value: Field<Value>) -> &mut Self {
        match value {
            Field::Absent => {}
            Field::Null => {
                self.0.insert(field.to_owned(), Value::Null);
            }
            Field::Value(v) => {
                self.0.insert(field.to_owned(), v);
            }
        }
        self
    }

    pub(crate) fn text(&mut self, field: &'static str, value: Field<LooseText>) -> &mut Self {
        self.put(field, value.map(|t| Value::String(t.into_string())))
    }

    /// Like [`Assignments::text`], but absent and null both fall back to `default`.
    pub(crate) fn text_or(
        &mut self,
        field: &'static str,
        value: Field<LooseText>,
        default: impl Into<String>,
    ) -> &mut Self {
        let value = value.value().map_or_else(|| default.into(), LooseText::into_string);
        self.put(field, Field::Value(Value::String(value)))
    }

    pub(crate) fn int(
        &mut self,
        field: &'static str,
        value: Field<IntLike>,
    ) -> WireResult<&mut Self> {
        let value = value.try_map(|v| coerce_int(field, &v))?;
        Ok(self.put(field, value.map(Value::from)))
    }

    pub(crate) fn int_or(
        &mut self,
        field: &'static str,
        value: Field<IntLike>,
        default: i64,
    ) -> WireResult<&mut Self> {
        let value = match value.value() {
            Some(v) => coerce_int(field, &v)?,
            None => default,
        };
        Ok(self.put(field, Field::Value(Value::from(value))))
    }

    /// An integer that must be supplied on creation.
    pub(crate) fn required_int(
        &mut self,
        field: &'static str,
        value: Field<IntLike>,
    ) -> WireResult<&mut Self> {
        match value.value() {
            Some(v) => {
                let v = coerce_int(field, &v)?;
                Ok(self.put(field, Field::Value(Value::from(v))))
            }
            None => Err(crate::WireError::MissingField { field }),
        }
    }

    pub(crate) fn into_patch(self, id: RecordId) -> Patch {
        Patch {
            id,
            assignments: self.0,
        }
    }

    pub(crate) fn into_record(self) -> Map<String, Value> {
        self.0
    }
}
