//! Wire/boundary support for the ward data layer.
//!
//! Every record exists in two shapes:
//! - the **stored shape** kept by the hosted store: flat `*_c` columns, relation columns
//!   as a bare identifier or a nested `{Id, Name}` reference, lists as comma-joined text
//!   and maps as JSON text
//! - the **view shape** handed to presentation code: camelCase fields, relations as bare
//!   integers, lists and maps materialised
//!
//! This crate owns the translation between the two (the field mapper) and the building
//! of minimal stored-name assignment sets from caller input (the partial-update builder).
//! Nothing outside this crate spells a stored column name.

pub mod appointment;
pub mod bed;
pub mod codec;
pub mod constants;
pub mod doctor;
pub mod medical_record;
pub mod patch;
pub mod patient;

pub use appointment::{Appointment, AppointmentChanges, AppointmentInput, StoredAppointment};
pub use bed::{Bed, BedChanges, BedInput, BedStatus, StoredBed};
pub use codec::{Relation, RelationRef};
pub use doctor::{Doctor, DoctorChanges, DoctorInput, StoredDoctor};
pub use medical_record::{
    MedicalRecord, MedicalRecordChanges, MedicalRecordInput, StoredMedicalRecord,
};
pub use patch::Patch;
pub use patient::{Patient, PatientChanges, PatientInput, StoredPatient};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use ward_types::{IdError, RecordId};

/// Errors returned by the wire crate.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    #[error("{field} must be an integer, got '{value}'")]
    NotAnInteger { field: &'static str, value: String },

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error("inconsistent bed occupancy change: {0}")]
    Occupancy(&'static str),

    #[error("invalid identifier: {0}")]
    Id(#[from] IdError),

    #[error("{entity} record does not match the stored schema at {path}: {message}")]
    StoredShape {
        entity: &'static str,
        path: String,
        message: String,
    },
}

/// Type alias for Results that can fail with a [`WireError`].
pub type WireResult<T> = Result<T, WireError>;

/// One ordering key for list reads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderKey {
    pub field: &'static str,
    pub descending: bool,
}

impl OrderKey {
    pub const fn asc(field: &'static str) -> Self {
        Self {
            field,
            descending: false,
        }
    }

    pub const fn desc(field: &'static str) -> Self {
        Self {
            field,
            descending: true,
        }
    }
}

/// A record kind held in one remote table.
///
/// Implemented by each view type. Ties together the table name, the stored field set,
/// the stored shape, the caller input type and the two directions of the field mapper.
pub trait Entity: Serialize + Sized + Send + Sync + 'static {
    /// Remote table name.
    const TABLE: &'static str;
    /// Human-readable name used in logs and errors.
    const LABEL: &'static str;
    /// Stored field names requested by full reads.
    const FIELDS: &'static [&'static str];
    /// Ordering applied to list reads.
    const ORDER: &'static [OrderKey] = &[];

    type Stored: DeserializeOwned + Serialize;
    type Input: RecordInput + DeserializeOwned + Default + Send + 'static;

    /// Field mapper, stored → view.
    fn from_stored(stored: Self::Stored) -> Self;

    /// Field mapper, view → stored.
    fn to_stored(&self) -> Self::Stored;

    /// Decode a raw record returned by the store straight into the view shape.
    fn decode(raw: Value) -> WireResult<Self> {
        decode_stored::<Self::Stored>(Self::LABEL, raw).map(Self::from_stored)
    }
}

/// Caller input accepted by create and update, in either naming convention.
pub trait RecordInput {
    /// Partial-update builder: assignments for the fields the caller supplied.
    fn into_patch(self, id: RecordId) -> WireResult<Patch>;

    /// Full stored record for creation, with defaults filled in.
    fn into_new_record(self, now: DateTime<Utc>) -> WireResult<Map<String, Value>>;
}

/// Decode a raw stored record, reporting the path of the first mismatching field.
pub fn decode_stored<T: DeserializeOwned>(entity: &'static str, raw: Value) -> WireResult<T> {
    serde_path_to_error::deserialize(raw).map_err(|err| {
        let path = err.path().to_string();
        let path = if path.is_empty() || path == "." {
            "<root>".to_owned()
        } else {
            path
        };
        WireError::StoredShape {
            entity,
            path,
            message: err.into_inner().to_string(),
        }
    })
}
