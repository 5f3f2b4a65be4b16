use crate::codec::{relation_field, resolve_relation, text, Relation};
use crate::constants::{APPOINTMENT_TABLE, DEFAULT_APPOINTMENT_DURATION, DEFAULT_APPOINTMENT_STATUS};
use crate::patch::Assignments;
use crate::{Entity, OrderKey, Patch, RecordInput, WireResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use ward_types::{Field, IntLike, LooseText, RecordId};

/// Stored shape of an `appointment_c` row.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct StoredAppointment {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: Option<LooseText>,
    pub patient_id_c: Option<Relation>,
    pub doctor_id_c: Option<Relation>,
    pub date_c: Option<LooseText>,
    pub time_c: Option<LooseText>,
    pub duration_c: Option<IntLike>,
    pub reason_c: Option<LooseText>,
    pub status_c: Option<LooseText>,
    pub notes_c: Option<LooseText>,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    #[serde(rename = "Id")]
    #[schema(value_type = i64)]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub patient_id: Option<RecordId>,
    #[schema(value_type = Option<i64>)]
    pub doctor_id: Option<RecordId>,
    pub date: Option<String>,
    pub time: Option<String>,
    /// Length in minutes.
    pub duration: Option<i64>,
    pub reason: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl Entity for Appointment {
    const TABLE: &'static str = APPOINTMENT_TABLE;
    const LABEL: &'static str = "appointment";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "patient_id_c",
        "doctor_id_c",
        "date_c",
        "time_c",
        "duration_c",
        "reason_c",
        "status_c",
        "notes_c",
    ];
    const ORDER: &'static [OrderKey] = &[OrderKey::asc("date_c"), OrderKey::asc("time_c")];

    type Stored = StoredAppointment;
    type Input = AppointmentInput;

    fn from_stored(stored: StoredAppointment) -> Self {
        Appointment {
            id: stored.id,
            name: text(stored.name),
            patient_id: resolve_relation(stored.patient_id_c.as_ref()),
            doctor_id: resolve_relation(stored.doctor_id_c.as_ref()),
            date: text(stored.date_c),
            time: text(stored.time_c),
            duration: stored.duration_c.and_then(|d| d.coerce()),
            reason: text(stored.reason_c),
            status: text(stored.status_c),
            notes: text(stored.notes_c),
        }
    }

    fn to_stored(&self) -> StoredAppointment {
        let loose = |v: &Option<String>| v.clone().map(LooseText::from);
        StoredAppointment {
            id: self.id,
            name: loose(&self.name),
            patient_id_c: self.patient_id.map(Relation::from),
            doctor_id_c: self.doctor_id.map(Relation::from),
            date_c: loose(&self.date),
            time_c: loose(&self.time),
            duration_c: self.duration.map(IntLike::Int),
            reason_c: loose(&self.reason),
            status_c: loose(&self.status),
            notes_c: loose(&self.notes),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoredAppointmentChanges {
    pub patient_id_c: Field<Relation>,
    pub doctor_id_c: Field<Relation>,
    pub date_c: Field<LooseText>,
    pub time_c: Field<LooseText>,
    pub duration_c: Field<IntLike>,
    pub reason_c: Field<LooseText>,
    pub status_c: Field<LooseText>,
    pub notes_c: Field<LooseText>,
}

/// View-name appointment changes; also the resolved form of an [`AppointmentInput`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppointmentChanges {
    pub patient_id: Field<IntLike>,
    pub doctor_id: Field<IntLike>,
    pub date: Field<LooseText>,
    pub time: Field<LooseText>,
    pub duration: Field<IntLike>,
    pub reason: Field<LooseText>,
    pub status: Field<LooseText>,
    pub notes: Field<LooseText>,
}

/// Appointment input in either naming convention.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AppointmentInput {
    #[serde(flatten)]
    pub stored: StoredAppointmentChanges,
    #[serde(flatten)]
    pub changes: AppointmentChanges,
}

impl AppointmentInput {
    pub fn resolve(self) -> AppointmentChanges {
        let AppointmentInput { stored: s, changes: c } = self;
        AppointmentChanges {
            patient_id: relation_field(s.patient_id_c, c.patient_id),
            doctor_id: relation_field(s.doctor_id_c, c.doctor_id),
            date: s.date_c.or(c.date),
            time: s.time_c.or(c.time),
            duration: s.duration_c.or(c.duration),
            reason: s.reason_c.or(c.reason),
            status: s.status_c.or(c.status),
            notes: s.notes_c.or(c.notes),
        }
    }
}

impl From<AppointmentChanges> for AppointmentInput {
    fn from(changes: AppointmentChanges) -> Self {
        AppointmentInput {
            stored: StoredAppointmentChanges::default(),
            changes,
        }
    }
}

impl RecordInput for AppointmentInput {
    fn into_patch(self, id: RecordId) -> WireResult<Patch> {
        let c = self.resolve();
        let mut a = Assignments::default();
        a.int("patient_id_c", c.patient_id)?
            .int("doctor_id_c", c.doctor_id)?
            .text("date_c", c.date)
            .text("time_c", c.time)
            .int("duration_c", c.duration)?
            .text("reason_c", c.reason)
            .text("status_c", c.status)
            .text("notes_c", c.notes);
        Ok(a.into_patch(id))
    }

    fn into_new_record(self, _now: DateTime<Utc>) -> WireResult<Map<String, Value>> {
        let c = self.resolve();
        let mut a = Assignments::default();
        a.required_int("patient_id_c", c.patient_id)?
            .required_int("doctor_id_c", c.doctor_id)?
            .text("date_c", c.date)
            .text("time_c", c.time)
            .int_or("duration_c", c.duration, DEFAULT_APPOINTMENT_DURATION)?
            .text("reason_c", c.reason)
            .text_or("status_c", c.status, DEFAULT_APPOINTMENT_STATUS)
            .text("notes_c", c.notes);
        Ok(a.into_record())
    }
}
