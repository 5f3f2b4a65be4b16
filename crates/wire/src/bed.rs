//! Bed records and occupancy rules.
//!
//! A bed's `status_c` and `patient_id_c` move together:
//!
//! ```text
//! Available --assign(patient)--> Occupied
//! Occupied  --release-------->  Available
//! ```
//!
//! Any write touching one of the two must touch the other consistently: `Occupied`
//! always comes with a patient, every other status with a cleared link.

use crate::codec::{relation_field, resolve_relation, text, Relation};
use crate::constants::BED_TABLE;
use crate::patch::Assignments;
use crate::{Entity, Patch, RecordInput, WireError, WireResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use utoipa::ToSchema;
use ward_types::{Field, IntLike, LooseText, RecordId};

/// Bed status as kept in `status_c`. Unknown values are preserved verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum BedStatus {
    Available,
    Occupied,
    Cleaning,
    Maintenance,
    Reserved,
    Other(String),
}

impl BedStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BedStatus::Available => "Available",
            BedStatus::Occupied => "Occupied",
            BedStatus::Cleaning => "Cleaning",
            BedStatus::Maintenance => "Maintenance",
            BedStatus::Reserved => "Reserved",
            BedStatus::Other(s) => s,
        }
    }
}

impl From<String> for BedStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Available" => BedStatus::Available,
            "Occupied" => BedStatus::Occupied,
            "Cleaning" => BedStatus::Cleaning,
            "Maintenance" => BedStatus::Maintenance,
            "Reserved" => BedStatus::Reserved,
            _ => BedStatus::Other(value),
        }
    }
}

impl From<&str> for BedStatus {
    fn from(value: &str) -> Self {
        BedStatus::from(value.to_owned())
    }
}

impl From<BedStatus> for String {
    fn from(value: BedStatus) -> Self {
        match value {
            BedStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl fmt::Display for BedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored shape of a `bed_c` row.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct StoredBed {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: Option<LooseText>,
    pub number_c: Option<LooseText>,
    pub room_type_c: Option<LooseText>,
    pub floor_c: Option<IntLike>,
    pub status_c: Option<BedStatus>,
    pub assigned_nurse_c: Option<LooseText>,
    pub patient_id_c: Option<Relation>,
}

/// View shape of a bed.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Bed {
    #[serde(rename = "Id")]
    #[schema(value_type = i64)]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    pub number: Option<String>,
    pub room_type: Option<String>,
    pub floor: Option<i64>,
    #[schema(value_type = Option<String>)]
    pub status: Option<BedStatus>,
    pub assigned_nurse: Option<String>,
    /// Patient occupying the bed; `null` when unoccupied.
    #[schema(value_type = Option<i64>)]
    pub patient_id: Option<RecordId>,
}

impl Bed {
    pub fn is_occupied(&self) -> bool {
        self.patient_id.is_some()
    }
}

impl Entity for Bed {
    const TABLE: &'static str = BED_TABLE;
    const LABEL: &'static str = "bed";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "number_c",
        "room_type_c",
        "floor_c",
        "status_c",
        "assigned_nurse_c",
        "patient_id_c",
    ];
    const ORDER: &'static [crate::OrderKey] = &[crate::OrderKey::asc("number_c")];

    type Stored = StoredBed;
    type Input = BedInput;

    fn from_stored(stored: StoredBed) -> Self {
        Bed {
            id: stored.id,
            name: text(stored.name),
            number: text(stored.number_c),
            room_type: text(stored.room_type_c),
            floor: stored.floor_c.and_then(|f| f.coerce()),
            status: stored.status_c,
            assigned_nurse: text(stored.assigned_nurse_c),
            patient_id: resolve_relation(stored.patient_id_c.as_ref()),
        }
    }

    fn to_stored(&self) -> StoredBed {
        StoredBed {
            id: self.id,
            name: self.name.clone().map(LooseText::from),
            number_c: self.number.clone().map(LooseText::from),
            room_type_c: self.room_type.clone().map(LooseText::from),
            floor_c: self.floor.map(IntLike::Int),
            status_c: self.status.clone(),
            assigned_nurse_c: self.assigned_nurse.clone().map(LooseText::from),
            patient_id_c: self.patient_id.map(Relation::from),
        }
    }
}

/// Stored-name half of a bed input.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoredBedChanges {
    pub number_c: Field<LooseText>,
    pub room_type_c: Field<LooseText>,
    pub floor_c: Field<IntLike>,
    pub status_c: Field<BedStatus>,
    pub assigned_nurse_c: Field<LooseText>,
    pub patient_id_c: Field<Relation>,
}

/// View-name bed changes; also the resolved form of a [`BedInput`].
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BedChanges {
    pub number: Field<LooseText>,
    pub room_type: Field<LooseText>,
    pub floor: Field<IntLike>,
    pub status: Field<BedStatus>,
    pub assigned_nurse: Field<LooseText>,
    pub patient_id: Field<IntLike>,
}

impl BedChanges {
    /// Link `patient` and mark the bed occupied.
    pub fn assign(patient: RecordId) -> Self {
        BedChanges {
            patient_id: Field::Value(patient.into()),
            status: Field::Value(BedStatus::Occupied),
            ..Default::default()
        }
    }

    /// Clear the patient link and mark the bed available.
    pub fn release() -> Self {
        BedChanges {
            patient_id: Field::Null,
            status: Field::Value(BedStatus::Available),
            ..Default::default()
        }
    }

    /// Reject changes that would leave `status` and the patient link disagreeing.
    pub fn check_occupancy(&self) -> WireResult<()> {
        match (&self.status, &self.patient_id) {
            (Field::Absent, Field::Absent) => Ok(()),
            (Field::Value(BedStatus::Occupied), Field::Value(_)) => Ok(()),
            (Field::Value(BedStatus::Occupied), _) => Err(WireError::Occupancy(
                "status Occupied requires a patient in the same change",
            )),
            (Field::Value(_), Field::Null) => Ok(()),
            (Field::Value(_), Field::Value(_)) => Err(WireError::Occupancy(
                "assigning a patient requires status Occupied",
            )),
            (Field::Value(_), Field::Absent) => Err(WireError::Occupancy(
                "status must change together with the patient link",
            )),
            (Field::Null, _) => Err(WireError::Occupancy("status cannot be cleared")),
            (Field::Absent, _) => Err(WireError::Occupancy(
                "the patient link must change together with status",
            )),
        }
    }

    fn assign_columns(self, a: &mut Assignments) -> WireResult<()> {
        a.text("number_c", self.number)
            .text("room_type_c", self.room_type);
        a.int("floor_c", self.floor)?;
        a.put("status_c", self.status.map(|s| Value::String(s.into())))
            .text("assigned_nurse_c", self.assigned_nurse);
        a.int("patient_id_c", self.patient_id)?;
        Ok(())
    }
}

/// Bed input in either naming convention.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BedInput {
    #[serde(flatten)]
    pub stored: StoredBedChanges,
    #[serde(flatten)]
    pub changes: BedChanges,
}

impl BedInput {
    /// Collapse both naming conventions into one set of changes; stored names win.
    pub fn resolve(self) -> BedChanges {
        let BedInput { stored, changes } = self;
        BedChanges {
            number: stored.number_c.or(changes.number),
            room_type: stored.room_type_c.or(changes.room_type),
            floor: stored.floor_c.or(changes.floor),
            status: stored.status_c.or(changes.status),
            assigned_nurse: stored.assigned_nurse_c.or(changes.assigned_nurse),
            patient_id: relation_field(stored.patient_id_c, changes.patient_id),
        }
    }
}

impl From<BedChanges> for BedInput {
    fn from(changes: BedChanges) -> Self {
        BedInput {
            stored: StoredBedChanges::default(),
            changes,
        }
    }
}

impl RecordInput for BedInput {
    fn into_patch(self, id: RecordId) -> WireResult<Patch> {
        let changes = self.resolve();
        changes.check_occupancy()?;

        let mut a = Assignments::default();
        changes.assign_columns(&mut a)?;
        Ok(a.into_patch(id))
    }

    fn into_new_record(self, _now: DateTime<Utc>) -> WireResult<Map<String, Value>> {
        let mut changes = self.resolve();

        // A new bed is unoccupied unless it is created with a patient.
        let patient = match changes.patient_id {
            Field::Value(p) => Field::Value(p),
            _ => Field::Null,
        };
        if !matches!(changes.status, Field::Value(_)) {
            changes.status = Field::Value(match patient {
                Field::Value(_) => BedStatus::Occupied,
                _ => BedStatus::Available,
            });
        }
        changes.patient_id = patient;
        changes.check_occupancy()?;

        let mut a = Assignments::default();
        changes.assign_columns(&mut a)?;
        Ok(a.into_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn input(value: Value) -> BedInput {
        serde_json::from_value(value).expect("bed input should deserialize")
    }

    fn now() -> DateTime<Utc> {
        "2024-01-15T08:00:00Z".parse().unwrap()
    }

    #[test]
    fn nested_patient_reference_flattens_to_id() {
        let nested = Bed::decode(json!({
            "Id": 5, "number_c": "A-101", "status_c": "Occupied",
            "patient_id_c": {"Id": 42, "Name": "Ada Lovelace"}
        }))
        .unwrap();
        let bare = Bed::decode(json!({
            "Id": 5, "number_c": "A-101", "status_c": "Occupied", "patient_id_c": 42
        }))
        .unwrap();

        assert_eq!(nested.patient_id, Some(RecordId::new(42)));
        assert_eq!(nested, bare);
    }

    #[test]
    fn null_patient_stays_null() {
        let bed = Bed::decode(json!({"Id": 5, "status_c": "Available", "patient_id_c": null}))
            .unwrap();
        assert_eq!(bed.patient_id, None);
        assert!(!bed.is_occupied());
        assert_eq!(bed.to_stored().patient_id_c, None);
    }

    #[test]
    fn unknown_status_is_preserved() {
        let bed = Bed::decode(json!({"Id": 1, "status_c": "Quarantined"})).unwrap();
        assert_eq!(bed.status, Some(BedStatus::Other("Quarantined".into())));
        assert_eq!(serde_json::to_value(&bed).unwrap()["status"], json!("Quarantined"));
    }

    #[test]
    fn view_serializes_camel_case() {
        let bed = Bed::decode(json!({
            "Id": 2, "Name": "Bed 2", "number_c": 2, "room_type_c": "ICU",
            "floor_c": "3", "status_c": "Available", "assigned_nurse_c": "Kim"
        }))
        .unwrap();
        let view = serde_json::to_value(&bed).unwrap();

        assert_eq!(view["Id"], json!(2));
        assert_eq!(view["number"], json!("2"));
        assert_eq!(view["roomType"], json!("ICU"));
        assert_eq!(view["floor"], json!(3));
        assert_eq!(view["assignedNurse"], json!("Kim"));
        assert_eq!(view["patientId"], Value::Null);
    }

    #[test]
    fn assign_writes_both_fields() {
        let patch = BedInput::from(BedChanges::assign(RecordId::new(42)))
            .into_patch(RecordId::new(5))
            .unwrap();

        assert_eq!(patch.len(), 2);
        assert_eq!(patch.get("patient_id_c"), Some(&json!(42)));
        assert_eq!(patch.get("status_c"), Some(&json!("Occupied")));
    }

    #[test]
    fn release_writes_null_link() {
        let patch = BedInput::from(BedChanges::release())
            .into_patch(RecordId::new(5))
            .unwrap();

        assert_eq!(patch.get("patient_id_c"), Some(&Value::Null));
        assert_eq!(patch.get("status_c"), Some(&json!("Available")));
    }

    #[test]
    fn status_alone_is_rejected() {
        let err = input(json!({"status": "Occupied"}))
            .into_patch(RecordId::new(5))
            .expect_err("should reject");
        assert!(matches!(err, WireError::Occupancy(_)));

        let err = input(json!({"status_c": "Available"}))
            .into_patch(RecordId::new(5))
            .expect_err("should reject");
        assert!(matches!(err, WireError::Occupancy(_)));
    }

    #[test]
    fn patient_without_occupied_is_rejected() {
        let err = input(json!({"patientId": 42, "status": "Available"}))
            .into_patch(RecordId::new(5))
            .expect_err("should reject");
        assert!(matches!(err, WireError::Occupancy(_)));

        let err = input(json!({"patient_id_c": null}))
            .into_patch(RecordId::new(5))
            .expect_err("should reject");
        assert!(matches!(err, WireError::Occupancy(_)));
    }

    #[test]
    fn maintenance_with_cleared_link_is_allowed() {
        let patch = input(json!({"status": "Maintenance", "patientId": null}))
            .into_patch(RecordId::new(5))
            .unwrap();
        assert_eq!(patch.get("status_c"), Some(&json!("Maintenance")));
        assert_eq!(patch.get("patient_id_c"), Some(&Value::Null));
    }

    #[test]
    fn every_non_occupied_status_may_clear_the_link() {
        for status in ["Available", "Cleaning", "Reserved", "Out of order"] {
            let changes = input(json!({"status": status, "patientId": null})).resolve();
            assert!(changes.check_occupancy().is_ok(), "{status} with no patient");
        }

        let err = input(json!({"status": "Occupied", "patientId": null}))
            .resolve()
            .check_occupancy()
            .expect_err("occupied bed needs a patient");
        assert!(matches!(err, WireError::Occupancy(_)));
    }

    #[test]
    fn unrelated_fields_patch_without_occupancy_fields() {
        let patch = input(json!({"assignedNurse": "Morgan"}))
            .into_patch(RecordId::new(5))
            .unwrap();
        assert_eq!(patch.len(), 1);
        assert_eq!(patch.get("assigned_nurse_c"), Some(&json!("Morgan")));
    }

    #[test]
    fn stored_names_win_over_view_names() {
        let patch = input(json!({"floor_c": 2, "floor": 7}))
            .into_patch(RecordId::new(5))
            .unwrap();
        assert_eq!(patch.get("floor_c"), Some(&json!(2)));
    }

    #[test]
    fn string_patient_id_is_coerced() {
        let patch = input(json!({"patientId": "42", "status": "Occupied"}))
            .into_patch(RecordId::new(5))
            .unwrap();
        assert_eq!(patch.get("patient_id_c"), Some(&json!(42)));
    }

    #[test]
    fn new_bed_defaults_to_available_and_unlinked() {
        let record = input(json!({"number": "B-7", "roomType": "General", "floor": 1}))
            .into_new_record(now())
            .unwrap();

        assert_eq!(record.get("status_c"), Some(&json!("Available")));
        assert_eq!(record.get("patient_id_c"), Some(&Value::Null));
        assert_eq!(record.get("number_c"), Some(&json!("B-7")));
        assert_eq!(record.get("assigned_nurse_c"), None);
    }

    #[test]
    fn new_bed_with_patient_defaults_to_occupied() {
        let record = input(json!({"number": "B-8", "patientId": 42}))
            .into_new_record(now())
            .unwrap();

        assert_eq!(record.get("status_c"), Some(&json!("Occupied")));
        assert_eq!(record.get("patient_id_c"), Some(&json!(42)));
    }
}
