use crate::codec::{
    id_list_field, join_ids, join_list, json_field, json_map_text, list_field, parse_json_map,
    split_ids, split_list, text,
};
use crate::constants::{DOCTOR_TABLE, EMPTY_AVAILABILITY};
use crate::patch::Assignments;
use crate::{Entity, OrderKey, Patch, RecordInput, WireResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use ward_types::{Field, IntLike, LooseText, RecordId};

/// Stored shape of a `doctor_c` row.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct StoredDoctor {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: Option<LooseText>,
    pub name_c: Option<LooseText>,
    pub specialty_c: Option<LooseText>,
    pub phone_c: Option<LooseText>,
    pub email_c: Option<LooseText>,
    pub schedule_c: Option<LooseText>,
    /// JSON text, or an object when the store has already parsed it.
    pub availability_c: Option<Value>,
    pub current_patients_c: Option<LooseText>,
}

/// View shape of a doctor.
///
/// The platform display name (`Name`) and the doctor's own `name` are separate columns.
#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[serde(rename = "Id")]
    #[schema(value_type = i64)]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub display_name: Option<String>,
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub schedule: Vec<String>,
    #[schema(value_type = Object)]
    pub availability: Map<String, Value>,
    #[schema(value_type = Vec<i64>)]
    pub current_patients: Vec<RecordId>,
}

impl Entity for Doctor {
    const TABLE: &'static str = DOCTOR_TABLE;
    const LABEL: &'static str = "doctor";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "name_c",
        "specialty_c",
        "phone_c",
        "email_c",
        "schedule_c",
        "availability_c",
        "current_patients_c",
    ];
    const ORDER: &'static [OrderKey] = &[OrderKey::asc("name_c")];

    type Stored = StoredDoctor;
    type Input = DoctorInput;

    fn from_stored(stored: StoredDoctor) -> Self {
        Doctor {
            id: stored.id,
            display_name: text(stored.name),
            name: text(stored.name_c),
            specialty: text(stored.specialty_c),
            phone: text(stored.phone_c),
            email: text(stored.email_c),
            schedule: split_list(stored.schedule_c.as_ref().map(LooseText::as_str)),
            availability: parse_json_map(stored.availability_c.as_ref()),
            current_patients: split_ids(stored.current_patients_c.as_ref().map(LooseText::as_str)),
        }
    }

    fn to_stored(&self) -> StoredDoctor {
        let loose = |v: &Option<String>| v.clone().map(LooseText::from);
        StoredDoctor {
            id: self.id,
            name: loose(&self.display_name),
            name_c: loose(&self.name),
            specialty_c: loose(&self.specialty),
            phone_c: loose(&self.phone),
            email_c: loose(&self.email),
            schedule_c: Some(LooseText::new(join_list(&self.schedule))),
            availability_c: Some(Value::String(json_map_text(&self.availability))),
            current_patients_c: Some(LooseText::new(join_ids(&self.current_patients))),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoredDoctorChanges {
    pub name_c: Field<LooseText>,
    pub specialty_c: Field<LooseText>,
    pub phone_c: Field<LooseText>,
    pub email_c: Field<LooseText>,
    pub schedule_c: Field<LooseText>,
    pub availability_c: Field<Value>,
    pub current_patients_c: Field<LooseText>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DoctorChanges {
    pub name: Field<LooseText>,
    pub specialty: Field<LooseText>,
    pub phone: Field<LooseText>,
    pub email: Field<LooseText>,
    pub schedule: Field<Vec<String>>,
    pub availability: Field<Map<String, Value>>,
    pub current_patients: Field<Vec<IntLike>>,
}

/// Doctor input in either naming convention.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DoctorInput {
    #[serde(flatten)]
    pub stored: StoredDoctorChanges,
    #[serde(flatten)]
    pub changes: DoctorChanges,
}

struct ResolvedDoctor {
    name: Field<LooseText>,
    specialty: Field<LooseText>,
    phone: Field<LooseText>,
    email: Field<LooseText>,
    schedule: Field<LooseText>,
    availability: Field<LooseText>,
    current_patients: Field<LooseText>,
}

impl DoctorInput {
    fn resolve(self) -> WireResult<ResolvedDoctor> {
        let DoctorInput { stored: s, changes: c } = self;
        Ok(ResolvedDoctor {
            name: s.name_c.or(c.name),
            specialty: s.specialty_c.or(c.specialty),
            phone: s.phone_c.or(c.phone),
            email: s.email_c.or(c.email),
            schedule: list_field(s.schedule_c, c.schedule),
            availability: json_field(s.availability_c, c.availability),
            current_patients: id_list_field(
                "current_patients_c",
                s.current_patients_c,
                c.current_patients,
            )?,
        })
    }
}

impl From<DoctorChanges> for DoctorInput {
    fn from(changes: DoctorChanges) -> Self {
        DoctorInput {
            stored: StoredDoctorChanges::default(),
            changes,
        }
    }
}

impl RecordInput for DoctorInput {
    fn into_patch(self, id: RecordId) -> WireResult<Patch> {
        let r = self.resolve()?;
        let mut a = Assignments::default();
        a.text("name_c", r.name)
            .text("specialty_c", r.specialty)
            .text("phone_c", r.phone)
            .text("email_c", r.email)
            .text("schedule_c", r.schedule)
            .text("availability_c", r.availability)
            .text("current_patients_c", r.current_patients);
        Ok(a.into_patch(id))
    }

    fn into_new_record(self, _now: DateTime<Utc>) -> WireResult<Map<String, Value>> {
        let r = self.resolve()?;
        let mut a = Assignments::default();
        a.text("name_c", r.name)
            .text("specialty_c", r.specialty)
            .text("phone_c", r.phone)
            .text("email_c", r.email)
            .text_or("schedule_c", r.schedule, "")
            .text_or("availability_c", r.availability, EMPTY_AVAILABILITY)
            .text_or("current_patients_c", r.current_patients, "");
        Ok(a.into_record())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WireError;
    use serde_json::json;

    fn input(value: Value) -> DoctorInput {
        serde_json::from_value(value).expect("doctor input should deserialize")
    }

    #[test]
    fn decodes_composite_columns() {
        let doctor = Doctor::decode(json!({
            "Id": 3,
            "Name": "Dr. Grey",
            "name_c": "Meredith Grey",
            "schedule_c": "Mon 09:00,Wed 13:00",
            "availability_c": "{\"monday\":true}",
            "current_patients_c": "4,x,9"
        }))
        .unwrap();

        assert_eq!(doctor.display_name.as_deref(), Some("Dr. Grey"));
        assert_eq!(doctor.name.as_deref(), Some("Meredith Grey"));
        assert_eq!(doctor.schedule, vec!["Mon 09:00", "Wed 13:00"]);
        assert_eq!(doctor.availability.get("monday"), Some(&json!(true)));
        assert_eq!(doctor.current_patients, vec![RecordId::new(4), RecordId::new(9)]);
    }

    #[test]
    fn bad_availability_becomes_empty_map() {
        let doctor = Doctor::decode(json!({"Id": 3, "availability_c": "{oops"})).unwrap();
        assert!(doctor.availability.is_empty());
        assert!(doctor.schedule.is_empty());
        assert!(doctor.current_patients.is_empty());
    }

    #[test]
    fn single_patient_id_stored_as_number() {
        let doctor = Doctor::decode(json!({"Id": 3, "current_patients_c": 12})).unwrap();
        assert_eq!(doctor.current_patients, vec![RecordId::new(12)]);
    }

    #[test]
    fn view_fields_encode_to_text_columns() {
        let patch = input(json!({
            "schedule": ["Mon", "Tue"],
            "availability": {"friday": false},
            "currentPatients": [1, "2"]
        }))
        .into_patch(RecordId::new(3))
        .unwrap();

        assert_eq!(patch.get("schedule_c"), Some(&json!("Mon,Tue")));
        assert_eq!(patch.get("availability_c"), Some(&json!("{\"friday\":false}")));
        assert_eq!(patch.get("current_patients_c"), Some(&json!("1,2")));
    }

    #[test]
    fn bad_patient_id_fails_patch() {
        let err = input(json!({"currentPatients": [1, "two"]}))
            .into_patch(RecordId::new(3))
            .expect_err("should fail");
        assert!(matches!(err, WireError::NotAnInteger { field: "current_patients_c", .. }));
    }

    #[test]
    fn creation_fills_empty_composites() {
        let record = input(json!({"name": "Meredith Grey", "specialty": "Surgery"}))
            .into_new_record(Utc::now())
            .unwrap();

        assert_eq!(record.get("schedule_c"), Some(&json!("")));
        assert_eq!(record.get("availability_c"), Some(&json!("{}")));
        assert_eq!(record.get("current_patients_c"), Some(&json!("")));
        assert_eq!(record.get("phone_c"), None);
    }

    #[test]
    fn stored_availability_object_is_serialized() {
        let record = input(json!({"availability_c": {"monday": true}}))
            .into_new_record(Utc::now())
            .unwrap();
        assert_eq!(record.get("availability_c"), Some(&json!("{\"monday\":true}")));
    }
}
