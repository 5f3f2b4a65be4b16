use crate::codec::{
    join_list, list_field, relation_field, resolve_relation, split_list, text, Relation,
};
use crate::constants::{DATE_FORMAT, MEDICAL_RECORD_TABLE};
use crate::patch::Assignments;
use crate::{Entity, OrderKey, Patch, RecordInput, WireResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use ward_types::{Field, IntLike, LooseText, RecordId};

/// Stored shape of a `medical_record_c` row.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct StoredMedicalRecord {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: Option<LooseText>,
    pub patient_id_c: Option<Relation>,
    pub visit_date_c: Option<LooseText>,
    pub doctor_id_c: Option<Relation>,
    pub diagnosis_c: Option<LooseText>,
    pub treatment_c: Option<LooseText>,
    pub prescriptions_c: Option<LooseText>,
    pub notes_c: Option<LooseText>,
    pub follow_up_date_c: Option<LooseText>,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MedicalRecord {
    #[serde(rename = "Id")]
    #[schema(value_type = i64)]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub patient_id: Option<RecordId>,
    pub visit_date: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub doctor_id: Option<RecordId>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub prescriptions: Vec<String>,
    pub notes: Option<String>,
    pub follow_up_date: Option<String>,
}

impl Entity for MedicalRecord {
    const TABLE: &'static str = MEDICAL_RECORD_TABLE;
    const LABEL: &'static str = "medical record";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "patient_id_c",
        "visit_date_c",
        "doctor_id_c",
        "diagnosis_c",
        "treatment_c",
        "prescriptions_c",
        "notes_c",
        "follow_up_date_c",
    ];
    const ORDER: &'static [OrderKey] = &[OrderKey::desc("visit_date_c")];

    type Stored = StoredMedicalRecord;
    type Input = MedicalRecordInput;

    fn from_stored(stored: StoredMedicalRecord) -> Self {
        MedicalRecord {
            id: stored.id,
            name: text(stored.name),
            patient_id: resolve_relation(stored.patient_id_c.as_ref()),
            visit_date: text(stored.visit_date_c),
            doctor_id: resolve_relation(stored.doctor_id_c.as_ref()),
            diagnosis: text(stored.diagnosis_c),
            treatment: text(stored.treatment_c),
            prescriptions: split_list(stored.prescriptions_c.as_ref().map(LooseText::as_str)),
            notes: text(stored.notes_c),
            follow_up_date: text(stored.follow_up_date_c),
        }
    }

    fn to_stored(&self) -> StoredMedicalRecord {
        let loose = |v: &Option<String>| v.clone().map(LooseText::from);
        StoredMedicalRecord {
            id: self.id,
            name: loose(&self.name),
            patient_id_c: self.patient_id.map(Relation::from),
            visit_date_c: loose(&self.visit_date),
            doctor_id_c: self.doctor_id.map(Relation::from),
            diagnosis_c: loose(&self.diagnosis),
            treatment_c: loose(&self.treatment),
            prescriptions_c: Some(LooseText::new(join_list(&self.prescriptions))),
            notes_c: loose(&self.notes),
            follow_up_date_c: loose(&self.follow_up_date),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoredMedicalRecordChanges {
    pub patient_id_c: Field<Relation>,
    pub visit_date_c: Field<LooseText>,
    pub doctor_id_c: Field<Relation>,
    pub diagnosis_c: Field<LooseText>,
    pub treatment_c: Field<LooseText>,
    pub prescriptions_c: Field<LooseText>,
    pub notes_c: Field<LooseText>,
    pub follow_up_date_c: Field<LooseText>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MedicalRecordChanges {
    pub patient_id: Field<IntLike>,
    pub visit_date: Field<LooseText>,
    pub doctor_id: Field<IntLike>,
    pub diagnosis: Field<LooseText>,
    pub treatment: Field<LooseText>,
    pub prescriptions: Field<Vec<String>>,
    pub notes: Field<LooseText>,
    pub follow_up_date: Field<LooseText>,
}

/// Medical-record input in either naming convention.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MedicalRecordInput {
    #[serde(flatten)]
    pub stored: StoredMedicalRecordChanges,
    #[serde(flatten)]
    pub changes: MedicalRecordChanges,
}

struct ResolvedMedicalRecord {
    patient_id: Field<IntLike>,
    visit_date: Field<LooseText>,
    doctor_id: Field<IntLike>,
    diagnosis: Field<LooseText>,
    treatment: Field<LooseText>,
    prescriptions: Field<LooseText>,
    notes: Field<LooseText>,
    follow_up_date: Field<LooseText>,
}

impl MedicalRecordInput {
    fn resolve(self) -> ResolvedMedicalRecord {
        let MedicalRecordInput { stored: s, changes: c } = self;
        ResolvedMedicalRecord {
            patient_id: relation_field(s.patient_id_c, c.patient_id),
            visit_date: s.visit_date_c.or(c.visit_date),
            doctor_id: relation_field(s.doctor_id_c, c.doctor_id),
            diagnosis: s.diagnosis_c.or(c.diagnosis),
            treatment: s.treatment_c.or(c.treatment),
            prescriptions: list_field(s.prescriptions_c, c.prescriptions),
            notes: s.notes_c.or(c.notes),
            follow_up_date: s.follow_up_date_c.or(c.follow_up_date),
        }
    }
}

impl From<MedicalRecordChanges> for MedicalRecordInput {
    fn from(changes: MedicalRecordChanges) -> Self {
        MedicalRecordInput {
            stored: StoredMedicalRecordChanges::default(),
            changes,
        }
    }
}

impl RecordInput for MedicalRecordInput {
    fn into_patch(self, id: RecordId) -> WireResult<Patch> {
        let r = self.resolve();
        let mut a = Assignments::default();
        a.int("patient_id_c", r.patient_id)?
            .text("visit_date_c", r.visit_date)
            .int("doctor_id_c", r.doctor_id)?
            .text("diagnosis_c", r.diagnosis)
            .text("treatment_c", r.treatment)
            .text("prescriptions_c", r.prescriptions)
            .text("notes_c", r.notes)
            .text("follow_up_date_c", r.follow_up_date);
        Ok(a.into_patch(id))
    }

    fn into_new_record(self, now: DateTime<Utc>) -> WireResult<Map<String, Value>> {
        let r = self.resolve();
        let mut a = Assignments::default();
        a.required_int("patient_id_c", r.patient_id)?
            .text_or("visit_date_c", r.visit_date, now.format(DATE_FORMAT).to_string())
            .required_int("doctor_id_c", r.doctor_id)?
            .text("diagnosis_c", r.diagnosis)
            .text("treatment_c", r.treatment)
            .text_or("prescriptions_c", r.prescriptions, "")
            .text("notes_c", r.notes)
            .text("follow_up_date_c", r.follow_up_date);
        Ok(a.into_record())
    }
}
