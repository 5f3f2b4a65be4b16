use crate::codec::{list_field, split_list, join_list, text};
use crate::constants::{DEFAULT_PATIENT_STATUS, PATIENT_TABLE};
use crate::patch::Assignments;
use crate::{Entity, OrderKey, Patch, RecordInput, WireResult};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use ward_types::{Field, LooseText, RecordId};

/// Stored shape of a `patient_c` row.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct StoredPatient {
    #[serde(rename = "Id")]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: Option<LooseText>,
    pub first_name_c: Option<LooseText>,
    pub last_name_c: Option<LooseText>,
    pub date_of_birth_c: Option<LooseText>,
    pub gender_c: Option<LooseText>,
    pub phone_c: Option<LooseText>,
    pub email_c: Option<LooseText>,
    pub address_c: Option<LooseText>,
    pub emergency_contact_c: Option<LooseText>,
    pub blood_type_c: Option<LooseText>,
    pub allergies_c: Option<LooseText>,
    pub current_status_c: Option<LooseText>,
    pub admission_date_c: Option<LooseText>,
    pub bed_number_c: Option<LooseText>,
}

#[derive(Clone, Debug, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    #[serde(rename = "Id")]
    #[schema(value_type = i64)]
    pub id: RecordId,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub emergency_contact: Option<String>,
    pub blood_type: Option<String>,
    pub allergies: Vec<String>,
    pub current_status: Option<String>,
    pub admission_date: Option<String>,
    pub bed_number: Option<String>,
}

impl Patient {
    /// Stored fields returned by free-text search.
    pub const SEARCH_FIELDS: &'static [&'static str] = &[
        "Name",
        "first_name_c",
        "last_name_c",
        "phone_c",
        "email_c",
        "date_of_birth_c",
        "gender_c",
        "current_status_c",
        "blood_type_c",
    ];

    /// Stored fields matched by free-text search.
    pub const SEARCHABLE: &'static [&'static str] =
        &["first_name_c", "last_name_c", "phone_c", "email_c"];

    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Entity for Patient {
    const TABLE: &'static str = PATIENT_TABLE;
    const LABEL: &'static str = "patient";
    const FIELDS: &'static [&'static str] = &[
        "Name",
        "first_name_c",
        "last_name_c",
        "date_of_birth_c",
        "gender_c",
        "phone_c",
        "email_c",
        "address_c",
        "emergency_contact_c",
        "blood_type_c",
        "allergies_c",
        "current_status_c",
        "admission_date_c",
        "bed_number_c",
    ];
    const ORDER: &'static [OrderKey] =
        &[OrderKey::asc("last_name_c"), OrderKey::asc("first_name_c")];

    type Stored = StoredPatient;
    type Input = PatientInput;

    fn from_stored(stored: StoredPatient) -> Self {
        Patient {
            id: stored.id,
            name: text(stored.name),
            first_name: text(stored.first_name_c),
            last_name: text(stored.last_name_c),
            date_of_birth: text(stored.date_of_birth_c),
            gender: text(stored.gender_c),
            phone: text(stored.phone_c),
            email: text(stored.email_c),
            address: text(stored.address_c),
            emergency_contact: text(stored.emergency_contact_c),
            blood_type: text(stored.blood_type_c),
            allergies: split_list(stored.allergies_c.as_ref().map(LooseText::as_str)),
            current_status: text(stored.current_status_c),
            admission_date: text(stored.admission_date_c),
            bed_number: text(stored.bed_number_c),
        }
    }

    fn to_stored(&self) -> StoredPatient {
        let loose = |v: &Option<String>| v.clone().map(LooseText::from);
        StoredPatient {
            id: self.id,
            name: loose(&self.name),
            first_name_c: loose(&self.first_name),
            last_name_c: loose(&self.last_name),
            date_of_birth_c: loose(&self.date_of_birth),
            gender_c: loose(&self.gender),
            phone_c: loose(&self.phone),
            email_c: loose(&self.email),
            address_c: loose(&self.address),
            emergency_contact_c: loose(&self.emergency_contact),
            blood_type_c: loose(&self.blood_type),
            allergies_c: Some(LooseText::new(join_list(&self.allergies))),
            current_status_c: loose(&self.current_status),
            admission_date_c: loose(&self.admission_date),
            bed_number_c: loose(&self.bed_number),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StoredPatientChanges {
    pub first_name_c: Field<LooseText>,
    pub last_name_c: Field<LooseText>,
    pub date_of_birth_c: Field<LooseText>,
    pub gender_c: Field<LooseText>,
    pub phone_c: Field<LooseText>,
    pub email_c: Field<LooseText>,
    pub address_c: Field<LooseText>,
    pub emergency_contact_c: Field<LooseText>,
    pub blood_type_c: Field<LooseText>,
    pub allergies_c: Field<LooseText>,
    pub current_status_c: Field<LooseText>,
    pub admission_date_c: Field<LooseText>,
    pub bed_number_c: Field<LooseText>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PatientChanges {
    pub first_name: Field<LooseText>,
    pub last_name: Field<LooseText>,
    pub date_of_birth: Field<LooseText>,
    pub gender: Field<LooseText>,
    pub phone: Field<LooseText>,
    pub email: Field<LooseText>,
    pub address: Field<LooseText>,
    pub emergency_contact: Field<LooseText>,
    pub blood_type: Field<LooseText>,
    pub allergies: Field<Vec<String>>,
    pub current_status: Field<LooseText>,
    pub admission_date: Field<LooseText>,
    pub bed_number: Field<LooseText>,
}

/// Patient input in either naming convention.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PatientInput {
    #[serde(flatten)]
    pub stored: StoredPatientChanges,
    #[serde(flatten)]
    pub changes: PatientChanges,
}

/// Patient changes with both namings collapsed; lists are already joined.
struct ResolvedPatient {
    first_name: Field<LooseText>,
    last_name: Field<LooseText>,
    date_of_birth: Field<LooseText>,
    gender: Field<LooseText>,
    phone: Field<LooseText>,
    email: Field<LooseText>,
    address: Field<LooseText>,
    emergency_contact: Field<LooseText>,
    blood_type: Field<LooseText>,
    allergies: Field<LooseText>,
    current_status: Field<LooseText>,
    admission_date: Field<LooseText>,
    bed_number: Field<LooseText>,
}

impl PatientInput {
    fn resolve(self) -> ResolvedPatient {
        let PatientInput { stored: s, changes: c } = self;
        ResolvedPatient {
            first_name: s.first_name_c.or(c.first_name),
            last_name: s.last_name_c.or(c.last_name),
            date_of_birth: s.date_of_birth_c.or(c.date_of_birth),
            gender: s.gender_c.or(c.gender),
            phone: s.phone_c.or(c.phone),
            email: s.email_c.or(c.email),
            address: s.address_c.or(c.address),
            emergency_contact: s.emergency_contact_c.or(c.emergency_contact),
            blood_type: s.blood_type_c.or(c.blood_type),
            allergies: list_field(s.allergies_c, c.allergies),
            current_status: s.current_status_c.or(c.current_status),
            admission_date: s.admission_date_c.or(c.admission_date),
            bed_number: s.bed_number_c.or(c.bed_number),
        }
    }
}

impl From<PatientChanges> for PatientInput {
    fn from(changes: PatientChanges) -> Self {
        PatientInput {
            stored: StoredPatientChanges::default(),
            changes,
        }
    }
}

impl RecordInput for PatientInput {
    fn into_patch(self, id: RecordId) -> WireResult<Patch> {
        let r = self.resolve();
        let mut a = Assignments::default();
        a.text("first_name_c", r.first_name)
            .text("last_name_c", r.last_name)
            .text("date_of_birth_c", r.date_of_birth)
            .text("gender_c", r.gender)
            .text("phone_c", r.phone)
            .text("email_c", r.email)
            .text("address_c", r.address)
            .text("emergency_contact_c", r.emergency_contact)
            .text("blood_type_c", r.blood_type)
            .text("allergies_c", r.allergies)
            .text("current_status_c", r.current_status)
            .text("admission_date_c", r.admission_date)
            .text("bed_number_c", r.bed_number);
        Ok(a.into_patch(id))
    }

    fn into_new_record(self, now: DateTime<Utc>) -> WireResult<Map<String, Value>> {
        let r = self.resolve();
        let mut a = Assignments::default();
        a.text("first_name_c", r.first_name)
            .text("last_name_c", r.last_name)
            .text("date_of_birth_c", r.date_of_birth)
            .text("gender_c", r.gender)
            .text("phone_c", r.phone)
            .text("email_c", r.email)
            .text("address_c", r.address)
            .text("emergency_contact_c", r.emergency_contact)
            .text("blood_type_c", r.blood_type)
            .text_or("allergies_c", r.allergies, "")
            .text_or("current_status_c", r.current_status, DEFAULT_PATIENT_STATUS)
            .text_or(
                "admission_date_c",
                r.admission_date,
                now.to_rfc3339_opts(SecondsFormat::Millis, true),
            )
            .text("bed_number_c", r.bed_number);
        Ok(a.into_record())
    }
}
