//! Table names and creation defaults.

pub const PATIENT_TABLE: &str = "patient_c";
pub const DOCTOR_TABLE: &str = "doctor_c";
pub const BED_TABLE: &str = "bed_c";
pub const APPOINTMENT_TABLE: &str = "appointment_c";
pub const MEDICAL_RECORD_TABLE: &str = "medical_record_c";

/// Status given to a patient created without one.
pub const DEFAULT_PATIENT_STATUS: &str = "Stable";

/// Status given to an appointment created without one.
pub const DEFAULT_APPOINTMENT_STATUS: &str = "Scheduled";

/// Appointment length in minutes when none is given.
pub const DEFAULT_APPOINTMENT_DURATION: i64 = 30;

/// Availability written for a doctor created without one.
pub const EMPTY_AVAILABILITY: &str = "{}";

/// Date format of visit and follow-up dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
