//! Per-entity service aliases and their entity-specific reads.

mod appointment;
mod bed;
mod doctor;
mod medical_record;
mod patient;

pub use appointment::AppointmentService;
pub use bed::BedService;
pub use doctor::DoctorService;
pub use medical_record::MedicalRecordService;
pub use patient::PatientService;
