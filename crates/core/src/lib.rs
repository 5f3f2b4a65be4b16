//! # Ward Core
//!
//! Entity services for the ward front office: patients, doctors, beds, appointments and
//! medical records, all kept in tables on a hosted data platform.
//!
//! Each service pairs the wire mapping of its entity with an injected [`DataClient`]:
//! - list reads never fail; a failure is logged and yields an empty list
//! - single-record reads fail only with [`ServiceError::NotFound`]
//! - writes reconcile the platform's per-record results and fail on the first rejected one
//!
//! **No API concerns**: HTTP routing and command-line handling belong in `api-rest` and `cli`.

pub mod config;
pub mod constants;
mod error;
mod service;
mod services;

#[cfg(test)]
mod test_support;

pub use config::{CoreConfig, DataBackend, PlatformCredentials};
pub use error::{ServiceError, ServiceResult, TransportError};
pub use service::EntityService;
pub use services::{
    AppointmentService, BedService, DoctorService, MedicalRecordService, PatientService,
};

use std::sync::Arc;
use ward_client::DataClient;

/// All five services over one shared client.
#[derive(Clone, Debug)]
pub struct Services {
    pub patients: PatientService,
    pub doctors: DoctorService,
    pub beds: BedService,
    pub appointments: AppointmentService,
    pub medical_records: MedicalRecordService,
}

impl Services {
    pub fn new(client: Arc<dyn DataClient>) -> Self {
        Self {
            patients: PatientService::new(Arc::clone(&client)),
            doctors: DoctorService::new(Arc::clone(&client)),
            beds: BedService::new(Arc::clone(&client)),
            appointments: AppointmentService::new(Arc::clone(&client)),
            medical_records: MedicalRecordService::new(client),
        }
    }

    /// Connect using `cfg` and build every service over the resulting client.
    pub fn connect(cfg: &CoreConfig) -> ServiceResult<Self> {
        cfg.connect().map(Self::new)
    }
}
