use crate::{EntityService, ServiceError, ServiceResult};
use ward_types::ToRecordId;
use ward_wire::{Bed, BedChanges, BedInput};

/// Beds in `bed_c`.
pub type BedService = EntityService<Bed>;

impl EntityService<Bed> {
    /// Put `patient` in `bed`, writing the patient link and `Occupied` together.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` if either identifier is not numeric, otherwise
    /// fails as [`EntityService::update`].
    pub async fn assign_patient(
        &self,
        bed: impl ToRecordId,
        patient: impl ToRecordId,
    ) -> ServiceResult<Option<Bed>> {
        let patient = patient.to_record_id().map_err(|e| {
            tracing::warn!(
                entity = "bed",
                operation = "assign_patient",
                error = %e,
                "bad patient identifier"
            );
            ServiceError::Validation(e.into())
        })?;
        tracing::info!(entity = "bed", %patient, "-- Assigning patient");
        self.update(bed, BedInput::from(BedChanges::assign(patient)))
            .await
    }

    /// Empty `bed`, clearing the patient link and marking it `Available`.
    pub async fn release_patient(&self, bed: impl ToRecordId) -> ServiceResult<Option<Bed>> {
        self.update(bed, BedInput::from(BedChanges::release())).await
    }
}
