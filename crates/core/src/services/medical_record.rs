use crate::EntityService;
use ward_types::RecordId;
use ward_wire::MedicalRecord;

/// Visit notes in `medical_record_c`, newest visit first.
pub type MedicalRecordService = EntityService<MedicalRecord>;

impl EntityService<MedicalRecord> {
    pub async fn get_by_patient_id(&self, patient: RecordId) -> Vec<MedicalRecord> {
        let query = self.list_query().exact("patient_id_c", patient.get());
        self.fetch("get_by_patient_id", query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use ward_client::MemoryDataClient;

    #[tokio::test]
    async fn test_get_by_patient_id_newest_first() {
        let client = Arc::new(MemoryDataClient::new());
        client.seed(
            "medical_record_c",
            [
                json!({"patient_id_c": 42, "doctor_id_c": 3, "visit_date_c": "2024-01-02"}),
                json!({
                    "patient_id_c": {"Id": 42, "Name": "Ada"},
                    "doctor_id_c": 3,
                    "visit_date_c": "2024-03-10"
                }),
                json!({"patient_id_c": 7, "doctor_id_c": 3, "visit_date_c": "2024-02-01"}),
            ],
        );
        let service = MedicalRecordService::new(client);

        let visits: Vec<_> = service
            .get_by_patient_id(RecordId::new(42))
            .await
            .into_iter()
            .filter_map(|r| r.visit_date)
            .collect();
        assert_eq!(visits, vec!["2024-03-10", "2024-01-02"]);
    }
}
