use crate::EntityService;
use ward_types::RecordId;
use ward_wire::Appointment;

/// Appointments in `appointment_c`.
pub type AppointmentService = EntityService<Appointment>;

impl EntityService<Appointment> {
    /// Appointments whose date is exactly `date` (`YYYY-MM-DD`).
    pub async fn get_by_date(&self, date: &str) -> Vec<Appointment> {
        let query = self.list_query().exact("date_c", date.trim());
        self.fetch("get_by_date", query).await
    }

    pub async fn get_by_doctor(&self, doctor: RecordId) -> Vec<Appointment> {
        let query = self.list_query().exact("doctor_id_c", doctor.get());
        self.fetch("get_by_doctor", query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;
    use ward_client::MemoryDataClient;

    fn setup() -> AppointmentService {
        let client = Arc::new(MemoryDataClient::new());
        client.seed(
            "appointment_c",
            [
                json!({
                    "patient_id_c": 1,
                    "doctor_id_c": {"Id": 3},
                    "date_c": "2024-01-15",
                    "time_c": "14:00"
                }),
                json!({
                    "patient_id_c": 2,
                    "doctor_id_c": 4,
                    "date_c": "2024-01-16",
                    "time_c": "09:00"
                }),
                json!({
                    "patient_id_c": 1,
                    "doctor_id_c": 4,
                    "date_c": "2024-01-15",
                    "time_c": "08:30"
                }),
                json!({
                    "patient_id_c": 2,
                    "doctor_id_c": 3,
                    "date_c": "2024-01-15T00:00",
                    "time_c": "10:00"
                }),
            ],
        );
        AppointmentService::new(client)
    }

    #[tokio::test]
    async fn test_get_by_date_matches_literal_date_only() {
        let service = setup();
        let found = service.get_by_date("2024-01-15").await;

        let times: Vec<_> = found.iter().filter_map(|a| a.time.as_deref()).collect();
        assert_eq!(times, vec!["08:30", "14:00"]);
        assert!(found.iter().all(|a| a.date.as_deref() == Some("2024-01-15")));
    }

    #[tokio::test]
    async fn test_get_by_doctor_matches_nested_and_bare_ids() {
        let service = setup();
        let found = service.get_by_doctor(RecordId::new(3)).await;

        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|a| a.doctor_id == Some(RecordId::new(3))));
    }

    #[tokio::test]
    async fn test_get_all_orders_by_date_then_time() {
        let service = setup();
        let dates: Vec<_> = service
            .get_all()
            .await
            .into_iter()
            .map(|a| (a.date.unwrap_or_default(), a.time.unwrap_or_default()))
            .collect();

        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }
}
