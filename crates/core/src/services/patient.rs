use crate::EntityService;
use ward_client::FetchQuery;
use ward_wire::Patient;

/// Patient records in `patient_c`.
pub type PatientService = EntityService<Patient>;

impl EntityService<Patient> {
    /// Patients whose first name, last name, phone or email contains `term`.
    ///
    /// Matching is case-insensitive. A blank term returns every patient.
    pub async fn search(&self, term: &str) -> Vec<Patient> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return self.get_all().await;
        }

        let query = self.ordered(
            FetchQuery::new(Patient::SEARCH_FIELDS).any_contains(Patient::SEARCHABLE, &term),
        );
        self.fetch("search", query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Reply, ScriptedClient};
    use serde_json::json;
    use std::sync::Arc;
    use ward_client::{FetchResponse, MemoryDataClient};

    #[tokio::test]
    async fn test_search_is_case_insensitive() {
        let client = Arc::new(MemoryDataClient::new());
        client.seed(
            "patient_c",
            [
                json!({
                    "first_name_c": "Ada",
                    "last_name_c": "Lovelace",
                    "email_c": "ada@example.test"
                }),
                json!({"first_name_c": "Alan", "last_name_c": "Turing", "phone_c": "555-0199"}),
                json!({
                    "first_name_c": "Grace",
                    "last_name_c": "Hopper",
                    "address_c": "Lovelace Road"
                }),
            ],
        );
        let service = PatientService::new(client);

        let found = service.search("LOVE").await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].last_name.as_deref(), Some("Lovelace"));

        let found = service.search("0199").await;
        assert_eq!(found[0].first_name.as_deref(), Some("Alan"));
    }

    #[tokio::test]
    async fn test_search_sends_lowercased_or_group() {
        let client = Arc::new(ScriptedClient::new(vec![Reply::Fetch(FetchResponse::ok(vec![]))]));
        let service = PatientService::new(client.clone());
        service.search("  Ada ").await;

        let body = &client.calls()[0].body;
        let groups = body["whereGroups"].as_array().expect("groups");
        assert_eq!(groups[0]["operator"], json!("OR"));
        let sub_groups = groups[0]["subGroups"].as_array().expect("sub groups");
        assert_eq!(sub_groups.len(), 4);
        assert!(sub_groups
            .iter()
            .all(|g| g["conditions"][0]["values"] == json!(["ada"])));
        assert_eq!(
            body["fields"].as_array().map(Vec::len),
            Some(Patient::SEARCH_FIELDS.len())
        );
    }

    #[tokio::test]
    async fn test_blank_search_lists_everyone() {
        let client = Arc::new(MemoryDataClient::new());
        client.seed("patient_c", [json!({"first_name_c": "Ada"}), json!({"first_name_c": "Alan"})]);
        let service = PatientService::new(client);

        assert_eq!(service.search("   ").await.len(), 2);
    }
}
