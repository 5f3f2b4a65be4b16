//! Request and response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ward_types::RecordId;

/// Answer to a `fetch` call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl FetchResponse {
    pub fn ok(data: Vec<Value>) -> Self {
        Self {
            success: true,
            total: Some(data.len()),
            data: Some(data),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// Answer to a `get` call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecordResponse {
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Answer to a create, update or delete call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<Vec<RecordResult>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl BatchResponse {
    pub fn ok(results: Vec<RecordResult>) -> Self {
        Self {
            success: true,
            results: Some(results),
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            results: None,
            message: Some(message.into()),
        }
    }
}

/// Outcome for one record of a batch write.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<FieldError>,
}

impl RecordResult {
    pub fn succeeded(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            ..Self::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Human-readable reason for a failed result.
    pub fn failure_message(&self) -> String {
        if let Some(message) = self.message.as_deref().filter(|m| !m.is_empty()) {
            return message.to_owned();
        }
        match self.errors.first() {
            Some(FieldError {
                field_label: Some(label),
                message: Some(message),
            }) => format!("{label}: {message}"),
            Some(FieldError {
                message: Some(message),
                ..
            }) => message.clone(),
            _ => "unknown error".to_owned(),
        }
    }
}

/// Field-level validation error attached to a failed record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    #[serde(rename = "fieldLabel", default, skip_serializing_if = "Option::is_none")]
    pub field_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Body of create and update calls.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordsRequest {
    pub records: Vec<Map<String, Value>>,
}

impl RecordsRequest {
    pub fn single(record: Map<String, Value>) -> Self {
        Self {
            records: vec![record],
        }
    }
}

/// Body of a delete call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "RecordIds")]
    pub record_ids: Vec<RecordId>,
}

impl DeleteRequest {
    pub fn single(id: RecordId) -> Self {
        Self {
            record_ids: vec![id],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn batch_response_tolerates_missing_results() {
        let response: BatchResponse = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(response.success);
        assert_eq!(response.results, None);
    }

    #[test]
    fn failure_message_prefers_message_then_field_errors() {
        let with_message: RecordResult =
            serde_json::from_value(json!({"success": false, "message": "Duplicate email"}))
                .unwrap();
        assert_eq!(with_message.failure_message(), "Duplicate email");

        let with_errors: RecordResult = serde_json::from_value(json!({
            "success": false,
            "errors": [{"fieldLabel": "Email", "message": "is invalid"}]
        }))
        .unwrap();
        assert_eq!(with_errors.failure_message(), "Email: is invalid");

        assert_eq!(RecordResult::default().failure_message(), "unknown error");
    }

    #[test]
    fn delete_request_uses_record_ids_key() {
        let request = DeleteRequest::single(RecordId::new(9));
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"RecordIds": [9]}));
    }
}
