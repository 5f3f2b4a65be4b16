//! In-process binding of [`DataClient`].

use crate::{
    BatchResponse, ClientResult, Condition, ConditionGroup, DataClient, DeleteRequest,
    FetchQuery, FetchResponse, GroupCondition, GroupOperator, Operator, OrderBy, RecordQuery,
    RecordResponse, RecordResult, RecordsRequest, SortType,
};
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};
use ward_types::RecordId;

const ID_FIELD: &str = "Id";

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Map<String, Value>>,
}

impl Table {
    fn insert(&mut self, mut record: Map<String, Value>, id: Option<i64>) -> i64 {
        let id = id.unwrap_or(self.next_id + 1);
        self.next_id = self.next_id.max(id);
        record.insert(ID_FIELD.to_owned(), Value::from(id));
        self.rows.insert(id, record);
        id
    }
}

/// Tables held in memory, answering like the hosted platform.
///
/// Identifiers are assigned in increasing order per table. Filters, ordering, paging and
/// field projection are honoured on `fetch`; `Id` is always returned. Updates and deletes
/// naming an unknown identifier fail for that record only.
#[derive(Debug, Default)]
pub struct MemoryDataClient {
    tables: Mutex<HashMap<String, Table>>,
}

impl MemoryDataClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert raw stored records, keeping any `Id` they carry. Returns the identifiers.
    pub fn seed(&self, table: &str, records: impl IntoIterator<Item = Value>) -> Vec<RecordId> {
        let mut tables = self.lock();
        let table = tables.entry(table.to_owned()).or_default();
        records
            .into_iter()
            .filter_map(|record| match record {
                Value::Object(mut map) => {
                    let id = map.remove(ID_FIELD).as_ref().and_then(value_to_id);
                    Some(RecordId::new(table.insert(map, id)))
                }
                _ => None,
            })
            .collect()
    }

    /// A stored record as held, without projection.
    pub fn record(&self, table: &str, id: RecordId) -> Option<Map<String, Value>> {
        self.lock()
            .get(table)
            .and_then(|t| t.rows.get(&id.get()))
            .cloned()
    }

    pub fn len(&self, table: &str) -> usize {
        self.lock().get(table).map_or(0, |t| t.rows.len())
    }

    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Table>> {
        // A panic while holding the lock leaves the tables usable.
        self.tables.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl DataClient for MemoryDataClient {
    async fn fetch_records(&self, table: &str, query: &FetchQuery) -> ClientResult<FetchResponse> {
        let tables = self.lock();
        let Some(rows) = tables.get(table).map(|t| &t.rows) else {
            return Ok(FetchResponse::ok(Vec::new()));
        };

        let mut matched: Vec<&Map<String, Value>> = rows
            .values()
            .filter(|row| query.conditions.iter().all(|c| condition_holds(row, c)))
            .filter(|row| query.groups.iter().all(|g| group_holds(row, g)))
            .collect();
        matched.sort_by(|a, b| compare_rows(a, b, &query.order_by));

        let total = matched.len();
        let (offset, limit) = query
            .paging
            .map_or((0, usize::MAX), |p| (p.offset, p.limit));
        let fields: Vec<&str> = query.fields.iter().map(|f| f.name()).collect();
        let data = matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|row| project(row, &fields))
            .collect();

        Ok(FetchResponse {
            success: true,
            data: Some(data),
            message: None,
            total: Some(total),
        })
    }

    async fn get_record_by_id(
        &self,
        table: &str,
        id: RecordId,
        query: &RecordQuery,
    ) -> ClientResult<RecordResponse> {
        let fields: Vec<&str> = query.fields.iter().map(|f| f.name()).collect();
        let tables = self.lock();
        Ok(
            match tables.get(table).and_then(|t| t.rows.get(&id.get())) {
                Some(row) => RecordResponse::ok(project(row, &fields)),
                None => RecordResponse::rejected(format!("Record {id} does not exist in {table}")),
            },
        )
    }

    async fn create_records(
        &self,
        table: &str,
        request: &RecordsRequest,
    ) -> ClientResult<BatchResponse> {
        let mut tables = self.lock();
        let table = tables.entry(table.to_owned()).or_default();
        let results = request
            .records
            .iter()
            .map(|record| {
                let mut record = record.clone();
                record.remove(ID_FIELD);
                let id = table.insert(record, None);
                RecordResult::succeeded(Value::Object(table.rows[&id].clone()))
            })
            .collect();
        Ok(BatchResponse::ok(results))
    }

    async fn update_records(
        &self,
        table: &str,
        request: &RecordsRequest,
    ) -> ClientResult<BatchResponse> {
        let mut tables = self.lock();
        let name = table;
        let table = tables.entry(name.to_owned()).or_default();
        let results = request
            .records
            .iter()
            .map(|record| {
                let Some(id) = record.get(ID_FIELD).and_then(value_to_id) else {
                    return RecordResult::failed("Id is required for update");
                };
                match table.rows.get_mut(&id) {
                    Some(row) => {
                        for (field, value) in record.iter().filter(|(k, _)| *k != ID_FIELD) {
                            row.insert(field.clone(), value.clone());
                        }
                        RecordResult::succeeded(Value::Object(row.clone()))
                    }
                    None => RecordResult::failed(format!("Record {id} does not exist in {name}")),
                }
            })
            .collect();
        Ok(BatchResponse::ok(results))
    }

    async fn delete_records(
        &self,
        table: &str,
        request: &DeleteRequest,
    ) -> ClientResult<BatchResponse> {
        let mut tables = self.lock();
        let name = table;
        let table = tables.entry(name.to_owned()).or_default();
        let results = request
            .record_ids
            .iter()
            .map(|id| match table.rows.remove(&id.get()) {
                Some(_) => RecordResult::succeeded(Value::from(id.get())),
                None => RecordResult::failed(format!("Record {id} does not exist in {name}")),
            })
            .collect();
        Ok(BatchResponse::ok(results))
    }
}

// ============================================================================
// Query evaluation
// ============================================================================

fn value_to_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Comparable text of a stored value. Relation objects compare by their `Id`.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map.get(ID_FIELD).and_then(scalar_text),
        Value::Array(_) => Some(value.to_string()),
    }
}

fn matches(row: &Map<String, Value>, field: &str, operator: Operator, values: &[Value]) -> bool {
    let Some(actual) = row.get(field).and_then(scalar_text) else {
        return false;
    };
    values.iter().filter_map(scalar_text).any(|expected| match operator {
        Operator::ExactMatch => actual == expected,
        Operator::Contains => actual.to_lowercase().contains(&expected.to_lowercase()),
    })
}

fn condition_holds(row: &Map<String, Value>, condition: &Condition) -> bool {
    matches(row, &condition.field_name, condition.operator, &condition.values) == condition.include
}

fn sub_group_holds(row: &Map<String, Value>, conditions: &[GroupCondition]) -> bool {
    conditions
        .iter()
        .all(|c| matches(row, &c.field_name, c.operator, &c.values))
}

fn group_holds(row: &Map<String, Value>, group: &ConditionGroup) -> bool {
    let mut subs = group.sub_groups.iter();
    match group.operator {
        GroupOperator::Or => subs.any(|s| sub_group_holds(row, &s.conditions)),
        GroupOperator::And => subs.all(|s| sub_group_holds(row, &s.conditions)),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(x), Some(y)) => scalar_text(x).cmp(&scalar_text(y)),
    }
}

fn compare_rows(a: &Map<String, Value>, b: &Map<String, Value>, order: &[OrderBy]) -> Ordering {
    order
        .iter()
        .map(|key| {
            let ordering = compare_values(a.get(&key.field_name), b.get(&key.field_name));
            match key.sorttype {
                SortType::Asc => ordering,
                SortType::Desc => ordering.reverse(),
            }
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Keep only the requested fields; no fields requested means the whole record.
fn project(row: &Map<String, Value>, fields: &[&str]) -> Value {
    if fields.is_empty() {
        return Value::Object(row.clone());
    }
    let mut out = Map::new();
    if let Some(id) = row.get(ID_FIELD) {
        out.insert(ID_FIELD.to_owned(), id.clone());
    }
    for field in fields {
        if let Some(value) = row.get(*field) {
            out.insert((*field).to_owned(), value.clone());
        }
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("object literal")
    }

    fn seeded() -> MemoryDataClient {
        let client = MemoryDataClient::new();
        client.seed(
            "appointment_c",
            [
                json!({
                    "date_c": "2024-01-15",
                    "time_c": "10:00",
                    "doctor_id_c": {"Id": 3, "Name": "Dr. Grey"}
                }),
                json!({"date_c": "2024-01-16", "time_c": "09:00", "doctor_id_c": 4}),
                json!({"date_c": "2024-01-15", "time_c": "08:30", "doctor_id_c": 4}),
            ],
        );
        client
    }

    fn ids(response: &FetchResponse) -> Vec<i64> {
        response
            .data
            .as_ref()
            .expect("data")
            .iter()
            .map(|r| r["Id"].as_i64().expect("id"))
            .collect()
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let client = MemoryDataClient::new();
        let request = RecordsRequest {
            records: vec![record(json!({"name_c": "A"})), record(json!({"name_c": "B"}))],
        };
        let response = client.create_records("doctor_c", &request).await.unwrap();

        let results = response.results.expect("results");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].data.as_ref().unwrap()["Id"], json!(1));
        assert_eq!(results[1].data.as_ref().unwrap()["Id"], json!(2));
        assert_eq!(client.len("doctor_c"), 2);
    }

    #[tokio::test]
    async fn test_exact_match_and_ordering() {
        let client = seeded();
        let query = FetchQuery::new(&["date_c", "time_c"])
            .exact("date_c", "2024-01-15")
            .order("date_c", SortType::Asc)
            .order("time_c", SortType::Asc);
        let response = client.fetch_records("appointment_c", &query).await.unwrap();

        assert_eq!(ids(&response), vec![3, 1]);
        assert_eq!(response.total, Some(2));
    }

    #[tokio::test]
    async fn test_exact_match_on_nested_relation() {
        let client = seeded();
        let query = FetchQuery::new(&[]).exact("doctor_id_c", 3);
        let response = client.fetch_records("appointment_c", &query).await.unwrap();
        assert_eq!(ids(&response), vec![1]);
    }

    #[tokio::test]
    async fn test_contains_group_is_case_insensitive() {
        let client = MemoryDataClient::new();
        client.seed(
            "patient_c",
            [
                json!({
                    "first_name_c": "Ada",
                    "last_name_c": "Lovelace",
                    "email_c": "ada@example.test"
                }),
                json!({"first_name_c": "Alan", "last_name_c": "Turing", "phone_c": "555-0199"}),
            ],
        );
        let query = FetchQuery::new(&["first_name_c"])
            .any_contains(&["first_name_c", "last_name_c", "phone_c", "email_c"], "love");
        let response = client.fetch_records("patient_c", &query).await.unwrap();

        assert_eq!(ids(&response), vec![1]);
        let row = &response.data.unwrap()[0];
        assert_eq!(row.get("last_name_c"), None);
        assert_eq!(row["first_name_c"], json!("Ada"));
    }

    #[tokio::test]
    async fn test_paging_keeps_total() {
        let client = seeded();
        let query = FetchQuery::new(&[]).order("time_c", SortType::Desc).page(1, 1);
        let response = client.fetch_records("appointment_c", &query).await.unwrap();

        assert_eq!(ids(&response), vec![2]);
        assert_eq!(response.total, Some(3));
    }

    #[tokio::test]
    async fn test_update_unknown_id_fails_that_record_only() {
        let client = seeded();
        let request = RecordsRequest {
            records: vec![
                record(json!({"Id": 1, "notes_c": "bring scans"})),
                record(json!({"Id": 99, "notes_c": "x"})),
            ],
        };
        let response = client.update_records("appointment_c", &request).await.unwrap();
        let results = response.results.unwrap();

        assert!(results[0].success);
        assert!(!results[1].success);
        assert_eq!(
            client.record("appointment_c", RecordId::new(1)).unwrap()["notes_c"],
            json!("bring scans")
        );
    }

    #[tokio::test]
    async fn test_update_writes_explicit_null() {
        let client = MemoryDataClient::new();
        client.seed("bed_c", [json!({"Id": 5, "patient_id_c": 42, "status_c": "Occupied"})]);
        let request = RecordsRequest::single(record(json!({"Id": 5, "patient_id_c": null})));
        client.update_records("bed_c", &request).await.unwrap();

        let bed = client.record("bed_c", RecordId::new(5)).unwrap();
        assert_eq!(bed.get("patient_id_c"), Some(&Value::Null));
    }

    #[tokio::test]
    async fn test_get_and_delete() {
        let client = seeded();
        let found = client
            .get_record_by_id("appointment_c", RecordId::new(2), &RecordQuery::new(&["date_c"]))
            .await
            .unwrap();
        assert!(found.success);
        assert_eq!(found.data.unwrap(), json!({"Id": 2, "date_c": "2024-01-16"}));

        let deleted = client
            .delete_records("appointment_c", &DeleteRequest::single(RecordId::new(2)))
            .await
            .unwrap();
        assert!(deleted.results.unwrap()[0].success);

        let missing = client
            .get_record_by_id("appointment_c", RecordId::new(2), &RecordQuery::default())
            .await
            .unwrap();
        assert!(!missing.success);
    }

    #[tokio::test]
    async fn test_seed_keeps_given_ids() {
        let client = MemoryDataClient::new();
        let ids = client.seed("bed_c", [json!({"Id": 10}), json!({"number_c": "B"})]);
        assert_eq!(ids, vec![RecordId::new(10), RecordId::new(11)]);
    }
}
