//! Encoding helpers shared by every entity.
//!
//! The hosted store keeps composite values flattened into text columns:
//! - lists as comma-joined strings
//! - identifier lists as comma-joined integers
//! - structured maps as JSON text
//!
//! and relation columns either as a bare identifier or as a nested `{Id, Name}` reference.

use crate::{WireError, WireResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ward_types::{Field, IntLike, LooseText, RecordId, ToRecordId};

/// Split a comma-joined list column into trimmed items.
///
/// An absent or blank column is the empty list.
pub fn split_list(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(s) if !s.trim().is_empty() => {
            s.split(',').map(|item| item.trim().to_owned()).collect()
        }
        _ => Vec::new(),
    }
}

/// Join list items into a comma-joined column. The empty list joins to `""`.
pub fn join_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a comma-joined identifier column, silently dropping non-numeric tokens.
pub fn split_ids(raw: Option<&str>) -> Vec<RecordId> {
    split_list(raw)
        .iter()
        .filter_map(|token| token.parse().ok())
        .collect()
}

pub fn join_ids(ids: &[RecordId]) -> String {
    ids.iter()
        .map(RecordId::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a JSON text column into a map.
///
/// Absent, malformed and non-object values all yield the empty map. A column that the
/// store already returned as an object is taken as is.
pub fn parse_json_map(raw: Option<&Value>) -> Map<String, Value> {
    match raw {
        Some(Value::Object(map)) => map.clone(),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

pub fn json_map_text(map: &Map<String, Value>) -> String {
    Value::Object(map.clone()).to_string()
}

/// A relation column as returned by the store.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Relation {
    Nested(RelationRef),
    Bare(IntLike),
}

/// Nested reference object carried by lookup columns.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct RelationRef {
    /// Lookup columns on unlinked rows come back as `{"Id": null, "Name": null}`.
    #[serde(rename = "Id", default)]
    pub id: Option<IntLike>,
    #[serde(rename = "Name", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<LooseText>,
}

impl Relation {
    /// The referenced identifier, whichever form the column took.
    pub fn id(&self) -> Option<RecordId> {
        self.as_int_like()?.to_record_id().ok()
    }

    /// `None` for a nested reference without an identifier.
    pub fn as_int_like(&self) -> Option<&IntLike> {
        match self {
            Relation::Nested(nested) => nested.id.as_ref(),
            Relation::Bare(bare) => Some(bare),
        }
    }

    pub fn into_int_like(self) -> Option<IntLike> {
        match self {
            Relation::Nested(nested) => nested.id,
            Relation::Bare(bare) => Some(bare),
        }
    }
}

impl From<RecordId> for Relation {
    fn from(id: RecordId) -> Self {
        Relation::Bare(id.into())
    }
}

/// Resolve an optional relation column to a bare identifier. Null stays null.
pub fn resolve_relation(raw: Option<&Relation>) -> Option<RecordId> {
    raw.and_then(Relation::id)
}

pub(crate) fn text(raw: Option<LooseText>) -> Option<String> {
    raw.map(LooseText::into_string)
}

// ----------------------------------------------------------------------------
// Dual-naming resolution
// ----------------------------------------------------------------------------

/// Stored-name list (already joined) wins over the view-name list.
pub(crate) fn list_field(
    stored: Field<LooseText>,
    view: Field<Vec<String>>,
) -> Field<LooseText> {
    stored.or(view.map(|items| LooseText::new(join_list(&items))))
}

/// Stored-name JSON column wins over the view-name map. Both end up as JSON text.
pub(crate) fn json_field(
    stored: Field<Value>,
    view: Field<Map<String, Value>>,
) -> Field<LooseText> {
    stored
        .map(|value| match value {
            Value::String(text) => LooseText::new(text),
            other => LooseText::new(other.to_string()),
        })
        .or(view.map(|map| LooseText::new(json_map_text(&map))))
}

/// A nested stored reference without an identifier clears the link.
pub(crate) fn relation_field(stored: Field<Relation>, view: Field<IntLike>) -> Field<IntLike> {
    let stored = match stored {
        Field::Value(relation) => relation.into_int_like().map_or(Field::Null, Field::Value),
        Field::Null => Field::Null,
        Field::Absent => Field::Absent,
    };
    stored.or(view)
}

/// Stored-name identifier list wins over the view-name list.
///
/// Every view-name item must be numeric; a single bad token fails the write.
pub(crate) fn id_list_field(
    field: &'static str,
    stored: Field<LooseText>,
    view: Field<Vec<IntLike>>,
) -> WireResult<Field<LooseText>> {
    let view = view.try_map(|items| {
        items
            .iter()
            .map(|item| coerce_int(field, item).map(RecordId::new))
            .collect::<WireResult<Vec<_>>>()
            .map(|ids| LooseText::new(join_ids(&ids)))
    })?;
    Ok(stored.or(view))
}

pub(crate) fn coerce_int(field: &'static str, value: &IntLike) -> WireResult<i64> {
    value.coerce().ok_or_else(|| WireError::NotAnInteger {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_round_trips_including_empty() {
        for raw in ["Penicillin,Latex", "Penicillin", ""] {
            let items = split_list(Some(raw));
            assert_eq!(join_list(&items), raw);
        }
    }

    #[test]
    fn absent_list_is_empty() {
        assert!(split_list(None).is_empty());
        assert!(split_list(Some("   ")).is_empty());
    }

    #[test]
    fn list_items_are_trimmed() {
        assert_eq!(split_list(Some("Mon 09:00, Tue 14:00")), vec!["Mon 09:00", "Tue 14:00"]);
    }

    #[test]
    fn id_list_drops_non_numeric_tokens() {
        let ids = split_ids(Some("1,two,3, ,4"));
        assert_eq!(ids, vec![RecordId::new(1), RecordId::new(3), RecordId::new(4)]);
    }

    #[test]
    fn json_map_defaults_to_empty() {
        assert!(parse_json_map(None).is_empty());
        assert!(parse_json_map(Some(&json!("not json"))).is_empty());
        assert!(parse_json_map(Some(&json!("[1,2]"))).is_empty());

        let parsed = parse_json_map(Some(&json!(r#"{"monday":["09:00"]}"#)));
        assert_eq!(parsed.get("monday"), Some(&json!(["09:00"])));
    }

    #[test]
    fn nested_and_bare_relations_resolve_alike() {
        let nested: Relation = serde_json::from_value(json!({"Id": 42, "Name": "Ada"})).unwrap();
        let bare: Relation = serde_json::from_value(json!(42)).unwrap();
        let text: Relation = serde_json::from_value(json!("42")).unwrap();

        assert_eq!(resolve_relation(Some(&nested)), Some(RecordId::new(42)));
        assert_eq!(resolve_relation(Some(&nested)), resolve_relation(Some(&bare)));
        assert_eq!(resolve_relation(Some(&bare)), resolve_relation(Some(&text)));
        assert_eq!(resolve_relation(None), None);
    }

    #[test]
    fn nested_relation_without_id_is_no_relation() {
        let empty: Relation =
            serde_json::from_value(json!({"Id": null, "Name": null})).unwrap();
        assert_eq!(resolve_relation(Some(&empty)), None);

        let nameless: Relation = serde_json::from_value(json!({"Name": "Ada"})).unwrap();
        assert_eq!(nameless.id(), None);

        let cleared = relation_field(Field::Value(empty), Field::Value(IntLike::Int(7)));
        assert_eq!(cleared, Field::Null);
    }

    #[test]
    fn stored_list_name_wins_over_view_name() {
        let resolved = list_field(
            Field::Value(LooseText::from("a,b")),
            Field::Value(vec!["c".into()]),
        );
        assert_eq!(resolved, Field::Value(LooseText::from("a,b")));

        let resolved = list_field(Field::Absent, Field::Value(vec![]));
        assert_eq!(resolved, Field::Value(LooseText::from("")));
    }

    #[test]
    fn id_list_rejects_bad_view_tokens() {
        let err = id_list_field(
            "current_patients_c",
            Field::Absent,
            Field::Value(vec![IntLike::Int(1), IntLike::from("x")]),
        )
        .expect_err("non-numeric id should fail");
        assert!(matches!(err, WireError::NotAnInteger { field: "current_patients_c", .. }));
    }
}
