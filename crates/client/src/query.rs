//! Query payloads sent with reads.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One requested field: `{"field": {"Name": "first_name_c"}}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSelector {
    pub field: FieldName,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldName {
    #[serde(rename = "Name")]
    pub name: String,
}

impl FieldSelector {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            field: FieldName { name: name.into() },
        }
    }

    pub fn name(&self) -> &str {
        &self.field.name
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    ExactMatch,
    Contains,
}

/// Top-level `where` condition. All conditions must hold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "FieldName")]
    pub field_name: String,
    #[serde(rename = "Operator")]
    pub operator: Operator,
    #[serde(rename = "Values")]
    pub values: Vec<Value>,
    /// `false` inverts the match.
    #[serde(rename = "Include", default = "include_default")]
    pub include: bool,
}

fn include_default() -> bool {
    true
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupOperator {
    #[serde(rename = "OR")]
    Or,
    #[serde(rename = "AND")]
    And,
}

/// A `whereGroups` entry combining its sub-groups with `operator`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConditionGroup {
    pub operator: GroupOperator,
    #[serde(rename = "subGroups")]
    pub sub_groups: Vec<SubGroup>,
}

/// Conditions inside one sub-group all have to hold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubGroup {
    pub conditions: Vec<GroupCondition>,
    #[serde(default)]
    pub operator: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupCondition {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    pub operator: Operator,
    pub values: Vec<Value>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortType {
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderBy {
    #[serde(rename = "fieldName")]
    pub field_name: String,
    pub sorttype: SortType,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagingInfo {
    pub limit: usize,
    pub offset: usize,
}

/// Body of a `fetch` call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FetchQuery {
    pub fields: Vec<FieldSelector>,
    #[serde(rename = "where", default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(rename = "whereGroups", default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<ConditionGroup>,
    #[serde(rename = "orderBy", default, skip_serializing_if = "Vec::is_empty")]
    pub order_by: Vec<OrderBy>,
    #[serde(rename = "pagingInfo", default, skip_serializing_if = "Option::is_none")]
    pub paging: Option<PagingInfo>,
}

impl FetchQuery {
    pub fn new(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().copied().map(FieldSelector::new).collect(),
            ..Self::default()
        }
    }

    /// Require `field` to equal `value` exactly.
    pub fn exact(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition {
            field_name: field.into(),
            operator: Operator::ExactMatch,
            values: vec![value.into()],
            include: true,
        });
        self
    }

    /// Require at least one of `fields` to contain `term`.
    pub fn any_contains(mut self, fields: &[&str], term: &str) -> Self {
        let sub_groups = fields
            .iter()
            .map(|field| SubGroup {
                conditions: vec![GroupCondition {
                    field_name: (*field).to_owned(),
                    operator: Operator::Contains,
                    values: vec![Value::String(term.to_owned())],
                }],
                operator: String::new(),
            })
            .collect();
        self.groups.push(ConditionGroup {
            operator: GroupOperator::Or,
            sub_groups,
        });
        self
    }

    pub fn order(mut self, field: impl Into<String>, sorttype: SortType) -> Self {
        self.order_by.push(OrderBy {
            field_name: field.into(),
            sorttype,
        });
        self
    }

    pub fn page(mut self, limit: usize, offset: usize) -> Self {
        self.paging = Some(PagingInfo { limit, offset });
        self
    }
}

/// Body options of a `get` call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordQuery {
    pub fields: Vec<FieldSelector>,
}

impl RecordQuery {
    pub fn new(fields: &[&str]) -> Self {
        Self {
            fields: fields.iter().copied().map(FieldSelector::new).collect(),
        }
    }
}
