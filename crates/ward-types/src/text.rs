use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input was empty or contained only whitespace.
    #[error("text cannot be empty")]
    Empty,
}

/// Trimmed text that is guaranteed to contain at least one non-whitespace character.
///
/// Used for configuration values such as project identifiers and keys, where an empty
/// string would only surface later as a confusing remote rejection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        match input.as_ref().trim() {
            "" => Err(TextError::Empty),
            trimmed => Ok(Self(trimmed.to_owned())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Text as the hosted store and the UI actually send it.
///
/// Scalar columns such as bed numbers or phone numbers come back as JSON strings most of
/// the time, but numbers and booleans show up too. `LooseText` accepts any JSON scalar
/// and keeps its textual form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LooseText(String);

impl LooseText {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for LooseText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LooseText {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for LooseText {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<LooseText> for String {
    fn from(value: LooseText) -> Self {
        value.0
    }
}

impl Serialize for LooseText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for LooseText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Scalar {
            Text(String),
            Int(i64),
            Float(f64),
            Bool(bool),
        }

        Ok(LooseText(match Scalar::deserialize(deserializer)? {
            Scalar::Text(s) => s,
            Scalar::Int(i) => i.to_string(),
            Scalar::Float(f) => f.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_empty_text_trims() {
        let text = NonEmptyText::new("  proj-1 ").unwrap();
        assert_eq!(text.as_str(), "proj-1");
    }

    #[test]
    fn non_empty_text_rejects_blank() {
        assert!(matches!(NonEmptyText::new("   "), Err(TextError::Empty)));
    }

    #[test]
    fn loose_text_accepts_scalars() {
        let from_str: LooseText = serde_json::from_str("\"A-101\"").unwrap();
        let from_int: LooseText = serde_json::from_str("101").unwrap();
        let from_bool: LooseText = serde_json::from_str("true").unwrap();
        assert_eq!(from_str.as_str(), "A-101");
        assert_eq!(from_int.as_str(), "101");
        assert_eq!(from_bool.as_str(), "true");
    }

    #[test]
    fn loose_text_rejects_objects() {
        assert!(serde_json::from_str::<LooseText>("{\"Id\": 1}").is_err());
    }
}
