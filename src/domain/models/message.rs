use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// The user's message as received from the inbound request.
///
/// Only presence is checked; an empty string is a valid query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query(String);

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Build a query from an optional request field, failing when it is absent.
    pub fn from_param(value: Option<&str>, name: &str) -> Result<Self, DomainError> {
        value
            .map(Self::new)
            .ok_or_else(|| DomainError::invalid_input(format!("missing required parameter '{name}'")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Completion text exactly as the model returned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCompletion(String);

impl RawCompletion {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Reply text ready to hand back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CleanedReply(String);

impl CleanedReply {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_from_missing_param_is_invalid_input() {
        let err = Query::from_param(None, "q").unwrap_err();
        assert!(matches!(err, DomainError::InvalidInput(_)));
        assert!(err.to_string().contains("'q'"));
    }

    #[test]
    fn query_accepts_empty_value() {
        let query = Query::from_param(Some(""), "q").unwrap();
        assert_eq!(query.as_str(), "");
    }

    #[test]
    fn cleaned_reply_serializes_as_plain_string() {
        let reply = CleanedReply::new("Hi.");
        assert_eq!(serde_json::to_string(&reply).unwrap(), "\"Hi.\"");
    }
}
