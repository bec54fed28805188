use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::RawCompletion;
use crate::domain::DomainError;

/// Largest array index a path segment may name.
pub const MAX_ARRAY_INDEX: usize = 64;

/// Dot-separated location of the completion text inside a model response.
///
/// Numeric segments index into arrays, so `results.0.outputText` reads
/// `body["results"][0]["outputText"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResponsePath {
    segments: Vec<String>,
}

impl ResponsePath {
    pub fn parse(path: &str) -> Result<Self, DomainError> {
        let segments: Vec<String> = path.split('.').map(str::to_string).collect();
        if segments.iter().any(|s| s.is_empty()) {
            return Err(DomainError::configuration(format!(
                "invalid response path '{path}'"
            )));
        }
        if let Some(segment) = segments.iter().find(|s| is_oversized_index(s)) {
            return Err(DomainError::configuration(format!(
                "array index '{segment}' in response path '{path}' exceeds {MAX_ARRAY_INDEX}"
            )));
        }
        Ok(Self { segments })
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Walk the path and return the string found at its end.
    pub fn extract(&self, body: &Value) -> Result<RawCompletion, DomainError> {
        let mut current = body;
        for segment in &self.segments {
            let next = match current {
                Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
                Value::Object(map) => map.get(segment),
                _ => None,
            };
            current = next.ok_or_else(|| {
                DomainError::invalid_response(format!(
                    "response has no value at '{}' (missing '{segment}')",
                    self
                ))
            })?;
        }

        current
            .as_str()
            .map(RawCompletion::new)
            .ok_or_else(|| {
                DomainError::invalid_response(format!("value at '{}' is not a string", self))
            })
    }

    /// Build the smallest JSON document that holds `text` at this path.
    ///
    /// Numeric segments past `MAX_ARRAY_INDEX` become object keys, which
    /// `extract` reads back the same way.
    pub fn wrap(&self, text: &str) -> Value {
        self.segments
            .iter()
            .rev()
            .fold(Value::String(text.to_string()), |inner, segment| {
                match segment.parse::<usize>() {
                    Ok(index) if index <= MAX_ARRAY_INDEX => {
                        let mut items = vec![Value::Null; index];
                        items.push(inner);
                        Value::Array(items)
                    }
                    _ => {
                        let mut map = Map::new();
                        map.insert(segment.clone(), inner);
                        Value::Object(map)
                    }
                }
            })
    }
}

fn is_oversized_index(segment: &str) -> bool {
    segment.bytes().all(|b| b.is_ascii_digit())
        && segment
            .parse::<usize>()
            .map_or(true, |index| index > MAX_ARRAY_INDEX)
}

impl std::fmt::Display for ResponsePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl TryFrom<String> for ResponsePath {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ResponsePath> for String {
    fn from(path: ResponsePath) -> Self {
        path.to_string()
    }
}
