use std::fmt;
use std::result;

use serde::{Deserialize, Deserializer, Serialize};

/// Top-level ID Converter JSON response
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct IdConvResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub records: Option<Vec<IdConvRecord>>,
}

impl IdConvResponse {
    /// The service answers malformed requests with 200 and `"status": "error"`
    pub fn error_message(&self) -> Option<String> {
        match self.status.as_deref() {
            Some(status) if status.eq_ignore_ascii_case("error") => Some(
                self.message
                    .clone()
                    .unwrap_or_else(|| "unknown converter error".to_string()),
            ),
            _ => None,
        }
    }
}

fn non_blank(id: &Option<String>) -> Option<&str> {
    id.as_deref().map(str::trim).filter(|id| !id.is_empty())
}

/// One correlation record; every field is optional on the wire
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct IdConvRecord {
    #[serde(default, rename = "requested-id", deserialize_with = "string_or_number")]
    pub requested_id: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub pmid: Option<String>,
    #[serde(default)]
    pub pmcid: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub errmsg: Option<String>,
}

impl IdConvRecord {
    /// Identifier this record answers: the echoed request ID, else the reported PMID
    pub fn source_id(&self) -> Option<&str> {
        non_blank(&self.requested_id).or_else(|| non_blank(&self.pmid))
    }

    /// Resolved PMCID, or `None` for per-record errors and empty values
    pub fn target_id(&self) -> Option<&str> {
        if matches!(self.status.as_deref(), Some(s) if s.eq_ignore_ascii_case("error")) {
            return None;
        }
        self.pmcid
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Accept `"123"`, `123` or `null` for ID fields
fn string_or_number<'de, D>(deserializer: D) -> result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, Visitor};

    struct IdVisitor;

    impl<'de> Visitor<'de> for IdVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an identifier as string or number")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E: de::Error>(self, value: String) -> result::Result<Self::Value, E> {
            Ok(Some(value))
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> result::Result<Self::Value, E> {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E: de::Error>(self) -> result::Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> result::Result<Self::Value, E> {
            Ok(None)
        }
    }

    deserializer.deserialize_any(IdVisitor)
}
