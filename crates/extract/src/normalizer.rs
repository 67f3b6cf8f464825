use serde_json::{Map, Value};

use crate::schema::{ContactField, ContactInfo, NOT_FOUND, StartupInfo, UNKNOWN_STATUS};

/// How a raw model response was interpreted.
#[derive(Debug)]
pub enum ParseOutcome {
    /// The span from the first `{` to the last `}` parsed as a JSON object.
    Structured(Map<String, Value>),
    /// The response contains no `{` at all.
    NoBraces,
    /// A `{` was present but no parsable object could be cut out.
    InvalidJson(serde_json::Error),
}

impl ParseOutcome {
    pub fn classify(raw: &str) -> Self {
        let Some(start) = raw.find('{') else {
            return ParseOutcome::NoBraces;
        };

        // An opening brace with no closing one after it yields an empty span,
        // which fails to parse like any other malformed object.
        let candidate = match raw.rfind('}') {
            Some(end) if end > start => &raw[start..=end],
            _ => "",
        };

        match serde_json::from_str::<Map<String, Value>>(candidate) {
            Ok(object) => ParseOutcome::Structured(object),
            Err(e) => ParseOutcome::InvalidJson(e),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ParseOutcome::Structured(_) => "structured",
            ParseOutcome::NoBraces => "no_braces",
            ParseOutcome::InvalidJson(_) => "invalid_json",
        }
    }

    pub fn into_info(self, startup_name: &str, raw: &str) -> StartupInfo {
        match self {
            ParseOutcome::Structured(object) => from_object(&object, startup_name),
            ParseOutcome::NoBraces => StartupInfo::unstructured(startup_name, raw),
            ParseOutcome::InvalidJson(_) => StartupInfo {
                raw_response: Some(raw.to_string()),
                ..StartupInfo::unstructured(startup_name, raw)
            },
        }
    }
}

/// Turn a raw model response into a fixed-shape record. Pure: the same text
/// and name always give the same record.
pub fn normalize_response(raw: &str, startup_name: &str) -> StartupInfo {
    ParseOutcome::classify(raw).into_info(startup_name, raw)
}

/// Keys with a dedicated field on `StartupInfo`; everything else is kept in
/// `extra`. A model-supplied `error` or `raw_response` is dropped so that a
/// parsed answer never reads back as a failed record.
const RESERVED_KEYS: [&str; 7] = [
    "startup_name",
    "description",
    "keywords",
    "hiring_status",
    "contact_info",
    "error",
    "raw_response",
];

/// Strings are kept verbatim, other non-null values as compact JSON text.
fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

/// Fields are taken as the model wrote them; absent ones fall back to
/// placeholders so the record stays complete.
fn from_object(object: &Map<String, Value>, startup_name: &str) -> StartupInfo {
    let text = |key: &str| object.get(key).and_then(as_text);

    let keywords = match object.get("keywords") {
        Some(Value::Array(items)) => items.iter().filter_map(as_text).collect(),
        Some(other) => as_text(other).into_iter().collect(),
        None => Vec::new(),
    };

    let extra = object
        .iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    StartupInfo {
        startup_name: object
            .get("startup_name")
            .and_then(Value::as_str)
            .filter(|name| !name.trim().is_empty())
            .map_or_else(|| startup_name.to_string(), str::to_string),
        description: text("description").unwrap_or_else(|| NOT_FOUND.to_string()),
        keywords,
        hiring_status: object
            .get("hiring_status")
            .and_then(Value::as_str)
            .map_or_else(|| UNKNOWN_STATUS.to_string(), str::to_string),
        contact_info: object
            .get("contact_info")
            .and_then(Value::as_object)
            .map(contact_from_object)
            .unwrap_or_default(),
        error: None,
        raw_response: None,
        extra,
    }
}

fn contact_from_object(object: &Map<String, Value>) -> ContactInfo {
    let mut contact = ContactInfo::default();
    for (key, value) in object {
        match ContactField::ALL.into_iter().find(|field| field.key() == key.as_str()) {
            Some(field) => {
                if let Some(text) = as_text(value) {
                    *contact.get_mut(field) = text;
                }
            }
            None => {
                contact.extra.insert(key.clone(), value.clone());
            }
        }
    }
    contact
}
