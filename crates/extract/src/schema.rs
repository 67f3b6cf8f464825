use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Placeholder for any field the model could not fill.
pub const NOT_FOUND: &str = "Not found";
pub const UNKNOWN_STATUS: &str = "unknown";

/// Description carried by records whose query failed.
pub const ERROR_DESCRIPTION: &str = "Error occurred during search";

fn not_found() -> String {
    NOT_FOUND.to_string()
}

fn unknown_status() -> String {
    UNKNOWN_STATUS.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Website,
    Email,
    Linkedin,
    Twitter,
    Other,
}

impl ContactField {
    pub const ALL: [ContactField; 5] = [
        ContactField::Website,
        ContactField::Email,
        ContactField::Linkedin,
        ContactField::Twitter,
        ContactField::Other,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ContactField::Website => "website",
            ContactField::Email => "email",
            ContactField::Linkedin => "linkedin",
            ContactField::Twitter => "twitter",
            ContactField::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(default = "not_found")]
    pub website: String,
    #[serde(default = "not_found")]
    pub email: String,
    #[serde(default = "not_found")]
    pub linkedin: String,
    #[serde(default = "not_found")]
    pub twitter: String,
    #[serde(default = "not_found")]
    pub other: String,
    /// Contact channels the model added beyond the five known ones.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for ContactInfo {
    fn default() -> Self {
        Self {
            website: not_found(),
            email: not_found(),
            linkedin: not_found(),
            twitter: not_found(),
            other: not_found(),
            extra: Map::new(),
        }
    }
}

impl ContactInfo {
    pub fn get(&self, field: ContactField) -> &str {
        match field {
            ContactField::Website => &self.website,
            ContactField::Email => &self.email,
            ContactField::Linkedin => &self.linkedin,
            ContactField::Twitter => &self.twitter,
            ContactField::Other => &self.other,
        }
    }

    pub fn get_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Website => &mut self.website,
            ContactField::Email => &mut self.email,
            ContactField::Linkedin => &mut self.linkedin,
            ContactField::Twitter => &mut self.twitter,
            ContactField::Other => &mut self.other,
        }
    }

    /// True unless the field holds the "Not found" sentinel.
    pub fn has(&self, field: ContactField) -> bool {
        self.get(field) != NOT_FOUND
    }

    /// Optional view of a field for presentation: the sentinel and blank
    /// values both read as `None`.
    pub fn found(&self, field: ContactField) -> Option<&str> {
        let value = self.get(field);
        if value == NOT_FOUND || value.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

/// Hiring bucket derived from the free-form status string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HiringStatus {
    Yes,
    No,
    Unknown,
}

impl HiringStatus {
    /// Case-insensitive; anything other than yes/no is `Unknown`.
    pub fn classify(status: &str) -> Self {
        if status.eq_ignore_ascii_case("yes") {
            HiringStatus::Yes
        } else if status.eq_ignore_ascii_case("no") {
            HiringStatus::No
        } else {
            HiringStatus::Unknown
        }
    }
}

/// One record per queried startup, success or failure.
///
/// Every record carries `startup_name`, `description`, `keywords`,
/// `hiring_status` and `contact_info`; failures fill them with placeholders
/// and set `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartupInfo {
    pub startup_name: String,
    #[serde(default = "not_found")]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "unknown_status")]
    pub hiring_status: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Kept only when the response contained braces that failed to parse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    /// Top-level keys the model returned outside the fixed schema.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StartupInfo {
    /// Record built from unstructured text.
    pub fn unstructured(startup_name: &str, description: &str) -> Self {
        Self {
            startup_name: startup_name.to_string(),
            description: description.to_string(),
            keywords: Vec::new(),
            hiring_status: unknown_status(),
            contact_info: ContactInfo::default(),
            error: None,
            raw_response: None,
            extra: Map::new(),
        }
    }

    pub fn failed(startup_name: &str, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::unstructured(startup_name, ERROR_DESCRIPTION)
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn hiring(&self) -> HiringStatus {
        HiringStatus::classify(&self.hiring_status)
    }
}
