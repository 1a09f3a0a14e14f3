//! Command domain rules.
//!
//! Every handler runs its inputs through this module before touching the
//! store: path segments are sanitized into a [`Scope`], request bodies are
//! validated into [`CommandFields`], and stored payloads are decoded back
//! into JSON with [`decode_data`].

use serde_json::Value;

use crate::error::CoreError;
use crate::types::CommandId;

/// Entity name used in error messages and log fields.
pub const ENTITY: &str = "Command";

// ---------------------------------------------------------------------------
// Path parameters
// ---------------------------------------------------------------------------

/// Remove every `/` from a decoded path segment.
///
/// `"foo/bar"` becomes `"foobar"`. Applied to all path parameters before they
/// reach a query or a comparison.
pub fn sanitize_segment(raw: &str) -> String {
    raw.replace('/', "")
}

/// The organization + repository pair that owns a command.
///
/// Lookups, updates and deletes always match on the full scope, so a command
/// created under one pair is invisible through any other.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    pub organization: String,
    pub repository: String,
}

impl Scope {
    /// Build a scope from raw path segments, sanitizing both.
    pub fn from_path(organization: &str, repository: &str) -> Self {
        Self {
            organization: sanitize_segment(organization),
            repository: sanitize_segment(repository),
        }
    }

    /// Reject scopes whose segments are empty after sanitation.
    pub fn require_complete(&self) -> Result<(), CoreError> {
        let message = match (self.organization.is_empty(), self.repository.is_empty()) {
            (false, false) => return Ok(()),
            (true, true) => "organization and repository are required",
            (true, false) => "organization is required",
            (false, true) => "repository is required",
        };
        Err(CoreError::Validation(message.into()))
    }
}

/// Sanitize a command id path segment.
pub fn sanitize_command_id(raw: &str) -> CommandId {
    sanitize_segment(raw)
}

/// Reject an empty command id.
pub fn require_command_id(id: &str) -> Result<(), CoreError> {
    if id.is_empty() {
        return Err(CoreError::Validation("commandId is required".into()));
    }
    Ok(())
}

/// Generate a fresh command id (UUID v4).
pub fn new_command_id() -> CommandId {
    uuid::Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// A validated `name` + `data` pair, with `data` already in storage form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFields {
    pub name: String,
    pub data: String,
}

/// Validate the body fields shared by create and update.
///
/// Both fields are required and must be non-blank. A non-blank `name` is
/// kept exactly as sent, surrounding whitespace included. `data` may arrive
/// either as a JSON-encoded string or as a structured JSON value; see
/// [`encode_data`].
pub fn validate_fields(name: Option<&str>, data: Option<&Value>) -> Result<CommandFields, CoreError> {
    let name = name.filter(|n| !n.trim().is_empty());
    let data = match data {
        Some(value) => encode_data(value)?,
        None => None,
    };

    match (name, data) {
        (Some(name), Some(data)) => Ok(CommandFields {
            name: name.to_string(),
            data,
        }),
        (None, None) => Err(CoreError::Validation("name and data are required".into())),
        (None, Some(_)) => Err(CoreError::Validation("name is required".into())),
        (Some(_), None) => Err(CoreError::Validation("data is required".into())),
    }
}

/// Convert an incoming `data` value into the text stored in the database.
///
/// - `null` and blank strings count as missing (`Ok(None)`).
/// - A string is stored verbatim once it parses as JSON.
/// - Any other value is re-serialized.
pub fn encode_data(value: &Value) -> Result<Option<String>, CoreError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => {
            serde_json::from_str::<Value>(text)
                .map_err(|e| CoreError::Validation(format!("data must be valid JSON: {e}")))?;
            Ok(Some(text.clone()))
        }
        other => Ok(Some(other.to_string())),
    }
}

/// Decode stored `data` text back into JSON.
///
/// A failure here means a stored row is corrupt and is reported as
/// [`CoreError::DataIntegrity`].
pub fn decode_data(id: &str, raw: &str) -> Result<Value, CoreError> {
    serde_json::from_str(raw).map_err(|e| CoreError::DataIntegrity {
        entity: ENTITY,
        id: id.to_string(),
        reason: format!("stored data is not valid JSON: {e}"),
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    // -- Sanitation --------------------------------------------------------

    #[test]
    fn sanitize_strips_every_slash() {
        assert_eq!(sanitize_segment("foo/bar"), "foobar");
        assert_eq!(sanitize_segment("/a//b/"), "ab");
        assert_eq!(sanitize_segment("plain"), "plain");
    }

    #[test]
    fn sanitize_can_empty_a_segment() {
        assert_eq!(sanitize_segment("///"), "");
    }

    #[test]
    fn scope_from_path_sanitizes_both_segments() {
        let scope = Scope::from_path("ac/me", "wid/gets");
        assert_eq!(scope.organization, "acme");
        assert_eq!(scope.repository, "widgets");
    }

    #[test]
    fn complete_scope_passes() {
        assert!(Scope::from_path("acme", "widgets").require_complete().is_ok());
    }

    #[test]
    fn empty_scope_segments_are_named() {
        let err = Scope::from_path("/", "widgets").require_complete().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "organization is required");

        let err = Scope::from_path("acme", "").require_complete().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "repository is required");

        let err = Scope::from_path("", "/").require_complete().unwrap_err();
        assert_matches!(
            err,
            CoreError::Validation(msg) if msg == "organization and repository are required"
        );
    }

    #[test]
    fn command_id_must_be_present() {
        assert!(require_command_id("abc").is_ok());
        assert_matches!(require_command_id(""), Err(CoreError::Validation(_)));
        assert_eq!(sanitize_command_id("a/b"), "ab");
    }

    #[test]
    fn new_ids_are_unique_uuids() {
        let a = new_command_id();
        let b = new_command_id();
        assert_ne!(a, b);
        assert!(uuid::Uuid::parse_str(&a).is_ok());
    }

    // -- Field validation --------------------------------------------------

    #[test]
    fn string_data_is_stored_verbatim() {
        let data = json!("{\"step\":1}");
        let fields = validate_fields(Some("build"), Some(&data)).unwrap();
        assert_eq!(fields.name, "build");
        assert_eq!(fields.data, "{\"step\":1}");
    }

    #[test]
    fn structured_data_is_serialized() {
        let data = json!({"step": 2});
        let fields = validate_fields(Some("build"), Some(&data)).unwrap();
        assert_eq!(fields.data, "{\"step\":2}");
    }

    #[test]
    fn missing_fields_are_reported_by_name() {
        let data = json!("{}");

        let err = validate_fields(None, Some(&data)).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "name is required");

        let err = validate_fields(Some("build"), None).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "data is required");

        let err = validate_fields(Some("  "), Some(&json!(""))).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "name and data are required");
    }

    #[test]
    fn null_data_counts_as_missing() {
        let err = validate_fields(Some("build"), Some(&Value::Null)).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg == "data is required");
    }

    #[test]
    fn non_json_string_data_is_rejected() {
        let err = validate_fields(Some("build"), Some(&json!("{not json"))).unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.starts_with("data must be valid JSON"));
    }

    #[test]
    fn name_is_kept_verbatim() {
        let fields = validate_fields(Some("  deploy \n"), Some(&json!([1, 2]))).unwrap();
        assert_eq!(fields.name, "  deploy \n");
        assert_eq!(fields.data, "[1,2]");
    }

    // -- Decoding ----------------------------------------------------------

    #[test]
    fn decode_returns_structured_value() {
        let value = decode_data("id-1", "{\"step\":1}").unwrap();
        assert_eq!(value, json!({"step": 1}));
    }

    #[test]
    fn corrupt_data_is_an_integrity_error() {
        let err = decode_data("id-1", "{broken").unwrap_err();
        assert_matches!(err, CoreError::DataIntegrity { id, .. } if id == "id-1");
    }
}
