//! Job request parsing and validation
//!
//! Fields are read leniently: every field arrives as raw JSON and is judged
//! by truthiness (null, false, 0, "", [] and {} count as absent). Presence of
//! the required fields is checked before any type is looked at, so a body
//! without `audio_url` always reports that, whatever else it contains.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use thiserror::Error;

/// Validation errors, reported in check order
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("audio_url is required")]
    MissingAudioUrl,

    #[error("upload_token and worker_url are required")]
    MissingUploadTarget,

    /// Field present but of a type the tool cannot take
    #[error("{field} must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
}

/// Project identifier, passed through untouched
///
/// Callers send either a string or a number; whichever arrives is echoed
/// back in the same JSON type.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ProjectId {
    Text(String),
    Number(Number),
}

impl ProjectId {
    /// Empty string or zero
    pub fn is_blank(&self) -> bool {
        match self {
            ProjectId::Text(s) => s.is_empty(),
            ProjectId::Number(n) => n.as_f64() == Some(0.0),
        }
    }
}

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectId::Text(s) => f.write_str(s),
            ProjectId::Number(n) => write!(f, "{}", n),
        }
    }
}

/// Raw `/run` body after authentication
///
/// `api_key` is not listed: it is checked on the raw JSON before this
/// struct is built. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub audio_url: Value,
    #[serde(default)]
    pub id_projet: Value,
    #[serde(default)]
    pub upload_token: Value,
    #[serde(default)]
    pub worker_url: Value,
    #[serde(default)]
    pub vram_gb: Value,
    #[serde(default)]
    pub all_stems: Value,
}

/// A validated job, ready to run
#[derive(Debug, Clone, PartialEq)]
pub struct JobSpec {
    pub audio_url: String,
    pub id_projet: Option<ProjectId>,
    pub upload_token: String,
    pub worker_url: String,
    /// `--vram-gb` argument, rendered as the caller sent it
    pub vram_gb: Option<String>,
    pub all_stems: bool,
}

impl RunRequest {
    /// Check the request in order: `audio_url`, then the upload target,
    /// then the types of whatever is present
    pub fn validate(self) -> Result<JobSpec, ValidationError> {
        if !is_truthy(&self.audio_url) {
            return Err(ValidationError::MissingAudioUrl);
        }
        if !is_truthy(&self.upload_token) || !is_truthy(&self.worker_url) {
            return Err(ValidationError::MissingUploadTarget);
        }

        Ok(JobSpec {
            audio_url: required_text("audio_url", self.audio_url)?,
            id_projet: project_id(self.id_projet)?,
            upload_token: required_text("upload_token", self.upload_token)?,
            worker_url: required_text("worker_url", self.worker_url)?,
            vram_gb: vram_hint(self.vram_gb)?,
            all_stems: is_truthy(&self.all_stems),
        })
    }
}

/// Truthiness of a JSON value
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64() != Some(0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn required_text(field: &'static str, value: Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s),
        _ => Err(ValidationError::InvalidField {
            field,
            expected: "a string",
        }),
    }
}

fn project_id(value: Value) -> Result<Option<ProjectId>, ValidationError> {
    match value {
        Value::String(s) => Ok(Some(ProjectId::Text(s))),
        Value::Number(n) => Ok(Some(ProjectId::Number(n))),
        other if !is_truthy(&other) => Ok(None),
        _ => Err(ValidationError::InvalidField {
            field: "id_projet",
            expected: "a string or a number",
        }),
    }
}

fn vram_hint(value: Value) -> Result<Option<String>, ValidationError> {
    if !is_truthy(&value) {
        return Ok(None);
    }
    match value {
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::String(s) => Ok(Some(s)),
        _ => Err(ValidationError::InvalidField {
            field: "vram_gb",
            expected: "a number",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> RunRequest {
        serde_json::from_value(value).unwrap()
    }

    fn full() -> Value {
        json!({
            "audio_url": "https://example.com/song.mp3",
            "id_projet": "proj-42",
            "upload_token": "tok",
            "worker_url": "https://worker.example.com",
        })
    }

    #[test]
    fn test_valid_request() {
        let spec = parse(full()).validate().unwrap();
        assert_eq!(spec.audio_url, "https://example.com/song.mp3");
        assert_eq!(spec.id_projet, Some(ProjectId::Text("proj-42".to_string())));
        assert_eq!(spec.upload_token, "tok");
        assert_eq!(spec.worker_url, "https://worker.example.com");
        assert!(spec.vram_gb.is_none());
        assert!(!spec.all_stems);
    }

    #[test]
    fn test_missing_audio_url_wins_over_everything() {
        assert_eq!(
            RunRequest::default().validate(),
            Err(ValidationError::MissingAudioUrl)
        );

        let mut body = full();
        body["audio_url"] = json!("");
        assert_eq!(parse(body).validate(), Err(ValidationError::MissingAudioUrl));
    }

    #[test]
    fn test_missing_audio_url_wins_over_badly_typed_fields() {
        let body = json!({
            "all_stems": "yes",
            "vram_gb": [1, 2],
            "id_projet": {"nested": true},
            "upload_token": 5,
            "worker_url": "w",
        });
        assert_eq!(parse(body).validate(), Err(ValidationError::MissingAudioUrl));
    }

    #[test]
    fn test_upload_target_checked_jointly() {
        for field in ["upload_token", "worker_url"] {
            let mut body = full();
            body.as_object_mut().unwrap().remove(field);
            assert_eq!(
                parse(body).validate(),
                Err(ValidationError::MissingUploadTarget),
                "missing {}",
                field
            );

            let mut body = full();
            body[field] = json!("");
            assert_eq!(
                parse(body).validate(),
                Err(ValidationError::MissingUploadTarget),
                "empty {}",
                field
            );
        }
    }

    #[test]
    fn test_upload_target_wins_over_badly_typed_optionals() {
        let mut body = full();
        body.as_object_mut().unwrap().remove("worker_url");
        body["vram_gb"] = json!({"gb": 8});
        assert_eq!(parse(body).validate(), Err(ValidationError::MissingUploadTarget));
    }

    #[test]
    fn test_null_fields_count_as_absent() {
        let mut body = full();
        body["all_stems"] = json!(null);
        body["vram_gb"] = json!(null);
        body["id_projet"] = json!(null);
        let spec = parse(body).validate().unwrap();
        assert!(!spec.all_stems);
        assert!(spec.vram_gb.is_none());
        assert!(spec.id_projet.is_none());
    }

    #[test]
    fn test_vram_hint_rendered_as_given() {
        for (value, expected) in [
            (json!(0), None),
            (json!(""), None),
            (json!(12), Some("12")),
            (json!(7.5), Some("7.5")),
            (json!("8"), Some("8")),
        ] {
            let mut body = full();
            body["vram_gb"] = value.clone();
            assert_eq!(
                parse(body).validate().unwrap().vram_gb.as_deref(),
                expected,
                "vram_gb {}",
                value
            );
        }
    }

    #[test]
    fn test_all_stems_by_truthiness() {
        for (value, expected) in [
            (json!(true), true),
            (json!("yes"), true),
            (json!(1), true),
            (json!(false), false),
            (json!(0), false),
            (json!(""), false),
        ] {
            let mut body = full();
            body["all_stems"] = value.clone();
            assert_eq!(
                parse(body).validate().unwrap().all_stems,
                expected,
                "all_stems {}",
                value
            );
        }
    }

    #[test]
    fn test_unusable_types_rejected_after_presence_checks() {
        let mut body = full();
        body["audio_url"] = json!(42);
        assert_eq!(
            parse(body).validate(),
            Err(ValidationError::InvalidField {
                field: "audio_url",
                expected: "a string"
            })
        );

        let mut body = full();
        body["vram_gb"] = json!(true);
        assert_eq!(
            parse(body).validate().unwrap_err().to_string(),
            "vram_gb must be a number"
        );

        let mut body = full();
        body["id_projet"] = json!(["a"]);
        assert!(parse(body).validate().is_err());
    }

    #[test]
    fn test_numeric_project_id_round_trips_as_number() {
        let mut body = full();
        body["id_projet"] = json!(1234);
        let spec = parse(body).validate().unwrap();
        let id = spec.id_projet.unwrap();
        assert_eq!(id.to_string(), "1234");
        assert_eq!(serde_json::to_value(&id).unwrap(), json!(1234));
    }

    #[test]
    fn test_blank_project_ids() {
        assert!(ProjectId::Text(String::new()).is_blank());
        assert!(ProjectId::Number(Number::from(0)).is_blank());
        assert!(!ProjectId::Text("a".to_string()).is_blank());
        assert!(!ProjectId::Number(Number::from(7)).is_blank());
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let mut body = full();
        body["api_key"] = json!(12345);
        body["priority"] = json!("high");
        assert!(parse(body).validate().is_ok());
    }
}
