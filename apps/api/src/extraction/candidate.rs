//! Candidate Info — the fixed eleven-field candidate schema and the LLM call that fills it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{error, info, warn};

use crate::extraction::json_extract::extract_json;
use crate::extraction::normalize::normalize;
use crate::extraction::prompts::extract_prompt;
use crate::llm_client::TextGenerator;

/// The eleven keys every `CandidateInfo` carries, in output order.
pub const CANDIDATE_FIELDS: [&str; 11] = [
    "name",
    "email",
    "phone",
    "address",
    "education",
    "experience",
    "skills",
    "projects",
    "awards",
    "publications",
    "languages",
];

/// Structured candidate data extracted from a CV.
///
/// Values are carried exactly as the model produced them: usually strings,
/// sometimes lists or objects. Missing fields hold an empty string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateInfo {
    pub name: Value,
    pub email: Value,
    pub phone: Value,
    pub address: Value,
    pub education: Value,
    pub experience: Value,
    pub skills: Value,
    pub projects: Value,
    pub awards: Value,
    pub publications: Value,
    pub languages: Value,
}

impl Default for CandidateInfo {
    fn default() -> Self {
        let empty = || Value::String(String::new());
        Self {
            name: empty(),
            email: empty(),
            phone: empty(),
            address: empty(),
            education: empty(),
            experience: empty(),
            skills: empty(),
            projects: empty(),
            awards: empty(),
            publications: empty(),
            languages: empty(),
        }
    }
}

impl CandidateInfo {
    /// Looks up a field by its schema key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        let value = match key {
            "name" => &self.name,
            "email" => &self.email,
            "phone" => &self.phone,
            "address" => &self.address,
            "education" => &self.education,
            "experience" => &self.experience,
            "skills" => &self.skills,
            "projects" => &self.projects,
            "awards" => &self.awards,
            "publications" => &self.publications,
            "languages" => &self.languages,
            _ => return None,
        };
        Some(value)
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut Value> {
        let slot = match key {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "phone" => &mut self.phone,
            "address" => &mut self.address,
            "education" => &mut self.education,
            "experience" => &mut self.experience,
            "skills" => &mut self.skills,
            "projects" => &mut self.projects,
            "awards" => &mut self.awards,
            "publications" => &mut self.publications,
            "languages" => &mut self.languages,
            _ => return None,
        };
        Some(slot)
    }

    /// The field rendered as prompt text. See [`value_text`].
    pub fn text(&self, key: &str) -> String {
        self.get(key).map(value_text).unwrap_or_default()
    }

    pub fn name_text(&self) -> String {
        self.text("name")
    }

    pub fn email_text(&self) -> String {
        self.text("email")
    }

    pub fn phone_text(&self) -> String {
        self.text("phone")
    }
}

/// Stringifies a JSON value for prompts and storage columns.
/// Strings are used verbatim, `null` becomes empty, anything else is compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Maps a parsed JSON object onto the fixed candidate schema.
/// Absent keys default to `""`; keys outside the schema are dropped.
pub fn normalize_candidate(parsed: &Map<String, Value>) -> CandidateInfo {
    let mut info = CandidateInfo::default();
    for key in CANDIDATE_FIELDS {
        if let (Some(value), Some(slot)) = (parsed.get(key), info.slot_mut(key)) {
            *slot = value.clone();
        }
    }
    info
}

/// Asks the generator to extract candidate details from CV text.
///
/// Returns `None` on any failure along the chain: generator error, missing
/// text, undecodable JSON, or JSON that is not an object.
pub async fn parse_candidate(cv_text: &str, generator: &dyn TextGenerator) -> Option<CandidateInfo> {
    let prompt = extract_prompt(cv_text);

    let response = match generator.generate(&prompt).await {
        Ok(response) => response,
        Err(e) => {
            error!("LLM extract error: {e}");
            return None;
        }
    };

    let Some(raw) = response.non_empty_text() else {
        error!("LLM response has no text");
        return None;
    };

    let cleaned = normalize(raw);
    let json_text = extract_json(&cleaned);

    let parsed = match serde_json::from_str::<Value>(&json_text) {
        Ok(Value::Object(map)) => map,
        Ok(other) => {
            warn!("Candidate JSON is not an object (got {})", json_kind(&other));
            return None;
        }
        Err(e) => {
            error!(
                "Error parsing JSON from LLM response: {e}. Text: {}",
                preview(&cleaned)
            );
            return None;
        }
    };

    let info = normalize_candidate(&parsed);
    let name = info.name_text();
    info!(
        "LLM parse successful for candidate: {}",
        if name.is_empty() { "Unknown" } else { &name }
    );
    Some(info)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// First 200 characters, for log lines.
pub(crate) fn preview(text: &str) -> String {
    text.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::{GenerationResponse, LlmError};
    use async_trait::async_trait;
    use serde_json::json;

    struct Canned(Result<GenerationResponse, u16>);

    #[async_trait]
    impl TextGenerator for Canned {
        async fn generate(&self, _prompt: &str) -> Result<GenerationResponse, LlmError> {
            match &self.0 {
                Ok(resp) => Ok(resp.clone()),
                Err(status) => Err(LlmError::Api {
                    status: *status,
                    message: "boom".to_string(),
                }),
            }
        }
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_missing_fields_default_to_empty_string() {
        let info = normalize_candidate(&object(json!({"name": "Ana"})));
        let value = serde_json::to_value(&info).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 11);
        assert_eq!(map["name"], "Ana");
        let empties = CANDIDATE_FIELDS
            .iter()
            .filter(|k| map[**k] == json!(""))
            .count();
        assert_eq!(empties, 10);
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let info = normalize_candidate(&object(json!({"name": "Ana", "hobbies": "chess"})));
        let value = serde_json::to_value(&info).unwrap();
        assert!(value.get("hobbies").is_none());
    }

    #[test]
    fn test_structured_values_carried_as_is() {
        let skills = json!(["Go", "Kubernetes"]);
        let info = normalize_candidate(&object(json!({"skills": skills.clone()})));
        assert_eq!(info.skills, skills);
        assert_eq!(info.text("skills"), r#"["Go","Kubernetes"]"#);
    }

    #[test]
    fn test_value_text_variants() {
        assert_eq!(value_text(&json!("plain")), "plain");
        assert_eq!(value_text(&Value::Null), "");
        assert_eq!(value_text(&json!({"a": 1})), r#"{"a":1}"#);
    }

    #[test]
    fn test_get_unknown_key() {
        assert!(CandidateInfo::default().get("salary").is_none());
        assert_eq!(CandidateInfo::default().text("salary"), "");
    }

    #[tokio::test]
    async fn test_parse_candidate_from_noisy_output() {
        let gen = Canned(Ok(GenerationResponse::from_text(
            "Here is the result:\n```json\n{\"name\": \"Ana\", \"email\": \"ana@mail.com\"}\n```",
        )));
        let info = parse_candidate("cv text", &gen).await.unwrap();
        assert_eq!(info.name_text(), "Ana");
        assert_eq!(info.email_text(), "ana@mail.com");
        assert_eq!(info.phone_text(), "");
    }

    #[tokio::test]
    async fn test_parse_candidate_generator_error_is_none() {
        let gen = Canned(Err(500));
        assert!(parse_candidate("cv text", &gen).await.is_none());
    }

    #[tokio::test]
    async fn test_parse_candidate_missing_text_is_none() {
        let gen = Canned(Ok(GenerationResponse::default()));
        assert!(parse_candidate("cv text", &gen).await.is_none());
    }

    #[tokio::test]
    async fn test_parse_candidate_truncated_json_is_none() {
        let gen = Canned(Ok(GenerationResponse::from_text("{\"name\": \"Ana\"")));
        assert!(parse_candidate("cv text", &gen).await.is_none());
    }

    #[tokio::test]
    async fn test_parse_candidate_non_object_is_none() {
        let gen = Canned(Ok(GenerationResponse::from_text("[1, 2, 3]")));
        assert!(parse_candidate("cv text", &gen).await.is_none());
    }

    #[tokio::test]
    async fn test_parse_candidate_empty_object_still_yields_defaults() {
        let gen = Canned(Ok(GenerationResponse::from_text("{}")));
        let info = parse_candidate("cv text", &gen).await.unwrap();
        assert_eq!(info, CandidateInfo::default());
    }
}
