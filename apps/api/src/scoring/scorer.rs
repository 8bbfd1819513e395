//! Category Scorer — asks the generator to score one category excerpt against a JD.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::extraction::candidate::preview;
use crate::extraction::json_extract::extract_json;
use crate::llm_client::TextGenerator;
use crate::scoring::prompts::score_prompt;
use crate::scoring::Category;

pub const MIN_SCORE: i64 = 0;
pub const MAX_SCORE: i64 = 100;

/// One category's score and the model's justification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryScore {
    /// Always within `[0, 100]`.
    pub score: u32,
    pub reason: String,
}

/// Why a category produced no usable score.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringFailure {
    #[error("generator call failed: {0}")]
    Generator(String),

    #[error("generator returned no text")]
    EmptyResponse,

    #[error("response is not a JSON object: {0}")]
    Malformed(String),

    #[error("response is missing '{0}'")]
    MissingField(&'static str),

    #[error("score is not numeric: {0}")]
    InvalidScore(String),

    #[error("scoring task did not complete")]
    NotRun,
}

/// Scores one category. Never panics and never propagates generator errors:
/// every failure along the chain comes back as a `ScoringFailure`.
pub async fn score_category(
    jd_text: &str,
    excerpt: &str,
    category: Category,
    generator: &dyn TextGenerator,
) -> Result<CategoryScore, ScoringFailure> {
    let prompt = score_prompt(category, jd_text, excerpt);

    let response = generator.generate(&prompt).await.map_err(|e| {
        warn!("LLM score {category} error: {e}");
        ScoringFailure::Generator(e.to_string())
    })?;

    let text = response.non_empty_text().ok_or_else(|| {
        warn!("LLM score {category} error: empty response");
        ScoringFailure::EmptyResponse
    })?;

    parse_score_response(text).map_err(|e| {
        warn!("LLM score {category} error: {e}. Text: {}", preview(text));
        e
    })
}

/// Extracts `{score, reason}` from raw model text.
///
/// The score is truncated toward zero and clamped to `[0, 100]`. Numeric
/// strings such as `"85"` or `"72.5"` are accepted.
pub fn parse_score_response(text: &str) -> Result<CategoryScore, ScoringFailure> {
    let json_text = extract_json(text);
    let value: Value = serde_json::from_str(&json_text)
        .map_err(|e| ScoringFailure::Malformed(e.to_string()))?;
    let Value::Object(map) = value else {
        return Err(ScoringFailure::Malformed("top-level value is not an object".into()));
    };

    let raw_score = map.get("score").ok_or(ScoringFailure::MissingField("score"))?;
    let reason = map.get("reason").ok_or(ScoringFailure::MissingField("reason"))?;

    let truncated = coerce_score(raw_score)?;
    let clamped = truncated.clamp(MIN_SCORE, MAX_SCORE);
    if clamped != truncated {
        warn!("Score {truncated} out of range, clamped to {clamped}");
    }

    Ok(CategoryScore {
        score: clamped as u32,
        reason: match reason {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        },
    })
}

fn coerce_score(value: &Value) -> Result<i64, ScoringFailure> {
    let as_float = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match as_float {
        Some(f) if f.is_finite() => Ok(f.trunc() as i64),
        _ => Err(ScoringFailure::InvalidScore(value.to_string())),
    }
}
