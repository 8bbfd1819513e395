use anyhow::{Context, Result};

use crate::scoring::aggregate::MissingScorePolicy;

pub const DEFAULT_LLM_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub genai_api_key: String,
    /// When unset, OCR falls back to the PDF text layer.
    pub vision_api_key: Option<String>,
    pub llm_model: String,
    pub llm_timeout_secs: u64,
    pub ocr_timeout_secs: u64,
    pub missing_score_policy: MissingScorePolicy,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            genai_api_key: require_env("GOOGLE_GENAI_API_KEY")?,
            vision_api_key: optional_env("GOOGLE_VISION_API_KEY"),
            llm_model: optional_env("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            llm_timeout_secs: parse_env("LLM_TIMEOUT_SECS", 120)?,
            ocr_timeout_secs: parse_env("OCR_TIMEOUT_SECS", 30)?,
            missing_score_policy: optional_env("MISSING_SCORE_POLICY")
                .map(|v| v.parse::<MissingScorePolicy>())
                .transpose()
                .map_err(|e| anyhow::anyhow!("MISSING_SCORE_POLICY: {e} (expected 'zero' or 'abort')"))?
                .unwrap_or_default(),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_env("PORT", 8000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Returns the variable only when it is set and non-blank.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}
