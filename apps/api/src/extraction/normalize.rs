//! Text Normalizer — strips model markup and noise tokens from raw generated text.

use std::sync::OnceLock;

use regex::Regex;

/// Grounding spans emitted by document models: `<|ref|>LABEL<|/ref|><|det|>BOXES<|/det|>`.
const REF_DET_PATTERN: &str = r"(?s)<\|ref\|>(.*?)<\|/ref\|><\|det\|>(.*?)<\|/det\|>";

/// Deleted as raw substrings, including inside words ("texture" becomes "ure").
const NOISE_TOKENS: &[&str] = &["text", "sub_title", "table", "image"];

fn ref_det_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(REF_DET_PATTERN).expect("ref/det pattern is valid"))
}

/// Cleans raw model output before JSON extraction.
///
/// Order matters:
/// 1. drop ```` ```markdown ```` and bare ```` ``` ```` fences
/// 2. collapse every ref/det span to its reference label
/// 3. delete the noise tokens as plain substrings
/// 4. drop ```` ```json ```` and any remaining ```` ``` ````
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let cleaned = raw.replace("```markdown", "").replace("```", "");
    let mut cleaned = ref_det_regex().replace_all(&cleaned, "$1").into_owned();

    for token in NOISE_TOKENS {
        cleaned = cleaned.replace(token, "");
    }

    cleaned.replace("```json", "").replace("```", "")
}
