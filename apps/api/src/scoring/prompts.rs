// Category scoring prompts. One shared frame; the criteria differ per category.

use crate::llm_client::prompts::{render, REASON_STYLE_INSTRUCTION};
use crate::scoring::Category;

const SCORE_PROMPT_TEMPLATE: &str = r#"Please read the following JD and information about {topic} of candidate in CV and compute the score between them. Score will be [0-100].

JD content:
{jd_text}

information about {topic} of candidate in CV content:
{excerpt}

Criteria:
{criteria}
- Return text **only** json object by following format:
{
    "score": 0-100,
    "reason": "reason for the score"
}
{reason_style}"#;

fn criteria(category: Category) -> &'static str {
    match category {
        Category::Education => "\
- The score is computed based on the similarity between the information about field of study required in JD and the information about education of candidate in CV.
- Point will be higher if the university is famous and the final point of degree is higher.",
        Category::Experience => "\
- The score is computed based on the similarity between the JD and the information about experience of candidate in CV.
- Point will be higher if the experience is relevant to the JD and the experience is more recent.",
        Category::Skills => "\
- The score is computed based on the similarity between the JD and the information about skills of candidate in CV.
- Point will be higher if the skills are relevant to the JD and the skills are more recent.",
        Category::Awards => "\
- The score is computed based on the similarity between the JD and the information about awards of candidate in CV.
- Point will be higher if the awards are relevant to the JD and the awards are more recent.",
        Category::Languages => "\
- The score is computed based on the similarity between the JD and the information about languages of candidate in CV.
- Point will be higher if the languages are relevant to the JD.
- More languages will be better.",
    }
}

/// Builds the scoring prompt for one category.
pub fn score_prompt(category: Category, jd_text: &str, excerpt: &str) -> String {
    let topic = category.as_str().to_lowercase();
    // Excerpt and JD go in last so placeholder-like text inside them is never expanded.
    let frame = render(
        SCORE_PROMPT_TEMPLATE,
        &[
            ("topic", &topic),
            ("criteria", criteria(category)),
            ("reason_style", REASON_STYLE_INSTRUCTION),
        ],
    );
    let (head, tail) = frame
        .split_once("{excerpt}")
        .unwrap_or((frame.as_str(), ""));
    let head = head.replacen("{jd_text}", jd_text, 1);
    format!("{head}{excerpt}{tail}")
}
