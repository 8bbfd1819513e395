// Candidate extraction prompt.

use crate::llm_client::prompts::{render, JSON_ONLY_INSTRUCTION};

const CANDIDATE_EXTRACT_PROMPT_TEMPLATE: &str = r#"Please read the following markdown and extract all available candidate information into a single JSON object without code block.

Markdown content:
{cv_text}

Your task:
- Parse the markdown and identify the candidate's details.
- Return only a JSON object without code block containing the following fields:

{
    "name": "",
    "email": "",
    "phone": "",
    "address": "",
    "education": "",
    "experience": "",
    "skills": "",
    "projects": "",
    "awards": "",
    "publications": "",
    "languages": ""
}

Guidelines:
- Each list field should contain full extracted items.
- Fill each field with the extracted information from the markdown.
- If a field is not present or cannot be determined, leave it as an empty string.
- "education" is a list of objects, each containing "start - end", "school name", "degree", "description", ordered by time.
- "experience" is a list of objects, each containing "start - end", "company name", "position", "description", ordered by time.
- "skills" is a list of strings.
- "projects" is a list of objects, each containing "name", "description", "technologies used".
- "awards" is a list of objects, each containing "name", "date", "description".
- "publications" is a list of objects, each containing "title", "date", "description".
- "languages" is a list of strings.
- {json_only}"#;


/// Builds the extraction prompt for one CV.
pub fn extract_prompt(cv_text: &str) -> String {
    // CV text goes in last so placeholder-like text inside it is never expanded.
    let frame = render(
        CANDIDATE_EXTRACT_PROMPT_TEMPLATE,
        &[("json_only", JSON_ONLY_INSTRUCTION)],
    );
    match frame.split_once("{cv_text}") {
        Some((head, tail)) => format!("{head}{cv_text}{tail}"),
        None => frame,
    }
}
