// Shared prompt fragments and prompt-building utilities.
// Each module that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to every prompt whose answer is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str =
    "Return only valid JSON, no additional text or explanation.";

/// Appended to every scoring prompt.
pub const REASON_STYLE_INSTRUCTION: &str = "\
- Reason should be in same language as the language of the CV.
- Reason should be in markdown format. And short and concise.";

/// Fills `{name}` placeholders in a template. Unknown placeholders are left in place.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_replaces_every_occurrence() {
        let out = render("{a} and {a} then {b}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and x then y");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{missing}", &[("a", "x")]), "{missing}");
    }
}
