//! Category scoring — five fixed dimensions, each scored independently by the
//! generative capability and then averaged into one ranking metric.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::extraction::CandidateInfo;

pub mod aggregate;
pub mod prompts;
pub mod scorer;

pub use aggregate::{aggregate, MissingScorePolicy, ScoreBundle};
pub use scorer::score_category;

/// A scoring dimension. Declaration order is the output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Education,
    Experience,
    Skills,
    Awards,
    Languages,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Education,
        Category::Experience,
        Category::Skills,
        Category::Awards,
        Category::Languages,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Education => "Education",
            Category::Experience => "Experience",
            Category::Skills => "Skills",
            Category::Awards => "Awards",
            Category::Languages => "Languages",
        }
    }

    /// Candidate fields feeding this category's excerpt, with their labels.
    pub fn sources(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Category::Education => &[("Education", "education")],
            Category::Experience => &[("Experience", "experience")],
            Category::Skills => &[("Skills", "skills"), ("Projects", "projects")],
            Category::Awards => &[("Awards", "awards"), ("Publications", "publications")],
            Category::Languages => &[("Languages", "languages")],
        }
    }

    /// Builds the text slice of `info` that is scored for this category.
    pub fn excerpt(self, info: &CandidateInfo) -> String {
        self.sources()
            .iter()
            .map(|(label, field)| format!("{label}: {}", info.text(field)))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn info() -> CandidateInfo {
        CandidateInfo {
            education: json!("BSc Biology, 2015"),
            experience: json!([{"company name": "Acme", "position": "Go developer"}]),
            skills: json!(["Go", "SQL"]),
            projects: json!("Payment gateway"),
            awards: json!(""),
            publications: json!("Paper on caching"),
            languages: json!(["English", "Vietnamese"]),
            ..CandidateInfo::default()
        }
    }

    #[test]
    fn test_single_field_excerpts() {
        let info = info();
        assert_eq!(Category::Education.excerpt(&info), "Education: BSc Biology, 2015");
        assert_eq!(
            Category::Experience.excerpt(&info),
            r#"Experience: [{"company name":"Acme","position":"Go developer"}]"#
        );
        assert_eq!(
            Category::Languages.excerpt(&info),
            r#"Languages: ["English","Vietnamese"]"#
        );
    }

    #[test]
    fn test_skills_excerpt_includes_projects() {
        assert_eq!(
            Category::Skills.excerpt(&info()),
            "Skills: [\"Go\",\"SQL\"]\nProjects: Payment gateway"
        );
    }

    #[test]
    fn test_awards_excerpt_includes_publications() {
        assert_eq!(
            Category::Awards.excerpt(&info()),
            "Awards: \nPublications: Paper on caching"
        );
    }

    #[test]
    fn test_category_serializes_as_name() {
        assert_eq!(serde_json::to_value(Category::Skills).unwrap(), json!("Skills"));
        assert_eq!(Category::Awards.to_string(), "Awards");
    }

    #[test]
    fn test_all_is_in_declaration_order() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
    }
}
