//! Score Aggregator — folds the five category results into one ranking metric.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

use crate::scoring::scorer::{CategoryScore, ScoringFailure};
use crate::scoring::Category;

/// Divisor of the mean. Fixed: a category that failed still counts.
pub const CATEGORY_COUNT: usize = Category::ALL.len();

/// What to do when a category produced no score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingScorePolicy {
    /// Count the category as 0 and keep going.
    #[default]
    Zero,
    /// Fail the whole run.
    Abort,
}

impl FromStr for MissingScorePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" => Ok(MissingScorePolicy::Zero),
            "abort" => Ok(MissingScorePolicy::Abort),
            other => Err(format!("unknown missing-score policy '{other}'")),
        }
    }
}

/// The five category scores plus their mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBundle {
    pub per_category: BTreeMap<Category, CategoryScore>,
    pub total: f64,
    /// Categories that were substituted under `MissingScorePolicy::Zero`.
    pub failed: Vec<Category>,
}

impl ScoreBundle {
    pub fn scores(&self) -> BTreeMap<Category, u32> {
        self.per_category
            .iter()
            .map(|(c, s)| (*c, s.score))
            .collect()
    }

    pub fn reasons(&self) -> BTreeMap<Category, String> {
        self.per_category
            .iter()
            .map(|(c, s)| (*c, s.reason.clone()))
            .collect()
    }
}

/// Combines per-category outcomes under `policy`.
///
/// Every category in `Category::ALL` is considered; one absent from
/// `outcomes` is treated as `ScoringFailure::NotRun`. Under `Abort`, the
/// failed categories are returned as the error.
pub fn aggregate(
    mut outcomes: BTreeMap<Category, Result<CategoryScore, ScoringFailure>>,
    policy: MissingScorePolicy,
) -> Result<ScoreBundle, Vec<Category>> {
    let mut per_category = BTreeMap::new();
    let mut failed = Vec::new();

    for category in Category::ALL {
        match outcomes
            .remove(&category)
            .unwrap_or(Err(ScoringFailure::NotRun))
        {
            Ok(score) => {
                per_category.insert(category, score);
            }
            Err(failure) => {
                warn!("Category {category} has no score: {failure}");
                failed.push(category);
                per_category.insert(
                    category,
                    CategoryScore {
                        score: 0,
                        reason: format!("Scoring failed: {failure}"),
                    },
                );
            }
        }
    }

    if policy == MissingScorePolicy::Abort && !failed.is_empty() {
        return Err(failed);
    }

    let total = mean_score(per_category.values().map(|s| s.score));

    Ok(ScoreBundle {
        per_category,
        total,
        failed,
    })
}

/// Sum of the scores divided by the fixed category count.
pub fn mean_score(scores: impl IntoIterator<Item = u32>) -> f64 {
    let sum: u64 = scores.into_iter().map(u64::from).sum();
    sum as f64 / CATEGORY_COUNT as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(score: u32) -> Result<CategoryScore, ScoringFailure> {
        Ok(CategoryScore {
            score,
            reason: format!("scored {score}"),
        })
    }

    fn outcomes(scores: [u32; 5]) -> BTreeMap<Category, Result<CategoryScore, ScoringFailure>> {
        Category::ALL
            .into_iter()
            .zip(scores)
            .map(|(c, s)| (c, ok(s)))
            .collect()
    }

    #[test]
    fn test_mean_of_five_scores() {
        let bundle = aggregate(outcomes([20, 40, 60, 80, 100]), MissingScorePolicy::Zero).unwrap();
        assert_eq!(bundle.total, 60.0);
        assert!(bundle.failed.is_empty());
    }

    #[test]
    fn test_total_independent_of_category_order() {
        let a = aggregate(outcomes([20, 40, 60, 80, 100]), MissingScorePolicy::Zero).unwrap();
        let b = aggregate(outcomes([100, 80, 60, 40, 20]), MissingScorePolicy::Zero).unwrap();
        assert_eq!(a.total, b.total);
    }

    #[test]
    fn test_reasons_stay_with_their_category() {
        let bundle = aggregate(outcomes([10, 20, 30, 40, 50]), MissingScorePolicy::Zero).unwrap();
        assert_eq!(bundle.reasons()[&Category::Skills], "scored 30");
        assert_eq!(bundle.scores()[&Category::Languages], 50);
    }

    #[test]
    fn test_zero_policy_substitutes_failed_category() {
        let mut map = outcomes([50, 50, 50, 50, 50]);
        map.insert(Category::Awards, Err(ScoringFailure::EmptyResponse));
        let bundle = aggregate(map, MissingScorePolicy::Zero).unwrap();

        assert_eq!(bundle.failed, vec![Category::Awards]);
        assert_eq!(bundle.scores()[&Category::Awards], 0);
        assert!(bundle.reasons()[&Category::Awards].starts_with("Scoring failed"));
        assert_eq!(bundle.total, 40.0);
    }

    #[test]
    fn test_absent_category_counts_as_failure() {
        let mut map = outcomes([100, 100, 100, 100, 100]);
        map.remove(&Category::Education);
        let bundle = aggregate(map, MissingScorePolicy::Zero).unwrap();
        assert_eq!(bundle.failed, vec![Category::Education]);
        assert_eq!(bundle.total, 80.0);
    }

    #[test]
    fn test_abort_policy_reports_failed_categories() {
        let mut map = outcomes([50, 50, 50, 50, 50]);
        map.insert(Category::Skills, Err(ScoringFailure::MissingField("score")));
        map.insert(Category::Languages, Err(ScoringFailure::NotRun));
        let err = aggregate(map, MissingScorePolicy::Abort).unwrap_err();
        assert_eq!(err, vec![Category::Skills, Category::Languages]);
    }

    #[test]
    fn test_abort_policy_passes_when_all_succeed() {
        let bundle = aggregate(outcomes([0, 0, 0, 0, 5]), MissingScorePolicy::Abort).unwrap();
        assert_eq!(bundle.total, 1.0);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("zero".parse::<MissingScorePolicy>().unwrap(), MissingScorePolicy::Zero);
        assert_eq!(" Abort ".parse::<MissingScorePolicy>().unwrap(), MissingScorePolicy::Abort);
        assert!("skip".parse::<MissingScorePolicy>().is_err());
        assert_eq!(MissingScorePolicy::default(), MissingScorePolicy::Zero);
    }
}
