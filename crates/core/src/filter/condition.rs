//! Single filter conditions.

use serde::{Deserialize, Serialize};

use crate::media::MediaAsset;

/// Media attribute a condition inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Title,
    Year,
    IsMovie,
    TxdbId,
    Monitor,
    TrailerExists,
    FolderPath,
}

/// Comparison applied to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    IsEmpty,
    IsNotEmpty,
}

/// One `field condition value` clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: FilterField,
    pub condition: FilterOp,
    /// Right-hand operand. Ignored by `is_empty` / `is_not_empty`.
    #[serde(default)]
    pub value: String,
}

impl FilterCondition {
    /// Create a new condition.
    pub fn new(field: FilterField, condition: FilterOp, value: impl Into<String>) -> Self {
        Self {
            field,
            condition,
            value: value.into(),
        }
    }

    /// Evaluate the condition against a media item.
    pub fn evaluate(&self, media: &MediaAsset) -> bool {
        let actual = field_value(self.field, media).to_lowercase();
        let expected = self.value.trim().to_lowercase();

        match self.condition {
            FilterOp::Equals => actual == expected,
            FilterOp::NotEquals => actual != expected,
            FilterOp::Contains => actual.contains(&expected),
            FilterOp::NotContains => !actual.contains(&expected),
            FilterOp::StartsWith => actual.starts_with(&expected),
            FilterOp::EndsWith => actual.ends_with(&expected),
            FilterOp::GreaterThan => compare_numeric(&actual, &expected, |a, b| a > b),
            FilterOp::LessThan => compare_numeric(&actual, &expected, |a, b| a < b),
            FilterOp::IsEmpty => actual.is_empty(),
            FilterOp::IsNotEmpty => !actual.is_empty(),
        }
    }
}

fn field_value(field: FilterField, media: &MediaAsset) -> String {
    match field {
        FilterField::Title => media.title.clone(),
        FilterField::Year => media.year.map(|y| y.to_string()).unwrap_or_default(),
        FilterField::IsMovie => media.is_movie.to_string(),
        FilterField::TxdbId => media.txdb_id.clone(),
        FilterField::Monitor => media.monitor.to_string(),
        FilterField::TrailerExists => media.trailer_exists.to_string(),
        FilterField::FolderPath => media
            .folder_path
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default(),
    }
}

// Non-numeric operands never match.
fn compare_numeric(actual: &str, expected: &str, cmp: impl Fn(i64, i64) -> bool) -> bool {
    match (actual.parse::<i64>(), expected.parse::<i64>()) {
        (Ok(a), Ok(b)) => cmp(a, b),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;
    use std::path::PathBuf;

    fn cond(field: FilterField, op: FilterOp, value: &str) -> FilterCondition {
        FilterCondition::new(field, op, value)
    }

    #[test]
    fn test_text_comparisons_are_case_insensitive() {
        let media = fixtures::movie(1, "Blade Runner", "78");

        assert!(cond(FilterField::Title, FilterOp::Equals, "blade runner").evaluate(&media));
        assert!(cond(FilterField::Title, FilterOp::Contains, "RUNNER").evaluate(&media));
        assert!(cond(FilterField::Title, FilterOp::StartsWith, "Blade").evaluate(&media));
        assert!(cond(FilterField::Title, FilterOp::EndsWith, "ner").evaluate(&media));
        assert!(cond(FilterField::Title, FilterOp::NotContains, "2049").evaluate(&media));
        assert!(cond(FilterField::Title, FilterOp::NotEquals, "Blade").evaluate(&media));
    }

    #[test]
    fn test_numeric_comparisons() {
        let mut media = fixtures::movie(1, "Heat", "949");
        media.year = Some(1995);

        assert!(cond(FilterField::Year, FilterOp::GreaterThan, "1990").evaluate(&media));
        assert!(!cond(FilterField::Year, FilterOp::GreaterThan, "1995").evaluate(&media));
        assert!(cond(FilterField::Year, FilterOp::LessThan, "2000").evaluate(&media));
    }

    #[test]
    fn test_numeric_comparison_fails_closed() {
        let mut media = fixtures::movie(1, "Heat", "949");
        media.year = None;
        assert!(!cond(FilterField::Year, FilterOp::GreaterThan, "1990").evaluate(&media));
        assert!(!cond(FilterField::Year, FilterOp::LessThan, "1990").evaluate(&media));

        media.year = Some(1995);
        assert!(!cond(FilterField::Year, FilterOp::GreaterThan, "nineties").evaluate(&media));
    }

    #[test]
    fn test_boolean_fields() {
        let media = fixtures::series(1, "Fargo", "269613");

        assert!(cond(FilterField::IsMovie, FilterOp::Equals, "false").evaluate(&media));
        assert!(cond(FilterField::Monitor, FilterOp::Equals, "True").evaluate(&media));
        assert!(cond(FilterField::TrailerExists, FilterOp::Equals, "false").evaluate(&media));
    }

    #[test]
    fn test_empty_checks() {
        let mut media = fixtures::movie(1, "Solaris", "593");
        media.folder_path = None;
        assert!(cond(FilterField::FolderPath, FilterOp::IsEmpty, "").evaluate(&media));

        media.folder_path = Some(PathBuf::from("/movies/Solaris"));
        assert!(cond(FilterField::FolderPath, FilterOp::IsNotEmpty, "").evaluate(&media));
        assert!(cond(FilterField::FolderPath, FilterOp::Contains, "/movies").evaluate(&media));
    }

    #[test]
    fn test_txdb_id_match() {
        let media = fixtures::movie(1, "Up", "14160");
        assert!(cond(FilterField::TxdbId, FilterOp::Equals, " 14160 ").evaluate(&media));
    }
}
