//! Keyword category buckets and per-month counts.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime};
use serde::Serialize;

use super::Diagnostics;

/// Keyword that maps matching text to a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    keyword: String,
    category: String,
}

impl CategoryRule {
    /// A rule; the keyword is matched case-insensitively.
    #[must_use]
    pub fn new(keyword: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into().to_uppercase(),
            category: category.into(),
        }
    }
}

/// Ordered rules with a fallback category. The first matching rule wins,
/// wherever its keyword appears in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRules {
    rules: Vec<CategoryRule>,
    fallback: String,
}

/// Occurrences of one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    /// Category name.
    pub category: String,
    /// Matching records.
    pub count: usize,
}

impl CategoryRules {
    /// Build from ordered rules.
    #[must_use]
    pub fn new(rules: Vec<CategoryRule>, fallback: impl Into<String>) -> Self {
        Self {
            rules,
            fallback: fallback.into(),
        }
    }

    /// Destination buckets used by the logistics summary.
    #[must_use]
    pub fn logistics_destinations() -> Self {
        Self::new(
            ["CARBON", "CITY CLOU", "ECHAVEZ"]
                .into_iter()
                .map(|keyword| CategoryRule::new(keyword, keyword))
                .collect(),
            "OTHER",
        )
    }

    /// Category for `text`.
    #[must_use]
    pub fn classify(&self, text: &str) -> &str {
        let text = text.to_uppercase();
        self.rules
            .iter()
            .find(|rule| text.contains(&rule.keyword))
            .map_or(self.fallback.as_str(), |rule| rule.category.as_str())
    }

    /// Count texts per category. Categories appear in rule order with the
    /// fallback last; empty categories are omitted.
    #[must_use]
    pub fn count<'a>(&self, texts: impl IntoIterator<Item = &'a str>) -> Vec<BucketCount> {
        let mut counts: Vec<BucketCount> = self
            .rules
            .iter()
            .map(|rule| rule.category.as_str())
            .chain(std::iter::once(self.fallback.as_str()))
            .fold(Vec::new(), |mut order: Vec<&str>, category| {
                if !order.contains(&category) {
                    order.push(category);
                }
                order
            })
            .into_iter()
            .map(|category| BucketCount {
                category: category.to_owned(),
                count: 0,
            })
            .collect();
        for text in texts {
            let category = self.classify(text);
            if let Some(bucket) = counts.iter_mut().find(|bucket| bucket.category == category) {
                bucket.count += 1;
            }
        }
        counts.retain(|bucket| bucket.count > 0);
        counts
    }
}

/// Records in one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthCount {
    /// Calendar year.
    pub year: i32,
    /// Month, 1-12.
    pub month: u32,
    /// Records dated in that month.
    pub count: usize,
}

/// Count timestamps per month in chronological order. `None` entries are
/// counted as skipped.
#[must_use]
pub fn count_by_month(
    timestamps: impl IntoIterator<Item = Option<NaiveDateTime>>,
) -> (Vec<MonthCount>, Diagnostics) {
    let mut diagnostics = Diagnostics::default();
    let mut months: BTreeMap<(i32, u32), usize> = BTreeMap::new();
    for at in timestamps {
        diagnostics.record(at.is_some());
        if let Some(at) = at {
            *months.entry((at.year(), at.month())).or_default() += 1;
        }
    }
    let counts = months
        .into_iter()
        .map(|((year, month), count)| MonthCount { year, month, count })
        .collect();
    (counts, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::parse_timestamp;
    use rstest::rstest;

    #[rstest]
    #[case("Carbon Market", "CARBON")]
    #[case("near city cloud mall", "CITY CLOU")]
    #[case("Echavez St.", "ECHAVEZ")]
    #[case("Mandaue", "OTHER")]
    #[case("", "OTHER")]
    fn destinations_map_to_buckets(#[case] destination: &str, #[case] expected: &str) {
        assert_eq!(CategoryRules::logistics_destinations().classify(destination), expected);
    }

    #[rstest]
    fn earlier_rules_win_regardless_of_position() {
        let rules = CategoryRules::new(
            vec![CategoryRule::new("bolt", "FASTENERS"), CategoryRule::new("steel", "METAL")],
            "OTHER",
        );
        assert_eq!(rules.classify("steel bolt"), "FASTENERS");
        assert_eq!(rules.classify("steel plate"), "METAL");
    }

    #[rstest]
    fn counts_follow_rule_order() {
        let counts = CategoryRules::logistics_destinations().count([
            "Mandaue",
            "echavez",
            "Carbon",
            "carbon market",
        ]);
        let pairs: Vec<_> = counts
            .iter()
            .map(|bucket| (bucket.category.as_str(), bucket.count))
            .collect();
        assert_eq!(pairs, [("CARBON", 2), ("ECHAVEZ", 1), ("OTHER", 1)]);
    }

    #[rstest]
    fn months_are_counted_chronologically() {
        let (counts, diagnostics) = count_by_month([
            parse_timestamp("2024-02-01T08:00"),
            parse_timestamp("2023-12-24T08:00"),
            None,
            parse_timestamp("2024-02-09"),
        ]);
        assert_eq!(
            counts,
            [
                MonthCount { year: 2023, month: 12, count: 1 },
                MonthCount { year: 2024, month: 2, count: 2 },
            ]
        );
        assert_eq!(diagnostics.skipped, 1);
    }
}
