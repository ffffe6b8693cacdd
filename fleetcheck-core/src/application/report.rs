// fleetcheck-core/src/application/report.rs

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::application::engine::RunOutcome;
use crate::application::summary::{ResultAggregator, RunSummary};
use crate::domain::check::{Category, CheckResult};

/// Everything a renderer needs: the raw outcome plus its summary.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: DateTime<Local>,
    #[serde(flatten)]
    pub outcome: RunOutcome,
    pub summary: RunSummary,
}

impl RunReport {
    pub fn new(outcome: RunOutcome) -> Self {
        let summary = ResultAggregator::summarize(&outcome);
        Self {
            generated_at: Local::now(),
            outcome,
            summary,
        }
    }

    /// File-name friendly stamp shared by every artifact of one report.
    pub fn timestamp(&self) -> String {
        self.generated_at.format("%Y%m%d_%H%M%S").to_string()
    }
}

/// One report section: results of one category.
#[derive(Debug, Serialize)]
pub struct CategorySection<'a> {
    pub category: Category,
    pub label: &'static str,
    pub results: Vec<&'a CheckResult>,
}

/// Groups results by category in report order. Empty categories are left out.
pub fn group_by_category<'a>(
    results: impl IntoIterator<Item = &'a CheckResult>,
) -> Vec<CategorySection<'a>> {
    let mut sections: Vec<CategorySection<'a>> = Category::ALL
        .iter()
        .map(|category| CategorySection {
            category: *category,
            label: category.label(),
            results: Vec::new(),
        })
        .collect();
    for result in results {
        if let Some(section) = sections.iter_mut().find(|s| s.category == result.category) {
            section.results.push(result);
        }
    }
    sections.retain(|s| !s.results.is_empty());
    sections
}

/// Expected value as displayed, annotated when it came from an override.
pub fn display_expected(result: &CheckResult) -> String {
    if result.is_override {
        format!("{} (override)", result.expected_value)
    } else {
        result.expected_value.clone()
    }
}
