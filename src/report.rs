use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::stats::{SummaryStat, summarize};
use crate::types::{MetricCategory, VariantResult};

/// Everything the renderers need, computed fresh from the collected results.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub runs_per_variant: usize,
    pub categories: Vec<CategoryReport>,
    pub variants: Vec<RunSummary>,
}

/// One metric category across all variants.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryReport {
    pub category: MetricCategory,
    /// `None` when no variant reported this category at all.
    pub baseline: Option<String>,
    /// Variants with data only, fastest mean first.
    pub rows: Vec<ReportRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub variant: String,
    pub is_baseline: bool,
    pub stats: SummaryStat,
    /// `mean / baseline_mean`; `None` when the ratio is undefined (zero mean).
    pub relative: Option<f64>,
    /// `baseline_mean / mean`.
    pub speedup: Option<f64>,
}

/// Per-variant run bookkeeping, including runs that never reached the statistics.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub variant: String,
    pub attempted: usize,
    pub accepted: usize,
    pub run_failures: usize,
    pub parse_failures: usize,
}

impl CategoryReport {
    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }
}

/// Aggregate `results` (in registration order) per category.
///
/// The baseline of each category is the first variant, in registration order, that
/// has data for it. Variants without data for a category get no row there.
pub fn build_report(
    results: &[VariantResult],
    categories: &[MetricCategory],
    runs_per_variant: usize,
    now: DateTime<Utc>,
) -> Report {
    Report {
        generated_at: now,
        runs_per_variant,
        categories: categories
            .iter()
            .map(|category| build_category(results, category))
            .collect(),
        variants: results
            .iter()
            .map(|r| RunSummary {
                variant: r.name.clone(),
                attempted: r.attempted,
                accepted: r.accepted,
                run_failures: r.run_failures,
                parse_failures: r.parse_failures,
            })
            .collect(),
    }
}

fn build_category(results: &[VariantResult], category: &MetricCategory) -> CategoryReport {
    let with_data: Vec<(&str, SummaryStat)> = results
        .iter()
        .filter_map(|r| summarize(r.values(category)).map(|s| (r.name.as_str(), s)))
        .collect();

    let Some(&(baseline_name, baseline)) = with_data.first() else {
        return CategoryReport {
            category: category.clone(),
            baseline: None,
            rows: Vec::new(),
        };
    };

    let mut rows: Vec<ReportRow> = with_data
        .iter()
        .map(|&(name, stats)| ReportRow {
            variant: name.to_string(),
            is_baseline: name == baseline_name,
            stats,
            relative: ratio(stats.mean, baseline.mean),
            speedup: ratio(baseline.mean, stats.mean),
        })
        .collect();
    // Stable sort: equal means keep registration order.
    rows.sort_by(|a, b| a.stats.mean.total_cmp(&b.stats.mean));

    CategoryReport {
        category: category.clone(),
        baseline: Some(baseline_name.to_string()),
        rows,
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    let r = numerator / denominator;
    r.is_finite().then_some(r)
}
