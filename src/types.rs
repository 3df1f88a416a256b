use std::collections::BTreeMap;
use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One benchmark target: a name, an optional build step and the command being timed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Variant {
    name: String,
    #[serde(default)]
    build: Option<String>,
    run: String,
}

impl Variant {
    pub fn new(name: impl Into<String>, run: impl Into<String>) -> Self {
        Variant {
            name: name.into(),
            build: None,
            run: run.into(),
        }
    }

    pub fn with_build(mut self, build: impl Into<String>) -> Self {
        self.build = Some(build.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `None` means the variant is already runnable (interpreted or pre-built).
    pub fn build_command(&self) -> Option<&str> {
        self.build.as_deref()
    }

    pub fn run_command(&self) -> &str {
        &self.run
    }
}

/// Label of the reserved wall-clock category.
pub const WALL_CLOCK_LABEL: &str = "Wall clock";

/// A kind of duration reported by the variants, matched by its label text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricCategory(String);

impl MetricCategory {
    pub fn new(label: impl Into<String>) -> Self {
        MetricCategory(label.into())
    }

    /// The per-invocation elapsed time measured by the harness itself.
    pub fn wall_clock() -> Self {
        MetricCategory::new(WALL_CLOCK_LABEL)
    }

    pub fn label(&self) -> &str {
        &self.0
    }

    /// Lowercased with whitespace runs collapsed; two labels with the same key match
    /// the same output lines.
    pub fn match_key(&self) -> String {
        self.0
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }
}

impl std::fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Durations in seconds extracted from one run's output.
pub type Metrics = BTreeMap<MetricCategory, f64>;

/// Outcome of a single execution attempt.
#[derive(Debug, Clone)]
pub struct Sample {
    pub exit_succeeded: bool,
    pub exit_code: Option<i32>,
    pub metrics: Metrics,
    pub elapsed: Duration,
    /// Only kept when the run is rejected, for diagnostics.
    pub raw_output: Option<String>,
}

impl Sample {
    pub fn is_accepted(&self) -> bool {
        self.exit_succeeded && !self.metrics.is_empty()
    }
}

/// Accepted samples of one variant, grouped by category in run order.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantResult {
    pub name: String,
    pub samples: BTreeMap<MetricCategory, Vec<f64>>,
    pub attempted: usize,
    pub accepted: usize,
    pub run_failures: usize,
    pub parse_failures: usize,
    wall_clock: bool,
}

impl VariantResult {
    pub fn new(name: impl Into<String>, categories: &[MetricCategory]) -> Self {
        VariantResult {
            name: name.into(),
            samples: categories.iter().map(|c| (c.clone(), Vec::new())).collect(),
            attempted: 0,
            accepted: 0,
            run_failures: 0,
            parse_failures: 0,
            wall_clock: false,
        }
    }

    /// Also collect each accepted run's elapsed time under [`MetricCategory::wall_clock`].
    pub fn with_wall_clock(mut self) -> Self {
        self.samples.entry(MetricCategory::wall_clock()).or_default();
        self.wall_clock = true;
        self
    }

    /// Fold one sample into the result. Only categories fixed at construction are kept.
    pub fn record(&mut self, sample: &Sample) {
        self.attempted += 1;
        if !sample.exit_succeeded {
            self.run_failures += 1;
            return;
        }
        if !sample.is_accepted() {
            self.parse_failures += 1;
            return;
        }
        self.accepted += 1;
        for (category, value) in &sample.metrics {
            if let Some(seq) = self.samples.get_mut(category) {
                seq.push(*value);
            }
        }
        if self.wall_clock
            && let Some(seq) = self.samples.get_mut(&MetricCategory::wall_clock())
        {
            seq.push(sample.elapsed.as_secs_f64());
        }
    }

    pub fn values(&self, category: &MetricCategory) -> &[f64] {
        self.samples.get(category).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Compact,
}
