//! Harness configuration: which variants to build and run, which metric labels to
//! collect, and how many times to run each variant.
//!
//! Without a config file the built-in roster of averaging programs is used. A TOML
//! file replaces it wholesale:
//!
//! ```toml
//! runs = 5
//! workdir = "avg"
//! metrics = ["Data creation", "Averaging", "Total"]
//! wall_clock = true
//!
//! [[variants]]
//! name = "C"
//! build = "cc -O2 -o average_c average.c"
//! run = "./average_c"
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::HarnessError;
use crate::types::{MetricCategory, Variant};

pub const DEFAULT_RUNS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HarnessConfig {
    #[serde(default = "default_runs")]
    pub runs: usize,
    /// Directory builds and runs execute in; the current directory when unset.
    #[serde(default)]
    pub workdir: Option<PathBuf>,
    #[serde(default = "default_metrics")]
    pub metrics: Vec<MetricCategory>,
    /// Report the harness-measured elapsed time of each run as an extra category.
    #[serde(default)]
    pub wall_clock: bool,
    pub variants: Vec<Variant>,
}

fn default_runs() -> usize {
    DEFAULT_RUNS
}

fn default_metrics() -> Vec<MetricCategory> {
    ["Data creation", "Averaging", "Total"]
        .into_iter()
        .map(MetricCategory::new)
        .collect()
}

fn default_variants() -> Vec<Variant> {
    vec![
        Variant::new("C", "./average_c").with_build("cc -O2 -o average_c average.c"),
        Variant::new("C++", "./average_cpp").with_build("g++ -O2 -o average_cpp test.cpp"),
        Variant::new("C++ Opt", "./average_cpp_opt")
            .with_build("g++ -O3 -march=native -o average_cpp_opt test_optimized.cpp"),
        Variant::new("C++ Aligned", "./average_cpp_aligned")
            .with_build("g++ -O3 -march=native -o average_cpp_aligned test_aligned.cpp"),
        Variant::new("Java", "java Average").with_build("javac Average.java"),
        Variant::new("Java Opt", "java AverageOptimized").with_build("javac AverageOptimized.java"),
        Variant::new("Python", "python3 average.py"),
        Variant::new("NumPy", "python3 average_numpy.py"),
    ]
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            runs: DEFAULT_RUNS,
            workdir: None,
            metrics: default_metrics(),
            wall_clock: false,
            variants: default_variants(),
        }
    }
}

impl HarnessConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self, HarnessError> {
        let text = std::fs::read_to_string(path).map_err(|source| HarnessError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|e| match e {
            HarnessError::ConfigParse { detail, .. } => HarnessError::ConfigParse {
                path: path.to_path_buf(),
                detail,
            },
            other => other,
        })?;
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, HarnessError> {
        let config: HarnessConfig = toml::from_str(text).map_err(|e| HarnessError::ConfigParse {
            path: PathBuf::new(),
            detail: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks everything that must hold before the first build is started.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.runs == 0 {
            return Err(invalid("runs must be at least 1"));
        }
        if self.metrics.is_empty() {
            return Err(invalid("at least one metric label is required"));
        }
        if self.variants.is_empty() {
            return Err(invalid("at least one variant is required"));
        }

        let mut labels = HashSet::new();
        if self.wall_clock {
            labels.insert(MetricCategory::wall_clock().match_key());
        }
        for metric in &self.metrics {
            if metric.label().trim().is_empty() {
                return Err(invalid("metric labels must not be blank"));
            }
            if !labels.insert(metric.match_key()) {
                return Err(invalid(&format!(
                    "metric label '{metric}' is listed twice or clashes with a reserved category"
                )));
            }
        }

        let mut names = HashSet::new();
        for variant in &self.variants {
            if variant.name().trim().is_empty() {
                return Err(invalid("variant names must not be blank"));
            }
            if variant.run_command().trim().is_empty() {
                return Err(invalid(&format!(
                    "variant '{}' has an empty run command",
                    variant.name()
                )));
            }
            if !names.insert(variant.name()) {
                return Err(HarnessError::DuplicateVariant {
                    name: variant.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Every category a report covers: the parsed metrics in configured order, then
    /// the wall-clock category when enabled.
    pub fn categories(&self) -> Vec<MetricCategory> {
        let mut categories = self.metrics.clone();
        if self.wall_clock {
            categories.push(MetricCategory::wall_clock());
        }
        categories
    }
}

fn invalid(detail: &str) -> HarnessError {
    HarnessError::InvalidConfig {
        detail: detail.to_string(),
    }
}
