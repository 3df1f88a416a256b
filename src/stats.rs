use serde::Serialize;

/// Descriptive statistics over one sequence of durations (seconds).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStat {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub median: f64,
    /// Sample standard deviation (n - 1 divisor); 0 for a single sample.
    pub std_dev: f64,
}

/// Summarize `samples`. Returns `None` for an empty sequence so that "no data" can
/// never be mistaken for a run of zeros.
pub fn summarize(samples: &[f64]) -> Option<SummaryStat> {
    if samples.is_empty() {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;

    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    let std_dev = if n < 2 {
        0.0
    } else {
        let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        variance.sqrt()
    };

    Some(SummaryStat {
        count: n,
        min: sorted[0],
        max: sorted[n - 1],
        // Rounding in the sum can push the mean a hair outside [min, max] for
        // near-identical samples.
        mean: mean.clamp(sorted[0], sorted[n - 1]),
        median,
        std_dev,
    })
}
