use regex::{Regex, RegexBuilder};

use crate::errors::HarnessError;
use crate::types::{MetricCategory, Metrics};

/// Extracts `<Label>: <number> seconds` durations from free-form program output.
///
/// One pattern is compiled per configured category up front; `parse` itself is pure
/// and never fails. Labels are matched case-insensitively, any run of whitespace in a
/// label matches any run of whitespace in the text, and when a label occurs more than
/// once the first occurrence wins.
#[derive(Debug, Clone)]
pub struct MetricParser {
    patterns: Vec<(MetricCategory, Regex)>,
}

impl MetricParser {
    pub fn new(categories: &[MetricCategory]) -> Result<Self, HarnessError> {
        let patterns = categories
            .iter()
            .map(|c| Ok((c.clone(), label_pattern(c.label())?)))
            .collect::<Result<Vec<_>, HarnessError>>()?;
        Ok(MetricParser { patterns })
    }

    pub fn categories(&self) -> impl Iterator<Item = &MetricCategory> {
        self.patterns.iter().map(|(c, _)| c)
    }

    pub fn parse(&self, text: &str) -> Metrics {
        let mut metrics = Metrics::new();
        for (category, re) in &self.patterns {
            if let Some(value) = first_match(re, text) {
                metrics.insert(category.clone(), value);
            }
        }
        metrics
    }
}

fn first_match(re: &Regex, text: &str) -> Option<f64> {
    // Digit runs too long for f64 parse to infinity; those are skipped.
    re.captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<f64>().ok())
        .find(|v| v.is_finite())
}

fn label_pattern(label: &str) -> Result<Regex, HarnessError> {
    let words: Vec<String> = label.split_whitespace().map(regex::escape).collect();
    // The label must not continue a longer word on the left ("Subtotal" is not "Total").
    let pattern = format!(
        r"(?:^|[^\w]){}\s*:\s*(\d+(?:\.\d*)?|\.\d+)\s*seconds\b",
        words.join(r"\s+")
    );
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .multi_line(true)
        .build()
        .map_err(|e| HarnessError::InvalidConfig {
            detail: format!("metric label '{label}' cannot be matched: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_parser() -> MetricParser {
        MetricParser::new(&[
            MetricCategory::new("Data creation"),
            MetricCategory::new("Averaging"),
            MetricCategory::new("Total"),
        ])
        .unwrap()
    }

    fn get(metrics: &Metrics, label: &str) -> Option<f64> {
        metrics.get(&MetricCategory::new(label)).copied()
    }

    #[test]
    fn parses_all_three_labels() {
        let text = "Data creation: 1.234567 seconds\nAveraging: 0.000100 seconds\nTotal: 1.234667 seconds";
        let metrics = default_parser().parse(text);
        assert_eq!(metrics.len(), 3);
        assert_eq!(get(&metrics, "Data creation"), Some(1.234567));
        assert_eq!(get(&metrics, "Averaging"), Some(0.000100));
        assert_eq!(get(&metrics, "Total"), Some(1.234667));
    }

    #[test]
    fn tolerates_padding_and_surrounding_text() {
        let text = "average = 0.0123\nData creation: 0.912345 seconds\nAveraging:     0.081000 seconds\nTotal:         0.993345 seconds\nbye\n";
        let metrics = default_parser().parse(text);
        assert_eq!(get(&metrics, "Averaging"), Some(0.081));
        assert_eq!(get(&metrics, "Total"), Some(0.993345));
    }

    #[test]
    fn case_and_inner_whitespace_insensitive() {
        let text = "  DATA   CREATION :2.5 seconds\ntotal: 3 Seconds";
        let metrics = default_parser().parse(text);
        assert_eq!(get(&metrics, "Data creation"), Some(2.5));
        assert_eq!(get(&metrics, "Total"), Some(3.0));
    }

    #[test]
    fn no_labels_yields_empty() {
        assert!(default_parser().parse("average = 3.14\n").is_empty());
        assert!(default_parser().parse("").is_empty());
    }

    #[test]
    fn first_match_wins() {
        let text = "Total: 1.0 seconds\nTotal: 9.0 seconds\n";
        assert_eq!(get(&default_parser().parse(text), "Total"), Some(1.0));
    }

    #[test]
    fn partial_report_keeps_found_categories() {
        let metrics = default_parser().parse("Averaging: 0.5 seconds\n");
        assert_eq!(metrics.len(), 1);
        assert_eq!(get(&metrics, "Averaging"), Some(0.5));
        assert_eq!(get(&metrics, "Total"), None);
    }

    #[test]
    fn malformed_numbers_are_not_matched() {
        let text = "Total: abc seconds\nAveraging: 1.0\nData creation: seconds";
        assert!(default_parser().parse(text).is_empty());
    }

    #[test]
    fn label_inside_longer_word_is_not_matched() {
        let metrics = default_parser().parse("Subtotal: 4.0 seconds\n");
        assert_eq!(get(&metrics, "Total"), None);
    }

    #[test]
    fn label_after_prefix_text_on_same_line() {
        let metrics = default_parser().parse("[java] Total: 2.25 seconds");
        assert_eq!(get(&metrics, "Total"), Some(2.25));
    }

    #[test]
    fn regex_metacharacters_in_label_are_literal() {
        let parser = MetricParser::new(&[MetricCategory::new("Sum (SIMD)")]).unwrap();
        let metrics = parser.parse("Sum (SIMD): 0.25 seconds");
        assert_eq!(get(&metrics, "Sum (SIMD)"), Some(0.25));
        assert!(parser.parse("Sum SIMD: 0.25 seconds").is_empty());
    }

    #[test]
    fn leading_dot_and_trailing_dot_numbers() {
        let metrics = default_parser().parse("Averaging: .5 seconds\nTotal: 2. seconds");
        assert_eq!(get(&metrics, "Averaging"), Some(0.5));
        assert_eq!(get(&metrics, "Total"), Some(2.0));
    }

    #[test]
    fn signed_durations_are_not_timings() {
        assert!(default_parser().parse("Total: -1.5 seconds").is_empty());
        assert!(default_parser().parse("Total: +1.5 seconds").is_empty());
        let metrics = default_parser().parse("Total: -1.5 seconds\nTotal: 2.0 seconds\n");
        assert_eq!(get(&metrics, "Total"), Some(2.0));
    }
}
