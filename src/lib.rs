pub mod build;
pub mod config;
pub mod display;
pub mod errors;
pub mod exec;
pub mod parse;
pub mod pipeline;
pub mod report;
pub mod runner;
pub mod stats;
pub mod types;

#[cfg(test)]
mod end_to_end_tests {
    // Parser, runner and report wired together over a scripted executor, checking
    // the numbers a reader of the final table would see.

    use crate::config::HarnessConfig;
    use crate::exec::scripted::ScriptedExecutor;
    use crate::pipeline::run_pipeline;
    use crate::report::build_report;
    use crate::types::{MetricCategory, Variant};

    #[test]
    fn failing_variant_is_absent_and_ratios_are_against_first() {
        let config = HarnessConfig {
            runs: 2,
            workdir: None,
            metrics: vec![
                MetricCategory::new("Data creation"),
                MetricCategory::new("Averaging"),
                MetricCategory::new("Total"),
            ],
            wall_clock: false,
            variants: vec![
                Variant::new("A", "./a"),
                Variant::new("Crash", "./crash"),
                Variant::new("B", "./b"),
            ],
        };
        let mut exec = ScriptedExecutor::default()
            .reply("./a", 0, "Data creation: 1.5 seconds\nAveraging: 0.5 seconds\nTotal: 2.0 seconds\n")
            .reply("./crash", 134, "Data creation: 0.1 seconds\n")
            .reply("./b", 0, "Total: 1.0 seconds\n");

        let results = run_pipeline(&mut exec, &config, false).unwrap();
        let now = chrono::Utc::now();
        let report = build_report(&results, &config.metrics, config.runs, now);

        for category in &report.categories {
            assert!(category.rows.iter().all(|r| r.variant != "Crash"));
        }

        let total = &report.categories[2];
        let b = total.rows.iter().find(|r| r.variant == "B").unwrap();
        assert_eq!(b.relative, Some(0.5));
        assert_eq!(b.speedup, Some(2.0));

        let averaging = &report.categories[1];
        assert_eq!(averaging.rows.len(), 1);
        assert_eq!(averaging.rows[0].stats.std_dev, 0.0);
    }
}
