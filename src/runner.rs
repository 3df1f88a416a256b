use tracing::{debug, info, warn};

use crate::exec::Executor;
use crate::parse::MetricParser;
use crate::types::{MetricCategory, Sample, Variant, VariantResult};

/// Lines of captured stderr echoed in a failed-run warning.
const FAILURE_TAIL_LINES: usize = 5;

/// Execute one attempt of `variant` and turn it into a `Sample`.
///
/// A process that cannot even be spawned is treated like a failed run.
pub fn run_once<E: Executor>(executor: &mut E, parser: &MetricParser, variant: &Variant) -> Sample {
    let command = variant.run_command();
    match executor.execute(command) {
        Ok(output) => {
            let text = output.combined();
            let metrics = if output.success {
                parser.parse(&text)
            } else {
                Default::default()
            };
            let mut sample = Sample {
                exit_succeeded: output.success,
                exit_code: output.code,
                metrics,
                elapsed: output.elapsed,
                raw_output: None,
            };
            if !sample.is_accepted() {
                sample.raw_output = Some(text);
            }
            sample
        }
        Err(e) => Sample {
            exit_succeeded: false,
            exit_code: None,
            metrics: Default::default(),
            elapsed: Default::default(),
            raw_output: Some(format!("failed to spawn `{command}`: {e}")),
        },
    }
}

/// Run `variant` `runs` times, strictly one after another, collecting accepted samples.
///
/// Failed or unparseable runs are logged and skipped; they never stop the batch.
/// With `wall_clock` set, the elapsed time of every accepted run is kept as well.
pub fn run_variant<E: Executor>(
    executor: &mut E,
    parser: &MetricParser,
    variant: &Variant,
    runs: usize,
    wall_clock: bool,
) -> VariantResult {
    let categories: Vec<MetricCategory> = parser.categories().cloned().collect();
    let mut result = VariantResult::new(variant.name(), &categories);
    if wall_clock {
        result = result.with_wall_clock();
    }

    info!(variant = variant.name(), runs, "benchmarking");
    for i in 1..=runs {
        let sample = run_once(executor, parser, variant);
        let secs = sample.elapsed.as_secs_f64();

        if !sample.exit_succeeded {
            warn!(
                variant = variant.name(),
                run = i,
                status = %crate::errors::describe_code(sample.exit_code),
                "run failed: {}",
                tail(sample.raw_output.as_deref().unwrap_or(""), FAILURE_TAIL_LINES)
            );
        } else if sample.metrics.is_empty() {
            warn!(
                variant = variant.name(),
                run = i,
                "no timing lines recognised in output"
            );
        } else {
            info!(
                variant = variant.name(),
                "run {i}/{runs} ok ({secs:.3}s, {} metrics)",
                sample.metrics.len()
            );
        }
        if let Some(raw) = &sample.raw_output {
            debug!(variant = variant.name(), run = i, "captured output:\n{raw}");
        }

        result.record(&sample);
    }
    result
}

/// Measure every variant in registration order. The returned results keep that order,
/// which is what makes the first entry the baseline.
pub fn run_all<E: Executor>(
    executor: &mut E,
    parser: &MetricParser,
    variants: &[Variant],
    runs: usize,
    wall_clock: bool,
) -> Vec<VariantResult> {
    variants
        .iter()
        .map(|variant| run_variant(executor, parser, variant, runs, wall_clock))
        .collect()
}

fn tail(text: &str, lines: usize) -> String {
    let all: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = all.len().saturating_sub(lines);
    all[start..].join(" | ")
}
