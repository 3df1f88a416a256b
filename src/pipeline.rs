use tracing::info;

use crate::build::build_all;
use crate::config::HarnessConfig;
use crate::errors::HarnessError;
use crate::exec::Executor;
use crate::parse::MetricParser;
use crate::runner::run_all;
use crate::types::VariantResult;

/// Build everything, then measure every variant. Results come back in registration
/// order. A build failure returns before a single run has been started.
pub fn run_pipeline<E: Executor>(
    executor: &mut E,
    config: &HarnessConfig,
    skip_build: bool,
) -> Result<Vec<VariantResult>, HarnessError> {
    config.validate()?;
    let parser = MetricParser::new(&config.metrics)?;

    if skip_build {
        info!("skipping build phase");
    } else {
        let built = build_all(executor, &config.variants)?;
        info!(built, "all builds succeeded");
    }

    Ok(run_all(
        executor,
        &parser,
        &config.variants,
        config.runs,
        config.wall_clock,
    ))
}
