use tracing::{debug, info};

use crate::errors::HarnessError;
use crate::exec::Executor;
use crate::types::Variant;

/// Build every variant that has a build command, in registration order.
///
/// Stops at the first failure and returns it with the captured stdout+stderr; the
/// caller must not start measuring anything in that case. Variants without a build
/// command are skipped. Returns the number of builds that ran.
pub fn build_all<E: Executor>(executor: &mut E, variants: &[Variant]) -> Result<usize, HarnessError> {
    let mut built = 0;
    for variant in variants {
        let Some(command) = variant.build_command() else {
            debug!(variant = variant.name(), "no build step, skipping");
            continue;
        };

        info!(variant = variant.name(), command, "building");
        let output = executor
            .execute(command)
            .map_err(|source| HarnessError::Spawn {
                command: command.to_string(),
                source,
            })?;

        if !output.success {
            return Err(HarnessError::BuildFailed {
                variant: variant.name().to_string(),
                command: command.to_string(),
                code: output.code,
                output: output.combined(),
            });
        }

        debug!(
            variant = variant.name(),
            elapsed_ms = output.elapsed.as_millis() as u64,
            "build finished"
        );
        built += 1;
    }
    Ok(built)
}
