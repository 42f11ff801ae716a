use super::reference_score;
use crate::error::TransformError;
use crate::tree::TraversalResult;

pub const BELOW_CUTOFF_UPSTREAM: &str = "Activities < cutoff";
pub const BELOW_CUTOFF_DOWNSTREAM: &str = "Activities < cutoff downstream";

/// Bundles every flow below `cutoff` (relative to the root flow) into one of two
/// bucket nodes appended to `labels`.
///
/// Positive flows are re-sourced from the upstream bucket, the others from the
/// downstream bucket. Targets and the node registry are left untouched.
pub fn cutoff_flows(
    mut result: TraversalResult,
    mut labels: Vec<String>,
    cutoff: f64,
) -> Result<(TraversalResult, Vec<String>), TransformError> {
    let reference = reference_score(&result.scores)?.abs();

    labels.push(BELOW_CUTOFF_UPSTREAM.to_string());
    let upstream = labels.len() - 1;
    labels.push(BELOW_CUTOFF_DOWNSTREAM.to_string());
    let downstream = labels.len() - 1;

    let mut bundled = 0;
    for (source, score) in result.sources.iter_mut().zip(&result.scores) {
        let mean = score.mean();
        if mean.abs() / reference < cutoff {
            *source = if mean > 0.0 { upstream } else { downstream };
            bundled += 1;
        }
    }
    log::debug!("Bundled {} flows below cutoff {}", bundled, cutoff);

    Ok((result, labels))
}
