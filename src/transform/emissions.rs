use crate::tree::TraversalResult;
use itertools::izip;

pub const EMISSIONS_UPSTREAM: &str = "Emissions";
pub const EMISSIONS_DOWNSTREAM: &str = "Emissions downstream";

/// Makes the imbalance of every node visible as an extra flow.
///
/// For each node of the traversal registry, `out` is the summed mean score of
/// the flows leaving it and `in` of the flows entering it. When both are
/// non-zero and differ, a flow of `out - in` from an emissions bucket into the
/// node is appended: the upstream bucket when `out > 0`, else the downstream one.
pub fn calc_emissions(
    mut result: TraversalResult,
    mut labels: Vec<String>,
) -> (TraversalResult, Vec<String>) {
    labels.push(EMISSIONS_UPSTREAM.to_string());
    let upstream = labels.len() - 1;
    labels.push(EMISSIONS_DOWNSTREAM.to_string());
    let downstream = labels.len() - 1;

    let node_ids: Vec<_> = result.nodes.keys().copied().collect();
    for node in node_ids {
        let (mut outflow, mut inflow) = (0.0, 0.0);
        for (&source, &target, score) in izip!(&result.sources, &result.targets, &result.scores) {
            if source == node {
                outflow += score.mean();
            }
            if target == node {
                inflow += score.mean();
            }
        }

        if inflow != 0.0 && outflow != 0.0 && inflow != outflow {
            let bucket = if outflow > 0.0 { upstream } else { downstream };
            result.push_edge(bucket, node, (outflow - inflow).into());
        }
    }

    (result, labels)
}
