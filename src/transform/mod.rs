//! Turns a traversal into link data a Sankey renderer can draw.
//!
//! The pipeline is fixed: [`cutoff_flows`], optionally [`calc_emissions`], then
//! either [`calc_quantile_flows`] or [`calc_colors`] depending on the
//! [`UncertaintyMode`], and finally [`flip_negative_values`]. Each stage takes
//! its input by value and hands a new result to the next one.

use crate::color::{Color, GradientTable, Palette};
use crate::error::TransformError;
use crate::score::Score;
use crate::tree::{Node, NodeId, TraversalResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

mod cutoff;
mod emissions;
mod sign;
mod uncertainty;

pub use cutoff::{BELOW_CUTOFF_DOWNSTREAM, BELOW_CUTOFF_UPSTREAM, cutoff_flows};
pub use emissions::{EMISSIONS_DOWNSTREAM, EMISSIONS_UPSTREAM, calc_emissions};
pub use sign::flip_negative_values;
pub use uncertainty::{QUANTILES, calc_colors, calc_quantile_flows};

/// How uncertainty is shown on the links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UncertaintyMode {
    /// One link per flow, colored by its relative standard deviation.
    Deviation,
    /// Each sampled flow split into quantile bands.
    #[default]
    Quantile,
}

impl UncertaintyMode {
    /// Maps the numeric mode codes `0` (deviation) and `1` (quantile).
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(UncertaintyMode::Deviation),
            1 => Some(UncertaintyMode::Quantile),
            _ => None,
        }
    }
}

/// Presentation options of the transformer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    pub mode: UncertaintyMode,
    /// Flows smaller than this fraction of the root flow are bundled.
    pub cutoff: f64,
    /// Add flows balancing every node's inputs and outputs.
    pub emissions: bool,
    pub palette: Palette,
    #[serde(skip)]
    pub gradients: GradientTable,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            mode: UncertaintyMode::Quantile,
            cutoff: 0.05,
            emissions: true,
            palette: Palette::default(),
            gradients: GradientTable::with_defaults(),
        }
    }
}

/// Link data ready for rendering: scalar scores and one color per link.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SankeyResult {
    pub sources: Vec<NodeId>,
    pub targets: Vec<NodeId>,
    pub scores: Vec<f64>,
    pub nodes: BTreeMap<NodeId, Node>,
    pub colors: Vec<Color>,
}

impl SankeyResult {
    pub(crate) fn with_nodes(nodes: BTreeMap<NodeId, Node>) -> Self {
        Self {
            nodes,
            ..Self::default()
        }
    }

    pub(crate) fn push(&mut self, source: NodeId, target: NodeId, score: f64, color: Color) {
        self.sources.push(source);
        self.targets.push(target);
        self.scores.push(score);
        self.colors.push(color);
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// The mean of the root flow, which every relative cutoff is measured against.
pub(crate) fn reference_score(scores: &[Score]) -> Result<f64, TransformError> {
    let reference = scores.first().ok_or(TransformError::EmptyResult)?.mean();
    if reference == 0.0 || !reference.is_finite() {
        return Err(TransformError::DegenerateReferenceScore(reference));
    }
    Ok(reference)
}

/// Runs the whole pipeline and returns the link data with the node labels.
///
/// Labels start with the traversal's node names in id order, followed by the
/// bucket nodes the stages append. Every bucket is also registered in
/// `SankeyResult::nodes` as a synthetic node.
pub fn transform(
    result: TraversalResult,
    options: &TransformOptions,
) -> Result<(SankeyResult, Vec<String>), TransformError> {
    let labels = result.labels();

    let (result, labels) = cutoff_flows(result, labels, options.cutoff)?;
    let (result, labels) = if options.emissions {
        calc_emissions(result, labels)
    } else {
        (result, labels)
    };

    let sankey = match options.mode {
        UncertaintyMode::Quantile => {
            calc_quantile_flows(result, options.cutoff, &options.palette, &options.gradients)?
        }
        UncertaintyMode::Deviation => {
            calc_colors(result, options.cutoff, &options.palette, &options.gradients)?
        }
    };
    let mut sankey = flip_negative_values(sankey);

    for (id, label) in labels.iter().enumerate() {
        sankey
            .nodes
            .entry(id)
            .or_insert_with(|| Node::synthetic(label));
    }

    log::info!(
        "Prepared {} links over {} nodes ({:?} mode)",
        sankey.len(),
        labels.len(),
        options.mode
    );
    Ok((sankey, labels))
}
