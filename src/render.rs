//! Packs transformed link data into a Plotly `sankey` figure description.
//!
//! Nothing is drawn here: the figure serializes to the JSON that
//! `plotly.graph_objects.Figure` (or plotly.js `Plotly.newPlot`) accepts.

use crate::color::Color;
use crate::error::TransformError;
use crate::transform::{SankeyResult, TransformOptions, transform};
use crate::tree::{NodeId, TraversalResult};
use serde::Serialize;

pub const CANVAS_WIDTH: u32 = 1400;
pub const CANVAS_HEIGHT: u32 = 800;

const NODE_COLOR: &str = "grey";
const ROOT_COLOR: &str = "white";
const BORDER_COLOR: &str = "black";
const BORDER_WIDTH: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyNodes {
    pub pad: u32,
    pub thickness: u32,
    pub label: Vec<String>,
    pub color: Vec<String>,
    pub line: NodeLines,
}

/// Per-node outline colors and widths, as Plotly wants them: one array each.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeLines {
    pub color: Vec<String>,
    pub width: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyLinks {
    pub source: Vec<NodeId>,
    pub target: Vec<NodeId>,
    pub value: Vec<f64>,
    pub color: Vec<Color>,
    pub arrowlen: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub node: SankeyNodes,
    pub link: SankeyLinks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
}

/// A complete single-trace Sankey figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SankeyFigure {
    pub data: Vec<SankeyTrace>,
    pub layout: Layout,
}

impl SankeyFigure {
    /// Styles finished link data. Node 0, the demand sink, is drawn blank.
    pub fn new(result: SankeyResult, mut labels: Vec<String>) -> Self {
        let line_colors = (0..labels.len())
            .map(|i| if i == 0 { ROOT_COLOR } else { BORDER_COLOR }.to_string())
            .collect();
        let line_widths = vec![BORDER_WIDTH; labels.len()];
        let colors = (0..labels.len())
            .map(|i| if i == 0 { ROOT_COLOR } else { NODE_COLOR }.to_string())
            .collect();
        if let Some(sink) = labels.first_mut() {
            sink.clear();
        }

        Self {
            data: vec![SankeyTrace {
                kind: "sankey",
                node: SankeyNodes {
                    pad: 80,
                    thickness: 20,
                    label: labels,
                    color: colors,
                    line: NodeLines {
                        color: line_colors,
                        width: line_widths,
                    },
                },
                link: SankeyLinks {
                    source: result.sources,
                    target: result.targets,
                    value: result.scores,
                    color: result.colors,
                    arrowlen: 10,
                },
            }],
            layout: Layout {
                width: CANVAS_WIDTH,
                height: CANVAS_HEIGHT,
            },
        }
    }

    pub fn trace(&self) -> &SankeyTrace {
        &self.data[0]
    }

    pub fn to_json(&self) -> Result<String, TransformError> {
        serde_json::to_string_pretty(self).map_err(|e| TransformError::Serialization(e.to_string()))
    }
}

/// Transforms a traversal and styles it into a figure in one call.
pub fn render_sankey(
    result: TraversalResult,
    options: &TransformOptions,
) -> Result<SankeyFigure, TransformError> {
    let (sankey, labels) = transform(result, options)?;
    Ok(SankeyFigure::new(sankey, labels))
}
