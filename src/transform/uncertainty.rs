use super::{SankeyResult, reference_score};
use crate::color::{Color, Gradient, GradientTable, Palette};
use crate::error::TransformError;
use crate::score::{Score, quantile_sorted};
use crate::tree::TraversalResult;
use itertools::Itertools;

/// Quantile cut points a sampled flow is split at.
pub const QUANTILES: [f64; 8] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8];

struct Colors<'a> {
    neutral: Color,
    gradient: &'a Gradient,
    alpha: f64,
}

impl<'a> Colors<'a> {
    fn resolve(
        palette: &Palette,
        gradients: &'a GradientTable,
        gradient: &str,
    ) -> Result<Self, TransformError> {
        let neutral = gradients
            .get(&palette.neutral)?
            .at(palette.neutral_position, palette.neutral_alpha);
        Ok(Self {
            neutral,
            gradient: gradients.get(gradient)?,
            alpha: palette.uncertainty_alpha,
        })
    }
}

/// Whether a flow carries samples and is large enough to show its uncertainty.
fn is_uncertain_and_material(score: &Score, reference: f64, cutoff: f64) -> bool {
    score.is_samples() && (score.mean() / reference).abs() > cutoff
}

/// Splits every material sampled flow into one sub-flow per quantile band.
///
/// Sub-flow scores are the increments between consecutive quantiles (the first
/// measured from zero), so together they add up to the last quantile. Negative
/// flows walk the quantiles from the top down. The first band is drawn in the
/// neutral color, the others along the quantile gradient (`1 - q` for positive
/// flows, `q` for negative ones). Other flows keep their mean and the neutral color.
pub fn calc_quantile_flows(
    result: TraversalResult,
    cutoff: f64,
    palette: &Palette,
    gradients: &GradientTable,
) -> Result<SankeyResult, TransformError> {
    let reference = reference_score(&result.scores)?;
    let colors = Colors::resolve(palette, gradients, &palette.quantile)?;

    let mut sankey = SankeyResult::with_nodes(result.nodes);
    for ((source, target), score) in result.sources.into_iter().zip(result.targets).zip(result.scores)
    {
        let samples = match &score {
            Score::Samples(samples) if is_uncertain_and_material(&score, reference, cutoff) => {
                samples
            }
            _ => {
                sankey.push(source, target, score.mean(), colors.neutral);
                continue;
            }
        };

        let negative = score.mean() <= 0.0;
        let sorted = samples.iter().copied().sorted_by(f64::total_cmp).collect_vec();
        let bands: Vec<f64> = if negative {
            QUANTILES.iter().rev().copied().collect()
        } else {
            QUANTILES.to_vec()
        };

        let mut previous = 0.0;
        for (n, q) in bands.into_iter().enumerate() {
            let value = quantile_sorted(&sorted, q);
            let color = if n == 0 {
                colors.neutral
            } else if negative {
                colors.gradient.at(q, colors.alpha)
            } else {
                colors.gradient.at(1.0 - q, colors.alpha)
            };
            sankey.push(source, target, value - previous, color);
            previous = value;
        }
    }

    Ok(sankey)
}

/// Collapses every flow to its mean and colors sampled flows whose share of the
/// reference exceeds `cutoff` by their standard deviation relative to the
/// largest one in the result. The relative deviation is rounded to two
/// decimals, ties to even.
///
/// When no flow has any spread the relative deviation is undefined and every
/// flow gets the neutral color.
pub fn calc_colors(
    result: TraversalResult,
    cutoff: f64,
    palette: &Palette,
    gradients: &GradientTable,
) -> Result<SankeyResult, TransformError> {
    let reference = reference_score(&result.scores)?;
    let colors = Colors::resolve(palette, gradients, &palette.deviation)?;

    let max_std = result
        .scores
        .iter()
        .map(Score::std_dev)
        .fold(0.0_f64, f64::max);
    let spread = max_std.is_finite() && max_std > 0.0;
    if !spread {
        log::warn!("No flow has a positive standard deviation; using neutral colors only");
    }

    let mut sankey = SankeyResult::with_nodes(result.nodes);
    for ((source, target), score) in result.sources.into_iter().zip(result.targets).zip(result.scores)
    {
        // Signed share: credits keep the neutral color however large they are.
        let colored = score.is_samples() && score.mean() / reference > cutoff;
        let color = if spread && colored {
            let scale = (score.std_dev() / max_std * 100.0).round_ties_even() / 100.0;
            colors
                .gradient
                .at(scale, colors.alpha)
                .desaturate_full_channels()
        } else {
            colors.neutral
        };
        sankey.push(source, target, score.mean(), color);
    }

    Ok(sankey)
}
