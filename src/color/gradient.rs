use super::Color;
use crate::error::TransformError;
use ahash::AHashMap;

/// Number of discrete entries a gradient is sampled into, as plotting colormaps do.
const LUT_SIZE: usize = 256;

/// A piecewise-linear color gradient over `[0, 1]` with evenly spaced stops.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<[f64; 3]>,
}

impl Gradient {
    /// Builds a gradient from `#rrggbb` stops. Malformed stops are skipped.
    pub fn from_hex(stops: &[&str]) -> Self {
        Self {
            stops: stops.iter().filter_map(|hex| parse_hex(hex)).collect(),
        }
    }

    /// Samples the gradient at `x` with the given alpha.
    ///
    /// `x` is quantized to one of 256 levels first so that equal inputs of a
    /// plotting library and of this table produce the same color.
    pub fn at(&self, x: f64, alpha: f64) -> Color {
        match self.stops.len() {
            0 => Color::new(0.0, 0.0, 0.0, alpha),
            1 => {
                let [r, g, b] = self.stops[0];
                Color::new(r, g, b, alpha)
            }
            n => {
                let level = if x.is_nan() {
                    0
                } else {
                    ((x.clamp(0.0, 1.0) * LUT_SIZE as f64) as usize).min(LUT_SIZE - 1)
                };
                let t = level as f64 / (LUT_SIZE - 1) as f64;
                let position = t * (n - 1) as f64;
                let lower = (position.floor() as usize).min(n - 2);
                let fraction = position - lower as f64;
                let (from, to) = (self.stops[lower], self.stops[lower + 1]);
                let mix = |i: usize| from[i] + fraction * (to[i] - from[i]);
                Color::new(mix(0), mix(1), mix(2), alpha)
            }
        }
    }
}

fn parse_hex(hex: &str) -> Option<[f64; 3]> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .ok()
            .map(|v| v as f64 / 255.0)
    };
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

/// Named gradients available to the transformer.
#[derive(Debug, Clone)]
pub struct GradientTable {
    gradients: AHashMap<String, Gradient>,
}

impl GradientTable {
    pub fn empty() -> Self {
        Self {
            gradients: AHashMap::new(),
        }
    }

    /// Registers the ColorBrewer ramps `RdYlGn`, `Blues` and `YlOrRd`.
    pub fn with_defaults() -> Self {
        let mut table = Self::empty();
        table.register(
            "RdYlGn",
            Gradient::from_hex(&[
                "#a50026", "#d73027", "#f46d43", "#fdae61", "#fee08b", "#ffffbf", "#d9ef8b",
                "#a6d96a", "#66bd63", "#1a9850", "#006837",
            ]),
        );
        table.register(
            "Blues",
            Gradient::from_hex(&[
                "#f7fbff", "#deebf7", "#c6dbef", "#9ecae1", "#6baed6", "#4292c6", "#2171b5",
                "#08519c", "#08306b",
            ]),
        );
        table.register(
            "YlOrRd",
            Gradient::from_hex(&[
                "#ffffcc", "#ffeda0", "#fed976", "#feb24c", "#fd8d3c", "#fc4e2a", "#e31a1c",
                "#bd0026", "#800026",
            ]),
        );
        table
    }

    pub fn register(&mut self, name: &str, gradient: Gradient) {
        self.gradients.insert(name.to_string(), gradient);
    }

    pub fn get(&self, name: &str) -> Result<&Gradient, TransformError> {
        self.gradients
            .get(name)
            .ok_or_else(|| TransformError::UnknownGradient(name.to_string()))
    }
}

impl Default for GradientTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}
