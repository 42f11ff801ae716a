use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

pub mod gradient;

pub use gradient::{Gradient, GradientTable};

/// An RGBA color with every channel in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Lowers every fully saturated RGB channel by a negligible amount.
    ///
    /// Plotly reads an rgba channel of exactly `1.0` on the 0-255 scale and draws
    /// it almost black.
    pub fn desaturate_full_channels(self) -> Self {
        let nudge = |c: f64| if c == 1.0 { c - 0.000001 } else { c };
        Self {
            r: nudge(self.r),
            g: nudge(self.g),
            b: nudge(self.b),
            a: self.a,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({:?}, {:?}, {:?}, {:?})", self.r, self.g, self.b, self.a)
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Which gradient and which sample point each link role uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Gradient for flows without uncertainty information.
    pub neutral: String,
    /// Position sampled on `neutral`.
    pub neutral_position: f64,
    pub neutral_alpha: f64,
    /// Gradient keyed by quantile position in quantile mode.
    pub quantile: String,
    /// Gradient keyed by relative standard deviation in deviation mode.
    pub deviation: String,
    pub uncertainty_alpha: f64,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            neutral: "Blues".to_string(),
            neutral_position: 0.5,
            neutral_alpha: 0.6,
            quantile: "RdYlGn".to_string(),
            deviation: "YlOrRd".to_string(),
            uncertainty_alpha: 0.9,
        }
    }
}
