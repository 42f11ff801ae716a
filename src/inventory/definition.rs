use super::ActivityKey;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// The complete, canonical definition of an inventory database.
/// This is the target structure for any custom data model conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseDefinition {
    pub activities: Vec<ActivityDefinition>,
    #[serde(default)]
    pub methods: Vec<MethodDefinition>,
}

/// Defines a single activity (a process or product system) and its exchanges.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityDefinition {
    pub key: ActivityKey,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default)]
    pub exchanges: Vec<ExchangeDefinition>,
}

/// Defines one exchange of an activity.
///
/// `output` defaults to the activity owning the exchange. For biosphere exchanges
/// `input` names an elementary flow rather than an activity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExchangeDefinition {
    pub input: ActivityKey,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ActivityKey>,
    pub amount: f64,
    pub kind: ExchangeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<Uncertainty>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    Production,
    Technosphere,
    Biosphere,
}

/// Uncertainty attached to an exchange amount. The static `amount` is the
/// location of the distribution (mean, median or mode depending on the shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "distribution", rename_all = "lowercase")]
pub enum Uncertainty {
    Normal { std_dev: f64 },
    /// `sigma` of the underlying normal; the median equals `|amount|` and the sign is kept.
    Lognormal { sigma: f64 },
    Uniform { min: f64, max: f64 },
    /// The mode is the exchange amount.
    Triangular { min: f64, max: f64 },
}

/// An impact assessment method: characterization factors per elementary flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDefinition {
    pub name: String,
    pub factors: AHashMap<ActivityKey, f64>,
}
