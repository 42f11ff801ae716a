//! Common test utilities: small databases and a scripted LCA backend.
use ahash::AHashMap;
use sankertain::prelude::*;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Multipliers cycled through by `ScriptedEvaluator::next_sample`.
#[allow(dead_code)]
pub const SAMPLE_FACTORS: [f64; 5] = [0.96, 0.98, 1.0, 1.02, 1.04];

/// A backend whose score is linear in the demand: `unit_score[key] * amount`.
///
/// Production coefficients default to 1 and can be overridden per activity.
#[derive(Default)]
pub struct ScriptedLca {
    pub unit_scores: AHashMap<ActivityKey, f64>,
    pub production: AHashMap<ActivityKey, f64>,
    /// Number of stochastic draws taken by all evaluators of this backend.
    pub draws: Rc<Cell<usize>>,
}

#[allow(dead_code)]
impl ScriptedLca {
    pub fn new(unit_scores: &[(&str, f64)]) -> Self {
        Self {
            unit_scores: unit_scores
                .iter()
                .map(|(k, v)| (ActivityKey::from(*k), *v))
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_production(mut self, key: &str, amount: f64) -> Self {
        self.production.insert(ActivityKey::from(key), amount);
        self
    }
}

pub struct ScriptedEvaluator {
    unit_scores: AHashMap<ActivityKey, f64>,
    production: AHashMap<ActivityKey, f64>,
    draws: Rc<Cell<usize>>,
    demand: Demand,
    score: f64,
}

impl ScriptedEvaluator {
    fn point_score(&self) -> f64 {
        self.demand
            .iter()
            .map(|(key, amount)| self.unit_scores.get(key).copied().unwrap_or(0.0) * amount)
            .sum()
    }
}

impl LcaEvaluator for ScriptedEvaluator {
    fn compute_inventory(&mut self) -> std::result::Result<(), EvaluatorError> {
        Ok(())
    }

    fn compute_impact(&mut self) -> std::result::Result<(), EvaluatorError> {
        self.score = self.point_score();
        Ok(())
    }

    fn score(&self) -> f64 {
        self.score
    }

    fn recompute(&mut self, demand: &Demand) -> std::result::Result<(), EvaluatorError> {
        self.demand = demand.clone();
        self.compute_impact()
    }

    fn next_sample(&mut self) -> std::result::Result<f64, EvaluatorError> {
        let draw = self.draws.get();
        self.draws.set(draw + 1);
        self.score = self.point_score() * SAMPLE_FACTORS[draw % SAMPLE_FACTORS.len()];
        Ok(self.score)
    }

    fn technosphere_coefficient(
        &self,
        _product: &ActivityKey,
        activity: &ActivityKey,
    ) -> std::result::Result<f64, EvaluatorError> {
        Ok(self.production.get(activity).copied().unwrap_or(1.0))
    }
}

impl LcaBackend for ScriptedLca {
    type Evaluator = ScriptedEvaluator;

    fn evaluator(
        &self,
        demand: Demand,
        _method: &str,
        _use_distributions: bool,
    ) -> std::result::Result<ScriptedEvaluator, EvaluatorError> {
        Ok(ScriptedEvaluator {
            unit_scores: self.unit_scores.clone(),
            production: self.production.clone(),
            draws: Rc::clone(&self.draws),
            demand,
            score: f64::NAN,
        })
    }
}

/// Builds an activity definition with the given technosphere inputs.
#[allow(dead_code)]
pub fn activity(key: &str, inputs: &[(&str, f64)]) -> ActivityDefinition {
    ActivityDefinition {
        key: ActivityKey::from(key),
        name: key.to_string(),
        location: "GLO".to_string(),
        unit: None,
        exchanges: inputs
            .iter()
            .map(|(input, amount)| ExchangeDefinition {
                input: ActivityKey::from(*input),
                output: None,
                amount: *amount,
                kind: ExchangeKind::Technosphere,
                uncertainty: None,
            })
            .collect(),
    }
}

#[allow(dead_code)]
pub fn production(key: &str, amount: f64) -> ExchangeDefinition {
    ExchangeDefinition {
        input: ActivityKey::from(key),
        output: None,
        amount,
        kind: ExchangeKind::Production,
        uncertainty: None,
    }
}

#[allow(dead_code)]
pub fn database(activities: Vec<ActivityDefinition>) -> Database {
    Database::new(DatabaseDefinition {
        activities,
        methods: vec![],
    })
    .unwrap()
}

/// A hand-built traversal result over `node_count` traversal nodes.
#[allow(dead_code)]
pub fn traversal(node_count: usize, edges: Vec<(NodeId, NodeId, Score)>) -> TraversalResult {
    let nodes: BTreeMap<NodeId, Node> = (0..node_count)
        .map(|id| {
            (
                id,
                Node {
                    activity: Some(ActivityKey::new(format!("act-{}", id))),
                    name: format!("node {}", id),
                },
            )
        })
        .collect();
    let mut result = TraversalResult {
        nodes,
        ..TraversalResult::default()
    };
    for (source, target, score) in edges {
        result.sources.push(source);
        result.targets.push(target);
        result.scores.push(score);
    }
    result
}

/// `count` evenly spaced samples from `low` to `high`.
#[allow(dead_code)]
pub fn spread(low: f64, high: f64, count: usize) -> Score {
    let step = (high - low) / (count - 1) as f64;
    Score::Samples((0..count).map(|i| low + step * i as f64).collect())
}

/// Steel made from coal and iron ore; coal mining uses a little steel (a cycle).
#[allow(dead_code)]
pub const STEEL_JSON: &str = r#"{
    "activities": [
        {"key": "steel", "name": "steel production", "location": "DE", "exchanges": [
            {"input": "steel", "amount": 1.0, "kind": "production"},
            {"input": "coal", "amount": 2.0, "kind": "technosphere",
             "uncertainty": {"distribution": "lognormal", "sigma": 0.1}},
            {"input": "ore", "amount": 1.5, "kind": "technosphere",
             "uncertainty": {"distribution": "normal", "std_dev": 0.1}},
            {"input": "co2", "amount": 1.0, "kind": "biosphere"}
        ]},
        {"key": "coal", "name": "coal mining", "location": "PL", "exchanges": [
            {"input": "coal", "amount": 1.0, "kind": "production"},
            {"input": "steel", "amount": 0.01, "kind": "technosphere"},
            {"input": "co2", "amount": 3.0, "kind": "biosphere",
             "uncertainty": {"distribution": "uniform", "min": 2.5, "max": 3.5}}
        ]},
        {"key": "ore", "name": "iron ore mining", "location": "BR", "exchanges": [
            {"input": "co2", "amount": 0.2, "kind": "biosphere"}
        ]}
    ],
    "methods": [{"name": "gwp", "factors": {"co2": 1.0}}]
}"#;
