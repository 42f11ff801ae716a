use crate::error::{EvaluatorError, StoreError};
use crate::inventory::{Activity, ActivityKey, Exchange};
use ahash::AHashMap;

/// A functional unit: how much of which activity is demanded.
pub type Demand = AHashMap<ActivityKey, f64>;

/// Builds a single-activity demand.
pub fn demand_of(key: &ActivityKey, amount: f64) -> Demand {
    let mut demand = Demand::with_capacity(1);
    demand.insert(key.clone(), amount);
    demand
}

/// Read access to the activity graph the traversal walks.
pub trait ActivityStore {
    /// Resolves a reference to its canonical activity.
    fn resolve(&self, key: &ActivityKey) -> Result<Activity, StoreError>;

    /// The exchanges defining how much of its own product the activity makes.
    fn production(&self, activity: &Activity) -> Result<Vec<Exchange>, StoreError>;

    /// The exchanges the activity consumes from other activities.
    fn technosphere(&self, activity: &Activity) -> Result<Vec<Exchange>, StoreError>;
}

/// A built LCA problem that can be solved repeatedly for different demands.
///
/// Implementations are stateful: every call that computes something overwrites
/// the value returned by `score`. They are not meant to be shared between
/// concurrent traversals.
pub trait LcaEvaluator {
    /// Solves the inventory for the demand the evaluator was built with.
    fn compute_inventory(&mut self) -> Result<(), EvaluatorError>;

    /// Characterizes the inventory into a single score.
    fn compute_impact(&mut self) -> Result<(), EvaluatorError>;

    /// The most recently computed score.
    fn score(&self) -> f64;

    /// Re-solves for a new demand, reusing the already-built matrices.
    fn recompute(&mut self, demand: &Demand) -> Result<(), EvaluatorError>;

    /// Draws one stochastic realization of the matrices and scores the current demand.
    fn next_sample(&mut self) -> Result<f64, EvaluatorError>;

    /// The technosphere matrix value at (product of `product`, activity `activity`).
    fn technosphere_coefficient(
        &self,
        product: &ActivityKey,
        activity: &ActivityKey,
    ) -> Result<f64, EvaluatorError>;

    /// Draws `count` successive stochastic scores.
    fn draw_samples(&mut self, count: usize) -> Result<Vec<f64>, EvaluatorError> {
        (0..count).map(|_| self.next_sample()).collect()
    }
}

/// A factory for evaluators, one per traversal.
pub trait LcaBackend {
    type Evaluator: LcaEvaluator;

    /// Builds an evaluator for `demand` under the impact assessment `method`.
    /// With `use_distributions` the evaluator must support `next_sample`.
    fn evaluator(
        &self,
        demand: Demand,
        method: &str,
        use_distributions: bool,
    ) -> Result<Self::Evaluator, EvaluatorError>;
}
