use crate::backend::{ActivityStore, LcaBackend, LcaEvaluator, demand_of};
use crate::error::TraversalError;
use crate::inventory::ActivityKey;
use crate::score::{Score, median};
use serde::{Deserialize, Serialize};

mod result;
mod traversal;

pub use result::{Node, NodeId, TraversalResult};
use traversal::Traversal;

/// Tuning knobs of a supply-chain traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalOptions {
    /// Amount of the root activity demanded.
    pub amount: f64,
    /// Maximum depth below the root that is expanded.
    pub max_depth: usize,
    /// Fraction of the total score a branch must exceed to be expanded
    /// (and, with Monte Carlo, to be sampled).
    pub cutoff: f64,
    /// Number of Monte Carlo draws per material flow; `None` scores deterministically.
    pub monte_carlo: Option<usize>,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            amount: 1.0,
            max_depth: 3,
            cutoff: 1e-2,
            monte_carlo: None,
        }
    }
}

/// Walks the supply chain of one activity and scores every branch.
///
/// # Example
///
/// ```rust,no_run
/// use sankertain::prelude::*;
///
/// # fn run() -> std::result::Result<(), Box<dyn std::error::Error>> {
/// let database = Database::from_file("data/steel.json")?;
/// let lca = MatrixLca::new(&database);
///
/// let tree = SupplyChainTree::builder("steel", "gwp")
///     .max_depth(4)
///     .cutoff(0.02)
///     .monte_carlo(200)
///     .build();
/// let result = tree.traverse(&database, &lca)?;
/// println!("{} flows", result.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SupplyChainTree {
    root: ActivityKey,
    method: String,
    options: TraversalOptions,
}

pub struct TreeBuilder {
    root: ActivityKey,
    method: String,
    options: TraversalOptions,
}

impl TreeBuilder {
    pub fn new(root: impl Into<ActivityKey>, method: &str) -> Self {
        Self {
            root: root.into(),
            method: method.to_string(),
            options: TraversalOptions::default(),
        }
    }
    pub fn amount(mut self, amount: f64) -> Self {
        self.options.amount = amount;
        self
    }
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.options.max_depth = max_depth;
        self
    }
    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.options.cutoff = cutoff;
        self
    }
    pub fn monte_carlo(mut self, samples: usize) -> Self {
        self.options.monte_carlo = Some(samples);
        self
    }
    pub fn options(mut self, options: TraversalOptions) -> Self {
        self.options = options;
        self
    }
    pub fn build(self) -> SupplyChainTree {
        SupplyChainTree {
            root: self.root,
            method: self.method,
            options: self.options,
        }
    }
}

impl SupplyChainTree {
    pub fn builder(root: impl Into<ActivityKey>, method: &str) -> TreeBuilder {
        TreeBuilder::new(root, method)
    }

    pub fn options(&self) -> &TraversalOptions {
        &self.options
    }

    /// Runs the traversal.
    ///
    /// One evaluator is built for the root demand and reused for every branch.
    /// Its total score (the median of the draws with Monte Carlo) is the reference
    /// for every cutoff decision. Store and evaluator failures abort the whole
    /// traversal; an activity with several production exchanges only stops its
    /// own branch and is listed in `TraversalResult::aborted`.
    pub fn traverse<S, B>(&self, store: &S, backend: &B) -> Result<TraversalResult, TraversalError>
    where
        S: ActivityStore + ?Sized,
        B: LcaBackend,
    {
        let root = store.resolve(&self.root)?;
        log::info!(
            "Traversing supply chain of '{}' for method '{}'",
            root.display_name(),
            self.method
        );

        let demand = demand_of(&root.key, self.options.amount);
        let mut evaluator =
            backend.evaluator(demand, &self.method, self.options.monte_carlo.is_some())?;
        evaluator.compute_inventory()?;
        evaluator.compute_impact()?;

        let (total_score, root_score) = match self.options.monte_carlo {
            Some(samples) => {
                let draws = evaluator.draw_samples(samples)?;
                (median(&draws), Score::Samples(draws))
            }
            None => {
                let score = evaluator.score();
                (score, Score::Scalar(score))
            }
        };
        log::debug!("Total score: {}", total_score);

        Traversal::new(store, evaluator, &self.options, &root, total_score).run(&root, root_score)
    }
}

/// Positional form of [`SupplyChainTree::traverse`].
#[allow(clippy::too_many_arguments)]
pub fn build<S, B>(
    root: impl Into<ActivityKey>,
    method: &str,
    amount: f64,
    max_depth: usize,
    cutoff: f64,
    use_monte_carlo: bool,
    sample_count: usize,
    store: &S,
    backend: &B,
) -> Result<TraversalResult, TraversalError>
where
    S: ActivityStore + ?Sized,
    B: LcaBackend,
{
    let mut builder = SupplyChainTree::builder(root, method)
        .amount(amount)
        .max_depth(max_depth)
        .cutoff(cutoff);
    if use_monte_carlo {
        builder = builder.monte_carlo(sample_count);
    }
    builder.build().traverse(store, backend)
}
