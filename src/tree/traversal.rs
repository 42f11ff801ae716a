use super::TraversalOptions;
use super::result::{Node, NodeId, TraversalResult};
use crate::backend::{ActivityStore, LcaEvaluator, demand_of};
use crate::error::TraversalError;
use crate::inventory::{Activity, ActivityKey};
use crate::score::Score;

/// Mutable state of one traversal: the evaluator shared by every level of the
/// recursion, the result being assembled and the id counter.
pub(super) struct Traversal<'a, S: ?Sized, E> {
    store: &'a S,
    evaluator: E,
    options: &'a TraversalOptions,
    /// Magnitude a branch score must exceed to count as material.
    threshold: f64,
    result: TraversalResult,
    last_id: NodeId,
}

impl<'a, S, E> Traversal<'a, S, E>
where
    S: ActivityStore + ?Sized,
    E: LcaEvaluator,
{
    /// Starts a traversal whose root (node 1) and sink (node 0) are already known.
    ///
    /// `total_score` is fixed for the lifetime of the traversal.
    pub(super) fn new(
        store: &'a S,
        evaluator: E,
        options: &'a TraversalOptions,
        root: &Activity,
        total_score: f64,
    ) -> Self {
        let mut result = TraversalResult {
            total_score,
            ..TraversalResult::default()
        };
        result.nodes.insert(0, Node::for_activity(root));
        result.nodes.insert(1, Node::for_activity(root));

        Self {
            store,
            evaluator,
            options,
            threshold: (total_score * options.cutoff).abs(),
            result,
            last_id: 1,
        }
    }

    /// Records the root edge and expands the root activity.
    pub(super) fn run(
        mut self,
        root: &Activity,
        root_score: Score,
    ) -> Result<TraversalResult, TraversalError> {
        self.result.push_edge(1, 0, root_score);
        self.expand(root, 1, self.options.amount, 0)?;

        log::info!(
            "Traversed {} nodes ({} flows, {} aborted branches)",
            self.result.nodes.len(),
            self.result.len(),
            self.result.aborted.len()
        );
        Ok(self.result)
    }

    fn is_material(&self, score: f64) -> bool {
        score.abs() > self.threshold
    }

    /// Registers `node`, scores it for `amount` of `key` and expands it.
    fn visit(
        &mut self,
        key: &ActivityKey,
        amount: f64,
        node: NodeId,
        parent: NodeId,
        depth: usize,
    ) -> Result<(), TraversalError> {
        let activity = self.store.resolve(key)?;
        self.result.nodes.insert(node, Node::for_activity(&activity));

        let demand = demand_of(&activity.key, amount);
        self.evaluator.recompute(&demand)?;
        let point = self.evaluator.score();

        let score = match self.options.monte_carlo {
            Some(samples) if self.is_material(point) => {
                self.evaluator.recompute(&demand)?;
                Score::Samples(self.evaluator.draw_samples(samples)?)
            }
            _ => Score::Scalar(point),
        };
        log::debug!(
            "node {} <- {} at depth {}: {}",
            node,
            activity.display_name(),
            depth,
            score
        );

        self.result.push_edge(node, parent, score);
        self.expand(&activity, node, amount, depth)
    }

    /// Visits the technosphere inputs of `activity` when its branch is material
    /// and the depth limit allows it.
    fn expand(
        &mut self,
        activity: &Activity,
        node: NodeId,
        amount: f64,
        depth: usize,
    ) -> Result<(), TraversalError> {
        // Gate on the evaluator's latest scalar, even after a Monte Carlo run.
        if depth >= self.options.max_depth || !self.is_material(self.evaluator.score()) {
            return Ok(());
        }

        let production = self.store.production(activity)?;
        let production_amount = match production.as_slice() {
            [] => 1.0,
            [exchange] => self
                .evaluator
                .technosphere_coefficient(&exchange.input, &exchange.output)?,
            _ => {
                log::warn!(
                    "Hit multiple production exchanges for '{}'; aborting in this branch",
                    activity.display_name()
                );
                self.result.aborted.push(node);
                return Ok(());
            }
        };
        if production_amount == 0.0 {
            log::warn!(
                "Production amount of '{}' is zero; aborting in this branch",
                activity.display_name()
            );
            self.result.aborted.push(node);
            return Ok(());
        }

        for exchange in self.store.technosphere(activity)? {
            if exchange.is_self_loop() {
                continue;
            }
            self.last_id += 1;
            let child = self.last_id;
            self.visit(
                &exchange.input,
                amount * exchange.amount / production_amount,
                child,
                node,
                depth + 1,
            )?;
        }
        Ok(())
    }
}
