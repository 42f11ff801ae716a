use crate::inventory::{Activity, ActivityKey};
use crate::score::Score;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dense node identifier, assigned in traversal order.
pub type NodeId = usize;

/// A diagram node. Traversal nodes point at an activity; synthetic nodes
/// added later (cutoff and emission buckets) do not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub activity: Option<ActivityKey>,
    pub name: String,
}

impl Node {
    pub fn for_activity(activity: &Activity) -> Self {
        Self {
            activity: Some(activity.key.clone()),
            name: activity.display_name(),
        }
    }

    pub fn synthetic(name: &str) -> Self {
        Self {
            activity: None,
            name: name.to_string(),
        }
    }
}

/// The weighted supply-chain tree as a flat, index-aligned edge list.
///
/// Edge `i` flows from `sources[i]` into `targets[i]` with weight `scores[i]`.
/// Edge 0 is always the root (node 1) feeding the sink (node 0).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TraversalResult {
    pub sources: Vec<NodeId>,
    pub targets: Vec<NodeId>,
    pub scores: Vec<Score>,
    pub nodes: BTreeMap<NodeId, Node>,
    /// The total score every cutoff decision was taken against.
    #[serde(default)]
    pub total_score: f64,
    /// Nodes whose expansion was abandoned because their production was ambiguous.
    #[serde(default)]
    pub aborted: Vec<NodeId>,
}

impl TraversalResult {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub(crate) fn push_edge(&mut self, source: NodeId, target: NodeId, score: Score) {
        self.sources.push(source);
        self.targets.push(target);
        self.scores.push(score);
    }

    /// Iterates `(source, target, score)` triples in edge order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, &Score)> {
        self.sources
            .iter()
            .zip(&self.targets)
            .zip(&self.scores)
            .map(|((&s, &t), score)| (s, t, score))
    }

    /// Node display names in id order.
    pub fn labels(&self) -> Vec<String> {
        self.nodes.values().map(|node| node.name.clone()).collect()
    }

    /// Checks the structural invariants: aligned edge vectors, every endpoint
    /// registered, node ids dense from zero.
    pub fn is_consistent(&self) -> bool {
        let aligned =
            self.sources.len() == self.targets.len() && self.targets.len() == self.scores.len();
        let dense = self.nodes.keys().copied().eq(0..self.nodes.len());
        let resolved = self
            .sources
            .iter()
            .chain(&self.targets)
            .all(|id| self.nodes.contains_key(id));
        aligned && dense && resolved
    }
}
