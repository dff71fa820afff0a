//! Search edges and nodes.
//!
//! An edge is one candidate joint action at a node, with the statistics PUCT
//! selection needs. The search is single-ply, so edges never own children.

use crate::actions::LegalAction;

/// One candidate joint action.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchEdge {
    pub action_a: LegalAction,

    /// `None` when only one slot acts.
    pub action_b: Option<LegalAction>,

    /// P(s,a), after normalization and noise.
    pub prior: f32,

    /// Sum of backed-up leaf values.
    pub value_sum: f32,

    pub visit_count: u32,
}

impl SearchEdge {
    pub fn new(action_a: LegalAction, action_b: Option<LegalAction>, prior: f32) -> Self {
        Self {
            action_a,
            action_b,
            prior,
            value_sum: 0.0,
            visit_count: 0,
        }
    }

    /// Calculate mean value Q(s,a) = value_sum / visit_count.
    /// Returns 0.0 if never visited.
    #[inline]
    pub fn mean_value(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / self.visit_count as f32
        }
    }

    /// PUCT(s,a) = Q(s,a) + c_puct * P(s,a) * sqrt(N_parent) / (1 + N(s,a))
    ///
    /// Leaf values are always from the searching side's point of view, so Q
    /// is used as is.
    ///
    /// Takes pre-computed sqrt(parent_visits) to avoid redundant sqrt calls
    /// when comparing multiple edges.
    #[inline]
    pub fn puct_score(&self, parent_visits_sqrt: f32, c_puct: f32) -> f32 {
        let u = c_puct * self.prior * parent_visits_sqrt / (1.0 + self.visit_count as f32);
        self.mean_value() + u
    }
}

/// An expansion point: ordered edges plus the total visit count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchNode {
    pub edges: Vec<SearchEdge>,
    pub visit_count: u32,
}

impl SearchNode {
    pub fn new(edges: Vec<SearchEdge>) -> Self {
        Self {
            edges,
            visit_count: 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Index of the edge with the highest PUCT score. The first edge wins
    /// ties.
    pub fn select_edge(&self, c_puct: f32) -> Option<usize> {
        let parent_visits_sqrt = (self.visit_count as f32).sqrt();
        let mut best = None;
        let mut best_score = f32::NEG_INFINITY;
        for (i, edge) in self.edges.iter().enumerate() {
            let score = edge.puct_score(parent_visits_sqrt, c_puct);
            if score > best_score || best.is_none() {
                best_score = score;
                best = Some(i);
            }
        }
        best
    }

    /// Back up one leaf value through edge `idx`.
    pub fn record(&mut self, idx: usize, value: f32) {
        let edge = &mut self.edges[idx];
        edge.visit_count += 1;
        edge.value_sum += value;
        self.visit_count += 1;
    }

    /// Index of the most visited edge. The first edge wins ties, so an
    /// unvisited root picks its first edge.
    pub fn best_edge(&self) -> Option<usize> {
        let mut best = None;
        let mut best_visits = 0;
        for (i, edge) in self.edges.iter().enumerate() {
            if best.is_none() || edge.visit_count > best_visits {
                best_visits = edge.visit_count;
                best = Some(i);
            }
        }
        best
    }

    /// Visit counts normalized to a distribution over edges.
    pub fn visit_distribution(&self) -> Vec<f32> {
        let total: u32 = self.edges.iter().map(|e| e.visit_count).sum();
        if total == 0 {
            return vec![0.0; self.edges.len()];
        }
        self.edges
            .iter()
            .map(|e| e.visit_count as f32 / total as f32)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(prior: f32) -> SearchEdge {
        SearchEdge::new(LegalAction::pass(), None, prior)
    }

    #[test]
    fn test_mean_value() {
        let mut e = edge(0.5);
        assert_eq!(e.mean_value(), 0.0);
        e.visit_count = 4;
        e.value_sum = 3.0;
        assert!((e.mean_value() - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_puct_unvisited_ignores_value() {
        let mut e = edge(0.4);
        // Accumulated value without visits contributes nothing.
        e.value_sum = 10.0;
        let sqrt_n = (9.0f32).sqrt();
        let score = e.puct_score(sqrt_n, 1.5);
        assert!((score - 1.5 * 0.4 * 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_puct_visited() {
        let mut e = edge(0.5);
        e.visit_count = 1;
        e.value_sum = 0.8;
        let score = e.puct_score(2.0, 1.0);
        assert!((score - (0.8 + 0.5 * 2.0 / 2.0)).abs() < 1e-6);
    }

    #[test]
    fn test_select_prefers_prior_then_first() {
        let node = SearchNode::new(vec![edge(0.2), edge(0.5), edge(0.5)]);
        // No visits yet: every score is 0, first edge wins.
        assert_eq!(node.select_edge(1.5), Some(0));

        let mut node = node;
        node.visit_count = 1;
        assert_eq!(node.select_edge(1.5), Some(1));
    }

    #[test]
    fn test_record_and_best() {
        let mut node = SearchNode::new(vec![edge(0.3), edge(0.3), edge(0.4)]);
        assert_eq!(node.best_edge(), Some(0));

        node.record(2, 1.0);
        node.record(1, 0.0);
        node.record(2, 0.5);
        assert_eq!(node.visit_count, 3);
        assert_eq!(node.edges[2].visit_count, 2);
        assert!((node.edges[2].value_sum - 1.5).abs() < 1e-6);
        assert_eq!(node.best_edge(), Some(2));

        let dist = node.visit_distribution();
        assert!((dist[2] - 2.0 / 3.0).abs() < 1e-6);
        assert_eq!(dist[0], 0.0);
    }

    #[test]
    fn test_unrecorded_selection_repeats() {
        // Nothing is written when an iteration is thrown away, so the same
        // edge comes up again on the next selection.
        let node = SearchNode::new(vec![edge(0.6), edge(0.3), edge(0.1)]);
        assert_eq!(node.select_edge(1.5), Some(0));
        assert_eq!(node.select_edge(1.5), Some(0));
        assert_eq!(node.visit_count, 0);
    }

    #[test]
    fn test_empty_node() {
        let node = SearchNode::default();
        assert!(node.is_empty());
        assert_eq!(node.select_edge(1.0), None);
        assert_eq!(node.best_edge(), None);
    }
}
