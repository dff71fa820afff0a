//! Root construction over the joint action space.
//!
//! In singles (or when one slot acts) the root has one edge per slot-A
//! action. In doubles it has one edge per compatible (a, b) pair, weighted by
//! the product of the per-slot priors and renormalized.

use rand::Rng;
use tracing::trace;

use crate::actions::LegalActionSet;
use crate::node::{SearchEdge, SearchNode};
use crate::noise::{blend_noise, dirichlet_noise};

/// Summary of a finished root, for logging and diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeStats {
    pub num_edges: usize,
    pub total_visits: u32,
    pub max_edge_visits: u32,
    /// Mean value of the most visited edge.
    pub best_value: f32,
}

/// Build the root from per-slot legal actions and per-slot priors.
///
/// `probs_a` / `probs_b` are indexed by vocabulary index. Pairs that switch
/// both slots to the same team member are left out.
pub fn build_root(set: &LegalActionSet, probs_a: &[f32], probs_b: &[f32]) -> SearchNode {
    let prior = |probs: &[f32], idx: usize| probs.get(idx).copied().unwrap_or(0.0);

    if set.slot_b.is_empty() {
        let edges = set
            .slot_a
            .iter()
            .map(|a| SearchEdge::new(*a, None, prior(probs_a, a.vocab_index)))
            .collect();
        return SearchNode::new(edges);
    }

    let mut edges = Vec::with_capacity(set.slot_a.len() * set.slot_b.len());
    for a in &set.slot_a {
        let prior_a = prior(probs_a, a.vocab_index);
        for b in &set.slot_b {
            if a.collides_with(b) {
                continue;
            }
            edges.push(SearchEdge::new(
                *a,
                Some(*b),
                prior_a * prior(probs_b, b.vocab_index),
            ));
        }
    }
    let mut root = SearchNode::new(edges);
    normalize_priors(&mut root);
    trace!(edges = root.edges.len(), "Built joint root");
    root
}

/// Rescale edge priors to sum to 1. Leaves them alone if the sum is not
/// positive.
pub fn normalize_priors(node: &mut SearchNode) {
    let sum: f32 = node.edges.iter().map(|e| e.prior).sum();
    if sum > 0.0 {
        for edge in &mut node.edges {
            edge.prior /= sum;
        }
    }
}

/// Perturb root priors with Dirichlet(alpha) noise weighted by `epsilon`.
pub fn apply_dirichlet_noise<R: Rng + ?Sized>(
    node: &mut SearchNode,
    alpha: f32,
    epsilon: f32,
    rng: &mut R,
) {
    if node.edges.is_empty() {
        return;
    }
    let noise = dirichlet_noise(node.edges.len(), alpha, rng);
    let mut priors: Vec<f32> = node.edges.iter().map(|e| e.prior).collect();
    blend_noise(&mut priors, &noise, epsilon);
    for (edge, p) in node.edges.iter_mut().zip(priors) {
        edge.prior = p;
    }
}

/// Collect statistics about a root.
pub fn stats(node: &SearchNode) -> TreeStats {
    let best = node.best_edge().map(|i| &node.edges[i]);
    TreeStats {
        num_edges: node.edges.len(),
        total_visits: node.visit_count,
        max_edge_visits: best.map(|e| e.visit_count).unwrap_or(0),
        best_value: best.map(|e| e.mean_value()).unwrap_or(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionKind, LegalAction};
    use engine_core::MoveId;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn mv(vocab_index: usize) -> LegalAction {
        LegalAction {
            vocab_index,
            kind: ActionKind::Move {
                move_id: MoveId(vocab_index as u16),
                target: 1,
                terastallize: None,
            },
        }
    }

    fn switch(vocab_index: usize, slot: usize) -> LegalAction {
        LegalAction {
            vocab_index,
            kind: ActionKind::Switch { slot },
        }
    }

    fn probs(n: usize, entries: &[(usize, f32)]) -> Vec<f32> {
        let mut p = vec![0.0; n];
        for &(i, v) in entries {
            p[i] = v;
        }
        p
    }

    #[test]
    fn test_single_slot_root_uses_raw_priors() {
        let set = LegalActionSet {
            slot_a: vec![mv(3), mv(4), switch(8, 2)],
            slot_b: Vec::new(),
        };
        let pa = probs(10, &[(3, 0.5), (4, 0.3), (8, 0.2)]);
        let root = build_root(&set, &pa, &[]);

        assert_eq!(root.edges.len(), 3);
        assert!(root.edges.iter().all(|e| e.action_b.is_none()));
        assert!((root.edges[1].prior - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_joint_root_n_by_m() {
        let set = LegalActionSet {
            slot_a: vec![mv(3), mv(4), switch(8, 2)],
            slot_b: vec![mv(5), mv(6)],
        };
        let pa = probs(10, &[(3, 0.5), (4, 0.3), (8, 0.2)]);
        let pb = probs(10, &[(5, 0.9), (6, 0.1)]);
        let root = build_root(&set, &pa, &pb);

        assert_eq!(root.edges.len(), 6);
        let sum: f32 = root.edges.iter().map(|e| e.prior).sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!((root.edges[0].prior - 0.45).abs() < 1e-6);
        assert_eq!(root.edges[0].action_b, Some(mv(5)));
    }

    #[test]
    fn test_joint_root_excludes_double_switch() {
        let set = LegalActionSet {
            slot_a: vec![switch(8, 2), switch(9, 3)],
            slot_b: vec![switch(8, 2), switch(9, 3)],
        };
        let pa = probs(10, &[(8, 0.5), (9, 0.5)]);
        let root = build_root(&set, &pa, &pa);

        assert_eq!(root.edges.len(), 2);
        for e in &root.edges {
            assert!(!e.action_a.collides_with(e.action_b.as_ref().unwrap()));
            assert!((e.prior - 0.5).abs() < 1e-6);
        }
    }

    #[test]
    fn test_zero_priors_left_unnormalized() {
        let set = LegalActionSet {
            slot_a: vec![mv(3)],
            slot_b: vec![mv(4), mv(5)],
        };
        let zeros = vec![0.0; 10];
        let root = build_root(&set, &zeros, &zeros);
        assert_eq!(root.edges.len(), 2);
        assert!(root.edges.iter().all(|e| e.prior == 0.0));
    }

    #[test]
    fn test_noise_epsilon_zero_keeps_priors() {
        let set = LegalActionSet {
            slot_a: vec![mv(3), mv(4), mv(5)],
            slot_b: Vec::new(),
        };
        let pa = probs(10, &[(3, 0.6), (4, 0.3), (5, 0.1)]);
        let mut root = build_root(&set, &pa, &[]);
        let before: Vec<f32> = root.edges.iter().map(|e| e.prior).collect();

        apply_dirichlet_noise(&mut root, 0.3, 0.0, &mut ChaCha20Rng::seed_from_u64(1));
        let after: Vec<f32> = root.edges.iter().map(|e| e.prior).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_noise_epsilon_one_is_raw_sample() {
        let set = LegalActionSet {
            slot_a: vec![mv(3), mv(4), mv(5), mv(6)],
            slot_b: Vec::new(),
        };
        let pa = probs(10, &[(3, 0.25), (4, 0.25), (5, 0.25), (6, 0.25)]);
        let mut root = build_root(&set, &pa, &[]);

        apply_dirichlet_noise(&mut root, 0.3, 1.0, &mut ChaCha20Rng::seed_from_u64(11));
        let expected = dirichlet_noise(4, 0.3, &mut ChaCha20Rng::seed_from_u64(11));
        let after: Vec<f32> = root.edges.iter().map(|e| e.prior).collect();
        assert_eq!(after, expected);
        let sum: f32 = after.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_stats() {
        let set = LegalActionSet {
            slot_a: vec![mv(3), mv(4)],
            slot_b: Vec::new(),
        };
        let mut root = build_root(&set, &probs(10, &[(3, 0.5), (4, 0.5)]), &[]);
        root.record(1, 1.0);
        root.record(1, 0.0);
        root.record(0, 1.0);

        let s = stats(&root);
        assert_eq!(s.num_edges, 2);
        assert_eq!(s.total_visits, 3);
        assert_eq!(s.max_edge_visits, 2);
        assert!((s.best_value - 0.5).abs() < 1e-6);
    }
}
