//! Single-determinization search.
//!
//! One task owns one privately reshuffled state and one tree. The loop runs
//! select / expand / rollout / backpropagate cycles until the advisory
//! deadline has passed *and* the root is fully expanded, then folds the
//! root's children into per-action aggregates.

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::node::{NodeId, SearchNode, SearchTree};
use super::stats::SearchStats;
use crate::cache::{ActionSpace, ComboTables};
use crate::game::{Action, GameState};
use crate::rng::GameRng;

/// Sum of per-determinization values and the number of contributing tasks
/// for one root action.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ActionAggregate {
    pub total_value: f64,
    pub samples: u32,
}

/// Run one determinization and return its per-root-action aggregates.
///
/// The caller hands over an owned clone of the authoritative state; the deck
/// is reshuffled here so every task samples its own resolution of the
/// hidden information.
pub(crate) fn search_determinization(
    mut root_state: GameState,
    tables: &ComboTables,
    actions: &ActionSpace,
    exploration: f64,
    budget: Duration,
    rng: &mut GameRng,
    stats: &mut SearchStats,
) -> FxHashMap<Action, ActionAggregate> {
    root_state.deck.shuffle(rng);

    let untried = untried_for(&root_state, actions);
    let mut tree = SearchTree::new(SearchNode::new(root_state, None, NodeId::NONE, untried));

    let start = Instant::now();
    while start.elapsed() < budget || !tree.get(SearchTree::ROOT).is_fully_expanded() {
        let mut node = SearchTree::ROOT;

        // Selection: descend fully expanded interior nodes.
        loop {
            let n = tree.get(node);
            if n.state.is_terminal() || !n.is_fully_expanded() || n.children.is_empty() {
                break;
            }
            node = best_child(&tree, node, exploration, rng);
        }

        // Expansion: materialize one untried action.
        if !tree.get(node).state.is_terminal() && tree.get(node).untried > 0 {
            node = expand(&mut tree, node, tables, actions, rng);
            stats.nodes_expanded += 1;
        }

        // Rollout from a private copy of the node's state.
        let reward = rollout(tree.get(node).state.clone(), tables, actions, rng);
        stats.rollouts += 1;

        backpropagate(&mut tree, node, reward);
        stats.iterations += 1;
    }

    let mut aggregates: FxHashMap<Action, ActionAggregate> = FxHashMap::default();
    let root_children: Vec<NodeId> = tree.get(SearchTree::ROOT).children.iter().copied().collect();
    for child_id in root_children {
        let child = tree.get(child_id);
        if let Some(action) = &child.action {
            let entry = aggregates.entry(action.clone()).or_default();
            entry.total_value += child.value;
            entry.samples += 1;
        }
    }
    aggregates
}

fn untried_for(state: &GameState, actions: &ActionSpace) -> usize {
    if state.is_terminal() {
        0
    } else {
        actions.legal_action_count(state.hand.len(), state.discard_count)
    }
}

/// UCB1 child selection: uniform among unvisited children if any, otherwise
/// the maximal `value + c * sqrt(2 ln(parent visits) / child visits)`, ties
/// to the first maximal child in creation order.
fn best_child(tree: &SearchTree, id: NodeId, exploration: f64, rng: &mut GameRng) -> NodeId {
    let node = tree.get(id);

    let unvisited: SmallVec<[NodeId; 8]> = node
        .children
        .iter()
        .copied()
        .filter(|&c| tree.get(c).visits == 0)
        .collect();
    if let Some(&choice) = rng.choose(&unvisited) {
        return choice;
    }

    let log_parent = f64::from(node.visits).ln();
    let mut best = node.children[0];
    let mut best_score = f64::NEG_INFINITY;
    for &child_id in &node.children {
        let child = tree.get(child_id);
        let score = child.value + exploration * (2.0 * log_parent / f64::from(child.visits)).sqrt();
        if score > best_score {
            best_score = score;
            best = child_id;
        }
    }
    best
}

/// Materialize exactly one untried action as a new child.
///
/// The countdown indexes the shared per-hand-size subset list twice over:
/// values above the attack count map to discards, the rest to attacks, so
/// discards are expanded first as the counter decrements.
fn expand(
    tree: &mut SearchTree,
    id: NodeId,
    tables: &ComboTables,
    actions: &ActionSpace,
    rng: &mut GameRng,
) -> NodeId {
    let (action, next_state) = {
        let node = tree.get(id);
        let subsets = actions.subsets(node.state.hand.len());
        let action = if node.untried > subsets.len() {
            Action::Discard(subsets[node.untried - subsets.len() - 1].clone())
        } else {
            Action::Attack(subsets[node.untried - 1].clone())
        };

        let mut next_state = node.state.clone();
        next_state.apply(&action, tables, rng);
        (action, next_state)
    };

    let untried = untried_for(&next_state, actions);
    let child_id = tree.alloc(SearchNode::new(next_state, Some(action), id, untried));

    let node = tree.get_mut(id);
    node.children.push(child_id);
    node.untried -= 1;
    child_id
}

/// Simulate to a terminal state (or an empty hand, rewarded 0).
///
/// Before sampling, the maximal-size attack subsets are scanned for a lethal
/// play; the best-attack table already maximizes over sub-selections, so
/// smaller subsets need no separate scan. Otherwise the action is uniform
/// over attacks plus, while discards remain, a discard pool weighted to
/// match the attack pool.
fn rollout(
    mut state: GameState,
    tables: &ComboTables,
    actions: &ActionSpace,
    rng: &mut GameRng,
) -> f64 {
    let mut hand_len = usize::MAX;
    let mut subsets: &[crate::game::CardIndices] = &[];

    while !state.is_terminal() {
        let n = state.hand.len();
        if n != hand_len {
            hand_len = n;
            subsets = actions.subsets(n);
        }
        if n == 0 {
            return 0.0;
        }

        let max_play = n.min(5);
        let mut lethal: Option<usize> = None;
        for (i, indices) in subsets.iter().enumerate().rev() {
            if indices.len() < max_play {
                break;
            }
            let damage = tables.best_attack_damage(&state.cards_at(indices));
            if state.enemy_health - damage <= 0.0 {
                lethal = Some(i);
                break;
            }
        }

        if let Some(i) = lethal {
            state.apply_attack(&subsets[i], tables, rng);
            continue;
        }

        let pools = if state.discard_count > 0 { 2 } else { 1 };
        let choice = rng.gen_range_usize(0..pools * subsets.len());
        if choice < subsets.len() {
            state.apply_attack(&subsets[choice], tables, rng);
        } else {
            let _ = state.apply_discard(&subsets[choice - subsets.len()], rng);
        }
    }

    state.reward()
}

/// Running-maximum backpropagation up to and including the root.
fn backpropagate(tree: &mut SearchTree, mut id: NodeId, reward: f64) {
    loop {
        let node = tree.get_mut(id);
        node.visits += 1;
        node.value = node.value.max(reward);
        if node.parent.is_none() {
            break;
        }
        id = node.parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::test_support::tables;
    use crate::cards::{Card, Hand, Rank, Suit};

    fn actions() -> ActionSpace {
        ActionSpace::new()
    }

    fn quick_win_state(rng: &mut GameRng) -> GameState {
        let mut state = GameState::new(rng);
        state.enemy_health = 10.0;
        state
    }

    #[test]
    fn test_zero_budget_fully_expands_root() {
        let mut rng = GameRng::new(3);
        let state = quick_win_state(&mut rng);
        let space = actions();
        let expected = space.legal_action_count(state.hand.len(), state.discard_count);

        let mut stats = SearchStats::new();
        let aggregates = search_determinization(
            state,
            tables(),
            &space,
            1.4,
            Duration::ZERO,
            &mut rng,
            &mut stats,
        );

        // One child per legal action, each sampled exactly once.
        assert_eq!(aggregates.len(), expected);
        assert!(aggregates.values().all(|a| a.samples == 1));
        assert_eq!(stats.iterations, expected as u64);
        assert_eq!(stats.nodes_expanded, expected as u64);
    }

    #[test]
    fn test_terminal_root_yields_no_aggregates() {
        let mut rng = GameRng::new(3);
        let mut state = GameState::new(&mut rng);
        state.enemy_health = 0.0;

        let mut stats = SearchStats::new();
        let aggregates = search_determinization(
            state,
            tables(),
            &actions(),
            1.4,
            Duration::ZERO,
            &mut rng,
            &mut stats,
        );

        assert!(aggregates.is_empty());
    }

    #[test]
    fn test_rollout_lethal_is_greedy() {
        let mut rng = GameRng::new(3);
        let mut state = GameState::new(&mut rng);
        state.enemy_health = 5.0;
        // Any solo play deals at least 12 damage, so the first rollout turn
        // must finish the enemy without retaliation ever landing.
        state.player_health = 100.0;

        let reward = rollout(state, tables(), &actions(), &mut rng);
        assert_eq!(reward, 100.0);
    }

    #[test]
    fn test_rollout_empty_hand_stops_neutral() {
        let mut rng = GameRng::new(3);
        let mut state = GameState::new(&mut rng);
        state.hand = Hand::new();

        let reward = rollout(state, tables(), &actions(), &mut rng);
        assert_eq!(reward, 0.0);
    }

    #[test]
    fn test_backpropagation_is_running_maximum() {
        let mut rng = GameRng::new(3);
        let root_state = GameState::new(&mut rng);
        let mut tree = SearchTree::new(SearchNode::new(root_state.clone(), None, NodeId::NONE, 1));
        let child = tree.alloc(SearchNode::new(
            root_state,
            Some(Action::Attack(smallvec::smallvec![0])),
            SearchTree::ROOT,
            0,
        ));
        tree.get_mut(SearchTree::ROOT).children.push(child);

        backpropagate(&mut tree, child, 50.0);
        backpropagate(&mut tree, child, 20.0);
        backpropagate(&mut tree, child, 80.0);

        let node = tree.get(child);
        assert_eq!(node.visits, 3);
        assert_eq!(node.value, 80.0, "value keeps the best reward, not a mean");
        assert_eq!(tree.get(SearchTree::ROOT).value, 80.0);
    }

    #[test]
    fn test_expand_order_discards_before_attacks() {
        let mut rng = GameRng::new(3);
        let mut state = quick_win_state(&mut rng);
        state.observe_hand(
            [
                Card::new(Suit::Moon, Rank::Two, false),
                Card::new(Suit::Fire, Rank::Five, false),
            ]
            .into_iter()
            .collect(),
            &mut rng,
        );
        let space = actions();

        let untried = untried_for(&state, &space);
        let mut tree = SearchTree::new(SearchNode::new(state, None, NodeId::NONE, untried));

        // Hand of 2 with discards left: 3 attacks + 3 discards. The countdown
        // materializes the discard block first, last subset first.
        let first = expand(&mut tree, SearchTree::ROOT, tables(), &space, &mut rng);
        assert!(tree.get(first).action.as_ref().unwrap().is_discard());

        for _ in 0..2 {
            expand(&mut tree, SearchTree::ROOT, tables(), &space, &mut rng);
        }
        let fourth = expand(&mut tree, SearchTree::ROOT, tables(), &space, &mut rng);
        assert!(!tree.get(fourth).action.as_ref().unwrap().is_discard());
    }

    #[test]
    fn test_determinization_is_seed_reproducible() {
        let space = actions();

        let run = |seed: u64| {
            let mut rng = GameRng::new(seed);
            let state = quick_win_state(&mut rng);
            let mut stats = SearchStats::new();
            let mut agg: Vec<(Action, u32, f64)> = search_determinization(
                state,
                tables(),
                &space,
                1.4,
                Duration::ZERO,
                &mut rng,
                &mut stats,
            )
            .into_iter()
            .map(|(a, v)| (a, v.samples, v.total_value))
            .collect();
            agg.sort_by(|a, b| format!("{}", a.0).cmp(&format!("{}", b.0)));
            agg
        };

        assert_eq!(run(99), run(99));
    }
}
