use crate::config::{ResolverConfig, TraversalScope};
use crate::error::{GraphError, Result};
use crate::path::{RelationshipPath, RelationshipStep};
use crate::resolution::{PathState, Resolution};
use crate::types::{EdgeRole, PersonGraph, PersonId};
use petgraph::graph::NodeIndex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Range;

/// Marriage phase of a walk from the root
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
enum Phase {
    /// No spouse step taken
    Blood,
    /// Last step was the first spouse step
    SpouseTerminal,
    /// A spouse step has been followed by another step
    InLaw,
}

impl Phase {
    const ALL: [Phase; 3] = [Phase::Blood, Phase::SpouseTerminal, Phase::InLaw];

    fn after(self, role: EdgeRole) -> Self {
        match (self, role) {
            (Phase::Blood, EdgeRole::Parent | EdgeRole::Child) => Phase::Blood,
            (Phase::Blood, EdgeRole::Spouse) => Phase::SpouseTerminal,
            (Phase::SpouseTerminal | Phase::InLaw, _) => Phase::InLaw,
        }
    }

    fn is_blood(self) -> bool {
        self != Phase::InLaw
    }
}

type State = (NodeIndex, Phase);

/// BFS result: states per distance and shortest-walk predecessors per state
struct Layers {
    layers: Vec<Vec<State>>,
    preds: HashMap<State, Vec<(State, EdgeRole)>>,
}

/// Best route into every state under selector order, plus dense ranks of
/// that route's role sequence and person sequence within its layer
struct Routes {
    best: Vec<Option<(usize, EdgeRole)>>,
    role_rank: Vec<usize>,
    person_rank: Vec<usize>,
}

/// Computes the canonical relationship path from a root person.
///
/// The walk runs over (person, marriage phase) states so that a blood
/// relationship is still found when an in-law route to the same person is
/// shorter. Per target it retains all shortest blood walks, plus all
/// shortest in-law walks when those are not longer than the blood ones.
///
/// Phases only move forward and a state reached later than the same person
/// in an earlier phase is pruned, so every walk in the resulting DAG is a
/// simple path. The canonical path is picked layer by layer without
/// enumerating walks, keeping the cost linear in the explored states and
/// edges.
pub struct RelationshipResolver<'g> {
    graph: &'g PersonGraph,
    config: ResolverConfig,
}

impl<'g> RelationshipResolver<'g> {
    pub fn new(graph: &'g PersonGraph, config: ResolverConfig) -> Self {
        Self { graph, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Canonical and candidate paths from `root` to every reachable person
    pub fn resolve(&self, root: &PersonId) -> Result<Resolution> {
        let root_idx = self
            .graph
            .node_index(root)
            .ok_or_else(|| GraphError::UnknownPerson(root.clone()))?;

        let explored = self.explore(root_idx);

        let mut order: Vec<(State, usize)> = Vec::new();
        let mut bounds: Vec<Range<usize>> = Vec::with_capacity(explored.layers.len());
        for (depth, layer) in explored.layers.iter().enumerate() {
            let start = order.len();
            order.extend(layer.iter().map(|&state| (state, depth)));
            bounds.push(start..order.len());
        }

        let index: HashMap<State, usize> = order
            .iter()
            .enumerate()
            .map(|(i, &(state, _))| (state, i))
            .collect();
        let states: Vec<PathState> = order
            .iter()
            .map(|(state, _)| PathState {
                person: self.graph.graph[state.0].id.clone(),
                preds: explored
                    .preds
                    .get(state)
                    .map(|preds| {
                        preds
                            .iter()
                            .filter_map(|&(pred, role)| index.get(&pred).map(|&i| (i, role)))
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        let routes = Routes::rank(&states, &bounds);

        let mut by_node: BTreeMap<NodeIndex, Vec<(Phase, usize, usize)>> = BTreeMap::new();
        for (i, &((node, phase), depth)) in order.iter().enumerate() {
            if node != root_idx {
                by_node.entry(node).or_default().push((phase, depth, i));
            }
        }

        let mut canonical = BTreeMap::from([(root.clone(), RelationshipPath::empty())]);
        let mut terminals = BTreeMap::from([(root.clone(), vec![0])]);

        for (node, entries) in by_node {
            let dists: Vec<(Phase, usize)> =
                entries.iter().map(|&(phase, depth, _)| (phase, depth)).collect();
            let blood = shortest(&dists, true);
            let in_law = shortest(&dists, false);

            let kept: Vec<(Phase, usize, usize)> = entries
                .into_iter()
                .filter(|&(phase, depth, _)| {
                    if phase.is_blood() {
                        Some(depth) == blood
                    } else {
                        Some(depth) == in_law && blood.map_or(true, |b| depth <= b)
                    }
                })
                .collect();

            let Some(&(_, _, chosen)) = kept.iter().min_by_key(|&&(phase, depth, i)| {
                (
                    phase == Phase::InLaw,
                    depth,
                    routes.role_rank[i],
                    routes.person_rank[i],
                )
            }) else {
                continue;
            };

            let id = self.graph.graph[node].id.clone();
            canonical.insert(id.clone(), routes.path_to(chosen, &states));
            terminals.insert(id, kept.into_iter().map(|(_, _, i)| i).collect());
        }

        log::info!(
            "Resolved {} relatives of {} ({} states explored)",
            canonical.len() - 1,
            root,
            states.len()
        );

        Ok(Resolution::new(root.clone(), canonical, states, terminals))
    }

    fn follows(&self, role: EdgeRole) -> bool {
        match self.config.scope {
            TraversalScope::Full => true,
            TraversalScope::AncestorsOnly => role == EdgeRole::Parent,
        }
    }

    /// Layered BFS over (person, phase) states
    fn explore(&self, root: NodeIndex) -> Layers {
        let start = (root, Phase::Blood);
        let mut dist: HashMap<State, usize> = HashMap::from([(start, 0)]);
        let mut preds: HashMap<State, Vec<(State, EdgeRole)>> = HashMap::new();
        let mut layers = vec![vec![start]];
        let mut depth = 0;

        while let Some(frontier) = layers.last().filter(|layer| !layer.is_empty()) {
            if self.config.max_steps.is_some_and(|max| depth >= max) {
                self.warn_if_truncated(root, frontier, &dist);
                break;
            }

            let mut next = Vec::new();
            for &state in frontier {
                let (node, phase) = state;
                for (neighbor, role) in self.graph.relatives(node) {
                    if neighbor == root || !self.follows(role) {
                        continue;
                    }

                    let reached = (neighbor, phase.after(role));
                    match dist.get(&reached) {
                        Some(&d) if d == depth + 1 => {
                            preds.entry(reached).or_default().push((state, role));
                        }
                        Some(_) => {}
                        None => {
                            if dominated(&dist, reached, depth + 1) {
                                continue;
                            }
                            dist.insert(reached, depth + 1);
                            preds.entry(reached).or_default().push((state, role));
                            next.push(reached);
                        }
                    }
                }
            }

            layers.push(next);
            depth += 1;
        }

        if layers.last().is_some_and(Vec::is_empty) {
            layers.pop();
        }

        Layers { layers, preds }
    }

    fn warn_if_truncated(&self, root: NodeIndex, frontier: &[State], dist: &HashMap<State, usize>) {
        let reached: HashSet<NodeIndex> = dist.keys().map(|(node, _)| *node).collect();
        let unexplored: HashSet<NodeIndex> = frontier
            .iter()
            .flat_map(|(node, _)| self.graph.relatives(*node))
            .filter(|(neighbor, role)| {
                *neighbor != root && self.follows(*role) && !reached.contains(neighbor)
            })
            .map(|(neighbor, _)| neighbor)
            .collect();

        if !unexplored.is_empty() {
            log::warn!(
                "Resolution from {} stopped at {} steps; {} persons left unreached",
                self.graph.graph[root].id,
                self.config.max_steps.unwrap_or_default(),
                unexplored.len()
            );
        }
    }
}

impl Routes {
    /// Pick the best predecessor of every state, one layer at a time.
    ///
    /// Walks into a state all have the same length, so comparing two of
    /// them under selector order reduces to comparing their predecessors'
    /// role ranks, then the last role, then their person ranks.
    fn rank(states: &[PathState], bounds: &[Range<usize>]) -> Self {
        let mut routes = Routes {
            best: vec![None; states.len()],
            role_rank: vec![0; states.len()],
            person_rank: vec![0; states.len()],
        };

        for layer in bounds.iter().skip(1) {
            for i in layer.clone() {
                routes.best[i] = states[i].preds.iter().copied().min_by_key(|&(pred, role)| {
                    (routes.role_rank[pred], role, routes.person_rank[pred])
                });
            }

            let by_roles = dense_rank(
                layer
                    .clone()
                    .filter_map(|i| {
                        let (pred, role) = routes.best[i]?;
                        Some(((routes.role_rank[pred], role), i))
                    })
                    .collect(),
            );
            let by_persons = dense_rank(
                layer
                    .clone()
                    .filter_map(|i| {
                        let (pred, _) = routes.best[i]?;
                        Some(((routes.person_rank[pred], &states[i].person), i))
                    })
                    .collect(),
            );
            for (i, rank) in by_roles {
                routes.role_rank[i] = rank;
            }
            for (i, rank) in by_persons {
                routes.person_rank[i] = rank;
            }
        }

        routes
    }

    /// Follow best predecessors from `state` back to the root
    fn path_to(&self, mut state: usize, states: &[PathState]) -> RelationshipPath {
        let mut steps = Vec::new();
        while let Some((pred, role)) = self.best[state] {
            steps.push(RelationshipStep {
                from: states[pred].person.clone(),
                to: states[state].person.clone(),
                role,
            });
            state = pred;
        }
        steps.reverse();
        RelationshipPath::from_steps(steps)
    }
}

/// Dense rank of every item by key; equal keys share a rank
fn dense_rank<K: Ord>(mut keyed: Vec<(K, usize)>) -> Vec<(usize, usize)> {
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    let mut ranked = Vec::with_capacity(keyed.len());
    let mut rank = 0;
    for (position, (key, item)) in keyed.iter().enumerate() {
        if position > 0 && keyed[position - 1].0 != *key {
            rank += 1;
        }
        ranked.push((*item, rank));
    }
    ranked
}

/// Minimum distance among blood-class (or in-law) states of one person
fn shortest(states: &[(Phase, usize)], blood: bool) -> Option<usize> {
    states
        .iter()
        .filter(|(phase, _)| phase.is_blood() == blood)
        .map(|(_, dist)| *dist)
        .min()
}

/// A state is useless when the same person was already reached strictly
/// earlier in a phase at least as close to blood
fn dominated(dist: &HashMap<State, usize>, (node, phase): State, depth: usize) -> bool {
    Phase::ALL
        .into_iter()
        .filter(|q| *q < phase)
        .any(|q| dist.get(&(node, q)).is_some_and(|&d| d < depth))
}

impl PersonGraph {
    /// Canonical relationship from `root` to every reachable person
    pub fn resolve_relationships(
        &self,
        root: &PersonId,
        config: ResolverConfig,
    ) -> Result<BTreeMap<PersonId, RelationshipPath>> {
        Ok(RelationshipResolver::new(self, config).resolve(root)?.canonical())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_transitions() {
        assert_eq!(Phase::Blood.after(EdgeRole::Parent), Phase::Blood);
        assert_eq!(Phase::Blood.after(EdgeRole::Spouse), Phase::SpouseTerminal);
        assert_eq!(Phase::SpouseTerminal.after(EdgeRole::Child), Phase::InLaw);
        assert_eq!(Phase::SpouseTerminal.after(EdgeRole::Spouse), Phase::InLaw);
        assert_eq!(Phase::InLaw.after(EdgeRole::Parent), Phase::InLaw);
    }

    #[test]
    fn test_domination() {
        let node = NodeIndex::new(3);
        let dist = HashMap::from([((node, Phase::Blood), 2)]);
        assert!(dominated(&dist, (node, Phase::InLaw), 3));
        assert!(dominated(&dist, (node, Phase::SpouseTerminal), 3));
        assert!(!dominated(&dist, (node, Phase::InLaw), 2));

        let dist = HashMap::from([((node, Phase::InLaw), 1)]);
        assert!(!dominated(&dist, (node, Phase::Blood), 4));
    }

    #[test]
    fn test_dense_rank_shares_ties() {
        let mut ranked = dense_rank(vec![((2, 'b'), 10), ((1, 'z'), 11), ((2, 'b'), 12), ((2, 'c'), 13)]);
        ranked.sort();
        assert_eq!(ranked, vec![(10, 1), (11, 0), (12, 1), (13, 2)]);
    }

    #[test]
    fn test_shortest_by_class() {
        let states = vec![(Phase::SpouseTerminal, 3), (Phase::Blood, 4), (Phase::InLaw, 2)];
        assert_eq!(shortest(&states, true), Some(3));
        assert_eq!(shortest(&states, false), Some(2));
    }
}
