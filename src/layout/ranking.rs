//! Directed step graph and breadth-first leveling for flowcharts.
//!
//! Kept free of geometry and styling so leveling can be exercised on its own.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use log::debug;

/// Adjacency over caller step ids, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    order: Vec<String>,
    outgoing: HashMap<String, Vec<String>>,
    incoming: HashMap<String, Vec<String>>,
}

impl FlowGraph {
    /// Builds the graph. Duplicate step ids keep their first position; edges
    /// naming an undeclared step are left out.
    pub fn new<'e, I>(step_ids: &[String], edges: I) -> Self
    where
        I: IntoIterator<Item = (&'e str, &'e str)>,
    {
        let mut seen: HashSet<&str> = HashSet::new();
        let order: Vec<String> = step_ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .cloned()
            .collect();

        let mut outgoing: HashMap<String, Vec<String>> = HashMap::new();
        let mut incoming: HashMap<String, Vec<String>> = HashMap::new();
        for (from, to) in edges {
            if !seen.contains(from) || !seen.contains(to) {
                debug!(from, to; "Ignoring edge with undeclared endpoint");
                continue;
            }
            outgoing
                .entry(from.to_string())
                .or_default()
                .push(to.to_string());
            incoming
                .entry(to.to_string())
                .or_default()
                .push(from.to_string());
        }

        Self {
            order,
            outgoing,
            incoming,
        }
    }

    pub fn step_ids(&self) -> &[String] {
        &self.order
    }

    pub fn contains(&self, id: &str) -> bool {
        self.order.iter().any(|candidate| candidate == id)
    }

    pub fn successors(&self, id: &str) -> &[String] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn predecessors(&self, id: &str) -> &[String] {
        self.incoming.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn in_degree(&self, id: &str) -> usize {
        self.predecessors(id).len()
    }

    /// Steps without incoming edges, in declaration order. A graph where every
    /// step has a predecessor (cycles included) falls back to its first step.
    pub fn roots(&self) -> Vec<&str> {
        let roots: Vec<&str> = self
            .order
            .iter()
            .map(String::as_str)
            .filter(|id| self.in_degree(id) == 0)
            .collect();
        if !roots.is_empty() {
            return roots;
        }
        match self.order.first() {
            Some(first) => {
                debug!(root = first.as_str(); "No step without predecessors, using first step as root");
                vec![first.as_str()]
            }
            None => Vec::new(),
        }
    }

    /// Multi-source BFS from [`FlowGraph::roots`]. A step keeps the level it
    /// was first discovered at. Steps the traversal never reaches are
    /// appended one at a time, each one level below the deepest so far.
    pub fn assign_levels(&self) -> Levels {
        let mut levels = Levels::default();
        let mut queue: VecDeque<&str> = VecDeque::new();

        for root in self.roots() {
            if levels.insert(root, 0) {
                queue.push_back(root);
            }
        }

        while let Some(id) = queue.pop_front() {
            let next_level = levels.level_of(id).unwrap_or(0) + 1;
            for next in self.successors(id) {
                if levels.insert(next, next_level) {
                    queue.push_back(next.as_str());
                }
            }
        }

        let unreached: Vec<&String> = self
            .order
            .iter()
            .filter(|id| levels.level_of(id).is_none())
            .collect();
        if !unreached.is_empty() {
            debug!(count = unreached.len(); "Placing unreached steps");
        }
        for id in unreached {
            let level = levels.max_level().map_or(0, |max| max + 1);
            levels.insert(id, level);
        }

        levels
    }
}

/// Level assignment: per-step level plus the members of each level in
/// discovery order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Levels {
    level_of: HashMap<String, usize>,
    rows: BTreeMap<usize, Vec<String>>,
}

impl Levels {
    /// Records a level unless the step already has one. Returns whether it
    /// was recorded.
    fn insert(&mut self, id: &str, level: usize) -> bool {
        if self.level_of.contains_key(id) {
            return false;
        }
        self.level_of.insert(id.to_string(), level);
        self.rows.entry(level).or_default().push(id.to_string());
        true
    }

    pub fn level_of(&self, id: &str) -> Option<usize> {
        self.level_of.get(id).copied()
    }

    pub fn rows(&self) -> &BTreeMap<usize, Vec<String>> {
        &self.rows
    }

    pub fn max_level(&self) -> Option<usize> {
        self.rows.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.level_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.level_of.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn graph(steps: &[&str], edges: &[(&'static str, &'static str)]) -> FlowGraph {
        FlowGraph::new(&ids(steps), edges.iter().copied())
    }

    #[test]
    fn chain_levels_increase() {
        let g = graph(&["A", "B", "C"], &[("A", "B"), ("B", "C")]);
        let levels = g.assign_levels();
        assert_eq!(levels.level_of("A"), Some(0));
        assert_eq!(levels.level_of("B"), Some(1));
        assert_eq!(levels.level_of("C"), Some(2));
    }

    #[test]
    fn rejoin_keeps_first_discovered_level() {
        let g = graph(
            &["A", "B", "C", "D", "B2"],
            &[("A", "B"), ("B", "C"), ("B", "B2"), ("B2", "C"), ("C", "D")],
        );
        let levels = g.assign_levels();
        assert_eq!(levels.level_of("B"), Some(1));
        assert_eq!(levels.level_of("B2"), Some(2));
        assert_eq!(levels.level_of("C"), Some(2));
        assert_eq!(levels.level_of("D"), Some(3));
        let occurrences = levels
            .rows()
            .values()
            .flatten()
            .filter(|id| id.as_str() == "C")
            .count();
        assert_eq!(occurrences, 1);
    }

    #[test]
    fn two_cycle_uses_first_step_as_root() {
        let g = graph(&["A", "B"], &[("A", "B"), ("B", "A")]);
        assert_eq!(g.roots(), vec!["A"]);
        let levels = g.assign_levels();
        assert_eq!(levels.level_of("A"), Some(0));
        assert_eq!(levels.level_of("B"), Some(1));
        assert_eq!(levels.len(), 2);
    }

    #[test]
    fn self_loop_terminates() {
        let g = graph(&["A"], &[("A", "A")]);
        let levels = g.assign_levels();
        assert_eq!(levels.level_of("A"), Some(0));
    }

    #[test]
    fn multiple_roots_share_level_zero() {
        let g = graph(&["A", "B", "C"], &[("A", "C"), ("B", "C")]);
        assert_eq!(g.roots(), vec!["A", "B"]);
        let levels = g.assign_levels();
        assert_eq!(levels.rows().get(&0), Some(&ids(&["A", "B"])));
        assert_eq!(levels.level_of("C"), Some(1));
    }

    #[test]
    fn unreached_steps_go_below_deepest_level() {
        // X and Y form a cycle unreachable from the real root R.
        let g = graph(
            &["R", "S", "X", "Lonely", "Y"],
            &[("R", "S"), ("X", "Y"), ("Y", "X")],
        );
        let levels = g.assign_levels();
        assert_eq!(levels.level_of("R"), Some(0));
        assert_eq!(levels.level_of("S"), Some(1));
        // Lonely has no edges at all, so it is a root.
        assert_eq!(levels.level_of("Lonely"), Some(0));
        assert_eq!(levels.level_of("X"), Some(2));
        assert_eq!(levels.level_of("Y"), Some(3));
        assert_eq!(levels.rows().get(&2), Some(&ids(&["X"])));
        assert_eq!(levels.rows().get(&3), Some(&ids(&["Y"])));
        assert_eq!(levels.max_level(), Some(3));
    }

    #[test]
    fn edges_to_undeclared_steps_are_ignored() {
        let g = graph(&["A", "B"], &[("A", "B"), ("A", "ghost"), ("ghost", "B")]);
        assert_eq!(g.successors("A"), ids(&["B"]).as_slice());
        assert_eq!(g.in_degree("B"), 1);
        assert!(!g.contains("ghost"));
        assert_eq!(g.assign_levels().len(), 2);
    }

    #[test]
    fn duplicate_step_ids_are_collapsed() {
        let g = graph(&["A", "B", "A"], &[("A", "B")]);
        assert_eq!(g.step_ids(), ids(&["A", "B"]).as_slice());
    }

    #[test]
    fn empty_graph_has_no_levels() {
        let g = graph(&[], &[]);
        assert!(g.roots().is_empty());
        let levels = g.assign_levels();
        assert!(levels.is_empty());
        assert_eq!(levels.max_level(), None);
    }

    #[test]
    fn leveling_is_deterministic() {
        let g = graph(
            &["A", "B", "C", "D", "E"],
            &[("A", "C"), ("B", "C"), ("C", "D"), ("C", "E"), ("E", "A")],
        );
        assert_eq!(g.assign_levels(), g.assign_levels());
    }
}
