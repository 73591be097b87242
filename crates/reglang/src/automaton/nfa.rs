//! The nondeterministic automaton graph and its algebra.

use crate::automaton::dfa::Dfa;
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::subset_construction::subset_construction;
use crate::automaton::symbol::{Symbol, SymbolSet};
use crate::error::Result;
use indexmap::IndexMap;
use std::collections::{BTreeMap, HashMap};

/// An ordered pair of states: the source and destination of a transition.
pub type Edge = (StateId, StateId);

static EMPTY_LABELS: SymbolSet = SymbolSet::new();

/// A nondeterministic finite automaton.
///
/// May carry several beginning states and epsilon edges. Transitions are
/// keyed by their `(source, destination)` pair and carry a non-empty set of
/// symbols; parallel edges between the same two states merge their label
/// sets. A derived neighbour cache maps each state to the states directly
/// reachable from it and is kept consistent with the transition map on every
/// mutation.
///
/// The algebraic operations (`union`, `concatenation`, `intersection`,
/// `complement`, `iteration`) never mutate their operands: each returns a
/// freshly built automaton whose state space is renumbered so the operand
/// id spaces cannot collide.
#[derive(Debug, Clone, Default)]
pub struct Automaton {
    /// All states. Every id referenced by a flag set or an edge is a member.
    states: StateSet,
    /// States the automaton may start in.
    beginning_states: StateSet,
    /// Accepting states.
    final_states: StateSet,
    /// Edge label sets. At most one entry per ordered pair, never empty.
    transitions: BTreeMap<Edge, SymbolSet>,
    /// Cache: state -> states directly reachable by some edge.
    neighbours: HashMap<StateId, StateSet>,
}

impl Automaton {
    /// Create a new empty automaton.
    pub fn new() -> Self {
        Self::default()
    }

    /// The atomic two-state automaton: state 1 begins, state 2 accepts, and
    /// one edge `1 -> 2` carries the given label set.
    pub fn basic(labels: impl IntoIterator<Item = Symbol>) -> Self {
        let mut automaton = Automaton::new();
        automaton.add_beginning_state(1);
        automaton.add_final_state(2);
        automaton.add_transition(1, 2, labels);
        automaton
    }

    /// Register a state.
    pub fn add_state(&mut self, state: StateId) {
        self.states.insert(state);
        self.neighbours.entry(state).or_default();
    }

    /// Register a state and mark it as a beginning state.
    pub fn add_beginning_state(&mut self, state: StateId) {
        self.add_state(state);
        self.beginning_states.insert(state);
    }

    /// Register a state and mark it as accepting.
    pub fn add_final_state(&mut self, state: StateId) {
        self.add_state(state);
        self.final_states.insert(state);
    }

    /// Add a transition, merging its labels into any existing edge between
    /// the same pair of states. Both endpoints are registered as states.
    /// An empty label set leaves the automaton untouched.
    pub fn add_transition(
        &mut self,
        source: StateId,
        destination: StateId,
        labels: impl IntoIterator<Item = Symbol>,
    ) {
        let labels: SymbolSet = labels.into_iter().collect();
        if labels.is_empty() {
            return;
        }
        self.add_state(source);
        self.add_state(destination);
        self.transitions
            .entry((source, destination))
            .or_default()
            .extend(labels);
        self.neighbours.entry(source).or_default().insert(destination);
    }

    /// All states.
    pub fn states(&self) -> &StateSet {
        &self.states
    }

    /// The beginning states.
    pub fn beginning_states(&self) -> &StateSet {
        &self.beginning_states
    }

    /// The accepting states.
    pub fn final_states(&self) -> &StateSet {
        &self.final_states
    }

    /// The labels on the edge between two states. An absent edge is an empty
    /// label set, not an error.
    pub fn labels_between(&self, source: StateId, destination: StateId) -> &SymbolSet {
        self.transitions
            .get(&(source, destination))
            .unwrap_or(&EMPTY_LABELS)
    }

    /// The states directly reachable from a state. States without outgoing
    /// edges (or unknown states) yield an empty sequence.
    pub fn neighbours_of(&self, state: StateId) -> impl Iterator<Item = StateId> + '_ {
        self.neighbours
            .get(&state)
            .into_iter()
            .flat_map(|set| set.iter())
    }

    /// The largest registered state id, or 0 for an automaton with no states.
    pub fn max_state(&self) -> StateId {
        self.states.max().unwrap_or(0)
    }

    /// The alphabet: every concrete symbol used on some edge. Epsilon is
    /// never part of the alphabet; the wildcard label is.
    pub fn alphabet(&self) -> SymbolSet {
        let mut alphabet = SymbolSet::new();
        for labels in self.transitions.values() {
            for &symbol in labels {
                if !symbol.is_epsilon() {
                    alphabet.insert(symbol);
                }
            }
        }
        alphabet
    }

    /// The transition graph as an ordered map of maps, for callers that want
    /// to render or inspect the automaton.
    pub fn to_transition_map(&self) -> IndexMap<StateId, IndexMap<StateId, Vec<Symbol>>> {
        let mut map: IndexMap<StateId, IndexMap<StateId, Vec<Symbol>>> = IndexMap::new();
        for (&(source, destination), labels) in &self.transitions {
            map.entry(source)
                .or_default()
                .entry(destination)
                .or_default()
                .extend(labels.iter().copied());
        }
        map
    }

    /// The set of states reachable from `states` using only epsilon edges,
    /// including the states themselves.
    pub fn epsilon_closure(&self, states: &StateSet) -> StateSet {
        let mut closure = StateSet::new();
        let mut stack: Vec<StateId> = states.iter().collect();

        while let Some(state) = stack.pop() {
            if closure.contains(state) {
                continue;
            }
            closure.insert(state);

            for neighbour in self.neighbours_of(state) {
                if !closure.contains(neighbour)
                    && self.labels_between(state, neighbour).contains(&Symbol::Epsilon)
                {
                    stack.push(neighbour);
                }
            }
        }

        closure
    }

    /// The epsilon closure of the states reachable from `states` on `symbol`.
    pub fn move_on_symbol(&self, states: &StateSet, symbol: Symbol) -> StateSet {
        assert!(
            !symbol.is_epsilon(),
            "use epsilon_closure for epsilon moves"
        );

        let mut reached = StateSet::new();
        for state in states.iter() {
            for neighbour in self.neighbours_of(state) {
                if self.labels_between(state, neighbour).contains(&symbol) {
                    reached.insert(neighbour);
                }
            }
        }

        self.epsilon_closure(&reached)
    }

    /// Copy another automaton's states and transitions into this one with
    /// every id shifted by `offset`. Flags are left to the caller.
    fn merge_shifted(&mut self, other: &Automaton, offset: StateId) {
        for state in other.states.iter() {
            self.add_state(state + offset);
        }
        for (&(source, destination), labels) in &other.transitions {
            self.add_transition(source + offset, destination + offset, labels.iter().copied());
        }
    }

    /// The union of two automata.
    ///
    /// Both operands are copied into a disjoint id space, a fresh state is
    /// allocated with an epsilon edge to every former beginning state, and
    /// that fresh state becomes the sole beginning state. Accepting flags
    /// from both operands survive unchanged.
    pub fn union(&self, other: &Automaton) -> Automaton {
        let mut result = self.clone();
        let offset = self.max_state();
        result.merge_shifted(other, offset);
        for state in other.beginning_states.iter() {
            result.beginning_states.insert(state + offset);
        }
        for state in other.final_states.iter() {
            result.final_states.insert(state + offset);
        }

        let start = result.max_state() + 1;
        result.add_state(start);
        let beginnings = result.beginning_states.clone();
        for beginning in beginnings.iter() {
            result.add_transition(start, beginning, [Symbol::Epsilon]);
        }
        result.beginning_states = StateSet::singleton(start);

        result
    }

    /// The concatenation of two automata: `self`'s language followed by
    /// `other`'s.
    ///
    /// Beginning states come from `self`, accepting states from the shifted
    /// `other` (`self`'s accepting flags are dropped), and every former
    /// accepting state of `self` gains an epsilon edge to every beginning
    /// state of `other`.
    pub fn concatenation(&self, other: &Automaton) -> Automaton {
        let mut result = self.clone();
        result.final_states = StateSet::new();
        let offset = self.max_state();
        result.merge_shifted(other, offset);
        for state in other.final_states.iter() {
            result.add_final_state(state + offset);
        }
        for final_state in self.final_states.iter() {
            for beginning in other.beginning_states.iter() {
                result.add_transition(final_state, beginning + offset, [Symbol::Epsilon]);
            }
        }
        result
    }

    /// The intersection of two automata, as a product construction over the
    /// full Cartesian product of the operand state spaces.
    ///
    /// A product state begins iff both components begin and accepts iff both
    /// components accept. A product edge between distinct product states
    /// exists iff both operands carry the underlying edge and the
    /// intersection of the two label sets is non-empty; that intersection
    /// labels the product edge. An absent operand edge behaves as an empty
    /// label set.
    pub fn intersection(&self, other: &Automaton) -> Automaton {
        let mut result = Automaton::new();
        let mut product: IndexMap<(StateId, StateId), StateId> = IndexMap::new();

        let mut next_id: StateId = 1;
        for a in self.states.iter() {
            for b in other.states.iter() {
                product.insert((a, b), next_id);
                result.add_state(next_id);
                if self.beginning_states.contains(a) && other.beginning_states.contains(b) {
                    result.add_beginning_state(next_id);
                }
                if self.final_states.contains(a) && other.final_states.contains(b) {
                    result.add_final_state(next_id);
                }
                next_id += 1;
            }
        }

        for (&(a_src, a_dst), a_labels) in &self.transitions {
            for (&(b_src, b_dst), b_labels) in &other.transitions {
                if a_src == a_dst && b_src == b_dst {
                    continue;
                }
                let common: SymbolSet = a_labels.intersection(b_labels).copied().collect();
                if common.is_empty() {
                    continue;
                }
                let source = product[&(a_src, b_src)];
                let destination = product[&(a_dst, b_dst)];
                result.add_transition(source, destination, common);
            }
        }

        result
    }

    /// The complement of this automaton.
    ///
    /// The automaton is determinized and made total first: a non-accepting
    /// sink state absorbs every alphabet symbol missing an outgoing edge.
    /// Only then is every accepting flag flipped; flipping without the sink
    /// would wrongly accept words the automaton leaves undefined.
    pub fn complement(&self) -> Automaton {
        let alphabet = self.alphabet();
        self.determinize()
            .completed(&alphabet)
            .complemented()
            .to_automaton()
    }

    /// The iteration (Kleene star) of this automaton.
    ///
    /// Every accepting state gains an epsilon edge to every beginning state
    /// (where one is not already present), and every beginning state is
    /// promoted to accepting so the empty word is accepted.
    pub fn iteration(&self) -> Automaton {
        let mut result = self.clone();
        let finals = result.final_states.clone();
        let beginnings = result.beginning_states.clone();

        for final_state in finals.iter() {
            for beginning in beginnings.iter() {
                if !result
                    .labels_between(final_state, beginning)
                    .contains(&Symbol::Epsilon)
                {
                    result.add_transition(final_state, beginning, [Symbol::Epsilon]);
                }
            }
        }
        for beginning in beginnings.iter() {
            result.add_final_state(beginning);
        }

        result
    }

    /// Determinize this automaton through the subset construction.
    ///
    /// The result is a new value; this automaton is untouched. State count
    /// can blow up to `2^n` in the worst case; use [`determinize_bounded`]
    /// when the input is untrusted.
    ///
    /// [`determinize_bounded`]: Automaton::determinize_bounded
    pub fn determinize(&self) -> Dfa {
        subset_construction(self, None)
            .expect("unbounded subset construction cannot hit a state ceiling")
    }

    /// Determinize with a ceiling on the number of constructed states,
    /// failing fast with a resource error once it is exceeded.
    pub fn determinize_bounded(&self, max_states: usize) -> Result<Dfa> {
        subset_construction(self, Some(max_states))
    }

    /// Check whether this automaton accepts a word.
    ///
    /// Determinizes on every call. Callers matching many words against one
    /// automaton should call [`determinize`](Automaton::determinize) once
    /// and query [`Dfa::accepts`] instead.
    pub fn accepts(&self, word: &str) -> bool {
        self.determinize().accepts(word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letters(automaton: &Automaton, source: StateId, destination: StateId) -> Vec<Symbol> {
        automaton
            .labels_between(source, destination)
            .iter()
            .copied()
            .collect()
    }

    #[test]
    fn test_basic_automaton() {
        let automaton = Automaton::basic([Symbol::Literal('a')]);

        assert_eq!(automaton.states().to_vec(), vec![1, 2]);
        assert_eq!(automaton.beginning_states().to_vec(), vec![1]);
        assert_eq!(automaton.final_states().to_vec(), vec![2]);
        assert_eq!(letters(&automaton, 1, 2), vec![Symbol::Literal('a')]);
        assert!(automaton.labels_between(2, 1).is_empty());
    }

    #[test]
    fn test_parallel_edges_merge() {
        let mut automaton = Automaton::new();
        automaton.add_transition(1, 2, [Symbol::Literal('a')]);
        automaton.add_transition(1, 2, [Symbol::Literal('b')]);

        assert_eq!(
            letters(&automaton, 1, 2),
            vec![Symbol::Literal('a'), Symbol::Literal('b')]
        );
        assert_eq!(automaton.neighbours_of(1).collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_empty_label_set_is_ignored() {
        let mut automaton = Automaton::new();
        automaton.add_transition(1, 2, []);

        assert!(automaton.states().is_empty());
        assert!(automaton.labels_between(1, 2).is_empty());
        assert_eq!(automaton.neighbours_of(1).count(), 0);
    }

    #[test]
    fn test_transition_registers_endpoints() {
        let mut automaton = Automaton::new();
        automaton.add_transition(4, 9, [Symbol::Literal('x')]);

        assert!(automaton.states().contains(4));
        assert!(automaton.states().contains(9));
        assert_eq!(automaton.max_state(), 9);
    }

    #[test]
    fn test_alphabet_excludes_epsilon() {
        let mut automaton = Automaton::new();
        automaton.add_transition(1, 2, [Symbol::Literal('a'), Symbol::Epsilon]);
        automaton.add_transition(2, 3, [Symbol::Wildcard]);

        let alphabet: Vec<Symbol> = automaton.alphabet().into_iter().collect();
        assert_eq!(alphabet, vec![Symbol::Literal('a'), Symbol::Wildcard]);
    }

    #[test]
    fn test_epsilon_closure() {
        let mut automaton = Automaton::new();
        automaton.add_transition(1, 2, [Symbol::Epsilon]);
        automaton.add_transition(2, 3, [Symbol::Epsilon]);
        automaton.add_transition(3, 4, [Symbol::Literal('a')]);

        let closure = automaton.epsilon_closure(&StateSet::singleton(1));
        assert_eq!(closure.to_vec(), vec![1, 2, 3]);
    }

    #[test]
    fn test_move_on_symbol_follows_epsilon() {
        let mut automaton = Automaton::new();
        automaton.add_transition(1, 2, [Symbol::Literal('a')]);
        automaton.add_transition(1, 3, [Symbol::Literal('a')]);
        automaton.add_transition(2, 4, [Symbol::Epsilon]);

        let reached = automaton.move_on_symbol(&StateSet::singleton(1), Symbol::Literal('a'));
        assert_eq!(reached.to_vec(), vec![2, 3, 4]);
    }

    #[test]
    fn test_union_accepts_either() {
        let a = Automaton::basic([Symbol::Literal('a')]);
        let b = Automaton::basic([Symbol::Literal('b')]);
        let union = a.union(&b);

        assert_eq!(union.beginning_states().len(), 1);
        assert!(union.accepts("a"));
        assert!(union.accepts("b"));
        assert!(!union.accepts("ab"));
        assert!(!union.accepts(""));
        // Operands are untouched.
        assert_eq!(a.states().to_vec(), vec![1, 2]);
        assert!(!a.accepts("b"));
    }

    #[test]
    fn test_concatenation_orders_operands() {
        let a = Automaton::basic([Symbol::Literal('a')]);
        let b = Automaton::basic([Symbol::Literal('b')]);
        let concat = a.concatenation(&b);

        assert!(concat.accepts("ab"));
        assert!(!concat.accepts("ba"));
        assert!(!concat.accepts("a"));
        assert!(!concat.accepts("b"));
    }

    #[test]
    fn test_concatenation_drops_left_finals() {
        let a = Automaton::basic([Symbol::Literal('a')]);
        let b = Automaton::basic([Symbol::Literal('b')]);
        let concat = a.concatenation(&b);

        // State 2 was accepting in `a` but only feeds `b`'s start here.
        assert!(!concat.final_states().contains(2));
    }

    #[test]
    fn test_iteration_accepts_repetitions() {
        let star = Automaton::basic([Symbol::Literal('a')]).iteration();

        assert!(star.accepts(""));
        assert!(star.accepts("a"));
        assert!(star.accepts("aaa"));
        assert!(!star.accepts("b"));
    }

    #[test]
    fn test_intersection_requires_both() {
        let a = Automaton::basic([Symbol::Literal('a'), Symbol::Literal('b')]);
        let b = Automaton::basic([Symbol::Literal('b'), Symbol::Literal('c')]);
        let both = a.intersection(&b);

        assert!(both.accepts("b"));
        assert!(!both.accepts("a"));
        assert!(!both.accepts("c"));
    }

    #[test]
    fn test_intersection_covers_full_product() {
        let a = Automaton::basic([Symbol::Literal('a')]);
        let b = Automaton::basic([Symbol::Literal('b')]);
        let product = a.intersection(&b);

        // 2 x 2 product states, even though no edge survives.
        assert_eq!(product.states().len(), 4);
        assert!(product.alphabet().is_empty());
    }

    #[test]
    fn test_complement_flips_language() {
        let complement = Automaton::basic([Symbol::Literal('a')]).complement();

        assert!(!complement.accepts("a"));
        assert!(complement.accepts(""));
        assert!(complement.accepts("aa"));
    }

    #[test]
    fn test_neighbours_cache_tracks_transitions() {
        let mut automaton = Automaton::new();
        automaton.add_transition(1, 2, [Symbol::Literal('a')]);
        automaton.add_transition(1, 3, [Symbol::Literal('b')]);
        automaton.add_state(5);

        assert_eq!(automaton.neighbours_of(1).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(automaton.neighbours_of(5).count(), 0);
        assert_eq!(automaton.neighbours_of(77).count(), 0);
    }
}
