//! Subset construction: from a nondeterministic automaton to a [`Dfa`].

use crate::automaton::dfa::Dfa;
use crate::automaton::nfa::Automaton;
use crate::automaton::state::{StateId, StateSet};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use log::{debug, trace};
use std::collections::VecDeque;

/// Convert a nondeterministic automaton (epsilon edges and multiple
/// beginning states allowed) into an equivalent [`Dfa`] via the powerset
/// construction.
///
/// Each DFA state stands for a set of source-automaton states; two subsets
/// are the same DFA state iff they contain exactly the same states,
/// regardless of discovery order. Successor subsets that come out empty are
/// discarded: a missing transition is an implicit reject. A DFA state
/// accepts iff its subset intersects the source automaton's accepting set.
///
/// The construction can discover up to `2^n` subsets; that blow-up is
/// inherent to the algorithm. Passing `max_states` cuts it short with
/// [`Error::StateLimitExceeded`] instead of running unbounded.
pub fn subset_construction(nfa: &Automaton, max_states: Option<usize>) -> Result<Dfa> {
    let mut dfa = Dfa::new();
    let alphabet = nfa.alphabet();

    let initial = nfa.epsilon_closure(nfa.beginning_states());
    if initial.is_empty() {
        return Ok(dfa);
    }

    // Registry of discovered subsets, keyed by their sorted member list.
    let mut registry: IndexMap<Vec<StateId>, StateId> = IndexMap::new();
    let mut worklist: VecDeque<(StateId, StateSet)> = VecDeque::new();

    let start = dfa.add_state();
    dfa.set_start_state(start);
    if initial.intersects(nfa.final_states()) {
        dfa.add_final_state(start);
    }
    registry.insert(initial.to_vec(), start);
    worklist.push_back((start, initial));

    while let Some((current_id, current)) = worklist.pop_front() {
        for &symbol in &alphabet {
            let successor = nfa.move_on_symbol(&current, symbol);
            if successor.is_empty() {
                continue;
            }

            let key = successor.to_vec();
            let next_id = if let Some(&existing) = registry.get(&key) {
                existing
            } else {
                if let Some(limit) = max_states {
                    if registry.len() >= limit {
                        return Err(Error::StateLimitExceeded { limit });
                    }
                }
                let id = dfa.add_state();
                if successor.intersects(nfa.final_states()) {
                    dfa.add_final_state(id);
                }
                trace!("subset {key:?} becomes state {id}");
                registry.insert(key, id);
                worklist.push_back((id, successor));
                id
            };

            dfa.add_transition(current_id, symbol, next_id);
        }
    }

    debug!(
        "subset construction: {} NFA states -> {} DFA states over {} symbols",
        nfa.states().len(),
        dfa.num_states(),
        alphabet.len()
    );

    Ok(dfa)
}
