//! Regex synthesis from a deterministic automaton (Kleene's theorem).
//!
//! States are relabeled `1..=N` with the beginning state as 1, and the
//! recurrence `R(i, j, k)` describes all paths from `i` to `j` whose
//! intermediate hops are all below `k`. Allowing one more intermediate state
//! splits every path at its visits to that state:
//!
//! ```text
//! R(i, j, k) = R(i, j, k-1)
//!            + R(i, k-1, k-1) . R(k-1, k-1, k-1)* . R(k-1, j, k-1)
//! ```
//!
//! The synthesized expression is the union of `R(1, f, N+1)` over every
//! accepting state `f`. It can be exponentially larger than the automaton;
//! that is a property of the construction, not of the input.

use crate::automaton::{Dfa, StateId, SymbolSet};
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Synthesize a regular expression equivalent to the automaton's language.
///
/// Returns `None` when the automaton accepts nothing at all: the empty
/// language has no expression in the pattern syntax, and is deliberately
/// distinct from `@` (the empty word).
pub fn synthesize(dfa: &Dfa) -> Option<String> {
    let start = dfa.start_state()?;
    let state_count = dfa.num_states() as usize;

    // Relabel to 1..=N, beginning state first.
    let mut order: Vec<StateId> = vec![start];
    order.extend((0..dfa.num_states()).filter(|&state| state != start));
    let rank: HashMap<StateId, usize> = order
        .iter()
        .enumerate()
        .map(|(index, &state)| (state, index + 1))
        .collect();

    let mut labels: BTreeMap<(usize, usize), SymbolSet> = BTreeMap::new();
    for (source, symbol, destination) in dfa.transitions() {
        let (Some(&i), Some(&j)) = (rank.get(&source), rank.get(&destination)) else {
            continue;
        };
        labels.entry((i, j)).or_default().insert(symbol);
    }

    let eliminator = Eliminator { labels };
    let mut terms: Vec<String> = Vec::new();
    for final_state in dfa.final_states().iter() {
        let Some(&f) = rank.get(&final_state) else {
            continue;
        };
        if let Some(term) = eliminator.path_regex(1, f, state_count + 1) {
            terms.push(term);
        }
    }

    if terms.is_empty() {
        return None;
    }
    let expression = terms.join("+");
    debug!(
        "synthesized a {}-character expression from {state_count} states",
        expression.len()
    );
    Some(expression)
}

struct Eliminator {
    /// Direct-edge label sets over the relabeled states.
    labels: BTreeMap<(usize, usize), SymbolSet>,
}

impl Eliminator {
    /// `R(i, j, k)`. `None` is the empty language: it vanishes from unions
    /// and annihilates the product it appears in.
    fn path_regex(&self, i: usize, j: usize, k: usize) -> Option<String> {
        if k == 1 {
            return self.direct(i, j);
        }

        let through = k - 1;
        let direct_part = self.path_regex(i, j, k - 1);
        let entry = self.path_regex(i, through, k - 1);
        let cycle = self.path_regex(through, through, k - 1);
        let exit = self.path_regex(through, j, k - 1);

        let detour = match (entry, exit) {
            (Some(entry), Some(exit)) => {
                let cycle = cycle.map(|c| format!("({c})*.")).unwrap_or_default();
                Some(format!("({entry}).{cycle}({exit})"))
            }
            _ => None,
        };

        match (direct_part, detour) {
            (None, None) => None,
            (Some(direct), None) => Some(format!("({direct})")),
            (None, Some(detour)) => Some(detour),
            (Some(direct), Some(detour)) => Some(format!("({direct})+{detour}")),
        }
    }

    /// Paths with no intermediate hop at all: the empty word for `i = j`,
    /// plus whatever labels sit on the direct edge.
    fn direct(&self, i: usize, j: usize) -> Option<String> {
        let labels = self.labels.get(&(i, j));
        if i == j {
            let mut expression = String::from("@");
            if let Some(set) = labels {
                for symbol in set {
                    expression.push('+');
                    expression.push_str(&symbol.to_string());
                }
            }
            Some(expression)
        } else {
            let set = labels?;
            let parts: Vec<String> = set.iter().map(|symbol| symbol.to_string()).collect();
            Some(parts.join("+"))
        }
    }
}
