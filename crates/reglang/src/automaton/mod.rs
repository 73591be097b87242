//! Finite automata and their algebra.
//!
//! This module provides:
//! - the nondeterministic [`Automaton`] graph with set-valued edge labels
//!   and the operations of regular-language algebra (union, concatenation,
//!   intersection, complement, iteration),
//! - the deterministic [`Dfa`] form with word recognition,
//! - the subset construction connecting the two.

mod dfa;
mod nfa;
mod state;
mod subset_construction;
mod symbol;

pub use dfa::Dfa;
pub use nfa::{Automaton, Edge};
pub use state::{StateId, StateSet};
pub use subset_construction::subset_construction;
pub use symbol::{Symbol, SymbolSet};
