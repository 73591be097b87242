//! A finite-automaton toolkit.
//!
//! `reglang` compiles a small infix regex language into nondeterministic
//! finite automata, provides the algebra of regular languages over them
//! (union, concatenation, intersection, complement, iteration),
//! determinizes automata through the subset construction, tests word
//! membership, and synthesizes a regular expression back from a
//! deterministic automaton using Kleene's state-elimination recurrence.
//!
//! The two ends of the pipeline:
//!
//! ```
//! use reglang::regex;
//!
//! let automaton = regex::compile("(a+b)*.c").unwrap();
//! assert!(automaton.accepts("abc"));
//!
//! // Determinize once when matching many words against one pattern.
//! let dfa = automaton.determinize();
//! assert!(dfa.accepts("bac"));
//! assert!(!dfa.accepts("cc"));
//!
//! // An equivalent (not identical) expression for the same language.
//! let expression = regex::synthesize(&dfa).unwrap();
//! assert!(regex::compile(&expression).unwrap().accepts("abc"));
//! ```

pub mod automaton;
mod error;
pub mod regex;

pub use automaton::{Automaton, Dfa, StateId, StateSet, Symbol, SymbolSet};
pub use error::{Error, Result};
