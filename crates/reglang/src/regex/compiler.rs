//! Compile a pattern into an [`Automaton`] by postfix evaluation.

use crate::automaton::{Automaton, Symbol};
use crate::error::{Error, Result};
use crate::regex::shunting_yard::to_postfix;
use crate::regex::tokenizer::{Token, TokenKind, Tokenizer};
use log::debug;

/// Compile an infix pattern into a nondeterministic automaton.
///
/// The pattern is lexed, reordered into postfix, then evaluated over a stack
/// of automata: a letter pushes its atomic two-state automaton (`@` pushes
/// epsilon, `?` the wildcard), `*` replaces the top of the stack with its
/// iteration, and each binary operator combines the two topmost automata
/// with the earlier-pushed one as the left operand. A pattern that leaves
/// the stack without exactly one automaton is malformed.
pub fn compile(pattern: &str) -> Result<Automaton> {
    let postfix = to_postfix(Tokenizer::new(pattern))?;
    let automaton = evaluate(&postfix)?;
    debug!(
        "compiled {pattern:?} into an automaton with {} states",
        automaton.states().len()
    );
    Ok(automaton)
}

fn evaluate(postfix: &[Token]) -> Result<Automaton> {
    if postfix.is_empty() {
        return Err(Error::EmptyPattern);
    }

    let mut stack: Vec<Automaton> = Vec::new();
    for token in postfix {
        match token.kind {
            TokenKind::Letter => {
                stack.push(Automaton::basic([Symbol::from_letter(token.symbol)]));
            }
            TokenKind::Operator if token.symbol == '*' => {
                let operand = stack.pop().ok_or(Error::MalformedExpression)?;
                stack.push(operand.iteration());
            }
            TokenKind::Operator => {
                let top = stack.pop().ok_or(Error::MalformedExpression)?;
                let second = stack.pop().ok_or(Error::MalformedExpression)?;
                let combined = match token.symbol {
                    '.' => second.concatenation(&top),
                    '+' => second.union(&top),
                    _ => second.intersection(&top),
                };
                stack.push(combined);
            }
            // Brackets never survive the postfix conversion.
            TokenKind::OpenBracket | TokenKind::CloseBracket => {
                return Err(Error::MalformedExpression);
            }
        }
    }

    let automaton = stack.pop().ok_or(Error::MalformedExpression)?;
    if !stack.is_empty() {
        return Err(Error::MalformedExpression);
    }
    Ok(automaton)
}
