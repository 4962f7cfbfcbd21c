// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An embeddable matching engine for Parsing Expression Grammars.
//!
//! Build an [`ExprArena`] of [`Op`] nodes, group some of them into named
//! rules with [`Grammar::new`], [`validate`] the result once, and match it
//! against a byte slice with [`match_grammar`]. A [`Grammar`] is cheap to
//! reuse across many inputs (validation is memoized on the grammar itself)
//! but is not [`Sync`] — give each thread its own instance, built from the
//! same [`ExprArena`]-construction code, rather than sharing one.
//!
//! ```
//! use pegex::{ExprArena, Grammar, MatchOptions, validate, match_grammar, MatchOutcome};
//!
//! let mut arena = ExprArena::<()>::new();
//! let digits = arena.character_class(pegex::CharClass::Digit);
//! let number = arena.quantifier(digits, 1); // digit+
//! let grammar = Grammar::from_single_expression(arena, number);
//! assert!(validate(&grammar).is_success());
//!
//! let mut opts = MatchOptions::new();
//! let result = match_grammar(&grammar, Some(&b"42 apples"[..]), &mut opts);
//! assert_eq!(result.outcome, MatchOutcome::Matched(2));
//! ```

pub mod classes;
pub mod engine;
pub mod error;
pub mod expr;
pub mod fold;
pub mod grammar;
pub mod options;
pub mod state;
pub mod validate;

pub use classes::CharClass;
pub use error::{ValidateBehavior, ValidationResult, ValidationStatus};
pub use expr::{Action, CustomMatcherFn, Expr, ExprArena, ExprId, NonTerminalRef, Op};
pub use grammar::Grammar;
pub use options::{
    ActionStackView, MatchData, MatchOptions, MatchOutcome, MatchResult, StateStackView,
};
pub use validate::validate;

/// Match `grammar`'s start rule against `input`.
///
/// `input` is `None` to represent the "no buffer at all" case (the `NULL`
/// subject string the original C API allows); everything else is a normal
/// byte slice, including an empty one.
///
/// # Panics
///
/// In debug builds, panics if `grammar` hasn't been [`validate`]d yet;
/// matching against an invalid grammar is undefined (dangling non-terminal
/// references, infinite loops through nullable quantifier bodies).
pub fn match_grammar<V: Clone>(
    grammar: &Grammar<V>,
    input: Option<&[u8]>,
    opts: &mut MatchOptions<V>,
) -> MatchResult<V> {
    match input {
        Some(bytes) => engine::run(grammar, bytes, opts),
        None => MatchResult { outcome: MatchOutcome::NullInput, data: MatchData::None },
    }
}

/// Match a single, rule-less expression against `input`, the way
/// [`match_grammar`] does for a one-rule grammar.
pub fn match_expression<V: Clone>(
    arena: expr::ExprArena<V>,
    root: ExprId,
    input: &[u8],
    opts: &mut MatchOptions<V>,
) -> MatchResult<V> {
    let grammar = Grammar::from_single_expression(arena, root);
    let outcome = validate(&grammar);
    if !outcome.is_success() {
        return MatchResult { outcome: MatchOutcome::NoMatch, data: MatchData::None };
    }
    engine::run(&grammar, input, opts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readme_example_matches_digits() {
        let mut arena = ExprArena::<()>::new();
        let digits = arena.character_class(CharClass::Digit);
        let number = arena.quantifier(digits, 1);
        let grammar = Grammar::from_single_expression(arena, number);
        assert!(validate(&grammar).is_success());
        let mut opts = MatchOptions::new();
        let result = match_grammar(&grammar, Some(&b"42 apples"[..]), &mut opts);
        assert_eq!(result.outcome, MatchOutcome::Matched(2));
    }

    #[test]
    fn null_input_is_its_own_outcome() {
        let mut arena: ExprArena<()> = ExprArena::new();
        let any = arena.any();
        let grammar = Grammar::from_single_expression(arena, any);
        validate(&grammar);
        let mut opts = MatchOptions::new();
        let result = match_grammar(&grammar, None, &mut opts);
        assert_eq!(result.outcome, MatchOutcome::NullInput);
    }
}
