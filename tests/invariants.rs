// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Property tests for the matcher's cross-cutting invariants: determinism,
//! "a non-negative match never exceeds the input", and "lookahead consumes
//! nothing", checked against randomly generated inputs rather than fixed
//! examples.

use proptest::prelude::*;

use pegex::{match_grammar, validate, CharClass, ExprArena, Grammar, MatchOptions, MatchOutcome};

/// `digit+ ("." digit+)?`: nullable enough to exercise backtracking, small
/// enough to reason about by hand.
fn number_grammar() -> Grammar<()> {
    let mut arena: ExprArena<()> = ExprArena::new();
    let digit = arena.character_class(CharClass::Digit);
    let digits = arena.quantifier(digit, 1);
    let dot = arena.byte(b'.');
    let frac = arena.sequence([dot, digits]);
    let frac_opt = arena.quantifier(frac, -1);
    let root = arena.sequence([digits, frac_opt]);
    let grammar = Grammar::from_single_expression(arena, root);
    assert!(validate(&grammar).is_success());
    grammar
}

proptest! {
    #[test]
    fn matching_is_deterministic(s in ".{0,32}") {
        let grammar = number_grammar();
        let bytes = s.as_bytes();
        let mut opts_a = MatchOptions::new();
        let mut opts_b = MatchOptions::new();
        let a = match_grammar(&grammar, Some(bytes), &mut opts_a);
        let b = match_grammar(&grammar, Some(bytes), &mut opts_b);
        prop_assert_eq!(a.outcome, b.outcome);
    }

    #[test]
    fn a_non_negative_match_never_exceeds_the_input(s in ".{0,32}") {
        let grammar = number_grammar();
        let bytes = s.as_bytes();
        let mut opts = MatchOptions::new();
        let result = match_grammar(&grammar, Some(bytes), &mut opts);
        if let MatchOutcome::Matched(n) = result.outcome {
            prop_assert!(n <= bytes.len());
        }
    }

    #[test]
    fn lookahead_never_advances_the_match_position(s in "[0-9]{1,16}") {
        // `&digit+` (And) must behave exactly like a zero-width success: it
        // never changes how much of the input a following match consumes.
        let bytes = s.as_bytes();

        let mut bare_arena: ExprArena<()> = ExprArena::new();
        let digit = bare_arena.character_class(CharClass::Digit);
        let bare_root = bare_arena.quantifier(digit, 1);
        let bare_grammar = Grammar::from_single_expression(bare_arena, bare_root);
        assert!(validate(&bare_grammar).is_success());

        let mut lookahead_arena: ExprArena<()> = ExprArena::new();
        let digit = lookahead_arena.character_class(CharClass::Digit);
        let digits = lookahead_arena.quantifier(digit, 1);
        let lookahead = lookahead_arena.and(digits);
        let digit2 = lookahead_arena.character_class(CharClass::Digit);
        let digits2 = lookahead_arena.quantifier(digit2, 1);
        let with_lookahead = lookahead_arena.sequence([lookahead, digits2]);
        let lookahead_grammar = Grammar::from_single_expression(lookahead_arena, with_lookahead);
        assert!(validate(&lookahead_grammar).is_success());

        let mut opts_a = MatchOptions::new();
        let mut opts_b = MatchOptions::new();
        let bare = match_grammar(&bare_grammar, Some(bytes), &mut opts_a);
        let with_lookahead_result = match_grammar(&lookahead_grammar, Some(bytes), &mut opts_b);
        prop_assert_eq!(bare.outcome, with_lookahead_result.outcome);
    }
}

#[test]
fn ordered_choice_prefers_the_first_successful_alternative() {
    // "ab" / "a" against "ab" must take the first branch and consume both
    // bytes, never fall through to the shorter second alternative.
    let mut arena: ExprArena<()> = ExprArena::new();
    let ab = arena.literal(*b"ab");
    let a = arena.literal(*b"a");
    let choice = arena.choice([ab, a]);
    let grammar = Grammar::from_single_expression(arena, choice);
    assert!(validate(&grammar).is_success());

    let mut opts = MatchOptions::new();
    let result = match_grammar(&grammar, Some(&b"ab"[..]), &mut opts);
    assert_eq!(result.outcome, MatchOutcome::Matched(2));
}
