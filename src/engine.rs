// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The matching interpreter: an explicit state-frame stack walked by a
//! `loop`, never the host call stack. Each [`Op`] variant either resolves
//! immediately (terminals) or pushes a child frame and `continue`s; matches
//! and failures propagate back down the frame stack via [`succeed`] and
//! [`fail`], which is also where backtracking — rewinding to the nearest
//! `Quantifier`, `Choice` or `Not` frame — happens.

use crate::expr::Op;
use crate::fold::fold_actions;
use crate::grammar::Grammar;
use crate::options::{ActionStackView, MatchData, MatchOptions, MatchOutcome, MatchResult, StateStackView};
use crate::state::{try_push, try_with_capacity, Frame, QueuedAction};

enum Step {
    Matched(usize),
    NoMatch,
    MatchedError,
}

enum QuantifierDecision {
    Iterate,
    Matched(usize),
    NoMatch,
}

/// The quantifier rule: `n >= 0` is "at least n" (greedy; `r1` counts
/// successful iterations so far). `n < 0` is "at most `-n`". A negative `r1`
/// always means "the last attempt failed"; its magnitude is one more than
/// the number of iterations that had already succeeded.
fn quantifier_decision(r1: i64, r2: usize, n: i32) -> QuantifierDecision {
    if n >= 0 {
        if r1 >= 0 {
            QuantifierDecision::Iterate
        } else if -r1 > n as i64 {
            QuantifierDecision::Matched(r2)
        } else {
            QuantifierDecision::NoMatch
        }
    } else if r1 >= 0 {
        if r1 < -(n as i64) {
            QuantifierDecision::Iterate
        } else {
            QuantifierDecision::Matched(r2)
        }
    } else if r1 >= n as i64 - 1 {
        QuantifierDecision::Matched(r2)
    } else {
        QuantifierDecision::NoMatch
    }
}

enum Propagation {
    Continue,
    Done(MatchOutcome),
    NoStackMem,
}

fn no_stack_mem<V>() -> MatchResult<V> {
    MatchResult { outcome: MatchOutcome::NoStackMem, data: MatchData::None }
}

pub(crate) fn run<V: Clone>(
    g: &Grammar<V>,
    input: &[u8],
    opts: &mut MatchOptions<V>,
) -> MatchResult<V> {
    debug_assert!(g.is_validated(), "matching against an unvalidated grammar is undefined");

    let mut states: Vec<Frame> = match try_with_capacity(opts.state_capacity()) {
        Ok(v) => v,
        Err(()) => return no_stack_mem(),
    };
    let mut actions: Vec<QueuedAction<V>> = match try_with_capacity(opts.action_capacity()) {
        Ok(v) => v,
        Err(()) => return no_stack_mem(),
    };

    if try_push(&mut states, Frame::new(g.rule_root(g.start_rule()), 0, 0)).is_err() {
        return no_stack_mem();
    }

    let mut matched_error = false;
    let mut first_error_code: Option<i32> = None;

    let outcome = loop {
        if let Some(cb) = opts.on_iteration.as_mut() {
            cb(&StateStackView { frames: &states }, &ActionStackView { actions: &actions }, input);
        }

        let top = states.len() - 1;
        let pos = states[top].pos;
        let expr = states[top].expr;
        let ptr = &input[pos.min(input.len())..];

        let step = match &g.arena().get(expr).op {
            Op::Byte(b) => {
                if ptr.first() == Some(b) {
                    Step::Matched(1)
                } else {
                    Step::NoMatch
                }
            }
            Op::Literal(s) => {
                if ptr.starts_with(&s[..]) {
                    Step::Matched(s.len())
                } else {
                    Step::NoMatch
                }
            }
            Op::CaseInsensitive(s) => {
                if ptr.len() >= s.len() && ptr[..s.len()].eq_ignore_ascii_case(s) {
                    Step::Matched(s.len())
                } else {
                    Step::NoMatch
                }
            }
            Op::CharacterClass(class) => match ptr.first() {
                Some(&b) if class.matches(b) => Step::Matched(1),
                _ => Step::NoMatch,
            },
            Op::Set(s) => match ptr.first() {
                Some(b) if s.contains(b) => Step::Matched(1),
                _ => Step::NoMatch,
            },
            Op::Range(lo, hi) => match ptr.first() {
                Some(&b) if b >= *lo && b <= *hi => Step::Matched(1),
                _ => Step::NoMatch,
            },
            Op::Any => {
                if pos < input.len() {
                    Step::Matched(1)
                } else {
                    Step::NoMatch
                }
            }
            Op::CustomMatcher(f) => {
                let n = f(ptr);
                if n > 0 {
                    Step::Matched(n as usize)
                } else {
                    Step::NoMatch
                }
            }
            Op::NonTerminal(nt) => {
                let target = nt.resolved().expect("non-terminal resolved by validate");
                let frame = Frame::new(g.rule_root(target), pos, actions.len());
                if try_push(&mut states, frame).is_err() {
                    return no_stack_mem();
                }
                continue;
            }
            Op::Quantifier(child, n) => {
                let (child, n) = (*child, *n);
                let r1 = states[top].r1;
                let r2 = states[top].r2;
                match quantifier_decision(r1, r2, n) {
                    QuantifierDecision::Iterate => {
                        states[top].r1 += 1;
                        let frame = Frame::new(child, pos + r2, actions.len());
                        if try_push(&mut states, frame).is_err() {
                            return no_stack_mem();
                        }
                        continue;
                    }
                    QuantifierDecision::Matched(n) => Step::Matched(n),
                    QuantifierDecision::NoMatch => Step::NoMatch,
                }
            }
            Op::Not(child) => {
                let r1 = states[top].r1;
                if r1 > 0 {
                    Step::Matched(0)
                } else if r1 < 0 {
                    Step::NoMatch
                } else {
                    let frame = Frame::new(*child, pos, actions.len());
                    if try_push(&mut states, frame).is_err() {
                        return no_stack_mem();
                    }
                    continue;
                }
            }
            Op::And(child) => {
                let frame = Frame::new(*child, pos, actions.len());
                if try_push(&mut states, frame).is_err() {
                    return no_stack_mem();
                }
                continue;
            }
            Op::Sequence(es) => {
                let r1 = states[top].r1 as usize;
                if r1 < es.len() {
                    let next = es[r1];
                    let r2 = states[top].r2;
                    states[top].r1 += 1;
                    let frame = Frame::new(next, pos + r2, actions.len());
                    if try_push(&mut states, frame).is_err() {
                        return no_stack_mem();
                    }
                    continue;
                }
                Step::Matched(states[top].r2)
            }
            Op::Choice(es) => {
                let r1 = states[top].r1 as usize;
                if r1 < es.len() {
                    let next = es[r1];
                    states[top].r1 += 1;
                    let frame = Frame::new(next, pos, actions.len());
                    if try_push(&mut states, frame).is_err() {
                        return no_stack_mem();
                    }
                    continue;
                }
                Step::NoMatch
            }
            Op::Error(code, _sync, skip) => {
                matched_error = true;
                first_error_code.get_or_insert(*code);
                if let Some(cb) = opts.on_error.as_mut() {
                    cb(input, pos, *code);
                }
                match *skip {
                    Some(skip) => {
                        let frame = Frame::new(skip, pos, actions.len());
                        if try_push(&mut states, frame).is_err() {
                            return no_stack_mem();
                        }
                        continue;
                    }
                    None => Step::MatchedError,
                }
            }
        };

        let propagation = match step {
            Step::NoMatch => fail(g, &mut states, &mut actions, input, opts),
            Step::MatchedError => Propagation::Done(MatchOutcome::MatchedError),
            Step::Matched(n) => succeed(g, &mut states, &mut actions, input, pos + n, opts),
        };

        match propagation {
            Propagation::Continue => continue,
            Propagation::Done(outcome) => break outcome,
            Propagation::NoStackMem => return no_stack_mem(),
        }
    };

    let outcome = if matched_error { MatchOutcome::MatchedError } else { outcome };
    let data = match outcome {
        MatchOutcome::Matched(_) if !actions.is_empty() => fold_actions(input, actions),
        MatchOutcome::MatchedError => {
            MatchData::Error(first_error_code.expect("matched_error set only alongside a code"))
        }
        _ => MatchData::None,
    };

    let result = MatchResult { outcome, data };
    if let Some(cb) = opts.on_end.as_mut() {
        cb(&StateStackView { frames: &states }, &ActionStackView { actions: &[] }, input, &result);
    }
    result
}

/// Propagate a success of the top frame (which matched up to `new_pos`)
/// down through enclosing frames: `Quantifier`/`Sequence` record the new
/// extent and stop here (the backtrack point for a future failure);
/// `And` rewinds the position and discards queued actions without failing;
/// `Not` turns the success into a failure; everything else just queues its
/// action (if any) and keeps unwinding. An empty stack means the whole
/// match succeeded.
fn succeed<V: Clone>(
    g: &Grammar<V>,
    states: &mut Vec<Frame>,
    actions: &mut Vec<QueuedAction<V>>,
    input: &[u8],
    new_pos: usize,
    opts: &mut MatchOptions<V>,
) -> Propagation {
    let top = states.len() - 1;
    let frame = states[top];
    if let Some(cb) = opts.on_success_each.as_mut() {
        cb(&StateStackView { frames: states }, &ActionStackView { actions }, input, frame.pos, new_pos);
    }
    if !queue_action(g, actions, frame, new_pos) {
        return Propagation::NoStackMem;
    }

    let mut new_pos = new_pos;
    let mut i = states.len() as isize - 2;
    while i >= 0 {
        let idx = i as usize;
        let frame = states[idx];
        match &g.arena().get(frame.expr).op {
            Op::Quantifier(_, _) | Op::Sequence(_) => {
                states[idx].r2 = new_pos - frame.pos;
                states.truncate(idx + 1);
                return Propagation::Continue;
            }
            Op::And(_) => {
                new_pos = frame.pos;
                actions.truncate(frame.action_count_snapshot);
            }
            Op::Not(_) => {
                states[idx].r1 = -1;
                actions.truncate(frame.action_count_snapshot);
                states.truncate(idx + 1);
                return Propagation::Continue;
            }
            _ => {
                if !queue_action(g, actions, frame, new_pos) {
                    return Propagation::NoStackMem;
                }
            }
        }
        i -= 1;
    }
    Propagation::Done(MatchOutcome::Matched(new_pos))
}

fn queue_action<V: Clone>(
    g: &Grammar<V>,
    actions: &mut Vec<QueuedAction<V>>,
    frame: Frame,
    end: usize,
) -> bool {
    match g.arena().get(frame.expr).action.clone() {
        Some(action) => {
            let argc = actions.len() - frame.action_count_snapshot;
            let queued = QueuedAction { action, start: frame.pos, end, argc };
            try_push(actions, queued).is_ok()
        }
        None => true,
    }
}

/// Propagate a failure of the top frame down through enclosing frames: a
/// `Quantifier` or `Choice` is a backtrack point — rewind state and action
/// stacks to it and re-dispatch it; `Not` turns the failure into a success.
/// Everything else just keeps unwinding. An empty stack means the whole
/// match failed.
fn fail<V>(
    g: &Grammar<V>,
    states: &mut Vec<Frame>,
    actions: &mut Vec<QueuedAction<V>>,
    input: &[u8],
    opts: &mut MatchOptions<V>,
) -> Propagation {
    if let Some(cb) = opts.on_fail_each.as_mut() {
        cb(&StateStackView { frames: states }, &ActionStackView { actions }, input);
    }

    let mut i = states.len() as isize - 2;
    while i >= 0 {
        let idx = i as usize;
        match &g.arena().get(states[idx].expr).op {
            Op::Quantifier(_, _) => {
                states[idx].r1 = -states[idx].r1;
                let snapshot = states[idx].action_count_snapshot;
                states.truncate(idx + 1);
                actions.truncate(snapshot);
                return Propagation::Continue;
            }
            Op::Choice(_) => {
                let snapshot = states[idx].action_count_snapshot;
                states.truncate(idx + 1);
                actions.truncate(snapshot);
                return Propagation::Continue;
            }
            Op::Not(_) => {
                states[idx].r1 = 1;
                let snapshot = states[idx].action_count_snapshot;
                states.truncate(idx + 1);
                actions.truncate(snapshot);
                return Propagation::Continue;
            }
            _ => {}
        }
        i -= 1;
    }
    Propagation::Done(MatchOutcome::NoMatch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::ExprArena;
    use crate::grammar::Grammar;
    use crate::validate::validate;

    fn validated(arena: ExprArena<()>, root: crate::expr::ExprId) -> Grammar<()> {
        let g = Grammar::from_single_expression(arena, root);
        assert!(validate(&g).is_success());
        g
    }

    #[test]
    fn literal_matches_prefix() {
        let mut a: ExprArena<()> = ExprArena::new();
        let lit = a.literal(*b"hello");
        let g = validated(a, lit);
        let mut opts = MatchOptions::new();
        let result = run(&g, b"hello world", &mut opts);
        assert_eq!(result.outcome, MatchOutcome::Matched(5));
    }

    #[test]
    fn choice_backtracks_to_second_alternative() {
        let mut a: ExprArena<()> = ExprArena::new();
        let x = a.literal(*b"x");
        let y = a.literal(*b"y");
        let choice = a.choice([x, y]);
        let g = validated(a, choice);
        let mut opts = MatchOptions::new();
        let result = run(&g, b"y", &mut opts);
        assert_eq!(result.outcome, MatchOutcome::Matched(1));
    }

    #[test]
    fn star_consumes_greedily() {
        let mut a: ExprArena<()> = ExprArena::new();
        let digit = a.character_class(crate::classes::CharClass::Digit);
        let star = a.quantifier(digit, 0);
        let g = validated(a, star);
        let mut opts = MatchOptions::new();
        let result = run(&g, b"123abc", &mut opts);
        assert_eq!(result.outcome, MatchOutcome::Matched(3));
    }

    #[test]
    fn plus_requires_one_match() {
        let mut a: ExprArena<()> = ExprArena::new();
        let digit = a.character_class(crate::classes::CharClass::Digit);
        let plus = a.quantifier(digit, 1);
        let g = validated(a, plus);
        let mut opts = MatchOptions::new();
        let result = run(&g, b"abc", &mut opts);
        assert_eq!(result.outcome, MatchOutcome::NoMatch);
    }

    #[test]
    fn optional_matches_zero_or_one() {
        let mut a: ExprArena<()> = ExprArena::new();
        let x = a.literal(*b"x");
        let opt = a.quantifier(x, -1);
        let g = validated(a, opt);
        let mut opts = MatchOptions::new();
        let result = run(&g, b"", &mut opts);
        assert_eq!(result.outcome, MatchOutcome::Matched(0));
    }

    #[test]
    fn and_does_not_consume() {
        let mut a: ExprArena<()> = ExprArena::new();
        let x = a.literal(*b"x");
        let and = a.and(x);
        let seq = a.sequence([and, x]);
        let g = validated(a, seq);
        let mut opts = MatchOptions::new();
        let result = run(&g, b"x", &mut opts);
        assert_eq!(result.outcome, MatchOutcome::Matched(1));
    }

    #[test]
    fn not_fails_when_child_matches() {
        let mut a: ExprArena<()> = ExprArena::new();
        let x = a.literal(*b"x");
        let not = a.not(x);
        let g = validated(a, not);
        let mut opts = MatchOptions::new();
        let result = run(&g, b"x", &mut opts);
        assert_eq!(result.outcome, MatchOutcome::NoMatch);
    }

    #[test]
    fn custom_matcher_byte_count_contract() {
        let mut a: ExprArena<()> = ExprArena::new();
        let matcher = a.custom_matcher(|rest| {
            if rest.starts_with(b"ok") { 2 } else { -1 }
        });
        let g = validated(a, matcher);
        let mut opts = MatchOptions::new();
        assert_eq!(run(&g, b"ok!", &mut opts).outcome, MatchOutcome::Matched(2));
        assert_eq!(run(&g, b"no", &mut opts).outcome, MatchOutcome::NoMatch);
    }

    #[test]
    fn error_without_sync_poisons_result() {
        let mut a: ExprArena<()> = ExprArena::new();
        let err = a.error(7, None);
        let g = validated(a, err);
        let mut opts = MatchOptions::new();
        let result = run(&g, b"anything", &mut opts);
        assert_eq!(result.outcome, MatchOutcome::MatchedError);
    }

    #[test]
    fn error_with_sync_skips_to_resync_point() {
        // garbage* ";" reported as error 1, syncing on ";"
        let mut a: ExprArena<()> = ExprArena::new();
        let semi = a.byte(b';');
        let err = a.error(1, Some(semi));
        let seq = a.sequence([err, semi]);
        let g = validated(a, seq);
        let mut opts = MatchOptions::new();
        let result = run(&g, b"junk;", &mut opts);
        assert_eq!(result.outcome, MatchOutcome::MatchedError);
    }
}
