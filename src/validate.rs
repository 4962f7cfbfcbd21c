// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Grammar well-formedness validation (Ford, 2014).
//!
//! Execution on an unvalidated grammar is undefined: the engine trusts that
//! non-terminal indices are in bounds and that no `Quantifier(e, 0)` wraps a
//! nullable `e`. `validate` is the gate that makes those assumptions true.

use crate::error::{ValidateBehavior, ValidationResult, ValidationStatus};
use crate::expr::{ExprId, NonTerminalRef, Op};
use crate::grammar::Grammar;

/// Validate `g` with the default behavior (report, don't print or abort).
pub fn validate<V>(g: &Grammar<V>) -> ValidationResult {
    validate_with(g, ValidateBehavior::DEFAULT)
}

/// Validate `g`, honoring `behavior`'s skip/print/abort bits.
pub fn validate_with<V>(g: &Grammar<V>, behavior: ValidateBehavior) -> ValidationResult {
    if behavior.skip {
        return ValidationResult::success();
    }
    if g.rule_count() == 0 {
        return ValidationResult { status: ValidationStatus::EmptyGrammar, rule: 0 };
    }

    let mut visited = vec![false; g.rule_count()];
    let mut rule = g.start_rule();
    visited[rule] = true;
    let status = validate_expr(g, g.rule_root(rule), &mut rule, &mut visited);
    let result = ValidationResult { status, rule };

    if result.is_success() {
        g.mark_validated();
    } else if behavior.print_error {
        eprintln!(
            "[pegex::validate] error on rule \"{}\": {}",
            g.rule_name(result.rule),
            result.status
        );
        if behavior.abort {
            std::process::exit(1);
        }
    }
    result
}

/// Walk one expression. Every node in a rule's body is visited exactly
/// once per validation pass; the `visited` set only gates re-entry at
/// non-terminal boundaries, which is where cycles (including self- and
/// mutual left-recursion) actually live.
fn validate_expr<V>(
    g: &Grammar<V>,
    id: ExprId,
    rule: &mut usize,
    visited: &mut [bool],
) -> ValidationStatus {
    match &g.arena().get(id).op {
        Op::Range(lo, hi) => {
            if lo > hi {
                ValidationStatus::InvalidRange
            } else {
                ValidationStatus::Success
            }
        }
        Op::NonTerminal(nt) => match resolve_non_terminal(g, nt) {
            Err(status) => status,
            Ok(target) => {
                if visited[target] {
                    return ValidationStatus::Success;
                }
                visited[target] = true;
                let saved_rule = *rule;
                *rule = target;
                let status = validate_expr(g, g.rule_root(target), rule, visited);
                *rule = saved_rule;
                status
            }
        },
        Op::Quantifier(e, n) => {
            let e = *e;
            let n = *n;
            let status = validate_expr(g, e, rule, visited);
            if !status.is_success() {
                status
            } else if n == 0 && is_nullable(g, e, &mut vec![false; g.rule_count()]) {
                ValidationStatus::LoopEmptyString
            } else {
                ValidationStatus::Success
            }
        }
        Op::And(e) | Op::Not(e) => validate_expr(g, *e, rule, visited),
        Op::Sequence(es) | Op::Choice(es) => {
            let es = es.clone();
            let mut status = ValidationStatus::Success;
            for e in es.iter() {
                status = validate_expr(g, *e, rule, visited);
                if !status.is_success() {
                    break;
                }
            }
            status
        }
        Op::Error(_, sync, _skip) => {
            if let Some(sync) = *sync {
                let status = validate_expr(g, sync, rule, visited);
                if !status.is_success() {
                    status
                } else if is_nullable(g, sync, &mut vec![false; g.rule_count()]) {
                    ValidationStatus::LoopEmptyString
                } else {
                    ValidationStatus::Success
                }
            } else {
                ValidationStatus::Success
            }
        }
        Op::Byte(_)
        | Op::Literal(_)
        | Op::CaseInsensitive(_)
        | Op::CharacterClass(_)
        | Op::Set(_)
        | Op::Any
        | Op::CustomMatcher(_) => ValidationStatus::Success,
    }
}

/// Resolve a non-terminal reference against `g`'s rule table, caching the
/// result in place so the engine never repeats the name lookup.
fn resolve_non_terminal<V>(
    g: &Grammar<V>,
    nt: &NonTerminalRef,
) -> Result<usize, ValidationStatus> {
    if let Some(index) = nt.resolved() {
        if index >= g.rule_count() {
            return Err(ValidationStatus::OutOfBounds);
        }
        return Ok(index);
    }
    let name = nt.name().expect("unresolved non-terminal must be name-addressed");
    match g.rule_index_of(name) {
        Some(index) => {
            nt.set_resolved(index);
            Ok(index)
        }
        None => Err(ValidationStatus::UndefinedRule),
    }
}

/// Does this expression accept the empty string? Cycle-guarded by a
/// per-rule visited set: a non-terminal recursing back into a rule already
/// on the current nullability-walk stack is treated as non-nullable through
/// that path (it can't bottom out without consuming).
pub(crate) fn is_nullable<V>(g: &Grammar<V>, id: ExprId, visited: &mut Vec<bool>) -> bool {
    match &g.arena().get(id).op {
        Op::And(_) | Op::Not(_) => true,
        Op::Quantifier(_, n) => *n <= 0,
        Op::NonTerminal(nt) => {
            let Some(target) = nt.resolved() else {
                // Unresolved references are only possible before validation
                // has run to completion on this rule; treat conservatively
                // as non-nullable so callers don't falsely accept a loop.
                return false;
            };
            if visited[target] {
                // A rule that recurses into itself while being asked "are
                // you nullable" is, by definition, not nullable through
                // this path (it can never bottom out without consuming).
                return false;
            }
            visited[target] = true;
            let nullable = is_nullable(g, g.rule_root(target), visited);
            visited[target] = false;
            nullable
        }
        Op::Sequence(es) => es.iter().all(|e| is_nullable(g, *e, visited)),
        Op::Choice(es) => es.iter().any(|e| is_nullable(g, *e, visited)),
        Op::Byte(_)
        | Op::Literal(_)
        | Op::CaseInsensitive(_)
        | Op::CharacterClass(_)
        | Op::Set(_)
        | Op::Range(_, _)
        | Op::Any
        | Op::CustomMatcher(_)
        | Op::Error(_, _, _) => false,
    }
}
