// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parsing Expressions: the algebraic description of every PEG combinator.
//!
//! An [`Expr`] is a node in a grammar's expression arena; child references
//! are arena indices ([`ExprId`]), not pointers. A single arena is shared by
//! every rule in a [`crate::grammar::Grammar`], which is how cyclic
//! rule-to-rule recursion is represented without cyclic ownership: each
//! tree is acyclic, and recursion lives in the rule table.

use std::cell::Cell;
use std::rc::Rc;

use crate::classes::CharClass;

/// Index of an [`Expr`] inside a grammar's arena.
pub type ExprId = usize;

/// An expression action: invoked during the post-match fold, never during
/// the match itself. Receives the full input, the byte range the owning
/// expression matched, and the already-folded values of its queued
/// children (in order). Returns the value to thread up to the parent.
pub type Action<V> = Rc<dyn Fn(&[u8], usize, usize, &[V]) -> V>;

/// A custom matcher: receives the remaining input starting at the current
/// position and returns the number of bytes consumed, or a non-positive
/// value to signal no match.
pub type CustomMatcherFn = Rc<dyn Fn(&[u8]) -> i64>;

/// A non-terminal reference, before or after validation resolves it to a
/// rule index. `Cell` lets validation cache the resolved index in place
/// without requiring `&mut` access to the whole arena.
#[derive(Clone, Debug)]
pub enum NonTerminalRef {
    /// A string-named reference; resolves to `Some(index)` once validated.
    Name(Rc<str>, Cell<Option<usize>>),
    /// An already-numeric reference, as `pt_create_non_terminal_idx` allows.
    Index(Cell<usize>),
}

impl NonTerminalRef {
    /// The resolved rule index, if validation has already cached it (or if
    /// this was constructed with an explicit index to begin with).
    pub fn resolved(&self) -> Option<usize> {
        match self {
            NonTerminalRef::Name(_, cache) => cache.get(),
            NonTerminalRef::Index(idx) => Some(idx.get()),
        }
    }

    /// Cache the resolved rule index. Called once, by the validator.
    pub fn set_resolved(&self, index: usize) {
        match self {
            NonTerminalRef::Name(_, cache) => cache.set(Some(index)),
            NonTerminalRef::Index(idx) => idx.set(index),
        }
    }

    /// The rule name, for named references (used in error reporting).
    pub fn name(&self) -> Option<&str> {
        match self {
            NonTerminalRef::Name(name, _) => Some(name),
            NonTerminalRef::Index(_) => None,
        }
    }
}

/// Every parsing-expression operator this arena can hold.
pub enum Op {
    Byte(u8),
    Literal(Rc<[u8]>),
    CaseInsensitive(Rc<[u8]>),
    CharacterClass(CharClass),
    Set(Rc<[u8]>),
    Range(u8, u8),
    Any,
    NonTerminal(NonTerminalRef),
    Quantifier(ExprId, i32),
    And(ExprId),
    Not(ExprId),
    Sequence(Rc<[ExprId]>),
    Choice(Rc<[ExprId]>),
    CustomMatcher(CustomMatcherFn),
    /// A syntactic error: a code, an optional synchronization expression,
    /// and (when a sync expression is present) the precomputed "skip until
    /// sync" expression `(!sync any)*`. Building this eagerly at
    /// construction time, rather than synthesizing a throwaway expression on
    /// every error occurrence, means the engine never allocates mid-match.
    Error(i32, Option<ExprId>, Option<ExprId>),
}

impl Clone for Op {
    fn clone(&self) -> Self {
        match self {
            Op::Byte(b) => Op::Byte(*b),
            Op::Literal(s) => Op::Literal(s.clone()),
            Op::CaseInsensitive(s) => Op::CaseInsensitive(s.clone()),
            Op::CharacterClass(c) => Op::CharacterClass(*c),
            Op::Set(s) => Op::Set(s.clone()),
            Op::Range(lo, hi) => Op::Range(*lo, *hi),
            Op::Any => Op::Any,
            Op::NonTerminal(r) => Op::NonTerminal(r.clone()),
            Op::Quantifier(e, n) => Op::Quantifier(*e, *n),
            Op::And(e) => Op::And(*e),
            Op::Not(e) => Op::Not(*e),
            Op::Sequence(es) => Op::Sequence(es.clone()),
            Op::Choice(es) => Op::Choice(es.clone()),
            Op::CustomMatcher(f) => Op::CustomMatcher(f.clone()),
            Op::Error(c, s, skip) => Op::Error(*c, *s, *skip),
        }
    }
}

/// One node in the expression arena: an operator plus the optional action
/// fired when this node's match survives to the committed path.
pub struct Expr<V> {
    pub op: Op,
    pub action: Option<Action<V>>,
}

impl<V> Clone for Expr<V> {
    fn clone(&self) -> Self {
        Expr { op: self.op.clone(), action: self.action.clone() }
    }
}

impl<V> Expr<V> {
    fn new(op: Op) -> Self {
        Expr { op, action: None }
    }
}

/// An arena of expression nodes, shared by every rule of a grammar (or, for
/// [`crate::options::match_expression`], by a single anonymous rule).
///
/// Arena allocation is the ownership model this crate uses in place of the
/// original library's per-node ownership flags: every node is owned by the
/// arena, children are indices, and teardown is just `Vec`'s own `Drop` —
/// double-free is structurally impossible.
pub struct ExprArena<V> {
    nodes: Vec<Expr<V>>,
}

impl<V> Default for ExprArena<V> {
    fn default() -> Self {
        ExprArena { nodes: Vec::new() }
    }
}

impl<V> ExprArena<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: ExprId) -> &Expr<V> {
        &self.nodes[id]
    }

    fn push(&mut self, op: Op) -> ExprId {
        let id = self.nodes.len();
        self.nodes.push(Expr::new(op));
        id
    }

    /// Attach (or replace) the action fired when `id` matches on the
    /// committed path.
    pub fn with_action<F>(&mut self, id: ExprId, action: F) -> ExprId
    where
        F: Fn(&[u8], usize, usize, &[V]) -> V + 'static,
    {
        self.nodes[id].action = Some(Rc::new(action));
        id
    }

    pub fn byte(&mut self, b: u8) -> ExprId {
        self.push(Op::Byte(b))
    }

    pub fn literal(&mut self, s: impl Into<Vec<u8>>) -> ExprId {
        self.push(Op::Literal(s.into().into()))
    }

    pub fn case_insensitive(&mut self, s: impl Into<Vec<u8>>) -> ExprId {
        self.push(Op::CaseInsensitive(s.into().into()))
    }

    pub fn character_class(&mut self, class: CharClass) -> ExprId {
        self.push(Op::CharacterClass(class))
    }

    pub fn set(&mut self, s: impl Into<Vec<u8>>) -> ExprId {
        self.push(Op::Set(s.into().into()))
    }

    pub fn range(&mut self, lo: u8, hi: u8) -> ExprId {
        self.push(Op::Range(lo, hi))
    }

    pub fn any(&mut self) -> ExprId {
        self.push(Op::Any)
    }

    pub fn non_terminal_name(&mut self, name: impl Into<String>) -> ExprId {
        let name: String = name.into();
        self.push(Op::NonTerminal(NonTerminalRef::Name(name.into(), Cell::new(None))))
    }

    pub fn non_terminal_index(&mut self, index: usize) -> ExprId {
        self.push(Op::NonTerminal(NonTerminalRef::Index(Cell::new(index))))
    }

    pub fn quantifier(&mut self, e: ExprId, n: i32) -> ExprId {
        self.push(Op::Quantifier(e, n))
    }

    pub fn and(&mut self, e: ExprId) -> ExprId {
        self.push(Op::And(e))
    }

    pub fn not(&mut self, e: ExprId) -> ExprId {
        self.push(Op::Not(e))
    }

    pub fn sequence(&mut self, es: impl Into<Vec<ExprId>>) -> ExprId {
        self.push(Op::Sequence(es.into().into()))
    }

    pub fn choice(&mut self, es: impl Into<Vec<ExprId>>) -> ExprId {
        self.push(Op::Choice(es.into().into()))
    }

    pub fn custom_matcher<F>(&mut self, f: F) -> ExprId
    where
        F: Fn(&[u8]) -> i64 + 'static,
    {
        self.push(Op::CustomMatcher(Rc::new(f)))
    }

    /// Build a syntactic-error expression. When `sync` is given, this also
    /// builds `(!sync any)*` so the engine has a ready-made "skip until
    /// resynchronization point" expression to fall into after reporting.
    pub fn error(&mut self, code: i32, sync: Option<ExprId>) -> ExprId {
        let skip = sync.map(|s| {
            let not_sync = self.not(s);
            let any = self.any();
            let seq = self.sequence([not_sync, any]);
            self.quantifier(seq, 0)
        });
        self.push(Op::Error(code, sync, skip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arena_grows_and_indexes() {
        let mut a: ExprArena<()> = ExprArena::new();
        let lit = a.literal(*b"hi");
        let any = a.any();
        let seq = a.sequence([lit, any]);
        assert_eq!(a.len(), 3);
        match &a.get(seq).op {
            Op::Sequence(es) => assert_eq!(&**es, &[lit, any][..]),
            _ => panic!("expected sequence"),
        }
    }

    #[test]
    fn action_attaches_in_place() {
        let mut a: ExprArena<i64> = ExprArena::new();
        let b = a.byte(b'x');
        a.with_action(b, |_input, start, end, _args| (end - start) as i64);
        assert!(a.get(b).action.is_some());
    }
}
