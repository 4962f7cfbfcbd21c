// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! An ordered collection of named rules sharing one expression arena.

use std::cell::Cell;
use std::rc::Rc;

use crate::expr::{ExprArena, ExprId};

/// A grammar: an ordered list of `(name, root expression)` rules. Rule 0 is
/// the start rule. Names are expected to be unique (the validator does not
/// police this — see `ValidationStatus`'s scope).
pub struct Grammar<V> {
    arena: ExprArena<V>,
    names: Vec<Rc<str>>,
    roots: Vec<ExprId>,
    validated: Cell<bool>,
}

impl<V> Grammar<V> {
    /// Build a grammar from an arena and an ordered rule list. Rule 0 (the
    /// first entry of `rules`) is fixed as the start rule.
    ///
    /// # Panics
    ///
    /// Panics if `rules` is empty; an empty grammar is a validation error
    /// (`ValidationStatus::EmptyGrammar`), not a construction error, but a
    /// grammar with zero rules has no start rule to even name, so it is
    /// rejected here instead of deferred to `validate`.
    pub fn new(arena: ExprArena<V>, rules: Vec<(impl Into<String>, ExprId)>) -> Self {
        assert!(!rules.is_empty(), "a grammar must have at least one rule");
        let mut names = Vec::with_capacity(rules.len());
        let mut roots = Vec::with_capacity(rules.len());
        for (name, root) in rules {
            names.push(Rc::from(name.into()));
            roots.push(root);
        }
        Grammar { arena, names, roots, validated: Cell::new(false) }
    }

    /// Wrap a single expression as a one-rule anonymous grammar, the way
    /// `match_expression` is built atop `match_grammar`.
    pub fn from_single_expression(arena: ExprArena<V>, root: ExprId) -> Self {
        Grammar::new(arena, vec![(String::new(), root)])
    }

    pub fn arena(&self) -> &ExprArena<V> {
        &self.arena
    }

    pub fn rule_count(&self) -> usize {
        self.roots.len()
    }

    pub fn start_rule(&self) -> usize {
        0
    }

    pub fn rule_name(&self, rule: usize) -> &str {
        &self.names[rule]
    }

    pub fn rule_root(&self, rule: usize) -> ExprId {
        self.roots[rule]
    }

    pub fn rule_index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| &**n == name)
    }

    pub(crate) fn mark_validated(&self) {
        self.validated.set(true);
    }

    pub fn is_validated(&self) -> bool {
        self.validated.get()
    }
}

impl<V: Clone> Grammar<V> {
    /// Match this grammar's start rule against `input`, the way
    /// `pt_match_grammar` wraps `pt_match` in the original library.
    pub fn matches(
        &self,
        input: Option<&[u8]>,
        opts: &mut crate::options::MatchOptions<V>,
    ) -> crate::options::MatchResult<V> {
        crate::match_grammar(self, input, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_rule_is_first() {
        let mut arena: ExprArena<()> = ExprArena::new();
        let a = arena.literal(*b"a");
        let b = arena.literal(*b"b");
        let g = Grammar::new(arena, vec![("Start", a), ("Other", b)]);
        assert_eq!(g.start_rule(), 0);
        assert_eq!(g.rule_name(0), "Start");
        assert_eq!(g.rule_index_of("Other"), Some(1));
        assert_eq!(g.rule_index_of("Missing"), None);
    }

    #[test]
    #[should_panic]
    fn empty_grammar_panics_at_construction() {
        let arena: ExprArena<()> = ExprArena::new();
        let _ = Grammar::new(arena, Vec::<(String, ExprId)>::new());
    }
}
