// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The callback surface and result types callers see.
//!
//! User data does not appear as an explicit parameter the way it does in
//! the original C API (`void *userdata` threaded through every callback):
//! in Rust, closures capture their environment directly, so `userdata`
//! becomes whatever a closure closes over (see the Design Notes this crate
//! implements, on "Dynamic dispatch over callbacks").

use crate::state::{Frame, QueuedAction};

/// Default initial state-stack capacity when `MatchOptions` doesn't
/// override it. The action stack defaults to eight times this.
pub const DEFAULT_STATE_STACK_CAPACITY: usize = 8;

/// A read-only view of the state stack, handed to observability callbacks.
/// Callbacks may inspect it but the engine never lets them mutate it.
pub struct StateStackView<'a> {
    pub(crate) frames: &'a [Frame],
}

impl<'a> StateStackView<'a> {
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The input position of the frame at `depth`, if any.
    pub fn position_at(&self, depth: usize) -> Option<usize> {
        self.frames.get(depth).map(|f| f.pos)
    }

    /// The input position of the currently active (topmost) frame.
    pub fn top_position(&self) -> Option<usize> {
        self.frames.last().map(|f| f.pos)
    }
}

/// A read-only view of the action stack, handed to observability callbacks.
pub struct ActionStackView<'a, V> {
    pub(crate) actions: &'a [QueuedAction<V>],
}

impl<'a, V> ActionStackView<'a, V> {
    pub fn depth(&self) -> usize {
        self.actions.len()
    }

    /// The `(start, end)` byte range queued at `index`.
    pub fn range_at(&self, index: usize) -> Option<(usize, usize)> {
        self.actions.get(index).map(|a| (a.start, a.end))
    }
}

/// The engine's outcome taxonomy, returned as the non-negative-or-negative-
/// kind `matched` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    /// Matched this many bytes of input.
    Matched(usize),
    /// The grammar didn't match.
    NoMatch,
    /// Allocating state/action stack space failed.
    NoStackMem,
    /// One or more `Error` expressions fired during the attempt.
    MatchedError,
    /// The caller passed no input buffer.
    NullInput,
}

impl MatchOutcome {
    pub fn matched_len(self) -> Option<usize> {
        match self {
            MatchOutcome::Matched(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_match(self) -> bool {
        matches!(self, MatchOutcome::Matched(_))
    }
}

/// The data half of a match result: the fold of queued actions, the first
/// syntactic error code if the match ended in `MatchedError`, or nothing if
/// no actions ever queued.
pub enum MatchData<V> {
    None,
    Value(V),
    Error(i32),
}

impl<V> MatchData<V> {
    pub fn value(self) -> Option<V> {
        match self {
            MatchData::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn error_code(&self) -> Option<i32> {
        match self {
            MatchData::Error(c) => Some(*c),
            _ => None,
        }
    }
}

/// `{matched, data}`: what a match call returns.
pub struct MatchResult<V> {
    pub outcome: MatchOutcome,
    pub data: MatchData<V>,
}

/// Callbacks and memory tuning for a single match call.
///
/// Every callback is optional; none may be called in a way that mutates
/// engine state (they receive read-only views). `on_iteration` is the
/// natural place to hang cooperative cancellation (set a flag and raise a
/// syntactic `Error` expression, or simply stop calling into the engine by
/// unwinding from the closure is not supported — callbacks cannot abort a
/// match directly, matching the "no suspension points" concurrency model).
#[derive(Default)]
pub struct MatchOptions<'a, V> {
    pub on_iteration: Option<Box<dyn FnMut(&StateStackView, &ActionStackView<V>, &[u8]) + 'a>>,
    pub on_success_each:
        Option<Box<dyn FnMut(&StateStackView, &ActionStackView<V>, &[u8], usize, usize) + 'a>>,
    pub on_fail_each: Option<Box<dyn FnMut(&StateStackView, &ActionStackView<V>, &[u8]) + 'a>>,
    pub on_error: Option<Box<dyn FnMut(&[u8], usize, i32) + 'a>>,
    pub on_end:
        Option<Box<dyn FnMut(&StateStackView, &ActionStackView<V>, &[u8], &MatchResult<V>) + 'a>>,
    /// Initial state-stack capacity; `0` means "use the default" (8
    /// frames). The action stack's initial capacity is always eight times
    /// this value, following the 8-frames/64-actions default.
    pub initial_stack_capacity: usize,
}

impl<'a, V> MatchOptions<'a, V> {
    pub fn new() -> Self {
        MatchOptions {
            on_iteration: None,
            on_success_each: None,
            on_fail_each: None,
            on_error: None,
            on_end: None,
            initial_stack_capacity: 0,
        }
    }

    pub(crate) fn state_capacity(&self) -> usize {
        if self.initial_stack_capacity == 0 {
            DEFAULT_STATE_STACK_CAPACITY
        } else {
            self.initial_stack_capacity
        }
    }

    pub(crate) fn action_capacity(&self) -> usize {
        self.state_capacity() * 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_capacities_are_eight_frames_and_sixty_four_actions() {
        let opts: MatchOptions<()> = MatchOptions::new();
        assert_eq!(opts.state_capacity(), 8);
        assert_eq!(opts.action_capacity(), 64);
    }

    #[test]
    fn override_scales_action_capacity_with_it() {
        let mut opts: MatchOptions<()> = MatchOptions::new();
        opts.initial_stack_capacity = 4;
        assert_eq!(opts.state_capacity(), 4);
        assert_eq!(opts.action_capacity(), 32);
    }
}
