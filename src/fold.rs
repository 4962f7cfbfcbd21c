// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Folding the queued action stack into a single value once a match
//! succeeds. Actions are laid out left to right in the order their
//! expressions committed, which is also always a valid evaluation order:
//! an action's `argc` never reaches further back than the results its own
//! children already pushed.

use crate::options::MatchData;
use crate::state::QueuedAction;

pub(crate) fn fold_actions<V>(input: &[u8], actions: Vec<QueuedAction<V>>) -> MatchData<V> {
    let mut data: Vec<V> = Vec::with_capacity(actions.len());
    for queued in actions {
        let args_at = data.len() - queued.argc;
        let value = (queued.action)(input, queued.start, queued.end, &data[args_at..]);
        data.truncate(args_at);
        data.push(value);
    }
    match data.pop() {
        Some(v) => MatchData::Value(v),
        None => MatchData::None,
    }
}
