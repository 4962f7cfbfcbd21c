// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Validation status codes.

/// Possible outcomes of [`crate::validate::validate`].
///
/// `NullGrammar`, `NullPointer` and `RangeBuffer` are kept for parity with
/// the status codes the original C library exposes (its expressions carry
/// raw data pointers that can be null, and a `Range`'s bounds are parsed out
/// of a two-character buffer that can be short). This Rust implementation
/// has no null references, and `Range` is two typed `u8` fields rather than
/// a buffer, so neither ever actually occurs here — they're kept so callers
/// porting code from the original library can still match exhaustively.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    #[error("no errors on grammar")]
    Success,
    #[error("grammar is a null pointer")]
    NullGrammar,
    #[error("grammar doesn't present any rules")]
    EmptyGrammar,
    #[error("null pointer as expression data")]
    NullPointer,
    #[error("range buffer must have at least 2 characters")]
    RangeBuffer,
    #[error("range characters must be numerically ordered")]
    InvalidRange,
    #[error("non-terminal index is out of grammar bounds")]
    OutOfBounds,
    #[error("rule undefined in given grammar")]
    UndefinedRule,
    #[error("loop body may accept empty string")]
    LoopEmptyString,
}

impl ValidationStatus {
    pub fn is_success(self) -> bool {
        matches!(self, ValidationStatus::Success)
    }
}

/// The `{status, offending rule}` pair `validate` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub rule: usize,
}

impl ValidationResult {
    pub fn success() -> Self {
        ValidationResult { status: ValidationStatus::Success, rule: 0 }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Validation behaviors, composed as a bit-set of independent knobs:
/// `abort` implies `print_error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ValidateBehavior {
    /// Skip well-formedness validation. Useful for release builds running
    /// a grammar already known to be valid.
    pub skip: bool,
    /// Print a message to stderr when the grammar is invalid.
    pub print_error: bool,
    /// Abort the process when the grammar is invalid (implies `print_error`).
    pub abort: bool,
}

impl ValidateBehavior {
    pub const DEFAULT: ValidateBehavior =
        ValidateBehavior { skip: false, print_error: false, abort: false };

    pub const SKIP: ValidateBehavior =
        ValidateBehavior { skip: true, print_error: false, abort: false };

    pub const PRINT_ERROR: ValidateBehavior =
        ValidateBehavior { skip: false, print_error: true, abort: false };

    pub const ABORT: ValidateBehavior =
        ValidateBehavior { skip: false, print_error: true, abort: true };
}
