// Copyright 2014-2015 The Rust Project Developers. See the COPYRIGHT
// file at the top-level directory of this distribution and at
// http://rust-lang.org/COPYRIGHT.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! C-locale character classes, operating on single bytes.
//!
//! These mirror the `is?????` family from `<ctype.h>` that
//! `PT_CHARACTER_CLASS` expressions in the original library dispatch to.
//! There is no Unicode awareness here; these are byte classifiers only.

/// One of the ten C-locale character classes a `CharacterClass` expression
/// can test a byte against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CharClass {
    Alnum,
    Alpha,
    Cntrl,
    Digit,
    Graph,
    Lower,
    Punct,
    Space,
    Upper,
    XDigit,
}

impl CharClass {
    /// Test a single byte against this class, C-locale semantics.
    pub fn matches(self, b: u8) -> bool {
        match self {
            CharClass::Alnum => b.is_ascii_alphanumeric(),
            CharClass::Alpha => b.is_ascii_alphabetic(),
            CharClass::Cntrl => b.is_ascii_control(),
            CharClass::Digit => b.is_ascii_digit(),
            CharClass::Graph => b.is_ascii_graphic(),
            CharClass::Lower => b.is_ascii_lowercase(),
            CharClass::Punct => b.is_ascii_punctuation(),
            CharClass::Space => b.is_ascii_whitespace() || b == 0x0b || b == 0x0c,
            CharClass::Upper => b.is_ascii_uppercase(),
            CharClass::XDigit => b.is_ascii_hexdigit(),
        }
    }

    /// Short name, used in `Debug`/error messages for expressions.
    pub fn name(self) -> &'static str {
        match self {
            CharClass::Alnum => "alnum",
            CharClass::Alpha => "alpha",
            CharClass::Cntrl => "cntrl",
            CharClass::Digit => "digit",
            CharClass::Graph => "graph",
            CharClass::Lower => "lower",
            CharClass::Punct => "punct",
            CharClass::Space => "space",
            CharClass::Upper => "upper",
            CharClass::XDigit => "xdigit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CharClass::*;

    #[test]
    fn digit_class() {
        assert!(Digit.matches(b'5'));
        assert!(!Digit.matches(b'a'));
    }

    #[test]
    fn space_class_includes_vtab_and_formfeed() {
        assert!(Space.matches(b' '));
        assert!(Space.matches(b'\t'));
        assert!(Space.matches(0x0b));
        assert!(Space.matches(0x0c));
        assert!(!Space.matches(b'a'));
    }

    #[test]
    fn alnum_is_alpha_or_digit() {
        for b in 0u8..=255 {
            assert_eq!(Alnum.matches(b), Alpha.matches(b) || Digit.matches(b));
        }
    }
}
