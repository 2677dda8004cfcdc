//! Testing utilities
//!
//!     Shared by the unit tests and the integration tests under `tests/`.
//!
//!     Grammars used in tests should come from [demo_grammar] whenever the authorization
//!     expression grammar is enough, so that a change to the embedded grammar file is picked up
//!     everywhere. Ad-hoc grammars are built with the [factories].
//!
//!     Trees are best compared through [sexp](crate::engine::formats::sexp), which prints
//!     `Or(Literal(a), Not(Literal(b)))` style one-liners.

pub mod factories;

use crate::engine::config::default_grammar;
use crate::engine::grammar::Grammar;
use once_cell::sync::Lazy;

static DEMO_GRAMMAR: Lazy<Grammar> =
    Lazy::new(|| default_grammar().expect("embedded grammar file must build"));

/// The embedded authorization expression grammar
pub fn demo_grammar() -> Grammar {
    DEMO_GRAMMAR.clone()
}
