//! # grammar-engine
//!
//! A tokenizer plus an operator-precedence parser for small, hand-declared grammars.
//!
//! A grammar is a list of token definitions (literal text or anchored regular expressions)
//! and a list of element definitions (operators). Each element has a fixing, one or more
//! delimiting tokens, an arity and a priority. Parsing applies one element definition at a
//! time, in ascending priority, over the whole partially reduced tree.
//!
//! See the [engine module](crate::engine) for the pipeline and the
//! [config module](crate::engine::config) for declaring grammars in TOML.

#![allow(rustdoc::invalid_html_tags)]

pub mod engine;

pub use engine::{
    parse, tokenize, Argument, Arity, ElementDefinition, ElementInstance, Error, Fixing, Grammar,
    GrammarError, ParseError, TokenDefinition, TokenInstance, TokenizeError,
};
