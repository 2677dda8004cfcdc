//! Grammar engine
//!
//!     The engine turns a source string into a tree of element instances in two stages.
//!
//! The Pipeline
//!
//!     1. Tokenizing. See [tokenizing](tokenizing).
//!        The source is scanned left to right. At each position the token definitions are
//!        tried in the order the caller gave them and the first anchored match wins.
//!        Ignorable tokens (whitespace, usually) are dropped from the output.
//!
//!     2. Parsing. See [parsing](parsing).
//!        The flat token sequence becomes the argument list of a synthetic root node.
//!        Element definitions are then applied one at a time in ascending priority. Each
//!        application is a single left to right splicing sweep over the root, followed by
//!        the same sweep inside every child that still holds raw tokens.
//!
//!     After the last definition the tree must hold no raw tokens, otherwise the first
//!     leftover token is reported as stray.
//!
//! Splicing
//!
//!     Every fixing has its own splice routine, see [splicing](splicing). Operators with
//!     variable arity are gathered into one flat n-ary node, never a binary chain. Wrapping
//!     operators either take the longest span (nestable delimiters, the inner pairs are
//!     peeled off when the same definition descends into the new node) or the shortest one.
//!
//! Sharing
//!
//!     Definitions are immutable and handed around as `Arc`s; token identity is pointer
//!     identity. A [Grammar] can be shared between threads and reused for any number of
//!     parses, each parse owning its own tree.

pub mod config;
pub mod element;
pub mod error;
pub mod formats;
pub mod grammar;
pub mod instance;
pub mod parsing;
pub mod splicing;
pub mod testing;
pub mod token;
pub mod tokenizing;

pub use element::{Arity, ElementDefinition, Fixing};
pub use error::{Error, GrammarError, ParseError, TokenizeError};
pub use grammar::Grammar;
pub use instance::{Argument, ElementInstance};
pub use parsing::parse;
pub use token::{MatchRule, TokenDefinition, TokenInstance};
pub use tokenizing::tokenize;
