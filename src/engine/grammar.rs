//! Grammar: the immutable bundle a parse runs against
//!
//!     A [Grammar] holds the token definitions in lexer priority order, the tokens to drop while
//!     tokenizing, and the element definitions. It is built once (by hand or from a grammar file,
//!     see [config](crate::engine::config)) and then shared by reference, across threads if need
//!     be. Every parse owns its own tree.

use crate::engine::element::ElementDefinition;
use crate::engine::error::{Error, ParseError, TokenizeError};
use crate::engine::instance::ElementInstance;
use crate::engine::parsing;
use crate::engine::token::{TokenDefinition, TokenInstance};
use crate::engine::tokenizing;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct Grammar {
    tokens: Vec<Arc<TokenDefinition>>,
    ignore: Vec<Arc<TokenDefinition>>,
    elements: Vec<Arc<ElementDefinition>>,
}

impl Grammar {
    pub fn new(
        tokens: Vec<Arc<TokenDefinition>>,
        ignore: Vec<Arc<TokenDefinition>>,
        elements: Vec<Arc<ElementDefinition>>,
    ) -> Self {
        Self {
            tokens,
            ignore,
            elements,
        }
    }

    /// Token definitions in lexer priority order
    pub fn tokens(&self) -> &[Arc<TokenDefinition>] {
        &self.tokens
    }

    pub fn ignored(&self) -> &[Arc<TokenDefinition>] {
        &self.ignore
    }

    /// Element definitions in declaration order
    pub fn elements(&self) -> &[Arc<ElementDefinition>] {
        &self.elements
    }

    /// Element definitions in the order the parser applies them
    pub fn elements_by_priority(&self) -> Vec<&Arc<ElementDefinition>> {
        let mut ordered: Vec<_> = self.elements.iter().collect();
        ordered.sort_by_key(|definition| definition.priority());
        ordered
    }

    pub fn token(&self, name: &str) -> Option<&Arc<TokenDefinition>> {
        self.tokens.iter().find(|token| token.name() == name)
    }

    pub fn element(&self, name: &str) -> Option<&Arc<ElementDefinition>> {
        self.elements.iter().find(|element| element.name() == name)
    }

    pub fn tokenize<'s>(&self, text: &'s str) -> Result<Vec<TokenInstance<'s>>, TokenizeError> {
        tokenizing::tokenize(text, &self.tokens, &self.ignore)
    }

    pub fn parse_tokens<'s>(&self, tokens: Vec<TokenInstance<'s>>) -> Result<ElementInstance<'s>, ParseError> {
        parsing::parse(tokens, &self.elements)
    }

    /// Tokenize and parse `text` in one go
    pub fn parse_str<'s>(&self, text: &'s str) -> Result<ElementInstance<'s>, Error> {
        let tokens = self.tokenize(text)?;
        Ok(self.parse_tokens(tokens)?)
    }
}
