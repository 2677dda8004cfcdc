//! Element instances: the nodes of the parse tree
//!
//!     Parsing starts from a root [ElementInstance] without a definition whose arguments are the
//!     raw tokens. Each splice replaces a run of arguments with a new element instance that owns
//!     them, so the tree only ever shrinks in width and grows in depth.
//!
//!     A node is fully expanded when it is a leaf, or when every argument is an element instance
//!     that is itself fully expanded. Raw tokens left anywhere in the tree mean parsing is not
//!     done yet (or failed).

use crate::engine::element::ElementDefinition;
use crate::engine::error::ParseError;
use crate::engine::splicing;
use crate::engine::token::{TokenDefinition, TokenInstance};
use std::sync::Arc;

/// One argument of an element instance
#[derive(Debug, Clone)]
pub enum Argument<'s> {
    /// A token not yet reduced into an element
    Token(TokenInstance<'s>),
    Element(ElementInstance<'s>),
}

impl<'s> Argument<'s> {
    /// Whether this is a raw occurrence of `definition`
    pub fn is_token(&self, definition: &Arc<TokenDefinition>) -> bool {
        match self {
            Argument::Token(token) => token.is(definition),
            Argument::Element(_) => false,
        }
    }

    pub fn as_token(&self) -> Option<&TokenInstance<'s>> {
        match self {
            Argument::Token(token) => Some(token),
            Argument::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&ElementInstance<'s>> {
        match self {
            Argument::Token(_) => None,
            Argument::Element(element) => Some(element),
        }
    }

    pub fn is_fully_expanded(&self) -> bool {
        match self {
            Argument::Token(_) => false,
            Argument::Element(element) => element.is_fully_expanded(),
        }
    }

    /// The leftmost token in this argument
    pub fn first_token(&self) -> Option<&TokenInstance<'s>> {
        match self {
            Argument::Token(token) => Some(token),
            Argument::Element(element) => element.first_token(),
        }
    }
}

/// A node of the parse tree
#[derive(Debug, Clone)]
pub struct ElementInstance<'s> {
    definition: Option<Arc<ElementDefinition>>,
    args: Vec<Argument<'s>>,
    /// Opening delimiter of a wrapping element, which is not one of its arguments
    opening: Option<TokenInstance<'s>>,
}

impl<'s> ElementInstance<'s> {
    pub fn new(definition: Arc<ElementDefinition>, args: Vec<Argument<'s>>) -> Self {
        Self {
            definition: Some(definition),
            args,
            opening: None,
        }
    }

    /// A wrapping element that remembers the token it was opened by
    pub fn wrapped(definition: Arc<ElementDefinition>, opening: TokenInstance<'s>, args: Vec<Argument<'s>>) -> Self {
        Self {
            definition: Some(definition),
            args,
            opening: Some(opening),
        }
    }

    /// The synthetic, definition-less node parsing starts from
    pub fn root(tokens: Vec<TokenInstance<'s>>) -> Self {
        Self {
            definition: None,
            args: tokens.into_iter().map(Argument::Token).collect(),
            opening: None,
        }
    }

    /// `None` only for the synthetic root
    pub fn definition(&self) -> Option<&Arc<ElementDefinition>> {
        self.definition.as_ref()
    }

    /// The definition's name, if this is not the root
    pub fn name(&self) -> Option<&str> {
        self.definition.as_deref().map(ElementDefinition::name)
    }

    pub fn args(&self) -> &[Argument<'s>] {
        &self.args
    }

    pub fn into_args(self) -> Vec<Argument<'s>> {
        self.args
    }

    /// The wrapped token, for leaves
    pub fn token(&self) -> Option<&TokenInstance<'s>> {
        match (&self.definition, self.args.as_slice()) {
            (Some(definition), [Argument::Token(token)]) if definition.is_leaf() => Some(token),
            _ => None,
        }
    }

    pub fn is_fully_expanded(&self) -> bool {
        if self.definition.as_ref().is_some_and(|d| d.is_leaf()) {
            return true;
        }
        self.args.iter().all(Argument::is_fully_expanded)
    }

    /// Apply `definition` to this node and then to every child that still holds raw tokens.
    ///
    /// Does nothing on a fully expanded node.
    pub fn recursive_expand(&mut self, definition: &Arc<ElementDefinition>) -> Result<(), ParseError> {
        if self.is_fully_expanded() {
            return Ok(());
        }
        splicing::reduce_all_occurrences(definition, &mut self.args)?;
        for arg in self.args.iter_mut() {
            if let Argument::Element(child) = arg {
                if !child.is_fully_expanded() {
                    child.recursive_expand(definition)?;
                }
            }
        }
        Ok(())
    }

    /// Depth-first search for the first raw token left in the tree.
    ///
    /// Only meaningful on a node that is not fully expanded; on a fully expanded one it
    /// reports an internal error.
    pub fn recursive_find_unexpanded_token(&self) -> Result<&TokenInstance<'s>, ParseError> {
        if self.is_fully_expanded() {
            return Err(ParseError::Internal(
                "a fully expanded element instance has no stray token".to_string(),
            ));
        }
        for arg in &self.args {
            match arg {
                Argument::Token(token) => return Ok(token),
                Argument::Element(child) if !child.is_fully_expanded() => {
                    return child.recursive_find_unexpanded_token();
                }
                Argument::Element(_) => {}
            }
        }
        Err(ParseError::Internal(
            "an element instance with unexpanded arguments yielded no token".to_string(),
        ))
    }

    /// The leftmost token of this node's source span: the opening delimiter for wrapping
    /// elements, otherwise the leftmost token anywhere under it
    pub fn first_token(&self) -> Option<&TokenInstance<'s>> {
        self.opening
            .as_ref()
            .or_else(|| self.args.iter().find_map(Argument::first_token))
    }

    pub fn opening(&self) -> Option<&TokenInstance<'s>> {
        self.opening.as_ref()
    }

    /// Number of nodes under (and including) this one
    pub fn node_count(&self) -> usize {
        1 + self
            .args
            .iter()
            .map(|arg| match arg {
                Argument::Token(_) => 1,
                Argument::Element(child) => child.node_count(),
            })
            .sum::<usize>()
    }
}
