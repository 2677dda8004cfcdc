//! Token definitions and located token instances
//!
//!     A [TokenDefinition] says how one lexical unit is recognized: either an exact literal or
//!     a regular expression. Matching is always anchored at the probed position; a pattern that
//!     only matches further along the text does not match here.
//!
//!     Definitions are compared by identity. Two definitions with the same literal are still two
//!     different tokens, so grammars share them through `Arc` and compare with `Arc::ptr_eq`.

use crate::engine::error::GrammarError;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// How a token definition recognizes its text
#[derive(Debug, Clone)]
pub enum MatchRule {
    /// The exact text
    Literal(String),
    /// A regular expression, matched only when it starts at the probed position
    Pattern(Regex),
}

/// Declares one lexical unit
#[derive(Debug, Clone)]
pub struct TokenDefinition {
    representation: Option<String>,
    name: String,
    rule: MatchRule,
    /// `^(?:pattern)`, matched against the text from the probed position on
    anchored: Option<Regex>,
}

impl TokenDefinition {
    /// A token matching `literal` exactly. The literal doubles as the representation.
    pub fn literal(literal: &str, name: &str) -> Result<Self, GrammarError> {
        if literal.is_empty() {
            return Err(GrammarError::EmptyLiteral {
                token: name.to_string(),
            });
        }
        Ok(Self {
            representation: Some(literal.to_string()),
            name: name.to_string(),
            rule: MatchRule::Literal(literal.to_string()),
            anchored: None,
        })
    }

    /// A token matching the regular expression `pattern`. It has no representation until one
    /// is given with [with_representation](Self::with_representation).
    ///
    /// Matching sees the text from the probed position on, so `^` and `\b` treat that position
    /// as the start of the text.
    pub fn pattern(pattern: &str, name: &str) -> Result<Self, GrammarError> {
        let invalid = |e: regex::Error| GrammarError::InvalidPattern {
            token: name.to_string(),
            message: e.to_string(),
        };
        let regex = Regex::new(pattern).map_err(invalid)?;
        let anchored = Regex::new(&format!("^(?:{})", pattern)).map_err(invalid)?;
        Ok(Self {
            representation: None,
            name: name.to_string(),
            rule: MatchRule::Pattern(regex),
            anchored: Some(anchored),
        })
    }

    pub fn with_representation(mut self, representation: &str) -> Self {
        self.representation = Some(representation.to_string());
        self
    }

    pub fn representation(&self) -> Option<&str> {
        self.representation.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule(&self) -> &MatchRule {
        &self.rule
    }

    /// Try to match at exactly `position` (a byte offset).
    ///
    /// Returns the matched text, or `None` when the rule does not match there. A match that
    /// starts later in the text, and an empty match, both count as no match.
    pub fn try_match<'t>(&self, text: &'t str, position: usize) -> Option<&'t str> {
        let rest = text.get(position..)?;
        match &self.rule {
            MatchRule::Literal(literal) => {
                if rest.starts_with(literal.as_str()) {
                    Some(&rest[..literal.len()])
                } else {
                    None
                }
            }
            MatchRule::Pattern(_) => {
                let found = self.anchored.as_ref()?.find(rest)?;
                (!found.is_empty()).then_some(found.as_str())
            }
        }
    }
}

impl fmt::Display for TokenDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name)
    }
}

/// An occurrence of a token definition in the source text
///
/// The matched text is not copied; it is sliced out of the source on demand.
#[derive(Debug, Clone)]
pub struct TokenInstance<'s> {
    definition: Arc<TokenDefinition>,
    text: &'s str,
    position: usize,
    length: usize,
}

impl<'s> TokenInstance<'s> {
    pub fn new(definition: Arc<TokenDefinition>, text: &'s str, position: usize, length: usize) -> Self {
        Self {
            definition,
            text,
            position,
            length,
        }
    }

    pub fn definition(&self) -> &Arc<TokenDefinition> {
        &self.definition
    }

    /// The whole source text this token was found in
    pub fn text(&self) -> &'s str {
        self.text
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn length(&self) -> usize {
        self.length
    }

    pub fn matched(&self) -> &'s str {
        &self.text[self.position..self.position + self.length]
    }

    /// Whether this is an occurrence of exactly `definition`
    pub fn is(&self, definition: &Arc<TokenDefinition>) -> bool {
        Arc::ptr_eq(&self.definition, definition)
    }
}

impl fmt::Display for TokenInstance<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}:{}>", self.definition.name(), self.matched())
    }
}
