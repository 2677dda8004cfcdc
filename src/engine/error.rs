//! Error types for the grammar engine
//!
//! Three families, one per stage:
//!     - [GrammarError]: a token or element definition is malformed. These are configuration
//!       faults, raised while a grammar is being built and never while parsing.
//!     - [TokenizeError]: the source holds text no token definition recognizes.
//!     - [ParseError]: the tokens could not be reduced to a single tree.
//!
//! All errors own their data so they outlive the source text they describe.

use crate::engine::element::{Arity, ElementDefinition, Fixing};
use crate::engine::token::TokenInstance;
use std::fmt;
use std::sync::Arc;

/// Errors raised while declaring tokens, elements or whole grammars
#[derive(Debug, Clone, PartialEq)]
pub enum GrammarError {
    /// The arity is not allowed for the fixing
    InvalidArity {
        element: String,
        fixing: Fixing,
        arity: Option<Arity>,
    },
    /// The number of delimiting tokens does not fit the fixing and arity
    InvalidDelimiterCount {
        element: String,
        fixing: Fixing,
        arity: Option<Arity>,
        found: usize,
    },
    /// A wrapping element must say whether it nests
    MissingNested { element: String },
    /// Only wrapping elements may say whether they nest
    UnexpectedNested { element: String },
    /// A token pattern is not a valid regular expression
    InvalidPattern { token: String, message: String },
    /// A literal token must match at least one character
    EmptyLiteral { token: String },
    /// A grammar file token entry needs exactly one of `literal` or `pattern`
    InvalidMatchRule { token: String },
    /// Two tokens in one grammar share a name
    DuplicateTokenName { token: String },
    /// An element refers to a token the grammar does not declare
    UnknownTokenName { element: String, token: String },
    /// The ignore list refers to a token the grammar does not declare
    UnknownIgnoredToken { token: String },
    /// The grammar file could not be loaded or deserialized
    Config(String),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::InvalidArity {
                element,
                fixing,
                arity,
            } => {
                let rule = match fixing {
                    Fixing::None => "an element with no fixing must be 0-ary",
                    Fixing::Prefix => "a prefix element must be n-ary with n > 0",
                    Fixing::Postfix => "a postfix element must be n-ary with n > 0",
                    Fixing::Infix => "an infix element must be n-ary with n > 1",
                    Fixing::Wrap => "arity does not apply to a wrapping element",
                };
                write!(f, "Invalid arity {} for element {}: {}", describe_arity(arity), element, rule)
            }
            GrammarError::InvalidDelimiterCount {
                element,
                fixing,
                found,
                ..
            } => {
                let rule = match fixing {
                    Fixing::None => "an element with no fixing must have exactly 1 token",
                    Fixing::Prefix => "a n-ary prefix operator must have either 1 or n tokens",
                    Fixing::Postfix => "a n-ary postfix operator must have either 1 or n tokens",
                    Fixing::Infix => "a n-ary infix operator must have either 1 or n-1 tokens",
                    Fixing::Wrap => "wrapping operators are identified by exactly two tokens",
                };
                write!(f, "Element {} has {} tokens: {}", element, found, rule)
            }
            GrammarError::MissingNested { element } => write!(
                f,
                "Wrapping element {} must specify whether it is nested",
                element
            ),
            GrammarError::UnexpectedNested { element } => write!(
                f,
                "Element {} is not wrapping, nested applies only to wrapping operators",
                element
            ),
            GrammarError::InvalidPattern { token, message } => {
                write!(f, "Invalid pattern for token {}: {}", token, message)
            }
            GrammarError::EmptyLiteral { token } => {
                write!(f, "Token {} has an empty literal", token)
            }
            GrammarError::InvalidMatchRule { token } => write!(
                f,
                "Token {} must declare exactly one of `literal` or `pattern`",
                token
            ),
            GrammarError::DuplicateTokenName { token } => {
                write!(f, "Token {} is declared more than once", token)
            }
            GrammarError::UnknownTokenName { element, token } => {
                write!(f, "Element {} refers to undeclared token {}", element, token)
            }
            GrammarError::UnknownIgnoredToken { token } => {
                write!(f, "Ignored token {} is not declared", token)
            }
            GrammarError::Config(msg) => write!(f, "Grammar configuration error: {}", msg),
        }
    }
}

impl std::error::Error for GrammarError {}

fn describe_arity(arity: &Option<Arity>) -> String {
    match arity {
        Some(Arity::Fixed(n)) => n.to_string(),
        Some(Arity::Variable) => "variable".to_string(),
        None => "none".to_string(),
    }
}

/// Errors raised while splitting source text into tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// No token definition matches at `position`
    UnknownToken { position: usize, snippet: String },
}

impl TokenizeError {
    pub(crate) fn unknown_token(text: &str, position: usize) -> Self {
        let snippet = text[position..].chars().take(4).collect();
        TokenizeError::UnknownToken { position, snippet }
    }
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenizeError::UnknownToken { position, snippet } => {
                write!(f, "Unknown token \"{}\" at position {}", snippet, position)
            }
        }
    }
}

impl std::error::Error for TokenizeError {}

/// Where a token sits in the source, detached from the source's lifetime
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSite {
    /// Name of the token definition
    pub token: String,
    /// The matched text
    pub text: String,
    /// Byte offset of the match
    pub position: usize,
    /// Byte length of the match
    pub length: usize,
    /// The match plus up to 3 characters before it
    pub context: String,
}

impl TokenSite {
    pub fn from_instance(instance: &TokenInstance<'_>) -> Self {
        Self {
            token: instance.definition().name().to_string(),
            text: instance.matched().to_string(),
            position: instance.position(),
            length: instance.length(),
            context: context_around(instance.text(), instance.position(), instance.length()),
        }
    }
}

/// Errors raised while reducing tokens into a tree
#[derive(Debug, Clone)]
pub enum ParseError {
    /// An operator's delimiters were found but its operands ran out
    NotEnoughArguments {
        element: Arc<ElementDefinition>,
        site: TokenSite,
    },
    /// A wrapping operator's opening token has no closing token
    UnmatchedWrapper {
        element: Arc<ElementDefinition>,
        site: TokenSite,
    },
    /// A token was left over after every element definition was applied
    StrayToken { site: TokenSite },
    /// An engine invariant does not hold
    Internal(String),
}

impl ParseError {
    /// The token the error points at, if any
    pub fn site(&self) -> Option<&TokenSite> {
        match self {
            ParseError::NotEnoughArguments { site, .. }
            | ParseError::UnmatchedWrapper { site, .. }
            | ParseError::StrayToken { site } => Some(site),
            ParseError::Internal(_) => None,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::NotEnoughArguments { element, site } => {
                write!(
                    f,
                    "Not enough arguments for operator {} encountered at position {}, around \"{}\".",
                    element.name(),
                    site.position,
                    site.context
                )?;
                if let Some(Arity::Fixed(n)) = element.arity() {
                    if n > 0 {
                        write!(f, " Expected {} arguments.", n)?;
                    }
                }
                Ok(())
            }
            ParseError::UnmatchedWrapper { element, site } => {
                let tokens = element.tokens();
                write!(
                    f,
                    "Unmatched opening token {} for wrapping operator {} encountered at position {}, around \"{}\".",
                    tokens[0],
                    element.name(),
                    site.position,
                    site.context
                )?;
                if let Some(close) = tokens.get(1) {
                    write!(f, " The missing closing token is {}.", close)?;
                }
                Ok(())
            }
            ParseError::StrayToken { site } => write!(
                f,
                "Stray token encountered at position {}, around \"{}\".",
                site.position, site.context
            ),
            ParseError::Internal(msg) => write!(f, "Internal parser error: {}", msg),
        }
    }
}

impl std::error::Error for ParseError {}

/// Any error the engine can produce, for callers that tokenize and parse in one go
#[derive(Debug, Clone)]
pub enum Error {
    Grammar(GrammarError),
    Tokenize(TokenizeError),
    Parse(ParseError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Grammar(e) => write!(f, "{}", e),
            Error::Tokenize(e) => write!(f, "{}", e),
            Error::Parse(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Grammar(e) => Some(e),
            Error::Tokenize(e) => Some(e),
            Error::Parse(e) => Some(e),
        }
    }
}

impl From<GrammarError> for Error {
    fn from(err: GrammarError) -> Self {
        Error::Grammar(err)
    }
}

impl From<TokenizeError> for Error {
    fn from(err: TokenizeError) -> Self {
        Error::Tokenize(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

/// Text around a match: up to 3 characters before `position` followed by the match itself.
///
/// Offsets are bytes; both ends are moved outwards to the nearest character boundary.
pub fn context_around(text: &str, position: usize, length: usize) -> String {
    let position = position.min(text.len());
    let mut start = position;
    for _ in 0..3 {
        match text[..start].chars().next_back() {
            Some(c) => start -= c.len_utf8(),
            None => break,
        }
    }
    let mut end = (position + length).min(text.len());
    while !text.is_char_boundary(end) {
        end += 1;
    }
    text[start..end].to_string()
}
