//! Element definitions
//!
//!     An element definition is one grammar production: an operator (or a leaf) recognized by
//!     its delimiting tokens. Where the delimiters sit relative to the operands is the
//!     [Fixing]:
//!
//!         None     a single token becomes a leaf             usr1
//!         Prefix   delimiter(s) before each operand          ! a      @ group
//!         Postfix  delimiter(s) after each operand           a !
//!         Infix    delimiter(s) between operands             a && b   a ? b : c
//!         Wrap     an opening and a closing token            ( a )
//!
//!     Lower priorities are applied first and therefore bind tighter.
//!
//! Validation
//!
//!     The fixing, arity, delimiter count and nesting flag must agree. A definition that breaks
//!     these rules cannot be built; the constructors return a [GrammarError] instead.
//!
//!         None         arity 0, exactly 1 token
//!         Prefix       arity >= 1 or variable, 1 token or one per operand
//!         Postfix      arity >= 1 or variable, 1 token or one per operand
//!         Infix        arity >= 2 or variable, 1 token or one between each pair of operands
//!         Wrap         no arity, exactly 2 tokens (open, close), nested must be given
//!
//!     `nested` must be given for wrapping elements and only for them.

use crate::engine::error::GrammarError;
use crate::engine::token::TokenDefinition;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Where an operator's delimiters sit relative to its operands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fixing {
    None,
    Prefix,
    Postfix,
    Infix,
    Wrap,
}

impl fmt::Display for Fixing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Fixing::None => "none",
            Fixing::Prefix => "prefix",
            Fixing::Postfix => "postfix",
            Fixing::Infix => "infix",
            Fixing::Wrap => "wrap",
        };
        f.write_str(name)
    }
}

/// How many operands an operator takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    Fixed(usize),
    /// As many as the delimiter chain provides, at least one
    Variable,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "{}", n),
            Arity::Variable => f.write_str("variable"),
        }
    }
}

/// Declares one grammar production
#[derive(Debug, Clone)]
pub struct ElementDefinition {
    name: String,
    fixing: Fixing,
    tokens: Vec<Arc<TokenDefinition>>,
    arity: Option<Arity>,
    priority: i32,
    nested: Option<bool>,
}

impl ElementDefinition {
    /// Build and validate a definition.
    ///
    /// When `arity` is `None` it defaults per fixing: 0 for none, 1 for prefix and postfix,
    /// variable for infix, and stays absent for wrap.
    pub fn new(
        name: &str,
        fixing: Fixing,
        tokens: Vec<Arc<TokenDefinition>>,
        priority: i32,
        arity: Option<Arity>,
        nested: Option<bool>,
    ) -> Result<Self, GrammarError> {
        let arity = arity.or(match fixing {
            Fixing::None => Some(Arity::Fixed(0)),
            Fixing::Prefix | Fixing::Postfix => Some(Arity::Fixed(1)),
            Fixing::Infix => Some(Arity::Variable),
            Fixing::Wrap => None,
        });
        let definition = Self {
            name: name.to_string(),
            fixing,
            tokens,
            arity,
            priority,
            nested,
        };
        definition.validate()?;
        Ok(definition)
    }

    /// A leaf made of a single `token`
    pub fn none(name: &str, token: Arc<TokenDefinition>, priority: i32) -> Result<Self, GrammarError> {
        Self::new(name, Fixing::None, vec![token], priority, None, None)
    }

    /// A unary prefix operator
    pub fn prefix(name: &str, token: Arc<TokenDefinition>, priority: i32) -> Result<Self, GrammarError> {
        Self::new(name, Fixing::Prefix, vec![token], priority, None, None)
    }

    /// A unary postfix operator
    pub fn postfix(name: &str, token: Arc<TokenDefinition>, priority: i32) -> Result<Self, GrammarError> {
        Self::new(name, Fixing::Postfix, vec![token], priority, None, None)
    }

    /// A variable-arity infix operator
    pub fn infix(name: &str, token: Arc<TokenDefinition>, priority: i32) -> Result<Self, GrammarError> {
        Self::new(name, Fixing::Infix, vec![token], priority, None, None)
    }

    /// A wrapping operator
    pub fn wrap(
        name: &str,
        open: Arc<TokenDefinition>,
        close: Arc<TokenDefinition>,
        priority: i32,
        nested: bool,
    ) -> Result<Self, GrammarError> {
        Self::new(name, Fixing::Wrap, vec![open, close], priority, None, Some(nested))
    }

    fn validate(&self) -> Result<(), GrammarError> {
        let count = self.tokens.len();
        let (arity_ok, count_ok) = match (self.fixing, self.arity) {
            (Fixing::None, arity) => (arity == Some(Arity::Fixed(0)), count == 1),
            (Fixing::Prefix | Fixing::Postfix, Some(Arity::Variable)) => (true, count == 1),
            (Fixing::Prefix | Fixing::Postfix, Some(Arity::Fixed(n))) => (n >= 1, count == 1 || count == n),
            (Fixing::Infix, Some(Arity::Variable)) => (true, count == 1),
            (Fixing::Infix, Some(Arity::Fixed(n))) => (n >= 2, count == 1 || count + 1 == n),
            (Fixing::Prefix | Fixing::Postfix | Fixing::Infix, None) => (false, true),
            (Fixing::Wrap, arity) => (arity.is_none(), count == 2),
        };

        if !arity_ok {
            return Err(GrammarError::InvalidArity {
                element: self.name.clone(),
                fixing: self.fixing,
                arity: self.arity,
            });
        }
        if !count_ok {
            return Err(GrammarError::InvalidDelimiterCount {
                element: self.name.clone(),
                fixing: self.fixing,
                arity: self.arity,
                found: count,
            });
        }

        match (self.fixing, self.nested) {
            (Fixing::Wrap, None) => Err(GrammarError::MissingNested {
                element: self.name.clone(),
            }),
            (Fixing::Wrap, Some(_)) | (_, None) => Ok(()),
            (_, Some(_)) => Err(GrammarError::UnexpectedNested {
                element: self.name.clone(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fixing(&self) -> Fixing {
        self.fixing
    }

    /// The delimiting tokens; for wrapping elements the opening then the closing token
    pub fn tokens(&self) -> &[Arc<TokenDefinition>] {
        &self.tokens
    }

    /// `None` only for wrapping elements
    pub fn arity(&self) -> Option<Arity> {
        self.arity
    }

    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// `Some` only for wrapping elements
    pub fn nested(&self) -> Option<bool> {
        self.nested
    }

    /// Leaves wrap a single token and take no operands
    pub fn is_leaf(&self) -> bool {
        self.arity == Some(Arity::Fixed(0))
    }
}

impl fmt::Display for ElementDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}", self.name, self.fixing)?;
        if let Some(arity) = self.arity {
            write!(f, ", arity {}", arity)?;
        }
        if let Some(nested) = self.nested {
            write!(f, ", {}", if nested { "nested" } else { "flat" })?;
        }
        write!(f, ", priority {}):", self.priority)?;
        for token in &self.tokens {
            write!(f, " {}", token)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::factories::literal;

    #[test]
    fn test_defaults_per_fixing() {
        let lit = literal("x", "X");
        assert_eq!(
            ElementDefinition::none("Leaf", lit.clone(), 0).unwrap().arity(),
            Some(Arity::Fixed(0))
        );
        assert_eq!(
            ElementDefinition::prefix("Neg", lit.clone(), 0).unwrap().arity(),
            Some(Arity::Fixed(1))
        );
        assert_eq!(
            ElementDefinition::infix("Join", lit.clone(), 0).unwrap().arity(),
            Some(Arity::Variable)
        );
        let wrap = ElementDefinition::wrap("Sub", lit.clone(), lit, 0, true).unwrap();
        assert_eq!(wrap.arity(), None);
        assert_eq!(wrap.nested(), Some(true));
    }

    #[test]
    fn test_none_must_be_nullary() {
        let err = ElementDefinition::new("Leaf", Fixing::None, vec![literal("x", "X")], 0, Some(Arity::Fixed(1)), None)
            .unwrap_err();
        assert!(matches!(err, GrammarError::InvalidArity { fixing: Fixing::None, .. }));
    }

    #[test]
    fn test_none_needs_exactly_one_token() {
        let err = ElementDefinition::new(
            "Leaf",
            Fixing::None,
            vec![literal("x", "X"), literal("y", "Y")],
            0,
            None,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, GrammarError::InvalidDelimiterCount { found: 2, .. }));
    }

    #[test]
    fn test_prefix_rejects_zero_arity() {
        let err = ElementDefinition::new("Pre", Fixing::Prefix, vec![literal("x", "X")], 0, Some(Arity::Fixed(0)), None)
            .unwrap_err();
        assert!(matches!(err, GrammarError::InvalidArity { fixing: Fixing::Prefix, .. }));
    }

    #[test]
    fn test_prefix_token_count_is_one_or_arity() {
        let tokens = vec![literal("if", "IF"), literal("then", "THEN")];
        assert!(ElementDefinition::new("IfThen", Fixing::Prefix, tokens.clone(), 0, Some(Arity::Fixed(2)), None).is_ok());
        let err = ElementDefinition::new("IfThen", Fixing::Prefix, tokens.clone(), 0, Some(Arity::Fixed(3)), None)
            .unwrap_err();
        assert!(matches!(err, GrammarError::InvalidDelimiterCount { found: 2, .. }));
        let err = ElementDefinition::new("IfThen", Fixing::Postfix, tokens, 0, Some(Arity::Variable), None).unwrap_err();
        assert!(matches!(err, GrammarError::InvalidDelimiterCount { fixing: Fixing::Postfix, .. }));
    }

    #[test]
    fn test_infix_arity_and_tokens() {
        let tokens = vec![literal("?", "Q"), literal(":", "COLON")];
        assert!(ElementDefinition::new("Cond", Fixing::Infix, tokens.clone(), 0, Some(Arity::Fixed(3)), None).is_ok());
        let err = ElementDefinition::new("Cond", Fixing::Infix, tokens, 0, Some(Arity::Fixed(2)), None).unwrap_err();
        assert!(matches!(err, GrammarError::InvalidDelimiterCount { .. }));
        let err = ElementDefinition::new("Bin", Fixing::Infix, vec![literal("+", "PLUS")], 0, Some(Arity::Fixed(1)), None)
            .unwrap_err();
        assert!(matches!(err, GrammarError::InvalidArity { fixing: Fixing::Infix, .. }));
    }

    #[test]
    fn test_wrap_rules() {
        let open = literal("(", "OPENP");
        let close = literal(")", "CLOSEP");
        let err = ElementDefinition::new("Sub", Fixing::Wrap, vec![open.clone(), close.clone()], 0, None, None)
            .unwrap_err();
        assert_eq!(
            err,
            GrammarError::MissingNested {
                element: "Sub".to_string()
            }
        );
        let err = ElementDefinition::new("Sub", Fixing::Wrap, vec![open.clone(), close], 0, Some(Arity::Fixed(1)), Some(true))
            .unwrap_err();
        assert!(matches!(err, GrammarError::InvalidArity { fixing: Fixing::Wrap, .. }));
        let err = ElementDefinition::new("Sub", Fixing::Wrap, vec![open], 0, None, Some(false)).unwrap_err();
        assert!(matches!(err, GrammarError::InvalidDelimiterCount { found: 1, .. }));
    }

    #[test]
    fn test_nested_only_for_wrap() {
        let err = ElementDefinition::new("Not", Fixing::Prefix, vec![literal("!", "EXCL")], 0, None, Some(true))
            .unwrap_err();
        assert_eq!(
            err,
            GrammarError::UnexpectedNested {
                element: "Not".to_string()
            }
        );
    }

    #[test]
    fn test_display() {
        let and = ElementDefinition::infix("And", literal("&&", "AND"), 4).unwrap();
        assert_eq!(and.to_string(), "And (infix, arity variable, priority 4): <AND>");
        let sub = ElementDefinition::wrap("Subexpr", literal("(", "OPENP"), literal(")", "CLOSEP"), 1, true).unwrap();
        assert_eq!(sub.to_string(), "Subexpr (wrap, nested, priority 1): <OPENP> <CLOSEP>");
    }
}
