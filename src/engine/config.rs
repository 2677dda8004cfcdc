//! Declarative grammar files
//!
//! Grammars can be written in TOML instead of code. `defaults/grammar.default.toml`, the
//! authorization expression grammar, is embedded into every binary. Files and overrides are
//! layered through a [`Loader`] before being deserialized into a [`GrammarConfig`], which
//! [`GrammarConfig::build`] turns into a [`Grammar`].
//!
//! ```toml
//! ignore = ["SPC"]
//!
//! [[tokens]]           # declaration order is lexer priority
//! name = "EXCL"
//! literal = "!"
//!
//! [[tokens]]
//! name = "LIT"
//! pattern = '\w+'
//!
//! [[elements]]
//! name = "Not"
//! fixing = "prefix"    # none | prefix | postfix | infix | wrap
//! tokens = ["EXCL"]
//! priority = 3
//! arity = 1            # a number or "variable"; defaults per fixing
//! ```

use crate::engine::element::{Arity, ElementDefinition, Fixing};
use crate::engine::error::GrammarError;
use crate::engine::grammar::Grammar;
use crate::engine::token::TokenDefinition;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

const DEFAULT_TOML: &str = include_str!("../../defaults/grammar.default.toml");

/// A grammar as written in a grammar file
#[derive(Debug, Clone, Deserialize)]
pub struct GrammarConfig {
    #[serde(default)]
    pub name: Option<String>,
    /// Names of tokens dropped while tokenizing
    #[serde(default)]
    pub ignore: Vec<String>,
    pub tokens: Vec<TokenConfig>,
    #[serde(default)]
    pub elements: Vec<ElementConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    pub name: String,
    #[serde(default)]
    pub literal: Option<String>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub representation: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ElementConfig {
    pub name: String,
    pub fixing: Fixing,
    pub tokens: Vec<String>,
    pub priority: i32,
    #[serde(default)]
    pub arity: Option<ArityConfig>,
    #[serde(default)]
    pub nested: Option<bool>,
}

/// `arity = 2` or `arity = "variable"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ArityConfig {
    Fixed(usize),
    Keyword(ArityKeyword),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArityKeyword {
    Variable,
}

impl From<ArityConfig> for Arity {
    fn from(value: ArityConfig) -> Self {
        match value {
            ArityConfig::Fixed(n) => Arity::Fixed(n),
            ArityConfig::Keyword(ArityKeyword::Variable) => Arity::Variable,
        }
    }
}

impl GrammarConfig {
    /// Resolve token names and validate every definition.
    pub fn build(&self) -> Result<Grammar, GrammarError> {
        let mut tokens: Vec<Arc<TokenDefinition>> = Vec::with_capacity(self.tokens.len());
        for entry in &self.tokens {
            if tokens.iter().any(|token| token.name() == entry.name) {
                return Err(GrammarError::DuplicateTokenName {
                    token: entry.name.clone(),
                });
            }
            tokens.push(Arc::new(entry.build()?));
        }

        let lookup = |name: &str| tokens.iter().find(|token| token.name() == name).cloned();

        let ignore = self
            .ignore
            .iter()
            .map(|name| {
                lookup(name).ok_or_else(|| GrammarError::UnknownIgnoredToken {
                    token: name.clone(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut elements = Vec::with_capacity(self.elements.len());
        for entry in &self.elements {
            let delimiters = entry
                .tokens
                .iter()
                .map(|name| {
                    lookup(name).ok_or_else(|| GrammarError::UnknownTokenName {
                        element: entry.name.clone(),
                        token: name.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            elements.push(Arc::new(ElementDefinition::new(
                &entry.name,
                entry.fixing,
                delimiters,
                entry.priority,
                entry.arity.map(Arity::from),
                entry.nested,
            )?));
        }

        tracing::debug!(
            grammar = self.name.as_deref().unwrap_or("unnamed"),
            tokens = tokens.len(),
            elements = elements.len(),
            "built grammar"
        );
        Ok(Grammar::new(tokens, ignore, elements))
    }
}

impl TokenConfig {
    fn build(&self) -> Result<TokenDefinition, GrammarError> {
        let definition = match (&self.literal, &self.pattern) {
            (Some(literal), None) => TokenDefinition::literal(literal, &self.name)?,
            (None, Some(pattern)) => TokenDefinition::pattern(pattern, &self.name)?,
            _ => {
                return Err(GrammarError::InvalidMatchRule {
                    token: self.name.clone(),
                })
            }
        };
        Ok(match &self.representation {
            Some(representation) => definition.with_representation(representation),
            None => definition,
        })
    }
}

/// Helper for layering grammar sources and overrides.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start an empty loader; at least one source must be added before building.
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
        }
    }

    /// Start a loader seeded with the embedded authorization expression grammar.
    pub fn with_defaults() -> Self {
        Self::new().with_toml(DEFAULT_TOML)
    }

    /// Layer TOML text.
    pub fn with_toml(mut self, text: &str) -> Self {
        self.builder = self.builder.add_source(File::from_str(text, FileFormat::Toml));
        self
    }

    /// Layer a grammar file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional grammar file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, GrammarError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value).map_err(config_error)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting grammar description.
    pub fn load(self) -> Result<GrammarConfig, GrammarError> {
        self.builder
            .build()
            .and_then(Config::try_deserialize::<GrammarConfig>)
            .map_err(config_error)
    }

    /// Load and build in one step.
    pub fn build(self) -> Result<Grammar, GrammarError> {
        self.load()?.build()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

fn config_error(err: ConfigError) -> GrammarError {
    GrammarError::Config(err.to_string())
}

/// The embedded grammar description.
pub fn load_defaults() -> Result<GrammarConfig, GrammarError> {
    Loader::with_defaults().load()
}

/// The embedded grammar, built.
pub fn default_grammar() -> Result<Grammar, GrammarError> {
    Loader::with_defaults().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.name.as_deref(), Some("ifauth"));
        assert_eq!(config.ignore, vec!["SPC".to_string()]);
        assert_eq!(config.tokens.len(), 8);
        assert_eq!(config.tokens[6].pattern.as_deref(), Some(r"\w+"));
        let subexpr = &config.elements[1];
        assert_eq!(subexpr.fixing, Fixing::Wrap);
        assert_eq!(subexpr.nested, Some(true));
        assert_eq!(subexpr.arity, None);
    }

    #[test]
    fn builds_default_grammar() {
        let grammar = default_grammar().expect("defaults to build");
        assert_eq!(grammar.tokens().len(), 8);
        assert_eq!(grammar.ignored().len(), 1);
        assert!(Arc::ptr_eq(&grammar.ignored()[0], grammar.token("SPC").unwrap()));
        assert_eq!(grammar.token("SPC").unwrap().representation(), Some(" "));
        let and = grammar.element("And").unwrap();
        assert_eq!(and.arity(), Some(Arity::Variable));
        assert!(Arc::ptr_eq(&and.tokens()[0], grammar.token("AND").unwrap()));
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::with_defaults()
            .set_override("name", "custom")
            .expect("override to apply")
            .load()
            .expect("config to load");
        assert_eq!(config.name.as_deref(), Some("custom"));
    }

    #[test]
    fn parses_arity_forms() {
        let config = Loader::new()
            .with_toml(
                r#"
                [[tokens]]
                name = "Q"
                literal = "?"

                [[tokens]]
                name = "COLON"
                literal = ":"

                [[tokens]]
                name = "PLUS"
                literal = "+"

                [[elements]]
                name = "Cond"
                fixing = "infix"
                tokens = ["Q", "COLON"]
                priority = 1
                arity = 3

                [[elements]]
                name = "Sum"
                fixing = "infix"
                tokens = ["PLUS"]
                priority = 0
                arity = "variable"
                "#,
            )
            .load()
            .expect("config to load");
        assert_eq!(config.elements[0].arity, Some(ArityConfig::Fixed(3)));
        assert_eq!(
            config.elements[1].arity,
            Some(ArityConfig::Keyword(ArityKeyword::Variable))
        );
        let grammar = config.build().expect("grammar to build");
        assert_eq!(grammar.element("Cond").unwrap().arity(), Some(Arity::Fixed(3)));
        assert!(grammar.ignored().is_empty());
    }

    #[test]
    fn rejects_unknown_token_reference() {
        let err = Loader::new()
            .with_toml(
                r#"
                [[tokens]]
                name = "EXCL"
                literal = "!"

                [[elements]]
                name = "Not"
                fixing = "prefix"
                tokens = ["BANG"]
                priority = 0
                "#,
            )
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            GrammarError::UnknownTokenName {
                element: "Not".to_string(),
                token: "BANG".to_string()
            }
        );
    }

    #[test]
    fn rejects_duplicate_and_ambiguous_tokens() {
        let duplicate = Loader::new()
            .with_toml(
                r#"
                [[tokens]]
                name = "X"
                literal = "x"

                [[tokens]]
                name = "X"
                literal = "y"
                "#,
            )
            .build()
            .unwrap_err();
        assert!(matches!(duplicate, GrammarError::DuplicateTokenName { .. }));

        let ambiguous = Loader::new()
            .with_toml(
                r#"
                [[tokens]]
                name = "X"
                literal = "x"
                pattern = "x+"
                "#,
            )
            .build()
            .unwrap_err();
        assert!(matches!(ambiguous, GrammarError::InvalidMatchRule { .. }));
    }

    #[test]
    fn rejects_invalid_element() {
        let err = Loader::new()
            .with_toml(
                r#"
                [[tokens]]
                name = "OPENP"
                literal = "("

                [[tokens]]
                name = "CLOSEP"
                literal = ")"

                [[elements]]
                name = "Subexpr"
                fixing = "wrap"
                tokens = ["OPENP", "CLOSEP"]
                priority = 0
                "#,
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::MissingNested { .. }));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Loader::new()
            .with_file("does/not/exist.toml")
            .build()
            .unwrap_err();
        assert!(matches!(err, GrammarError::Config(_)));
    }

    #[test]
    fn missing_optional_file_is_skipped() {
        let config = Loader::with_defaults()
            .with_optional_file("does/not/exist.toml")
            .load()
            .expect("optional file to be skipped");
        assert_eq!(config.name.as_deref(), Some("ifauth"));
    }

    #[test]
    fn present_optional_file_is_layered() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("ternary.toml");
        let config = Loader::with_defaults()
            .with_optional_file(path)
            .load()
            .expect("optional file to load");
        assert_eq!(config.name.as_deref(), Some("ternary"));
    }
}
