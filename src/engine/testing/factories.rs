//! Factories for definitions and instances used in tests

use crate::engine::token::{TokenDefinition, TokenInstance};
use std::sync::Arc;

/// A shared literal token definition
pub fn literal(text: &str, name: &str) -> Arc<TokenDefinition> {
    Arc::new(TokenDefinition::literal(text, name).expect("literal token must be valid"))
}

/// A shared pattern token definition
pub fn pattern(regex: &str, name: &str) -> Arc<TokenDefinition> {
    Arc::new(TokenDefinition::pattern(regex, name).expect("token pattern must compile"))
}

/// An instance of `definition` matched at `position` in `text`
pub fn token_at<'s>(definition: &Arc<TokenDefinition>, text: &'s str, position: usize) -> TokenInstance<'s> {
    let matched = definition
        .try_match(text, position)
        .unwrap_or_else(|| panic!("{} does not match at {} in {:?}", definition, position, text));
    TokenInstance::new(definition.clone(), text, position, matched.len())
}
