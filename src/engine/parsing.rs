//! Parser
//!
//!     Builds the tree from a flat token sequence:
//!
//!         1. Sort the element definitions by ascending priority.
//!         2. Make the tokens the arguments of a definition-less root.
//!         3. For each definition, expand the root recursively with it.
//!         4. Require the root to be fully expanded, with at most one top-level argument.
//!
//!     Each definition is applied to the whole tree before the next one is looked at, which
//!     lets a later operator reach into groups a wrapping operator created earlier.

use crate::engine::element::ElementDefinition;
use crate::engine::error::{ParseError, TokenSite};
use crate::engine::instance::ElementInstance;
use crate::engine::token::TokenInstance;
use std::sync::Arc;

/// Reduce `tokens` to a tree using `elements`.
///
/// The returned root has no definition; its single argument, if any, is the parsed expression.
/// Ties in priority are applied in an unspecified order.
pub fn parse<'s>(
    tokens: Vec<TokenInstance<'s>>,
    elements: &[Arc<ElementDefinition>],
) -> Result<ElementInstance<'s>, ParseError> {
    let mut ordered: Vec<&Arc<ElementDefinition>> = elements.iter().collect();
    ordered.sort_unstable_by_key(|definition| definition.priority());

    let mut root = ElementInstance::root(tokens);
    for definition in ordered {
        tracing::debug!(
            element = definition.name(),
            priority = definition.priority(),
            "applying element definition"
        );
        root.recursive_expand(definition)?;
    }

    if !root.is_fully_expanded() {
        let stray = root.recursive_find_unexpanded_token()?;
        return Err(ParseError::StrayToken {
            site: TokenSite::from_instance(stray),
        });
    }

    if let Some(extra) = root.args().get(1) {
        let stray = extra.first_token().ok_or_else(|| {
            ParseError::Internal("a top-level element instance holds no token".to_string())
        })?;
        return Err(ParseError::StrayToken {
            site: TokenSite::from_instance(stray),
        });
    }

    tracing::debug!(nodes = root.node_count(), "parsed");
    Ok(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::instance::Argument;
    use crate::engine::testing::factories::{literal, pattern};
    use crate::engine::tokenizing::tokenize;

    #[test]
    fn test_priority_order_not_declaration_order() {
        let word = pattern(r"\w+", "LIT");
        let and = literal("&", "AND");
        let or = literal("|", "OR");
        let lit = Arc::new(ElementDefinition::none("Literal", word.clone(), 0).unwrap());
        let and_def = Arc::new(ElementDefinition::infix("And", and.clone(), 1).unwrap());
        let or_def = Arc::new(ElementDefinition::infix("Or", or.clone(), 2).unwrap());

        let tokens = tokenize("a|b&c", &[word, and, or], &[]).unwrap();
        // Declared loosest first, still applied tightest first
        let root = parse(tokens, &[or_def, and_def, lit]).unwrap();

        let top = root.args()[0].as_element().unwrap();
        assert_eq!(top.name(), Some("Or"));
        assert_eq!(top.args().len(), 2);
        assert_eq!(top.args()[1].as_element().unwrap().name(), Some("And"));
    }

    #[test]
    fn test_empty_input() {
        let word = pattern(r"\w+", "LIT");
        let lit = Arc::new(ElementDefinition::none("Literal", word, 0).unwrap());
        let root = parse(vec![], &[lit]).unwrap();
        assert!(root.args().is_empty());
        assert!(root.definition().is_none());
    }

    #[test]
    fn test_stray_token() {
        let word = pattern(r"\w+", "LIT");
        let caret = literal("^", "CARET");
        let lit = Arc::new(ElementDefinition::none("Literal", word.clone(), 0).unwrap());

        let tokens = tokenize("a^", &[word, caret], &[]).unwrap();
        let err = parse(tokens, &[lit]).unwrap_err();
        match err {
            ParseError::StrayToken { site } => {
                assert_eq!(site.token, "CARET");
                assert_eq!(site.position, 1);
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_two_top_level_arguments_are_stray() {
        let word = pattern(r"\w+", "LIT");
        let space = pattern(r"\s+", "SPC");
        let lit = Arc::new(ElementDefinition::none("Literal", word.clone(), 0).unwrap());

        let tokens = tokenize("usr1 usr2", &[word, space.clone()], &[space]).unwrap();
        let err = parse(tokens, &[lit]).unwrap_err();
        assert_eq!(err.site().unwrap().position, 5);
        assert_eq!(err.site().unwrap().text, "usr2");
    }

    #[test]
    fn test_single_leaf() {
        let word = pattern(r"\w+", "LIT");
        let lit = Arc::new(ElementDefinition::none("Literal", word.clone(), 0).unwrap());
        let tokens = tokenize("usr1", &[word], &[]).unwrap();
        let root = parse(tokens, &[lit]).unwrap();
        match &root.args()[0] {
            Argument::Element(leaf) => assert_eq!(leaf.token().unwrap().matched(), "usr1"),
            Argument::Token(_) => panic!("literal was not reduced"),
        }
    }
}
