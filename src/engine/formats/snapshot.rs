//! Tree snapshot - a normalized, serializable view of a parse tree
//!
//! Formatters consume the snapshot rather than walking element instances themselves. The
//! snapshot owns its strings, so it outlives the source text the tree borrows from.

use crate::engine::element::Fixing;
use crate::engine::instance::{Argument, ElementInstance};
use crate::engine::token::TokenInstance;
use serde::{Deserialize, Serialize};

/// A snapshot of one tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// "Root", "Token", or the element definition's name
    pub node_type: String,

    /// Display text: the name, plus the matched text for leaves and raw tokens
    pub label: String,

    /// Fixing of the element definition; absent for the root and raw tokens
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixing: Option<Fixing>,

    /// Byte offset of the node's first token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<usize>,

    pub children: Vec<TreeSnapshot>,
}

impl TreeSnapshot {
    pub fn new(node_type: String, label: String) -> Self {
        Self {
            node_type,
            label,
            fixing: None,
            position: None,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: TreeSnapshot) -> Self {
        self.children.push(child);
        self
    }

    /// Whether this node is an element wrapping a single token
    pub fn is_leaf(&self) -> bool {
        self.fixing == Some(Fixing::None)
    }
}

/// Snapshot a whole tree, starting at the (definition-less) root
pub fn snapshot_from_root(root: &ElementInstance<'_>) -> TreeSnapshot {
    let mut snapshot = snapshot_from_element(root);
    if root.definition().is_none() {
        snapshot.node_type = "Root".to_string();
        snapshot.label = "Root".to_string();
    }
    snapshot
}

fn snapshot_from_element(element: &ElementInstance<'_>) -> TreeSnapshot {
    let name = element.name().unwrap_or("Root").to_string();
    let label = match element.token() {
        Some(token) => format!("{} {}", name, token.matched()),
        None => name.clone(),
    };
    let mut snapshot = TreeSnapshot::new(name, label);
    snapshot.fixing = element.definition().map(|definition| definition.fixing());
    snapshot.position = element.first_token().map(TokenInstance::position);

    if element.token().is_none() {
        for arg in element.args() {
            snapshot.children.push(match arg {
                Argument::Token(token) => snapshot_from_token(token),
                Argument::Element(child) => snapshot_from_element(child),
            });
        }
    }
    snapshot
}

fn snapshot_from_token(token: &TokenInstance<'_>) -> TreeSnapshot {
    let mut snapshot = TreeSnapshot::new("Token".to_string(), token.to_string());
    snapshot.position = Some(token.position());
    snapshot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::demo_grammar;

    #[test]
    fn test_snapshot_structure() {
        let grammar = demo_grammar();
        let root = grammar.parse_str("usr1 || !usr2").unwrap();
        let snapshot = snapshot_from_root(&root);

        assert_eq!(snapshot.node_type, "Root");
        assert_eq!(snapshot.fixing, None);
        let or = &snapshot.children[0];
        assert_eq!(or.node_type, "Or");
        assert_eq!(or.fixing, Some(Fixing::Infix));
        assert_eq!(or.position, Some(0));
        assert_eq!(or.children[0].label, "Literal usr1");
        assert!(or.children[0].is_leaf());
        assert!(or.children[0].children.is_empty());
        let not = &or.children[1];
        assert_eq!(not.position, Some(8));
        assert_eq!(not.children[0].label, "Literal usr2");
    }

    #[test]
    fn test_snapshot_of_raw_tokens() {
        let grammar = demo_grammar();
        let tokens = grammar.tokenize("a b").unwrap();
        let root = ElementInstance::root(tokens);
        let snapshot = snapshot_from_root(&root);
        assert_eq!(snapshot.children.len(), 2);
        assert_eq!(snapshot.children[1].node_type, "Token");
        assert_eq!(snapshot.children[1].label, "<LIT:b>");
        assert_eq!(snapshot.children[1].position, Some(2));
    }

    #[test]
    fn test_builder() {
        let snapshot = TreeSnapshot::new("Root".to_string(), "Root".to_string())
            .with_child(TreeSnapshot::new("Token".to_string(), "<LIT:a>".to_string()));
        assert_eq!(snapshot.children.len(), 1);
        assert!(!snapshot.is_leaf());
    }
}
