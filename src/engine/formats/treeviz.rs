//! Treeviz formatter for parse trees
//!
//! One line per node, nesting encoded as indentation with 2 columns per level:
//!
//!     <prefix><connector> <icon> <label> (label truncated to 30 characters)
//!
//! Example, for `usr1 || !usr2`:
//!
//!     ⧉ Root
//!     └─ ⋈ Or
//!       ├─ ◦ Literal usr1
//!       └─ ⊳ Not
//!         └─ ◦ Literal usr2
//!
//! Icons
//!     Root: ⧉
//!     By fixing:
//!         None: ◦
//!         Prefix: ⊳
//!         Postfix: ⊲
//!         Infix: ⋈
//!         Wrap: ()
//!     Raw token: ·

use super::snapshot::TreeSnapshot;
use crate::engine::element::Fixing;

const MAX_LABEL_CHARS: usize = 30;

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn get_icon(snapshot: &TreeSnapshot) -> &'static str {
    match snapshot.fixing {
        Some(Fixing::None) => "◦",
        Some(Fixing::Prefix) => "⊳",
        Some(Fixing::Postfix) => "⊲",
        Some(Fixing::Infix) => "⋈",
        Some(Fixing::Wrap) => "()",
        None if snapshot.node_type == "Root" => "⧉",
        None => "·",
    }
}

fn format_snapshot(snapshot: &TreeSnapshot, prefix: &str, is_last: bool, output: &mut String) {
    let connector = if is_last { "└─" } else { "├─" };
    output.push_str(&format!(
        "{}{} {} {}\n",
        prefix,
        connector,
        get_icon(snapshot),
        truncate(&snapshot.label, MAX_LABEL_CHARS)
    ));

    let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
    format_children(snapshot, &child_prefix, output);
}

fn format_children(snapshot: &TreeSnapshot, prefix: &str, output: &mut String) {
    let child_count = snapshot.children.len();
    for (i, child) in snapshot.children.iter().enumerate() {
        format_snapshot(child, prefix, i + 1 == child_count, output);
    }
}

/// Render a snapshot as treeviz; the top node gets no connector
pub fn to_treeviz_str(snapshot: &TreeSnapshot) -> String {
    let mut output = format!(
        "{} {}\n",
        get_icon(snapshot),
        truncate(&snapshot.label, MAX_LABEL_CHARS)
    );
    format_children(snapshot, "", &mut output);
    output
}
