//! Compact one-line rendering: `Or(Literal(a), Not(Literal(b)))`
//!
//! Leaves print their matched text, raw tokens print as `<NAME:match>`. A root with a single
//! argument prints just that argument; otherwise it prints as `Root(...)`.

use super::snapshot::TreeSnapshot;

pub fn to_sexp_str(snapshot: &TreeSnapshot) -> String {
    let mut output = String::new();
    match snapshot.children.as_slice() {
        [only] if snapshot.node_type == "Root" => write_node(only, &mut output),
        _ => write_node(snapshot, &mut output),
    }
    output
}

fn write_node(snapshot: &TreeSnapshot, output: &mut String) {
    if snapshot.node_type == "Token" {
        output.push_str(&snapshot.label);
        return;
    }
    output.push_str(&snapshot.node_type);
    output.push('(');
    if snapshot.is_leaf() {
        // label is "<Name> <match>"
        let matched = snapshot
            .label
            .strip_prefix(snapshot.node_type.as_str())
            .map(str::trim_start)
            .unwrap_or(&snapshot.label);
        output.push_str(matched);
    } else {
        for (i, child) in snapshot.children.iter().enumerate() {
            if i > 0 {
                output.push_str(", ");
            }
            write_node(child, output);
        }
    }
    output.push(')');
}
