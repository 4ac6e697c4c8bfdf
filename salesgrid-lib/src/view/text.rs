//! Plain-text rendering of view trees.

use super::Content;
use super::Node;

/// Renders a view tree as plain text, one line per row or leaf block.
///
/// Nodes with `role="row"` become a single line of their cells joined by
/// `" | "`. Containers that hold rows are descended into; any other node is
/// flattened to one line of inline text.
pub fn to_text(root: &Node) -> String {
    let mut lines = Vec::new();
    write_lines(root, &mut lines);
    lines.join("\n")
}

fn write_lines(node: &Node, lines: &mut Vec<String>) {
    if is_row(node) {
        let cells: Vec<String> = node.child_nodes().map(inline_text).collect();
        lines.push(cells.join(" | "));
        return;
    }

    if contains_row(node) {
        for child in &node.children {
            match child {
                Content::Node(child) => write_lines(child, lines),
                Content::Text(text) if !text.trim().is_empty() => lines.push(text.trim().to_string()),
                Content::Text(_) => {}
            }
        }
        return;
    }

    let text = inline_text(node);
    if !text.is_empty() {
        lines.push(text);
    }
}

fn is_row(node: &Node) -> bool {
    node.get_attr("role") == Some("row")
}

fn contains_row(node: &Node) -> bool {
    node.child_nodes().any(|child| is_row(child) || contains_row(child))
}

/// Flattens a node to a single line, showing form controls in brackets.
fn inline_text(node: &Node) -> String {
    match node.tag.as_str() {
        "input" => {
            let kind = node.get_attr("type").unwrap_or("text");
            if kind == "radio" {
                let mark = if node.get_attr("checked").is_some() { "*" } else { "" };
                return format!("{mark}{}", node.get_attr("value").unwrap_or_default());
            }
            let shown = node
                .get_attr("value")
                .or_else(|| node.get_attr("placeholder"))
                .unwrap_or_default();
            format!("[{shown}]")
        }
        "select" => {
            let selected = node
                .child_nodes()
                .find(|option| option.get_attr("selected").is_some())
                .map(Node::text_content)
                .unwrap_or_default();
            format!("<{selected}>")
        }
        "button" => {
            let label = node.text_content();
            if label.is_empty() {
                String::new()
            } else {
                format!("[{label}]")
            }
        }
        _ => {
            let parts: Vec<String> = node
                .children
                .iter()
                .map(|child| match child {
                    Content::Text(text) => text.trim().to_string(),
                    Content::Node(child) => inline_text(child),
                })
                .filter(|part| !part.is_empty())
                .collect();
            parts.join(" ")
        }
    }
}
