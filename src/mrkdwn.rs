//! Document tree → Slack `mrkdwn` rendering.
//!
//! `mrkdwn` is Slack's own markup, not Markdown:
//! - Bold: `*text*`
//! - Italic: `_text_`
//! - Strikethrough: `~text~`
//! - Code: `` `text` ``
//! - Link: `<url|text>`
//!
//! Text is passed through unescaped, so a literal `*` or `<` in the source
//! reaches Slack as-is.

use crate::config::ListsConfig;
use crate::tree::{Node, NodeKind, Strength};

/// Render the children of `node` as mrkdwn, concatenated.
///
/// The node's own markers are never emitted: rendering a bold node yields
/// its inner text, and `render_inline` on its parent adds the `*`s.
pub fn render_children(node: &Node) -> String {
    node.children.iter().map(render_inline).collect()
}

/// Render a single inline node, markers included.
///
/// Kinds with no inline form (paragraphs, list items, anything unknown) are
/// transparent: only their children are rendered.
pub fn render_inline(node: &Node) -> String {
    match &node.kind {
        NodeKind::Text { literal } => literal.clone(),
        NodeKind::HardBreak | NodeKind::SoftBreak => "\n".to_string(),
        NodeKind::CodeSpan { literal } => format!("`{literal}`"),
        NodeKind::Emphasis { strength } => {
            let marker = match strength {
                Strength::Single => '_',
                Strength::Double => '*',
            };
            format!("{marker}{}{marker}", render_children(node))
        }
        NodeKind::Strikethrough => format!("~{}~", render_children(node)),
        NodeKind::Link { destination } | NodeKind::Image { destination } => {
            format!("<{destination}|{}>", render_children(node))
        }
        NodeKind::AutoLink { destination } => format!("<{destination}|{destination}>"),
        _ => render_children(node),
    }
}

/// The text content of a node with all markup dropped.
///
/// Used where Slack only accepts plain text: header blocks, image alt text
/// and table cells.
pub fn plain_text(node: &Node) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Node, out: &mut String) {
    match &node.kind {
        NodeKind::Text { literal } | NodeKind::CodeSpan { literal } => out.push_str(literal),
        _ => {
            for child in &node.children {
                collect_text(child, out);
            }
        }
    }
}

/// Render a list, including any nested lists, as one indented string.
///
/// Ordered items are numbered from the list's start value by position;
/// nested lists start on their own line one indent level deeper.
pub fn render_list(list: &Node, depth: usize, config: &ListsConfig) -> String {
    let (ordered, start) = match list.kind {
        NodeKind::List { ordered, start } => (ordered, start),
        _ => (false, 1),
    };
    let indent = config.indent.repeat(depth);

    let items: Vec<String> = list
        .children
        .iter()
        .filter(|child| child.kind == NodeKind::ListItem)
        .enumerate()
        .map(|(i, item)| {
            let marker = if ordered {
                format!("{}. ", start + i as u64)
            } else {
                format!("{} ", config.bullet)
            };
            format!("{indent}{marker}{}", render_item(item, depth, config))
        })
        .collect();

    // Joining never leaves a newline after the last item.
    items.join("\n")
}

fn render_item(item: &Node, depth: usize, config: &ListsConfig) -> String {
    item.children
        .iter()
        .map(|child| {
            if child.is_list() {
                format!("\n{}", render_list(child, depth + 1, config))
            } else {
                render_inline(child)
            }
        })
        .collect()
}
