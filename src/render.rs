use tracing::{debug, trace};

use crate::block::{Block, Message, RichTextCell};
use crate::config::Config;
use crate::mrkdwn::{plain_text, render_children, render_list};
use crate::tree::{Document, Node, NodeKind};

/// Convert a parsed document into a Block Kit message.
pub fn render_document(doc: &Document, config: &Config) -> Message {
    if config.debug.dump_tree {
        trace!(tree = %doc.dump(), "parsed document");
    }

    let blocks: Vec<Block> = doc
        .blocks()
        .iter()
        .filter_map(|node| render_block(node, config))
        .collect();

    debug!(
        nodes = doc.blocks().len(),
        blocks = blocks.len(),
        "rendered document"
    );
    Message { blocks }
}

/// Convert one top-level node into a block. Returns `None` for nodes that
/// have no block form, such as empty paragraphs or raw HTML.
pub fn render_block(node: &Node, config: &Config) -> Option<Block> {
    match &node.kind {
        NodeKind::Heading { level } => {
            // Slack headers are plain text only.
            let text = plain_text(node);
            if config.headers.is_header(*level) {
                Some(Block::header(text, config.headers.emoji))
            } else {
                Some(Block::section(format!("*{text}*")))
            }
        }
        NodeKind::Paragraph => match node.only_child() {
            Some(
                image @ Node {
                    kind: NodeKind::Image { destination },
                    ..
                },
            ) => Some(Block::Image {
                image_url: destination.clone(),
                alt_text: plain_text(image),
            }),
            _ => {
                let text = render_children(node);
                if text.trim().is_empty() {
                    debug!(span = ?node.span, "skipping empty paragraph");
                    None
                } else {
                    Some(Block::section(text))
                }
            }
        },
        NodeKind::Blockquote => {
            let quote = render_children(node)
                .split('\n')
                .map(|line| format!("> {line}"))
                .collect::<Vec<_>>()
                .join("\n");
            Some(Block::section(quote))
        }
        NodeKind::FencedCodeBlock { info, literal } => {
            Some(Block::section(format!("```{info}\n{literal}```")))
        }
        NodeKind::ThematicBreak => Some(Block::Divider),
        NodeKind::Table => Some(Block::Table {
            rows: table_rows(node),
        }),
        NodeKind::List { .. } => Some(Block::section(render_list(node, 0, &config.lists))),
        kind => {
            debug!(kind = kind.name(), span = ?node.span, "no block for node");
            None
        }
    }
}

/// Build table rows; the first row is the header.
fn table_rows(table: &Node) -> Vec<Vec<RichTextCell>> {
    table
        .children
        .iter()
        .filter(|row| row.kind == NodeKind::TableRow)
        .enumerate()
        .map(|(i, row)| {
            row.children
                .iter()
                .map(|cell| RichTextCell::new(&plain_text(cell), i == 0))
                .collect()
        })
        .collect()
}
