use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag};

use crate::tree::{Document, Node, NodeKind, Strength};

const INDENTED_CODE_BLOCK: &str = "IndentedCodeBlock";

/// Schemes that start a bare URL; `www.` links get `http://` prepended.
const SCHEMES: [&str; 3] = ["https://", "http://", "ftp://"];

/// Strip YAML frontmatter from the beginning of markdown content
fn strip_frontmatter(markdown: &str) -> &str {
    if !markdown.starts_with("---") {
        return markdown;
    }
    // Find the closing ---
    if let Some(end) = markdown[3..].find("\n---") {
        // Skip past the closing --- and any trailing newline
        let after_frontmatter = &markdown[3 + end + 4..];
        after_frontmatter.trim_start_matches('\n')
    } else {
        markdown
    }
}

/// Parse markdown text into a document tree.
pub fn parse(markdown: &str, strip_yaml: bool) -> Document {
    let markdown = if strip_yaml {
        strip_frontmatter(markdown)
    } else {
        markdown
    };

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    let parser = Parser::new_ext(markdown, options).into_offset_iter();

    let mut builder = TreeBuilder::new(markdown.len());
    for (event, range) in parser {
        builder.process_event(event, range);
    }

    Document {
        source: markdown.to_string(),
        root: builder.finish(),
    }
}

/// Folds the flat event stream back into a tree. The last element of
/// `stack` is the node currently receiving children; the first is the
/// document root.
struct TreeBuilder {
    stack: Vec<Node>,
}

impl TreeBuilder {
    fn new(len: usize) -> Self {
        Self {
            stack: vec![Node::new(NodeKind::Document, 0..len)],
        }
    }

    fn process_event(&mut self, event: Event, range: Range<usize>) {
        match event {
            Event::Start(tag) => {
                let kind = tag_kind(tag);
                self.stack.push(Node::new(kind, range));
            }
            Event::End(_) => self.close(),

            Event::Text(text) => match self.stack.last_mut().map(|node| &mut node.kind) {
                Some(NodeKind::FencedCodeBlock { literal, .. }) => literal.push_str(&text),
                Some(NodeKind::Other {
                    name: INDENTED_CODE_BLOCK,
                }) => {}
                _ => self.leaf(
                    NodeKind::Text {
                        literal: text.into_string(),
                    },
                    range,
                ),
            },
            Event::Code(code) => self.leaf(
                NodeKind::CodeSpan {
                    literal: code.into_string(),
                },
                range,
            ),
            Event::SoftBreak => self.leaf(NodeKind::SoftBreak, range),
            Event::HardBreak => self.leaf(NodeKind::HardBreak, range),
            Event::Rule => self.leaf(NodeKind::ThematicBreak, range),

            // Raw HTML and the rest carry no renderable text.
            Event::Html(_) => self.leaf(NodeKind::Other { name: "Html" }, range),
            Event::InlineHtml(_) => self.leaf(NodeKind::Other { name: "RawHtml" }, range),
            Event::TaskListMarker(_) => {
                self.leaf(NodeKind::Other { name: "TaskCheckBox" }, range)
            }
            Event::FootnoteReference(_) => {
                self.leaf(NodeKind::Other { name: "FootnoteReference" }, range)
            }
            Event::InlineMath(_) | Event::DisplayMath(_) => {
                self.leaf(NodeKind::Other { name: "Math" }, range)
            }
        }
    }

    fn leaf(&mut self, kind: NodeKind, range: Range<usize>) {
        self.attach(Node::new(kind, range));
    }

    fn attach(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
    }

    fn close(&mut self) {
        // Never pop the root, even on an unbalanced End.
        if self.stack.len() > 1 {
            if let Some(mut node) = self.stack.pop() {
                if links_bare_urls(&node.kind) {
                    node.children = linkify(std::mem::take(&mut node.children));
                }
                self.attach(node);
            }
        }
    }

    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack
            .pop()
            .unwrap_or_else(|| Node::new(NodeKind::Document, 0..0))
    }
}

fn tag_kind(tag: Tag) -> NodeKind {
    match tag {
        Tag::Heading { level, .. } => NodeKind::Heading {
            level: heading_level_to_u8(level),
        },
        Tag::Paragraph => NodeKind::Paragraph,
        Tag::BlockQuote(_) => NodeKind::Blockquote,
        Tag::CodeBlock(CodeBlockKind::Fenced(info)) => NodeKind::FencedCodeBlock {
            info: info.into_string(),
            literal: String::new(),
        },
        Tag::CodeBlock(CodeBlockKind::Indented) => NodeKind::Other {
            name: INDENTED_CODE_BLOCK,
        },
        Tag::List(first_item) => NodeKind::List {
            ordered: first_item.is_some(),
            start: first_item.unwrap_or(1),
        },
        Tag::Item => NodeKind::ListItem,
        Tag::Table(_) => NodeKind::Table,
        // The header row's cells sit directly under TableHead.
        Tag::TableHead | Tag::TableRow => NodeKind::TableRow,
        Tag::TableCell => NodeKind::TableCell,
        Tag::Emphasis => NodeKind::Emphasis {
            strength: Strength::Single,
        },
        Tag::Strong => NodeKind::Emphasis {
            strength: Strength::Double,
        },
        Tag::Strikethrough => NodeKind::Strikethrough,
        Tag::Link {
            link_type: LinkType::Autolink | LinkType::Email,
            dest_url,
            ..
        } => NodeKind::AutoLink {
            destination: dest_url.into_string(),
        },
        Tag::Link { dest_url, .. } => NodeKind::Link {
            destination: dest_url.into_string(),
        },
        Tag::Image { dest_url, .. } => NodeKind::Image {
            destination: dest_url.into_string(),
        },
        Tag::HtmlBlock => NodeKind::Other { name: "HtmlBlock" },
        Tag::FootnoteDefinition(_) => NodeKind::Other {
            name: "FootnoteDefinition",
        },
        _ => NodeKind::Other { name: "Unknown" },
    }
}

/// Whether bare URLs in this node's text children become autolinks. Link
/// labels and code never do.
fn links_bare_urls(kind: &NodeKind) -> bool {
    !matches!(
        kind,
        NodeKind::Link { .. }
            | NodeKind::Image { .. }
            | NodeKind::AutoLink { .. }
            | NodeKind::FencedCodeBlock { .. }
            | NodeKind::Other { .. }
    )
}

/// Merge adjacent text children, then split bare URLs out of them as
/// `AutoLink` nodes, the way GFM's autolink extension does.
fn linkify(children: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::with_capacity(children.len());
    for child in children {
        if let (
            Some(Node {
                kind: NodeKind::Text { literal: prev },
                span,
                ..
            }),
            NodeKind::Text { literal },
        ) = (merged.last_mut(), &child.kind)
        {
            prev.push_str(literal);
            span.end = child.span.end;
            continue;
        }
        merged.push(child);
    }
    merged.into_iter().flat_map(split_autolinks).collect()
}

fn split_autolinks(node: Node) -> Vec<Node> {
    let literal = match &node.kind {
        NodeKind::Text { literal } => literal.clone(),
        _ => return vec![node],
    };
    let links = find_autolinks(&literal);
    if links.is_empty() {
        return vec![node];
    }

    // Escapes and entities make the literal shorter than its source; then
    // every piece keeps the whole span.
    let exact = literal.len() == node.span.len();
    let span_of = |range: &Range<usize>| {
        if exact {
            node.span.start + range.start..node.span.start + range.end
        } else {
            node.span.clone()
        }
    };
    let text_node = |range: Range<usize>| {
        Node::new(
            NodeKind::Text {
                literal: literal[range.clone()].to_string(),
            },
            span_of(&range),
        )
    };

    let mut pieces = Vec::new();
    let mut pos = 0;
    for (range, destination) in links {
        if range.start > pos {
            pieces.push(text_node(pos..range.start));
        }
        let mut link = Node::new(NodeKind::AutoLink { destination }, span_of(&range));
        link.children.push(text_node(range.clone()));
        pieces.push(link);
        pos = range.end;
    }
    if pos < literal.len() {
        pieces.push(text_node(pos..literal.len()));
    }
    pieces
}

/// Byte ranges of bare URLs in `text`, with their link destinations.
fn find_autolinks(text: &str) -> Vec<(Range<usize>, String)> {
    let mut links = Vec::new();
    let mut prev: Option<char> = None;
    let mut resume = 0;
    for (i, c) in text.char_indices() {
        let at_boundary = prev.is_none_or(|p| p.is_whitespace() || "*_~(".contains(p));
        prev = Some(c);
        if i < resume || !at_boundary {
            continue;
        }
        if let Some((len, destination)) = match_autolink(&text[i..]) {
            links.push((i..i + len, destination));
            resume = i + len;
        }
    }
    links
}

/// Match a bare URL at the start of `s`, returning its length and
/// destination.
fn match_autolink(s: &str) -> Option<(usize, String)> {
    let domain_start = if starts_with_ignore_case(s, "www.") {
        0
    } else {
        SCHEMES
            .iter()
            .find(|scheme| starts_with_ignore_case(s, scheme))?
            .len()
    };

    let end = s
        .find(|c: char| c.is_whitespace() || c == '<')
        .unwrap_or(s.len());
    let candidate = &s[..trim_trailing(&s[..end])];
    let domain_end = candidate[domain_start..]
        .find(['/', '?', '#', ':'])
        .map_or(candidate.len(), |i| domain_start + i);
    if !is_valid_domain(&candidate[domain_start..domain_end]) {
        return None;
    }

    let destination = if domain_start == 0 {
        format!("http://{candidate}")
    } else {
        candidate.to_string()
    };
    Some((candidate.len(), destination))
}

/// Length of `candidate` once trailing punctuation, unbalanced closing
/// parentheses and a trailing entity reference are dropped.
fn trim_trailing(candidate: &str) -> usize {
    let mut s = candidate;
    loop {
        if let Some(stripped) =
            s.strip_suffix(['?', '!', '.', ',', ':', '*', '_', '~', '\'', '"'])
        {
            s = stripped;
        } else if s.ends_with(')') && s.matches('(').count() < s.matches(')').count() {
            s = &s[..s.len() - 1];
        } else if let Some(entity_start) = trailing_entity(s) {
            s = &s[..entity_start];
        } else {
            return s.len();
        }
    }
}

/// Start of a trailing `&name;` in `s`.
fn trailing_entity(s: &str) -> Option<usize> {
    let body = s.strip_suffix(';')?;
    let amp = body.rfind('&')?;
    let name = &body[amp + 1..];
    (!name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())).then_some(amp)
}

fn is_valid_domain(domain: &str) -> bool {
    domain.contains('.')
        && domain.split('.').all(|segment| {
            !segment.is_empty()
                && segment
                    .chars()
                    .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        })
}

fn starts_with_ignore_case(s: &str, prefix: &str) -> bool {
    s.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn heading_level_to_u8(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(nodes: &[Node]) -> Vec<&'static str> {
        nodes.iter().map(|node| node.kind.name()).collect()
    }

    #[test]
    fn top_level_blocks() {
        let doc = parse("# Title\n\ntext\n\n---\n\n> quote\n", false);
        assert_eq!(
            kinds(doc.blocks()),
            ["Heading", "Paragraph", "ThematicBreak", "Blockquote"]
        );
    }

    #[test]
    fn emphasis_strength() {
        let doc = parse("*a* **b**", false);
        let para = &doc.blocks()[0];
        assert_eq!(
            para.children[0].kind,
            NodeKind::Emphasis {
                strength: Strength::Single
            }
        );
        assert_eq!(
            para.children[2].kind,
            NodeKind::Emphasis {
                strength: Strength::Double
            }
        );
    }

    #[test]
    fn fenced_code_collects_literal() {
        let doc = parse("```rust\nlet x = 1;\nlet y = 2;\n```\n", false);
        let block = &doc.blocks()[0];
        assert_eq!(
            block.kind,
            NodeKind::FencedCodeBlock {
                info: "rust".to_string(),
                literal: "let x = 1;\nlet y = 2;\n".to_string(),
            }
        );
        assert!(block.children.is_empty());
    }

    #[test]
    fn indented_code_is_other() {
        let doc = parse("    code\n", false);
        let block = &doc.blocks()[0];
        assert_eq!(block.kind.name(), INDENTED_CODE_BLOCK);
        assert!(block.children.is_empty());
    }

    #[test]
    fn ordered_list_start() {
        let doc = parse("3. a\n4. b\n", false);
        assert_eq!(
            doc.blocks()[0].kind,
            NodeKind::List {
                ordered: true,
                start: 3
            }
        );
        assert_eq!(kinds(&doc.blocks()[0].children), ["ListItem", "ListItem"]);
    }

    #[test]
    fn table_head_becomes_first_row() {
        let doc = parse("| A | B |\n|---|---|\n| 1 | 2 |\n", false);
        let table = &doc.blocks()[0];
        assert_eq!(table.kind, NodeKind::Table);
        assert_eq!(kinds(&table.children), ["TableRow", "TableRow"]);
        assert_eq!(kinds(&table.children[0].children), ["TableCell", "TableCell"]);
    }

    #[test]
    fn autolink_is_distinct_from_link() {
        let doc = parse("<https://a.example> [b](https://b.example)", false);
        let para = &doc.blocks()[0];
        assert_eq!(
            para.children[0].kind,
            NodeKind::AutoLink {
                destination: "https://a.example".to_string()
            }
        );
        assert_eq!(
            para.children[2].kind,
            NodeKind::Link {
                destination: "https://b.example".to_string()
            }
        );
    }

    #[test]
    fn frontmatter_stripped_only_when_asked() {
        let md = "---\ntitle: x\n---\n\nbody\n";
        assert_eq!(kinds(parse(md, true).blocks()), ["Paragraph"]);
        assert_ne!(kinds(parse(md, false).blocks()), ["Paragraph"]);
    }

    #[test]
    fn bare_urls_become_autolinks() {
        let doc = parse("see https://example.com and www.example.org.", false);
        let para = &doc.blocks()[0];
        assert_eq!(
            kinds(&para.children),
            ["Text", "AutoLink", "Text", "AutoLink", "Text"]
        );
        assert_eq!(
            para.children[1].kind,
            NodeKind::AutoLink {
                destination: "https://example.com".to_string()
            }
        );
        assert_eq!(para.children[1].span, 4..23);
        assert_eq!(
            para.children[3].kind,
            NodeKind::AutoLink {
                destination: "http://www.example.org".to_string()
            }
        );
        assert_eq!(
            para.children[4].kind,
            NodeKind::Text {
                literal: ".".to_string()
            }
        );
    }

    #[test]
    fn bare_urls_inside_links_and_code_stay_text() {
        let doc = parse("[https://a.example](https://b.example) `www.c.example`", false);
        let para = &doc.blocks()[0];
        assert_eq!(kinds(&para.children), ["Link", "Text", "CodeSpan"]);
        assert_eq!(kinds(&para.children[0].children), ["Text"]);
    }

    #[test]
    fn autolink_trailing_punctuation() {
        let find = |text: &str| -> Vec<String> {
            find_autolinks(text)
                .into_iter()
                .map(|(_, destination)| destination)
                .collect()
        };
        assert_eq!(find("(see https://x.example/a_(b))"), ["https://x.example/a_(b)"]);
        assert_eq!(find("https://x.example/?q=1&amp;"), ["https://x.example/?q=1"]);
        assert_eq!(find("WWW.Example.com!"), ["http://WWW.Example.com"]);
        assert!(find("http://localhost and www. and xhttps://x.example").is_empty());
    }

    #[test]
    fn lone_rule_without_frontmatter_close() {
        assert_eq!(kinds(parse("---", true).blocks()), ["ThematicBreak"]);
    }
}
