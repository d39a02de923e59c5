mod block;
mod config;
mod error;
pub mod mrkdwn;
mod parser;
pub mod render;
mod tree;

pub use block::{
    Block, Message, RichTextCell, RichTextElement, RichTextSection, RichTextStyle, TextObject,
};
pub use config::{Config, DebugConfig, HeadersConfig, InputConfig, ListsConfig};
pub use error::{Error, Result};
pub use tree::{Document, Node, NodeKind, Strength};

/// Parse markdown text into a document tree using default config.
pub fn parse(markdown: &str) -> Document {
    parse_with_config(markdown, &Config::compiled_default())
}

/// Parse markdown text into a document tree with custom config.
pub fn parse_with_config(markdown: &str, config: &Config) -> Document {
    parser::parse(markdown, config.input.strip_frontmatter)
}

/// Convert markdown to Block Kit blocks using default config.
pub fn markdown_to_blocks(markdown: &str) -> Message {
    markdown_to_blocks_with_config(markdown, &Config::compiled_default())
}

/// Convert markdown to Block Kit blocks with custom config.
pub fn markdown_to_blocks_with_config(markdown: &str, config: &Config) -> Message {
    let doc = parse_with_config(markdown, config);
    render::render_document(&doc, config)
}

/// Convert markdown to a Block Kit JSON payload using default config.
pub fn markdown_to_json(markdown: &str, pretty: bool) -> Result<String> {
    markdown_to_json_with_config(markdown, &Config::compiled_default(), pretty)
}

/// Convert markdown to a Block Kit JSON payload with custom config.
///
/// Pretty output is indented with two spaces.
pub fn markdown_to_json_with_config(
    markdown: &str,
    config: &Config,
    pretty: bool,
) -> Result<String> {
    let message = markdown_to_blocks_with_config(markdown, config);
    let json = if pretty {
        serde_json::to_string_pretty(&message)?
    } else {
        serde_json::to_string(&message)?
    };
    Ok(json)
}
