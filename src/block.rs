//! Slack Block Kit output types.
//!
//! Field names, ordering and omission rules follow the Block Kit JSON schema;
//! serializing these with `serde_json` yields a payload Slack accepts as-is.

use serde::Serialize;

/// The top-level payload: an ordered list of blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Message {
    pub blocks: Vec<Block>,
}

/// One top-level Block Kit block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Header {
        text: TextObject,
    },
    Section {
        text: TextObject,
    },
    Divider,
    Image {
        image_url: String,
        alt_text: String,
    },
    Table {
        rows: Vec<Vec<RichTextCell>>,
    },
}

impl Block {
    pub fn header(text: impl Into<String>, emoji: bool) -> Self {
        Block::Header {
            text: TextObject::PlainText {
                text: text.into(),
                emoji,
            },
        }
    }

    pub fn section(text: impl Into<String>) -> Self {
        Block::Section {
            text: TextObject::Mrkdwn { text: text.into() },
        }
    }
}

/// A Block Kit text object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum TextObject {
    #[serde(rename = "plain_text")]
    PlainText {
        text: String,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        emoji: bool,
    },
    #[serde(rename = "mrkdwn")]
    Mrkdwn { text: String },
}

/// A table cell: a `rich_text` wrapping one section with one text element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "rich_text")]
pub struct RichTextCell {
    pub elements: Vec<RichTextSection>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "rich_text_section")]
pub struct RichTextSection {
    pub elements: Vec<RichTextElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename = "text")]
pub struct RichTextElement {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<RichTextStyle>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RichTextStyle {
    pub bold: bool,
}

impl RichTextCell {
    /// Build a cell from plain text. Header cells are bold.
    ///
    /// Slack rejects empty text elements, so a blank cell holds a single
    /// space.
    pub fn new(content: &str, header: bool) -> Self {
        let text = if content.trim().is_empty() {
            " ".to_string()
        } else {
            content.to_string()
        };
        let style = header.then_some(RichTextStyle { bold: true });

        RichTextCell {
            elements: vec![RichTextSection {
                elements: vec![RichTextElement { text, style }],
            }],
        }
    }

    /// The cell's text content.
    pub fn text(&self) -> &str {
        self.element().map_or("", |element| element.text.as_str())
    }

    pub fn is_bold(&self) -> bool {
        self.element()
            .and_then(|element| element.style)
            .is_some_and(|style| style.bold)
    }

    fn element(&self) -> Option<&RichTextElement> {
        self.elements.first()?.elements.first()
    }
}
