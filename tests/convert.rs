use md_to_slack::{Block, Config, markdown_to_blocks, markdown_to_json};
use serde_json::{Value, json};

fn to_json(md: &str) -> Value {
    let text = markdown_to_json(md, true).expect("encode");
    serde_json::from_str(&text).expect("valid json")
}

#[test]
fn title_paragraph_and_table() {
    let md = "# Title\n\nHello **world**!\n\n| A | B |\n|---|---|\n| 1 |  |\n";
    assert_eq!(
        to_json(md),
        json!({
            "blocks": [
                {"type": "header", "text": {"type": "plain_text", "text": "Title", "emoji": true}},
                {"type": "section", "text": {"type": "mrkdwn", "text": "Hello *world*!"}},
                {"type": "table", "rows": [
                    [
                        {"type": "rich_text", "elements": [{"type": "rich_text_section", "elements": [
                            {"type": "text", "text": "A", "style": {"bold": true}}
                        ]}]},
                        {"type": "rich_text", "elements": [{"type": "rich_text_section", "elements": [
                            {"type": "text", "text": "B", "style": {"bold": true}}
                        ]}]}
                    ],
                    [
                        {"type": "rich_text", "elements": [{"type": "rich_text_section", "elements": [
                            {"type": "text", "text": "1"}
                        ]}]},
                        {"type": "rich_text", "elements": [{"type": "rich_text_section", "elements": [
                            {"type": "text", "text": " "}
                        ]}]}
                    ]
                ]}
            ]
        })
    );
}

#[test]
fn lone_thematic_break() {
    assert_eq!(
        to_json("---"),
        json!({"blocks": [{"type": "divider"}]})
    );
}

#[test]
fn lone_image() {
    assert_eq!(
        to_json("![diagram](https://img.example/d.png)\n"),
        json!({"blocks": [
            {"type": "image", "image_url": "https://img.example/d.png", "alt_text": "diagram"}
        ]})
    );
}

#[test]
fn ordered_list_with_nested_bullets() {
    let md = "3. first\n4. second\n   - nested a\n   - nested b\n5. third\n";
    assert_eq!(
        to_json(md),
        json!({"blocks": [{"type": "section", "text": {
            "type": "mrkdwn",
            "text": "3. first\n4. second\n  - nested a\n  - nested b\n5. third"
        }}]})
    );
}

#[test]
fn empty_document_has_empty_blocks() {
    assert_eq!(to_json(""), json!({"blocks": []}));
}

#[test]
fn pretty_output_uses_two_space_indent() {
    let text = markdown_to_json("---", true).unwrap();
    assert_eq!(text, "{\n  \"blocks\": [\n    {\n      \"type\": \"divider\"\n    }\n  ]\n}");
}

#[test]
fn compact_output() {
    let text = markdown_to_json("Hi _there_", false).unwrap();
    assert_eq!(
        text,
        r#"{"blocks":[{"type":"section","text":{"type":"mrkdwn","text":"Hi _there_"}}]}"#
    );
}

#[test]
fn mixed_document() {
    let md = "\
## Release notes

Some ~~old~~ *new* text with [a link](https://example.com) and `code`.

> Quoted
> twice

```sh
cargo install md-to-slack
```

#### Details

- one
- two
";
    let blocks = markdown_to_blocks(md).blocks;
    assert_eq!(
        blocks,
        [
            Block::header("Release notes", true),
            Block::section(
                "Some ~old~ _new_ text with <https://example.com|a link> and `code`."
            ),
            Block::section("> Quoted\n> twice"),
            Block::section("```sh\ncargo install md-to-slack\n```"),
            Block::section("*Details*"),
            Block::section("- one\n- two"),
        ]
    );
}

#[test]
fn frontmatter_is_stripped_when_configured() {
    let mut config = Config::default();
    config.input.strip_frontmatter = true;
    let message =
        md_to_slack::markdown_to_blocks_with_config("---\ntitle: x\n---\n\n# Hi\n", &config);
    assert_eq!(message.blocks, [Block::header("Hi", true)]);
}
