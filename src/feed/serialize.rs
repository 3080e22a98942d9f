//! Output forms of a parsed [`Feed`].
//!
//! [`to_dict`] is plain JSON and should be preferred by new consumers.
//! [`to_text`] is the legacy `/feed/read` body: every array element is a bare
//! `"item": {...}` pair, so the result is *not* valid JSON. Existing clients
//! depend on that exact shape, separators included.
use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_json::Value;

use super::model::{Feed, Item};

/// `{"feed": [item, ...]}` as a JSON value.
pub fn to_dict(feed: &Feed) -> Value {
    serde_json::json!({ "feed": feed.items })
}

/// Legacy text form: `{"feed": [` + `"item": <item>` entries joined by `,` + `]}`.
///
/// Items are encoded with `", "` and `": "` separators; non-ASCII characters
/// are written as-is.
pub fn to_text(feed: &Feed) -> Result<String, serde_json::Error> {
    let entries = feed
        .items
        .iter()
        .map(|item| encode_item(item).map(|json| format!("\"item\": {json}")))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(format!("{{\"feed\": [{}]}}", entries.join(",")))
}

fn encode_item(item: &Item) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    item.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

/// Compact JSON with a space after every `,` and `:`.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::model::DescriptionBlock;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample_item() -> Item {
        Item {
            title: Some("Título".into()),
            link: Some("https://example.com/a".into()),
            description: vec![
                DescriptionBlock::Text("abc  def".into()),
                DescriptionBlock::Image("image_url".into()),
                DescriptionBlock::Links(vec!["link_url_1".into(), "link_url_2".into()]),
            ],
        }
    }

    #[test]
    fn test_empty_feed_to_dict() {
        assert_eq!(to_dict(&Feed::default()), json!({"feed": []}));
    }

    #[test]
    fn test_feed_to_dict() {
        let feed = Feed::new(vec![sample_item()]);
        assert_eq!(
            to_dict(&feed),
            json!({"feed": [{
                "title": "Título",
                "link": "https://example.com/a",
                "description": [
                    {"type": "text", "content": "abc  def"},
                    {"type": "image", "content": "image_url"},
                    {"type": "links", "content": ["link_url_1", "link_url_2"]},
                ],
            }]})
        );
    }

    #[test]
    fn test_empty_feed_to_text() {
        assert_eq!(to_text(&Feed::default()).unwrap(), r#"{"feed": []}"#);
    }

    #[test]
    fn test_feed_to_text() {
        let feed = Feed::new(vec![Item {
            title: Some("a".into()),
            link: Some("b".into()),
            description: vec![],
        }]);
        assert_eq!(
            to_text(&feed).unwrap(),
            r#"{"feed": ["item": {"title": "a", "link": "b", "description": []}]}"#
        );
    }

    #[test]
    fn test_feed_to_text_full_item() {
        let feed = Feed::new(vec![sample_item()]);
        assert_eq!(
            to_text(&feed).unwrap(),
            concat!(
                r#"{"feed": ["item": {"title": "Título", "link": "https://example.com/a", "#,
                r#""description": [{"type": "text", "content": "abc  def"}, "#,
                r#"{"type": "image", "content": "image_url"}, "#,
                r#"{"type": "links", "content": ["link_url_1", "link_url_2"]}]}]}"#
            )
        );
    }

    #[test]
    fn test_feed_to_text_joins_items_without_space() {
        let empty = Item::default();
        let feed = Feed::new(vec![empty.clone(), empty]);
        assert_eq!(
            to_text(&feed).unwrap(),
            concat!(
                r#"{"feed": ["item": {"title": null, "link": null, "description": []},"#,
                r#""item": {"title": null, "link": null, "description": []}]}"#
            )
        );
    }

    #[test]
    fn test_to_text_escapes_control_characters() {
        let feed = Feed::new(vec![Item {
            title: Some("line\nbreak \"quoted\"".into()),
            link: None,
            description: vec![],
        }]);
        assert_eq!(
            to_text(&feed).unwrap(),
            r#"{"feed": ["item": {"title": "line\nbreak \"quoted\"", "link": null, "description": []}]}"#
        );
    }

    #[test]
    fn test_dict_round_trip_preserves_block_classification() {
        let blocks = crate::feed::description::decompose(
            "<p>text</p><div><img src=\"i.png\"><ul><li><a href=\"l\">l</a></li></ul></div>",
        );
        let dict = to_dict(&Feed::new(vec![Item {
            title: None,
            link: None,
            description: blocks.clone(),
        }]));
        let encoded = dict["feed"][0]["description"].as_array().unwrap();
        assert_eq!(encoded.len(), blocks.len());
        for (value, block) in encoded.iter().zip(&blocks) {
            assert_eq!(value["type"], block.kind());
        }
        assert_eq!(encoded[2]["content"], json!(["l"]));
    }
}
