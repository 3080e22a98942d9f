use super::description::decompose;
use super::document::XmlElement;
use super::model::{Feed, Item};

const ITEM_TAG: &str = "item";
const TITLE_TAG: &str = "title";
const LINK_TAG: &str = "link";
const DESCRIPTION_TAG: &str = "description";

/// Maps the items container into a [`Feed`].
///
/// Every direct `<item>` child becomes one [`Item`], in document order.
/// A missing container yields an empty feed.
pub fn parse_feed(items_root: Option<&XmlElement>) -> Feed {
    let Some(root) = items_root else {
        return Feed::default();
    };

    let items: Vec<Item> = root.find_children(ITEM_TAG).map(parse_item).collect();
    tracing::debug!(items = items.len(), "Parsed feed items");
    Feed::new(items)
}

/// Maps one `<item>` element into an [`Item`].
///
/// `title` and `link` are the raw text of the first matching descendant.
/// An item without a `<description>` (or with an empty one) gets an empty
/// description rather than failing the whole feed.
pub fn parse_item(item: &XmlElement) -> Item {
    let title = item.find_descendant(TITLE_TAG).and_then(XmlElement::text);
    let link = item.find_descendant(LINK_TAG).and_then(XmlElement::text);
    let description = item
        .find_descendant(DESCRIPTION_TAG)
        .and_then(XmlElement::text)
        .map(|markup| decompose(&markup))
        .unwrap_or_default();

    Item {
        title,
        link,
        description,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::document::locate_items_root;
    use crate::feed::model::DescriptionBlock;
    use pretty_assertions::assert_eq;

    fn channel(xml: &str) -> XmlElement {
        locate_items_root(xml.as_bytes()).unwrap().unwrap()
    }

    #[test]
    fn test_parse_feed_preserves_order() {
        let root = channel(
            r#"<rss><channel>
                <item><title>1</title></item>
                <item><title>2</title></item>
                <item><title>3</title></item>
                <item><title>4</title></item>
            </channel></rss>"#,
        );
        let feed = parse_feed(Some(&root));
        let titles: Vec<_> = feed
            .items
            .iter()
            .map(|i| i.title.as_deref().unwrap())
            .collect();
        assert_eq!(titles, vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_parse_feed_without_root_is_empty() {
        assert!(parse_feed(None).is_empty());
    }

    #[test]
    fn test_parse_feed_ignores_non_item_children() {
        let root = channel(
            r#"<rss><channel>
                <title>Channel title</title>
                <image><url>https://example.com/logo.png</url></image>
                <item><title>Only</title></item>
            </channel></rss>"#,
        );
        assert_eq!(parse_feed(Some(&root)).len(), 1);
    }

    #[test]
    fn test_parse_item_fields() {
        let root = channel(
            r#"<rss><channel><item>
                <title>Title</title>
                <link>https://example.com/post</link>
                <description><![CDATA[<p>Hello</p><div><img src="https://example.com/a.png"></div>]]></description>
            </item></channel></rss>"#,
        );
        let feed = parse_feed(Some(&root));
        assert_eq!(
            feed.items,
            vec![Item {
                title: Some("Title".into()),
                link: Some("https://example.com/post".into()),
                description: vec![
                    DescriptionBlock::Text("Hello".into()),
                    DescriptionBlock::Image("https://example.com/a.png".into()),
                ],
            }]
        );
    }

    #[test]
    fn test_parse_item_missing_title_and_link() {
        let root = channel(
            r#"<rss><channel><item><description>&lt;p&gt;Body&lt;/p&gt;</description></item></channel></rss>"#,
        );
        let item = &parse_feed(Some(&root)).items[0];
        assert_eq!(item.title, None);
        assert_eq!(item.link, None);
        assert_eq!(item.description, vec![DescriptionBlock::Text("Body".into())]);
    }

    #[test]
    fn test_parse_item_text_is_verbatim() {
        let root = channel(
            r#"<rss><channel><item><title>  Spaced &amp; escaped  </title></item></channel></rss>"#,
        );
        let item = &parse_feed(Some(&root)).items[0];
        assert_eq!(item.title.as_deref(), Some("  Spaced & escaped  "));
    }

    #[test]
    fn test_parse_item_missing_description_is_empty() {
        let root = channel(r#"<rss><channel><item><title>t</title></item></channel></rss>"#);
        let item = &parse_feed(Some(&root)).items[0];
        assert!(item.description.is_empty());

        let root = channel(r#"<rss><channel><item><description/></item></channel></rss>"#);
        let item = &parse_feed(Some(&root)).items[0];
        assert!(item.description.is_empty());
    }

    #[test]
    fn test_nested_items_are_not_collected() {
        let root = channel(
            r#"<rss><channel><group><item><title>nested</title></item></group></channel></rss>"#,
        );
        assert!(parse_feed(Some(&root)).is_empty());
    }
}
