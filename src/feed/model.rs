use serde::Serialize;

/// A parsed feed: the ordered items found under the channel element.
///
/// Nothing else from the source document is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feed {
    pub items: Vec<Item>,
}

impl Feed {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One `<item>` of the feed.
///
/// `title` and `link` are `None` when the item has no such element (or the
/// element carries no text). `description` is always present and may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Item {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Vec<DescriptionBlock>,
}

/// A classified fragment of an item's HTML description.
///
/// Serializes as `{"type": "<kind>", "content": <content>}`, which is the
/// shape clients of `/feed/read` consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum DescriptionBlock {
    /// Whitespace-normalized paragraph text. Never blank.
    Text(String),
    /// Image URL taken from an `<img src>`.
    Image(String),
    /// `href`s of the anchors inside one `<ul>`, possibly empty.
    Links(Vec<String>),
}

impl DescriptionBlock {
    /// The name used for the `type` key when serialized.
    pub fn kind(&self) -> &'static str {
        match self {
            DescriptionBlock::Text(_) => "text",
            DescriptionBlock::Image(_) => "image",
            DescriptionBlock::Links(_) => "links",
        }
    }
}
