//! Minimal XML element tree for navigating feed documents.
//!
//! The tree is built from `quick-xml` events. Only what the feed parser needs
//! is kept: element names, attributes, and text/CDATA content in document
//! order. Comments, processing instructions and the DOCTYPE are dropped.
use std::borrow::Cow;

use quick_xml::encoding::Decoder;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Name of the element that holds the feed's `<item>`s.
pub const ITEMS_ROOT_TAG: &str = "channel";

/// SEC-003: Maximum element nesting accepted in a feed document.
/// Deeper documents are rejected before the tree gets built.
const MAX_DOCUMENT_DEPTH: usize = 256;

/// Errors that make a document unusable as a feed.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The tokenizer rejected the input (bad syntax, mismatched tags, bad entity, bad encoding).
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// The input ended while an element was still open.
    #[error("Unclosed element <{0}>")]
    UnclosedElement(String),

    /// The input contains no element at all.
    #[error("Document has no root element")]
    MissingRoot,

    /// Elements or text found after the root element closed.
    #[error("Unexpected content after the root element")]
    TrailingContent,

    /// SEC-003: nesting depth exceeds safety limit.
    #[error("Document nesting depth exceeds maximum of {0} levels")]
    MaxDepthExceeded(usize),
}

/// A child of an [`XmlElement`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Unescaped character data (text or CDATA section).
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlElement {
    fn new(name: String, attributes: Vec<(String, String)>) -> Self {
        Self {
            name,
            attributes,
            children: Vec::new(),
        }
    }

    /// Qualified tag name, prefix included.
    pub fn name(&self) -> &str {
        &self.name
    }

    #[cfg(test)]
    fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct child elements, in document order.
    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// Direct child elements named `name`, in document order.
    pub fn find_children<'a, 'n>(
        &'a self,
        name: &'n str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'n
    where
        'a: 'n,
    {
        self.child_elements().filter(move |e| e.name == name)
    }

    /// First direct child element named `name`.
    pub fn find_child(&self, name: &str) -> Option<&XmlElement> {
        self.child_elements().find(|e| e.name == name)
    }

    /// First element named `name` below this one, in document (pre-)order.
    /// The element itself is not considered.
    pub fn find_descendant(&self, name: &str) -> Option<&XmlElement> {
        for child in self.child_elements() {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find_descendant(name) {
                return Some(found);
            }
        }
        None
    }

    /// Concatenated direct text of the element, or `None` if it has no text nodes.
    ///
    /// Text belonging to child elements is not included.
    pub fn text(&self) -> Option<String> {
        let mut text: Option<String> = None;
        for node in &self.children {
            if let XmlNode::Text(chunk) = node {
                text.get_or_insert_with(String::new).push_str(chunk);
            }
        }
        text
    }

    fn take_child(self, name: &str) -> Option<XmlElement> {
        self.children.into_iter().find_map(|node| match node {
            XmlNode::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }
}

/// A parsed document: exactly one root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    #[cfg(test)]
    fn root(&self) -> &XmlElement {
        &self.root
    }

    pub fn into_root(self) -> XmlElement {
        self.root
    }
}

/// Parses `bytes` as an XML document.
///
/// # Errors
///
/// Returns a [`DocumentError`] for any syntax violation: unclosed or
/// mismatched tags, truncated input, undefined entities, bytes that are
/// invalid in the document's encoding, a missing root element or content
/// after it.
///
/// The encoding comes from the byte order mark or the XML declaration and
/// defaults to UTF-8. Line endings in character data are folded to `\n`.
///
/// # Security
///
/// SEC-002: `quick-xml` (0.37) never expands `<!ENTITY>` declarations; only the
/// five predefined entities and character references are resolved, so custom
/// entities surface as parse errors rather than being fetched or expanded.
pub fn parse_document(bytes: &[u8]) -> Result<XmlDocument, DocumentError> {
    let mut reader = Reader::from_reader(bytes);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(DocumentError::XmlParse(format!(
                    "{} at byte {}",
                    e,
                    reader.error_position()
                )))
            }
        };

        match event {
            Event::Start(e) => {
                if root.is_some() {
                    return Err(DocumentError::TrailingContent);
                }
                if stack.len() >= MAX_DOCUMENT_DEPTH {
                    return Err(DocumentError::MaxDepthExceeded(MAX_DOCUMENT_DEPTH));
                }
                stack.push(open_element(&e, &reader)?);
            }
            Event::Empty(e) => {
                if root.is_some() {
                    return Err(DocumentError::TrailingContent);
                }
                let element = open_element(&e, &reader)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                // quick-xml already checks that end names match their start tags
                let element = stack.pop().ok_or_else(|| {
                    DocumentError::XmlParse("closing tag without matching start".to_owned())
                })?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(e) => {
                let text = decode_text(reader.decoder(), &e)?;
                push_text(&mut stack, &root, text)?;
            }
            Event::CData(e) => {
                let raw = reader
                    .decoder()
                    .decode(&e)
                    .map_err(|e| DocumentError::XmlParse(e.to_string()))?;
                push_text(&mut stack, &root, normalize_line_endings(&raw).into_owned())?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(DocumentError::UnclosedElement(open.name.clone()));
    }

    root.map(|root| XmlDocument { root })
        .ok_or(DocumentError::MissingRoot)
}

/// Parses `bytes` and returns the items container: the first direct child of
/// the root element named [`ITEMS_ROOT_TAG`].
///
/// A well-formed document without such an element yields `Ok(None)`; callers
/// treat that as a feed with zero items.
pub fn locate_items_root(bytes: &[u8]) -> Result<Option<XmlElement>, DocumentError> {
    let document = parse_document(bytes)?;
    let channel = document.into_root().take_child(ITEMS_ROOT_TAG);
    if channel.is_none() {
        tracing::debug!("Document has no <{}> element", ITEMS_ROOT_TAG);
    }
    Ok(channel)
}

fn open_element(e: &BytesStart<'_>, reader: &Reader<&[u8]>) -> Result<XmlElement, DocumentError> {
    let decoder = reader.decoder();
    let name = decoder
        .decode(e.name().as_ref())
        .map_err(|e| DocumentError::XmlParse(e.to_string()))?
        .into_owned();

    let mut attributes = Vec::new();
    for attr_result in e.attributes() {
        let attr = attr_result.map_err(|e| DocumentError::XmlParse(e.to_string()))?;
        let key = decoder
            .decode(attr.key.as_ref())
            .map_err(|e| DocumentError::XmlParse(e.to_string()))?
            .into_owned();
        let value = decode_text(decoder, &attr.value)?;
        attributes.push((key, value));
    }

    Ok(XmlElement::new(name, attributes))
}

/// Decodes raw character data, folds line endings, then resolves references.
///
/// Folding comes first so that an escaped `&#13;` survives as a carriage return.
fn decode_text(decoder: Decoder, raw: &[u8]) -> Result<String, DocumentError> {
    let decoded = decoder
        .decode(raw)
        .map_err(|e| DocumentError::XmlParse(e.to_string()))?;
    let normalized = normalize_line_endings(&decoded);
    let text = unescape(&normalized).map_err(|e| DocumentError::XmlParse(e.to_string()))?;
    Ok(text.into_owned())
}

/// `\r\n` and lone `\r` become `\n` (XML 1.0 end-of-line handling).
fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => *root = Some(element),
    }
}

fn push_text(
    stack: &mut [XmlElement],
    root: &Option<XmlElement>,
    text: String,
) -> Result<(), DocumentError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(XmlNode::Text(text));
            Ok(())
        }
        // Whitespace (and a byte order mark) around the root element is allowed
        None if text.trim_matches(is_blank).is_empty() => Ok(()),
        None if root.is_some() => Err(DocumentError::TrailingContent),
        None => Err(DocumentError::XmlParse(
            "text outside of the root element".to_owned(),
        )),
    }
}

fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}
