//! Splits an item's HTML description into typed blocks.
//!
//! Only the top-level nodes of the fragment are classified, using a fixed
//! grammar:
//!
//! - `<p>` becomes a [`DescriptionBlock::Text`] with its flattened, normalized text
//! - `<div>` is scanned at any depth: every `<img src>` becomes an
//!   [`DescriptionBlock::Image`], then every `<ul>` becomes one
//!   [`DescriptionBlock::Links`] holding the `href`s of its anchors
//! - anything else is ignored
use scraper::{ElementRef, Html};

use super::model::DescriptionBlock;

const PARAGRAPH_TAG: &str = "p";
const CONTAINER_TAG: &str = "div";
const IMAGE_TAG: &str = "img";
const LINKS_TAG: &str = "ul";
const ANCHOR_TAG: &str = "a";
const IMAGE_URL_ATTR: &str = "src";
const LINK_REF_ATTR: &str = "href";

/// Decomposes description markup into blocks, in document order.
pub fn decompose(markup: &str) -> Vec<DescriptionBlock> {
    let fragment = Html::parse_fragment(markup);
    let mut blocks = Vec::new();

    for child in fragment.root_element().children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            PARAGRAPH_TAG => {
                let raw: String = child.text().collect();
                if let Some(text) = normalize_paragraph(&raw) {
                    blocks.push(DescriptionBlock::Text(text));
                }
            }
            CONTAINER_TAG => decompose_container(child, &mut blocks),
            _ => {}
        }
    }

    tracing::trace!(blocks = blocks.len(), "Decomposed description");
    blocks
}

/// Normalizes flattened paragraph text.
///
/// Newlines are removed, non-breaking spaces and tabs become plain spaces,
/// and leading whitespace is stripped. Trailing whitespace is kept.
/// Returns `None` when nothing but whitespace remains.
pub fn normalize_paragraph(raw: &str) -> Option<String> {
    let normalized: String = raw
        .chars()
        .filter(|&c| c != '\n')
        .map(|c| match c {
            '\u{a0}' | '\t' => ' ',
            other => other,
        })
        .collect();

    let normalized = normalized.trim_start();
    if normalized.trim_end().is_empty() {
        None
    } else {
        Some(normalized.to_owned())
    }
}

/// Images first, then one links block per list, each in document order.
fn decompose_container(container: ElementRef<'_>, blocks: &mut Vec<DescriptionBlock>) {
    blocks.extend(
        descendant_elements(container, IMAGE_TAG)
            .filter_map(|img| img.value().attr(IMAGE_URL_ATTR))
            .map(|src| DescriptionBlock::Image(src.to_owned())),
    );

    for list in descendant_elements(container, LINKS_TAG) {
        let hrefs = descendant_elements(list, ANCHOR_TAG)
            .filter_map(|a| a.value().attr(LINK_REF_ATTR))
            .map(str::to_owned)
            .collect();
        blocks.push(DescriptionBlock::Links(hrefs));
    }
}

fn descendant_elements<'a>(
    element: ElementRef<'a>,
    tag: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> {
    element
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |e| e.value().name() == tag)
}
