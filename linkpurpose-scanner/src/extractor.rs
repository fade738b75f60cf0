use crate::error::{Result, ScanError};
use crate::heading::HeadingIndex;
use crate::record::{LinkContext, LinkRecord};
use crate::text::collapsed_text;
use crate::xpath::xpath_of;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use tracing::{debug, info};

static LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static link selector"));

/// Extract every `<a>` with a non-empty `href` from a rendered document, in
/// document order.
pub fn extract(html: &str) -> Result<Vec<LinkRecord>> {
    if html.trim().is_empty() {
        return Err(ScanError::MalformedDocument("document is empty".to_string()));
    }
    if !html.contains('<') {
        return Err(ScanError::MalformedDocument(
            "document contains no markup".to_string(),
        ));
    }

    let document = Html::parse_document(html);
    if !document.errors.is_empty() {
        debug!("Parser recovered from {} markup errors", document.errors.len());
    }

    let links = extract_from_document(&document);
    info!("Extracted {} links", links.len());
    Ok(links)
}

pub fn extract_from_document(document: &Html) -> Vec<LinkRecord> {
    let headings = HeadingIndex::new(document);
    debug!("Indexed {} headings", headings.len());

    document
        .select(&LINK_SELECTOR)
        .filter_map(|element| link_record(element, &headings))
        .collect()
}

fn link_record(element: ElementRef<'_>, headings: &HeadingIndex) -> Option<LinkRecord> {
    let attrs = element.value();
    let href = attrs.attr("href").filter(|href| !href.is_empty())?;

    let parent_text = element
        .parent()
        .and_then(ElementRef::wrap)
        .map(collapsed_text)
        .unwrap_or_default();

    let record = LinkRecord {
        element_html: element.html(),
        xpath: xpath_of(element),
        link_text: collapsed_text(element),
        url: href.to_string(),
        context: LinkContext {
            parent_text,
            section_heading: headings.nearest_heading(element).map(str::to_string),
            aria_label: attrs.attr("aria-label").map(str::to_string),
            aria_labelledby: attrs.attr("aria-labelledby").map(str::to_string),
            title: attrs.attr("title").map(str::to_string),
        },
        analysis: None,
    };

    debug!("Found link: {} -> {}", record.xpath, record.url);
    Some(record)
}
