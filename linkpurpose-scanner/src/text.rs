use scraper::ElementRef;

/// All descendant text of `element`, with runs of whitespace collapsed to a
/// single space and both ends trimmed.
pub fn collapsed_text(element: ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
