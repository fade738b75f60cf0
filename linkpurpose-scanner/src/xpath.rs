//! Positional XPath synthesis.
//!
//! Paths are relative to `<body>`: the walk stops below it, so a link at
//! `<body><nav><a>` becomes `//nav/a`. Same-tag siblings are disambiguated
//! by 1-based document-order position; a tag that is alone among its
//! siblings gets no index.

use scraper::ElementRef;

pub fn xpath_of(element: ElementRef<'_>) -> String {
    let mut components = Vec::new();
    let mut current = element;

    loop {
        components.push(step(current));

        match current.parent().and_then(ElementRef::wrap) {
            Some(parent) if parent.value().name() == "body" => break,
            Some(parent) => current = parent,
            // Reached the document node without meeting <body>
            None => break,
        }
    }

    components.reverse();
    format!("//{}", components.join("/"))
}

fn step(element: ElementRef<'_>) -> String {
    let name = element.value().name();
    let same_tag = |node: &ElementRef<'_>| node.value().name() == name;

    let preceding = element
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .filter(same_tag)
        .count();
    let following = element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .any(|node| same_tag(&node));

    if preceding > 0 || following {
        format!("{}[{}]", name, preceding + 1)
    } else {
        name.to_string()
    }
}
