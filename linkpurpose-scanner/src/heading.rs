//! Nearest-heading lookup.
//!
//! A single pre-order walk numbers every node and records where the
//! `h1`..`h6` elements sit. The nearest heading for a node is then the last
//! heading whose start tag is at or before the node's own, found by binary
//! search. Enclosing headings and the node itself are covered by the same
//! rule since both start no later than the node.

use crate::text::collapsed_text;
use scraper::{ElementRef, Html};
use ego_tree::NodeId;
use std::collections::HashMap;

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

pub fn is_heading(element: ElementRef<'_>) -> bool {
    HEADING_TAGS.contains(&element.value().name())
}

pub struct HeadingIndex {
    order: HashMap<NodeId, usize>,
    headings: Vec<(usize, String)>,
}

impl HeadingIndex {
    pub fn new(document: &Html) -> Self {
        let mut order = HashMap::new();
        let mut headings = Vec::new();

        for (position, node) in document.tree.root().descendants().enumerate() {
            order.insert(node.id(), position);
            if let Some(element) = ElementRef::wrap(node)
                && is_heading(element)
            {
                headings.push((position, collapsed_text(element)));
            }
        }

        Self { order, headings }
    }

    /// Text of the closest heading at or before `element` in document order.
    pub fn nearest_heading(&self, element: ElementRef<'_>) -> Option<&str> {
        let position = *self.order.get(&element.id())?;
        let preceding = self.headings.partition_point(|(start, _)| *start <= position);
        preceding
            .checked_sub(1)
            .map(|idx| self.headings[idx].1.as_str())
    }

    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }
}
