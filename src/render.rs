//! Builds the results list for one query.
//!
//! Layout (one `<ul>`, every row a sibling `<li>`):
//!
//! ```text
//! header   | English               | toki pona
//! title    | <typed><b>rest</b>    | original translation
//! similar  | alternative english   | alternative toki pona
//! ...
//! ```
//!
//! Title and similar rows of the same card share a `data-card` index.

use crate::config::ColumnLabels;
use crate::dom::{Element, Node};
use crate::highlight::{HighlightCase, highlight};
use crate::search::SearchResult;

#[derive(Debug, Clone)]
pub struct ResultRenderer {
    labels: ColumnLabels,
    case: HighlightCase,
}

impl ResultRenderer {
    pub fn new(labels: ColumnLabels, case: HighlightCase) -> Self {
        Self { labels, case }
    }

    /// Render results in the order given. `None` when there is nothing to
    /// show, so the container stays empty (no header row).
    pub fn render(&self, prefix: &str, results: &[SearchResult]) -> Option<Element> {
        if results.is_empty() {
            return None;
        }

        let mut list = Element::new("ul").with_class("results").with_child(row(
            "header",
            None,
            vec![Node::text(self.labels.source.clone())],
            &self.labels.target,
        ));

        for (card, result) in results.iter().enumerate() {
            let title = highlight(prefix, &result.english_search, self.case);
            list.push(row(
                "title",
                Some(card),
                title.into_nodes(),
                &result.original_translation_string,
            ));

            for similar in &result.similar {
                list.push(row(
                    "similar",
                    Some(card),
                    vec![Node::text(similar.english.clone())],
                    &similar.toki_pona_string,
                ));
            }
        }

        Some(list)
    }
}

fn row(kind: &str, card: Option<usize>, source: Vec<Node>, target: &str) -> Element {
    let mut li = Element::new("li").with_class(&format!("row {kind}"));
    if let Some(card) = card {
        li.set_attr("data-card", card.to_string());
    }
    li.with_child(
        Element::new("span")
            .with_class("cell source")
            .with_children(source),
    )
    .with_child(
        Element::new("span")
            .with_class("cell target")
            .with_text(target),
    )
}
