//! Prefix highlighting for candidate strings.
//!
//! The typed prefix is shown as-is and the remainder of the candidate is
//! wrapped in `<b>`. The candidate is assumed to start with the prefix; when
//! it does not, the remainder is still cut purely by character count, so the
//! output never fails and stays well-formed.

use serde::{Deserialize, Serialize};

use crate::dom::{Element, Node, escape_text};

/// Case handling when the leading part of a candidate is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightCase {
    /// The literal typed prefix is shown.
    #[default]
    Sensitive,
    /// When the candidate matches the prefix ignoring case, the candidate's
    /// own spelling of that part is shown instead of the typed one.
    Insensitive,
}

/// A candidate split into the displayed prefix and the emphasized remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub head: String,
    pub tail: String,
}

/// Split `candidate` after `prefix.chars().count()` characters.
pub fn highlight(prefix: &str, candidate: &str, case: HighlightCase) -> Highlight {
    let prefix_chars = prefix.chars().count();
    let split = candidate
        .char_indices()
        .nth(prefix_chars)
        .map(|(idx, _)| idx)
        .unwrap_or(candidate.len());
    let (lead, tail) = candidate.split_at(split);

    let head = match case {
        HighlightCase::Insensitive if lead.to_lowercase() == prefix.to_lowercase() => {
            lead.to_string()
        }
        _ => prefix.to_string(),
    };

    Highlight {
        head,
        tail: tail.to_string(),
    }
}

impl Highlight {
    /// Markup form: escaped head followed by the escaped tail inside `<b>`.
    pub fn to_markup(&self) -> String {
        format!(
            "{}<b>{}</b>",
            escape_text(&self.head),
            escape_text(&self.tail)
        )
    }

    pub fn into_nodes(self) -> Vec<Node> {
        vec![
            Node::text(self.head),
            Element::new("b").with_text(self.tail).into(),
        ]
    }
}
