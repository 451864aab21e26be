//! Consumer-side title search and display helpers.
//!
//! # Responsibility
//! - Filter a note sequence by case-insensitive title substring.
//! - Provide placeholder and preview text for list/detail rendering.
//!
//! # Invariants
//! - Results keep the input order.
//! - An empty search term matches every note.

use crate::model::note::Note;
use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const PREVIEW_MAX_CHARS: usize = 100;
const UNTITLED_PLACEHOLDER: &str = "(No Title)";
const EMPTY_CONTENT_PLACEHOLDER: &str = "(No Content)";

/// Title search result with the counts shown next to the list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSearch<'a> {
    /// Matching notes in store order.
    pub items: Vec<&'a Note>,
    /// Number of notes searched.
    pub total: usize,
}

impl TitleSearch<'_> {
    pub fn matching(&self) -> usize {
        self.items.len()
    }
}

/// Filters `notes` whose title contains `term`, ignoring case.
pub fn search_by_title<'a>(notes: &'a [Note], term: &str) -> TitleSearch<'a> {
    let needle = term.to_lowercase();
    let items = notes
        .iter()
        .filter(|note| note.title.to_lowercase().contains(needle.as_str()))
        .collect();
    TitleSearch {
        items,
        total: notes.len(),
    }
}

/// Title, or a placeholder when it is empty.
pub fn display_title(note: &Note) -> &str {
    if note.title.is_empty() {
        UNTITLED_PLACEHOLDER
    } else {
        note.title.as_str()
    }
}

/// Content, or a placeholder when it is empty.
pub fn display_content(note: &Note) -> &str {
    if note.content.is_empty() {
        EMPTY_CONTENT_PLACEHOLDER
    } else {
        note.content.as_str()
    }
}

/// Single-line preview: whitespace collapsed, first 100 chars kept.
///
/// Returns `None` for blank content.
pub fn preview_text(content: &str) -> Option<String> {
    let normalized = WHITESPACE_RE.replace_all(content, " ");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return None;
    }
    let mut preview = trimmed.chars().take(PREVIEW_MAX_CHARS).collect::<String>();
    if trimmed.chars().count() > PREVIEW_MAX_CHARS {
        preview.push_str("...");
    }
    Some(preview)
}
