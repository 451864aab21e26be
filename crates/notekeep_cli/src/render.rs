//! Plain-text rendering of notes for terminal output.

use chrono::DateTime;
use notekeep_core::{display_content, display_title, preview_text, Note, TitleSearch};
use std::io::{self, Write};

/// `createdAt` as e.g. `January 1, 2024 12:00 AM` (UTC).
///
/// Unparseable values are shown as stored.
pub fn format_created_at(raw: &str) -> String {
    if raw.is_empty() {
        return "(unknown date)".to_string();
    }
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => parsed
            .naive_utc()
            .format("%B %-d, %Y %-I:%M %p")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn write_list(out: &mut impl Write, result: &TitleSearch<'_>) -> io::Result<()> {
    writeln!(out, "Total notes in store: {}", result.total)?;
    writeln!(out, "Notes matching search: {}", result.matching())?;
    for note in &result.items {
        writeln!(out)?;
        writeln!(out, "{}  {}", note.id, display_title(note))?;
        writeln!(
            out,
            "    {}",
            preview_text(&note.content).as_deref().unwrap_or("(No Content)")
        )?;
        writeln!(out, "    {}", format_created_at(&note.created_at))?;
    }
    Ok(())
}

pub fn write_note(out: &mut impl Write, note: &Note) -> io::Result<()> {
    writeln!(out, "{}", display_title(note))?;
    writeln!(out, "id: {}", note.id)?;
    writeln!(out, "created: {}", format_created_at(&note.created_at))?;
    writeln!(out)?;
    writeln!(out, "{}", display_content(note))
}
