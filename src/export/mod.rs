// File: ./src/export/mod.rs
// Renders stored analyses as CSV, iCalendar and Markdown documents.
pub mod csv;
pub mod ics;
pub mod markdown;

use strum::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
#[strum(ascii_case_insensitive)]
pub enum ExportFormat {
    #[strum(to_string = "csv")]
    Csv,
    /// The calendar event of an analysis.
    #[strum(to_string = "ics")]
    Ics,
    #[strum(to_string = "md", serialize = "markdown")]
    Markdown,
    /// One all-day event per task with a due date.
    #[strum(to_string = "tasks-ics")]
    TasksIcs,
}

/// Lowercase ASCII slug for file names: Italian accents folded, every other run of
/// non-alphanumerics collapsed to "-", at most 30 chars.
pub fn slugify(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'à' | 'á' | 'â' | 'ã' => 'a',
            'è' | 'é' | 'ê' | 'ë' => 'e',
            'ì' | 'í' | 'î' | 'ï' => 'i',
            'ò' | 'ó' | 'ô' | 'õ' => 'o',
            'ù' | 'ú' | 'û' | 'ü' => 'u',
            other => other,
        })
        .collect();

    let mut slug = String::with_capacity(folded.len());
    for c in folded.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }

    slug.trim_matches('-').chars().take(30).collect()
}
