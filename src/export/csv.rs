// File: ./src/export/csv.rs
use crate::model::Task;
use chrono_tz::Tz;

pub const CSV_HEADER: &str = "Titolo,Priorità,Scadenza,Tag,Note";

/// Byte order mark some spreadsheet apps need to detect UTF-8.
pub const UTF8_BOM: &str = "\u{FEFF}";

/// Quotes a field containing a comma, quote or line break; inner quotes are doubled.
pub fn escape_field(text: &str) -> String {
    if text.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

fn task_row(task: &Task, tz: Tz) -> String {
    let due = task
        .due_date
        .map(|d| d.with_timezone(&tz).format("%d/%m/%Y").to_string())
        .unwrap_or_default();
    let tags: Vec<String> = task.tags.iter().map(|t| t.to_string()).collect();
    let notes = match &task.due_date_reason {
        Some(reason) => format!("{} ({})", task.description, reason),
        None => task.description.clone(),
    };

    [
        escape_field(&task.title),
        task.priority.to_string(),
        due,
        tags.join("; "),
        escape_field(&notes),
    ]
    .join(",")
}

/// One header line plus one row per task, `\n`-separated, no trailing newline.
pub fn tasks_to_csv(tasks: &[Task], tz: Tz) -> String {
    std::iter::once(CSV_HEADER.to_string())
        .chain(tasks.iter().map(|t| task_row(t, tz)))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn with_bom(content: &str) -> String {
    format!("{}{}", UTF8_BOM, content)
}
