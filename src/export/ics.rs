// File: ./src/export/ics.rs
use crate::export::slugify;
use crate::model::{CalendarEvent, Task};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, Component, Event, EventLike, EventStatus};
use uuid::Uuid;

pub const PRODID: &str = "-//Messaggio Azione//IT//1.0";

/// Serializes a calendar with our PRODID in place of the library default, plus
/// CALSCALE and METHOD. Existing CALSCALE/METHOD lines are replaced, not repeated.
fn finish(calendar: Calendar) -> String {
    let ics = calendar.to_string();
    let mut lines: Vec<String> = Vec::new();
    for line in ics.split("\r\n") {
        if line.starts_with("PRODID:") {
            lines.push(format!("PRODID:{}", PRODID));
            lines.push("CALSCALE:GREGORIAN".to_string());
            lines.push("METHOD:PUBLISH".to_string());
        } else if line.starts_with("CALSCALE:") || line.starts_with("METHOD:") {
            continue;
        } else {
            lines.push(line.to_string());
        }
    }
    lines.join("\r\n")
}

/// VCALENDAR with a single timed VEVENT. Unconfirmed events are TENTATIVE.
pub fn event_to_ics(event: &CalendarEvent, now: DateTime<Utc>) -> String {
    let mut vevent = Event::new();
    vevent.uid(&Uuid::new_v4().to_string());
    vevent.timestamp(now);
    vevent.starts(event.start_date);
    vevent.ends(event.end_date);
    vevent.summary(&event.title);
    if let Some(location) = &event.location {
        vevent.location(location);
    }
    if !event.notes.is_empty() {
        vevent.description(&event.notes);
    }
    vevent.status(if event.is_confirmed {
        EventStatus::Confirmed
    } else {
        EventStatus::Tentative
    });

    let mut calendar = Calendar::new();
    calendar.push(vevent.done());
    finish(calendar)
}

fn task_description(task: &Task) -> String {
    let tags: Vec<String> = task.tags.iter().map(|t| t.to_string()).collect();
    let mut lines: Vec<String> = Vec::new();
    if !task.description.is_empty() {
        lines.push(task.description.clone());
    }
    lines.push(format!("Priorità: {}", task.priority));
    if let Some(reason) = &task.due_date_reason {
        lines.push(format!("Scadenza: {}", reason));
    }
    if !tags.is_empty() {
        lines.push(format!("Tag: {}", tags.join(", ")));
    }
    lines.join("\n")
}

/// All-day VEVENT on the task's due day (in `tz`). None without a due date.
pub fn task_to_ics(task: &Task, tz: Tz, now: DateTime<Utc>) -> Option<String> {
    let due = task.due_date?;

    let mut vevent = Event::new();
    vevent.uid(&Uuid::new_v4().to_string());
    vevent.timestamp(now);
    vevent.all_day(due.with_timezone(&tz).date_naive());
    vevent.summary(&format!("📋 {}", task.title));
    vevent.description(&task_description(task));
    vevent.priority(task.priority.ical_value());

    let mut calendar = Calendar::new();
    calendar.push(vevent.done());
    Some(finish(calendar))
}

/// `(file name, content)` for every task with a due date.
pub fn tasks_to_ics_files(tasks: &[Task], tz: Tz, now: DateTime<Utc>) -> Vec<(String, String)> {
    tasks
        .iter()
        .filter_map(|task| {
            task_to_ics(task, tz, now)
                .map(|content| (format!("task-{}.ics", slugify(&task.title)), content))
        })
        .collect()
}
