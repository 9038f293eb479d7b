// File: ./src/export/markdown.rs
use crate::analyzer::dates::{format_date_it, format_date_time_it, format_long_date_it, format_time_it};
use crate::model::{AnalysisRecord, CalendarEvent, NextStep, Replies, Task};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

pub fn tasks_markdown(tasks: &[Task], tz: Tz) -> String {
    if tasks.is_empty() {
        return "*Nessun task*".to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    for task in tasks {
        lines.push(format!("### {} {}", task.priority.emoji(), task.title));
        lines.push(String::new());
        lines.push(format!("- **Priorità:** {}", task.priority));
        if let Some(due) = task.due_date {
            lines.push(format!("- **Scadenza:** {}", format_date_it(due, tz)));
            if let Some(reason) = &task.due_date_reason {
                lines.push(format!("  - *{}*", reason));
            }
        }
        if !task.tags.is_empty() {
            let tags: Vec<String> = task.tags.iter().map(|t| format!("`{}`", t)).collect();
            lines.push(format!("- **Tag:** {}", tags.join(", ")));
        }
        if !task.description.is_empty() {
            lines.push(format!("- **Note:** {}", task.description));
        }
        lines.push(String::new());
    }
    lines.join("\n")
}

pub fn replies_markdown(replies: &Replies) -> String {
    [
        ("📝 Formale", &replies.formal),
        ("💬 Cordiale", &replies.cordial),
        ("⚡ Sintetica", &replies.terse),
    ]
    .iter()
    .map(|(heading, body)| format!("### {}\n```\n{}\n```", heading, body))
    .collect::<Vec<_>>()
    .join("\n\n")
}

pub fn event_markdown(event: &CalendarEvent, tz: Tz) -> String {
    let mut lines = vec![
        format!("**{}**", event.title),
        String::new(),
        format!("- 📅 **Data:** {}", format_long_date_it(event.start_date, tz)),
        format!(
            "- ⏰ **Orario:** {} - {}",
            format_time_it(event.start_date, tz),
            format_time_it(event.end_date, tz)
        ),
    ];
    if let Some(location) = &event.location {
        lines.push(format!("- 📍 **Luogo:** {}", location));
    }
    if !event.is_confirmed {
        lines.push(String::new());
        lines.push("⚠️ *Data/orario da confermare*".to_string());
    }
    if !event.notes.is_empty() {
        lines.push(String::new());
        lines.push("**Note:**".to_string());
        lines.push(event.notes.clone());
    }
    lines.join("\n")
}

pub fn next_step_markdown(step: &NextStep) -> String {
    let mut lines = vec![format!("**🎯 {}**", step.action), String::new()];
    if !step.checklist.is_empty() {
        lines.push("Checklist:".to_string());
        lines.extend(step.checklist.iter().map(|item| format!("- [ ] {}", item)));
    }
    lines.join("\n")
}

/// Complete report for a stored analysis, stamped with `generated_at`.
pub fn analysis_markdown(record: &AnalysisRecord, tz: Tz, generated_at: DateTime<Utc>) -> String {
    let result = &record.result;
    let mut sections: Vec<String> = vec![
        "# Analisi Messaggio".to_string(),
        format!("*Generato il {}*", format_date_time_it(generated_at, tz)),
    ];
    if let Some(person) = &record.input.person_name {
        sections.push(format!("**Da:** {}", person));
    }
    sections.push(String::new());

    sections.push("## Messaggio Originale".to_string());
    sections.push("```".to_string());
    sections.push(record.input.raw_text.clone());
    sections.push("```".to_string());
    sections.push(String::new());

    sections.push("## Task".to_string());
    if result.tasks.is_empty() {
        sections.push("*Nessun task rilevato*".to_string());
    } else {
        sections.push(tasks_markdown(&result.tasks, tz));
    }
    sections.push(String::new());

    sections.push("## Risposte Pronte".to_string());
    sections.push(replies_markdown(&result.replies));
    sections.push(String::new());

    if let Some(event) = &result.event {
        sections.push("## Evento Calendario".to_string());
        sections.push(event_markdown(event, tz));
        sections.push(String::new());
    }

    sections.push("## Prossimo Passo".to_string());
    sections.push(next_step_markdown(&result.next_step));
    sections.join("\n")
}
