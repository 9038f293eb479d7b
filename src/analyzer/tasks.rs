// File: ./src/analyzer/tasks.rs
use crate::analyzer::dates::parse_italian_date;
use crate::analyzer::intent::{IntentKind, IntentSet};
use crate::analyzer::{Clock, MessageContext, compile};
use crate::model::{ContextType, Priority, SourceType, Task, TaskTag};
use chrono::{DateTime, Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

const MIN_TITLE_CHARS: usize = 3;
const MAX_TITLE_CHARS: usize = 100;
const FOLLOW_UP_TITLE: &str = "Inviare risposta";
const GENERIC_TITLE: &str = "Valutare e rispondere al messaggio";

static REQUEST_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\b(?:puoi|potresti|mi\s+puoi)\s+(.+?)(?:\?|$|\.)",
        r"(?i)\b(?:mi\s+mandi|mi\s+invii)\s+(.+?)(?:\?|$|\.)",
        r"(?i)\b(?:serve|servirebbe)\s+(.+?)(?:\?|$|\.)",
        r"(?i)\bho\s+bisogno\s+di\s+(.+?)(?:\?|$|\.)",
        r"(?i)\b(?:fammi|fai)\s+(.+?)(?:\?|$|\.)",
    ]
    .iter()
    .map(|src| compile(src))
    .collect()
});

static NEEDS_RESPONSE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(fammi\s+sapere|rispondimi|aspetto|conferma)\b"));
static DEADLINE_WORDS: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\b(entro|scadenza|deadline)\b"));
static SOON_WORDS: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\b(presto|quando\s+puoi|appena)\b"));

static TAG_KEYWORDS: Lazy<Vec<(TaskTag, Regex)>> = Lazy::new(|| {
    vec![
        (
            TaskTag::Call,
            compile(
                r"(?i)\b(chiama|chiamata|telefonata|call|chiamare|telefono|chiamami|chiamarmi|telefonami)\b",
            ),
        ),
        (
            TaskTag::Email,
            compile(r"(?i)\b(email|e-mail|mail|scrivi|invia|messaggio)\b"),
        ),
        (
            TaskTag::Documents,
            compile(r"(?i)\b(documento|documenti|file|allegato|pdf|contratto|modulo|certificato)\b"),
        ),
        (
            TaskTag::University,
            compile(
                r"(?i)\b(esame|lezione|tesi|prof|professore|corso|studente|università|facoltà|appello)\b",
            ),
        ),
        (
            TaskTag::Appointment,
            compile(r"(?i)\b(appuntamento|incontro|visita|meeting|riunione)\b"),
        ),
        (
            TaskTag::Payment,
            compile(r"(?i)\b(pagamento|pagare|bonifico|fattura|quota|rata|importo)\b"),
        ),
        (
            TaskTag::Reply,
            compile(r"(?i)\b(rispondi|risposta|conferma|confermare|fammi\s+sapere)\b"),
        ),
    ]
});

fn detect_tags(text: &str) -> Vec<TaskTag> {
    let tags: Vec<TaskTag> = TAG_KEYWORDS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(tag, _)| *tag)
        .collect();
    if tags.is_empty() {
        vec![TaskTag::Other]
    } else {
        tags
    }
}

fn determine_priority(text: &str, intents: &IntentSet) -> Priority {
    if intents.has_urgency() {
        return Priority::High;
    }
    if intents.primary_is(IntentKind::Payment, 0.7) {
        return Priority::High;
    }
    if intents.primary_is(IntentKind::Request, 0.8) {
        return Priority::Medium;
    }
    if DEADLINE_WORDS.is_match(text) {
        return Priority::High;
    }
    Priority::Medium
}

fn suggest_due_date(
    text: &str,
    priority: Priority,
    clock: &Clock,
) -> (DateTime<Utc>, String) {
    if let Some(parsed) = parse_italian_date(text, clock) {
        let reason = if parsed.is_confirmed {
            format!("Data menzionata nel messaggio ({})", parsed.original)
        } else {
            "Data rilevata ma da confermare".to_string()
        };
        return (parsed.date, reason);
    }

    let (days, reason) = if priority == Priority::High {
        (1, "Urgente - suggerito entro domani")
    } else if SOON_WORDS.is_match(text) {
        (3, "Richiesta sollecita")
    } else {
        (7, "Scadenza standard suggerita")
    };
    (clock.now() + Duration::days(days), reason.to_string())
}

fn fallback_title(kind: IntentKind) -> Option<&'static str> {
    match kind {
        IntentKind::Request => Some("Rispondere alla richiesta"),
        IntentKind::Appointment => Some("Organizzare appuntamento"),
        IntentKind::Payment => Some("Gestire pagamento"),
        IntentKind::Confirmation => Some("Confermare ricezione"),
        IntentKind::Question => Some("Rispondere alla domanda"),
        IntentKind::Information => Some("Prendere nota dell'informazione"),
        IntentKind::Urgency | IntentKind::Other => None,
    }
}

fn extract_task_titles(text: &str, intents: &IntentSet) -> Vec<String> {
    let mut titles: Vec<String> = Vec::new();

    for pattern in REQUEST_PATTERNS.iter() {
        for caps in pattern.captures_iter(text) {
            let extracted = caps[1].trim();
            let len = extracted.chars().count();
            if len > MIN_TITLE_CHARS && len < MAX_TITLE_CHARS {
                titles.push(extracted.to_string());
            }
        }
    }

    if titles.is_empty() {
        titles.extend(
            intents
                .iter()
                .filter_map(|i| fallback_title(i.kind))
                .map(str::to_string),
        );
    }

    if text.contains('?') || NEEDS_RESPONSE.is_match(text) {
        let follow_up_exists = titles.iter().any(|t| {
            let low = t.to_lowercase();
            low.contains("rispond") || low.contains("conferma")
        });
        if !follow_up_exists {
            titles.push(FOLLOW_UP_TITLE.to_string());
        }
    }

    let mut unique: Vec<String> = Vec::with_capacity(titles.len());
    for t in titles {
        if !unique.contains(&t) {
            unique.push(t);
        }
    }
    unique
}

fn context_label(context: ContextType) -> &'static str {
    match context {
        ContextType::Family => "Ambito familiare",
        ContextType::University => "Ambito universitario",
        ContextType::Work => "Ambito lavorativo",
        ContextType::Gym => "Abbonamento/palestra",
        ContextType::Sales => "Ambito commerciale",
        ContextType::Other => "",
    }
}

fn source_label(source: SourceType) -> &'static str {
    match source {
        SourceType::Chat => "via WhatsApp",
        SourceType::Email => "via email",
        SourceType::Other => "",
    }
}

fn person_reference(person: Option<&str>, role: Option<&str>) -> Option<String> {
    let person = person?;
    Some(match role {
        Some(r) => format!("{} ({})", person, r),
        None => person.to_string(),
    })
}

fn task_description(message: &MessageContext<'_>) -> String {
    let mut description = String::new();
    if let Some(who) = person_reference(message.person_name, message.role) {
        description.push_str(&format!("Per {}. ", who));
    }
    let labels: Vec<&str> = [
        context_label(message.context_type),
        source_label(message.source_type),
    ]
    .into_iter()
    .filter(|l| !l.is_empty())
    .collect();
    description.push_str(&labels.join(" - "));
    description.trim().to_string()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Derives the action items of a message. Always returns at least one task.
pub fn generate_tasks(message: &MessageContext<'_>, clock: &Clock) -> Vec<Task> {
    let text = message.text;
    let intents = IntentSet::detect(text);
    let priority = determine_priority(text, &intents);
    let (due_date, due_reason) = suggest_due_date(text, priority, clock);

    let mut tasks: Vec<Task> = extract_task_titles(text, &intents)
        .into_iter()
        .map(|title| {
            let mut task = Task::new(
                capitalize_first(&title),
                task_description(message),
                priority,
            );
            task.due_date = Some(due_date);
            task.due_date_reason = Some(due_reason.clone());
            task.tags = detect_tags(&format!("{} {}", text, title));
            task
        })
        .collect();

    if tasks.is_empty() {
        let description = match person_reference(message.person_name, message.role) {
            Some(who) => format!("Messaggio da {} da valutare", who),
            None => "Messaggio da valutare".to_string(),
        };
        let mut task = Task::new(GENERIC_TITLE.to_string(), description, priority);
        task.due_date = Some(due_date);
        task.due_date_reason = Some(due_reason);
        task.tags = vec![TaskTag::Reply];
        tasks.push(task);
    }

    log::debug!("Generated {} task(s) with priority {}", tasks.len(), priority);
    tasks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize_first_handles_accents() {
        assert_eq!(capitalize_first("è pronto"), "È pronto");
        assert_eq!(capitalize_first(""), "");
    }

    #[test]
    fn test_detect_tags_defaults_to_other() {
        assert_eq!(detect_tags("nulla di rilevante"), vec![TaskTag::Other]);
        assert_eq!(
            detect_tags("mandami il pdf della fattura"),
            vec![TaskTag::Documents, TaskTag::Payment]
        );
    }

    #[test]
    fn test_request_titles_are_length_bounded() {
        let intents = IntentSet::detect("puoi farlo");
        // "farlo" is 5 chars, kept; a 3-char capture is not
        assert_eq!(extract_task_titles("puoi farlo", &intents), vec!["farlo"]);
        let intents = IntentSet::detect("puoi dai");
        assert_eq!(
            extract_task_titles("puoi dai", &intents),
            vec!["Rispondere alla richiesta"]
        );
    }
}
