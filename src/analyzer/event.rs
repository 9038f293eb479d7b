// File: ./src/analyzer/event.rs
use crate::analyzer::dates::{extract_all_dates, parse_italian_date};
use crate::analyzer::intent::is_appointment_related;
use crate::analyzer::{Clock, EventDurations, compile};
use crate::model::CalendarEvent;
use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;

const NOTES_EXCERPT_CHARS: usize = 200;

static MEETING_PHRASING: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)\b(vediamoci|incontriamoci|ci\s+vediamo|passare\s+da|venire\s+da|chiamami|chiamarmi|telefonami|sentiamoci)\b",
    )
});

static CALL_VOCABULARY: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)\b(call|chiamata|telefonata|videochiamata|videocall|chiamami|chiamarmi|telefonami)\b",
    )
});

static ONLINE_KEYWORDS: Lazy<Regex> = Lazy::new(|| {
    compile(r"(?i)\b(zoom|teams|meet|skype|videocall|videochiamata|online|call)\b")
});

static ONLINE_PLATFORM: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\b(zoom|teams|meet|skype)\b"));

// Case-sensitive on purpose: the place must start with a capital letter.
static PLACE_AFTER_PREPOSITION: Lazy<Regex> = Lazy::new(|| {
    compile(r"\b(?:a|in|da|presso)\s+([A-Z][a-zA-Zàèéìòù\s]+?)(?:\s*[,.]|\s+alle|\s+il|\s+domani|$)")
});

static STREET_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    compile(r"\b(?i:indirizzo|via|piazza|corso)\s+[A-Z][a-zA-Zàèéìòù\s\d]+")
});

static LOCATION_STOPLIST: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)^(me|te|lui|lei|noi|voi|loro|casa|ufficio)$"));

/// (keyword pattern, bare title, title with a person) in priority order.
static TITLE_RULES: Lazy<Vec<(Regex, &'static str, &'static str)>> = Lazy::new(|| {
    vec![
        (compile(r"(?i)\bpranzo\b"), "Pranzo", "Pranzo con"),
        (compile(r"(?i)\bcena\b"), "Cena", "Cena con"),
        (compile(r"(?i)\baperitivo\b"), "Aperitivo", "Aperitivo con"),
        (compile(r"(?i)\b(caffè|colazione)\b"), "Caffè", "Caffè con"),
        (compile(r"(?i)\b(riunione|meeting)\b"), "Riunione", "Riunione con"),
        (compile(r"(?i)\bvisita\b"), "Visita", "Visita -"),
    ]
});

fn is_call(text: &str) -> bool {
    CALL_VOCABULARY.is_match(text)
}

fn with_person(bare: &str, joined: &str, person: Option<&str>) -> String {
    match person {
        Some(p) => format!("{} {}", joined, p),
        None => bare.to_string(),
    }
}

fn event_title(text: &str, person: Option<&str>) -> String {
    if let Some((_, bare, joined)) = TITLE_RULES.iter().find(|(re, _, _)| re.is_match(text)) {
        return with_person(bare, joined, person);
    }
    if is_call(text) {
        return with_person("Chiamata", "Call con", person);
    }
    with_person("Appuntamento", "Appuntamento con", person)
}

fn acceptable_location(candidate: &str) -> Option<String> {
    let location = candidate.trim();
    if location.chars().count() > 2 && !LOCATION_STOPLIST.is_match(location) {
        Some(location.to_string())
    } else {
        None
    }
}

/// Online meetings win over physical places; a place is the capitalized phrase
/// after a preposition, else a street address.
pub fn extract_location(text: &str) -> Option<String> {
    if ONLINE_KEYWORDS.is_match(text) {
        return Some(match ONLINE_PLATFORM.captures(text) {
            Some(caps) => format!("Online ({})", &caps[1]),
            None => "Online".to_string(),
        });
    }

    if let Some(caps) = PLACE_AFTER_PREPOSITION.captures(text)
        && let Some(location) = acceptable_location(&caps[1])
    {
        return Some(location);
    }

    STREET_ADDRESS
        .find(text)
        .and_then(|m| acceptable_location(m.as_str()))
}

fn event_notes(text: &str) -> String {
    let mut summary: String = text.chars().take(NOTES_EXCERPT_CHARS).collect();
    if text.chars().count() > NOTES_EXCERPT_CHARS {
        summary.push_str("...");
    }
    format!("Estratto da messaggio:\n\"{}\"", summary)
}

/// Builds a calendar event when the message talks about meeting up (or calling)
/// and mentions a date. The first date found anchors the event.
pub fn extract_calendar_event(
    text: &str,
    person_name: Option<&str>,
    durations: EventDurations,
    clock: &Clock,
) -> Option<CalendarEvent> {
    if !is_appointment_related(text)
        && (parse_italian_date(text, clock).is_none() || !MEETING_PHRASING.is_match(text))
    {
        return None;
    }

    let anchor = extract_all_dates(text, clock).into_iter().next()?;

    let minutes = if is_call(text) {
        durations.call_minutes
    } else {
        durations.meeting_minutes
    };
    let start_date = anchor.date;
    let end_date = start_date + Duration::minutes(i64::from(minutes.max(1)));
    let person = person_name.map(str::trim).filter(|p| !p.is_empty());

    Some(CalendarEvent {
        title: event_title(text, person),
        start_date,
        end_date,
        location: extract_location(text),
        notes: event_notes(text),
        is_confirmed: anchor.is_confirmed && anchor.has_time,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_prefers_online_platform() {
        assert_eq!(
            extract_location("Facciamo una call su Zoom a Milano"),
            Some("Online (Zoom)".to_string())
        );
        assert_eq!(
            extract_location("Ci vediamo online"),
            Some("Online".to_string())
        );
    }

    #[test]
    fn test_location_rejects_stoplist_and_short_names() {
        assert_eq!(extract_location("Vieni da Lei domani"), None);
        assert_eq!(extract_location("Ci vediamo a Al, ok"), None);
        assert_eq!(
            extract_location("Ci vediamo a Milano alle 15"),
            Some("Milano".to_string())
        );
    }

    #[test]
    fn test_location_falls_back_to_street_address() {
        assert_eq!(
            extract_location("ci troviamo in via Roma 12"),
            Some("via Roma 12".to_string())
        );
    }

    #[test]
    fn test_titles_follow_keyword_priority() {
        assert_eq!(event_title("pranzo e riunione", Some("Anna")), "Pranzo con Anna");
        assert_eq!(event_title("visita medica", Some("Dr. Rossi")), "Visita - Dr. Rossi");
        assert_eq!(event_title("facciamo una call", None), "Chiamata");
        assert_eq!(event_title("facciamo una call", Some("Luca")), "Call con Luca");
        assert_eq!(event_title("vediamoci", None), "Appuntamento");
    }

    #[test]
    fn test_notes_truncate_long_messages() {
        let long = "x".repeat(250);
        let notes = event_notes(&long);
        assert!(notes.ends_with("...\""));
        assert_eq!(notes.matches('x').count(), 200);
        assert_eq!(event_notes("ciao"), "Estratto da messaggio:\n\"ciao\"");
    }
}
