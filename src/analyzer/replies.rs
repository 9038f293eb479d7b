// File: ./src/analyzer/replies.rs
//! Reply drafts in three tones.
//!
//! Greeting and closing depend only on the context domain; the body depends on the
//! primary intent and, for appointment-like messages, on which details (day, time,
//! place) the sender left out.
use crate::analyzer::intent::{IntentKind, IntentSet};
use crate::analyzer::{MessageContext, compile};
use crate::model::{ContextType, Replies, Tone};
use once_cell::sync::Lazy;
use regex::Regex;

/// One string per tone.
struct ByTone {
    formal: &'static str,
    cordial: &'static str,
    terse: &'static str,
}

impl ByTone {
    const fn new(formal: &'static str, cordial: &'static str, terse: &'static str) -> Self {
        Self {
            formal,
            cordial,
            terse,
        }
    }

    fn get(&self, tone: Tone) -> &'static str {
        match tone {
            Tone::Formal => self.formal,
            Tone::Cordial => self.cordial,
            Tone::Terse => self.terse,
        }
    }
}

fn greetings(context: ContextType) -> ByTone {
    match context {
        ContextType::Family => ByTone::new("Ciao", "Ciao", ""),
        ContextType::University => {
            ByTone::new("Gentile Professore/Professoressa", "Buongiorno", "Buongiorno")
        }
        ContextType::Work => ByTone::new("Gentile", "Buongiorno", "Buongiorno"),
        ContextType::Gym => ByTone::new("Gentili", "Ciao", "Ciao"),
        ContextType::Sales => ByTone::new("Gentile Cliente", "Buongiorno", "Buongiorno"),
        ContextType::Other => ByTone::new("Buongiorno", "Ciao", ""),
    }
}

fn closings(context: ContextType) -> ByTone {
    match context {
        ContextType::Family => ByTone::new("Un abbraccio", "Un bacio", ""),
        ContextType::University => {
            ByTone::new("Cordiali saluti", "Grazie e buona giornata", "Grazie")
        }
        ContextType::Work => ByTone::new("Distinti saluti", "Cordiali saluti", "Grazie"),
        ContextType::Gym => ByTone::new("Cordiali saluti", "Grazie", "Grazie"),
        ContextType::Sales => ByTone::new(
            "Resto a disposizione per qualsiasi chiarimento.\nCordiali saluti",
            "Grazie per la fiducia",
            "Grazie",
        ),
        ContextType::Other => ByTone::new("Cordiali saluti", "Grazie", ""),
    }
}

fn acknowledgement(kind: IntentKind) -> ByTone {
    match kind {
        IntentKind::Request => ByTone::new(
            "Ho ricevuto la Sua richiesta e provvederò a quanto necessario.",
            "Ricevuto! Mi occupo subito della tua richiesta.",
            "Ok, provvedo.",
        ),
        IntentKind::Appointment => ByTone::new(
            "Confermo la mia disponibilità per l'incontro proposto.",
            "Perfetto, per me va bene!",
            "Ok, confermo.",
        ),
        IntentKind::Payment => ByTone::new(
            "Ho preso nota delle informazioni relative al pagamento.",
            "Grazie per le informazioni, provvedo al pagamento.",
            "Ok, provvedo.",
        ),
        IntentKind::Information => ByTone::new(
            "La ringrazio per l'informazione.",
            "Grazie per avermi avvisato!",
            "Ricevuto, grazie.",
        ),
        // Terse answers to questions go straight to the point.
        IntentKind::Question => {
            ByTone::new("In merito alla Sua domanda:", "Riguardo alla tua domanda:", "")
        }
        IntentKind::Confirmation => ByTone::new(
            "Confermo la ricezione del messaggio.",
            "Ricevuto, tutto chiaro!",
            "Ok!",
        ),
        IntentKind::Urgency | IntentKind::Other => ByTone::new(
            "Ho ricevuto il Suo messaggio.",
            "Grazie per il messaggio!",
            "Ricevuto.",
        ),
    }
}

static DAY_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    compile(
        r"(?i)\b(lunedì|martedì|mercoledì|giovedì|venerdì|sabato|domenica|domani|dopodomani)\b",
    )
});
static TIME_REFERENCE: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(\d{1,2}[:.]?\d{0,2}|alle\s+\d+|ore\s+\d+)\b"));
static APPOINTMENT_MENTION: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)\b(appuntamento|incontro|vediamoci|ci\s+vediamo)\b"));
static LOCATION_REFERENCE: Lazy<Regex> = Lazy::new(|| compile(r"(?i)\b(dove|luogo|posto)\b"));
static SPECIFIC_LOCATION: Lazy<Regex> =
    Lazy::new(|| compile(r"\b(in|a|da|presso)\s+[A-Z][a-zA-Z]+"));

/// Details an appointment request leaves unspecified, in asking order.
pub fn find_missing_info(text: &str) -> Vec<&'static str> {
    let mut missing = Vec::new();
    if !APPOINTMENT_MENTION.is_match(text) {
        return missing;
    }

    let has_day = DAY_REFERENCE.is_match(text);
    if !has_day {
        missing.push("data dell'incontro");
    } else if !TIME_REFERENCE.is_match(text) {
        missing.push("orario preciso");
    }

    if !LOCATION_REFERENCE.is_match(text) && !SPECIFIC_LOCATION.is_match(text) {
        missing.push("luogo dell'incontro");
    }
    missing
}

fn missing_info_sentence(missing: &[&str], tone: Tone) -> String {
    let list = missing.join(", ");
    match tone {
        Tone::Formal => format!("Avrei bisogno di alcune informazioni aggiuntive: {}.", list),
        Tone::Cordial => format!("Mi servirebbe sapere: {}. Puoi farmi sapere?", list),
        Tone::Terse => format!("Mi servono: {}.", list),
    }
}

fn reply_body(primary: IntentKind, missing: &[&str], tone: Tone) -> String {
    let mut parts: Vec<String> = Vec::new();
    let ack = acknowledgement(primary).get(tone);
    if !ack.is_empty() {
        parts.push(ack.to_string());
    }
    if !missing.is_empty() {
        parts.push(missing_info_sentence(missing, tone));
    }
    parts.join("\n\n")
}

fn greeting_line(base: &str, message: &MessageContext<'_>, include_role: bool) -> String {
    if base.is_empty() {
        return String::new();
    }
    match message.person_name {
        Some(name) => match message.role.filter(|_| include_role) {
            Some(role) => format!("{} {} ({}),", base, name, role),
            None => format!("{} {},", base, name),
        },
        None => format!("{},", base),
    }
}

fn assemble_letter(greeting: &str, body: &str, closing: &str) -> String {
    [greeting, "", body, "", closing]
        .join("\n")
        .trim()
        .to_string()
}

fn assemble_terse(greeting: &str, body: &str, closing: &str) -> String {
    [greeting, body, closing]
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Produces the formal, cordial and terse drafts. Deterministic for a given input.
pub fn generate_replies(message: &MessageContext<'_>) -> Replies {
    let primary = IntentSet::detect(message.text).primary_kind();
    let missing = find_missing_info(message.text);
    let greet = greetings(message.context_type);
    let close = closings(message.context_type);

    let formal = assemble_letter(
        &greeting_line(greet.formal, message, true),
        &reply_body(primary, &missing, Tone::Formal),
        close.formal,
    );
    let cordial = assemble_letter(
        &greeting_line(greet.cordial, message, false),
        &reply_body(primary, &missing, Tone::Cordial),
        close.cordial,
    );
    let terse = assemble_terse(
        &greeting_line(greet.terse, message, false),
        &reply_body(primary, &missing, Tone::Terse),
        close.terse,
    );

    Replies {
        formal,
        cordial,
        terse,
    }
}

fn subject_phrase(kind: IntentKind) -> &'static str {
    match kind {
        IntentKind::Request => "Risposta alla richiesta",
        IntentKind::Appointment => "Conferma appuntamento",
        IntentKind::Payment => "Conferma pagamento",
        IntentKind::Information => "Ricevuto - Grazie",
        IntentKind::Confirmation => "Conferma ricezione",
        IntentKind::Question => "Risposta alla domanda",
        IntentKind::Urgency => "URGENTE - Risposta",
        IntentKind::Other => "Risposta",
    }
}

/// Subject line for an email reply; family messages get no "Re: " prefix.
pub fn generate_email_subject(text: &str, context: ContextType) -> String {
    let prefix = match context {
        ContextType::Family => "",
        _ => "Re: ",
    };
    format!(
        "{}{}",
        prefix,
        subject_phrase(IntentSet::detect(text).primary_kind())
    )
}
