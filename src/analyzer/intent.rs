// File: ./src/analyzer/intent.rs
//! Weighted keyword scoring of Italian messages.
//!
//! Each category owns an ordered list of `(pattern, weight)` rules. The confidence
//! of a category is the sum of the weights of its matching rules divided by the
//! number of rules in the category (not by the weight sum), capped at 1. The
//! downstream thresholds below are calibrated against this normalization.
use crate::analyzer::compile;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

pub const URGENCY_THRESHOLD: f64 = 0.5;
pub const APPOINTMENT_THRESHOLD: f64 = 0.4;
pub const PAYMENT_THRESHOLD: f64 = 0.5;

const FALLBACK_CONFIDENCE: f64 = 0.5;
const FALLBACK_EXCERPT_CHARS: usize = 50;

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[strum(ascii_case_insensitive)]
pub enum IntentKind {
    #[serde(rename = "richiesta")]
    #[strum(to_string = "richiesta", serialize = "request")]
    Request,
    #[serde(rename = "appuntamento")]
    #[strum(to_string = "appuntamento", serialize = "appointment")]
    Appointment,
    #[serde(rename = "urgenza")]
    #[strum(to_string = "urgenza", serialize = "urgency")]
    Urgency,
    #[serde(rename = "pagamento")]
    #[strum(to_string = "pagamento", serialize = "payment")]
    Payment,
    #[serde(rename = "informazione")]
    #[strum(to_string = "informazione", serialize = "information")]
    Information,
    #[serde(rename = "conferma")]
    #[strum(to_string = "conferma", serialize = "confirmation")]
    Confirmation,
    #[serde(rename = "domanda")]
    #[strum(to_string = "domanda", serialize = "question")]
    Question,
    #[serde(rename = "altro")]
    #[strum(to_string = "altro", serialize = "other")]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedIntent {
    pub kind: IntentKind,
    /// Always within `[0, 1]`.
    pub confidence: f64,
    pub matched_patterns: Vec<String>,
    /// Literal matched fragments joined with ", ".
    pub context: String,
}

struct WeightedPattern {
    regex: Regex,
    weight: f64,
}

struct IntentRules {
    kind: IntentKind,
    patterns: Vec<WeightedPattern>,
}

impl IntentRules {
    fn new(kind: IntentKind, table: &[(&str, f64)]) -> Self {
        let patterns = table
            .iter()
            .map(|(src, weight)| WeightedPattern {
                regex: compile(src),
                weight: *weight,
            })
            .collect();
        Self { kind, patterns }
    }

    fn score(&self, text: &str) -> Option<DetectedIntent> {
        let mut total_weight = 0.0;
        let mut matched_patterns = Vec::new();
        let mut matched_contexts = Vec::new();

        for p in &self.patterns {
            if let Some(m) = p.regex.find(text) {
                total_weight += p.weight;
                matched_patterns.push(p.regex.as_str().to_string());
                matched_contexts.push(m.as_str());
            }
        }

        if matched_patterns.is_empty() {
            return None;
        }

        let confidence = (total_weight / self.patterns.len() as f64).min(1.0);
        Some(DetectedIntent {
            kind: self.kind,
            confidence,
            matched_patterns,
            context: matched_contexts.join(", "),
        })
    }
}

// Declaration order doubles as the tie-break order after sorting.
static INTENT_RULES: Lazy<Vec<IntentRules>> = Lazy::new(|| {
    vec![
        IntentRules::new(
            IntentKind::Request,
            &[
                (r"(?i)\b(puoi|potresti|potrebbe|mi\s+puoi|mi\s+potresti)\b", 0.9),
                (r"(?i)\b(vuoi|vorresti|vorrebbe)\b", 0.7),
                (r"(?i)\b(mi\s+mandi|mi\s+invii|mi\s+dai|mi\s+passi)\b", 0.95),
                (r"(?i)\b(serve|servirebbe|avrei\s+bisogno|ho\s+bisogno)\b", 0.85),
                (r"(?i)\b(fammi|facci|fai|fate)\s+\w+", 0.8),
                (r"(?i)\b(devi|dovresti|dovrebbe|dovremmo)\b", 0.75),
                (r"(?i)\b(ti\s+chiedo|ti\s+chiederei|le\s+chiedo)\b", 0.9),
                (r"(?i)\b(portami|comprami|prendimi)\b", 0.85),
            ],
        ),
        IntentRules::new(
            IntentKind::Appointment,
            &[
                (r"(?i)\b(appuntamento|incontro|meeting|riunione)\b", 0.95),
                (r"(?i)\b(vediamoci|ci\s+vediamo|incontriamoci)\b", 0.9),
                (r"(?i)\b(passare\s+da|venire\s+da|andare\s+da)\b", 0.7),
                (r"(?i)\b(quando\s+sei\s+libero|quando\s+possiamo)\b", 0.85),
                (r"(?i)\b(fissiamo|organizziamo|prenotiamo)\b", 0.8),
                (r"(?i)\b(call|chiamata|videochiamata|videocall)\b", 0.9),
                (r"(?i)\b(pranzo|cena|aperitivo|caffè)\s*(insieme|con\s+me)?", 0.6),
            ],
        ),
        IntentRules::new(
            IntentKind::Urgency,
            &[
                (r"(?i)\b(urgente|urgenza|subito|immediatamente)\b", 0.95),
                (r"(?i)\b(oggi|entro\s+oggi|stasera|stanotte)\b", 0.8),
                (r"(?i)\b(scadenza|deadline|entro\s+il|entro\s+le)\b", 0.85),
                (r"(?i)\b(il\s+prima\s+possibile|appena\s+puoi|asap)\b", 0.9),
                (r"(?i)\b(non\s+c'è\s+tempo|poco\s+tempo|tempo\s+stringe)\b", 0.85),
                (r"(?i)\b(importante|fondamentale|cruciale|essenziale)\b", 0.6),
            ],
        ),
        IntentRules::new(
            IntentKind::Payment,
            &[
                (r"(?i)\b(pagamento|pagare|bonifico|fattura)\b", 0.95),
                (r"(?i)\b(rinnovo|disdetta|abbonamento|iscrizione)\b", 0.85),
                (r"(?i)\b(quota|rata|mensilità|canone)\b", 0.8),
                (r"(?i)\b(scaduto|in\s+scadenza|da\s+pagare)\b", 0.85),
                (r"(?i)\b(euro|€|\beur\b)", 0.6),
                (r"(?i)\b(costo|prezzo|tariffa|importo)\b", 0.5),
            ],
        ),
        IntentRules::new(
            IntentKind::Information,
            &[
                (r"(?i)\b(ti\s+informo|ti\s+comunico|ti\s+avviso)\b", 0.9),
                (r"(?i)\b(volevo\s+dirti|volevo\s+farti\s+sapere)\b", 0.85),
                (r"(?i)\b(per\s+tua\s+informazione|fyi|nota\s+bene)\b", 0.9),
                (r"(?i)\b(aggiornamento|update|news)\b", 0.7),
            ],
        ),
        IntentRules::new(
            IntentKind::Confirmation,
            &[
                (r"(?i)\b(conferma|confermare|confermo)\b", 0.9),
                (r"(?i)\b(va\s+bene|ok\s+per|d'accordo)\b", 0.7),
                (r"(?i)\b(ricevuto|preso\s+nota|capito)\b", 0.65),
            ],
        ),
        IntentRules::new(
            IntentKind::Question,
            &[
                (r"\?", 0.6),
                (r"(?i)\b(come|quando|dove|perché|quanto|quale|chi)\b", 0.5),
                (r"(?i)\b(sai|sapete|conosci|conoscete)\s+\w+\?", 0.8),
                (r"(?i)\b(hai|avete)\s+\w+\?", 0.7),
            ],
        ),
    ]
});

/// Scores `text` against every category and returns the matching ones sorted by
/// descending confidence. Never empty: a message nothing matches yields a single
/// [`IntentKind::Other`] entry.
pub fn detect_intents(text: &str) -> Vec<DetectedIntent> {
    let mut intents: Vec<DetectedIntent> =
        INTENT_RULES.iter().filter_map(|r| r.score(text)).collect();

    // Stable sort keeps declaration order among equal scores.
    intents.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    if intents.is_empty() {
        intents.push(DetectedIntent {
            kind: IntentKind::Other,
            confidence: FALLBACK_CONFIDENCE,
            matched_patterns: Vec::new(),
            context: text.chars().take(FALLBACK_EXCERPT_CHARS).collect(),
        });
    }

    intents
}

/// Detection result with the derived flags used by the generators.
#[derive(Debug, Clone, PartialEq)]
pub struct IntentSet {
    intents: Vec<DetectedIntent>,
}

impl IntentSet {
    pub fn detect(text: &str) -> Self {
        Self {
            intents: detect_intents(text),
        }
    }

    pub fn primary(&self) -> &DetectedIntent {
        // detect_intents never returns an empty list
        &self.intents[0]
    }

    pub fn primary_kind(&self) -> IntentKind {
        self.primary().kind
    }

    /// Primary kind, but only when its confidence is strictly above `threshold`.
    pub fn primary_is(&self, kind: IntentKind, threshold: f64) -> bool {
        let p = self.primary();
        p.kind == kind && p.confidence > threshold
    }

    pub fn get(&self, kind: IntentKind) -> Option<&DetectedIntent> {
        self.intents.iter().find(|i| i.kind == kind)
    }

    fn above(&self, kind: IntentKind, threshold: f64) -> bool {
        self.intents
            .iter()
            .any(|i| i.kind == kind && i.confidence > threshold)
    }

    pub fn has_urgency(&self) -> bool {
        self.above(IntentKind::Urgency, URGENCY_THRESHOLD)
    }

    pub fn is_appointment_related(&self) -> bool {
        self.above(IntentKind::Appointment, APPOINTMENT_THRESHOLD)
    }

    pub fn is_payment_related(&self) -> bool {
        self.above(IntentKind::Payment, PAYMENT_THRESHOLD)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DetectedIntent> {
        self.intents.iter()
    }
}

pub fn primary_intent(text: &str) -> DetectedIntent {
    IntentSet::detect(text).primary().clone()
}

pub fn has_urgency(text: &str) -> bool {
    IntentSet::detect(text).has_urgency()
}

pub fn is_appointment_related(text: &str) -> bool {
    IntentSet::detect(text).is_appointment_related()
}

pub fn is_payment_related(text: &str) -> bool {
    IntentSet::detect(text).is_payment_related()
}
