// File: ./src/model/item.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

fn default_id() -> String {
    Uuid::new_v4().to_string()
}

// --- CLOSED VOCABULARIES ---

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Priority {
    #[serde(rename = "Alta")]
    #[strum(to_string = "Alta", serialize = "high")]
    High,
    #[serde(rename = "Media")]
    #[strum(to_string = "Media", serialize = "medium")]
    Medium,
    #[serde(rename = "Bassa")]
    #[strum(to_string = "Bassa", serialize = "low")]
    Low,
}

impl Priority {
    /// iCalendar PRIORITY value (1 = highest, 9 = lowest).
    pub fn ical_value(&self) -> u32 {
        match self {
            Priority::High => 1,
            Priority::Medium => 5,
            Priority::Low => 9,
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Priority::High => "🔴",
            Priority::Medium => "🟡",
            Priority::Low => "🟢",
        }
    }
}

#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[strum(ascii_case_insensitive)]
pub enum TaskTag {
    #[serde(rename = "call")]
    #[strum(to_string = "call")]
    Call,
    #[serde(rename = "email")]
    #[strum(to_string = "email")]
    Email,
    #[serde(rename = "documenti")]
    #[strum(to_string = "documenti", serialize = "documents")]
    Documents,
    #[serde(rename = "università")]
    #[strum(to_string = "università", serialize = "universita", serialize = "university")]
    University,
    #[serde(rename = "appuntamento")]
    #[strum(to_string = "appuntamento", serialize = "appointment")]
    Appointment,
    #[serde(rename = "pagamento")]
    #[strum(to_string = "pagamento", serialize = "payment")]
    Payment,
    #[serde(rename = "risposta")]
    #[strum(to_string = "risposta", serialize = "reply")]
    Reply,
    #[serde(rename = "altro")]
    #[strum(to_string = "altro", serialize = "other")]
    Other,
}

// --- DERIVED ITEMS ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default = "default_id")]
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub due_date_reason: Option<String>,
    pub tags: Vec<TaskTag>,
}

impl Task {
    pub fn new(title: String, description: String, priority: Priority) -> Self {
        Self {
            id: default_id(),
            title,
            description,
            priority,
            due_date: None,
            due_date_reason: None,
            tags: vec![TaskTag::Other],
        }
    }

    pub fn has_tag(&self, tag: TaskTag) -> bool {
        self.tags.contains(&tag)
    }
}

/// The three reply drafts, always produced together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Replies {
    #[serde(rename = "formale")]
    pub formal: String,
    #[serde(rename = "cordiale")]
    pub cordial: String,
    #[serde(rename = "sintetica")]
    pub terse: String,
}

impl Replies {
    pub fn get(&self, tone: Tone) -> &str {
        match tone {
            Tone::Formal => &self.formal,
            Tone::Cordial => &self.cordial,
            Tone::Terse => &self.terse,
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[strum(ascii_case_insensitive)]
pub enum Tone {
    #[serde(rename = "formale")]
    #[strum(to_string = "formale", serialize = "formal")]
    Formal,
    #[default]
    #[serde(rename = "cordiale")]
    #[strum(to_string = "cordiale", serialize = "cordial", serialize = "friendly")]
    Cordial,
    #[serde(rename = "sintetica")]
    #[strum(to_string = "sintetica", serialize = "terse")]
    Terse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub title: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: Option<String>,
    pub notes: String,
    pub is_confirmed: bool,
}

impl CalendarEvent {
    pub fn duration_minutes(&self) -> i64 {
        (self.end_date - self.start_date).num_minutes()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NextStep {
    pub action: String,
    pub checklist: Vec<String>,
}
