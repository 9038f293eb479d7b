// File: ./src/model/input.rs
use crate::model::item::{CalendarEvent, NextStep, Replies, Task};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

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
pub enum SourceType {
    #[serde(rename = "WhatsApp")]
    #[strum(to_string = "WhatsApp", serialize = "chat")]
    Chat,
    #[serde(rename = "Email")]
    #[strum(to_string = "Email", serialize = "mail")]
    Email,
    #[default]
    #[serde(rename = "Altro")]
    #[strum(to_string = "Altro", serialize = "other")]
    Other,
}

/// Social setting of a message; drives tone and vocabulary.
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
pub enum ContextType {
    #[serde(rename = "famiglia")]
    #[strum(to_string = "famiglia", serialize = "family")]
    Family,
    #[serde(rename = "università")]
    #[strum(
        to_string = "università",
        serialize = "universita",
        serialize = "academia",
        serialize = "university"
    )]
    University,
    #[serde(rename = "lavoro")]
    #[strum(to_string = "lavoro", serialize = "work")]
    Work,
    #[serde(rename = "palestra")]
    #[strum(to_string = "palestra", serialize = "gym", serialize = "fitness-membership")]
    Gym,
    #[serde(rename = "vendite")]
    #[strum(to_string = "vendite", serialize = "sales")]
    Sales,
    #[default]
    #[serde(rename = "altro")]
    #[strum(to_string = "altro", serialize = "other")]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisInput {
    pub raw_text: String,
    pub source_type: SourceType,
    pub context_type: ContextType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl AnalysisInput {
    pub fn new(raw_text: impl Into<String>, source_type: SourceType, context_type: ContextType) -> Self {
        Self {
            raw_text: raw_text.into(),
            source_type,
            context_type,
            person_name: None,
            role: None,
        }
    }

    pub fn with_person(mut self, name: impl Into<String>, role: Option<String>) -> Self {
        self.person_name = Some(name.into());
        self.role = role;
        self
    }

    /// Boundary validation. The analyzer itself never fails; callers must reject
    /// empty messages before handing them over.
    pub fn validate(&self) -> Result<(), String> {
        if self.raw_text.trim().is_empty() {
            return Err("Il messaggio non può essere vuoto".to_string());
        }
        Ok(())
    }

    /// Blank optional fields are treated as absent.
    pub fn normalized(mut self) -> Self {
        self.person_name = non_blank(self.person_name);
        self.role = non_blank(self.role);
        self
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub tasks: Vec<Task>,
    pub replies: Replies,
    pub event: Option<CalendarEvent>,
    pub next_step: NextStep,
}
