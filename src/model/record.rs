// File: ./src/model/record.rs
use crate::model::input::{AnalysisInput, AnalysisResult, ContextType, SourceType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A stored analysis: the input it was computed from plus the derived result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub input: AnalysisInput,
    pub result: AnalysisResult,
}

impl AnalysisRecord {
    pub fn new(input: AnalysisInput, result: AnalysisResult, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at,
            input,
            result,
        }
    }

    /// Copy with a fresh identity. Content is shared verbatim, including task ids.
    pub fn duplicate(&self, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at,
            input: self.input.clone(),
            result: self.result.clone(),
        }
    }
}

/// Filter and pagination parameters for listing stored analyses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub context_type: Option<ContextType>,
    pub source_type: Option<SourceType>,
    pub search: Option<String>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            context_type: None,
            source_type: None,
            search: None,
            limit: 20,
            offset: 0,
        }
    }
}

impl ListQuery {
    pub fn matches(&self, record: &AnalysisRecord) -> bool {
        if let Some(ctx) = self.context_type
            && record.input.context_type != ctx
        {
            return false;
        }
        if let Some(src) = self.source_type
            && record.input.source_type != src
        {
            return false;
        }
        if let Some(term) = self.search.as_deref().map(str::trim)
            && !term.is_empty()
        {
            let needle = term.to_lowercase();
            let in_text = record.input.raw_text.to_lowercase().contains(&needle);
            let in_person = record
                .input
                .person_name
                .as_deref()
                .is_some_and(|p| p.to_lowercase().contains(&needle));
            return in_text || in_person;
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListPage {
    pub analyses: Vec<AnalysisRecord>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}
