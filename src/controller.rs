// File: src/controller.rs
//! Service layer for stored analyses.
//! The CLI (and any other front end) goes through `AnalysisService` so validation,
//! analyzer settings and persistence are applied the same way everywhere.
use crate::analyzer::{self, AnalyzerOptions};
use crate::config::Config;
use crate::context::AppContext;
use crate::model::{
    AnalysisInput, AnalysisRecord, AnalysisResult, ContextType, ListPage, ListQuery, SourceType,
};
use crate::storage::AnalysisStore;
use anyhow::Result;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use strum::{Display, EnumString};

/// Which parts of a stored analysis a regeneration rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum RegenerateScope {
    /// Every derived field plus the stored input metadata.
    #[default]
    All,
    /// Tasks and the next step.
    Tasks,
    Replies,
}

/// Overrides for a regeneration. Unset fields fall back to the stored input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegeneratePatch {
    pub context_type: Option<ContextType>,
    pub source_type: Option<SourceType>,
    pub person_name: Option<String>,
    pub role: Option<String>,
}

impl RegeneratePatch {
    fn apply(&self, stored: &AnalysisInput) -> AnalysisInput {
        AnalysisInput {
            raw_text: stored.raw_text.clone(),
            source_type: self.source_type.unwrap_or(stored.source_type),
            context_type: self.context_type.unwrap_or(stored.context_type),
            person_name: self
                .person_name
                .clone()
                .or_else(|| stored.person_name.clone()),
            role: self.role.clone().or_else(|| stored.role.clone()),
        }
        .normalized()
    }
}

#[derive(Clone)]
pub struct AnalysisService {
    pub ctx: Arc<dyn AppContext>,
    pub config: Config,
    store: AnalysisStore,
}

impl AnalysisService {
    pub fn new(ctx: Arc<dyn AppContext>, config: Config) -> Result<Self> {
        let store = AnalysisStore::new(ctx.as_ref())?;
        Ok(Self { ctx, config, store })
    }

    /// Builds a service from the config file of `ctx`, or the defaults when there is none.
    pub fn open(ctx: Arc<dyn AppContext>) -> Result<Self> {
        let config = Config::load_or_default(ctx.as_ref())?;
        Self::new(ctx, config)
    }

    pub fn store(&self) -> &AnalysisStore {
        &self.store
    }

    fn options(&self) -> Result<AnalyzerOptions> {
        self.config.analyzer_options()
    }

    /// Validates and analyzes without storing anything.
    pub fn preview(&self, input: &AnalysisInput, now: DateTime<Utc>) -> Result<AnalysisResult> {
        input.validate().map_err(anyhow::Error::msg)?;
        Ok(analyzer::analyze(input, &self.options()?, now))
    }

    /// Validates, analyzes and stores a new record.
    pub fn analyze(&self, input: AnalysisInput, now: DateTime<Utc>) -> Result<AnalysisRecord> {
        let input = input.normalized();
        let result = self.preview(&input, now)?;
        let record = AnalysisRecord::new(input, result, now);
        self.store.insert(record.clone())?;
        log::info!(
            "Created analysis {} ({} task(s))",
            record.id,
            record.result.tasks.len()
        );
        Ok(record)
    }

    pub fn get(&self, id: &str) -> Result<Option<AnalysisRecord>> {
        self.store.get(id)
    }

    /// Re-runs the analyzer on the stored text with `patch` applied and rewrites the
    /// parts selected by `scope`. Only [`RegenerateScope::All`] persists the patched
    /// input metadata.
    pub fn regenerate(
        &self,
        id: &str,
        patch: &RegeneratePatch,
        scope: RegenerateScope,
        now: DateTime<Utc>,
    ) -> Result<Option<AnalysisRecord>> {
        let options = self.options()?;
        let updated = self.store.update(id, |record| {
            let input = patch.apply(&record.input);
            let fresh = analyzer::analyze(&input, &options, now);
            match scope {
                RegenerateScope::Tasks => {
                    record.result.tasks = fresh.tasks;
                    record.result.next_step = fresh.next_step;
                }
                RegenerateScope::Replies => {
                    record.result.replies = fresh.replies;
                }
                RegenerateScope::All => {
                    record.input = input;
                    record.result = fresh;
                }
            }
            Ok(())
        })?;

        match &updated {
            Some(_) => log::info!("Regenerated analysis {} (scope: {})", id, scope),
            None => log::warn!("Cannot regenerate {}: analysis not found", id),
        }
        Ok(updated)
    }

    /// Stores a copy of an analysis under a new id.
    pub fn duplicate(&self, id: &str, now: DateTime<Utc>) -> Result<Option<AnalysisRecord>> {
        let Some(original) = self.store.get(id)? else {
            return Ok(None);
        };
        let copy = original.duplicate(now);
        self.store.insert(copy.clone())?;
        log::info!("Duplicated analysis {} as {}", id, copy.id);
        Ok(Some(copy))
    }

    /// Returns whether something was removed.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let removed = self.store.remove(id)?;
        if removed {
            log::info!("Deleted analysis {}", id);
        }
        Ok(removed)
    }

    pub fn list(&self, query: &ListQuery) -> Result<ListPage> {
        self.store.list(query)
    }

    /// Email subject for replying to a stored analysis.
    pub fn email_subject(&self, id: &str) -> Result<Option<String>> {
        Ok(self.store.get(id)?.map(|r| {
            analyzer::generate_email_subject(&r.input.raw_text, r.input.context_type)
        }))
    }
}
