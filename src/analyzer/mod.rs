//! Message analysis pipeline.
//!
//! Everything under this module is a pure function of its inputs plus an explicit
//! [`Clock`]. Nothing here touches the filesystem or keeps state between calls, so
//! several analyses can run side by side without coordination.
use crate::model::{AnalysisInput, AnalysisResult, ContextType, SourceType};
use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;

pub mod dates;
pub mod event;
pub mod intent;
pub mod next_step;
pub mod replies;
pub mod tasks;

pub use dates::{ParsedDateTime, ParsedTime, extract_all_dates, parse_italian_date, parse_time};
pub use event::extract_calendar_event;
pub use intent::{DetectedIntent, IntentKind, IntentSet, detect_intents};
pub use next_step::generate_next_step;
pub use replies::{generate_email_subject, generate_replies};
pub use tasks::generate_tasks;

pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Rome;
pub const DEFAULT_CALL_MINUTES: u32 = 30;
pub const DEFAULT_MEETING_MINUTES: u32 = 60;

/// Compiles one of the built-in pattern tables. The sources are literals, so a
/// failure here is a programming error.
pub(crate) fn compile(src: &str) -> Regex {
    Regex::new(src).unwrap_or_else(|e| panic!("invalid built-in pattern {src:?}: {e}"))
}

/// Reference instant and timezone used for every relative date computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clock {
    now: DateTime<Utc>,
    tz: Tz,
}

impl Clock {
    pub fn new(now: DateTime<Utc>, tz: Tz) -> Self {
        Self { now, tz }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn local(&self, instant: DateTime<Utc>) -> DateTime<Tz> {
        instant.with_timezone(&self.tz)
    }

    pub fn today(&self) -> NaiveDate {
        self.local(self.now).date_naive()
    }

    /// Resolves a wall-clock time in the reference zone to an absolute instant.
    /// Ambiguous times take the earlier offset; times skipped by a DST jump are
    /// pushed past the gap.
    pub fn to_utc(&self, naive: NaiveDateTime) -> DateTime<Utc> {
        match self.tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt.with_timezone(&Utc),
            LocalResult::Ambiguous(early, _) => early.with_timezone(&Utc),
            LocalResult::None => self
                .tz
                .from_local_datetime(&(naive + Duration::hours(1)))
                .earliest()
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|| Utc.from_utc_datetime(&naive)),
        }
    }
}

/// Configured lengths for synthesized calendar events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventDurations {
    pub call_minutes: u32,
    pub meeting_minutes: u32,
}

impl Default for EventDurations {
    fn default() -> Self {
        Self {
            call_minutes: DEFAULT_CALL_MINUTES,
            meeting_minutes: DEFAULT_MEETING_MINUTES,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerOptions {
    pub durations: EventDurations,
    pub timezone: Tz,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self {
            durations: EventDurations::default(),
            timezone: DEFAULT_TIMEZONE,
        }
    }
}

/// Borrowed view of an analysis input shared by the task and reply generators.
#[derive(Debug, Clone, Copy)]
pub struct MessageContext<'a> {
    pub text: &'a str,
    pub context_type: ContextType,
    pub source_type: SourceType,
    pub person_name: Option<&'a str>,
    pub role: Option<&'a str>,
}

impl<'a> MessageContext<'a> {
    pub fn new(text: &'a str, context_type: ContextType, source_type: SourceType) -> Self {
        Self {
            text,
            context_type,
            source_type,
            person_name: None,
            role: None,
        }
    }

    pub fn with_person(mut self, person_name: Option<&'a str>, role: Option<&'a str>) -> Self {
        self.person_name = person_name.map(str::trim).filter(|s| !s.is_empty());
        self.role = role.map(str::trim).filter(|s| !s.is_empty());
        self
    }

    pub fn from_input(input: &'a AnalysisInput) -> Self {
        Self::new(&input.raw_text, input.context_type, input.source_type)
            .with_person(input.person_name.as_deref(), input.role.as_deref())
    }
}

/// Runs the whole pipeline: tasks, replies and event independently, then the next
/// step from their outputs. Total for any input text.
pub fn analyze(
    input: &AnalysisInput,
    options: &AnalyzerOptions,
    now: DateTime<Utc>,
) -> AnalysisResult {
    let clock = Clock::new(now, options.timezone);
    let message = MessageContext::from_input(input);

    let tasks = generate_tasks(&message, &clock);
    let replies = generate_replies(&message);
    let event = extract_calendar_event(
        message.text,
        message.person_name,
        options.durations,
        &clock,
    );
    let next_step = generate_next_step(message.text, &tasks, event.as_ref(), message.context_type);

    log::debug!(
        "Analyzed message ({} chars): {} task(s), event: {}, next step: {}",
        message.text.chars().count(),
        tasks.len(),
        event.is_some(),
        next_step.action
    );

    AnalysisResult {
        tasks,
        replies,
        event,
        next_step,
    }
}
