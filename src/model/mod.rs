// File: ./src/model/mod.rs
pub mod input;
pub mod item;
pub mod record;

pub use input::{AnalysisInput, AnalysisResult, ContextType, SourceType};
pub use item::{CalendarEvent, NextStep, Priority, Replies, Task, TaskTag, Tone};
pub use record::{AnalysisRecord, ListPage, ListQuery};
