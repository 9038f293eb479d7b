// Crate root library declaration and module exports.
pub mod analyzer;
pub mod cli;
pub mod config;
pub mod context;
pub mod controller;
pub mod export;
pub mod model;
pub mod storage;

pub use analyzer::{AnalyzerOptions, Clock, analyze};
