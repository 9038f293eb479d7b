// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::analyzer::{AnalyzerOptions, EventDurations};
use crate::context::AppContext;
use crate::model::{ContextType, Tone};
use crate::storage::AnalysisStore;
use anyhow::{Error, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;

fn default_timezone() -> String {
    "Europe/Rome".to_string()
}
fn default_call_minutes() -> u32 {
    30
}
fn default_meeting_minutes() -> u32 {
    60
}

fn default_page_size() -> usize {
    20
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    /// IANA name of the zone relative dates are resolved in.
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub default_context: ContextType,
    #[serde(default)]
    pub default_tone: Tone,

    #[serde(default = "default_call_minutes")]
    pub event_duration_call_min: u32,
    #[serde(default = "default_meeting_minutes")]
    pub event_duration_meet_min: u32,

    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String, // off, error, warn, info, debug, trace
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            default_context: ContextType::default(),
            default_tone: Tone::default(),
            event_duration_call_min: 30,
            event_duration_meet_min: 60,
            page_size: 20,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    /// Unreadable or malformed files are still reported.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(cfg) => Ok(cfg),
            Err(e) if Self::is_missing_config_error(&e) => {
                log::debug!("No config file, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Whether an error from [`Config::load`] means the file does not exist, either
    /// through the explicit message or an IO NotFound anywhere in the chain.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        err.chain().any(|cause| {
            cause
                .downcast_ref::<std::io::Error>()
                .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound)
        })
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        AnalysisStore::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            AnalysisStore::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    /// Get the path string using an explicit context.
    pub fn get_path_string(ctx: &dyn AppContext) -> Result<String> {
        let path = ctx.get_config_file_path()?;
        Ok(path.to_string_lossy().to_string())
    }

    pub fn timezone(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid timezone '{}': {}", self.timezone, e))
    }

    /// Analyzer settings derived from this config. Durations below one minute are
    /// raised to one minute.
    pub fn analyzer_options(&self) -> Result<AnalyzerOptions> {
        Ok(AnalyzerOptions {
            durations: EventDurations {
                call_minutes: self.event_duration_call_min.max(1),
                meeting_minutes: self.event_duration_meet_min.max(1),
            },
            timezone: self.timezone()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::TestContext;

    #[test]
    fn test_missing_file_is_detected() {
        let ctx = TestContext::new();
        let err = Config::load(&ctx).unwrap_err();
        assert!(Config::is_missing_config_error(&err));
        assert_eq!(Config::load_or_default(&ctx).unwrap(), Config::default());
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let ctx = TestContext::new();
        let cfg = Config {
            default_context: ContextType::Work,
            event_duration_call_min: 15,
            ..Config::default()
        };
        cfg.save(&ctx).unwrap();
        assert_eq!(Config::load(&ctx).unwrap(), cfg);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        fs::write(&path, "timezone = \"Europe/London\"\ndefault_context = \"lavoro\"\n").unwrap();

        let cfg = Config::load(&ctx).unwrap();
        assert_eq!(cfg.timezone, "Europe/London");
        assert_eq!(cfg.default_context, ContextType::Work);
        assert_eq!(cfg.event_duration_meet_min, 60);
        assert_eq!(cfg.page_size, 20);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let ctx = TestContext::new();
        let path = ctx.get_config_file_path().unwrap();
        fs::write(&path, "timezone = [").unwrap();

        let err = Config::load_or_default(&ctx).unwrap_err();
        assert!(!Config::is_missing_config_error(&err));
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_analyzer_options_clamp_and_validate() {
        let cfg = Config {
            event_duration_call_min: 0,
            ..Config::default()
        };
        let opts = cfg.analyzer_options().unwrap();
        assert_eq!(opts.durations.call_minutes, 1);
        assert_eq!(opts.timezone, chrono_tz::Europe::Rome);

        let bad = Config {
            timezone: "Mars/Olympus".to_string(),
            ..Config::default()
        };
        assert!(bad.analyzer_options().is_err());
    }
}
