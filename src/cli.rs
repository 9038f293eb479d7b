// File: ./src/cli.rs
//! Command-line definition and logger setup for the `messaggio-azione` binary.
use crate::controller::{RegeneratePatch, RegenerateScope};
use crate::export::ExportFormat;
use crate::model::{ContextType, SourceType, Tone};
use clap::{Parser, Subcommand};
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::str::FromStr;

const EXAMPLES: &str = "\
EXAMPLES:
    messaggio-azione analyze --context palestra \"Puoi chiamarmi domani alle 15?\"
    messaggio-azione list --search mario --limit 5
    messaggio-azione export <id> --format csv --bom > tasks.csv";

#[derive(Debug, Parser)]
#[command(
    name = "messaggio-azione",
    version,
    about = "Turn Italian messages into tasks, replies and events",
    arg_required_else_help = true,
    after_help = EXAMPLES
)]
pub struct Cli {
    /// Use a different directory for config and data.
    #[arg(short, long, global = true)]
    pub root: Option<PathBuf>,

    /// Debug logging on stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Analyze a message (reads stdin without text).
    Analyze {
        /// famiglia, università, lavoro, palestra, vendite, altro
        #[arg(long)]
        context: Option<ContextType>,
        /// WhatsApp, Email, Altro
        #[arg(long)]
        source: Option<SourceType>,
        /// Sender name.
        #[arg(long)]
        person: Option<String>,
        /// Sender role (used in formal replies).
        #[arg(long)]
        role: Option<String>,
        #[arg(long, conflicts_with = "words")]
        text: Option<String>,
        /// Message words, joined with spaces.
        words: Vec<String>,
        /// Print the result without storing it.
        #[arg(long)]
        no_save: bool,
    },

    /// Print a stored analysis as JSON.
    Show { id: String },

    /// List stored analyses, newest first.
    List {
        #[arg(long)]
        context: Option<ContextType>,
        #[arg(long)]
        source: Option<SourceType>,
        /// Case-insensitive match on text and sender name.
        #[arg(long)]
        search: Option<String>,
        /// Page size (default from config).
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },

    /// Re-run the analyzer on a stored message.
    Regenerate {
        id: String,
        /// all, tasks or replies.
        #[arg(long = "only", default_value_t = RegenerateScope::All)]
        scope: RegenerateScope,
        #[arg(long)]
        context: Option<ContextType>,
        #[arg(long)]
        source: Option<SourceType>,
        #[arg(long)]
        person: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },

    /// Store a copy under a new id.
    Duplicate { id: String },

    /// Remove a stored analysis.
    Delete { id: String },

    /// Export an analysis: csv, ics, md, tasks-ics.
    Export {
        id: String,
        #[arg(long, default_value_t = ExportFormat::Markdown)]
        format: ExportFormat,
        /// Prefix CSV output with a UTF-8 BOM.
        #[arg(long)]
        bom: bool,
        /// Where tasks-ics writes its files (default: .).
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },

    /// Print one reply draft (formale, cordiale, sintetica).
    Reply {
        id: String,
        #[arg(long)]
        tone: Option<Tone>,
    },

    /// Print an email subject for the reply.
    Subject { id: String },

    /// Show (or write out) the current configuration.
    Settings {
        #[arg(long)]
        save: bool,
    },
}

/// `--text` wins; otherwise positional words are joined. None means stdin.
pub fn message_text(text: Option<String>, words: &[String]) -> Option<String> {
    text.or_else(|| (!words.is_empty()).then(|| words.join(" ")))
}

pub fn regenerate_patch(
    context: Option<ContextType>,
    source: Option<SourceType>,
    person: Option<String>,
    role: Option<String>,
) -> RegeneratePatch {
    RegeneratePatch {
        context_type: context,
        source_type: source,
        person_name: person,
        role,
    }
}

/// Terminal logger on stderr. `-v` forces debug output; otherwise the configured
/// level applies, falling back to info for unknown names.
pub fn init_logging(level: &str, verbose: bool) {
    let filter = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::from_str(level).unwrap_or(LevelFilter::Info)
    };
    // A logger may already be installed (tests); that is not an error here.
    let _ = TermLogger::init(
        filter,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );
}
