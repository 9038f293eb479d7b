use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use messaggio_azione::cli::{self, Cli, Command};
use messaggio_azione::config::Config;
use messaggio_azione::context::{AppContext, StandardContext};
use messaggio_azione::controller::AnalysisService;
use messaggio_azione::export::{ExportFormat, csv, ics, markdown};
use messaggio_azione::model::{AnalysisInput, AnalysisRecord, ListQuery};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn require(record: Option<AnalysisRecord>, id: &str) -> Result<AnalysisRecord> {
    record.ok_or_else(|| anyhow::anyhow!("Analisi non trovata: {}", id))
}

fn read_stdin() -> Result<String> {
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read message from stdin")?;
    Ok(buf)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let ctx: Arc<dyn AppContext> = Arc::new(StandardContext::new(args.root));
    let service = AnalysisService::open(ctx.clone())?;
    cli::init_logging(&service.config.log_level, args.verbose);
    let now = Utc::now();

    match args.command {
        Command::Analyze {
            context,
            source,
            person,
            role,
            text,
            words,
            no_save,
        } => {
            let text = match cli::message_text(text, &words) {
                Some(t) => t,
                None => read_stdin()?,
            };
            let mut input = AnalysisInput::new(
                text,
                source.unwrap_or_default(),
                context.unwrap_or(service.config.default_context),
            );
            input.person_name = person;
            input.role = role;

            if !no_save {
                print_json(&service.analyze(input, now)?)?;
            } else {
                let input = input.normalized();
                print_json(&service.preview(&input, now)?)?;
            }
        }
        Command::Show { id } => {
            print_json(&require(service.get(&id)?, &id)?)?;
        }
        Command::List {
            context,
            source,
            search,
            limit,
            offset,
        } => {
            let query = ListQuery {
                context_type: context,
                source_type: source,
                search,
                limit: limit.unwrap_or(service.config.page_size),
                offset,
            };
            print_json(&service.list(&query)?)?;
        }
        Command::Regenerate {
            id,
            scope,
            context,
            source,
            person,
            role,
        } => {
            let patch = cli::regenerate_patch(context, source, person, role);
            let updated = service.regenerate(&id, &patch, scope, now)?;
            print_json(&require(updated, &id)?)?;
        }
        Command::Duplicate { id } => {
            print_json(&require(service.duplicate(&id, now)?, &id)?)?;
        }
        Command::Delete { id } => {
            if !service.delete(&id)? {
                anyhow::bail!("Analisi non trovata: {}", id);
            }
            println!("Eliminata: {}", id);
        }
        Command::Export {
            id,
            format,
            bom,
            out_dir,
        } => {
            let record = require(service.get(&id)?, &id)?;
            let tz = service.config.timezone()?;
            match format {
                ExportFormat::Csv => {
                    let content = csv::tasks_to_csv(&record.result.tasks, tz);
                    if bom {
                        print!("{}", csv::with_bom(&content));
                        println!();
                    } else {
                        println!("{}", content);
                    }
                }
                ExportFormat::Ics => {
                    let event = record
                        .result
                        .event
                        .as_ref()
                        .ok_or_else(|| anyhow::anyhow!("No calendar event in analysis {}", id))?;
                    println!("{}", ics::event_to_ics(event, now));
                }
                ExportFormat::Markdown => {
                    println!("{}", markdown::analysis_markdown(&record, tz, now));
                }
                ExportFormat::TasksIcs => {
                    let dir = out_dir.unwrap_or_else(|| PathBuf::from("."));
                    std::fs::create_dir_all(&dir)
                        .with_context(|| format!("Failed to create directory {:?}", dir))?;
                    for (name, content) in ics::tasks_to_ics_files(&record.result.tasks, tz, now) {
                        let path = dir.join(&name);
                        std::fs::write(&path, content)
                            .with_context(|| format!("Failed to write {:?}", path))?;
                        println!("{}", path.display());
                    }
                }
            }
        }
        Command::Reply { id, tone } => {
            let record = require(service.get(&id)?, &id)?;
            let tone = tone.unwrap_or(service.config.default_tone);
            println!("{}", record.result.replies.get(tone));
        }
        Command::Subject { id } => {
            let subject = service
                .email_subject(&id)?
                .ok_or_else(|| anyhow::anyhow!("Analisi non trovata: {}", id))?;
            println!("{}", subject);
        }
        Command::Settings { save } => {
            if save {
                service.config.save(ctx.as_ref())?;
                log::info!("Configuration written");
            }
            println!("# {}", Config::get_path_string(ctx.as_ref())?);
            print!("{}", toml::to_string_pretty(&service.config)?);
        }
    }

    Ok(())
}
