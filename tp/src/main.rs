//! TripPacker - trip packing-list assistant
//!
//! CLI entry point: builds the packer from config and dispatches one command.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use kvstore::{FileStore, SlotStore};
use trippacker::cli::{Cli, Command, parse_answer, parse_yes_no, zero_based};
use trippacker::config::Config;
use trippacker::domain::{ClarificationAnswer, QuestionKind, enhance_description};
use trippacker::history::TripHistory;
use trippacker::llm::create_client;
use trippacker::oracle::Oracle;
use trippacker::packer::Packer;
use trippacker::prompts::PromptLoader;
use trippacker::{render, templates};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("trippacker")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("trippacker.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

fn build_packer(config: &Config) -> Result<Packer> {
    config.validate()?;

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    let oracle =
        Oracle::new(llm, PromptLoader::new(&config.prompts.dir)).with_max_tokens(config.llm.max_tokens);

    let store: Arc<dyn SlotStore> = Arc::new(
        FileStore::open(&config.storage.store_dir)
            .context(format!("Failed to open store at {}", config.storage.store_dir.display()))?,
    );
    let history = TripHistory::load(store, &config.storage.history_slot);

    if let Some(backup) = history.backup_slot() {
        eprintln!(
            "{} saved history in slot '{}' could not be read; starting empty. A copy was kept in slot '{}'.",
            "Warning:".yellow(),
            history.slot(),
            backup
        );
    }

    Ok(Packer::new(oracle, history))
}

fn prompt_line(question: &str) -> Result<String> {
    print!("{} ", question);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

async fn cmd_generate(packer: &mut Packer, description: &str, ask: bool) -> Result<()> {
    let mut description = description.to_string();

    if ask {
        let questions = packer.clarification_questions(&description).await;
        let mut answers = Vec::new();
        for q in &questions {
            let hint = match q.kind {
                QuestionKind::YesNo => "[y/n, enter to skip]",
                QuestionKind::Text => "[enter to skip]",
            };
            let line = prompt_line(&format!("{} {}", q.question, hint))?;
            if let Some(answer) = parse_answer(q.kind, &line) {
                answers.push(ClarificationAnswer {
                    question_id: q.id.clone(),
                    answer,
                });
            }
        }
        description = enhance_description(&description, &questions, &answers);
    }

    println!("{}", "Building your list...".dimmed());
    let generated = packer.generate_list(&description).await?;
    println!("{} {}", "Templates:".bold(), generated.templates.join(", "));
    print!("{}", render::trip_detail(&generated.trip));
    Ok(())
}

fn cmd_toggle(packer: &mut Packer, reference: &str, category: usize, item: usize) -> Result<()> {
    let (category, item) = match (zero_based(category), zero_based(item)) {
        (Some(c), Some(i)) => (c, i),
        _ => return Err(eyre!("Positions start at 1")),
    };
    let trip_id = packer.resolve_trip(reference)?.id.clone();
    let packed = packer.toggle_packed(&trip_id, category, item)?;

    let trip = packer.resolve_trip(&trip_id)?;
    let name = &trip.packing_list[category].items[item].name;
    if packed {
        println!("{} {}", "[x]".green(), name);
    } else {
        println!("[ ] {}", name);
    }
    Ok(())
}

fn cmd_clear(packer: &mut Packer, yes: bool) -> Result<()> {
    let count = packer.list_history().len();
    if !yes {
        let line = prompt_line(&format!("Delete {} trip(s)? [y/N]", count))?;
        if parse_yes_no(&line) != Some(true) {
            println!("Cancelled");
            return Ok(());
        }
    }
    packer.clear_history()?;
    println!("{} Deleted {} trip(s)", "✓".green(), count);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    debug!(command = ?cli.command, "main: dispatching command");
    if let Command::Templates = cli.command {
        for name in templates::names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let mut packer = build_packer(&config)?;

    match cli.command {
        Command::Generate { description, ask } => cmd_generate(&mut packer, &description.join(" "), ask).await,
        Command::Refine { trip, request } => {
            let trip_id = packer.resolve_trip(&trip)?.id.clone();
            let refined = packer.refine_list(&trip_id, &request.join(" ")).await?;
            print!("{}", render::trip_detail(refined));
            Ok(())
        }
        Command::Toggle { trip, category, item } => cmd_toggle(&mut packer, &trip, category, item),
        Command::List => {
            if packer.list_history().is_empty() {
                println!("No trips yet");
            }
            for trip in packer.list_history() {
                println!("{}", render::history_line(trip));
            }
            Ok(())
        }
        Command::Show { trip } => {
            let trip = match trip {
                Some(reference) => packer.resolve_trip(&reference)?,
                None => packer
                    .list_history()
                    .first()
                    .ok_or_else(|| eyre!("No trips yet"))?,
            };
            print!("{}", render::trip_detail(trip));
            Ok(())
        }
        Command::Clear { yes } => cmd_clear(&mut packer, yes),
        Command::Templates => Ok(()),
    }
}
