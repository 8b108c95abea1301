//! Taskdoc CLI - plain-text tasks with YAML headers.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use taskdoc::{CommandEditor, Store, attributes, compose_query, edit_task, encode, generate_backlinks, with_extension};

mod cli;

use cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskdoc")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("taskdoc.log");

    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

fn get_store_dir(cli: &Cli) -> PathBuf {
    cli.dir
        .clone()
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn get_editor(cli: &Cli) -> CommandEditor {
    let program = cli
        .editor
        .clone()
        .filter(|e| !e.trim().is_empty())
        .or_else(|| std::env::var("VISUAL").ok().filter(|e| !e.trim().is_empty()))
        .unwrap_or_else(|| "vi".to_string());
    CommandEditor::new(program)
}

fn run(cli: Cli) -> Result<()> {
    let store_dir = get_store_dir(&cli);
    let editor = get_editor(&cli);
    let store = Store::open(&store_dir).context("Failed to open task directory")?;

    match cli.command {
        Command::Create {
            title,
            attributes: pairs,
            json_attr,
            interactive,
        } => {
            let attrs = attributes::collect(&pairs, json_attr.as_deref())?;
            let mut task = store.draft(&title, attrs).context("Failed to create task")?;

            if interactive {
                edit_task(&editor, &mut task).context("Failed to edit task")?;
            }

            store.save(&task).context("Failed to save task")?;
            println!("{} Created: {}", "✓".green(), task.path.cyan());
        }

        Command::Search {
            attributes: pairs,
            json_query,
        } => {
            let query = if pairs.is_empty() && json_query.is_none() {
                compose_query(&editor).context("Failed to read query from editor")?
            } else {
                attributes::collect(&pairs, json_query.as_deref())?
            };

            let paths = store.find_by_meta(&query).context("Failed to search tasks")?;

            if paths.is_empty() {
                println!("{}", "No matching tasks".dimmed());
            } else {
                for (index, path) in paths.iter().enumerate() {
                    println!("{}: {}", index, path);
                }
            }
        }

        Command::Backlinks { task } => {
            let source = with_extension(&task);
            let report = generate_backlinks(&store, &source)?;

            for target in &report.updated {
                println!("{} {} {} {}", "✓".green(), target.cyan(), "<-".dimmed(), source);
            }
            for target in &report.unchanged {
                println!("{} {} {}", "=".dimmed(), target.cyan(), "(already linked)".dimmed());
            }
            for failure in &report.failures {
                println!("{} {}: {:#}", "✗".red(), failure.target, failure.error);
            }
        }

        Command::Show { task } => {
            let task = store.load(&with_extension(&task)).context("Failed to load task")?;
            print!("{}", encode(&task.meta, &task.contents)?);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();
    info!("Command: {:?}", std::env::args().collect::<Vec<_>>());

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
