//! Command-line driver for the task board.
//!
//! # Responsibility
//! - Translate arguments into typed `TaskCommand`s against a SQLite store.
//! - Render the resulting board and notices as plain text.

use clap::{Parser, Subcommand};
use log::warn;
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use taskboard_core::db::open_db;
use taskboard_core::{
    default_log_level, init_logging, BoardSnapshot, Notice, SqlitePersistence, StoreConfig, Task,
    TaskBoard, TaskCommand, TaskFilter, TaskId, DEFAULT_STORAGE_KEY,
};

#[derive(Debug, Parser)]
#[command(name = "taskboard", version, about = "Manage a local task list")]
struct Cli {
    /// SQLite database holding the persisted list.
    #[arg(long, default_value = "taskboard.sqlite3")]
    db: PathBuf,

    /// Key the list is stored under.
    #[arg(long, default_value = DEFAULT_STORAGE_KEY)]
    storage_key: String,

    /// Absolute directory for log files. Logging is off when omitted.
    #[arg(long)]
    log_dir: Option<String>,

    /// Log level (trace|debug|info|warn|error). Defaults per build mode.
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show tasks.
    List {
        #[arg(long, default_value = "all")]
        filter: TaskFilter,
    },
    Add {
        text: String,
    },
    Toggle {
        id: TaskId,
    },
    Edit {
        id: TaskId,
        text: String,
    },
    Delete {
        id: TaskId,
    },
    ClearCompleted,
    /// Show total/active/completed counters.
    Stats,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("taskboard: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
    }

    let config = StoreConfig {
        storage_key: cli.storage_key,
        ..StoreConfig::default()
    }
    .validate()?;

    let conn = open_db(&cli.db)?;
    let persistence = SqlitePersistence::new(&conn, config.storage_key.as_str());
    let mut board = TaskBoard::open(persistence, &config);

    let command = match cli.command {
        Command::List { filter } => {
            board.set_filter(filter);
            print!("{}", render_board(&board.snapshot()));
            return Ok(ExitCode::SUCCESS);
        }
        Command::Stats => {
            let stats = board.store().stats();
            println!(
                "total={} active={} completed={}",
                stats.total, stats.active, stats.completed
            );
            return Ok(ExitCode::SUCCESS);
        }
        Command::Add { text } => TaskCommand::Add { text },
        Command::Toggle { id } => TaskCommand::Toggle { id },
        Command::Edit { id, text } => TaskCommand::Edit { id, text },
        Command::Delete { id } => TaskCommand::Delete { id },
        Command::ClearCompleted => TaskCommand::ClearCompleted,
    };

    match board.dispatch(command) {
        Ok(committed) => {
            if let Some(notice) = committed.value.notice() {
                println!("{}", render_notice(&notice));
            }
            if let Some(notice) = committed.persist_notice() {
                warn!("event=cli_save module=cli status=error");
                eprintln!("{}", render_notice(&notice));
            }
            print!("{}", render_board(&board.snapshot()));
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", render_notice(&err.notice()));
            Ok(ExitCode::from(2))
        }
    }
}

fn render_notice(notice: &Notice) -> String {
    format!("[{}] {}", notice.level.as_str(), notice.message)
}

fn render_task(task: &Task) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    format!("[{mark}] {:>13}  {}", task.id, task.text)
}

fn render_board(snapshot: &BoardSnapshot) -> String {
    let mut out = String::new();
    if snapshot.items.is_empty() {
        out.push_str("No tasks to show\n");
    }
    for task in &snapshot.items {
        out.push_str(&render_task(task));
        out.push('\n');
    }
    out.push_str(&format!(
        "-- {} | total {} | active {} | completed {}",
        snapshot.filter, snapshot.stats.total, snapshot.stats.active, snapshot.stats.completed
    ));
    if snapshot.show_clear_completed {
        out.push_str(" | clear-completed available");
    }
    out.push('\n');
    out
}
