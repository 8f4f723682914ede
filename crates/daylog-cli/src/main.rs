//! daylog CLI - Bullet journal from the command line.

mod commands;
mod date_arg;
mod interactive;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use date_arg::DateArg;
use daylog_core::TaskStatus;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "daylog")]
#[command(author, version, about = "Bullet journal for daily tasks, events and notes")]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(long, global = true, default_value = "human")]
    format: output::OutputFormat,

    /// Journal path (defaults to current directory)
    #[arg(long, short = 'C', global = true)]
    path: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new journal
    Init,

    /// Show a day's entries
    #[command(alias = "ls")]
    Show {
        /// Day: today, yesterday, tomorrow or YYYY-MM-DD
        #[arg(long, short = 'd', default_value = "today")]
        date: DateArg,

        /// Only entries with this tag (e.g. work, #work, @ana)
        #[arg(long, short = 't')]
        tag: Option<String>,

        /// Only priority entries
        #[arg(long, short = 'p')]
        priority: bool,

        /// Only tasks with this status (open, done, migrated, scheduled)
        #[arg(long, short = 's')]
        status: Option<TaskStatus>,
    },

    /// Append a line, written in bullet markup (e.g. `- buy milk #home`)
    Add {
        /// Day: today, yesterday, tomorrow or YYYY-MM-DD
        #[arg(long, short = 'd', default_value = "today")]
        date: DateArg,

        /// Line text
        #[arg(required = true, allow_hyphen_values = true)]
        text: Vec<String>,
    },

    /// Toggle a task between open and done
    #[command(alias = "x")]
    Toggle {
        /// Line index as shown by `show`
        index: usize,

        /// Day: today, yesterday, tomorrow or YYYY-MM-DD
        #[arg(long, short = 'd', default_value = "today")]
        date: DateArg,
    },

    /// Mark one open task as migrated
    Defer {
        /// Line index as shown by `show`
        index: usize,

        /// Day: today, yesterday, tomorrow or YYYY-MM-DD
        #[arg(long, short = 'd', default_value = "today")]
        date: DateArg,
    },

    /// Carry all open tasks over to the next day
    Migrate {
        /// Day to migrate from
        #[arg(long, short = 'd', default_value = "today")]
        date: DateArg,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Edit a day in $EDITOR
    Edit {
        /// Day: today, yesterday, tomorrow or YYYY-MM-DD
        #[arg(long, short = 'd', default_value = "today")]
        date: DateArg,
    },

    /// List logged days
    Days,

    /// Show the marker legend
    Legend,

    /// Start the local HTTP server
    Serve {
        /// Port to listen on
        #[arg(long, short = 'p', default_value = "17373")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let journal_path = match cli.path {
        Some(path) => path,
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    match cli.command {
        Commands::Init => commands::init(&journal_path, cli.format),
        Commands::Show {
            date,
            tag,
            priority,
            status,
        } => {
            let filter = commands::EntryFilter {
                tag,
                priority,
                status,
            };
            commands::show(&journal_path, date, &filter, cli.format)
        }
        Commands::Add { date, text } => commands::add(&journal_path, date, &text, cli.format),
        Commands::Toggle { index, date } => {
            commands::toggle_line(&journal_path, date, index, cli.format)
        }
        Commands::Defer { index, date } => commands::defer(&journal_path, date, index, cli.format),
        Commands::Migrate { date, yes } => commands::migrate(&journal_path, date, yes, cli.format),
        Commands::Edit { date } => commands::edit(&journal_path, date, cli.format),
        Commands::Days => commands::days(&journal_path, cli.format),
        Commands::Legend => commands::legend(cli.format),
        Commands::Serve { port, host } => commands::serve(&journal_path, &host, port),
    }
}
