mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "relkit")]
#[command(about = "Release-engineering utilities for schema migrations", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Migration orchestration through the framework's migration tooling
    Migrate {
        #[command(subcommand)]
        migrate_command: MigrateCommands,
    },

    /// Reserved-keyword checks over the application's model manifests
    Keywords {
        #[command(subcommand)]
        keywords_command: KeywordsCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Apply a migration plan as one batch and report the outcome
    Run {
        /// Plan document (migrations + initial_states)
        plan: PathBuf,

        /// Store to migrate
        #[arg(long, default_value = "default")]
        database: String,

        /// Management program the executor invokes
        #[arg(long, default_value = "manage")]
        manage: String,

        /// Also write the result document to this file
        #[arg(long)]
        output_file: Option<PathBuf>,
    },

    /// List unapplied migrations per store, as ready-to-run plan documents
    ShowUnapplied {
        /// Store to inspect (repeatable)
        #[arg(long = "database", default_value = "default")]
        databases: Vec<String>,

        /// Management program the executor invokes
        #[arg(long, default_value = "manage")]
        manage: String,

        /// Exit non-zero when any migration is unapplied
        #[arg(long)]
        fail_on_unapplied: bool,
    },
}

#[derive(Subcommand)]
enum KeywordsCommands {
    /// Scan model manifests for reserved-keyword conflicts
    Check {
        /// Directory of model manifests
        #[arg(long, default_value = "models")]
        models_dir: PathBuf,

        /// Reserved keyword lists per downstream system
        #[arg(long, default_value = "reserved_keywords.yml")]
        reserved_keyword_file: PathBuf,

        /// Reviewed Model.field entries that may stay
        #[arg(long)]
        override_file: Option<PathBuf>,

        /// Directory the CSV report is written under
        #[arg(long, default_value = "reports")]
        report_path: PathBuf,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Migrate { migrate_command } => match migrate_command {
            MigrateCommands::Run {
                plan,
                database,
                manage,
                output_file,
            } => commands::migrate::run(&plan, &database, &manage, output_file.as_deref()),
            MigrateCommands::ShowUnapplied {
                databases,
                manage,
                fail_on_unapplied,
            } => commands::migrate::show_unapplied(&databases, &manage, fail_on_unapplied),
        },
        Commands::Keywords { keywords_command } => match keywords_command {
            KeywordsCommands::Check {
                models_dir,
                reserved_keyword_file,
                override_file,
                report_path,
            } => commands::keywords::check(
                &models_dir,
                &reserved_keyword_file,
                override_file.as_deref(),
                &report_path,
            ),
        },
    };

    match outcome {
        Ok(code) => code,
        Err(error) => {
            eprintln!("{error:#}");
            ExitCode::FAILURE
        }
    }
}
