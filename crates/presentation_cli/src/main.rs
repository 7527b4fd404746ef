//! Spendbook CLI
//!
//! Command-line interface for configuration checks and administration.

#![allow(clippy::print_stdout)]

mod backup;

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use application::{NewUserRequest, UserService};
use clap::{Parser, Subcommand, ValueEnum};
use infrastructure::{
    AppConfig, Argon2PasswordHasher, CheckReport, EnvSnapshot, LogFormat, SqliteUserSettingsStore,
    SqliteUserStore, StartupValidator, create_pool, init_tracing,
};

/// Spendbook CLI
#[derive(Parser)]
#[command(name = "spendbook-cli")]
#[command(author, version, about = "Spendbook administration CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the startup configuration
    ///
    /// Exits with status 1 when a finding would prevent the server from starting.
    Check {
        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Configuration file (default: ./spendbook.toml if present)
        #[arg(short, long, env = "SPENDBOOK_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Print the resolved configuration with secrets redacted
    Config {
        /// Configuration file (default: ./spendbook.toml if present)
        #[arg(short, long, env = "SPENDBOOK_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Hash a password using Argon2id
    ///
    /// Example: spendbook-cli hash-password 'correct horse battery'
    HashPassword {
        /// The plaintext password
        password: String,

        /// Verify the hash against the password after hashing
        #[arg(long)]
        verify: bool,
    },

    /// Create a superuser account in the configured database
    CreateSuperuser {
        #[arg(long)]
        email: String,

        #[arg(long, env = "SPENDBOOK_SUPERUSER_PASSWORD")]
        password: String,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,

        /// Configuration file (default: ./spendbook.toml if present)
        #[arg(short, long, env = "SPENDBOOK_CONFIG")]
        config: Option<PathBuf>,
    },

    /// Create an online backup of the SQLite database
    ///
    /// Example: spendbook-cli backup --output ./backups/ --keep 7
    Backup {
        /// Target `.db` file or directory (default: current directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of backups to keep in the target directory (0 = keep all)
        #[arg(long, default_value = "7")]
        keep: usize,

        /// Configuration file (default: ./spendbook.toml if present)
        #[arg(short, long, env = "SPENDBOOK_CONFIG")]
        config: Option<PathBuf>,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn load_config(path: Option<&Path>, env: &EnvSnapshot) -> anyhow::Result<AppConfig> {
    Ok(AppConfig::load_from(path, env)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(LogFormat::Text, log_filter_from_verbosity(cli.verbose))?;

    let env = EnvSnapshot::capture();

    match cli.command {
        Commands::Check { format, config } => {
            let config = load_config(config.as_deref(), &env)?;
            let report = CheckReport::new(StartupValidator::standard().validate(&env, &config));

            match format {
                OutputFormat::Text => print!("{report}"),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            }

            if report.blocking {
                std::process::exit(1);
            }
        },

        Commands::Config { config } => {
            let config = load_config(config.as_deref(), &env)?;
            print!("{}", config.to_redacted_toml()?);
        },

        Commands::HashPassword { password, verify } => {
            let hasher = Argon2PasswordHasher::new();
            let hash = hasher.hash_password(&password)?;
            println!("{hash}");

            if verify {
                if hasher.verify_password(&password, &hash)? {
                    println!("Verification: hash matches");
                } else {
                    anyhow::bail!("hash does not verify against the password");
                }
            }
        },

        Commands::CreateSuperuser {
            email,
            password,
            first_name,
            last_name,
            config,
        } => {
            let config = load_config(config.as_deref(), &env)?;
            let pool = Arc::new(create_pool(&config.database)?);
            let users = UserService::new(
                Arc::new(SqliteUserStore::new(Arc::clone(&pool))),
                Arc::new(SqliteUserSettingsStore::new(pool)),
                Arc::new(Argon2PasswordHasher::new()),
                false,
            );

            let user = users
                .create_superuser(NewUserRequest {
                    email,
                    first_name,
                    last_name,
                    password,
                    is_superuser: true,
                })
                .await?;
            println!("Created superuser {} (id {})", user.email, user.id);
        },

        Commands::Backup {
            output,
            keep,
            config,
        } => {
            let config = load_config(config.as_deref(), &env)?;
            let summary =
                backup::run_backup(Path::new(&config.database.path), output.as_deref(), keep)
                    .await?;

            println!("Backup written to {}", summary.path.display());
            println!("  Size: {} bytes", summary.size_bytes);
            println!("  Duration: {}ms", summary.duration_ms);
            if summary.pruned > 0 {
                println!("  Removed {} old backup(s)", summary.pruned);
            }
        },
    }

    Ok(())
}
