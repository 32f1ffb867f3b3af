use std::io::{self, Write};

use anyhow::Context;
use clap::{Parser, Subcommand};

use client_store::db::{ClientRepository, ConnectionProvider, SqliteConnectionProvider};
use client_store::{commands, AppError, Backend, ConnectionConfig};

/// Manage rows of the `client` table
#[derive(Parser, Debug)]
#[command(name = "client-store", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all clients (default)
    List {
        #[arg(long)]
        json: bool,
    },
    /// Show one client
    Show {
        id: i64,
        #[arg(long)]
        json: bool,
    },
    /// Insert a client and print its id
    Create {
        name: String,
        email: String,
        phone: String,
    },
    /// Change a client's phone and print the affected row count
    UpdatePhone { id: i64, phone: String },
    /// Create the client table if it does not exist
    InitSchema,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::List { json: false });

    let config = ConnectionConfig::from_env().context("Failed to load database configuration")?;
    tracing::info!("Using {} backend", config.backend().as_str());
    tracing::debug!("{:?}", config);

    let result = match config.backend() {
        Backend::Sqlite => {
            // Only init-schema may create the database file.
            let provider = if matches!(command, Command::InitSchema) {
                SqliteConnectionProvider::create_if_missing(config.sqlite_path())
            } else {
                SqliteConnectionProvider::new(config.sqlite_path())
            };
            run(provider, command)
        }
        Backend::Mysql => run_mysql(config, command),
    };

    result.map_err(AppError::into_report)
}

#[cfg(feature = "mysql")]
fn run_mysql(config: ConnectionConfig, command: Command) -> Result<(), AppError> {
    run(client_store::db::MysqlConnectionProvider::new(config), command)
}

#[cfg(not(feature = "mysql"))]
fn run_mysql(_config: ConnectionConfig, _command: Command) -> Result<(), AppError> {
    Err(AppError::UnsupportedBackend(
        "mysql (built without the mysql feature; set DB_BACKEND=sqlite)".to_string(),
    ))
}

fn run<P: ConnectionProvider>(provider: P, command: Command) -> Result<(), AppError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let repo = ClientRepository::new(provider);
    match command {
        Command::List { json } => commands::list_clients(&repo, json, &mut out),
        Command::Show { id, json } => commands::show_client(&repo, id, json, &mut out),
        Command::Create { name, email, phone } => {
            commands::create_client(&repo, &name, &email, &phone, &mut out).map(|_| ())
        }
        Command::UpdatePhone { id, phone } => {
            commands::update_client_phone(&repo, id, &phone, &mut out).map(|_| ())
        }
        Command::InitSchema => {
            commands::init_schema(repo.provider())?;
            writeln!(out, "client table ready")?;
            Ok(())
        }
    }
}
