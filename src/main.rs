use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use e2e_catalog::config::{Settings, SettingsStore, Theme};
use e2e_catalog::provider::{DataProvider, FsProvider};
use e2e_catalog::store::DataStore;
use e2e_catalog::{api, dashboard, render};

const DEFAULT_PORT: u16 = 3000;

#[derive(Parser)]
#[command(name = "e2e-catalog")]
#[command(about = "Browse the features, scenarios and organizations of an e2e test repository")]
struct Cli {
    /// Root of the e2e test repository (defaults to the saved setting)
    #[arg(long)]
    base_path: Option<String>,

    /// Only accept repositories whose package.json points at this URL
    #[arg(long)]
    repository_url: Option<String>,

    /// Settings file to use instead of the one in the user config directory
    #[arg(long)]
    settings_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the repository and serve the catalog over HTTP
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,
    },
    /// Print dashboard statistics and breakdowns
    Dashboard {
        #[arg(long)]
        json: bool,
    },
    /// Print every scenario with its feature and organization
    Scenarios {
        #[arg(long)]
        json: bool,
    },
    /// Print the step definitions of the repository, grouped by category
    Steps {
        #[arg(long)]
        json: bool,
    },
    /// Show or change saved settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommand,
    },
}

#[derive(Subcommand)]
enum SettingsCommand {
    /// Print the saved settings as JSON
    Show,
    /// Change saved settings; unspecified fields keep their value
    Set {
        #[arg(long)]
        base_path: Option<String>,
        #[arg(long)]
        e2e_pwd: Option<String>,
        #[arg(long)]
        e2e_url: Option<String>,
        #[arg(long)]
        code_editor: Option<String>,
        #[arg(long)]
        backoffice_api_key: Option<String>,
        #[arg(long, value_enum)]
        theme: Option<Theme>,
    },
}

/// Initialize tracing with output to stderr (for printing commands) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "e2e_catalog=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Printing commands keep stdout clean for their output
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn open_settings(path: Option<PathBuf>) -> anyhow::Result<SettingsStore> {
    match path {
        Some(path) => Ok(SettingsStore::new(path)),
        None => SettingsStore::open_default(),
    }
}

fn open_store(repository_url: Option<String>) -> DataStore {
    let provider = match repository_url {
        Some(url) => FsProvider::new().with_repository_url(url),
        None => FsProvider::new(),
    };
    DataStore::new(Arc::new(provider))
}

async fn serve(store: DataStore, base_path: &str, port: u16) -> anyhow::Result<()> {
    if let Err(e) = store.load_all(base_path).await {
        tracing::warn!("Initial load failed, serving without data: {}", e);
    }

    let app = api::create_router(store);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("e2e-catalog listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

fn update_settings(settings: &SettingsStore, command: SettingsCommand) -> anyhow::Result<()> {
    match command {
        SettingsCommand::Show => {
            println!("{}", serde_json::to_string_pretty(&settings.get())?);
        }
        SettingsCommand::Set {
            base_path,
            e2e_pwd,
            e2e_url,
            code_editor,
            backoffice_api_key,
            theme,
        } => {
            let current = settings.get();
            let updated = Settings {
                base_path: base_path.unwrap_or(current.base_path),
                e2e_pwd: e2e_pwd.unwrap_or(current.e2e_pwd),
                e2e_url: e2e_url.unwrap_or(current.e2e_url),
                code_editor: code_editor.unwrap_or(current.code_editor),
                backoffice_api_key: backoffice_api_key.unwrap_or(current.backoffice_api_key),
                theme: theme.unwrap_or(current.theme),
            };
            settings.update(updated)?;
            println!("Saved settings to {}", settings.path().display());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let use_stderr = !matches!(cli.command, None | Some(Commands::Serve { .. }));
    init_tracing(use_stderr);

    let settings = open_settings(cli.settings_file)?;
    let base_path = cli
        .base_path
        .unwrap_or_else(|| settings.init().base_path);
    let store = open_store(cli.repository_url);

    match cli.command {
        Some(Commands::Serve { port }) => serve(store, &base_path, port).await?,
        None => serve(store, &base_path, DEFAULT_PORT).await?,
        Some(Commands::Dashboard { json }) => {
            store.load_all(&base_path).await?;
            let report = dashboard::report(&store.snapshot());

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render::render_dashboard(&report));
            }
        }
        Some(Commands::Scenarios { json }) => {
            store.load_all(&base_path).await?;
            let rows = store.snapshot().scenario_rows();

            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                print!("{}", render::render_scenarios(&rows));
            }
        }
        Some(Commands::Steps { json }) => {
            let steps = store
                .provider()
                .load_step_definitions(&base_path)
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&steps)?);
            } else {
                print!("{}", render::render_steps(&steps));
            }
        }
        Some(Commands::Settings { command }) => update_settings(&settings, command)?,
    }

    Ok(())
}
