//! Vitrina CLI - Command-line interface for the retail analytics engine

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use vitrina::config::{self, EngineConfig};
use vitrina::engine::DataEngine;
use vitrina::kpi::{self, Category};
use vitrina::store::{self, Materialization};
use vitrina::ui::{self, Icons, Spinner};

#[derive(Parser)]
#[command(name = "vitrina")]
#[command(version = "0.0.1")]
#[command(about = "Retail analytics dashboard engine - snapshot materialization, KPI catalog, navigation state")]
#[command(long_about = r#"
Vitrina is the headless engine behind a retail BI dashboard:
  • Materializes a zstd-compressed SQLite snapshot into a local store, once
  • Degrades to an explicit offline mode when no store can be produced
  • Serves engine health, store statistics, the KPI catalog, and navigation

Example usage:
  vitrina init
  vitrina materialize --snapshot balance.db.zst
  vitrina stats
  vitrina serve --port 4820
"#)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the config file (defaults to vitrina.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a starter vitrina.toml and prepare the runtime directory
    Init {
        /// Overwrite an existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Materialize the local store from the compressed snapshot
    Materialize {
        /// Path to the compressed snapshot (overrides config)
        #[arg(short, long)]
        snapshot: Option<PathBuf>,

        /// Path to the local store (overrides config)
        #[arg(short = 't', long)]
        store: Option<PathBuf>,
    },

    /// Show statistics for the materialized store
    Stats {
        /// Path to the local store (overrides config)
        #[arg(short = 't', long)]
        store: Option<PathBuf>,
    },

    /// Print the KPI catalog
    Catalog {
        /// Restrict to one category (commercial, workforce, logistics)
        #[arg(short = 'C', long)]
        category: Option<String>,
    },

    /// Serve the read-only dashboard API
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let mut config = config::load_config(cli.config.as_deref())?.unwrap_or_default();

    match cli.command {
        Commands::Init { force } => {
            let path = cli.config.unwrap_or_else(config::default_config_path);
            let starter = EngineConfig {
                snapshot: Some(config::default_snapshot_path().display().to_string()),
                store: Some(config::default_store_path_in(Path::new(".")).display().to_string()),
                port: Some(config::DEFAULT_PORT),
            };

            config::write_config(&path, &starter, force)?;
            config::ensure_store_dir(&starter.store_path())?;
            config::ensure_gitignore(Path::new("."))?;

            ui::success(&format!("Wrote {}", path.display()));
            ui::info("Snapshot", &starter.snapshot_path().display().to_string());
            ui::info("Store", &starter.store_path().display().to_string());
        }

        Commands::Materialize { snapshot, store } => {
            if let Some(path) = snapshot {
                config.snapshot = Some(path.display().to_string());
            }
            if let Some(path) = store {
                config.store = Some(path.display().to_string());
            }
            let snapshot_path = config.snapshot_path();
            let store_path = config.store_path();

            ui::status(Icons::PACKAGE, "Snapshot", &snapshot_path.display().to_string());
            ui::status(Icons::DATABASE, "Store", &store_path.display().to_string());

            let spinner = Spinner::new("Materializing store");
            let outcome = store::materialize(&snapshot_path, &store_path);
            spinner.finish_and_clear();

            match outcome {
                Ok(Materialization::Reused) => {
                    ui::success("Store already materialized; snapshot not read");
                }
                Ok(Materialization::Decompressed { bytes, checksum }) => {
                    ui::success(&format!(
                        "Decompressed {} bytes (blake3 {})",
                        bytes,
                        checksum.to_hex()
                    ));
                }
                Ok(Materialization::Absent) => {
                    ui::warn("No snapshot and no store; dashboard will run offline");
                }
                Err(e) => {
                    ui::error(&format!("Materialization failed: {}", e));
                    return Err(e.into());
                }
            }
        }

        Commands::Stats { store } => {
            if let Some(path) = store {
                config.store = Some(path.display().to_string());
            }

            let engine = DataEngine::acquire(&config);
            let store = match engine.store() {
                Ok(store) => store,
                Err(e) => {
                    ui::warn(&format!("Engine offline: {}", e));
                    anyhow::bail!("no store available");
                }
            };

            let stats = store.stats()?;
            ui::section("Store Statistics");
            let mut rows: Vec<(String, String)> = stats
                .tables
                .iter()
                .map(|t| (t.name.clone(), format!("{} rows", t.rows)))
                .collect();
            rows.push(("total".to_string(), format!("{} rows", stats.total_rows)));
            println!("{}", ui::stats_table(&rows));
        }

        Commands::Catalog { category } => {
            let filter = category
                .as_deref()
                .map(Category::from_str)
                .transpose()?;

            ui::header("KPI Catalog");
            for entry in kpi::catalog() {
                if let Some(wanted) = filter {
                    if entry.category != wanted {
                        continue;
                    }
                }
                ui::section(entry.title);
                for metric in &entry.metrics {
                    ui::summary_row(metric.name, metric.chart.as_str());
                }
            }
        }

        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = Some(port);
            }

            let engine = DataEngine::global(&config);
            if !engine.is_online() {
                ui::warn("Engine is offline; data routes will return 503");
            }

            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(vitrina::server::start_server(config.port(), engine))?;
        }
    }

    Ok(())
}
