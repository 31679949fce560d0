use anyhow::Context;
use bookshelf::StoreBackend;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

/// Administer and run the bookshelf catalog service
#[derive(Parser, Debug)]
#[command(name = "bookshelf-cli", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect to the store, apply migrations and serve HTTP
    Serve {
        /// Listen port, overriding configuration
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Apply pending schema migrations and exit
    Migrate,
    /// Print every mounted route
    Routes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings =
        Settings::load().with_context(|| "failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                settings.server.port = port;
            }
            bookshelf::app::run(settings).await
        }
        Command::Migrate => {
            let pool = bookshelf_db::connect(&settings.database)
                .await
                .context("failed to connect to the database")?;
            let registry = bookshelf::build_registry(StoreBackend::memory().store())?;
            let applied = bookshelf::app::migrate(&pool, &registry).await?;
            pool.close().await;

            tracing::info!(applied, "migrations complete");
            Ok(())
        }
        Command::Routes => {
            let registry = bookshelf::build_registry(StoreBackend::memory().store())?;
            let spec = bookshelf_http::router::merged_openapi(&registry);

            if let Some(paths) = spec["paths"].as_object() {
                for (path, item) in paths {
                    let methods = item
                        .as_object()
                        .map(|ops| ops.keys().map(|m| m.to_uppercase()).collect::<Vec<_>>())
                        .unwrap_or_default();
                    println!("{:<24} {}", path, methods.join(", "));
                }
            }
            Ok(())
        }
    }
}
