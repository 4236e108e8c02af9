use clap::{Parser, Subcommand};

mod pipeline;
mod template;


#[derive(Debug, Parser)]
#[command(name = "wattlist")]
#[command(about = "Static price-table generator for the wattlist site")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the full pipeline and rewrite the host document
    Build,
    /// Parse inputs and report reconciliation counts without writing
    Check,
    /// Write a starter host template carrying the anchor markers
    Init,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = wattlist_core::load_app_config_from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Some(Commands::Build) | None => {
            let summary = pipeline::run_build(&config)?;
            println!(
                "Updated {} products ({} matched, {} price updates, {} priced) in {}",
                summary.products,
                summary.matched,
                summary.updated,
                summary.priced,
                config.output_path.display()
            );
        }
        Some(Commands::Check) => {
            let summary = pipeline::run_check(&config)?;
            println!(
                "{} products, {} matched, {} price updates, {} priced (nothing written)",
                summary.products, summary.matched, summary.updated, summary.priced
            );
        }
        Some(Commands::Init) => {
            template::write_starter_template(&config.site_path)?;
            println!("Wrote starter template to {}", config.site_path.display());
        }
    }

    Ok(())
}
