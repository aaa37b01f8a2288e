//! Point d'entrée CLI pour site-sync

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::{Commands, ReconcileArgs};

/// Réconcilier les limites des sites avec des jeux de données de référence
#[derive(Parser)]
#[command(name = "site-sync")]
#[command(author, version)]
#[command(about = "Réconcilier les limites des sites naturels avec des sources de référence (GeoJSON)")]
#[command(long_about = "Applique aux fichiers de sites les limites issues de sources officielles (USFS, PAD-US, FWS), génère des polygones approchés pour les sites sans limite et simplifie les jeux de données GeoJSON.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Reconcile {
            sites,
            source,
            registry,
            tolerance,
            provenance,
            strict,
            jobs,
            options,
            site,
            report,
        } => {
            info!(source = %source.display(), registry = %registry, "Reconciling sites");
            let report = cli::cmd_reconcile(ReconcileArgs {
                sites,
                source,
                registry,
                tolerance,
                provenance,
                strict,
                jobs,
                options,
                site,
                report,
            })?;
            report.display();
        }
        Commands::Approximate {
            sites,
            threshold,
            report,
        } => {
            info!("Generating approximate boundaries");
            let report = cli::cmd_approximate(sites, threshold, report.as_deref())?;
            report.display();
        }
        Commands::Simplify {
            input,
            output,
            tolerance,
        } => {
            info!(input = %input.display(), output = %output.display(), "Simplifying");
            cli::cmd_simplify(&input, &output, tolerance)?;
        }
        Commands::Filter {
            input,
            output,
            min_acres,
            tolerance,
        } => {
            info!(inputs = input.len(), output = %output.display(), "Filtering conservation areas");
            cli::cmd_filter(&input, &output, min_acres, tolerance)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .init();
}
