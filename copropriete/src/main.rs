//! Point d'entrée CLI pour copropriete

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

mod cli;

use cli::Commands;

/// Charge les variables `COPRO_*` d'un fichier .env: celui du répertoire
/// courant (ou d'un ancêtre), sinon celui placé à côté de l'exécutable
fn load_env() {
    if dotenvy::dotenv().is_ok() {
        return;
    }
    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(".env")));
    if let Some(path) = beside_exe {
        let _ = dotenvy::from_path(path);
    }
}

/// Générer les tableaux de copropriété depuis un export de titre foncier
#[derive(Parser)]
#[command(name = "copropriete")]
#[command(author, version)]
#[command(about = "Générer les tableaux de copropriété (voix, quotes-parts, contenances) depuis un export CSV de titre foncier")]
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
    load_env();

    let cli = Cli::parse();

    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Inspect {
            input,
            json,
            parser,
        } => {
            let config = parser.resolve()?;
            info!(input = %input.display(), "Inspection de l'export");
            cli::cmd_inspect(&input, json, &config)?;
        }
        Commands::Generate {
            input,
            output,
            reports,
            summary,
            parser,
        } => {
            let config = parser.resolve()?;
            info!(input = %input.display(), output = %output.display(), "Génération des tableaux");
            cli::cmd_generate(&input, &output, &reports, summary.as_deref(), &config)?;
        }
    }

    Ok(())
}

/// `-q` ne garde que les avertissements; `-v` ajoute le détail par ligne
/// écartée, `-vv` tout le reste. `RUST_LOG` complète ce niveau.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::WARN
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(verbose > 0)
        .with_file(false)
        .with_line_number(false)
        .init();
}
