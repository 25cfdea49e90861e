//! Définition et implémentation des commandes CLI
//!
//! - `inspect`: lit un export et affiche la structure du titre
//! - `generate`: lit un export et écrit les tableaux xlsx

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::{info, warn};

use copropriete::config::{parse_separator, Config};
use copropriete::export;
use copropriete::report::GenerationReport;
use copropriete::session::Session;
use copropriete::tables::ReportKind;
use titre_foncier::numeric::format_fixed;
use titre_foncier::LayoutVariant;

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a CSV export and print the recovered title structure
    Inspect {
        /// Path to the CSV export
        #[arg(short, long)]
        input: PathBuf,

        /// Print the parsed title as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        parser: ParserArgs,
    },

    /// Generate the xlsx reports from a CSV export
    Generate {
        /// Path to the CSV export
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory for the xlsx files
        #[arg(short, long)]
        output: PathBuf,

        /// Report to generate: voix, quot, ta, trn, trc (repeatable; défaut: voix, quot, ta, trc)
        #[arg(short, long = "report")]
        reports: Vec<ReportKind>,

        /// Save the generation report as JSON
        #[arg(long)]
        summary: Option<PathBuf>,

        #[command(flatten)]
        parser: ParserArgs,
    },
}

/// Options de lecture de l'export
#[derive(Args)]
pub struct ParserArgs {
    /// Config preset name (standard/decale) or path to a JSON config
    #[arg(long, default_value = "standard")]
    pub config: String,

    /// Field separator (défaut : env COPRO_SEPARATOR / ';')
    #[arg(long)]
    pub separator: Option<String>,

    /// Column layout: standard, shifted (défaut : env COPRO_LAYOUT / standard)
    #[arg(long)]
    pub layout: Option<LayoutVariant>,

    /// Rows consumed from the "Propriété dite" marker (défaut : env COPRO_HEADER_SKIP / 1)
    #[arg(long)]
    pub header_skip: Option<usize>,
}

impl ParserArgs {
    /// Preset ou fichier, puis environnement, puis options explicites
    pub fn resolve(&self) -> Result<Config> {
        let mut config = Config::resolve(&self.config)?;
        config.apply_env()?;

        if let Some(separator) = &self.separator {
            config.separator = parse_separator(separator)?;
        }
        if let Some(layout) = self.layout {
            config.layout = layout;
        }
        if let Some(header_skip) = self.header_skip {
            config.header_skip = header_skip;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Exécute la commande inspect
pub fn cmd_inspect(input: &Path, json: bool, config: &Config) -> Result<()> {
    let mut session = Session::new();
    let result = session
        .import(input, &config.parser_options())
        .context(format!("Failed to import {}", input.display()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result.title)?);
        return Ok(());
    }

    let title = &result.title;
    println!("=== Titre foncier {} ===", title.titre_foncier);
    println!("Propriété dite: {}", title.propriete_nom);
    println!("Layout: {:?}, header skip: {}", config.layout, config.header_skip);
    println!(
        "Floors: {}, lots: {} ({} private)",
        title.etages.len(),
        title.lot_count(),
        title.private_lot_count()
    );

    for floor in &title.etages {
        println!(
            "  {} [{}]: {} lots, {} m² / {} m²",
            floor.nom,
            floor.cotes,
            floor.lots.len(),
            format_fixed(floor.total_surface_interieure, 2),
            format_fixed(floor.total_surface_avec_surplomb, 2)
        );
    }

    if !result.diagnostics.is_empty() {
        println!("\nDiagnostics ({}):", result.diagnostics.len());
        for d in &result.diagnostics {
            println!("  {}", d);
        }
    }

    Ok(())
}

/// Exécute la commande generate
pub fn cmd_generate(
    input: &Path,
    output: &Path,
    reports: &[ReportKind],
    summary: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let start = Instant::now();

    let mut session = Session::new();
    let parsed = session
        .import(input, &config.parser_options())
        .context(format!("Failed to import {}", input.display()))?;
    let mut report = GenerationReport::new(parsed);

    let kinds = if reports.is_empty() {
        ReportKind::DEFAULT.to_vec()
    } else {
        reports.to_vec()
    };

    let outcome = session.generate(&kinds).and_then(|generated| {
        let paths = export::write_all(&generated, output)?;
        Ok(generated.into_iter().zip(paths).collect::<Vec<_>>())
    });

    match &outcome {
        Ok(files) => {
            for (generated, path) in files {
                report.record_file(generated.kind, path, generated.bytes.len());
            }
        }
        Err(e) => {
            warn!("Generation failed: {}", e);
            report.record_failure(e.to_string());
        }
    }

    report.set_duration(start.elapsed());
    report.finalize();
    report.display();

    if let Some(path) = summary {
        report
            .save_to_file(path)
            .context(format!("Failed to save report: {}", path.display()))?;
        info!(path = %path.display(), "Generation report saved");
    }

    info!("{}", report.summary());
    outcome.map(|_| ()).context("Report generation failed")
}
