//! Rapport de génération
//!
//! Résume un passage `import → génération`: ce qui a été lu, ce qui a été
//! écarté, et les fichiers produits.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;

use titre_foncier::{Diagnostic, ParseResult};

use crate::tables::ReportKind;

/// Statut global de la génération
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GenerationStatus {
    /// Tous les tableaux générés, aucune ligne écartée
    Success,
    /// Tableaux générés, mais des lignes ont été écartées ou dégradées
    PartialSuccess,
    /// Aucun fichier écrit
    Failed,
}

/// Fichier produit
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFile {
    pub report: ReportKind,
    pub path: String,
    pub bytes: usize,
}

/// Rapport complet de génération
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    /// Ex: "154311 /05"
    pub titre_foncier: String,
    pub propriete_nom: String,
    /// Durée totale
    pub duration_secs: f64,
    pub status: GenerationStatus,

    // Compteurs
    pub floors: usize,
    pub lots: usize,
    pub private_lots: usize,
    /// Lignes ou étages écartés
    pub rows_skipped: usize,
    /// Lignes conservées avec un avertissement
    pub rows_degraded: usize,

    pub diagnostics: Vec<Diagnostic>,
    pub files: Vec<GeneratedFile>,

    /// Cause de l'échec, si la génération n'a pas abouti
    pub error: Option<String>,
}

impl GenerationReport {
    /// Crée un rapport à partir du résultat du parsing
    pub fn new(result: &ParseResult) -> Self {
        let title = &result.title;
        Self {
            titre_foncier: title.titre_foncier.clone(),
            propriete_nom: title.propriete_nom.clone(),
            duration_secs: 0.0,
            status: GenerationStatus::Success,
            floors: title.etages.len(),
            lots: title.lot_count(),
            private_lots: title.private_lot_count(),
            rows_skipped: result.skipped().count(),
            rows_degraded: result.warnings().count(),
            diagnostics: result.diagnostics.clone(),
            files: Vec::new(),
            error: None,
        }
    }

    /// Enregistre un fichier écrit
    pub fn record_file(&mut self, report: ReportKind, path: &Path, bytes: usize) {
        self.files.push(GeneratedFile {
            report,
            path: path.display().to_string(),
            bytes,
        });
    }

    /// Enregistre l'échec de la génération
    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        self.status = if self.error.is_some() || self.files.is_empty() {
            GenerationStatus::Failed
        } else if self.diagnostics.is_empty() {
            GenerationStatus::Success
        } else {
            GenerationStatus::PartialSuccess
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("GENERATION REPORT - Titre foncier {}", self.titre_foncier);
        println!("{}", "=".repeat(60));

        if !self.propriete_nom.is_empty() {
            println!("Propriété dite: {}", self.propriete_nom);
        }
        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);

        println!("\n--- SUMMARY ---");
        println!(
            "Floors: {}, lots: {} ({} private)",
            self.floors, self.lots, self.private_lots
        );
        println!(
            "Rows: {} skipped, {} degraded",
            self.rows_skipped, self.rows_degraded
        );

        if !self.files.is_empty() {
            println!("\n--- FILES ---");
            for f in &self.files {
                println!("  {}: {} ({} bytes)", f.report, f.path, f.bytes);
            }
        }

        if !self.diagnostics.is_empty() {
            println!("\n--- DIAGNOSTICS ({}) ---", self.diagnostics.len());
            for d in self.diagnostics.iter().take(20) {
                println!("  {}", d);
            }
            if self.diagnostics.len() > 20 {
                println!("  ... and {} more", self.diagnostics.len() - 20);
            }
        }

        if let Some(error) = &self.error {
            println!("\n--- ERROR ---");
            println!("  {}", error);
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} files, {} lots, {} skipped, {} degraded",
            self.titre_foncier,
            self.files.len(),
            self.lots,
            self.rows_skipped,
            self.rows_degraded
        )
    }
}
