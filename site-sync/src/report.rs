//! Rapport de passage avec graceful degradation
//!
//! Un échec sur un site n'arrête pas le lot : il est consigné ici avec sa
//! raison, puis affiché ou sauvegardé en JSON.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use boundary_core::{RunSummary, SiteFailure};
use serde::Serialize;

/// Statut global du passage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunStatus {
    /// Aucun échec
    Success,
    /// Des sites mis à jour et des échecs
    PartialSuccess,
    /// Uniquement des échecs
    Failed,
}

/// Rapport complet d'un passage
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Commande exécutée (reconcile, approximate)
    pub command: String,
    /// Fichier source et son checksum blake3
    pub source: Option<String>,
    pub source_checksum: Option<String>,
    /// Provenance inscrite sur les sites mis à jour
    pub provenance: Option<String>,
    pub duration_secs: f64,
    pub status: RunStatus,

    pub sites_processed: usize,
    pub summary: RunSummary,

    /// Sites du registre sans fichier (ignorés)
    pub missing_sites: Vec<String>,
    /// Sites mis à jour mais non réécrits
    pub write_failures: Vec<SiteFailure>,
}

impl RunReport {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
            source: None,
            source_checksum: None,
            provenance: None,
            duration_secs: 0.0,
            status: RunStatus::Success,
            sites_processed: 0,
            summary: RunSummary::default(),
            missing_sites: Vec::new(),
            write_failures: Vec::new(),
        }
    }

    pub fn with_source(mut self, path: &Path, checksum: String) -> Self {
        self.source = Some(path.display().to_string());
        self.source_checksum = Some(checksum);
        self
    }

    pub fn with_provenance(mut self, provenance: &str) -> Self {
        self.provenance = Some(provenance.to_string());
        self
    }

    /// Site du registre sans fichier : compté comme ignoré
    pub fn record_missing(&mut self, site_id: &str) {
        self.sites_processed += 1;
        self.summary.skipped_other += 1;
        self.missing_sites.push(site_id.to_string());
    }

    /// Fichier de site illisible : compté comme échec
    pub fn record_load_failure(&mut self, site_id: &str, reason: impl Into<String>) {
        self.sites_processed += 1;
        self.summary.record_failure(site_id, reason);
    }

    pub fn record_write_failure(&mut self, site_id: &str, reason: impl Into<String>) {
        self.write_failures.push(SiteFailure {
            site_id: site_id.to_string(),
            reason: reason.into(),
        });
    }

    pub fn merge_summary(&mut self, summary: RunSummary) {
        self.sites_processed += summary.total();
        self.summary.merge(summary);
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration_secs = duration.as_secs_f64();
    }

    /// Détermine le statut final
    pub fn finalize(&mut self) {
        let failures = self.summary.failed + self.write_failures.len();
        let has_success = self.summary.updated > self.write_failures.len();

        self.status = if failures == 0 {
            RunStatus::Success
        } else if has_success {
            RunStatus::PartialSuccess
        } else {
            RunStatus::Failed
        };
    }

    /// Affiche le rapport sur la console
    pub fn display(&self) {
        println!("\n{}", "=".repeat(60));
        println!("RUN REPORT - {}", self.command);
        println!("{}", "=".repeat(60));

        println!("\nStatus: {:?}", self.status);
        println!("Duration: {:.2}s", self.duration_secs);
        if let Some(source) = &self.source {
            println!("Source: {}", source);
        }
        if let Some(provenance) = &self.provenance {
            println!("Provenance: {}", provenance);
        }

        let s = &self.summary;
        println!("\n--- SUMMARY ---");
        println!(
            "Sites: {} updated, {} already high quality, {} skipped, {} no match, {} failed",
            s.updated, s.skipped_high_quality, s.skipped_other, s.no_match, s.failed
        );

        if !self.missing_sites.is_empty() {
            println!("\n--- MISSING SITE FILES ({}) ---", self.missing_sites.len());
            for id in self.missing_sites.iter().take(10) {
                println!("  {}", id);
            }
            if self.missing_sites.len() > 10 {
                println!("  ... and {} more", self.missing_sites.len() - 10);
            }
        }

        let failures: Vec<&SiteFailure> =
            s.failures.iter().chain(self.write_failures.iter()).collect();
        if !failures.is_empty() {
            println!("\n--- FAILURES ({}) ---", failures.len());
            for f in failures.iter().take(20) {
                println!("  [{}] {}", f.site_id, f.reason);
            }
            if failures.len() > 20 {
                println!("  ... and {} more", failures.len() - 20);
            }
        }

        println!("\n{}", "=".repeat(60));
    }

    /// Sauvegarde le rapport en JSON
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        Ok(())
    }

    /// Affichage compact pour le résumé
    pub fn summary(&self) -> String {
        format!(
            "{}: {} updated, {} skipped, {} no match, {} failed",
            self.command,
            self.summary.updated,
            self.summary.skipped_high_quality + self.summary.skipped_other,
            self.summary.no_match,
            self.summary.failed + self.write_failures.len()
        )
    }
}
