//! Bilan d'un passage de réconciliation

use serde::Serialize;

use super::SiteOutcome;
use crate::BoundaryError;

/// Échec sur un site (le lot continue)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteFailure {
    pub site_id: String,
    pub reason: String,
}

/// Compteurs et échecs d'un lot
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub updated: usize,
    pub skipped_high_quality: usize,
    pub skipped_other: usize,
    pub failed: usize,
    pub no_match: usize,
    pub failures: Vec<SiteFailure>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Comptabilise le résultat d'un site
    pub fn record(&mut self, site_id: &str, result: &Result<SiteOutcome, BoundaryError>) {
        match result {
            Ok(outcome) => self.record_outcome(outcome),
            Err(e) => self.record_failure(site_id, e.to_string()),
        }
    }

    pub fn record_outcome(&mut self, outcome: &SiteOutcome) {
        match outcome {
            SiteOutcome::Updated { .. } | SiteOutcome::Approximated { .. } => self.updated += 1,
            SiteOutcome::SkippedHighQuality => self.skipped_high_quality += 1,
            SiteOutcome::SkippedHasBoundary | SiteOutcome::NotInRegistry => self.skipped_other += 1,
            SiteOutcome::NoMatch => self.no_match += 1,
        }
    }

    pub fn record_failure(&mut self, site_id: &str, reason: impl Into<String>) {
        self.failed += 1;
        self.failures.push(SiteFailure {
            site_id: site_id.to_string(),
            reason: reason.into(),
        });
    }

    /// Ajoute les compteurs d'un autre bilan
    pub fn merge(&mut self, other: RunSummary) {
        self.updated += other.updated;
        self.skipped_high_quality += other.skipped_high_quality;
        self.skipped_other += other.skipped_other;
        self.failed += other.failed;
        self.no_match += other.no_match;
        self.failures.extend(other.failures);
    }

    /// Nombre total de sites comptabilisés
    pub fn total(&self) -> usize {
        self.updated + self.skipped_high_quality + self.skipped_other + self.failed + self.no_match
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts() {
        let mut summary = RunSummary::new();
        summary.record("a", &Ok(SiteOutcome::SkippedHighQuality));
        summary.record("b", &Ok(SiteOutcome::NoMatch));
        summary.record(
            "c",
            &Err(BoundaryError::MissingReferenceArea("c".to_string())),
        );

        assert_eq!(summary.skipped_high_quality, 1);
        assert_eq!(summary.no_match, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].site_id, "c");
        assert!(summary.failures[0].reason.contains("reference area"));
        assert_eq!(summary.total(), 3);
    }

    #[test]
    fn test_merge() {
        let mut a = RunSummary::new();
        a.record_failure("x", "boom");
        let mut b = RunSummary::new();
        b.skipped_other = 2;
        b.record_failure("y", "bang");

        a.merge(b);
        assert_eq!(a.failed, 2);
        assert_eq!(a.skipped_other, 2);
        assert_eq!(a.failures.len(), 2);
    }
}
