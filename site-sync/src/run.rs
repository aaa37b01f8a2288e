//! Chargement et réécriture des sites pendant un passage

use boundary_core::SiteRecord;
use tracing::warn;

use crate::report::RunReport;
use crate::store::{SiteStore, StoreError};

/// Charge les sites demandés ; un fichier absent est ignoré, un fichier
/// illisible compte comme échec.
pub fn load_records(store: &SiteStore, ids: &[String], report: &mut RunReport) -> Vec<SiteRecord> {
    let mut records = Vec::with_capacity(ids.len());
    for id in ids {
        match store.load(id) {
            Ok(record) => records.push(record),
            Err(StoreError::NotFound(path)) => {
                warn!(site_id = %id, path = %path.display(), "Site file not found, skipping");
                report.record_missing(id);
            }
            Err(e) => {
                warn!(site_id = %id, error = %e, "Failed to load site");
                report.record_load_failure(id, e.to_string());
            }
        }
    }
    records
}

/// Réécrit uniquement les sites modifiés ; retourne le nombre de fichiers écrits
pub fn save_changed(
    store: &SiteStore,
    before: &[SiteRecord],
    after: &[SiteRecord],
    report: &mut RunReport,
) -> usize {
    let mut written = 0;
    for (old, new) in before.iter().zip(after) {
        if old == new {
            continue;
        }
        match store.save(new) {
            Ok(()) => written += 1,
            Err(e) => {
                warn!(site_id = %new.id, error = %e, "Failed to save site");
                report.record_write_failure(&new.id, e.to_string());
            }
        }
    }
    written
}
