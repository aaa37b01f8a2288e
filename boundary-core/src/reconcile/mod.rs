//! Réconciliation des sites
//!
//! Orchestration matching → fusion → simplification → contrôle de surface →
//! métadonnées. Un site de qualité `high` n'est jamais réécrit.

pub mod merge;
pub mod summary;

pub use merge::merge_geometries;
pub use summary::{RunSummary, SiteFailure};

use chrono::{Local, NaiveDate};
use geo::Geometry;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::feature::SourceFeature;
use crate::matcher::{FeatureMatcher, MatchMode};
use crate::metrics::{
    default_point_count, generate_approximate_geometry, geometry_area, site_seed,
    DEFAULT_MULTIPART_THRESHOLD_KM2,
};
use crate::simplify::{check_tolerance, count_points, simplify_geometry};
use crate::types::{DataQuality, SiteIdentity, SiteRecord, SiteRegistry};
use crate::BoundaryError;

/// Provenance inscrite sur les géométries générées
pub const APPROXIMATION_SOURCE: &str = "Generated approximation based on area and center point";

/// Paramètres d'un passage de réconciliation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Tolérance Douglas-Peucker (degrés)
    pub tolerance: f64,

    /// Écart relatif toléré entre la surface appariée et la surface de
    /// référence (`None` : pas de contrôle)
    pub area_tolerance: Option<f64>,

    /// Écart relatif toléré pour les polygones générés
    pub synthetic_area_tolerance: f64,

    /// Seuil de découpage des polygones générés (km²)
    pub multipart_threshold_km2: f64,

    pub match_mode: MatchMode,

    /// Traitement des lots en parallèle (rayon)
    pub parallel: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            tolerance: 0.001,
            area_tolerance: Some(0.5),
            synthetic_area_tolerance: 0.15,
            multipart_threshold_km2: DEFAULT_MULTIPART_THRESHOLD_KM2,
            match_mode: MatchMode::All,
            parallel: false,
        }
    }
}

/// Résultat d'une réconciliation sur un site
#[derive(Debug, Clone, PartialEq)]
pub enum SiteOutcome {
    /// Limite appliquée depuis les features appariées
    Updated {
        sources: usize,
        points_before: usize,
        points_after: usize,
        area_km2: f64,
    },
    /// Polygone approché généré
    Approximated { points: usize, area_km2: f64 },
    /// Site déjà en qualité high : inchangé
    SkippedHighQuality,
    /// Site déjà doté d'une limite surfacique : pas d'approximation
    SkippedHasBoundary,
    /// Site absent du registre
    NotInRegistry,
    /// Aucune feature ne correspond
    NoMatch,
}

/// Orchestrateur de la réconciliation
#[derive(Debug)]
pub struct Reconciler {
    options: ReconcileOptions,
    matcher: FeatureMatcher,
    today: NaiveDate,
}

impl Reconciler {
    pub fn new(options: ReconcileOptions) -> Result<Self, BoundaryError> {
        check_tolerance(options.tolerance)?;
        Ok(Self {
            options,
            matcher: FeatureMatcher::default(),
            today: Local::now().date_naive(),
        })
    }

    pub fn with_matcher(mut self, matcher: FeatureMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Date inscrite dans `lastUpdated`
    pub fn with_date(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Applique au site la limite issue des features appariées.
    ///
    /// En cas d'erreur, le site n'est pas modifié.
    pub fn reconcile(
        &self,
        identity: &SiteIdentity,
        record: &mut SiteRecord,
        features: &[SourceFeature],
        provenance: &str,
    ) -> Result<SiteOutcome, BoundaryError> {
        if record.is_frozen() {
            debug!(site_id = %record.id, "Already high quality, skipping");
            return Ok(SiteOutcome::SkippedHighQuality);
        }

        let matches = self
            .matcher
            .select(identity, features, self.options.match_mode)?;
        if matches.is_empty() {
            debug!(site_id = %record.id, "No matching feature");
            return Ok(SiteOutcome::NoMatch);
        }

        let merged = merge_geometries(&record.id, matches.iter().map(|m| &m.feature.geometry))?;
        let points_before = count_points(&merged);

        let simplified = simplify_geometry(&merged, self.options.tolerance, "boundary")
            .map_err(|e| e.for_site(&record.id))?;
        let points_after = count_points(&simplified);
        let area_km2 = geometry_area(&simplified);

        if let Some(tolerance) = self.options.area_tolerance {
            match record.reference_area_km2() {
                Some(expected) => check_area(&record.id, expected, area_km2, tolerance)?,
                None => debug!(site_id = %record.id, "No reference area, skipping area check"),
            }
        }

        self.apply_boundary(record, simplified, provenance);

        info!(
            site_id = %record.id,
            sources = matches.len(),
            points_before,
            points_after,
            area_km2 = %format!("{:.1}", area_km2),
            "Boundary updated"
        );

        Ok(SiteOutcome::Updated {
            sources: matches.len(),
            points_before,
            points_after,
            area_km2,
        })
    }

    /// Génère un polygone approché à partir du centre et de la surface de référence.
    ///
    /// Jamais appliqué à un site high, ni à un site qui a déjà une limite.
    pub fn approximate(&self, record: &mut SiteRecord) -> Result<SiteOutcome, BoundaryError> {
        if record.is_frozen() {
            return Ok(SiteOutcome::SkippedHighQuality);
        }
        if record.has_boundary() {
            debug!(site_id = %record.id, "Site already has a boundary, skipping");
            return Ok(SiteOutcome::SkippedHasBoundary);
        }

        let expected = record
            .reference_area_km2()
            .filter(|a| *a > 0.0)
            .ok_or_else(|| BoundaryError::MissingReferenceArea(record.id.clone()))?;
        let center = record
            .center()
            .ok_or_else(|| BoundaryError::MissingCenter(record.id.clone()))?;

        let geometry = generate_approximate_geometry(
            center,
            expected,
            default_point_count(expected),
            site_seed(&record.id),
            self.options.multipart_threshold_km2,
        )
        .map_err(|e| e.for_site(&record.id))?;

        let area_km2 = geometry_area(&geometry);
        check_area(
            &record.id,
            expected,
            area_km2,
            self.options.synthetic_area_tolerance,
        )?;

        let points = count_points(&geometry);
        record.geometry = geometry;
        record.metadata.data_quality = DataQuality::Medium;
        record.metadata.geometry_source = Some(APPROXIMATION_SOURCE.to_string());
        record.metadata.last_updated = Some(self.today);
        record.metadata.approximate_area = Some(true);

        info!(
            site_id = %record.id,
            points,
            error_pct = %format!("{:.1}", (area_km2 - expected).abs() / expected * 100.0),
            "Generated approximation"
        );

        Ok(SiteOutcome::Approximated { points, area_km2 })
    }

    fn apply_boundary(&self, record: &mut SiteRecord, geometry: Geometry, provenance: &str) {
        record.geometry = geometry;
        record.metadata.data_quality = DataQuality::High;
        record.metadata.geometry_source = Some(provenance.to_string());
        record.metadata.last_updated = Some(self.today);
        record.metadata.approximate_area = None;
    }

    fn reconcile_entry(
        &self,
        registry: &SiteRegistry,
        record: &mut SiteRecord,
        features: &[SourceFeature],
        provenance: &str,
    ) -> Result<SiteOutcome, BoundaryError> {
        match registry.get(&record.id) {
            Some(identity) => self.reconcile(identity, record, features, provenance),
            None => Ok(SiteOutcome::NotInRegistry),
        }
    }

    /// Réconcilie un lot de sites ; une erreur sur un site ne stoppe pas le lot
    pub fn reconcile_batch(
        &self,
        registry: &SiteRegistry,
        records: &mut [SiteRecord],
        features: &[SourceFeature],
        provenance: &str,
    ) -> RunSummary {
        self.run_batch(records, |record| {
            self.reconcile_entry(registry, record, features, provenance)
        })
    }

    /// Génère les approximations d'un lot de sites
    pub fn approximate_batch(&self, records: &mut [SiteRecord]) -> RunSummary {
        self.run_batch(records, |record| self.approximate(record))
    }

    fn run_batch<F>(&self, records: &mut [SiteRecord], process: F) -> RunSummary
    where
        F: Fn(&mut SiteRecord) -> Result<SiteOutcome, BoundaryError> + Sync,
    {
        // Chaque site appartient à un seul worker : pas de verrou
        let results: Vec<(String, Result<SiteOutcome, BoundaryError>)> = if self.options.parallel {
            records
                .par_iter_mut()
                .map(|record| (record.id.clone(), process(record)))
                .collect()
        } else {
            records
                .iter_mut()
                .map(|record| (record.id.clone(), process(record)))
                .collect()
        };

        let mut summary = RunSummary::new();
        for (site_id, result) in &results {
            if let Err(e) = result {
                warn!(site_id = %site_id, error = %e, "Site failed");
            }
            summary.record(site_id, result);
        }
        summary
    }
}

/// Vérifie que `actual` est dans la bande relative `tolerance` autour de `expected`
fn check_area(
    site_id: &str,
    expected_km2: f64,
    actual_km2: f64,
    tolerance: f64,
) -> Result<(), BoundaryError> {
    let relative = (actual_km2 - expected_km2).abs() / expected_km2;
    if expected_km2 > 0.0 && relative <= tolerance {
        return Ok(());
    }
    Err(BoundaryError::AreaValidationFailure {
        site_id: site_id.to_string(),
        expected_km2,
        actual_km2,
        tolerance,
    })
}
