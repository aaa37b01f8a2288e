//! Types d'erreurs pour le crate boundary-core

use thiserror::Error;

/// Erreurs pouvant survenir lors de la simplification, du matching ou de la réconciliation
#[derive(Debug, Error)]
pub enum BoundaryError {
    /// Anneau malformé (trop peu de points, non fermé, coordonnées NaN)
    #[error("Invalid geometry for {context}: {reason}")]
    InvalidGeometry { context: String, reason: String },

    /// Tolérance négative ou non finie
    #[error("Invalid tolerance: {0}")]
    InvalidTolerance(f64),

    /// Plusieurs candidats équivalents en mode strict
    #[error("Ambiguous match for {site_id}: {} candidates ({})", .candidates.len(), .candidates.join(", "))]
    AmbiguousMatch {
        site_id: String,
        candidates: Vec<String>,
    },

    /// Surface calculée hors de la bande tolérée
    #[error(
        "Area validation failed for {site_id}: expected {expected_km2:.2} km², got {actual_km2:.2} km² (tolerance {:.0}%)",
        .tolerance * 100.0
    )]
    AreaValidationFailure {
        site_id: String,
        expected_km2: f64,
        actual_km2: f64,
        tolerance: f64,
    },

    /// Géométrie non surfacique impossible à fusionner
    #[error("Cannot merge {kind} geometry into boundary of {site_id}")]
    UnmergeableGeometry { site_id: String, kind: String },

    /// Surface de référence absente
    #[error("Missing reference area for {0}")]
    MissingReferenceArea(String),

    /// Centre absent (ni location, ni géométrie exploitable)
    #[error("Missing center point for {0}")]
    MissingCenter(String),

    /// Site absent du registre
    #[error("Unknown site: {0}")]
    UnknownSite(String),
}

impl BoundaryError {
    /// Crée une erreur de géométrie invalide
    pub fn invalid_geometry(context: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            context: context.into(),
            reason: reason.into(),
        }
    }

    /// Ajoute le site concerné au contexte d'une erreur de géométrie
    pub fn for_site(self, site_id: &str) -> Self {
        match self {
            Self::InvalidGeometry { context, reason } => Self::InvalidGeometry {
                context: format!("{site_id} ({context})"),
                reason,
            },
            other => other,
        }
    }
}
