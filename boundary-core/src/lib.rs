//! # boundary-core
//!
//! Réconciliation des limites de sites naturels à partir de sources
//! géographiques hétérogènes (USFS, PAD-US, FWS, ...).
//!
//! ## Features
//!
//! - Simplification Douglas-Peucker itérative (pile explicite)
//! - Centroïde, surface planaire approchée, polygones approchés déterministes
//! - Matching des noms normalisés (abréviations NF, NWR, ...) avec classement explicite
//! - Réconciliation par lot, séquentielle ou parallèle (`rayon`)
//! - Types `geo` pour l'interopérabilité avec l'écosystème Rust géospatial
//!
//! ## Usage
//!
//! ```rust,ignore
//! use boundary_core::{Reconciler, ReconcileOptions, SiteRegistry};
//!
//! let reconciler = Reconciler::new(ReconcileOptions::default())?;
//! let summary = reconciler.reconcile_batch(&registry, &mut records, &features, "PAD-US 3.0");
//! println!("{} updated, {} failed", summary.updated, summary.failed);
//! ```

pub mod error;
pub mod feature;
pub mod matcher;
pub mod metrics;
pub mod reconcile;
pub mod simplify;
pub mod types;

pub use error::BoundaryError;
pub use feature::{features_from_collection, SourceFeature};
pub use matcher::{ConservationFilter, FeatureMatcher, MatchKind, MatchMode};
pub use metrics::LatLng;
pub use reconcile::{ReconcileOptions, Reconciler, RunSummary, SiteFailure, SiteOutcome};
pub use types::{
    DataQuality, Metadata, Properties, SiteArea, SiteIdentity, SiteRecord, SiteRegistry, SiteState,
};
