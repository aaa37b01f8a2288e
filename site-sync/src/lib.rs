//! # site-sync
//!
//! Réconciliation des fichiers de sites (`<id>.json`) avec des jeux de
//! données de référence.
//!
//! ## Features
//!
//! - Registre des sites en JSON ou preset embarqué (`default`, `missouri`)
//! - Lecture/écriture des fichiers de sites sans perte des champs inconnus
//! - Rapport de passage (console ou JSON)
//! - CLI simple
//!
//! ## Usage CLI
//!
//! ```bash
//! # Appliquer les limites PAD-US
//! site-sync reconcile --sites ./data/sites --source ./padus-mo.geojson --provenance "PAD-US 3.0"
//!
//! # Polygones approchés pour les sites sans limite
//! site-sync approximate --sites ./data/sites
//!
//! # Extraire et simplifier les aires protégées
//! site-sync filter --input ./padus-fee.geojson --output ./conservation.geojson --min-acres 500
//! ```

pub mod config;
pub mod report;
pub mod run;
pub mod source;
pub mod store;

pub use config::RegistryConfig;
pub use report::{RunReport, RunStatus};
pub use store::{SiteStore, StoreError};
