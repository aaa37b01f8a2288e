//! Configuration : registre des sites et paramètres de réconciliation

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use boundary_core::{ReconcileOptions, SiteIdentity, SiteRegistry};
use serde::{Deserialize, Serialize};

/// Variable d'environnement : répertoire des sites
pub const ENV_SITES_DIR: &str = "SITE_SYNC_SITES_DIR";

/// Variable d'environnement : tolérance de simplification par défaut
pub const ENV_TOLERANCE: &str = "SITE_SYNC_TOLERANCE";

/// Presets embarqués
pub const PRESETS: [&str; 2] = ["default", "missouri"];

/// Registre des sites, indexé par identifiant
#[derive(Debug, Deserialize, Serialize)]
pub struct RegistryConfig {
    #[serde(flatten)]
    pub sites: BTreeMap<String, SiteEntry>,
}

/// Critères de matching d'un site
#[derive(Debug, Deserialize, Serialize)]
pub struct SiteEntry {
    /// Variantes de nom
    #[serde(alias = "name")]
    pub names: Vec<String>,

    /// Désignation attendue (ex: "National Forest")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

impl RegistryConfig {
    /// Charge un registre depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read registry file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse registry JSON")
    }

    /// Charge un registre depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "default" => Self::load_embedded(include_str!("presets/default.json")),
            "missouri" => Self::load_embedded(include_str!("presets/missouri.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: {}", preset, PRESETS.join(", ")),
        }
    }

    /// Nom de preset ou chemin de fichier
    pub fn resolve(name_or_path: &str) -> Result<Self> {
        if PRESETS.contains(&name_or_path) {
            Self::from_preset(name_or_path)
        } else {
            Self::load(Path::new(name_or_path))
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded registry")
    }

    /// Construit le registre immuable
    pub fn into_registry(self) -> Result<SiteRegistry> {
        let mut identities = Vec::with_capacity(self.sites.len());
        for (id, entry) in self.sites {
            if entry.names.iter().all(|n| n.trim().is_empty()) {
                anyhow::bail!("Registry entry {} has no name", id);
            }
            identities.push(SiteIdentity::new(id, entry.names, entry.designation.as_deref()));
        }
        Ok(SiteRegistry::new(identities))
    }
}

/// Options de réconciliation depuis un fichier JSON (champs absents = défauts)
pub fn load_options(path: &Path) -> Result<ReconcileOptions> {
    let content = std::fs::read_to_string(path)
        .context(format!("Failed to read options file: {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse options JSON")
}

/// Répertoire des sites : argument CLI, sinon `SITE_SYNC_SITES_DIR`
pub fn sites_dir(cli: Option<PathBuf>) -> Result<PathBuf> {
    cli.or_else(|| std::env::var_os(ENV_SITES_DIR).map(PathBuf::from))
        .with_context(|| format!("No sites directory: use --sites or set {}", ENV_SITES_DIR))
}

/// Tolérance : argument CLI, sinon `SITE_SYNC_TOLERANCE`, sinon `default`
pub fn tolerance(cli: Option<f64>, default: f64) -> Result<f64> {
    if let Some(t) = cli {
        return Ok(t);
    }
    match std::env::var(ENV_TOLERANCE) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {}", ENV_TOLERANCE, raw)),
        Err(_) => Ok(default),
    }
}
