//! Stockage des sites : un fichier `<id>.json` par site
//!
//! Lecture-modification-écriture du fichier entier ; les champs inconnus
//! du cœur sont conservés tels quels.

use std::path::{Path, PathBuf};

use boundary_core::SiteRecord;
use thiserror::Error;
use tracing::debug;

/// Erreurs d'accès au stockage des sites
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Site file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Sites directory does not exist: {0}")]
    MissingDirectory(PathBuf),
}

/// Répertoire des fichiers de sites
#[derive(Debug, Clone)]
pub struct SiteStore {
    dir: PathBuf,
}

impl SiteStore {
    /// Ouvre un répertoire existant
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(StoreError::MissingDirectory(dir));
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, site_id: &str) -> PathBuf {
        self.dir.join(format!("{site_id}.json"))
    }

    pub fn contains(&self, site_id: &str) -> bool {
        self.path_for(site_id).is_file()
    }

    /// Identifiants des sites présents, triés
    pub fn list_ids(&self) -> Result<Vec<String>, StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.dir.clone(),
            source,
        };

        let mut ids = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if path.is_file() && path.extension().map_or(false, |ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    ids.push(stem.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Lit un site
    pub fn load(&self, site_id: &str) -> Result<SiteRecord, StoreError> {
        let path = self.path_for(site_id);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::NotFound(path))
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        serde_json::from_str(&content).map_err(|source| StoreError::Parse { path, source })
    }

    /// Écrit un site (JSON indenté, retour à la ligne final)
    pub fn save(&self, record: &SiteRecord) -> Result<(), StoreError> {
        let path = self.path_for(&record.id);
        let mut json = serde_json::to_string_pretty(record).map_err(|source| StoreError::Parse {
            path: path.clone(),
            source,
        })?;
        json.push('\n');

        std::fs::write(&path, json).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(site_id = %record.id, path = %path.display(), "Site saved");
        Ok(())
    }
}
