//! Lecture des jeux de données sources (FeatureCollection GeoJSON)

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use boundary_core::{features_from_collection, SourceFeature};
use tracing::{info, warn};

/// Features d'une source, avec les features écartées
#[derive(Debug)]
pub struct SourceData {
    pub features: Vec<SourceFeature>,
    pub skipped: usize,
    pub checksum: String,
}

/// Charge une FeatureCollection.
///
/// Un fichier illisible ou qui n'est pas une FeatureCollection est une
/// erreur fatale ; une feature sans géométrie est seulement écartée.
pub fn load_features(path: &Path) -> Result<SourceData> {
    let checksum = compute_file_checksum(path)?;

    let file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let collection: geojson::FeatureCollection = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse FeatureCollection {}", path.display()))?;

    let (features, errors) = features_from_collection(collection);
    for e in errors.iter().take(10) {
        warn!(source = %path.display(), "Skipped feature: {}", e);
    }

    info!(
        source = %path.display(),
        features = features.len(),
        skipped = errors.len(),
        "Source loaded"
    );

    Ok(SourceData {
        features,
        skipped: errors.len(),
        checksum,
    })
}

/// Écrit des features dans une FeatureCollection
pub fn write_features(features: &[SourceFeature], path: &Path) -> Result<()> {
    let collection = geojson::FeatureCollection {
        bbox: None,
        features: features
            .iter()
            .map(|f| geojson::Feature {
                bbox: None,
                geometry: Some(geojson::Geometry::new(geojson::Value::from(&f.geometry))),
                id: f.id.clone().map(geojson::feature::Id::String),
                properties: Some(f.properties.clone()),
                foreign_members: None,
            })
            .collect(),
        foreign_members: None,
    };

    let json = serde_json::to_string(&collection).context("Failed to serialize features")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Calcule le checksum blake3 d'un fichier
pub fn compute_file_checksum(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        let n = file.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    Ok(hasher.finalize().to_hex().to_string())
}
