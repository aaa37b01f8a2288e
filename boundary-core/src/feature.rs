//! Features candidates issues des jeux de données externes

use geo::Geometry;
use serde_json::Value;

use crate::simplify::MIN_RING_POINTS;
use crate::types::Properties;
use crate::BoundaryError;

/// Un enregistrement candidat : propriétés libres + géométrie
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFeature {
    /// Identifiant de la feature dans la source (optionnel)
    pub id: Option<String>,

    /// Propriétés (les champs de nom varient selon la source)
    pub properties: Properties,

    /// Géométrie en lng/lat
    pub geometry: Geometry,
}

impl SourceFeature {
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Self {
            id: None,
            properties,
            geometry,
        }
    }

    /// Valeur texte d'une propriété, nombres convertis en texte
    pub fn property_str(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Valeur numérique d'une propriété (accepte aussi "1,234.5")
    pub fn property_f64(&self, key: &str) -> Option<f64> {
        match self.properties.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.replace(',', "").trim().parse().ok(),
            _ => None,
        }
    }
}

impl TryFrom<geojson::Feature> for SourceFeature {
    type Error = BoundaryError;

    fn try_from(feature: geojson::Feature) -> Result<Self, Self::Error> {
        let id = feature.id.map(|id| match id {
            geojson::feature::Id::String(s) => s,
            geojson::feature::Id::Number(n) => n.to_string(),
        });
        let context = id.clone().unwrap_or_else(|| "feature".to_string());

        let Some(geometry) = feature.geometry else {
            return Err(BoundaryError::invalid_geometry(context, "missing geometry"));
        };
        let geometry = geometry_from_geojson(geometry, &context)?;

        Ok(Self {
            id,
            properties: feature.properties.unwrap_or_default(),
            geometry,
        })
    }
}

/// Convertit une géométrie GeoJSON en géométrie `geo`, sans rien réparer.
///
/// `geo::Polygon::new` ferme silencieusement un anneau ouvert : les anneaux
/// sont donc vérifiés sur les positions brutes (au moins 4 positions,
/// fermés, coordonnées finies).
pub fn geometry_from_geojson(
    geometry: geojson::Geometry,
    context: &str,
) -> Result<Geometry, BoundaryError> {
    match &geometry.value {
        geojson::Value::Polygon(rings) => check_rings(rings, context)?,
        geojson::Value::MultiPolygon(polygons) => {
            for rings in polygons {
                check_rings(rings, context)?;
            }
        }
        _ => {}
    }

    Geometry::try_from(geometry).map_err(|e| BoundaryError::invalid_geometry(context, e.to_string()))
}

fn check_rings(rings: &[Vec<geojson::Position>], context: &str) -> Result<(), BoundaryError> {
    for ring in rings {
        if ring.len() < MIN_RING_POINTS {
            return Err(BoundaryError::invalid_geometry(
                context,
                format!("ring has {} positions (minimum {})", ring.len(), MIN_RING_POINTS),
            ));
        }
        if let Some(bad) = ring
            .iter()
            .position(|p| p.len() < 2 || p.iter().any(|v| !v.is_finite()))
        {
            return Err(BoundaryError::invalid_geometry(
                context,
                format!("invalid position at index {}", bad),
            ));
        }
        if ring.first() != ring.last() {
            return Err(BoundaryError::invalid_geometry(context, "ring is not closed"));
        }
    }
    Ok(())
}

/// Convertit une FeatureCollection en features candidates.
///
/// Les features sans géométrie exploitable sont écartées et retournées
/// comme erreurs non fatales.
pub fn features_from_collection(
    collection: geojson::FeatureCollection,
) -> (Vec<SourceFeature>, Vec<BoundaryError>) {
    let mut features = Vec::with_capacity(collection.features.len());
    let mut errors = Vec::new();

    for feature in collection.features {
        match SourceFeature::try_from(feature) {
            Ok(f) => features.push(f),
            Err(e) => errors.push(e),
        }
    }

    (features, errors)
}
