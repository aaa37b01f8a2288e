//! Types de données pour le crate boundary-core

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use geo::{Geometry, Point};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::metrics::{self, LatLng};

/// Sac de propriétés libre (les clés varient selon la source)
pub type Properties = Map<String, Value>;

/// Niveau de qualité d'une géométrie de site, ordonné `Low < Medium < High`
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum DataQuality {
    #[default]
    Low,
    Medium,
    High,
}

/// État d'un site vis-à-vis de la réconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteState {
    /// Qualité < high : une géométrie meilleure peut être appliquée
    Pending,
    /// Qualité high : figé, plus jamais réécrit
    Done,
}

impl From<DataQuality> for SiteState {
    fn from(quality: DataQuality) -> Self {
        match quality {
            DataQuality::High => SiteState::Done,
            DataQuality::Low | DataQuality::Medium => SiteState::Pending,
        }
    }
}

/// Identité canonique d'un site, utilisée pour le matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteIdentity {
    /// Identifiant (clé du fichier `<id>.json`)
    #[serde(default)]
    pub id: String,

    /// Variantes de nom (au moins une)
    #[serde(alias = "name")]
    pub names: Vec<String>,

    /// Catégorie de désignation (ex: "National Forest")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
}

impl SiteIdentity {
    pub fn new(
        id: impl Into<String>,
        names: impl IntoIterator<Item = impl Into<String>>,
        designation: Option<&str>,
    ) -> Self {
        Self {
            id: id.into(),
            names: names.into_iter().map(Into::into).collect(),
            designation: designation.map(str::to_string),
        }
    }
}

/// Registre immuable des identités, indexé par identifiant
#[derive(Debug, Clone, Default)]
pub struct SiteRegistry {
    sites: BTreeMap<String, SiteIdentity>,
}

impl SiteRegistry {
    pub fn new(identities: impl IntoIterator<Item = SiteIdentity>) -> Self {
        Self {
            sites: identities
                .into_iter()
                .map(|identity| (identity.id.clone(), identity))
                .collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&SiteIdentity> {
        self.sites.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sites.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteIdentity> {
        self.sites.values()
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }
}

/// Position de référence d'un site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Surface de référence, partiellement renseignée
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteArea {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acres: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub km2: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hectares: Option<f64>,
}

static ACRES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9][0-9,]*(?:\.[0-9]+)?)\s*acres").expect("valid regex"));

static SQ_MI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\(([0-9][0-9,]*(?:\.[0-9]+)?)\s*sq\s*mi\)").expect("valid regex")
});

impl SiteArea {
    /// Surface complète à partir d'acres
    pub fn from_acres(acres: f64) -> Self {
        Self {
            acres: Some(acres),
            km2: Some(round2(metrics::acres_to_km2(acres))),
            hectares: Some(round2(metrics::acres_to_hectares(acres))),
        }
    }

    /// Surface complète à partir de miles carrés
    pub fn from_square_miles(square_miles: f64) -> Self {
        let acres = metrics::square_miles_to_acres(square_miles);
        Self {
            acres: Some(acres),
            km2: Some(round2(metrics::square_miles_to_km2(square_miles))),
            hectares: Some(round2(metrics::acres_to_hectares(acres))),
        }
    }

    /// Extrait une surface d'un texte d'inventaire ("12,345 acres" ou "(48 sq mi)").
    ///
    /// Les acres sont prioritaires sur les miles carrés.
    pub fn parse_text(text: &str) -> Option<Self> {
        if let Some(acres) = ACRES_RE.captures(text).and_then(|c| parse_number(&c[1])) {
            return Some(Self::from_acres(acres));
        }
        SQ_MI_RE
            .captures(text)
            .and_then(|c| parse_number(&c[1]))
            .map(Self::from_square_miles)
    }

    /// Surface de référence en km², dérivée des autres unités si besoin
    pub fn reference_km2(&self) -> Option<f64> {
        self.km2
            .or_else(|| self.acres.map(metrics::acres_to_km2))
            .or_else(|| self.hectares.map(|ha| ha / 100.0))
            .filter(|km2| km2.is_finite() && *km2 > 0.0)
    }
}

fn parse_number(raw: &str) -> Option<f64> {
    raw.replace(',', "").parse().ok()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Bloc de métadonnées d'un site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<NaiveDate>,

    #[serde(default)]
    pub data_quality: DataQuality,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry_source: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_area: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Enregistrement persistant d'un site (un fichier JSON par site)
///
/// Les champs inconnus sont conservés dans `extra` pour que le cycle
/// lecture-modification-écriture ne perde rien.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    #[serde(with = "geometry_serde")]
    pub geometry: Geometry,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<SiteArea>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,

    #[serde(default)]
    pub metadata: Metadata,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SiteRecord {
    /// Crée un site avec un Point provisoire
    pub fn new(id: impl Into<String>, name: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: Some(Location {
                lat,
                lng,
                state: None,
                extra: Map::new(),
            }),
            geometry: Geometry::Point(Point::new(lng, lat)),
            area: None,
            designation: None,
            metadata: Metadata::default(),
            extra: Map::new(),
        }
    }

    pub fn with_area(mut self, area: SiteArea) -> Self {
        self.area = Some(area);
        self
    }

    pub fn with_quality(mut self, quality: DataQuality) -> Self {
        self.metadata.data_quality = quality;
        self
    }

    pub fn state(&self) -> SiteState {
        self.metadata.data_quality.into()
    }

    /// Un site de qualité high ne doit jamais être réécrit
    pub fn is_frozen(&self) -> bool {
        self.state() == SiteState::Done
    }

    pub fn reference_area_km2(&self) -> Option<f64> {
        self.area.as_ref().and_then(SiteArea::reference_km2)
    }

    /// Centre du site : la location si présente, sinon le centroïde de la géométrie
    pub fn center(&self) -> Option<LatLng> {
        if let Some(location) = &self.location {
            if location.lat.is_finite() && location.lng.is_finite() {
                return Some(LatLng::new(location.lat, location.lng));
            }
        }
        metrics::centroid(&self.geometry).ok()
    }

    /// Vrai si la géométrie est déjà surfacique (Polygon ou MultiPolygon)
    pub fn has_boundary(&self) -> bool {
        matches!(
            self.geometry,
            Geometry::Polygon(_) | Geometry::MultiPolygon(_)
        )
    }
}

/// Nom court du type de géométrie, pour les logs et les erreurs
pub fn geometry_kind(geometry: &Geometry) -> &'static str {
    match geometry {
        Geometry::Point(_) => "Point",
        Geometry::Line(_) => "Line",
        Geometry::LineString(_) => "LineString",
        Geometry::Polygon(_) => "Polygon",
        Geometry::MultiPoint(_) => "MultiPoint",
        Geometry::MultiLineString(_) => "MultiLineString",
        Geometry::MultiPolygon(_) => "MultiPolygon",
        Geometry::GeometryCollection(_) => "GeometryCollection",
        Geometry::Rect(_) => "Rect",
        Geometry::Triangle(_) => "Triangle",
    }
}

/// (Dé)sérialisation d'une géométrie `geo` au format GeoJSON
mod geometry_serde {
    use geo::Geometry;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(geometry: &Geometry, serializer: S) -> Result<S::Ok, S::Error> {
        geojson::Geometry::new(geojson::Value::from(geometry)).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Geometry, D::Error> {
        let geometry = geojson::Geometry::deserialize(deserializer)?;
        crate::feature::geometry_from_geojson(geometry, "site geometry").map_err(D::Error::custom)
    }
}
