//! Filtre des aires de conservation (jeux PAD-US)
//!
//! Une feature est retenue si sa désignation fait partie des types de
//! conservation ou si son nom contient un mot-clé de conservation, sauf si
//! son type ou son nom relève d'une exclusion (loisirs, militaire, ...).

use serde::{Deserialize, Serialize};

use crate::feature::SourceFeature;

/// Critères de sélection des aires de conservation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConservationFilter {
    /// Types de désignation retenus d'office
    pub include_types: Vec<String>,

    /// Mots-clés du nom (minuscules) qui suffisent à retenir une feature
    pub include_keywords: Vec<String>,

    /// Types de désignation toujours écartés
    pub exclude_types: Vec<String>,

    /// Mots-clés du nom (minuscules) toujours écartés
    pub exclude_keywords: Vec<String>,

    /// Surface minimale en acres
    pub min_acres: f64,

    /// Champs de désignation, par ordre de priorité
    pub designation_keys: Vec<String>,

    /// Champs de nom, par ordre de priorité
    pub name_keys: Vec<String>,

    /// Champs de surface (acres), par ordre de priorité
    pub acres_keys: Vec<String>,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

impl Default for ConservationFilter {
    fn default() -> Self {
        Self {
            include_types: strings(&[
                "State Conservation Area",
                "Wilderness Area",
                "National Monument",
                "Research or Educational Area",
                "Wild and Scenic River",
                "Conservation Easement",
                "Wetlands Reserve Program",
                "Agricultural Easement",
                "Historic or Cultural Easement",
                "Approved or Proclamation Boundary",
                "National Forest",
                "Wildlife Refuge",
                "National Wildlife Refuge",
                "Scenic Riverway",
            ]),
            include_keywords: strings(&[
                "wildlife",
                "wilderness",
                "conservation",
                "national forest",
                "nature",
                "preserve",
                "sanctuary",
                "refuge",
                "scenic river",
                "easement",
                "wetlands reserve",
            ]),
            exclude_types: strings(&[
                "State Recreation Area",
                "Recreation Management Area",
                "Local Recreation Area",
                "Local Park",
                "State Historic or Cultural Area",
                "Private Recreation or Education",
                "Military Land",
                "Other Easement",
                "Recreation or Education Easement",
            ]),
            exclude_keywords: strings(&[
                "lake",
                "recreation",
                "park",
                "military",
                "fort ",
                "experimental forest",
            ]),
            min_acres: 100.0,
            designation_keys: strings(&["d_Des_Tp", "designation", "FeatClass"]),
            name_keys: strings(&["Unit_Nm", "name", "Loc_Nm"]),
            acres_keys: strings(&["GIS_Acres", "acres"]),
        }
    }
}

impl ConservationFilter {
    pub fn with_min_acres(mut self, min_acres: f64) -> Self {
        self.min_acres = min_acres;
        self
    }

    fn first_str(feature: &SourceFeature, keys: &[String]) -> Option<String> {
        keys.iter()
            .filter_map(|k| feature.property_str(k))
            .find(|v| !v.trim().is_empty())
    }

    pub fn designation(&self, feature: &SourceFeature) -> Option<String> {
        Self::first_str(feature, &self.designation_keys)
    }

    pub fn unit_name(&self, feature: &SourceFeature) -> Option<String> {
        Self::first_str(feature, &self.name_keys)
    }

    /// Surface déclarée en acres (0 si absente)
    pub fn acres(&self, feature: &SourceFeature) -> f64 {
        self.acres_keys
            .iter()
            .find_map(|k| feature.property_f64(k))
            .unwrap_or(0.0)
    }

    /// Vrai si la feature est une aire de conservation, sans critère de surface
    pub fn is_conservation_area(&self, feature: &SourceFeature) -> bool {
        let designation = self.designation(feature).unwrap_or_default();
        let name = self.unit_name(feature).unwrap_or_default().to_lowercase();

        if self.exclude_types.iter().any(|t| *t == designation) {
            return false;
        }
        if self.exclude_keywords.iter().any(|k| name.contains(k.as_str())) {
            return false;
        }
        if self.include_types.iter().any(|t| *t == designation) {
            return true;
        }
        self.include_keywords.iter().any(|k| name.contains(k.as_str()))
    }

    /// Critère complet : surface minimale et aire de conservation
    pub fn accepts(&self, feature: &SourceFeature) -> bool {
        self.acres(feature) >= self.min_acres && self.is_conservation_area(feature)
    }

    /// Garde les features retenues, triées par surface décroissante
    pub fn apply(&self, features: Vec<SourceFeature>) -> Vec<SourceFeature> {
        let mut kept: Vec<(f64, SourceFeature)> = features
            .into_iter()
            .filter(|f| self.accepts(f))
            .map(|f| (self.acres(&f), f))
            .collect();
        kept.sort_by(|a, b| b.0.total_cmp(&a.0));
        kept.into_iter().map(|(_, f)| f).collect()
    }
}
