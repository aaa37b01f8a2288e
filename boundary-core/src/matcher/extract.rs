//! Extraction du nom d'une feature
//!
//! Chaque source nomme ses unités dans un champ différent (`FORESTNAME` pour
//! l'USFS, `Unit_Nm` pour PAD-US, `ORGNAME` pour le FWS, ...). Les
//! extracteurs sont essayés dans l'ordre, le premier nom non vide gagne.

use std::fmt;

use crate::feature::SourceFeature;

/// Ordre par défaut des champs de nom
pub const DEFAULT_NAME_KEYS: [&str; 7] = [
    "name",
    "FORESTNAME",
    "UNIT_NAME",
    "Unit_Nm",
    "ORGNAME",
    "NAME",
    "Loc_Nm",
];

/// Champs portant la désignation d'une feature
pub const DEFAULT_DESIGNATION_KEYS: [&str; 4] = ["designation", "d_Des_Tp", "Des_Tp", "FeatClass"];

/// Stratégie d'extraction d'un nom depuis une feature
pub trait NameExtractor: fmt::Debug + Send + Sync {
    fn extract(&self, feature: &SourceFeature) -> Option<String>;
}

/// Lit une propriété texte (vide après trim = absente)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyKey(pub String);

impl PropertyKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }
}

impl NameExtractor for PropertyKey {
    fn extract(&self, feature: &SourceFeature) -> Option<String> {
        let value = feature.property_str(&self.0)?;
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

/// Utilise l'identifiant de la feature comme nom de dernier recours
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureId;

impl NameExtractor for FeatureId {
    fn extract(&self, feature: &SourceFeature) -> Option<String> {
        feature.id.clone().filter(|id| !id.trim().is_empty())
    }
}

/// Extracteurs par défaut, dans l'ordre de [`DEFAULT_NAME_KEYS`]
pub fn default_extractors() -> Vec<Box<dyn NameExtractor>> {
    DEFAULT_NAME_KEYS
        .iter()
        .map(|key| Box::new(PropertyKey::new(*key)) as Box<dyn NameExtractor>)
        .collect()
}

/// Premier nom non vide retourné par la liste d'extracteurs
pub fn extract_name(extractors: &[Box<dyn NameExtractor>], feature: &SourceFeature) -> Option<String> {
    extractors.iter().find_map(|e| e.extract(feature))
}
