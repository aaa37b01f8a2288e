//! Appariement des sites avec les features des sources externes
//!
//! Un site correspond à une feature si un de ses noms normalisés est égal
//! au nom normalisé de la feature, ou si l'un contient l'autre. Les
//! candidats sont classés :
//!
//! 1. égalité avant inclusion
//! 2. désignation identique à celle du site
//! 3. chaîne contenue la plus longue
//! 4. ordre de la source

pub mod extract;
pub mod filter;
pub mod normalize;
pub mod synonyms;

pub use extract::{
    default_extractors, extract_name, FeatureId, NameExtractor, PropertyKey,
    DEFAULT_DESIGNATION_KEYS, DEFAULT_NAME_KEYS,
};
pub use filter::ConservationFilter;
pub use normalize::normalize;

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::feature::SourceFeature;
use crate::types::SiteIdentity;
use crate::BoundaryError;

/// Longueur minimale (caractères) d'un nom contenu dans un autre
pub const DEFAULT_MIN_SUBSTRING_LEN: usize = 4;

/// Politique de sélection des candidats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Tous les candidats, classés
    #[default]
    All,
    /// Égalités uniquement s'il y en a, sinon un seul candidat par inclusion
    Strict,
}

/// Nature de la correspondance
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchKind {
    Exact,
    Substring,
}

/// Un candidat retenu pour un site
#[derive(Debug, Clone)]
pub struct Match<'a> {
    pub feature: &'a SourceFeature,
    /// Position de la feature dans la source
    pub index: usize,
    /// Nom extrait de la feature (non normalisé)
    pub name: String,
    pub kind: MatchKind,
    /// Désignation de la feature identique à celle du site
    pub designation_match: bool,
    /// Longueur de la chaîne normalisée contenue (ou égale)
    pub overlap: usize,
}

impl Match<'_> {
    fn rank(&self, other: &Self) -> Ordering {
        self.kind
            .cmp(&other.kind)
            .then_with(|| other.designation_match.cmp(&self.designation_match))
            .then_with(|| other.overlap.cmp(&self.overlap))
            .then_with(|| self.index.cmp(&other.index))
    }

    fn same_score(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.designation_match == other.designation_match
            && self.overlap == other.overlap
    }
}

/// Apparieur configurable (extracteurs de nom, champs de désignation)
#[derive(Debug)]
pub struct FeatureMatcher {
    extractors: Vec<Box<dyn NameExtractor>>,
    designation_keys: Vec<String>,
    min_substring_len: usize,
}

impl Default for FeatureMatcher {
    fn default() -> Self {
        Self {
            extractors: default_extractors(),
            designation_keys: DEFAULT_DESIGNATION_KEYS.iter().map(|k| k.to_string()).collect(),
            min_substring_len: DEFAULT_MIN_SUBSTRING_LEN,
        }
    }
}

impl FeatureMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extractors(mut self, extractors: Vec<Box<dyn NameExtractor>>) -> Self {
        self.extractors = extractors;
        self
    }

    pub fn with_designation_keys(mut self, keys: Vec<String>) -> Self {
        self.designation_keys = keys;
        self
    }

    pub fn with_min_substring_len(mut self, len: usize) -> Self {
        self.min_substring_len = len;
        self
    }

    /// Compare deux noms bruts ; symétrique
    pub fn names_match(&self, a: &str, b: &str) -> Option<MatchKind> {
        self.compare_normalized(&normalize(a), &normalize(b))
            .map(|(kind, _)| kind)
    }

    fn compare_normalized(&self, a: &str, b: &str) -> Option<(MatchKind, usize)> {
        if a.is_empty() || b.is_empty() {
            return None;
        }
        if a == b {
            return Some((MatchKind::Exact, a.chars().count()));
        }

        let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
        let short_len = short.chars().count();
        if short_len >= self.min_substring_len && long.contains(short) {
            return Some((MatchKind::Substring, short_len));
        }
        None
    }

    fn designation_of(&self, feature: &SourceFeature) -> Option<String> {
        self.designation_keys
            .iter()
            .filter_map(|k| feature.property_str(k))
            .map(|d| normalize(&d))
            .find(|d| !d.is_empty())
    }

    /// Tous les candidats d'un site, classés du meilleur au moins bon.
    ///
    /// Aucun candidat n'est pas une erreur : la liste est vide.
    pub fn match_features<'a>(
        &self,
        identity: &SiteIdentity,
        features: &'a [SourceFeature],
    ) -> Vec<Match<'a>> {
        let site_names: Vec<String> = identity
            .names
            .iter()
            .map(|n| normalize(n))
            .filter(|n| !n.is_empty())
            .collect();
        if site_names.is_empty() {
            return Vec::new();
        }
        let site_designation = identity
            .designation
            .as_deref()
            .map(normalize)
            .filter(|d| !d.is_empty());

        let mut matches: Vec<Match<'a>> = features
            .iter()
            .enumerate()
            .filter_map(|(index, feature)| {
                let name = extract_name(&self.extractors, feature)?;
                let normalized = normalize(&name);

                let (kind, overlap) = site_names
                    .iter()
                    .filter_map(|site_name| self.compare_normalized(site_name, &normalized))
                    .min_by(|a, b| a.0.cmp(&b.0).then_with(|| b.1.cmp(&a.1)))?;

                let designation_match = site_designation.as_deref().is_some_and(|d| {
                    self.designation_of(feature).as_deref() == Some(d) || normalized.contains(d)
                });

                Some(Match {
                    feature,
                    index,
                    name,
                    kind,
                    designation_match,
                    overlap,
                })
            })
            .collect();

        matches.sort_by(|a, b| a.rank(b));

        debug!(
            site_id = %identity.id,
            candidates = matches.len(),
            "Matching done"
        );
        matches
    }

    /// Sélectionne les candidats selon le mode.
    ///
    /// En mode strict, plusieurs candidats par inclusion à égalité de score
    /// donnent `AmbiguousMatch`.
    pub fn select<'a>(
        &self,
        identity: &SiteIdentity,
        features: &'a [SourceFeature],
        mode: MatchMode,
    ) -> Result<Vec<Match<'a>>, BoundaryError> {
        let matches = self.match_features(identity, features);

        match mode {
            MatchMode::All => Ok(matches),
            MatchMode::Strict => {
                let exact: Vec<Match<'a>> = matches
                    .iter()
                    .filter(|m| m.kind == MatchKind::Exact)
                    .cloned()
                    .collect();
                if !exact.is_empty() {
                    return Ok(exact);
                }

                let Some(best) = matches.first() else {
                    return Ok(Vec::new());
                };
                let tied: Vec<&Match<'a>> =
                    matches.iter().filter(|m| m.same_score(best)).collect();
                if tied.len() > 1 {
                    return Err(BoundaryError::AmbiguousMatch {
                        site_id: identity.id.clone(),
                        candidates: tied.iter().map(|m| m.name.clone()).collect(),
                    });
                }
                Ok(vec![best.clone()])
            }
        }
    }
}
