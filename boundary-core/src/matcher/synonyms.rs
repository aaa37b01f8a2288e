//! Abréviations de désignation et leurs formes développées
//!
//! Appliquées token par token, des deux côtés de la comparaison, pour que
//! "Mark Twain NF" et "Mark Twain National Forest" se normalisent pareil.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Désignations des aires protégées américaines (sigles usuels)
static DESIGNATIONS: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("nf", "national forest"),
        ("nfs", "national forests"),
        ("ng", "national grassland"),
        ("nwr", "national wildlife refuge"),
        ("np", "national park"),
        ("npres", "national preserve"),
        ("nm", "national monument"),
        ("nra", "national recreation area"),
        ("ns", "national seashore"),
        ("nl", "national lakeshore"),
        ("nsr", "national scenic riverways"),
        ("nhp", "national historical park"),
        ("nhs", "national historic site"),
        ("wa", "wilderness area"),
        ("wma", "wildlife management area"),
        ("sca", "state conservation area"),
        ("sf", "state forest"),
        ("sp", "state park"),
        ("sna", "state natural area"),
    ])
});

/// Abréviations générales de toponymes
static PLACE_WORDS: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("st", "saint"),
        ("ste", "sainte"),
        ("mt", "mount"),
        ("mtn", "mountain"),
        ("mtns", "mountains"),
        ("ft", "fort"),
        ("cr", "creek"),
        ("riv", "river"),
    ])
});

/// Développe un token (déjà en minuscules) ; retourne le token tel quel sinon
pub fn expand_token(token: &str) -> &str {
    DESIGNATIONS
        .get(token)
        .or_else(|| PLACE_WORDS.get(token))
        .copied()
        .unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_designations() {
        assert_eq!(expand_token("nf"), "national forest");
        assert_eq!(expand_token("nwr"), "national wildlife refuge");
    }

    #[test]
    fn expands_place_words() {
        assert_eq!(expand_token("st"), "saint");
        assert_eq!(expand_token("mt"), "mount");
    }

    #[test]
    fn leaves_unknown_tokens() {
        assert_eq!(expand_token("twain"), "twain");
        assert_eq!(expand_token(""), "");
    }
}
