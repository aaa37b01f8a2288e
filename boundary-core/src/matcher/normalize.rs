//! Normalisation des noms de sites
//!
//! Appliquée de façon symétrique au nom du site et aux noms des features :
//! 1. minuscules
//! 2. ponctuation supprimée (`.`, `,`, `'`, `"`, `#`, `/`, `\`, `-`, `(`, `)`)
//! 3. abréviations développées (nf → national forest, st → saint, ...)
//! 4. espaces fusionnés, bords supprimés

use std::sync::LazyLock;

use regex::Regex;

use super::synonyms;

static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"[.,'"#/\\\-()]+"##).expect("valid regex"));

#[must_use]
pub fn normalize(input: &str) -> String {
    let lower = input.to_lowercase();
    let no_punct = PUNCTUATION_RE.replace_all(&lower, " ");

    no_punct
        .split_whitespace()
        .map(synonyms::expand_token)
        .collect::<Vec<_>>()
        .join(" ")
}
