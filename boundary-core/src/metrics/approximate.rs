//! Polygones approchés générés à partir d'un centre et d'une surface
//!
//! Sert de repli quand aucune limite réelle n'est disponible : la forme est
//! irrégulière mais déterministe (même graine, même polygone).

use std::f64::consts::PI;

use geo::{Coord, Geometry, LineString, MultiPolygon, Polygon};

use super::area::{planar_area, KM_PER_DEGREE};
use super::centroid::LatLng;
use crate::BoundaryError;

/// Au-delà de cette surface (km²), le polygone est découpé en plusieurs parties
pub const DEFAULT_MULTIPART_THRESHOLD_KM2: f64 = 5000.0;

/// Nombre maximal de parties d'un polygone approché
pub const MAX_PARTS: usize = 5;

/// Écart angulaire maximal d'un sommet (radians)
const ANGLE_WOBBLE: f64 = 0.15;

/// Décalage en degrés entre deux parties successives
const PART_OFFSET_DEG: f64 = 0.5;

const MIN_POINTS: usize = 24;
const MAX_POINTS: usize = 100;

/// Nombre de sommets par défaut : `clamp(floor(area / 100), 24, 100)`
pub fn default_point_count(area_km2: f64) -> usize {
    let raw = if area_km2.is_finite() && area_km2 > 0.0 {
        (area_km2 / 100.0).floor() as usize
    } else {
        0
    };
    raw.clamp(MIN_POINTS, MAX_POINTS)
}

/// Graine stable dérivée de l'identifiant d'un site
pub fn site_seed(site_id: &str) -> u64 {
    let hash = blake3::hash(site_id.as_bytes());
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

/// Valeur pseudo-aléatoire dans [0, 1), fonction pure de (seed, stream, index)
fn unit_random(seed: u64, stream: u8, index: usize) -> f64 {
    let mut hasher = blake3::Hasher::new();
    hasher.update(&seed.to_le_bytes());
    hasher.update(&[stream]);
    hasher.update(&(index as u64).to_le_bytes());
    let hash = hasher.finalize();

    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    (u64::from_le_bytes(bytes) >> 11) as f64 / (1u64 << 53) as f64
}

/// Génère un polygone approché (découpé au-delà de 5 000 km²).
///
/// Voir [`generate_approximate_geometry`] pour un seuil différent.
pub fn generate_approximate_polygon(
    center_lat: f64,
    center_lng: f64,
    area_km2: f64,
    num_points: usize,
    seed: u64,
) -> Result<Geometry, BoundaryError> {
    generate_approximate_geometry(
        LatLng::new(center_lat, center_lng),
        area_km2,
        num_points,
        seed,
        DEFAULT_MULTIPART_THRESHOLD_KM2,
    )
}

/// Génère une géométrie approchée dont la surface planaire vaut `area_km2`.
///
/// Au-dessus de `multipart_threshold_km2`, la surface est répartie sur
/// `min(ceil(area / seuil), 5)` parties décalées en diagonale de 0.5°, la
/// partie `i` utilisant la graine `seed + i`.
pub fn generate_approximate_geometry(
    center: LatLng,
    area_km2: f64,
    num_points: usize,
    seed: u64,
    multipart_threshold_km2: f64,
) -> Result<Geometry, BoundaryError> {
    if !area_km2.is_finite() || area_km2 <= 0.0 {
        return Err(BoundaryError::invalid_geometry(
            "approximation",
            format!("area must be positive, got {}", area_km2),
        ));
    }
    if !center.lat.is_finite() || !center.lng.is_finite() || center.lat.abs() >= 90.0 {
        return Err(BoundaryError::invalid_geometry(
            "approximation",
            format!("invalid center ({}, {})", center.lat, center.lng),
        ));
    }
    if num_points < 3 {
        return Err(BoundaryError::invalid_geometry(
            "approximation",
            format!("{} points requested (minimum 3)", num_points),
        ));
    }

    if multipart_threshold_km2 > 0.0 && area_km2 > multipart_threshold_km2 {
        let parts = ((area_km2 / multipart_threshold_km2).ceil() as usize).min(MAX_PARTS);
        if parts > 1 {
            let part_area = area_km2 / parts as f64;
            let polygons = (0..parts)
                .map(|i| {
                    let offset = (i as f64 - parts as f64 / 2.0) * PART_OFFSET_DEG;
                    let part_center = LatLng::new(center.lat + offset, center.lng + offset);
                    irregular_polygon(
                        part_center,
                        part_area,
                        num_points,
                        seed.wrapping_add(i as u64),
                    )
                })
                .collect();
            return Ok(Geometry::MultiPolygon(MultiPolygon::new(polygons)));
        }
    }

    Ok(Geometry::Polygon(irregular_polygon(
        center, area_km2, num_points, seed,
    )))
}

/// Polygone irrégulier à `num_points` sommets, remis à l'échelle sur `area_km2`
fn irregular_polygon(center: LatLng, area_km2: f64, num_points: usize, seed: u64) -> Polygon {
    let radius_km = (area_km2 / PI).sqrt();
    let radius_lat = radius_km / KM_PER_DEGREE;
    let radius_lng = radius_km / (KM_PER_DEGREE * center.lat.to_radians().cos());

    let offsets: Vec<(f64, f64)> = (0..num_points)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / num_points as f64;
            let variation = 0.8 + 0.4 * unit_random(seed, 0, i);
            let wobble = (unit_random(seed, 1, i) - 0.5) * 2.0 * ANGLE_WOBBLE;
            let adjusted = angle + wobble;
            (
                radius_lng * variation * adjusted.cos(),
                radius_lat * variation * adjusted.sin(),
            )
        })
        .collect();

    // La surface varie comme le carré de l'échelle
    let actual = planar_area(&build_ring(center, &offsets, 1.0));
    let scale = if actual > 0.0 {
        (area_km2 / actual).sqrt()
    } else {
        1.0
    };

    Polygon::new(build_ring(center, &offsets, scale), vec![])
}

fn build_ring(center: LatLng, offsets: &[(f64, f64)], scale: f64) -> LineString {
    let mut coords: Vec<Coord> = offsets
        .iter()
        .map(|&(dx, dy)| Coord {
            x: center.lng + dx * scale,
            y: center.lat + dy * scale,
        })
        .collect();
    if let Some(&first) = coords.first() {
        coords.push(first);
    }
    LineString::new(coords)
}
