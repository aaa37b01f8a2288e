//! Simplification des géométries (Douglas-Peucker)
//!
//! La tolérance est exprimée dans l'unité des coordonnées (degrés en lng/lat).

pub mod douglas_peucker;
pub mod ring;

pub use douglas_peucker::{perpendicular_distance, simplify_ring};
pub use ring::{simplify_closed_ring, validate_ring, MIN_RING_POINTS};

use geo::{Geometry, LineString, MultiPolygon, Polygon};

use crate::BoundaryError;

/// Vérifie qu'une tolérance est finie et positive ou nulle
pub fn check_tolerance(tolerance: f64) -> Result<(), BoundaryError> {
    if tolerance.is_finite() && tolerance >= 0.0 {
        Ok(())
    } else {
        Err(BoundaryError::InvalidTolerance(tolerance))
    }
}

/// Simplifie chaque anneau d'un polygone (extérieur puis trous)
pub fn simplify_polygon(
    polygon: &Polygon,
    tolerance: f64,
    context: &str,
) -> Result<Polygon, BoundaryError> {
    check_tolerance(tolerance)?;

    let exterior = simplify_closed_ring(polygon.exterior(), tolerance, context)?;
    let interiors = polygon
        .interiors()
        .iter()
        .enumerate()
        .map(|(i, hole)| simplify_closed_ring(hole, tolerance, &format!("{context} hole {i}")))
        .collect::<Result<Vec<LineString>, _>>()?;

    Ok(Polygon::new(exterior, interiors))
}

/// Simplifie chaque polygone d'un multipolygone
pub fn simplify_multi_polygon(
    multi: &MultiPolygon,
    tolerance: f64,
    context: &str,
) -> Result<MultiPolygon, BoundaryError> {
    multi
        .0
        .iter()
        .enumerate()
        .map(|(i, polygon)| simplify_polygon(polygon, tolerance, &format!("{context} part {i}")))
        .collect::<Result<Vec<_>, _>>()
        .map(MultiPolygon::new)
}

/// Simplifie une géométrie ; les types autres que Polygon/MultiPolygon
/// sont retournés inchangés.
pub fn simplify_geometry(
    geometry: &Geometry,
    tolerance: f64,
    context: &str,
) -> Result<Geometry, BoundaryError> {
    match geometry {
        Geometry::Polygon(p) => simplify_polygon(p, tolerance, context).map(Geometry::Polygon),
        Geometry::MultiPolygon(mp) => {
            simplify_multi_polygon(mp, tolerance, context).map(Geometry::MultiPolygon)
        }
        other => Ok(other.clone()),
    }
}

/// Nombre de sommets d'une géométrie (tous anneaux confondus)
pub fn count_points(geometry: &Geometry) -> usize {
    fn polygon_points(polygon: &Polygon) -> usize {
        polygon.exterior().0.len() + polygon.interiors().iter().map(|r| r.0.len()).sum::<usize>()
    }

    match geometry {
        Geometry::Point(_) => 1,
        Geometry::Polygon(p) => polygon_points(p),
        Geometry::MultiPolygon(mp) => mp.0.iter().map(polygon_points).sum(),
        Geometry::LineString(ls) => ls.0.len(),
        Geometry::MultiLineString(mls) => mls.0.iter().map(|ls| ls.0.len()).sum(),
        Geometry::MultiPoint(mp) => mp.0.len(),
        Geometry::GeometryCollection(gc) => gc.0.iter().map(count_points).sum(),
        Geometry::Line(_) => 2,
        Geometry::Rect(_) => 5,
        Geometry::Triangle(_) => 4,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Coord, Point};
    use std::f64::consts::PI;

    /// Cercle bruité fermé, suffisamment dense pour être simplifié
    pub(crate) fn noisy_circle(n: usize, radius: f64) -> LineString {
        let mut coords: Vec<Coord> = (0..n)
            .map(|i| {
                let angle = 2.0 * PI * i as f64 / n as f64;
                let r = radius * (1.0 + 0.01 * ((i * 7919) % 13) as f64 / 13.0);
                Coord {
                    x: r * angle.cos(),
                    y: r * angle.sin(),
                }
            })
            .collect();
        coords.push(coords[0]);
        LineString::new(coords)
    }

    fn segment_distance(p: Coord, a: Coord, b: Coord) -> f64 {
        let dx = b.x - a.x;
        let dy = b.y - a.y;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return ((p.x - a.x).powi(2) + (p.y - a.y).powi(2)).sqrt();
        }
        let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
        ((p.x - a.x - t * dx).powi(2) + (p.y - a.y - t * dy).powi(2)).sqrt()
    }

    #[test]
    fn test_idempotence() {
        let ring = noisy_circle(2000, 1.0);
        for tolerance in [0.0, 0.001, 0.01, 0.1] {
            let once = simplify_closed_ring(&ring, tolerance, "t").unwrap();
            let twice = simplify_closed_ring(&once, tolerance, "t").unwrap();
            assert_eq!(once, twice, "tolerance {}", tolerance);
        }
    }

    #[test]
    fn test_fidelity_bound() {
        let ring = noisy_circle(3000, 1.0);
        let tolerance = 0.005;
        let simplified = simplify_closed_ring(&ring, tolerance, "t").unwrap();

        for p in &ring.0 {
            let min = simplified
                .0
                .windows(2)
                .map(|w| segment_distance(*p, w[0], w[1]))
                .fold(f64::INFINITY, f64::min);
            assert!(min <= tolerance + 1e-12, "point {:?} at {}", p, min);
        }
    }

    #[test]
    fn test_monotonicity() {
        let ring = noisy_circle(2000, 1.0);
        let tolerances = [0.0, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 1.0];
        let lengths: Vec<usize> = tolerances
            .iter()
            .map(|&t| simplify_closed_ring(&ring, t, "t").unwrap().0.len())
            .collect();

        for pair in lengths.windows(2) {
            assert!(pair[0] >= pair[1], "lengths {:?}", lengths);
        }
    }

    #[test]
    fn test_endpoint_preservation() {
        let ring = noisy_circle(500, 2.0);
        let simplified = simplify_ring(&ring.0, 0.05);
        assert_eq!(simplified.first(), ring.0.first());
        assert_eq!(simplified.last(), ring.0.last());

        // Sous-séquence de l'entrée
        let mut it = ring.0.iter();
        assert!(simplified.iter().all(|c| it.any(|o| o == c)));
    }

    #[test]
    fn test_point_passes_through() {
        let point = Geometry::Point(Point::new(1.0, 2.0));
        assert_eq!(simplify_geometry(&point, 0.1, "p").unwrap(), point);
    }

    #[test]
    fn test_multi_polygon_reduces_points() {
        let multi = Geometry::MultiPolygon(MultiPolygon::new(vec![
            Polygon::new(noisy_circle(1000, 1.0), vec![]),
            Polygon::new(noisy_circle(1000, 0.5), vec![noisy_circle(400, 0.1)]),
        ]));

        let simplified = simplify_geometry(&multi, 0.01, "mp").unwrap();
        assert!(count_points(&simplified) < count_points(&multi) / 2);
        assert_eq!(count_points(&multi), 1001 + 1001 + 401);
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let polygon = Polygon::new(noisy_circle(10, 1.0), vec![]);
        assert!(matches!(
            simplify_polygon(&polygon, -1.0, "p"),
            Err(BoundaryError::InvalidTolerance(_))
        ));
        assert!(simplify_polygon(&polygon, f64::NAN, "p").is_err());
    }
}
