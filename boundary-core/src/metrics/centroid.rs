//! Centroïde par moyenne des sommets

use geo::{Coord, Geometry, LineString};
use serde::{Deserialize, Serialize};

use crate::types::geometry_kind;
use crate::BoundaryError;

/// Position géographique en degrés décimaux
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Sommets d'un anneau sans le point de fermeture dupliqué
pub(crate) fn ring_vertices(ring: &LineString) -> &[Coord] {
    let coords = ring.0.as_slice();
    match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => {
            &coords[..coords.len() - 1]
        }
        _ => coords,
    }
}

/// Centroïde non pondéré des sommets des anneaux extérieurs.
///
/// Les trous sont ignorés. Pour un MultiPolygon, tous les sommets
/// extérieurs sont mis en commun (pas de moyenne par polygone).
pub fn centroid(geometry: &Geometry) -> Result<LatLng, BoundaryError> {
    let vertices: Vec<Coord> = match geometry {
        Geometry::Point(p) => return Ok(LatLng::new(p.y(), p.x())),
        Geometry::Polygon(polygon) => ring_vertices(polygon.exterior()).to_vec(),
        Geometry::MultiPolygon(multi) => multi
            .0
            .iter()
            .flat_map(|polygon| ring_vertices(polygon.exterior()).iter().copied())
            .collect(),
        other => {
            return Err(BoundaryError::invalid_geometry(
                "centroid",
                format!("unsupported geometry type {}", geometry_kind(other)),
            ))
        }
    };

    if vertices.is_empty() {
        return Err(BoundaryError::invalid_geometry("centroid", "empty geometry"));
    }

    let n = vertices.len() as f64;
    let (sum_x, sum_y) = vertices
        .iter()
        .fold((0.0, 0.0), |(sx, sy), c| (sx + c.x, sy + c.y));

    Ok(LatLng::new(sum_y / n, sum_x / n))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{LineString, MultiPolygon, Point, Polygon};

    fn square(x0: f64, y0: f64, size: f64) -> Polygon {
        Polygon::new(
            LineString::from(vec![
                (x0, y0),
                (x0 + size, y0),
                (x0 + size, y0 + size),
                (x0, y0 + size),
                (x0, y0),
            ]),
            vec![],
        )
    }

    #[test]
    fn test_unit_square_centroid() {
        let c = centroid(&Geometry::Polygon(square(0.0, 0.0, 1.0))).unwrap();
        assert_eq!(c, LatLng::new(0.5, 0.5));
    }

    #[test]
    fn test_holes_are_ignored() {
        let hole = LineString::from(vec![(0.1, 0.1), (0.2, 0.1), (0.2, 0.2), (0.1, 0.1)]);
        let polygon = Polygon::new(square(0.0, 0.0, 1.0).exterior().clone(), vec![hole]);
        let c = centroid(&Geometry::Polygon(polygon)).unwrap();
        assert_eq!(c, LatLng::new(0.5, 0.5));
    }

    #[test]
    fn test_multi_polygon_pools_vertices() {
        // 4 sommets autour de (0.5, 0.5) et 4 autour de (10.5, 0.5)
        let multi = MultiPolygon::new(vec![square(0.0, 0.0, 1.0), square(10.0, 0.0, 1.0)]);
        let c = centroid(&Geometry::MultiPolygon(multi)).unwrap();
        assert!((c.lng - 5.5).abs() < 1e-12);
        assert!((c.lat - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_point_and_empty() {
        let c = centroid(&Geometry::Point(Point::new(-92.5, 38.0))).unwrap();
        assert_eq!(c, LatLng::new(38.0, -92.5));

        let empty = Geometry::MultiPolygon(MultiPolygon::new(vec![]));
        assert!(matches!(
            centroid(&empty),
            Err(BoundaryError::InvalidGeometry { .. })
        ));
    }
}
