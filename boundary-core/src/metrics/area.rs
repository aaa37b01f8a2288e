//! Surface planaire approchée et conversions d'unités

use geo::{Geometry, LineString, Polygon};

/// Longueur d'un degré de latitude (km)
pub const KM_PER_DEGREE: f64 = 111.32;

const KM2_PER_ACRE: f64 = 0.004_046_86;
const HECTARES_PER_ACRE: f64 = 0.404_686;
const KM2_PER_SQUARE_MILE: f64 = 2.589_99;
const ACRES_PER_SQUARE_MILE: f64 = 640.0;

pub fn acres_to_km2(acres: f64) -> f64 {
    acres * KM2_PER_ACRE
}

pub fn acres_to_hectares(acres: f64) -> f64 {
    acres * HECTARES_PER_ACRE
}

pub fn square_miles_to_km2(square_miles: f64) -> f64 {
    square_miles * KM2_PER_SQUARE_MILE
}

pub fn square_miles_to_acres(square_miles: f64) -> f64 {
    square_miles * ACRES_PER_SQUARE_MILE
}

/// Surface approchée d'un anneau en km².
///
/// Somme des trapèzes `(x2 - x1)(y2 + y1) / 2` en degrés², convertie avec
/// un facteur fixe de 111.32² km²/degré². Sans correction de latitude : la
/// surface est surestimée loin de l'équateur (x2 environ à 60°).
/// Un anneau de moins de 3 sommets a une surface nulle.
pub fn planar_area(ring: &LineString) -> f64 {
    let coords = &ring.0;
    if coords.len() < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for pair in coords.windows(2) {
        sum += (pair[1].x - pair[0].x) * (pair[1].y + pair[0].y) / 2.0;
    }
    // Anneau non fermé : on ferme implicitement
    if let (Some(first), Some(last)) = (coords.first(), coords.last()) {
        if first != last {
            sum += (first.x - last.x) * (first.y + last.y) / 2.0;
        }
    }

    sum.abs() * KM_PER_DEGREE * KM_PER_DEGREE
}

/// Surface d'un polygone : extérieur moins les trous
pub fn polygon_area(polygon: &Polygon) -> f64 {
    let holes: f64 = polygon.interiors().iter().map(planar_area).sum();
    (planar_area(polygon.exterior()) - holes).max(0.0)
}

/// Surface totale d'une géométrie en km² (0 pour les types non surfaciques).
///
/// Les parties d'un MultiPolygon sont additionnées sans union : des parties
/// qui se chevauchent sont comptées deux fois.
pub fn geometry_area(geometry: &Geometry) -> f64 {
    match geometry {
        Geometry::Polygon(p) => polygon_area(p),
        Geometry::MultiPolygon(mp) => mp.0.iter().map(polygon_area).sum(),
        Geometry::GeometryCollection(gc) => gc.0.iter().map(geometry_area).sum(),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{MultiPolygon, Point};

    fn square(x0: f64, y0: f64, size: f64) -> LineString {
        LineString::from(vec![
            (x0, y0),
            (x0 + size, y0),
            (x0 + size, y0 + size),
            (x0, y0 + size),
            (x0, y0),
        ])
    }

    #[test]
    fn test_unit_square() {
        let area = planar_area(&square(0.0, 0.0, 1.0));
        assert!((area - KM_PER_DEGREE * KM_PER_DEGREE).abs() < 1e-9);
    }

    #[test]
    fn test_orientation_does_not_matter() {
        let ccw = square(10.0, 40.0, 0.1);
        let mut cw = ccw.clone();
        cw.0.reverse();
        assert!((planar_area(&ccw) - planar_area(&cw)).abs() < 1e-9);
        assert!(planar_area(&ccw) > 0.0);
    }

    #[test]
    fn test_no_latitude_correction() {
        // 1° x 1° entre 60° et 61° : même surface qu'à l'équateur
        let north = planar_area(&square(0.0, 60.0, 1.0));
        assert!((north - 12_392.1).abs() < 0.1);
        assert!((north - planar_area(&square(0.0, 0.0, 1.0))).abs() < 1e-6);
    }

    #[test]
    fn test_holes_and_multi_polygon() {
        let outer = square(0.0, 0.0, 1.0);
        let hole = square(0.25, 0.25, 0.5);
        let with_hole = Polygon::new(outer.clone(), vec![hole.clone()]);
        let expected = planar_area(&outer) - planar_area(&hole);
        assert!((polygon_area(&with_hole) - expected).abs() < 1e-9);

        let multi = Geometry::MultiPolygon(MultiPolygon::new(vec![
            Polygon::new(outer.clone(), vec![]),
            Polygon::new(square(5.0, 0.0, 1.0), vec![]),
        ]));
        assert!(geometry_area(&multi) > 2.0 * 12_000.0);
        assert_eq!(geometry_area(&Geometry::Point(Point::new(0.0, 0.0))), 0.0);
    }

    #[test]
    fn test_unit_conversions() {
        assert!((acres_to_km2(1000.0) - 4.04686).abs() < 1e-9);
        assert!((acres_to_hectares(1000.0) - 404.686).abs() < 1e-9);
        assert!((square_miles_to_km2(1.0) - 2.58999).abs() < 1e-12);
        assert_eq!(square_miles_to_acres(2.0), 1280.0);
    }
}
